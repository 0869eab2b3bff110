//! Commands typed into the interactive session.

use std::str::FromStr;

use elnath_core::Role;
use thiserror::Error;

/// Lines shown by `log <role>` when no count is given.
pub const DEFAULT_LOG_LINES: usize = 20;

/// Which roles a lifecycle command applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    All,
    One(Role),
}

impl Target {
    pub fn roles(self) -> Vec<Role> {
        match self {
            Self::All => Role::ALL.to_vec(),
            Self::One(role) => vec![role],
        }
    }
}

impl FromStr for Target {
    type Err = SessionCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse()
            .map(Self::One)
            .map_err(|_| SessionCommandError::UnknownRole(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start(Target),
    Stop(Target),
    Restart(Target),
    Status,
    Log { role: Role, lines: usize },
    Client,
    Setup,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionCommandError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),

    #[error("Unknown server '{0}', expected login, char, map or all")]
    UnknownRole(String),

    #[error("'{0}' needs a server name")]
    MissingArgument(&'static str),

    #[error("Invalid line count '{0}'")]
    InvalidCount(String),

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

impl FromStr for SessionCommand {
    type Err = SessionCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(SessionCommandError::UnknownCommand(String::new()));
        };
        let verb = verb.to_ascii_lowercase();

        let command = match verb.as_str() {
            "start" => Self::Start(target_arg(&mut words, "start")?),
            "stop" => Self::Stop(target_arg(&mut words, "stop")?),
            "restart" => Self::Restart(target_arg(&mut words, "restart")?),
            "status" | "ps" => Self::Status,
            "log" | "logs" => {
                let raw = words
                    .next()
                    .ok_or(SessionCommandError::MissingArgument("log"))?;
                let role = raw
                    .parse()
                    .map_err(|_| SessionCommandError::UnknownRole(raw.to_string()))?;
                let lines = match words.next() {
                    Some(n) => n
                        .parse()
                        .map_err(|_| SessionCommandError::InvalidCount(n.to_string()))?,
                    None => DEFAULT_LOG_LINES,
                };
                Self::Log { role, lines }
            }
            "client" => Self::Client,
            "setup" => Self::Setup,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(SessionCommandError::UnknownCommand(verb)),
        };

        match words.next() {
            Some(extra) => Err(SessionCommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn target_arg<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    verb: &'static str,
) -> Result<Target, SessionCommandError> {
    words
        .next()
        .ok_or(SessionCommandError::MissingArgument(verb))?
        .parse()
}

/// Help text for the session prompt.
pub const HELP: &str = "\
Commands:
  start <server|all>     start a server
  stop <server|all>      stop a server
  restart <server|all>   restart a server
  status                 show every server's state
  log <server> [n]       show the last n lines of a server's output
  client                 launch the game client
  setup                  launch the client's setup tool
  help                   show this help
  quit                   stop every server and exit

Servers: login, char, map";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lifecycle_commands() {
        assert_eq!(
            "start map".parse(),
            Ok(SessionCommand::Start(Target::One(Role::Map)))
        );
        assert_eq!("STOP all".parse(), Ok(SessionCommand::Stop(Target::All)));
        assert_eq!(
            "restart character".parse(),
            Ok(SessionCommand::Restart(Target::One(Role::Char)))
        );
    }

    #[test]
    fn parses_log_with_and_without_count() {
        assert_eq!(
            "log login".parse(),
            Ok(SessionCommand::Log {
                role: Role::Login,
                lines: DEFAULT_LOG_LINES
            })
        );
        assert_eq!(
            "log map 100".parse(),
            Ok(SessionCommand::Log {
                role: Role::Map,
                lines: 100
            })
        );
        assert_eq!(
            "log map many".parse::<SessionCommand>(),
            Err(SessionCommandError::InvalidCount("many".into()))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            "start".parse::<SessionCommand>(),
            Err(SessionCommandError::MissingArgument("start"))
        );
        assert_eq!(
            "start web".parse::<SessionCommand>(),
            Err(SessionCommandError::UnknownRole("web".into()))
        );
        assert_eq!(
            "dance".parse::<SessionCommand>(),
            Err(SessionCommandError::UnknownCommand("dance".into()))
        );
        assert_eq!(
            "status now".parse::<SessionCommand>(),
            Err(SessionCommandError::UnexpectedArgument("now".into()))
        );
    }

    #[test]
    fn target_roles() {
        assert_eq!(Target::All.roles(), Role::ALL.to_vec());
        assert_eq!(Target::One(Role::Char).roles(), vec![Role::Char]);
    }
}
