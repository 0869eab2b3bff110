//! Server roles supervised by elnath.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three cooperating server kinds.
///
/// The set is fixed; every per-process lookup is keyed by a `Role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Authentication server.
    Login,
    /// Character/session server.
    Char,
    /// World/map server.
    Map,
}

impl Role {
    /// Every role, in launch order.
    pub const ALL: [Self; 3] = [Self::Login, Self::Char, Self::Map];

    /// Short lowercase identifier used in CLI arguments and output prefixes.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Char => "char",
            Self::Map => "map",
        }
    }

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "Login server",
            Self::Char => "Character server",
            Self::Map => "Map server",
        }
    }

    /// Default executable file stem inside the root directory
    /// (platform extension not included).
    pub const fn default_executable_stem(self) -> &'static str {
        match self {
            Self::Login => "login-server",
            Self::Char => "char-server",
            Self::Map => "map-server",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected login, char or map)")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "login" | "login-server" | "auth" => Ok(Self::Login),
            "char" | "char-server" | "character" => Ok(Self::Char),
            "map" | "map-server" | "world" => Ok(Self::Map),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("login".parse::<Role>().unwrap(), Role::Login);
        assert_eq!("Char".parse::<Role>().unwrap(), Role::Char);
        assert_eq!("world".parse::<Role>().unwrap(), Role::Map);
        assert_eq!("map-server".parse::<Role>().unwrap(), Role::Map);
    }

    #[test]
    fn rejects_unknown() {
        let err = "inter".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("inter"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Role::Char).unwrap();
        assert_eq!(json, "\"char\"");
    }
}
