//! One line per supervisor event.

use chrono::Local;
use console::style;
use elnath_core::{OutputEvent, OutputSource, Role, SupervisorEvent};

/// Human-readable rendering. State changes are not printed; the synthetic
/// lines that accompany them already tell the story.
pub fn format_event(event: &SupervisorEvent) -> Option<String> {
    event.as_output().map(format_output)
}

/// `HH:MM:SS [role] text`, with errors in red and supervisor lines in bold.
pub fn format_output(output: &OutputEvent) -> String {
    let time = output.timestamp.with_timezone(&Local).format("%H:%M:%S");
    let tag = style(format!("[{}]", output.role)).fg(role_color(output.role));

    let text = match (output.source, output.is_error) {
        (OutputSource::Supervisor, true) => style(&output.text).red().bold(),
        (OutputSource::Supervisor, false) => style(&output.text).bold(),
        (_, true) => style(&output.text).red(),
        (_, false) => style(&output.text),
    };

    format!("{} {tag} {text}", style(time).dim())
}

/// One JSON object per event.
pub fn format_event_json(event: &SupervisorEvent) -> Option<String> {
    serde_json::to_string(event).ok()
}

const fn role_color(role: Role) -> console::Color {
    match role {
        Role::Login => console::Color::Cyan,
        Role::Char => console::Color::Magenta,
        Role::Map => console::Color::Yellow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elnath_core::{ProcessStatus, StateChange};

    #[test]
    fn output_line_carries_role_and_text() {
        console::set_colors_enabled(false);
        let line = format_output(&OutputEvent::line(Role::Map, "Map server ready", false));
        assert!(line.ends_with("[map] Map server ready"));
    }

    #[test]
    fn state_changes_are_not_printed() {
        let event = StateChange::new(Role::Login, ProcessStatus::running(3)).into();
        assert_eq!(format_event(&event), None);
    }

    #[test]
    fn json_lines_are_tagged() {
        let event: SupervisorEvent = OutputEvent::status(Role::Char, "started", false).into();
        let json = format_event_json(&event).unwrap();
        assert!(json.contains("\"type\":\"output\""));
        assert!(json.contains("\"role\":\"char\""));
    }
}
