//! Status table for the `status` command.

use std::fmt::Write;

use console::Style;
use elnath_core::{ProcessState, ProcessStatus, Role};

/// Colour for a state: green running, yellow in transition, red errored.
pub fn state_style(state: ProcessState) -> Style {
    match state {
        ProcessState::Running => Style::new().green(),
        ProcessState::Starting | ProcessState::Stopping => Style::new().yellow(),
        ProcessState::Errored => Style::new().red(),
        ProcessState::Stopped => Style::new().dim(),
    }
}

/// Aligned `server  state  pid` rows.
pub fn format_status_table(snapshot: &[(Role, ProcessStatus)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<8}{:<12}PID", "SERVER", "STATE");
    for (role, status) in snapshot {
        let pid = status
            .pid()
            .map_or_else(|| "-".to_string(), |pid| pid.to_string());
        // Pad before styling so escape codes don't skew the columns.
        let state = format!("{:<12}", status.state().as_str());
        let _ = writeln!(
            out,
            "{:<8}{}{pid}",
            role.as_str(),
            state_style(status.state()).apply_to(state)
        );
    }
    out
}
