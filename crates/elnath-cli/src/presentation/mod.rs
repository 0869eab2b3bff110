//! Terminal rendering of supervisor events and status.

mod events;
mod status;

pub use events::{format_event, format_event_json, format_output};
pub use status::{format_status_table, state_style};
