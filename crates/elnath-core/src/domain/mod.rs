//! Core domain types.
//!
//! - `role` - the fixed set of supervised server kinds
//! - `status` - per-process lifecycle state

mod role;
mod status;

pub use role::{ParseRoleError, Role};
pub use status::{ProcessState, ProcessStatus};
