//! Process supervision building blocks.
//!
//! # Structure
//!
//! - `ProcessHandle` - lifecycle of one server process (start, stop, restart)
//! - `RolePublisher` - per-role status cell and event emitter shared by handles
//! - `SupervisorEventBroadcaster` - fan-out of events to observers
//! - `shutdown` - two-phase termination with forced-kill escalation

mod broadcaster;
mod command;
mod handle;
mod publisher;
pub mod shutdown;
mod stream;

pub use broadcaster::SupervisorEventBroadcaster;
pub(crate) use command::detached_command;
pub use handle::ProcessHandle;
pub use publisher::RolePublisher;
pub use shutdown::{ShutdownOutcome, shutdown_child};
