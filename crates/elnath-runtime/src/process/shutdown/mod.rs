//! Process termination.

mod child;

pub use child::{ShutdownOutcome, shutdown_child, sweep_group};
