//! Process supervision engine for elnath.
//!
//! Runs the login, char and map servers as child processes, captures their
//! output line by line, and publishes output and lifecycle changes to any
//! number of subscribers through a [`Supervisor`].
//!
//! ```no_run
//! # async fn demo() {
//! use elnath_core::Role;
//! use elnath_runtime::{Supervisor, SupervisorConfig};
//!
//! let supervisor = Supervisor::new(SupervisorConfig::new("/srv/auriga"));
//! let mut events = supervisor.subscribe();
//! supervisor.start(Role::Map).await.ok();
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # }
//! ```

#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod process;
mod supervisor;

pub use client::{ClientLaunchError, launch_client, launch_client_setup};
pub use config::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_GRACE, DEFAULT_KILL_TIMEOUT, DEFAULT_RESTART_SETTLE,
    ShutdownPolicy, SupervisorConfig,
};
pub use error::ProcessError;
pub use process::{ProcessHandle, RolePublisher, SupervisorEventBroadcaster};
pub use supervisor::{RoleResult, Supervisor};
