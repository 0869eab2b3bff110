//! Small helpers shared by adapters.

pub mod validation;
