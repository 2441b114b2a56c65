//! Logging utilities for output
//!
//! Structured log lines for loading operations and plain console output
//! for the `inspect` command.

pub mod console;
pub mod log;

pub use log::{log_operation_complete, log_operation_start, log_warning};
