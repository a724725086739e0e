//! Execution of the external metrics collector.
//!
//! The [`CommandRunner`] trait is the seam between the HTTP layer and the
//! operating system; [`ShellRunner`] is the production implementation.

mod base;
mod shell_runner;

pub use base::{create_runner, CollectorResult, CommandRunner};
pub use shell_runner::ShellRunner;
