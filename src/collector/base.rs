use std::sync::Arc;

use async_trait::async_trait;

use super::shell_runner::ShellRunner;
use crate::config::CollectorConfig;

/// What one collector run produced. Owned by a single request and dropped
/// once the response is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorResult {
    /// `None` when the process was terminated by a signal or never finished.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
}

impl CollectorResult {
    /// A finished run with the given exit code and captured output.
    pub fn completed(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        CollectorResult {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: stderr.into(),
            timed_out: false,
        }
    }

    /// A run that was killed after exceeding its time limit. Partial output is not kept.
    pub fn timed_out() -> Self {
        CollectorResult {
            timed_out: true,
            ..Default::default()
        }
    }

    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs the external metrics collector once.
///
/// Implementations take no input and must enforce their own time limit,
/// reporting an overrun through [`CollectorResult::timed_out`]. An `Err`
/// means the run could not be carried out at all (spawn failure, pipe error).
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// A printable form of the command, for logs.
    fn describe(&self) -> String;

    async fn run(&self) -> std::io::Result<CollectorResult>;
}

/// Create the command runner for the given config.
pub fn create_runner(config: &CollectorConfig) -> Arc<dyn CommandRunner> {
    Arc::new(ShellRunner::new(config))
}
