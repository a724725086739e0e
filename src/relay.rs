//! Turns a collector run into either relayable bytes or a typed failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::IgnoredAny;

use crate::collector::{CollectorResult, CommandRunner};
use crate::utils::http_helpers::HTTPError;

/// Every way a scrape can fail. `Display` is the exact message sent to the client.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("Script failed: {0}")]
    ScriptFailure(String),
    #[error("Invalid JSON output from script")]
    InvalidOutput,
    #[error("Metrics script timeout")]
    Timeout,
    #[error("Failed to get metrics: {0}")]
    UnexpectedFailure(String),
}

impl RelayError {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::ScriptFailure(_) => "script_failure",
            RelayError::InvalidOutput => "invalid_output",
            RelayError::Timeout => "timeout",
            RelayError::UnexpectedFailure(_) => "unexpected_failure",
        }
    }
}

impl From<std::io::Error> for RelayError {
    fn from(e: std::io::Error) -> Self {
        RelayError::UnexpectedFailure(e.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

fn decode<'a>(stream: &str, bytes: &'a [u8]) -> Result<&'a str, RelayError> {
    std::str::from_utf8(bytes).map_err(|e| {
        RelayError::UnexpectedFailure(format!("collector {} is not valid UTF-8: {}", stream, e))
    })
}

/// Checks a finished run and hands back its stdout untouched.
///
/// Both streams must be valid UTF-8 before anything else is looked at. The
/// JSON is parsed only to prove it is well formed; the parsed value is thrown
/// away so field order and formatting reach the client as produced.
pub fn validate(result: CollectorResult) -> Result<Vec<u8>, RelayError> {
    if result.timed_out {
        return Err(RelayError::Timeout);
    }
    let stdout = decode("stdout", &result.stdout)?;
    let stderr = decode("stderr", &result.stderr)?;
    if !result.success() {
        return Err(RelayError::ScriptFailure(stderr.to_string()));
    }
    // NaN and Infinity literals are rejected, as RFC 8259 requires.
    if serde_json::from_str::<IgnoredAny>(stdout).is_err() {
        return Err(RelayError::InvalidOutput);
    }
    Ok(result.stdout)
}

/// Runs the collector once and validates what it produced.
pub async fn collect(runner: &dyn CommandRunner) -> Result<Vec<u8>, RelayError> {
    let result = runner.run().await?;
    validate(result)
}
