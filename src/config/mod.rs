// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod collector;
pub mod logging;
pub mod types;

pub use collector::*;
pub use logging::*;
pub use types::*;

/// Errors raised while loading or validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
