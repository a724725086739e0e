//! Shared application state.
//!
//! Holds what every request handler needs: the configuration and the
//! collector runner. Nothing in here is mutated after startup.

use crate::collector::CommandRunner;
use crate::config::ConfigV1;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Runs the external collector; replaced by stubs in tests.
    pub collector: Arc<dyn CommandRunner>,
}
