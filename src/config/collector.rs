use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// CollectorConfig describes the external command invoked for every scrape.
/// The command line is `<shell> <script>`, with no extra arguments.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct CollectorConfig {
    /// Interpreter used to run the script, e.g. "/bin/bash".
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Path to the collector script.
    #[serde(default = "default_script")]
    pub script: String,
    /// Wall-clock limit for one collector run.
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

fn default_shell() -> String {
    "/bin/bash".to_string()
}

fn default_script() -> String {
    "/tools/metrics.sh".to_string()
}

fn default_timeout_in_ms() -> u64 {
    5000
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            shell: default_shell(),
            script: default_script(),
            timeout_in_ms: default_timeout_in_ms(),
        }
    }
}

impl CollectorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shell.trim().is_empty() {
            return Err(ConfigError::Invalid("collector.shell must not be empty".into()));
        }
        if self.script.trim().is_empty() {
            return Err(ConfigError::Invalid("collector.script must not be empty".into()));
        }
        if self.timeout_in_ms == 0 {
            return Err(ConfigError::Invalid(
                "collector.timeout_in_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
