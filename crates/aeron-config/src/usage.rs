use std::path::PathBuf;

use serde::Deserialize;

/// Per-provider usage log settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsageConfig {
    /// Directory holding `<provider>-usage.log` files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
