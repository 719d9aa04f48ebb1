use std::time::Duration;

use serde::Deserialize;

/// Recovery generation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Number of options to request
    #[serde(default = "default_count")]
    pub count: usize,
    /// Retries per model call after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff unit; attempt `n` waits `n` units
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Pause between successful incremental option calls
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
    /// Force incremental mode even for small counts
    #[serde(default)]
    pub incremental: bool,
    /// Overall deadline for one generation request
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Deadline for the router health probe
    #[serde(default = "default_health_check_timeout_secs")]
    pub health_check_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            pacing_ms: default_pacing_ms(),
            incremental: false,
            timeout_secs: None,
            health_check_timeout_secs: default_health_check_timeout_secs(),
        }
    }
}

impl GenerationConfig {
    pub const fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub const fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub const fn health_check_timeout(&self) -> Duration {
        Duration::from_secs(self.health_check_timeout_secs)
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_count() -> usize {
    3
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_retries() -> u32 {
    2
}

#[allow(clippy::missing_const_for_fn)]
fn default_backoff_base_ms() -> u64 {
    1000
}

#[allow(clippy::missing_const_for_fn)]
fn default_pacing_ms() -> u64 {
    500
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_check_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let config: GenerationConfig = toml::from_str("").unwrap();

        assert_eq!(config.count, 3);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.backoff_base(), Duration::from_secs(1));
        assert_eq!(config.pacing(), Duration::from_millis(500));
        assert!(!config.incremental);
        assert!(config.timeout().is_none());
        assert_eq!(config.health_check_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn parses_overrides() {
        let config: GenerationConfig = toml::from_str(
            r"
            count = 5
            max_retries = 1
            backoff_base_ms = 250
            incremental = true
            timeout_secs = 90
            ",
        )
        .unwrap();

        assert_eq!(config.count, 5);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.backoff_base(), Duration::from_millis(250));
        assert!(config.incremental);
        assert_eq!(config.timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<GenerationConfig, _> = toml::from_str("retries = 4");
        assert!(result.is_err());
    }
}
