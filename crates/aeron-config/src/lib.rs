#![allow(clippy::must_use_candidate)]

mod env;
pub mod generation;
pub mod llm;
mod loader;
pub mod telemetry;
pub mod usage;

use serde::Deserialize;

pub use generation::*;
pub use llm::*;
pub use telemetry::TelemetryConfig;
pub use usage::*;

/// Top-level AERON configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// LLM provider configuration, read from the environment when omitted
    #[serde(default = "LlmConfig::from_env")]
    pub llm: LlmConfig,
    /// Recovery generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Usage log settings
    #[serde(default)]
    pub usage: UsageConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Config {
    /// Configuration with every section at its default and providers taken
    /// from the process environment
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::from_env(),
            ..Self::default()
        }
    }
}
