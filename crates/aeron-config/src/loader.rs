use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result. An omitted `[llm]` section is
    /// filled from the provider environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error on out-of-range provider or generation settings
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_llm_config()?;
        self.validate_generation_config()?;
        Ok(())
    }

    fn validate_llm_config(&self) -> anyhow::Result<()> {
        for (name, provider) in &self.llm.providers {
            if !(0.0..=2.0).contains(&provider.temperature) {
                anyhow::bail!(
                    "temperature for provider '{name}' must be between 0 and 2, got {}",
                    provider.temperature
                );
            }
            if provider.max_tokens == 0 {
                anyhow::bail!("max_tokens for provider '{name}' must be greater than 0");
            }
            if provider.model.trim().is_empty() {
                anyhow::bail!("model for provider '{name}' must not be empty");
            }
        }

        let default = self.llm.default_provider.as_str();
        if !default.is_empty() && !self.llm.providers.is_empty() && !self.llm.providers.contains_key(default) {
            tracing::warn!(
                default_provider = %default,
                "default provider is not configured, the first usable provider will be selected"
            );
        }

        Ok(())
    }

    fn validate_generation_config(&self) -> anyhow::Result<()> {
        if self.generation.count == 0 {
            anyhow::bail!("generation.count must be at least 1");
        }
        if self.generation.health_check_timeout_secs == 0 {
            anyhow::bail!("generation.health_check_timeout_secs must be greater than 0");
        }
        if self.generation.timeout_secs == Some(0) {
            anyhow::bail!("generation.timeout_secs must be greater than 0 when set");
        }
        Ok(())
    }
}
