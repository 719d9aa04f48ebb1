//! Programmatic configuration builder for integration tests

use aeron_config::{Config, GenerationConfig, LlmConfig, LlmProviderConfig, LlmProviderType};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with no providers and fast retries
    pub fn new() -> Self {
        Self {
            config: Config {
                llm: LlmConfig::default(),
                generation: GenerationConfig {
                    backoff_base_ms: 1,
                    pacing_ms: 0,
                    health_check_timeout_secs: 5,
                    ..GenerationConfig::default()
                },
                ..Config::default()
            },
        }
    }

    fn with_provider(mut self, name: &str, provider_type: LlmProviderType, base_url: &str) -> Self {
        if self.config.llm.providers.is_empty() {
            self.config.llm.default_provider = name.to_owned();
        }
        self.config.llm.providers.insert(
            name.to_owned(),
            LlmProviderConfig {
                provider_type,
                enabled: true,
                api_key: Some(SecretString::from("test-key")),
                base_url: Some(base_url.parse().expect("valid URL")),
                model: "mock-model-1".to_owned(),
                temperature: 0.7,
                max_tokens: 1024,
            },
        );
        self
    }

    /// Add an OpenAI-compatible provider pointed at a mock backend
    ///
    /// The first provider added becomes the default.
    pub fn with_openai_provider(self, name: &str, base_url: &str) -> Self {
        self.with_provider(name, LlmProviderType::Openai, base_url)
    }

    /// Add an Anthropic provider pointed at a mock backend
    pub fn with_anthropic_provider(self, name: &str, base_url: &str) -> Self {
        self.with_provider(name, LlmProviderType::Anthropic, base_url)
    }

    /// Add a provider that has no API key and is therefore never initialized
    pub fn with_keyless_provider(mut self, name: &str) -> Self {
        self.config.llm.providers.insert(
            name.to_owned(),
            LlmProviderConfig {
                provider_type: LlmProviderType::Openai,
                enabled: true,
                api_key: None,
                base_url: None,
                model: "gpt-3.5-turbo".to_owned(),
                temperature: 0.7,
                max_tokens: 4000,
            },
        );
        self
    }

    /// Select the provider used at startup
    pub fn with_default_provider(mut self, name: &str) -> Self {
        self.config.llm.default_provider = name.to_owned();
        self
    }

    /// Adjust generation settings
    pub fn with_generation(mut self, update: impl FnOnce(&mut GenerationConfig)) -> Self {
        update(&mut self.config.generation);
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
