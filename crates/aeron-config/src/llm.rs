use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

/// Provider selected when `LLM_DEFAULT_PROVIDER` is not set
pub const DEFAULT_PROVIDER: &str = "openai";

/// Sampling temperature used when a provider does not set one
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Top-level LLM configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Provider to select at startup
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Provider configurations keyed by name, in preference order
    #[serde(default)]
    pub providers: IndexMap<String, LlmProviderConfig>,
}

/// Configuration for a single LLM provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmProviderConfig {
    /// Wire protocol spoken by the provider
    #[serde(rename = "type")]
    pub provider_type: LlmProviderType,
    /// Whether the provider may be initialized
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl LlmProviderConfig {
    /// Enabled and carrying a non-empty credential
    pub fn is_usable(&self) -> bool {
        self.enabled
            && self
                .api_key
                .as_ref()
                .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }
}

/// Supported LLM provider protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderType {
    /// OpenAI-compatible chat completions API
    Openai,
    /// Anthropic Messages API
    Anthropic,
    /// Google Generative Language API
    Google,
}

/// Environment layout of one built-in provider
struct EnvProvider {
    name: &'static str,
    prefix: &'static str,
    provider_type: LlmProviderType,
    model: &'static str,
    max_tokens: u32,
    base_url: Option<&'static str>,
}

/// Built-in providers in registry order
const ENV_PROVIDERS: [EnvProvider; 4] = [
    EnvProvider {
        name: "openai",
        prefix: "OPENAI",
        provider_type: LlmProviderType::Openai,
        model: "gpt-3.5-turbo",
        max_tokens: 4000,
        base_url: None,
    },
    EnvProvider {
        name: "anthropic",
        prefix: "ANTHROPIC",
        provider_type: LlmProviderType::Anthropic,
        model: "claude-3-sonnet-20240229",
        max_tokens: 32000,
        base_url: None,
    },
    EnvProvider {
        name: "gemini",
        prefix: "GEMINI",
        provider_type: LlmProviderType::Google,
        model: "gemini-pro",
        max_tokens: 8192,
        base_url: None,
    },
    EnvProvider {
        name: "grok",
        prefix: "GROK",
        provider_type: LlmProviderType::Openai,
        model: "grok-beta",
        max_tokens: 4000,
        base_url: Some("https://api.x.ai/v1"),
    },
];

impl LlmConfig {
    /// Build the provider registry from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the provider registry from environment-style key lookups
    ///
    /// Reads `LLM_DEFAULT_PROVIDER` plus `<P>_API_KEY`, `<P>_MODEL`,
    /// `<P>_TEMPERATURE`, `<P>_MAX_TOKENS` for `OPENAI`, `ANTHROPIC`,
    /// `GEMINI` and `GROK`, and `GROK_BASE_URL`. A provider without an API
    /// key is kept in the registry but disabled.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: String| lookup(&key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let default_provider = read("LLM_DEFAULT_PROVIDER".to_owned()).unwrap_or_else(default_provider);

        let providers = ENV_PROVIDERS
            .iter()
            .map(|spec| {
                let prefix = spec.prefix;
                let api_key = read(format!("{prefix}_API_KEY"));

                let temperature = read(format!("{prefix}_TEMPERATURE"))
                    .and_then(|raw| parse_or_warn(&raw, prefix, "TEMPERATURE"))
                    .unwrap_or(DEFAULT_TEMPERATURE);
                let max_tokens = read(format!("{prefix}_MAX_TOKENS"))
                    .and_then(|raw| parse_or_warn(&raw, prefix, "MAX_TOKENS"))
                    .unwrap_or(spec.max_tokens);

                let base_url = read(format!("{prefix}_BASE_URL"))
                    .or_else(|| spec.base_url.map(str::to_owned))
                    .and_then(|raw| parse_or_warn::<Url>(&raw, prefix, "BASE_URL"));

                let config = LlmProviderConfig {
                    provider_type: spec.provider_type,
                    enabled: api_key.is_some(),
                    api_key: api_key.map(SecretString::from),
                    base_url,
                    model: read(format!("{prefix}_MODEL")).unwrap_or_else(|| spec.model.to_owned()),
                    temperature,
                    max_tokens,
                };

                (spec.name.to_owned(), config)
            })
            .collect();

        Self {
            default_provider,
            providers,
        }
    }

    /// Providers that are enabled and carry a credential, in order
    pub fn usable_providers(&self) -> impl Iterator<Item = (&str, &LlmProviderConfig)> {
        self.providers
            .iter()
            .filter(|(_, config)| config.is_usable())
            .map(|(name, config)| (name.as_str(), config))
    }
}

fn parse_or_warn<T: std::str::FromStr>(raw: &str, prefix: &str, field: &str) -> Option<T> {
    raw.parse()
        .inspect_err(|_| tracing::warn!(prefix, field, value = %raw, "ignoring unparseable provider setting"))
        .ok()
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_tokens() -> u32 {
    4000
}
