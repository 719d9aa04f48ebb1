//! Provider trait and implementations for LLM backends

pub mod anthropic;
pub mod google;
pub mod openai;

use std::sync::Arc;

use aeron_config::{LlmProviderConfig, LlmProviderType};
use aeron_core::GenerationContext;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::LlmError;
use crate::types::{CompletionParams, CompletionRequest, CompletionResponse};

/// Trait implemented by each LLM provider backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Registry name of the provider
    fn name(&self) -> &str;

    /// Model used when a request does not override it
    fn model(&self) -> &str;

    /// Send a completion request
    ///
    /// Returns [`LlmError::Cancelled`] as soon as `context` is cancelled or
    /// its deadline passes, abandoning the in-flight HTTP exchange.
    async fn complete(
        &self,
        request: &CompletionRequest,
        context: &GenerationContext,
    ) -> Result<CompletionResponse, LlmError>;
}

/// Model and sampling defaults a provider applies to every request
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ModelSettings {
    /// Copy of `request` with every unset field taken from these settings
    pub fn resolve(&self, request: &CompletionRequest) -> CompletionRequest {
        CompletionRequest {
            model: Some(request.model.clone().unwrap_or_else(|| self.model.clone())),
            messages: request.messages.clone(),
            params: CompletionParams {
                temperature: Some(request.params.temperature.unwrap_or(self.temperature)),
                max_tokens: Some(request.params.max_tokens.unwrap_or(self.max_tokens)),
            },
        }
    }
}

impl From<&LlmProviderConfig> for ModelSettings {
    fn from(config: &LlmProviderConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Construct the client for one configured provider
///
/// # Errors
///
/// Returns [`LlmError::Configuration`] when the provider is disabled or has
/// no API key.
pub fn build_provider(name: &str, config: &LlmProviderConfig) -> Result<Arc<dyn Provider>, LlmError> {
    if !config.is_usable() {
        return Err(LlmError::Configuration(format!(
            "provider {name} is disabled or missing an API key"
        )));
    }

    let provider: Arc<dyn Provider> = match config.provider_type {
        LlmProviderType::Openai => Arc::new(openai::OpenAiProvider::new(name.to_owned(), config)),
        LlmProviderType::Anthropic => Arc::new(anthropic::AnthropicProvider::new(name.to_owned(), config)),
        LlmProviderType::Google => Arc::new(google::GoogleProvider::new(name.to_owned(), config)),
    };

    Ok(provider)
}

/// Send a prepared request and decode a successful JSON body
async fn send_json<T: DeserializeOwned>(provider: &str, builder: reqwest::RequestBuilder) -> Result<T, LlmError> {
    let response = builder.send().await.map_err(|e| {
        tracing::error!(provider, error = %e, "upstream request failed");
        LlmError::Upstream(e.to_string())
    })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(provider, status = %status, "upstream returned error");
        return Err(LlmError::Upstream(format!("provider returned {status}: {body}")));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))
}

/// Run `call` under `context`, mapping cancellation to [`LlmError::Cancelled`]
async fn within_context<F>(context: &GenerationContext, call: F) -> Result<CompletionResponse, LlmError>
where
    F: Future<Output = Result<CompletionResponse, LlmError>> + Send,
{
    let response = context.run(call).await.ok_or(LlmError::Cancelled)??;

    if response.choices.is_empty() {
        return Err(LlmError::InvalidResponse("provider returned no choices".to_owned()));
    }

    Ok(response)
}
