//! Google Generative Language API provider implementation

use aeron_config::LlmProviderConfig;
use aeron_core::GenerationContext;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ModelSettings, Provider};
use crate::error::LlmError;
use crate::protocol::google::{GoogleRequest, GoogleResponse};
use crate::types::{CompletionRequest, CompletionResponse};

/// Default Google Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Generative Language API provider
pub struct GoogleProvider {
    name: String,
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    settings: ModelSettings,
}

impl GoogleProvider {
    /// Create from provider configuration
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never happen).
    pub fn new(name: String, config: &LlmProviderConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        Self {
            name,
            client: Client::new(),
            base_url,
            api_key: config.api_key.clone(),
            settings: ModelSettings::from(config),
        }
    }

    /// Build the `generateContent` URL for a model
    fn generate_url(&self, model: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let key = self.api_key.as_ref().map(|k| k.expose_secret().to_owned()).unwrap_or_default();
        format!("{base}/models/{model}:generateContent?key={key}")
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        context: &GenerationContext,
    ) -> Result<CompletionResponse, LlmError> {
        let resolved = self.settings.resolve(request);
        let model = resolved.model.clone().unwrap_or_else(|| self.settings.model.clone());
        let wire_request = GoogleRequest::from(&resolved);

        let builder = self.client.post(self.generate_url(&model)).json(&wire_request);

        super::within_context(context, async {
            let wire_response: GoogleResponse = super::send_json(&self.name, builder).await?;
            Ok(wire_response.into_completion(&model))
        })
        .await
    }
}
