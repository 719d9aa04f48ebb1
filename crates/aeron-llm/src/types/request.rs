use serde::{Deserialize, Serialize};

use super::message::Message;

/// Parameters controlling text generation
///
/// Unset fields fall back to the provider's configured settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    /// Sampling temperature (0.0 to 2.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Internal canonical completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model override; the provider's configured model when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Generation parameters
    #[serde(default)]
    pub params: CompletionParams,
}

impl CompletionRequest {
    /// Request with provider defaults for model and parameters
    pub const fn new(messages: Vec<Message>) -> Self {
        Self {
            model: None,
            messages,
            params: CompletionParams {
                temperature: None,
                max_tokens: None,
            },
        }
    }

    /// Concatenated message text, used for token estimation
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
