//! Conversion between internal types and Anthropic wire format

use crate::protocol::anthropic::{AnthropicMessage, AnthropicRequest, AnthropicResponse, AnthropicResponseBlock};
use crate::types::{Choice, ChoiceMessage, CompletionRequest, CompletionResponse, FinishReason, Role, Usage};

/// Default max tokens when not specified (Anthropic requires this field)
const DEFAULT_MAX_TOKENS: u32 = 4096;

// -- Outbound: internal types -> Anthropic wire format --

impl From<&CompletionRequest> for AnthropicRequest {
    fn from(req: &CompletionRequest) -> Self {
        // System messages are hoisted into the top-level field
        let system: Vec<&str> = req
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let messages = req
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| AnthropicMessage {
                role: m.role.as_str().to_owned(),
                content: m.content.clone(),
            })
            .collect();

        Self {
            model: req.model.clone().unwrap_or_default(),
            max_tokens: req.params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages,
            temperature: req.params.temperature,
        }
    }
}

// -- Inbound: Anthropic wire format -> internal types --

impl From<AnthropicResponse> for CompletionResponse {
    fn from(resp: AnthropicResponse) -> Self {
        let text: String = resp
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicResponseBlock::Text { text } => Some(text),
                AnthropicResponseBlock::Other => None,
            })
            .collect();

        Self {
            id: resp.id,
            model: resp.model,
            choices: vec![Choice {
                index: 0,
                message: ChoiceMessage::text(text),
                finish_reason: resp.stop_reason.as_deref().and_then(FinishReason::from_wire),
            }],
            usage: Some(Usage {
                prompt_tokens: resp.usage.input_tokens,
                completion_tokens: resp.usage.output_tokens,
                total_tokens: resp.usage.input_tokens + resp.usage.output_tokens,
            }),
        }
    }
}
