//! Conversion between internal types and Google Generative Language wire format

use crate::protocol::google::{GoogleContent, GoogleGenerationConfig, GooglePart, GoogleRequest, GoogleResponse};
use crate::types::{Choice, ChoiceMessage, CompletionRequest, CompletionResponse, FinishReason, Role, Usage};

// -- Outbound: internal types -> Google wire format --

impl From<&CompletionRequest> for GoogleRequest {
    fn from(req: &CompletionRequest) -> Self {
        let system_parts: Vec<GooglePart> = req
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| GooglePart {
                text: Some(m.content.clone()),
            })
            .collect();

        let contents = req
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| GoogleContent {
                role: Some(if m.role == Role::Assistant { "model" } else { "user" }.to_owned()),
                parts: vec![GooglePart {
                    text: Some(m.content.clone()),
                }],
            })
            .collect();

        let generation_config = (req.params.temperature.is_some() || req.params.max_tokens.is_some()).then(|| {
            GoogleGenerationConfig {
                temperature: req.params.temperature,
                max_output_tokens: req.params.max_tokens,
            }
        });

        Self {
            contents,
            system_instruction: (!system_parts.is_empty()).then_some(GoogleContent {
                role: None,
                parts: system_parts,
            }),
            generation_config,
        }
    }
}

// -- Inbound: Google wire format -> internal types --

impl GoogleResponse {
    /// Convert into the canonical response, labelling it with the requested model
    pub fn into_completion(self, requested_model: &str) -> CompletionResponse {
        let choices = self
            .candidates
            .into_iter()
            .enumerate()
            .map(|(position, candidate)| {
                let text: String = candidate.content.parts.into_iter().filter_map(|p| p.text).collect();
                Choice {
                    index: candidate
                        .index
                        .unwrap_or_else(|| u32::try_from(position).unwrap_or(u32::MAX)),
                    message: ChoiceMessage::text(text),
                    finish_reason: candidate.finish_reason.as_deref().and_then(FinishReason::from_wire),
                }
            })
            .collect();

        CompletionResponse {
            id: format!("gen-{}", uuid::Uuid::new_v4().simple()),
            model: self.model_version.unwrap_or_else(|| requested_model.to_owned()),
            choices,
            usage: self.usage_metadata.map(|u| Usage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
        }
    }
}
