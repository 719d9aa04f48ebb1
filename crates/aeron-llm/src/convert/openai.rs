//! Conversion between internal types and `OpenAI` wire format

use crate::protocol::openai::{OpenAiMessage, OpenAiRequest, OpenAiResponse};
use crate::types::{Choice, ChoiceMessage, CompletionRequest, CompletionResponse, FinishReason, Usage};

// -- Outbound: internal types -> OpenAI wire format --

impl From<&CompletionRequest> for OpenAiRequest {
    fn from(req: &CompletionRequest) -> Self {
        Self {
            model: req.model.clone().unwrap_or_default(),
            messages: req
                .messages
                .iter()
                .map(|m| OpenAiMessage {
                    role: m.role.as_str().to_owned(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: req.params.temperature,
            max_tokens: req.params.max_tokens,
        }
    }
}

// -- Inbound: OpenAI wire format -> internal types --

impl From<OpenAiResponse> for CompletionResponse {
    fn from(resp: OpenAiResponse) -> Self {
        Self {
            id: resp.id,
            model: resp.model,
            choices: resp
                .choices
                .into_iter()
                .map(|c| Choice {
                    index: c.index,
                    message: ChoiceMessage {
                        role: c.message.role,
                        content: c.message.content,
                    },
                    finish_reason: c.finish_reason.as_deref().and_then(FinishReason::from_wire),
                })
                .collect(),
            usage: resp.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{CompletionParams, Message};

    #[test]
    fn request_carries_resolved_settings() {
        let request = CompletionRequest {
            model: Some("gpt-3.5-turbo".to_owned()),
            messages: vec![Message::system("You are an airline ops planner"), Message::user("FZ181")],
            params: CompletionParams {
                temperature: Some(0.7),
                max_tokens: Some(4000),
            },
        };

        let wire = serde_json::to_value(OpenAiRequest::from(&request)).unwrap();

        assert_eq!(wire["model"], "gpt-3.5-turbo");
        assert_eq!(wire["messages"][0]["role"], "system");
        assert_eq!(wire["messages"][1]["content"], "FZ181");
        assert_eq!(wire["max_tokens"], 4000);
    }

    #[test]
    fn response_maps_choices_and_usage() {
        let wire: OpenAiResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "{\"options\": []}" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17 }
        }))
        .unwrap();

        let response = CompletionResponse::from(wire);

        assert_eq!(response.text(), "{\"options\": []}");
        assert_eq!(response.choices[0].finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.unwrap().total_tokens, 17);
    }
}
