//! Mock LLM backend server for integration tests
//!
//! Speaks just enough of the OpenAI chat completions and Anthropic messages
//! APIs to exercise the providers, replaying scripted replies in order

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Reply used once the script runs out
const DEFAULT_REPLY: &str = "Hello from mock LLM";

/// Mock LLM backend that returns predictable responses
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

struct MockLlmState {
    completion_count: AtomicU32,
    /// Number of requests to fail before succeeding (0 = never fail)
    fail_count: AtomicU32,
    /// Replies handed out one per request before falling back to the default
    script: Mutex<VecDeque<String>>,
    /// Text of the last user message of every request, in arrival order
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, Vec::new()).await
    }

    /// Start a mock server that fails the first `n` requests with 500
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n, Vec::new()).await
    }

    /// Start a mock server that replays `replies` in order
    pub async fn start_with_replies<I, S>(replies: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::start_inner(0, replies.into_iter().map(Into::into).collect()).await
    }

    async fn start_inner(fail_count: u32, script: Vec<String>) -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState {
            completion_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .route("/v1/messages", routing::post(handle_messages))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as a provider
    ///
    /// Includes `/v1` since the providers append `/chat/completions` or `/messages`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of completion requests received, failed ones included
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }

    /// Last user message of every request received
    pub fn prompts(&self) -> Vec<String> {
        self.state.prompts.lock().unwrap().clone()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Wire types --

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatCompletionResponse {
    id: String,
    object: String,
    created: u64,
    model: String,
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Debug, Serialize)]
struct Choice {
    index: u32,
    message: ResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Serialize)]
struct ResponseMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesResponse {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    role: String,
    model: String,
    content: Vec<TextBlock>,
    stop_reason: String,
    usage: MessagesUsage,
}

#[derive(Debug, Serialize)]
struct TextBlock {
    #[serde(rename = "type")]
    kind: String,
    text: String,
}

#[derive(Debug, Serialize)]
struct MessagesUsage {
    input_tokens: u32,
    output_tokens: u32,
}

// -- Handlers --

impl MockLlmState {
    /// Count the request and pick its reply, or `None` when it should fail
    fn next_reply(&self, req: &ChatRequest) -> Option<String> {
        self.completion_count.fetch_add(1, Ordering::Relaxed);

        let prompt = req
            .messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| match &m.content {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);

        // If fail_count > 0, decrement and fail
        let remaining = self.fail_count.load(Ordering::Relaxed);
        if remaining > 0 {
            self.fail_count.fetch_sub(1, Ordering::Relaxed);
            return None;
        }

        Some(
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| DEFAULT_REPLY.to_owned()),
        )
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": {
                "message": "mock server intentional failure",
                "type": "server_error"
            }
        })),
    )
        .into_response()
}

async fn handle_chat_completions(State(state): State<Arc<MockLlmState>>, Json(req): Json<ChatRequest>) -> Response {
    let Some(content) = state.next_reply(&req) else {
        return server_error();
    };

    let response = ChatCompletionResponse {
        id: "chatcmpl-test-123".to_owned(),
        object: "chat.completion".to_owned(),
        created: 1_700_000_000,
        model: req.model,
        choices: vec![Choice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_owned(),
                content,
            },
            finish_reason: "stop".to_owned(),
        }],
        usage: Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        },
    };

    Json(response).into_response()
}

async fn handle_messages(State(state): State<Arc<MockLlmState>>, Json(req): Json<ChatRequest>) -> Response {
    let Some(text) = state.next_reply(&req) else {
        return server_error();
    };

    let response = MessagesResponse {
        id: "msg_test_123".to_owned(),
        kind: "message".to_owned(),
        role: "assistant".to_owned(),
        model: req.model,
        content: vec![TextBlock {
            kind: "text".to_owned(),
            text,
        }],
        stop_reason: "end_turn".to_owned(),
        usage: MessagesUsage {
            input_tokens: 10,
            output_tokens: 5,
        },
    };

    Json(response).into_response()
}
