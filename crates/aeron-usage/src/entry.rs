use serde::{Deserialize, Serialize};

/// One provider call as recorded in the usage log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    /// RFC 3339 time the call finished
    pub timestamp: String,
    pub provider: String,
    pub model: String,
    pub request: RequestSummary,
    pub response: ResponseSummary,
    /// Wall-clock duration of the call
    pub duration_ms: u64,
    pub success: bool,
    /// Error message for failed calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub cost: CostEstimate,
}

impl UsageLogEntry {
    /// Estimated input plus output tokens
    pub const fn total_tokens(&self) -> u64 {
        self.request.estimated_input_tokens + self.response.estimated_output_tokens
    }
}

/// Shape of the prompt that was sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub message_count: usize,
    pub estimated_input_tokens: u64,
}

/// Shape of the completion that came back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSummary {
    /// Response length in characters
    pub length: usize,
    pub estimated_output_tokens: u64,
}

/// Estimated cost of one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub input: f64,
    pub output: f64,
    pub total: f64,
    pub currency: String,
}

impl Default for CostEstimate {
    fn default() -> Self {
        Self {
            input: 0.0,
            output: 0.0,
            total: 0.0,
            currency: crate::pricing::CURRENCY.to_owned(),
        }
    }
}
