use aeron_llm::LlmError;
use thiserror::Error;

/// Failures inside model-backed generation
///
/// None of these reach callers of the orchestrator's entrypoint; each one
/// ends in the template result.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// No provider can serve the request; retrying cannot help
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(#[source] LlmError),

    /// A single call failed or returned unusable output
    #[error("transient generation failure: {0}")]
    Transient(String),

    /// Every attempt for a call failed
    #[error("generation failed after {attempts} attempts: {last_error}")]
    TotalGenerationFailure { attempts: u32, last_error: String },

    /// Disruption lacks a flight identifier
    #[error("disruption has no flight number")]
    MalformedDisruption,

    /// The generation context was cancelled or expired
    #[error("generation cancelled")]
    Cancelled,
}

impl RecoveryError {
    /// Whether another attempt of the same call may succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<LlmError> for RecoveryError {
    fn from(e: LlmError) -> Self {
        if e.is_unavailable() {
            return Self::ProviderUnavailable(e);
        }
        match e {
            LlmError::Cancelled => Self::Cancelled,
            LlmError::Configuration(_) => Self::ProviderUnavailable(e),
            other => Self::Transient(other.to_string()),
        }
    }
}
