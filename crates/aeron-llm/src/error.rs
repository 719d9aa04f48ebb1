use thiserror::Error;

/// Errors that can occur during model calls and routing
#[derive(Debug, Error)]
pub enum LlmError {
    /// No provider is configured, initialized or selected
    #[error("no LLM provider available")]
    ProviderUnavailable,

    /// Named provider is not registered with the router
    #[error("provider not available: {provider}")]
    InvalidProviderName { provider: String },

    /// Upstream provider returned an error or could not be reached
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Upstream answered but the body was not usable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The generation context was cancelled or hit its deadline
    #[error("request cancelled before completion")]
    Cancelled,

    /// Provider could not be constructed from its configuration
    #[error("invalid provider configuration: {0}")]
    Configuration(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// Whether retrying the same call may succeed
    ///
    /// Configuration and selection errors never fix themselves, and a
    /// cancelled context stays cancelled.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::InvalidResponse(_) | Self::Internal(_))
    }

    /// Whether the error means no provider can serve the call at all
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable | Self::InvalidProviderName { .. })
    }
}
