//! Model routing for AERON
//!
//! Provides a uniform [`Provider`] interface over the `OpenAI`, Anthropic and
//! Google wire protocols (Grok rides on the `OpenAI`-compatible client), an
//! instrumenting decorator that records every call to the usage log, and the
//! [`ModelRouter`] that owns the provider registry and the current selection.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod instrumented;
pub mod protocol;
pub mod provider;
pub mod router;
pub mod tokens;
pub mod types;

pub use error::LlmError;
pub use instrumented::InstrumentedProvider;
pub use provider::{ModelSettings, Provider};
pub use router::{HealthReport, HealthStatus, ModelRouter, ProviderInfo, ProviderListing, ProviderSwitch};
pub use types::{CompletionParams, CompletionRequest, CompletionResponse, Message, Role};
