//! Recovery option generation
//!
//! [`RecoveryOrchestrator`] asks the current model provider for recovery
//! options, either all at once or one option per call, validates what comes
//! back and falls back to the template catalog whenever the model path cannot
//! deliver.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
pub mod merge;
pub mod normalize;
mod orchestrator;
pub mod parse;
pub mod prompt;

pub use error::RecoveryError;
pub use orchestrator::RecoveryOrchestrator;
