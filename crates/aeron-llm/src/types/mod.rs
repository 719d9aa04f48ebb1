//! Internal canonical types for LLM request/response representation
//!
//! These types are provider-agnostic; each wire protocol converts to and
//! from them at the HTTP boundary.

pub mod message;
pub mod request;
pub mod response;

pub use message::{Message, Role};
pub use request::{CompletionParams, CompletionRequest};
pub use response::{Choice, ChoiceMessage, CompletionResponse, FinishReason, Usage};
