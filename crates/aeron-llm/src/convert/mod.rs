//! Conversion between internal canonical types and wire formats
//!
//! Requests are converted after the provider has resolved its model and
//! parameter defaults, so every outbound field is already concrete.

pub mod anthropic;
pub mod google;
pub mod openai;
