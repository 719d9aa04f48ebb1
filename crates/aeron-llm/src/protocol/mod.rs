//! Wire format types for provider-specific API protocols
//!
//! Each module contains pure serde structs matching the respective provider's
//! JSON API format, limited to the text-completion subset AERON uses.

pub mod anthropic;
pub mod google;
pub mod openai;
