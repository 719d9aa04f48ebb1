//! Deterministic recovery templates
//!
//! Classifies a disruption into a category, renders that category's embedded
//! catalog section against the flight details and synthesizes generic options
//! when the catalog has nothing to offer. Results from this crate are what
//! callers receive whenever model generation is unavailable or falls short.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod catalog;
pub mod classifier;
mod engine;
mod error;
mod generic;
mod render;

pub use classifier::{categorize, map_disruption_type_to_category};
pub use engine::TemplateRecoveryEngine;
pub use error::CatalogError;
