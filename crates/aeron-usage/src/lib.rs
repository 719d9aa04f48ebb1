//! Usage accounting for model calls
//!
//! Every provider call appends one JSON line to `<dir>/<provider>-usage.log`.
//! The same files are read back to answer log-tail and statistics queries.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod entry;
pub mod error;
pub mod log;
pub mod pricing;
pub mod stats;

pub use entry::{CostEstimate, RequestSummary, ResponseSummary, UsageLogEntry};
pub use error::UsageError;
pub use log::UsageLog;
pub use pricing::{ProviderPricing, estimate_cost, pricing_for};
pub use stats::ProviderStats;
