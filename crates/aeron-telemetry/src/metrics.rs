//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::global;
use opentelemetry::metrics::{Histogram, Meter};

/// Meter all AERON instruments are created from
///
/// Instruments are no-ops until [`crate::init`] installs an exporting
/// meter provider.
pub fn meter() -> Meter {
    global::meter("aeron")
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    let duration = start.elapsed().as_secs_f64();
    histogram.record(duration, attributes);
}

// LLM metric names
pub const LLM_REQUEST_DURATION: &str = "llm.request.duration";
pub const LLM_REQUEST_COUNT: &str = "llm.request.count";
pub const LLM_TOKEN_USAGE: &str = "llm.token.usage";

// Recovery metric names
pub const RECOVERY_GENERATION_DURATION: &str = "recovery.generation.duration";
pub const RECOVERY_OPTIONS_GENERATED: &str = "recovery.options.generated";
