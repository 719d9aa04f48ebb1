//! Usage-recording decorator around a provider

use std::sync::Arc;
use std::time::Instant;

use aeron_core::GenerationContext;
use aeron_telemetry::metrics::{self, LLM_REQUEST_COUNT, LLM_REQUEST_DURATION, LLM_TOKEN_USAGE};
use aeron_telemetry::{Counter, Histogram, KeyValue};
use aeron_usage::{RequestSummary, ResponseSummary, UsageLog, UsageLogEntry};
use async_trait::async_trait;

use crate::error::LlmError;
use crate::provider::Provider;
use crate::tokens::estimate_tokens;
use crate::types::{CompletionRequest, CompletionResponse};

/// Provider wrapper that records every call to the usage log
///
/// Success or failure, exactly one entry is appended per call. Failing to
/// write the entry never changes the outcome returned to the caller.
pub struct InstrumentedProvider {
    inner: Arc<dyn Provider>,
    usage: Arc<UsageLog>,
    duration: Histogram<f64>,
    requests: Counter<u64>,
    tokens: Counter<u64>,
}

impl InstrumentedProvider {
    pub fn new(inner: Arc<dyn Provider>, usage: Arc<UsageLog>) -> Self {
        let meter = metrics::meter();
        Self {
            inner,
            usage,
            duration: meter.f64_histogram(LLM_REQUEST_DURATION).with_unit("s").build(),
            requests: meter.u64_counter(LLM_REQUEST_COUNT).build(),
            tokens: meter.u64_counter(LLM_TOKEN_USAGE).build(),
        }
    }

    /// The wrapped provider
    pub fn inner(&self) -> &Arc<dyn Provider> {
        &self.inner
    }

    fn entry(
        &self,
        request: &CompletionRequest,
        result: &Result<CompletionResponse, LlmError>,
        duration_ms: u64,
    ) -> UsageLogEntry {
        let input_tokens = estimate_tokens(&request.prompt_text());
        let (model, output) = match result {
            Ok(response) => (response.model.clone(), response.text()),
            Err(_) => (request.model.clone().unwrap_or_else(|| self.inner.model().to_owned()), ""),
        };
        let output_tokens = estimate_tokens(output);

        UsageLogEntry {
            timestamp: aeron_core::now_rfc3339(),
            provider: self.inner.name().to_owned(),
            model,
            request: RequestSummary {
                message_count: request.messages.len(),
                estimated_input_tokens: input_tokens,
            },
            response: ResponseSummary {
                length: output.chars().count(),
                estimated_output_tokens: output_tokens,
            },
            duration_ms,
            success: result.is_ok(),
            error: result.as_ref().err().map(ToString::to_string),
            cost: aeron_usage::estimate_cost(self.inner.name(), input_tokens, output_tokens),
        }
    }
}

#[async_trait]
impl Provider for InstrumentedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        context: &GenerationContext,
    ) -> Result<CompletionResponse, LlmError> {
        let start = Instant::now();
        let result = self.inner.complete(request, context).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let entry = self.entry(request, &result, duration_ms);

        let attributes = [
            KeyValue::new("provider", entry.provider.clone()),
            KeyValue::new("success", entry.success),
        ];
        metrics::record_duration(&self.duration, start, &attributes);
        self.requests.add(1, &attributes);
        self.tokens.add(entry.total_tokens(), &attributes[..1]);

        match &entry.error {
            None => tracing::info!(
                provider = %entry.provider,
                model = %entry.model,
                duration_ms,
                input_tokens = entry.request.estimated_input_tokens,
                output_tokens = entry.response.estimated_output_tokens,
                cost = entry.cost.total,
                "model call succeeded"
            ),
            Some(error) => tracing::error!(
                provider = %entry.provider,
                model = %entry.model,
                duration_ms,
                error = %error,
                "model call failed"
            ),
        }

        if let Err(e) = self.usage.append(&entry).await {
            tracing::warn!(provider = %entry.provider, error = %e, "failed to write usage log entry");
        }

        result
    }
}
