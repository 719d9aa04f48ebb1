use serde::Serialize;

use crate::UsageLogEntry;

/// Aggregate view over one provider's usage log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderStats {
    pub provider: String,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    /// Share of successful calls, 0 to 100
    pub success_rate: f64,
    pub total_cost: f64,
    pub average_cost: f64,
    pub total_tokens: u64,
    pub average_latency_ms: f64,
}

impl ProviderStats {
    /// Fold log entries into statistics; no entries yields all zeros
    #[allow(clippy::cast_precision_loss)]
    pub fn from_entries(provider: &str, entries: &[UsageLogEntry]) -> Self {
        let total_requests = entries.len();
        if total_requests == 0 {
            return Self {
                provider: provider.to_owned(),
                ..Self::default()
            };
        }

        let successful_requests = entries.iter().filter(|e| e.success).count();
        let total_cost: f64 = entries.iter().map(|e| e.cost.total).sum();
        let total_tokens = entries.iter().map(UsageLogEntry::total_tokens).sum();
        let total_latency: u64 = entries.iter().map(|e| e.duration_ms).sum();
        let count = total_requests as f64;

        Self {
            provider: provider.to_owned(),
            total_requests,
            successful_requests,
            failed_requests: total_requests - successful_requests,
            success_rate: successful_requests as f64 / count * 100.0,
            total_cost,
            average_cost: total_cost / count,
            total_tokens,
            average_latency_ms: total_latency as f64 / count,
        }
    }
}
