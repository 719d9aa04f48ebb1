//! Fixed per-provider token rates

use crate::CostEstimate;

/// Currency all estimates are expressed in
pub const CURRENCY: &str = "USD";

/// Token rates for one provider, in USD per 1K tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderPricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl ProviderPricing {
    /// Estimate the cost of a call with the given token counts
    #[allow(clippy::cast_precision_loss)]
    pub fn estimate(&self, input_tokens: u64, output_tokens: u64) -> CostEstimate {
        let input = (input_tokens as f64 / 1000.0) * self.input_per_1k;
        let output = (output_tokens as f64 / 1000.0) * self.output_per_1k;
        CostEstimate {
            input,
            output,
            total: input + output,
            currency: CURRENCY.to_owned(),
        }
    }
}

/// Rate table; the first entry also prices unrecognized providers
const RATES: [(&str, ProviderPricing); 4] = [
    (
        "openai",
        ProviderPricing {
            input_per_1k: 0.0015,
            output_per_1k: 0.002,
        },
    ),
    (
        "anthropic",
        ProviderPricing {
            input_per_1k: 0.003,
            output_per_1k: 0.015,
        },
    ),
    (
        "gemini",
        ProviderPricing {
            input_per_1k: 0.0005,
            output_per_1k: 0.0015,
        },
    ),
    (
        "grok",
        ProviderPricing {
            input_per_1k: 0.002,
            output_per_1k: 0.01,
        },
    ),
];

/// Rates for `provider`, falling back to the first table entry
pub fn pricing_for(provider: &str) -> ProviderPricing {
    RATES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(provider))
        .map_or(RATES[0].1, |(_, pricing)| *pricing)
}

/// Estimate the cost of a call against `provider`
pub fn estimate_cost(provider: &str, input_tokens: u64, output_tokens: u64) -> CostEstimate {
    pricing_for(provider).estimate(input_tokens, output_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anthropic_rates() {
        let cost = estimate_cost("anthropic", 2000, 1000);
        // 2K * 0.003 + 1K * 0.015 = 0.006 + 0.015
        assert!((cost.input - 0.006).abs() < 1e-9);
        assert!((cost.output - 0.015).abs() < 1e-9);
        assert!((cost.total - 0.021).abs() < 1e-9);
        assert_eq!(cost.currency, "USD");
    }

    #[test]
    fn unknown_provider_uses_first_rates() {
        assert_eq!(pricing_for("local-llama"), pricing_for("openai"));
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(pricing_for("Gemini"), pricing_for("gemini"));
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        let cost = estimate_cost("grok", 0, 0);
        assert!(cost.total.abs() < f64::EPSILON);
    }
}
