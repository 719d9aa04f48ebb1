//! Token estimation for usage accounting

use std::sync::LazyLock;

use tiktoken_rs::{CoreBPE, o200k_base};

static ENCODER: LazyLock<Option<CoreBPE>> = LazyLock::new(|| {
    o200k_base()
        .inspect_err(|e| tracing::warn!(error = %e, "tokenizer unavailable, estimating from length"))
        .ok()
});

/// Estimate the token count of `text`
///
/// Uses the `o200k_base` encoding, falling back to one token per four bytes
/// when the encoder cannot be loaded.
pub fn estimate_tokens(text: &str) -> u64 {
    let count = ENCODER
        .as_ref()
        .map_or_else(|| text.len().div_ceil(4), |bpe| bpe.encode_with_special_tokens(text).len());
    u64::try_from(count).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_tokens() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn longer_text_has_more_tokens() {
        let short = estimate_tokens("Flight FZ181 delayed");
        let long = estimate_tokens("Flight FZ181 from DXB to COK delayed by 180 minutes due to a hydraulic fault");
        assert!(short > 0);
        assert!(long > short);
    }
}
