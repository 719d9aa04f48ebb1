use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline carried through one generation request
///
/// Every provider call, retry backoff and pacing delay observes this context,
/// so a caller can abandon model work at any point and still receive the
/// template result.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl GenerationContext {
    /// Context that never expires on its own
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that expires after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Attach an externally owned cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this context
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel all work bound to this context
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the context was cancelled or its deadline has passed
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Resolves once the context is cancelled or expires
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.cancel.cancelled() => {}
                    () = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }

    /// Run `future` unless the context finishes first
    ///
    /// Returns `None` when the context ended before the future completed.
    pub async fn run<F>(&self, future: F) -> Option<F::Output>
    where
        F: Future,
    {
        if self.is_done() {
            return None;
        }
        tokio::select! {
            biased;
            () = self.done() => None,
            output = future => Some(output),
        }
    }

    /// Sleep for `duration`, returning `false` if interrupted by the context
    pub async fn sleep(&self, duration: Duration) -> bool {
        self.run(tokio::time::sleep(duration)).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleep_completes_without_deadline() {
        let context = GenerationContext::new();
        assert!(context.sleep(Duration::from_secs(5)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_interrupts_sleep() {
        let context = GenerationContext::with_timeout(Duration::from_millis(100));
        assert!(!context.sleep(Duration::from_secs(5)).await);
        assert!(context.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_context_skips_work() {
        let context = GenerationContext::new();
        context.cancel();
        let output = context.run(async { 42 }).await;
        assert_eq!(output, None);
    }

    #[tokio::test(start_paused = true)]
    async fn external_token_cancels_context() {
        let token = CancellationToken::new();
        let context = GenerationContext::new().with_cancellation(token.clone());
        token.cancel();
        assert!(context.is_done());
    }
}
