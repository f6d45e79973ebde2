//! Retry policy for vendor page fetches.
//!
//! 429 responses sleep for the advertised `Retry-After`; transient
//! transport failures back off exponentially. Both share one attempt cap.
//! Permanent errors (any other non-2xx) are never retried.

use std::time::Duration;

/// Configuration for fetch retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first backoff retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
    /// Fixed delay between successive page fetches (vendor rate budget).
    pub page_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            page_delay: Duration::from_millis(200),
        }
    }
}

impl RetryConfig {
    /// Exponential backoff delay for the given attempt (1-based), capped
    /// at `max_delay`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}
