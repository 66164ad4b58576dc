//! Delay schedule between transport retries.
//!
//! [`BackoffConfig`] decides how long the gateway waits before re-sending an
//! identical prompt after a transport failure. How many retries happen is
//! decided by the caller of [`call_model`](crate::gateway::call_model).

use std::time::Duration;

/// Exponential backoff with optional jitter.
///
/// # Example
///
/// ```
/// use trip_planner::backend::BackoffConfig;
/// use std::time::Duration;
///
/// let immediate = BackoffConfig::immediate();
/// assert_eq!(immediate.delay_for_attempt(3), Duration::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay before the first retry. Default: 1 second.
    pub initial_delay: Duration,

    /// Multiplier applied to the delay after each retry. Default: 2.0.
    pub multiplier: f64,

    /// Upper bound on any single delay. Default: 30 seconds.
    pub max_delay: Duration,

    /// Jitter strategy. Default: Full.
    pub jitter: JitterStrategy,

    /// Whether a `Retry-After` header overrides the computed delay
    /// (still capped at `max_delay`). Default: `true`.
    pub respect_retry_after: bool,
}

/// Jitter strategy to spread retries from concurrent callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterStrategy {
    /// Delay is exactly the calculated value.
    None,

    /// Random value in `[0, calculated_delay]`.
    Full,

    /// `calculated_delay/2 + random in [0, calculated_delay/2]`.
    Equal,
}

impl BackoffConfig {
    /// Retry without waiting. Useful for tests and local mocks.
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            jitter: JitterStrategy::None,
            respect_retry_after: false,
            ..Self::standard()
        }
    }

    /// 1s initial, 2x multiplier, 30s max, full jitter, respects Retry-After.
    pub fn standard() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            jitter: JitterStrategy::Full,
            respect_retry_after: true,
        }
    }

    /// Calculate the delay for retry N (0-indexed).
    ///
    /// The base delay is `initial_delay * multiplier^attempt`, capped at
    /// `max_delay`. Jitter is then applied according to the configured strategy.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());

        let jittered = match self.jitter {
            JitterStrategy::None => capped,
            JitterStrategy::Full => fastrand::f64() * capped,
            JitterStrategy::Equal => capped / 2.0 + fastrand::f64() * (capped / 2.0),
        };

        Duration::from_secs_f64(jittered)
    }

    /// Delay before retry N, honouring a server-provided `Retry-After` hint.
    pub fn delay_with_hint(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) if self.respect_retry_after => hint.min(self.max_delay),
            _ => self.delay_for_attempt(attempt),
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self::standard()
    }
}
