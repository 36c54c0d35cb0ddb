//! Delay schedule between transaction attempts.
//!
//! Retry `n` waits `base * 2^(n-1)`, capped, plus a random extra of up to a
//! tenth of that delay. With the `RetryConfig` defaults (100 ms base, 2 s cap)
//! the waits are roughly 100 ms, 200 ms, 400 ms, 800 ms, 1.6 s, then 2 s.

use std::time::Duration;

use rand::Rng;

use crate::resilience::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    /// Delay before retry number `attempt` (1-based). Attempt 0 waits nothing.
    pub fn delay(&self, attempt: u32) -> Duration {
        let nominal = self.nominal(attempt);
        let spread = nominal / 10;
        if spread.is_zero() {
            return nominal;
        }
        let jitter = rand::thread_rng().gen_range(Duration::ZERO..spread);
        nominal.saturating_add(jitter)
    }

    /// The capped exponential delay without jitter.
    fn nominal(&self, attempt: u32) -> Duration {
        match attempt {
            0 => Duration::ZERO,
            n => {
                let factor = 1u32.checked_shl(n - 1).unwrap_or(u32::MAX);
                self.base.saturating_mul(factor).min(self.cap)
            }
        }
    }
}

impl From<&RetryPolicy> for Backoff {
    fn from(policy: &RetryPolicy) -> Self {
        Self::new(
            Duration::from_millis(policy.base_delay_ms),
            Duration::from_millis(policy.max_delay_ms),
        )
    }
}
