//! Exponential backoff with subtractive jitter.

use std::time::Duration;

use rand::Rng;

/// First retry waits this long before jitter.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);
/// No retry waits longer than this.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(1);
/// Jitter is drawn from `[0, DEFAULT_JITTER_MAX)` and subtracted.
pub const DEFAULT_JITTER_MAX: Duration = Duration::from_millis(30);

/// Delay schedule between attempts: `base * 2^(attempt-1)`, capped, minus jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
    jitter_max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_JITTER_MAX)
    }
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration, jitter_max: Duration) -> Self {
        Self {
            base,
            cap,
            jitter_max,
        }
    }

    /// A schedule that never waits, for tests and local stubs.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn cap(&self) -> Duration {
        self.cap
    }

    pub fn jitter_max(&self) -> Duration {
        self.jitter_max
    }

    /// Delay after failed `attempt` (1-based) before jitter is applied.
    ///
    /// Non-decreasing in `attempt` and never above the cap.
    pub fn ceiling(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        2u32.checked_pow(exponent)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.cap, |delay| delay.min(self.cap))
    }

    /// Delay after failed `attempt` with a fresh random jitter.
    pub fn delay(&self, attempt: u32) -> Duration {
        let jitter = if self.jitter_max.is_zero() {
            Duration::ZERO
        } else {
            rand::thread_rng().gen_range(Duration::ZERO..self.jitter_max)
        };
        self.delay_with_jitter(attempt, jitter)
    }

    /// Delay after failed `attempt` with an explicit jitter, clamped at zero.
    pub fn delay_with_jitter(&self, attempt: u32, jitter: Duration) -> Duration {
        self.ceiling(attempt).saturating_sub(jitter)
    }
}
