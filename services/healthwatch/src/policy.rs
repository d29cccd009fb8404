//! Delay policy: how long to wait before the next probe.
//!
//! Three regimes:
//! - Healthy: long interval
//! - Degraded: shorter interval, watch the backend more closely
//! - Error: exponential backoff from a base, capped, optionally jittered

use std::time::Duration;

use crate::config::PollingConfig;
use crate::sample::{HealthSample, HealthStatus};

/// Delay before the first probe when nothing has been sampled yet
pub const INITIAL_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct DelayPolicy {
    healthy_interval_ms: u64,
    degraded_interval_ms: u64,
    error_base_ms: u64,
    backoff_max_ms: u64,
    jitter: f64,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::new(&PollingConfig::default())
    }
}

impl DelayPolicy {
    pub fn new(config: &PollingConfig) -> Self {
        Self {
            healthy_interval_ms: config.healthy_interval_ms,
            degraded_interval_ms: config.degraded_interval_ms,
            error_base_ms: config.error_base_ms,
            backoff_max_ms: config.backoff_max_ms,
            jitter: config.backoff_jitter,
        }
    }

    pub fn jitter_enabled(&self) -> bool {
        self.jitter > 0.0 && self.jitter <= 1.0
    }

    /// Delay after `sample`, given the number of consecutive failures that
    /// preceded it.
    pub fn next_delay(&self, sample: Option<&HealthSample>, fail_count: u32) -> Duration {
        let unit = if self.jitter_enabled() {
            rand::random::<f64>()
        } else {
            0.0
        };
        self.next_delay_with(sample, fail_count, unit)
    }

    /// Same as [`next_delay`](Self::next_delay) with the uniform draw in
    /// `[0, 1)` supplied by the caller.
    pub fn next_delay_with(
        &self,
        sample: Option<&HealthSample>,
        fail_count: u32,
        unit: f64,
    ) -> Duration {
        let Some(sample) = sample else {
            return INITIAL_DELAY;
        };

        match sample.status() {
            HealthStatus::Healthy => Duration::from_millis(self.healthy_interval_ms),
            HealthStatus::Degraded => Duration::from_millis(self.degraded_interval_ms),
            HealthStatus::Error => self.jittered(self.backoff(fail_count), unit),
        }
    }

    /// Unjittered backoff: `min(max, base * 2^fail_count)`
    pub fn backoff(&self, fail_count: u32) -> Duration {
        let factor = 2u64.checked_pow(fail_count).unwrap_or(u64::MAX);
        let delay_ms = self.error_base_ms.saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.backoff_max_ms))
    }

    // Spreads the delay symmetrically by +/- half of `jitter * delay`.
    fn jittered(&self, delay: Duration, unit: f64) -> Duration {
        if !self.jitter_enabled() {
            return delay;
        }

        let exp = delay.as_millis() as f64;
        let delta = exp * self.jitter;
        let perturbed = exp - delta / 2.0 + unit.clamp(0.0, 1.0) * delta;
        Duration::from_millis(perturbed.max(0.0).round() as u64)
    }
}
