//! Readiness waiting with exponential backoff
//!
//! Freshly applied resources commonly sit in `pending` / `provisioning`
//! for tens of seconds before reaching their ready state, so validation
//! polls with a bounded backoff instead of failing on the first look.

use serde::{Deserialize, Serialize};

/// Exponential backoff settings for readiness polling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Maximum number of polling attempts
    pub max_retries: u32,

    /// Delay before the second attempt, in milliseconds
    pub initial_delay_ms: u64,

    /// Ceiling for the delay between attempts, in milliseconds
    pub max_delay_ms: u64,

    /// Backoff multiplier applied per attempt
    pub multiplier: f64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_retries: 30,
            initial_delay_ms: 2000,
            max_delay_ms: 15000,
            multiplier: 1.5,
        }
    }
}

impl WaitConfig {
    /// A config that polls exactly once, for callers that want the
    /// original single-look behavior.
    pub fn single_attempt() -> Self {
        Self {
            max_retries: 1,
            ..Self::default()
        }
    }

    /// Delay to sleep after the given zero-based attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        (delay.min(self.max_delay_ms as f64)) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_calculation() {
        let config = WaitConfig {
            max_retries: 5,
            initial_delay_ms: 1000,
            max_delay_ms: 10000,
            multiplier: 2.0,
        };

        assert_eq!(config.delay_for_attempt(0), 1000);
        assert_eq!(config.delay_for_attempt(1), 2000);
        assert_eq!(config.delay_for_attempt(2), 4000);
        assert_eq!(config.delay_for_attempt(3), 8000);
        assert_eq!(config.delay_for_attempt(4), 10000); // capped at max
    }

    #[test]
    fn test_default_delay_is_capped() {
        let config = WaitConfig::default();

        // 2000 * 1.5^n caps at 15000
        assert_eq!(config.delay_for_attempt(0), 2000);
        assert_eq!(config.delay_for_attempt(1), 3000);
        assert_eq!(config.delay_for_attempt(10), 15000);
    }

    #[test]
    fn test_single_attempt() {
        assert_eq!(WaitConfig::single_attempt().max_retries, 1);
    }
}
