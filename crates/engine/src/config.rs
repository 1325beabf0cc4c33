//! Pacing configuration
//!
//! The engine suspends between cascade phases so a renderer can animate
//! them. The delay values are a presentation contract supplied by the
//! caller; correctness never depends on them, and tests run with zero
//! pacing.

use std::time::Duration;

use trimatch_types::{
    CLEAR_DELAY_MS, SETTLE_DELAY_MS, SWAP_DELAY_MS, TASK_TRANSITION_DELAY_MS,
};

/// Suspension durations between engine phases (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After applying (or reverting) a swap
    pub swap_ms: u64,
    /// Between marking clears and committing them
    pub clear_ms: u64,
    /// After drop/refill, before the next scan
    pub settle_ms: u64,
    /// Between a task outcome notification and the transition
    pub transition_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            swap_ms: SWAP_DELAY_MS,
            clear_ms: CLEAR_DELAY_MS,
            settle_ms: SETTLE_DELAY_MS,
            transition_ms: TASK_TRANSITION_DELAY_MS,
        }
    }
}

impl Pacing {
    /// No suspensions at all; the pacing used by headless drivers and tests
    pub fn zero() -> Self {
        Self {
            swap_ms: 0,
            clear_ms: 0,
            settle_ms: 0,
            transition_ms: 0,
        }
    }

    /// Create from environment variables, falling back to the defaults
    ///
    /// Recognized variables: `TRIMATCH_SWAP_MS`, `TRIMATCH_CLEAR_MS`,
    /// `TRIMATCH_SETTLE_MS`, `TRIMATCH_TRANSITION_MS`.
    pub fn from_env() -> Self {
        use std::env;

        fn read(name: &str, default: u64) -> u64 {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        Self {
            swap_ms: read("TRIMATCH_SWAP_MS", defaults.swap_ms),
            clear_ms: read("TRIMATCH_CLEAR_MS", defaults.clear_ms),
            settle_ms: read("TRIMATCH_SETTLE_MS", defaults.settle_ms),
            transition_ms: read("TRIMATCH_TRANSITION_MS", defaults.transition_ms),
        }
    }
}

/// Suspend for the given pacing value; zero suspends not at all
pub(crate) async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_product_pacing() {
        let pacing = Pacing::default();
        assert_eq!(pacing.swap_ms, 200);
        assert_eq!(pacing.clear_ms, 400);
        assert_eq!(pacing.settle_ms, 400);
        assert_eq!(pacing.transition_ms, 2000);
    }

    #[test]
    fn test_zero_pacing_is_all_zero() {
        let pacing = Pacing::zero();
        assert_eq!(pacing.swap_ms, 0);
        assert_eq!(pacing.clear_ms, 0);
        assert_eq!(pacing.settle_ms, 0);
        assert_eq!(pacing.transition_ms, 0);
    }
}
