//! Cooperative per-run throttle.
//!
//! Counts loop iterations and pauses the current task whenever the count is a
//! multiple of `pause_after_calls`. A throttle is owned by one run; concurrent
//! runs do not share a budget.

use std::time::Duration;

/// Pause threshold and duration for one workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Pause after every N iterations; `None` never pauses
    pub pause_after_calls: Option<u64>,
    pub pause_duration: Duration,
}

impl ThrottleConfig {
    pub const fn every(calls: u64, pause_duration: Duration) -> Self {
        Self {
            pause_after_calls: Some(calls),
            pause_duration,
        }
    }

    pub const fn unthrottled() -> Self {
        Self {
            pause_after_calls: None,
            pause_duration: Duration::ZERO,
        }
    }
}

#[derive(Debug)]
pub struct Throttle {
    config: ThrottleConfig,
    iterations: u64,
    pauses: u64,
}

impl Throttle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            iterations: 0,
            pauses: 0,
        }
    }

    /// Count one iteration, sleeping first if it lands on the threshold.
    ///
    /// Returns whether a pause happened.
    pub async fn tick(&mut self) -> bool {
        self.iterations += 1;

        let due = match self.config.pause_after_calls {
            Some(n) if n > 0 => self.iterations % n == 0,
            _ => false,
        };
        if !due {
            return false;
        }

        tracing::info!(
            iterations = self.iterations,
            pause_secs = self.config.pause_duration.as_secs(),
            "Throttle pause"
        );
        tokio::time::sleep(self.config.pause_duration).await;
        self.pauses += 1;
        true
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn pauses(&self) -> u64 {
        self.pauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pauses_on_multiples_of_threshold_only() {
        let mut throttle = Throttle::new(ThrottleConfig::every(3, Duration::from_secs(60)));

        let mut paused_at = Vec::new();
        for _ in 0..7 {
            if throttle.tick().await {
                paused_at.push(throttle.iterations());
            }
        }

        assert_eq!(paused_at, vec![3, 6]);
        assert_eq!(throttle.pauses(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_blocks_for_configured_duration() {
        let mut throttle = Throttle::new(ThrottleConfig::every(1, Duration::from_secs(60)));

        let before = tokio::time::Instant::now();
        throttle.tick().await;

        assert!(before.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn unthrottled_never_pauses() {
        let mut throttle = Throttle::new(ThrottleConfig::unthrottled());
        for _ in 0..5000 {
            assert!(!throttle.tick().await);
        }
        assert_eq!(throttle.pauses(), 0);
    }
}
