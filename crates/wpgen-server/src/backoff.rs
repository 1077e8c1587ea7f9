//! Exponential retry delay for the history writer.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    delay: Duration,
    retry_at: Option<Instant>,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        let base = base.max(Duration::from_millis(1));
        Self {
            base,
            max: max.max(base),
            delay: base,
            retry_at: None,
        }
    }

    pub fn ready(&self) -> bool {
        self.retry_at.map_or(true, |at| Instant::now() >= at)
    }

    pub fn reset(&mut self) {
        self.delay = self.base;
        self.retry_at = None;
    }

    /// Record a failure and return how long to wait before the next attempt.
    pub fn fail(&mut self) -> Duration {
        let wait = self.delay;
        self.retry_at = Some(Instant::now() + wait);
        self.delay = self.delay.saturating_mul(2).min(self.max);
        wait
    }
}
