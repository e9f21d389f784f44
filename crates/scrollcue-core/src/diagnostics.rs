//! Per-session rate limiting for noisy debug output

use std::collections::HashMap;
use std::time::{Duration, Instant};

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Decides whether a keyed trace line may be emitted at `now`.
///
/// Each session owns one of these; there is no shared throttling state.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    interval: Duration,
    last_emitted: HashMap<&'static str, Instant>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Diagnostics {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emitted: HashMap::new(),
        }
    }

    /// True at most once per interval for each key
    pub fn should_emit(&mut self, key: &'static str, now: Instant) -> bool {
        match self.last_emitted.get(key) {
            Some(last) if now.saturating_duration_since(*last) < self.interval => false,
            _ => {
                self.last_emitted.insert(key, now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_emitted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttles_per_key() {
        let t0 = Instant::now();
        let mut diag = Diagnostics::new(Duration::from_millis(500));

        assert!(diag.should_emit("position", t0));
        assert!(!diag.should_emit("position", t0 + Duration::from_millis(100)));
        assert!(diag.should_emit("resize", t0 + Duration::from_millis(100)));
        assert!(diag.should_emit("position", t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_reset_forgets_history() {
        let t0 = Instant::now();
        let mut diag = Diagnostics::default();
        assert!(diag.should_emit("position", t0));
        diag.reset();
        assert!(diag.should_emit("position", t0));
    }
}
