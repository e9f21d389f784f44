//! L4 Atomic Layer: Time calculation utilities for scroll animations
//!
//! Pure functions over an explicit `now`, so callers control the clock.

use std::time::{Duration, Instant};

/// Calculate animation progress (0.0 to 1.0) at `now`
///
/// # Arguments
/// * `start` - Animation start time
/// * `duration` - Total animation duration
/// * `now` - Instant to evaluate at
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if animation is complete at `now`
#[inline]
pub fn is_complete(start: Instant, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Convert a millisecond count from the calculator into a `Duration`.
///
/// Non-finite and negative values collapse to zero.
#[inline]
pub fn millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(20.0, -1480.0, 1.0) + 1480.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        let start = Instant::now();
        assert!((progress(start, Duration::ZERO, start) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_midway_and_clamped() {
        let start = Instant::now();
        let duration = Duration::from_millis(1000);
        let half = progress(start, duration, start + Duration::from_millis(500));
        assert!((half - 0.5).abs() < 0.001);
        assert!((progress(start, duration, start + Duration::from_secs(5)) - 1.0).abs() < 0.001);
        // A clock reading before the start never goes negative
        assert!(progress(start + Duration::from_millis(10), duration, start) >= 0.0);
    }

    #[test]
    fn test_is_complete() {
        let start = Instant::now();
        let duration = Duration::from_millis(200);
        assert!(!is_complete(start, duration, start + Duration::from_millis(199)));
        assert!(is_complete(start, duration, start + Duration::from_millis(200)));
    }

    #[test]
    fn test_millis_rejects_garbage() {
        assert_eq!(millis(f64::NAN), Duration::ZERO);
        assert_eq!(millis(-5.0), Duration::ZERO);
        assert_eq!(millis(1500.0), Duration::from_millis(1500));
    }
}
