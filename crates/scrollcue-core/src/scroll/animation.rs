//! L3 Molecular Layer: Linear scroll animation
//!
//! A time-based interpolation between two positions. The animation itself is
//! inert: the controller samples it with an explicit `now` and decides what
//! completion means.

use std::time::{Duration, Instant};

use super::state::AnimationHandle;
use super::timing::{is_complete, lerp, progress};

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
    generation: u64,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, start: Instant, duration: Duration, generation: u64) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            generation,
        }
    }

    pub fn handle(&self) -> AnimationHandle {
        AnimationHandle {
            generation: self.generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Interpolated position at `now`
    #[inline]
    pub fn value_at(&self, now: Instant) -> f64 {
        lerp(self.from, self.to, progress(self.start, self.duration, now))
    }

    #[inline]
    pub fn is_complete(&self, now: Instant) -> bool {
        is_complete(self.start, self.duration, now)
    }

    /// Instant at which the animation reaches `to`
    pub fn end_time(&self) -> Instant {
        self.start + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_interpolation() {
        let t0 = Instant::now();
        let anim = ScrollAnimation::new(20.0, -980.0, t0, Duration::from_secs(10), 1);

        assert!((anim.value_at(t0) - 20.0).abs() < 1e-9);
        assert!((anim.value_at(t0 + Duration::from_secs(5)) + 480.0).abs() < 1e-6);
        assert!((anim.value_at(t0 + Duration::from_secs(60)) + 980.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_and_end_time() {
        let t0 = Instant::now();
        let anim = ScrollAnimation::new(0.0, -100.0, t0, Duration::from_millis(250), 7);

        assert_eq!(anim.end_time(), t0 + Duration::from_millis(250));
        assert!(!anim.is_complete(t0 + Duration::from_millis(249)));
        assert!(anim.is_complete(anim.end_time()));
        assert_eq!(anim.handle(), AnimationHandle { generation: 7 });
    }
}
