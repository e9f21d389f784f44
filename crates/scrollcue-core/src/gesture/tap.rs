//! Touch classification: tap, hold and double-tap.
//!
//! A touch-down either completes a double-tap with the previous touch or arms
//! a hold timer. On release, a held touch resumes scrolling, a quick tap is
//! deferred for one double-tap window so a follow-up touch can upgrade the
//! pair, and anything else is ignored.
//!
//! Timers live in an owned [`TimerQueue`]; the owner drives them through
//! [`GestureDisambiguator::fire_due`]. Every method takes `now` explicitly so
//! tests can walk through sequences deterministically.

use std::time::Instant;

use tracing::debug;

use crate::config::GestureConfig;
use crate::timer::{TimerId, TimerQueue};

/// Touch position in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// What a classified touch sequence asks the scroll engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureIntent {
    /// Two quick nearby taps: reset to the top
    DoubleTap,
    /// Single quick tap, committed after the double-tap window
    TogglePause,
    /// Touch held past the hold threshold
    PauseScroll,
    /// A held touch was released
    ResumeScroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureTimer {
    Hold,
    TapExpiry,
    DeferredTap,
}

/// Per-touch bookkeeping
#[derive(Debug, Clone, Default)]
struct GestureSession {
    /// Set while the pointer is down
    touch_start: Option<Instant>,
    hold_timer: Option<TimerId>,
    tap_expiry_timer: Option<TimerId>,
    /// One pending toggle per quick tap, oldest first
    deferred_tap_timers: Vec<TimerId>,
    last_tap: Option<(Instant, Point)>,
    is_processing_double_tap: bool,
    is_holding: bool,
}

#[derive(Debug)]
pub struct GestureDisambiguator {
    config: GestureConfig,
    timers: TimerQueue<GestureTimer>,
    session: GestureSession,
    disposed: bool,
}

impl GestureDisambiguator {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            timers: TimerQueue::new(),
            session: GestureSession::default(),
            disposed: false,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.session.is_holding
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn touch_down(&mut self, now: Instant, point: Point) -> Vec<GestureIntent> {
        if self.disposed {
            return Vec::new();
        }
        self.session.touch_start = Some(now);

        let window = self.config.double_tap_window();
        let is_double_tap = self.session.last_tap.is_some_and(|(at, previous)| {
            now.saturating_duration_since(at) <= window
                && previous.distance(&point) <= self.config.double_tap_distance_px
        });

        if is_double_tap {
            self.cancel_hold();
            self.cancel_tap_expiry();
            // The first tap of the pair is upgraded, not toggled
            self.cancel_latest_deferred_tap();
            self.session.last_tap = None;
            self.session.is_holding = false;
            self.session.is_processing_double_tap = true;
            debug!(x = point.x, y = point.y, "Double tap");
            return vec![GestureIntent::DoubleTap];
        }

        self.cancel_hold();
        self.session.hold_timer =
            Some(self.timers.schedule(now, self.config.hold(), GestureTimer::Hold));

        self.cancel_tap_expiry();
        self.session.last_tap = Some((now, point));
        self.session.tap_expiry_timer =
            Some(self.timers.schedule(now, window, GestureTimer::TapExpiry));

        Vec::new()
    }

    pub fn touch_up(&mut self, now: Instant) -> Vec<GestureIntent> {
        if self.disposed {
            return Vec::new();
        }
        self.cancel_hold();
        let touch_start = self.session.touch_start.take();

        if self.session.is_processing_double_tap {
            self.session.is_processing_double_tap = false;
            return Vec::new();
        }

        if self.session.is_holding {
            self.session.is_holding = false;
            debug!("Hold released");
            return vec![GestureIntent::ResumeScroll];
        }

        let quick = touch_start
            .is_some_and(|start| now.saturating_duration_since(start) < self.config.hold());
        if quick {
            let id = self.timers.schedule(
                now,
                self.config.deferred_tap_delay(),
                GestureTimer::DeferredTap,
            );
            self.session.deferred_tap_timers.push(id);
        }
        Vec::new()
    }

    /// Fire every timer due at `now`, in deadline order
    pub fn fire_due(&mut self, now: Instant) -> Vec<GestureIntent> {
        let mut intents = Vec::new();
        if self.disposed {
            return intents;
        }

        while let Some((_, timer)) = self.timers.pop_due(now) {
            match timer {
                GestureTimer::Hold => {
                    self.session.hold_timer = None;
                    if self.session.touch_start.is_some() {
                        self.session.is_holding = true;
                        debug!("Hold detected");
                        intents.push(GestureIntent::PauseScroll);
                    }
                }
                GestureTimer::TapExpiry => {
                    self.session.tap_expiry_timer = None;
                    self.session.last_tap = None;
                }
                GestureTimer::DeferredTap => {
                    let timers = &self.timers;
                    self.session
                        .deferred_tap_timers
                        .retain(|id| timers.is_pending(*id));
                    debug!("Single tap");
                    intents.push(GestureIntent::TogglePause);
                }
            }
        }
        intents
    }

    /// Cancel everything; later calls are no-ops
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.session = GestureSession::default();
        self.disposed = true;
    }

    fn cancel_hold(&mut self) {
        if let Some(id) = self.session.hold_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_tap_expiry(&mut self) {
        if let Some(id) = self.session.tap_expiry_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_latest_deferred_tap(&mut self) {
        if let Some(id) = self.session.deferred_tap_timers.pop() {
            self.timers.cancel(id);
        }
    }
}
