//! L2 Organism Layer: Scroll controller
//!
//! The only writer of the scroll position. Everything else (gestures, the
//! effects coordinator, the front-end) asks the controller to start, stop or
//! reset and reads the position back.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::animation::ScrollAnimation;
use super::calc::{calculate, CalcInput, CalculationResult, START_POSITION};
use super::state::{AnimationHandle, ScrollAction, ScrollState, ScrollStateStore};
use super::timing::millis;
use crate::config::{ScrollConfig, TimingConfig};
use crate::diagnostics::Diagnostics;
use crate::timer::TimerQueue;

/// External state the controller's guards depend on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollInputs {
    pub recording: bool,
    /// Composite pause: user pause, touch pause, resize or reset in progress
    pub paused: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTimer {
    ResetDebounceEnd,
    Start,
}

/// What happened when a due deadline was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStep {
    /// The animation reached its end; `looped` when a loop restart was queued
    Completed { looped: bool },
    ResetCleared,
    DelayedStart { started: bool },
}

#[derive(Debug)]
pub struct ScrollController {
    config: ScrollConfig,
    timing: TimingConfig,
    store: ScrollStateStore,
    position: f64,
    animation: Option<ScrollAnimation>,
    next_generation: u64,
    inputs: ScrollInputs,
    container_height: f64,
    word_count: Option<u32>,
    timers: TimerQueue<ScrollTimer>,
    diagnostics: Diagnostics,
    disposed: bool,
}

impl ScrollController {
    pub fn new(config: ScrollConfig, timing: TimingConfig) -> Self {
        let store = ScrollStateStore::new(ScrollState::new(config.speed, 0.0, false));
        Self {
            config,
            timing,
            store,
            position: START_POSITION,
            animation: None,
            next_generation: 0,
            inputs: ScrollInputs::default(),
            container_height: 0.0,
            word_count: None,
            timers: TimerQueue::new(),
            diagnostics: Diagnostics::default(),
            disposed: false,
        }
    }

    pub fn state(&self) -> &ScrollState {
        self.store.state()
    }

    pub fn inputs(&self) -> ScrollInputs {
        self.inputs
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Last written scroll position
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn container_height(&self) -> f64 {
        self.container_height
    }

    pub fn set_inputs(&mut self, inputs: ScrollInputs) {
        self.inputs = inputs;
    }

    pub fn set_method_config(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    pub fn set_container_height(&mut self, height: f64) {
        if height.is_finite() {
            self.container_height = height.max(0.0);
        }
    }

    pub fn set_word_count(&mut self, word_count: Option<u32>) {
        self.word_count = word_count;
    }

    pub fn set_text_height(&mut self, height: f64) {
        self.store.dispatch(ScrollAction::SetTextHeight(height));
    }

    pub fn set_text_measured(&mut self, measured: bool) {
        self.store.dispatch(ScrollAction::SetTextMeasured(measured));
    }

    /// Positions and durations for the current state
    pub fn calculate(&self) -> CalculationResult {
        let state = self.store.state();
        calculate(
            &CalcInput {
                text_height: state.text_height,
                container_height: self.container_height,
                speed: state.scroll_speed as i32,
                paused_position: state.paused_position,
                word_count: self.word_count,
            },
            &self.config,
        )
    }

    fn can_start(&self) -> bool {
        let state = self.store.state();
        !self.disposed
            && self.inputs.recording
            && !self.inputs.paused
            && !state.is_resetting
            && state.is_text_measured
            && state.text_height > 0.0
    }

    /// Begin scrolling from the paused position or the top.
    ///
    /// Returns true when a new animation was started.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.animation.is_some() || !self.can_start() {
            return false;
        }

        let result = self.calculate();
        let from = self
            .store
            .state()
            .paused_position
            .map(|p| p.min(result.start_position).max(result.end_position))
            .unwrap_or(result.start_position);

        self.generation_bump();
        let animation = ScrollAnimation::new(
            from,
            result.end_position,
            now,
            millis(result.remaining_duration),
            self.next_generation,
        );
        debug!(
            generation = animation.generation(),
            from,
            to = result.end_position,
            duration_ms = result.remaining_duration,
            "Scroll started"
        );

        self.position = from;
        self.store.dispatch(ScrollAction::SetPausedPosition(None));
        self.store
            .dispatch(ScrollAction::SetAnimation(Some(animation.handle())));
        self.animation = Some(animation);
        true
    }

    fn generation_bump(&mut self) {
        self.next_generation = self.next_generation.wrapping_add(1);
    }

    /// Stop scrolling.
    ///
    /// While recording but paused or unfocused the position is remembered for
    /// the next start; otherwise position memory is dropped.
    pub fn stop(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.timers.cancel_where(|t| *t == ScrollTimer::Start);

        let keep = self.inputs.recording && (self.inputs.paused || !self.inputs.focused);
        match self.cancel_animation(now) {
            Some(value) if keep => {
                self.store
                    .dispatch(ScrollAction::SetPausedPosition(Some(value)));
            }
            Some(_) => {
                self.store.dispatch(ScrollAction::SetPausedPosition(None));
            }
            None if !keep => {
                self.store.dispatch(ScrollAction::SetPausedPosition(None));
            }
            None => {}
        }
    }

    /// Stop but always keep the current position for the next start
    pub fn suspend(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.timers.cancel_where(|t| *t == ScrollTimer::Start);
        if let Some(value) = self.cancel_animation(now) {
            self.store
                .dispatch(ScrollAction::SetPausedPosition(Some(value)));
        }
    }

    fn cancel_animation(&mut self, now: Instant) -> Option<f64> {
        let animation = self.animation.take()?;
        let value = animation.value_at(now);
        self.position = value;
        self.store.dispatch(ScrollAction::SetAnimation(None));
        debug!(generation = animation.generation(), position = value, "Scroll stopped");
        Some(value)
    }

    /// Jump back to the top and block starts for the debounce window
    pub fn reset(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        if let Some(animation) = self.animation.take() {
            debug!(generation = animation.generation(), "Animation cancelled by reset");
        }
        self.store.dispatch(ScrollAction::Reset);
        self.position = START_POSITION;

        self.timers
            .cancel_where(|t| *t == ScrollTimer::ResetDebounceEnd);
        self.timers.schedule(
            now,
            Duration::from_millis(self.timing.reset_debounce_ms),
            ScrollTimer::ResetDebounceEnd,
        );
        debug!("Scroll reset");
    }

    /// Store a new speed; a running animation restarts shortly with it
    pub fn update_scroll_speed(&mut self, now: Instant, speed: i32) {
        if self.disposed {
            return;
        }
        self.store.dispatch(ScrollAction::SetScrollSpeed(speed));
        debug!(speed = self.store.state().scroll_speed, "Scroll speed updated");

        if self.animation.is_some() {
            self.suspend(now);
            self.start_after(now, Duration::from_millis(self.timing.speed_restart_delay_ms));
        }
    }

    /// Queue a start attempt; the guards are checked when it fires
    pub fn start_after(&mut self, now: Instant, delay: Duration) {
        if self.disposed {
            return;
        }
        self.timers.schedule(now, delay, ScrollTimer::Start);
    }

    pub fn has_pending_start(&self) -> bool {
        self.timers.contains(|t| *t == ScrollTimer::Start)
    }

    /// End the reset debounce early
    pub fn clear_resetting(&mut self) {
        self.timers
            .cancel_where(|t| *t == ScrollTimer::ResetDebounceEnd);
        self.store.dispatch(ScrollAction::SetResetting(false));
    }

    /// Set the position directly, dropping any animation
    pub fn snap_to(&mut self, value: f64) {
        if self.disposed || !value.is_finite() {
            return;
        }
        if self.animation.take().is_some() {
            self.store.dispatch(ScrollAction::SetAnimation(None));
        }
        self.position = value;
    }

    /// Refresh the position from the running animation without completing it
    pub fn sample(&mut self, now: Instant) -> f64 {
        if let Some(animation) = &self.animation {
            if !animation.is_complete(now) {
                self.position = animation.value_at(now);
                if self.diagnostics.should_emit("scroll.position", now) {
                    trace!(position = self.position, "Scroll position");
                }
            }
        }
        self.position
    }

    /// Earliest instant at which `fire_next` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let animation_end = self.animation.as_ref().map(ScrollAnimation::end_time);
        match (animation_end, self.timers.next_deadline()) {
            (Some(a), Some(t)) => Some(a.min(t)),
            (a, t) => a.or(t),
        }
    }

    /// Process the single earliest item due at `now`
    pub fn fire_next(&mut self, now: Instant) -> Option<ControllerStep> {
        if self.disposed {
            return None;
        }
        let animation_end = self
            .animation
            .as_ref()
            .map(|a| (a.end_time(), a.handle()))
            .filter(|(end, _)| *end <= now);
        let timer_deadline = self.timers.next_deadline().filter(|d| *d <= now);

        if let Some((end, handle)) = animation_end {
            if timer_deadline.map_or(true, |t| end <= t) {
                return Some(self.complete(handle, end));
            }
        }

        let (deadline, timer) = self.timers.pop_due(now)?;
        Some(match timer {
            ScrollTimer::ResetDebounceEnd => {
                self.store.dispatch(ScrollAction::SetResetting(false));
                debug!("Reset debounce cleared");
                ControllerStep::ResetCleared
            }
            ScrollTimer::Start => ControllerStep::DelayedStart {
                started: self.start(deadline),
            },
        })
    }

    /// Natural completion of the animation identified by `handle`.
    ///
    /// Completions for anything but the current generation are dropped.
    pub fn complete(&mut self, handle: AnimationHandle, now: Instant) -> ControllerStep {
        let current = self.animation.as_ref().map(ScrollAnimation::generation);
        if self.disposed || current != Some(handle.generation) {
            debug!(
                generation = handle.generation,
                current = ?current,
                "Dropping stale animation completion"
            );
            return ControllerStep::Completed { looped: false };
        }

        if let Some(animation) = self.animation.take() {
            self.position = animation.to();
        }
        self.store.dispatch(ScrollAction::SetAnimation(None));

        let ScrollInputs {
            recording,
            paused,
            focused,
        } = self.inputs;
        if recording && !paused && focused {
            self.reset(now);
            self.start_after(now, Duration::from_millis(self.timing.loop_restart_delay_ms));
            debug!("Scroll finished, looping");
            ControllerStep::Completed { looped: true }
        } else {
            debug!("Scroll finished");
            ControllerStep::Completed { looped: false }
        }
    }

    /// Cancel the animation and every timer; the controller goes inert
    pub fn teardown(&mut self) {
        self.animation = None;
        self.store.dispatch(ScrollAction::SetAnimation(None));
        self.timers.clear();
        self.disposed = true;
        debug!("Scroll controller torn down");
    }
}
