//! Session facade
//!
//! Wires the scroll controller, gesture classification, container geometry
//! and the effects coordinator together behind one owner. A front-end feeds
//! it input state, pointer events and the clock, and reads the scroll
//! position and container geometry back. Outward notifications go through an
//! optional event channel.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::{AppConfig, ScrollConfig, TimingConfig};
use crate::diagnostics::Diagnostics;
use crate::effects::{Effect, EffectInputs, EffectsCoordinator};
use crate::gesture::{
    ContainerEvent, ContainerGestureController, ContainerState, GestureDisambiguator,
    GestureIntent, Point, SafeArea,
};
use crate::script::{Script, ScriptId};
use crate::scroll::{CalculationResult, ControllerStep, ScrollController, ScrollInputs, ScrollState};
use crate::timer::TimerQueue;

/// Upper bound on effect re-evaluation passes after one input change
const MAX_SYNC_PASSES: usize = 4;
/// Upper bound on deadlines processed by a single `tick`
const MAX_TICK_STEPS: usize = 1024;

/// Notifications for the front-end
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Resize { height: f64 },
    ResizeEnd,
    DoubleTap,
    TogglePause,
    PauseScroll,
    ResumeScroll,
    TextHeightChanged { height: f64 },
    TextMeasured { measured: bool },
    ResetIndicator { visible: bool },
    ScrollStarted,
    ScrollStopped,
    LoopRestarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTimer {
    HideResetIndicator,
}

pub struct Session {
    timing: TimingConfig,
    controller: ScrollController,
    gestures: GestureDisambiguator,
    container: ContainerGestureController,
    effects: EffectsCoordinator,
    diagnostics: Diagnostics,
    timers: TimerQueue<SessionTimer>,
    recording: bool,
    paused: bool,
    focused: bool,
    touch_paused: bool,
    script_id: Option<ScriptId>,
    reset_indicator_visible: bool,
    event_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
    disposed: bool,
}

impl Session {
    /// Create a mounted session: stopped, focused, not recording
    pub fn new(config: &AppConfig, screen_height: f64, safe_area: SafeArea, now: Instant) -> Self {
        let container =
            ContainerGestureController::new(config.container.clone(), screen_height, safe_area);
        let mut controller = ScrollController::new(config.scroll.clone(), config.timing.clone());
        controller.set_container_height(container.height());

        let mut session = Self {
            timing: config.timing.clone(),
            controller,
            gestures: GestureDisambiguator::new(config.gesture.clone()),
            container,
            effects: EffectsCoordinator::new(config.timing.clone()),
            diagnostics: Diagnostics::default(),
            timers: TimerQueue::new(),
            recording: false,
            paused: false,
            focused: true,
            touch_paused: false,
            script_id: None,
            reset_indicator_visible: false,
            event_tx: None,
            disposed: false,
        };
        session.sync(now);
        session
    }

    /// Set the event sender for front-end notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn send_event(&self, event: SessionEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send session event: receiver dropped");
            }
        }
    }

    // ---- Read side ----

    pub fn position(&self) -> f64 {
        self.controller.position()
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    pub fn scroll_state(&self) -> &ScrollState {
        self.controller.state()
    }

    pub fn container(&self) -> &ContainerState {
        self.container.state()
    }

    pub fn method_config(&self) -> &ScrollConfig {
        self.controller.config()
    }

    pub fn scroll_speed(&self) -> u8 {
        self.controller.state().scroll_speed
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_touch_paused(&self) -> bool {
        self.touch_paused
    }

    pub fn is_reset_indicator_visible(&self) -> bool {
        self.reset_indicator_visible
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ---- Inputs ----

    pub fn set_recording(&mut self, now: Instant, recording: bool) {
        self.update(now, |s| s.recording = recording);
    }

    pub fn set_paused(&mut self, now: Instant, paused: bool) {
        self.update(now, |s| s.paused = paused);
    }

    pub fn set_focused(&mut self, now: Instant, focused: bool) {
        self.update(now, |s| s.focused = focused);
    }

    pub fn set_script(&mut self, now: Instant, script: &Script) {
        debug!(id = %script.id, title = %script.title, "Script set");
        let word_count = script.word_count();
        let id = script.id;
        self.update(now, |s| {
            s.controller.set_word_count(word_count);
            s.script_id = Some(id);
        });
    }

    /// Swap the timing strategy; a running scroll restarts with it
    pub fn set_method_config(&mut self, now: Instant, config: ScrollConfig) {
        debug!(method = config.method.label(), "Method config updated");
        let delay = self.delay(self.timing.speed_restart_delay_ms);
        self.update(now, |s| {
            s.controller.set_method_config(config);
            if s.controller.is_animating() {
                s.controller.suspend(now);
                s.controller.start_after(now, delay);
            }
        });
    }

    pub fn set_screen(&mut self, now: Instant, screen_height: f64, safe_area: SafeArea) {
        self.update(now, |s| {
            s.container.set_screen(screen_height, safe_area);
            s.controller.set_container_height(s.container.height());
        });
    }

    // ---- Scroll operations ----

    pub fn start_scrolling(&mut self, now: Instant) {
        self.update(now, |s| {
            s.controller.start(now);
        });
    }

    pub fn stop_scrolling(&mut self, now: Instant) {
        self.update(now, |s| s.controller.stop(now));
    }

    pub fn reset_scrolling(&mut self, now: Instant) {
        self.update(now, |s| s.controller.reset(now));
    }

    pub fn update_scroll_speed(&mut self, now: Instant, speed: i32) {
        self.update(now, |s| s.controller.update_scroll_speed(now, speed));
    }

    pub fn calculate_duration(&self) -> CalculationResult {
        self.controller.calculate()
    }

    // ---- Measurement ----

    /// Report the rendered text height; non-positive or unchanged values are ignored
    pub fn on_text_height_change(&mut self, now: Instant, height: f64) {
        if !height.is_finite() || height <= 0.0 {
            return;
        }
        if (height - self.controller.state().text_height).abs() < f64::EPSILON {
            return;
        }
        self.update(now, |s| s.controller.set_text_height(height));
        self.send_event(SessionEvent::TextHeightChanged { height });
    }

    pub fn on_text_measured(&mut self, now: Instant, measured: bool) {
        self.update(now, |s| s.controller.set_text_measured(measured));
        self.send_event(SessionEvent::TextMeasured { measured });
    }

    // ---- Touch ----

    pub fn touch_down(&mut self, now: Instant, point: Point) {
        if self.disposed {
            return;
        }
        self.advance(now);
        let intents = self.gestures.touch_down(now, point);
        self.handle_intents(now, intents);
    }

    pub fn touch_up(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.advance(now);
        let intents = self.gestures.touch_up(now);
        self.handle_intents(now, intents);
    }

    fn handle_intents(&mut self, now: Instant, intents: Vec<GestureIntent>) {
        for intent in intents {
            match intent {
                GestureIntent::DoubleTap => self.on_double_tap(now),
                GestureIntent::TogglePause => self.on_toggle_pause(now),
                GestureIntent::PauseScroll => self.on_pause_scroll(now),
                GestureIntent::ResumeScroll => self.on_resume_scroll(now),
            }
        }
    }

    fn on_double_tap(&mut self, now: Instant) {
        self.send_event(SessionEvent::DoubleTap);
        self.show_reset_indicator(now);

        let restart = self.delay(self.timing.double_tap_restart_delay_ms);
        self.update(now, |s| {
            s.touch_paused = false;
            s.controller.set_inputs(s.scroll_inputs());
            s.controller.stop(now);
            s.controller.reset(now);
            s.controller.start_after(now, restart);
        });
    }

    fn on_toggle_pause(&mut self, now: Instant) {
        self.send_event(SessionEvent::TogglePause);
        if !self.recording || self.controller.state().is_resetting {
            debug!("Toggle pause ignored");
            return;
        }

        let restart = self.delay(self.timing.restart_delay_ms);
        self.update(now, |s| {
            s.touch_paused = !s.touch_paused;
            s.controller.set_inputs(s.scroll_inputs());
            if s.touch_paused {
                s.controller.stop(now);
            } else {
                s.controller.start_after(now, restart);
            }
        });
        debug!(touch_paused = self.touch_paused, "Touch pause toggled");
    }

    fn on_pause_scroll(&mut self, now: Instant) {
        self.send_event(SessionEvent::PauseScroll);
        self.update(now, |s| {
            s.touch_paused = true;
            s.controller.set_inputs(s.scroll_inputs());
            s.controller.stop(now);
        });
    }

    fn on_resume_scroll(&mut self, now: Instant) {
        self.send_event(SessionEvent::ResumeScroll);
        let restart = self.delay(self.timing.restart_delay_ms);
        self.update(now, |s| {
            s.touch_paused = false;
            s.controller.set_inputs(s.scroll_inputs());
            s.controller.start_after(now, restart);
        });
    }

    fn show_reset_indicator(&mut self, now: Instant) {
        self.timers
            .cancel_where(|t| *t == SessionTimer::HideResetIndicator);
        self.timers.schedule(
            now,
            self.delay(self.timing.reset_indicator_ms),
            SessionTimer::HideResetIndicator,
        );
        self.reset_indicator_visible = true;
        self.send_event(SessionEvent::ResetIndicator { visible: true });
    }

    // ---- Container ----

    pub fn drag_grant(&mut self) {
        self.container.drag_grant();
    }

    pub fn drag_move(&mut self, dy: f64) -> f64 {
        self.container.drag_move(dy)
    }

    pub fn drag_release(&mut self, dy: f64) -> f64 {
        self.container.drag_release(dy)
    }

    /// Begin resizing; scrolling pauses until release
    pub fn resize_grant(&mut self, now: Instant) {
        self.update(now, |s| s.container.resize_grant());
    }

    pub fn resize_move(&mut self, now: Instant, dy: f64) {
        if self.disposed {
            return;
        }
        if let Some(ContainerEvent::Resize(height)) = self.container.resize_move(dy) {
            self.controller.set_container_height(height);
            if self.diagnostics.should_emit("container.resize", now) {
                trace!(height, "Container resizing");
            }
            self.send_event(SessionEvent::Resize { height });
        }
    }

    pub fn resize_release(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.update(now, |s| {
            s.container.resize_release();
            s.controller.set_container_height(s.container.height());
        });
        self.send_event(SessionEvent::ResizeEnd);
    }

    /// Restore the default container top and height
    pub fn reset_container_position(&mut self, now: Instant) {
        self.update(now, |s| {
            s.container.reset_position();
            s.controller.set_container_height(s.container.height());
        });
        self.send_event(SessionEvent::Resize {
            height: self.container.height(),
        });
    }

    // ---- Time ----

    /// Earliest instant at which `tick` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.controller.next_deadline(),
            self.gestures.next_deadline(),
            self.timers.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Fire everything due up to `now` in deadline order, then sample the
    /// scroll position. Returns the position.
    pub fn tick(&mut self, now: Instant) -> f64 {
        if self.disposed {
            return self.controller.position();
        }
        self.advance(now);
        self.controller.sample(now)
    }

    /// Fire everything due up to `now`, each at its own deadline
    fn advance(&mut self, now: Instant) {
        for _ in 0..MAX_TICK_STEPS {
            let Some(deadline) = self.next_deadline().filter(|d| *d <= now) else {
                break;
            };

            if self.controller.next_deadline() == Some(deadline) {
                let was_animating = self.controller.is_animating();
                let step = self.controller.fire_next(deadline);
                if let Some(ControllerStep::Completed { looped: true }) = step {
                    self.send_event(SessionEvent::LoopRestarted);
                }
                self.sync(deadline);
                self.notify_animation_change(was_animating);
            } else if self.gestures.next_deadline() == Some(deadline) {
                let intents = self.gestures.fire_due(deadline);
                self.handle_intents(deadline, intents);
            } else if let Some((at, SessionTimer::HideResetIndicator)) =
                self.timers.pop_due(deadline)
            {
                self.reset_indicator_visible = false;
                self.send_event(SessionEvent::ResetIndicator { visible: false });
                self.sync(at);
            }
        }
    }

    /// Cancel every animation and timer; the session goes inert
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.controller.teardown();
        self.gestures.teardown();
        self.timers.clear();
        self.disposed = true;
        debug!("Session torn down");
    }

    // ---- Internals ----

    fn delay(&self, ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn scroll_inputs(&self) -> ScrollInputs {
        ScrollInputs {
            recording: self.recording,
            paused: self.paused
                || self.touch_paused
                || self.container.is_resizing()
                || self.controller.state().is_resetting,
            focused: self.focused,
        }
    }

    fn effect_inputs(&self) -> EffectInputs {
        let state = self.controller.state();
        EffectInputs {
            recording: self.recording,
            paused: self.paused || self.container.is_resizing(),
            focused: self.focused,
            text_measured: state.is_text_measured,
            text_height: state.text_height,
            touch_paused: self.touch_paused,
            resetting: state.is_resetting,
            resizing: self.container.is_resizing(),
            script_id: self.script_id,
        }
    }

    /// Apply a state change, run the effect rules and report animation changes
    fn update(&mut self, now: Instant, change: impl FnOnce(&mut Self)) {
        if self.disposed {
            return;
        }
        let was_animating = self.controller.is_animating();
        self.controller.set_inputs(self.scroll_inputs());
        change(self);
        self.sync(now);
        self.notify_animation_change(was_animating);
    }

    fn sync(&mut self, now: Instant) {
        for _ in 0..MAX_SYNC_PASSES {
            self.controller.set_inputs(self.scroll_inputs());
            let effects = self.effects.evaluate(&self.effect_inputs());
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                self.controller.set_inputs(self.scroll_inputs());
                self.apply(effect, now);
            }
        }
        self.controller.set_inputs(self.scroll_inputs());
    }

    fn apply(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::Stop => self.controller.stop(now),
            Effect::Suspend => self.controller.suspend(now),
            Effect::Start => {
                // A queued delayed start keeps its delay
                if !self.controller.has_pending_start() {
                    self.controller.start(now);
                }
            }
            Effect::StartAfter(delay) => self.controller.start_after(now, delay),
            Effect::SnapTo(position) => self.controller.snap_to(position),
            Effect::MarkUnmeasured => {
                self.controller.set_text_measured(false);
                self.send_event(SessionEvent::TextMeasured { measured: false });
            }
            Effect::ClearTouchPause => self.touch_paused = false,
            Effect::ClearResetting => self.controller.clear_resetting(),
        }
    }

    fn notify_animation_change(&self, was_animating: bool) {
        match (was_animating, self.controller.is_animating()) {
            (false, true) => self.send_event(SessionEvent::ScrollStarted),
            (true, false) => self.send_event(SessionEvent::ScrollStopped),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::START_POSITION;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn safe_area() -> SafeArea {
        SafeArea {
            top: 40.0,
            bottom: 30.0,
        }
    }

    /// A session that is recording with measured text and scrolling
    fn running_session(t0: Instant) -> Session {
        let mut session = Session::new(&AppConfig::default(), 1000.0, safe_area(), t0);
        session.set_script(t0, &Script::from_text("take one", "one two three four five"));
        session.set_recording(t0, true);
        session.on_text_height_change(t0, 1000.0);
        session.on_text_measured(t0, true);
        session
    }

    #[test]
    fn test_mount_snaps_to_zero() {
        let t0 = Instant::now();
        let session = Session::new(&AppConfig::default(), 1000.0, safe_area(), t0);
        assert_eq!(session.position(), 0.0);
        assert!(!session.is_animating());
        assert_eq!(session.container().height, 300.0);
    }

    #[test]
    fn test_measurement_starts_scrolling() {
        let t0 = Instant::now();
        let session = running_session(t0);
        assert!(session.is_animating());
        assert_eq!(session.position(), START_POSITION);

        let result = session.calculate_duration();
        assert_eq!(result.end_position, -(1000.0 + 300.0 + 100.0));
    }

    #[test]
    fn test_ignores_non_positive_text_height() {
        let t0 = Instant::now();
        let mut session = running_session(t0);
        session.on_text_height_change(t0, 0.0);
        session.on_text_height_change(t0, f64::NAN);
        assert_eq!(session.scroll_state().text_height, 1000.0);
    }

    #[test]
    fn test_tick_advances_position() {
        let t0 = Instant::now();
        let mut session = running_session(t0);
        let first = session.tick(t0 + ms(1000));
        let second = session.tick(t0 + ms(2000));
        assert!(first < START_POSITION);
        assert!(second < first);
    }

    #[test]
    fn test_external_pause_and_resume() {
        let t0 = Instant::now();
        let mut session = running_session(t0);

        session.set_paused(t0 + ms(1000), true);
        assert!(!session.is_animating());
        let paused_at = session.scroll_state().paused_position.unwrap();

        session.set_paused(t0 + ms(2000), false);
        assert!(!session.is_animating());
        session.tick(t0 + ms(2100));
        assert!(session.is_animating());
        assert_eq!(session.position(), paused_at);
    }

    #[test]
    fn test_focus_loss_keeps_position() {
        let t0 = Instant::now();
        let mut session = running_session(t0);

        session.set_focused(t0 + ms(1000), false);
        assert!(!session.is_animating());
        let kept = session.scroll_state().paused_position;
        assert!(kept.is_some());

        session.set_focused(t0 + ms(5000), true);
        assert!(session.is_animating());
        assert_eq!(Some(session.position()), kept);
    }

    #[test]
    fn test_hold_pauses_and_release_resumes() {
        let t0 = Instant::now();
        let mut session = running_session(t0);

        session.touch_down(t0 + ms(1000), Point::new(100.0, 200.0));
        session.tick(t0 + ms(1500));
        assert!(session.is_touch_paused());
        assert!(!session.is_animating());

        session.touch_up(t0 + ms(1600));
        assert!(!session.is_touch_paused());
        assert!(!session.is_animating());
        session.tick(t0 + ms(1700));
        assert!(session.is_animating());
    }

    #[tokio::test]
    async fn test_overdue_hold_fires_before_release() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let t0 = Instant::now();
        let mut session = running_session(t0).with_event_sender(tx);

        // No tick between press and release
        session.touch_down(t0 + ms(1000), Point::new(100.0, 200.0));
        session.touch_up(t0 + ms(1600));
        session.tick(t0 + ms(3000));

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SessionEvent::PauseScroll | SessionEvent::ResumeScroll) {
                events.push(event);
            }
        }
        assert_eq!(events, vec![SessionEvent::PauseScroll, SessionEvent::ResumeScroll]);
        assert!(!session.is_touch_paused());
        assert!(session.is_animating());
    }

    #[test]
    fn test_overdue_tap_toggles_before_next_touch() {
        let t0 = Instant::now();
        let mut session = running_session(t0);

        session.touch_down(t0 + ms(1000), Point::new(100.0, 200.0));
        session.touch_up(t0 + ms(1050));
        session.touch_down(t0 + ms(2000), Point::new(100.0, 200.0));
        assert!(session.is_touch_paused());
        assert!(!session.is_animating());
    }

    #[test]
    fn test_single_tap_toggles_pause() {
        let t0 = Instant::now();
        let mut session = running_session(t0);

        session.touch_down(t0 + ms(1000), Point::new(100.0, 200.0));
        session.touch_up(t0 + ms(1050));
        session.tick(t0 + ms(1359));
        assert!(session.is_animating());
        session.tick(t0 + ms(1360));
        assert!(session.is_touch_paused());
        assert!(!session.is_animating());

        session.touch_down(t0 + ms(3000), Point::new(100.0, 200.0));
        session.touch_up(t0 + ms(3050));
        session.tick(t0 + ms(3360));
        assert!(!session.is_touch_paused());
        session.tick(t0 + ms(3460));
        assert!(session.is_animating());
    }

    #[test]
    fn test_toggle_ignored_when_not_recording() {
        let t0 = Instant::now();
        let mut session = running_session(t0);
        session.set_recording(t0 + ms(100), false);

        session.touch_down(t0 + ms(1000), Point::new(0.0, 0.0));
        session.touch_up(t0 + ms(1050));
        session.tick(t0 + ms(2000));
        assert!(!session.is_touch_paused());
    }

    #[test]
    fn test_double_tap_resets_and_restarts() {
        let t0 = Instant::now();
        let mut session = running_session(t0);
        session.tick(t0 + ms(2000));

        session.touch_down(t0 + ms(2000), Point::new(100.0, 100.0));
        session.touch_up(t0 + ms(2050));
        session.touch_down(t0 + ms(2150), Point::new(120.0, 120.0));
        session.touch_up(t0 + ms(2200));

        assert_eq!(session.position(), START_POSITION);
        assert!(session.is_reset_indicator_visible());
        assert!(session.scroll_state().is_resetting);
        assert!(!session.is_animating());

        // Restart once the reset debounce has cleared
        session.tick(t0 + ms(2450));
        assert!(session.is_animating());
        assert!(!session.is_touch_paused());

        session.tick(t0 + ms(3150));
        assert!(!session.is_reset_indicator_visible());
    }

    #[test]
    fn test_resize_pauses_and_restarts_with_new_height() {
        let t0 = Instant::now();
        let mut session = running_session(t0);
        session.tick(t0 + ms(1000));

        session.resize_grant(t0 + ms(1000));
        assert!(!session.is_animating());
        let kept = session.scroll_state().paused_position.unwrap();

        session.resize_move(t0 + ms(1050), 0.0);
        session.resize_move(t0 + ms(1100), 100.0);
        session.resize_release(t0 + ms(1200));
        assert_eq!(session.container().height, 400.0);
        assert!(!session.is_animating());

        session.tick(t0 + ms(1350));
        assert!(session.is_animating());
        assert_eq!(session.position(), kept);
        assert_eq!(session.calculate_duration().end_position, -1500.0);
    }

    #[test]
    fn test_script_change_requires_remeasure() {
        let t0 = Instant::now();
        let mut session = running_session(t0);

        session.set_script(t0 + ms(500), &Script::from_text("take two", "new words"));
        assert!(!session.is_animating());
        assert!(!session.scroll_state().is_text_measured);

        session.on_text_measured(t0 + ms(600), true);
        assert!(session.is_animating());
        assert_eq!(session.position(), START_POSITION);
    }

    #[test]
    fn test_loop_restarts_from_top() {
        let t0 = Instant::now();
        let mut session = running_session(t0);
        let end = session.next_deadline().unwrap();

        session.tick(end);
        assert_eq!(session.position(), START_POSITION);
        assert!(!session.is_animating());

        session.tick(end + ms(300));
        assert!(session.is_animating());
    }

    #[test]
    fn test_speed_change_restarts_in_place() {
        let t0 = Instant::now();
        let mut session = running_session(t0);
        session.tick(t0 + ms(1000));

        session.update_scroll_speed(t0 + ms(1000), 90);
        assert!(!session.is_animating());
        session.tick(t0 + ms(1050));
        assert!(session.is_animating());
        assert_eq!(session.scroll_speed(), 90);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let t0 = Instant::now();
        let mut session = running_session(t0);
        session.touch_down(t0 + ms(100), Point::default());
        session.teardown();

        assert!(session.next_deadline().is_none());
        assert!(!session.is_animating());
        session.set_paused(t0 + ms(200), false);
        session.touch_up(t0 + ms(300));
        session.tick(t0 + ms(10_000));
        assert!(!session.is_animating());
    }

    #[tokio::test]
    async fn test_events_are_delivered() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let t0 = Instant::now();
        let mut session =
            Session::new(&AppConfig::default(), 1000.0, safe_area(), t0).with_event_sender(tx);

        session.set_recording(t0, true);
        session.on_text_height_change(t0, 800.0);
        session.on_text_measured(t0, true);
        session.resize_grant(t0 + ms(100));
        session.resize_move(t0 + ms(110), 0.0);
        session.resize_move(t0 + ms(120), 40.0);
        session.resize_release(t0 + ms(130));

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                SessionEvent::TextHeightChanged { height: 800.0 },
                SessionEvent::ScrollStarted,
                SessionEvent::TextMeasured { measured: true },
                SessionEvent::ScrollStopped,
                SessionEvent::Resize { height: 340.0 },
                SessionEvent::ResizeEnd,
            ]
        );
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_tolerated() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let t0 = Instant::now();
        let mut session =
            Session::new(&AppConfig::default(), 1000.0, safe_area(), t0).with_event_sender(tx);
        session.on_text_measured(t0, true);
        assert!(session.scroll_state().is_text_measured);
    }
}
