//! Reactive rules tying external state to the scroll controller.
//!
//! `EffectsCoordinator::evaluate` compares a snapshot of the inputs with the
//! previous one and returns the controller operations the change calls for.
//! The coordinator never touches the scroll position itself; the session
//! applies the returned effects in order.

use std::time::Duration;

use tracing::debug;

use crate::config::TimingConfig;
use crate::script::ScriptId;
use crate::scroll::START_POSITION;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectInputs {
    pub recording: bool,
    /// External pause or resize in progress
    pub paused: bool,
    pub focused: bool,
    pub text_measured: bool,
    pub text_height: f64,
    pub touch_paused: bool,
    pub resetting: bool,
    pub resizing: bool,
    pub script_id: Option<ScriptId>,
}

impl EffectInputs {
    pub fn should_scroll(&self) -> bool {
        self.recording
            && !self.paused
            && !self.touch_paused
            && !self.resetting
            && self.text_measured
            && self.text_height > 0.0
            && self.focused
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Stop,
    /// Stop but keep the position for the next start
    Suspend,
    Start,
    StartAfter(Duration),
    SnapTo(f64),
    MarkUnmeasured,
    ClearTouchPause,
    ClearResetting,
}

#[derive(Debug)]
pub struct EffectsCoordinator {
    timing: TimingConfig,
    previous: Option<EffectInputs>,
}

impl EffectsCoordinator {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            previous: None,
        }
    }

    /// Effects for the transition from the last snapshot to `inputs`
    pub fn evaluate(&mut self, inputs: &EffectInputs) -> Vec<Effect> {
        let Some(prev) = self.previous.replace(*inputs) else {
            debug!("Effects mounted");
            return vec![Effect::Stop, Effect::SnapTo(0.0)];
        };
        if prev == *inputs {
            return Vec::new();
        }

        let cur = inputs;
        let mut effects = Vec::new();

        if prev.focused && !cur.focused {
            debug!("Focus lost");
            effects.push(Effect::Stop);
        }

        let resize_completed = prev.resizing
            && !cur.resizing
            && cur.recording
            && !cur.paused
            && cur.text_measured
            && !cur.resetting;
        if resize_completed {
            debug!("Resize completed, restarting");
            effects.push(Effect::Suspend);
            effects.push(Effect::StartAfter(self.delay(self.timing.resize_restart_delay_ms)));
        }

        let script_changed = prev.script_id != cur.script_id;
        if script_changed {
            debug!("Script changed");
            effects.push(Effect::MarkUnmeasured);
        }

        if !prev.paused && cur.paused {
            effects.push(Effect::Stop);
        } else if prev.paused
            && !cur.paused
            && !cur.touch_paused
            && !cur.resetting
            && !resize_completed
        {
            effects.push(Effect::StartAfter(self.delay(self.timing.restart_delay_ms)));
        }

        if !prev.recording && cur.recording {
            effects.push(Effect::SnapTo(START_POSITION));
        } else if prev.recording && !cur.recording {
            effects.push(Effect::Stop);
            effects.push(Effect::ClearTouchPause);
            effects.push(Effect::ClearResetting);
        }

        // A delayed start already queued above keeps its delay
        let delayed = effects.iter().any(|e| matches!(e, Effect::StartAfter(_)));
        if !delayed {
            effects.push(if cur.should_scroll() && !script_changed {
                Effect::Start
            } else {
                Effect::Stop
            });
        }

        effects
    }

    fn delay(&self, ms: u64) -> Duration {
        Duration::from_millis(ms)
    }
}
