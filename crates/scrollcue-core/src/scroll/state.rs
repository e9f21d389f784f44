//! L4 Atomic Layer: Scroll state and its reducer
//!
//! All mutation goes through `reduce`, an exhaustive match over
//! `ScrollAction`. The store is a thin owner around the current value.

use super::calc::clamp_speed;

/// Identity of one running animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle {
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    pub text_height: f64,
    pub is_text_measured: bool,
    /// `Some` exactly while an animation is running
    pub current_animation: Option<AnimationHandle>,
    /// Where a paused scroll resumes; `None` when fully stopped
    pub paused_position: Option<f64>,
    pub is_resetting: bool,
    pub scroll_speed: u8,
}

impl ScrollState {
    pub fn new(scroll_speed: i32, text_height: f64, is_text_measured: bool) -> Self {
        Self {
            text_height: sanitize_height(text_height),
            is_text_measured,
            current_animation: None,
            paused_position: None,
            is_resetting: false,
            scroll_speed: clamp_speed(scroll_speed),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.current_animation.is_some()
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(crate::ScrollConfig::default().speed, 0.0, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAction {
    SetTextHeight(f64),
    SetTextMeasured(bool),
    SetAnimation(Option<AnimationHandle>),
    SetPausedPosition(Option<f64>),
    SetResetting(bool),
    SetScrollSpeed(i32),
    /// Enter the reset debounce: no animation, no paused position.
    /// Measurements and speed are kept.
    Reset,
}

pub fn reduce(state: ScrollState, action: ScrollAction) -> ScrollState {
    match action {
        ScrollAction::SetTextHeight(height) => ScrollState {
            text_height: sanitize_height(height),
            ..state
        },
        ScrollAction::SetTextMeasured(measured) => ScrollState {
            is_text_measured: measured,
            ..state
        },
        ScrollAction::SetAnimation(handle) => ScrollState {
            current_animation: handle,
            ..state
        },
        ScrollAction::SetPausedPosition(position) => ScrollState {
            paused_position: position.filter(|p| p.is_finite()),
            ..state
        },
        ScrollAction::SetResetting(resetting) => ScrollState {
            is_resetting: resetting,
            ..state
        },
        ScrollAction::SetScrollSpeed(speed) => ScrollState {
            scroll_speed: clamp_speed(speed),
            ..state
        },
        ScrollAction::Reset => ScrollState {
            current_animation: None,
            paused_position: None,
            is_resetting: true,
            ..state
        },
    }
}

fn sanitize_height(height: f64) -> f64 {
    if height.is_finite() {
        height.max(0.0)
    } else {
        0.0
    }
}

/// Owner of the current `ScrollState`
#[derive(Debug, Clone, Default)]
pub struct ScrollStateStore {
    state: ScrollState,
}

impl ScrollStateStore {
    pub fn new(state: ScrollState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn dispatch(&mut self, action: ScrollAction) {
        self.state = reduce(self.state.clone(), action);
    }
}
