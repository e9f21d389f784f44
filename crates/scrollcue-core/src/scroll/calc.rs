//! L4 Atomic Layer: Scroll distance and duration calculation
//!
//! Pure and cheap; the controller recomputes on every start instead of
//! caching.

use serde::{Deserialize, Serialize};

use crate::config::{
    default_max_speed_px, default_min_speed_px, finite_positive_or, ScrollConfig, ScrollMethod,
};

/// Scroll position the text starts from (slightly below the container top)
pub const START_POSITION: f64 = 20.0;
/// Extra distance past the container so the last line fully leaves the view
pub const SAFETY_MARGIN: f64 = 100.0;

pub const MIN_SPEED: i32 = 1;
pub const MAX_SPEED: i32 = 100;

/// Lower bound for full durations of the speed-based methods (ms)
pub const MIN_DURATION_MS: f64 = 3000.0;
/// Lower bound for the remaining duration when resuming (ms)
pub const MIN_REMAINING_DURATION_MS: f64 = 1000.0;

pub const MIN_WPM: f64 = 40.0;
pub const MAX_WPM: f64 = 400.0;
pub const MIN_DURATION_MINUTES: f64 = 1.0;
pub const MAX_DURATION_MINUTES: f64 = 120.0;
pub const MIN_LINES_PER_SECOND: f64 = 0.2;
pub const MAX_LINES_PER_SECOND: f64 = 10.0;

/// Average words on one rendered line, used when no word count is known
const AVERAGE_WORDS_PER_LINE: f64 = 7.0;

/// Inputs that change between calculations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalcInput {
    pub text_height: f64,
    pub container_height: f64,
    pub speed: i32,
    pub paused_position: Option<f64>,
    pub word_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub start_position: f64,
    pub end_position: f64,
    pub total_distance: f64,
    /// Full scroll duration in milliseconds
    pub duration: f64,
    pub remaining_distance: f64,
    /// Milliseconds left from the paused position (or `duration`)
    pub remaining_duration: f64,
}

impl CalculationResult {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Clamp a raw speed value into [1, 100]
pub fn clamp_speed(speed: i32) -> u8 {
    speed.clamp(MIN_SPEED, MAX_SPEED) as u8
}

/// Compute positions and durations for one scroll pass
pub fn calculate(input: &CalcInput, config: &ScrollConfig) -> CalculationResult {
    let text_height = non_negative(input.text_height);
    let container_height = non_negative(input.container_height);

    let start_position = START_POSITION;
    let end_position = -(text_height + container_height + SAFETY_MARGIN);
    let total_distance = (start_position - end_position).abs();

    let duration = match config.method {
        ScrollMethod::Classic => classic_duration(total_distance, input.speed, config),
        ScrollMethod::Wpm => wpm_duration(text_height, input.word_count, config),
        ScrollMethod::Duration => fixed_duration(config.duration_minutes),
        ScrollMethod::Lines => lines_duration(text_height, config),
    };

    let paused = input
        .paused_position
        .filter(|p| p.is_finite())
        .map(|p| p.min(start_position).max(end_position));

    let (remaining_distance, remaining_duration) = match paused {
        Some(position) => {
            let remaining_distance = (position - end_position).abs();
            let remaining_duration =
                (duration * remaining_distance / total_distance).max(MIN_REMAINING_DURATION_MS);
            (remaining_distance, remaining_duration)
        }
        None => (total_distance, duration),
    };

    CalculationResult {
        start_position,
        end_position,
        total_distance,
        duration,
        remaining_distance,
        remaining_duration,
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Speed 1..=100 mapped linearly onto the configured px/s range
fn classic_duration(total_distance: f64, speed: i32, config: &ScrollConfig) -> f64 {
    let min_px = finite_positive_or(config.min_speed_px, default_min_speed_px());
    let max_px = finite_positive_or(config.max_speed_px, default_max_speed_px()).max(min_px);

    let normalized = (clamp_speed(speed) as f64 - MIN_SPEED as f64) / (MAX_SPEED - MIN_SPEED) as f64;
    let px_per_second = min_px + normalized * (max_px - min_px);

    (total_distance / px_per_second * 1000.0).max(MIN_DURATION_MS)
}

fn wpm_duration(text_height: f64, word_count: Option<u32>, config: &ScrollConfig) -> f64 {
    let words = match word_count {
        Some(count) if count > 0 => count as f64,
        _ => estimate_word_count(text_height, config),
    };
    let wpm = clamp_or(config.wpm, MIN_WPM, MAX_WPM);
    (words / wpm * 60_000.0).max(MIN_DURATION_MS)
}

fn fixed_duration(minutes: f64) -> f64 {
    clamp_or(minutes, MIN_DURATION_MINUTES, MAX_DURATION_MINUTES) * 60_000.0
}

fn lines_duration(text_height: f64, config: &ScrollConfig) -> f64 {
    let lines = estimate_line_count(text_height, config);
    let lines_per_second =
        clamp_or(config.lines_per_second, MIN_LINES_PER_SECOND, MAX_LINES_PER_SECOND);
    (lines / lines_per_second * 1000.0).max(MIN_DURATION_MS)
}

/// Rendered line count, at least one
pub fn estimate_line_count(text_height: f64, config: &ScrollConfig) -> f64 {
    (non_negative(text_height) / config.line_height_px()).ceil().max(1.0)
}

/// Word count guessed from the rendered height
pub fn estimate_word_count(text_height: f64, config: &ScrollConfig) -> f64 {
    (estimate_line_count(text_height, config) * AVERAGE_WORDS_PER_LINE).round()
}

/// Clamp into [min, max]; NaN lands on `min`
fn clamp_or(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
