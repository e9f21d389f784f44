//! Drag and resize of the teleprompter container.
//!
//! Geometry is in pixels. The container is dragged by its top handle and
//! resized from its bottom handle; both gestures report deltas relative to
//! where the pointer was granted.

use tracing::debug;

use crate::config::ContainerConfig;

/// Space reserved by the system at the screen edges
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SafeArea {
    pub top: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContainerEvent {
    Resize(f64),
    ResizeEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerState {
    pub top_offset: f64,
    pub height: f64,
    pub is_dragging: bool,
    pub is_resizing: bool,
    pub start_drag_offset: f64,
    pub start_height: f64,
}

#[derive(Debug)]
pub struct ContainerGestureController {
    config: ContainerConfig,
    screen_height: f64,
    safe_area: SafeArea,
    state: ContainerState,
    /// Pointer delta of the first resize sample, subtracted from later ones
    initial_resize_delta: Option<f64>,
}

/// `value` clamped into `[lower, upper]`; `lower` wins when the bounds cross
fn clamp_ordered(value: f64, lower: f64, upper: f64) -> f64 {
    value.min(upper).max(lower)
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

impl ContainerGestureController {
    pub fn new(config: ContainerConfig, screen_height: f64, safe_area: SafeArea) -> Self {
        let mut controller = Self {
            config,
            screen_height: finite_or(screen_height, 0.0).max(0.0),
            safe_area,
            state: ContainerState {
                top_offset: 0.0,
                height: 0.0,
                is_dragging: false,
                is_resizing: false,
                start_drag_offset: 0.0,
                start_height: 0.0,
            },
            initial_resize_delta: None,
        };
        controller.reset_position();
        controller
    }

    pub fn state(&self) -> &ContainerState {
        &self.state
    }

    pub fn height(&self) -> f64 {
        self.state.height
    }

    pub fn top_offset(&self) -> f64 {
        self.state.top_offset
    }

    pub fn is_resizing(&self) -> bool {
        self.state.is_resizing
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    fn min_height(&self) -> f64 {
        finite_or(self.config.min_height, 0.0).max(0.0)
    }

    fn reserved_bottom(&self) -> f64 {
        finite_or(self.safe_area.bottom, 0.0) + finite_or(self.config.reserved_bottom, 0.0)
    }

    fn safe_top(&self) -> f64 {
        finite_or(self.safe_area.top, 0.0)
    }

    /// Largest top offset that keeps the container on screen
    fn max_top(&self) -> f64 {
        self.screen_height - self.state.height - self.reserved_bottom()
    }

    /// Height bounds for the current top offset, always at least the minimum
    fn height_bounds(&self) -> (f64, f64) {
        let min = self.min_height();
        let ratio_max = self.screen_height * finite_or(self.config.max_height_ratio, 1.0);
        let available = self.screen_height - self.state.top_offset - self.reserved_bottom();
        (min, ratio_max.min(available).max(min))
    }

    fn clamp_top(&self, top: f64) -> f64 {
        clamp_ordered(finite_or(top, self.state.top_offset), self.safe_top(), self.max_top())
    }

    fn clamp_height(&self, height: f64) -> f64 {
        let (min, max) = self.height_bounds();
        clamp_ordered(finite_or(height, self.state.height), min, max)
    }

    pub fn drag_grant(&mut self) {
        self.state.is_dragging = true;
        self.state.start_drag_offset = self.state.top_offset;
    }

    /// Move the container by `dy` from where the drag started
    pub fn drag_move(&mut self, dy: f64) -> f64 {
        if self.state.is_dragging {
            self.state.top_offset = self.clamp_top(self.state.start_drag_offset + dy);
        }
        self.state.top_offset
    }

    pub fn drag_release(&mut self, dy: f64) -> f64 {
        let top = self.drag_move(dy);
        self.state.is_dragging = false;
        debug!(top, "Container moved");
        top
    }

    pub fn resize_grant(&mut self) {
        self.state.is_resizing = true;
        self.state.start_height = self.state.height;
        self.initial_resize_delta = None;
    }

    /// Apply a resize sample. The first sample only anchors the gesture.
    pub fn resize_move(&mut self, dy: f64) -> Option<ContainerEvent> {
        if !self.state.is_resizing || !dy.is_finite() {
            return None;
        }
        let Some(initial) = self.initial_resize_delta else {
            self.initial_resize_delta = Some(dy);
            return None;
        };

        let sensitivity = finite_or(self.config.resize_sensitivity, 1.0);
        let height = self.clamp_height(self.state.start_height + (dy - initial) * sensitivity);
        self.state.height = height;
        Some(ContainerEvent::Resize(height))
    }

    pub fn resize_release(&mut self) -> ContainerEvent {
        self.state.is_resizing = false;
        self.initial_resize_delta = None;
        debug!(height = self.state.height, "Container resized");
        ContainerEvent::ResizeEnd
    }

    /// Restore the configured default top and height
    pub fn reset_position(&mut self) {
        self.state.is_dragging = false;
        self.state.is_resizing = false;
        self.initial_resize_delta = None;
        self.state.top_offset = self.safe_top() + finite_or(self.config.default_top, 0.0);
        self.state.height = self.clamp_height(finite_or(self.config.default_height, 0.0));
        self.state.top_offset = self.clamp_top(self.state.top_offset);
        self.state.height = self.clamp_height(self.state.height);
    }

    /// Update screen metrics and pull the container back inside them
    pub fn set_screen(&mut self, screen_height: f64, safe_area: SafeArea) {
        self.screen_height = finite_or(screen_height, self.screen_height).max(0.0);
        self.safe_area = safe_area;
        self.state.top_offset = self.clamp_top(self.state.top_offset);
        self.state.height = self.clamp_height(self.state.height);
        self.state.top_offset = self.clamp_top(self.state.top_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(screen_height: f64) -> ContainerGestureController {
        ContainerGestureController::new(
            ContainerConfig::default(),
            screen_height,
            SafeArea {
                top: 40.0,
                bottom: 30.0,
            },
        )
    }

    #[test]
    fn test_default_geometry() {
        let c = controller(1000.0);
        assert_eq!(c.top_offset(), 120.0);
        assert_eq!(c.height(), 300.0);
    }

    #[test]
    fn test_drag_clamps_to_screen() {
        let mut c = controller(1000.0);
        c.drag_grant();
        assert_eq!(c.drag_move(50.0), 170.0);
        // Bottom edge: 1000 - 300 - 30
        assert_eq!(c.drag_move(5000.0), 670.0);
        assert_eq!(c.drag_release(-5000.0), 40.0);
        assert!(!c.is_dragging());

        // Moves without a grant are ignored
        assert_eq!(c.drag_move(100.0), 40.0);
    }

    #[test]
    fn test_first_resize_sample_does_not_jump() {
        let mut c = controller(1000.0);
        c.resize_grant();
        assert_eq!(c.resize_move(35.0), None);
        assert_eq!(c.height(), 300.0);
        assert_eq!(c.resize_move(85.0), Some(ContainerEvent::Resize(350.0)));
        assert_eq!(c.resize_release(), ContainerEvent::ResizeEnd);
        assert!(!c.is_resizing());
    }

    #[test]
    fn test_resize_stays_within_bounds() {
        let mut c = controller(1000.0);
        c.resize_grant();
        c.resize_move(0.0);
        for dy in [-10_000.0, -100.0, 0.0, 250.0, 10_000.0] {
            c.resize_move(dy);
            let available = 1000.0 - c.top_offset() - 30.0;
            assert!(c.height() >= 150.0, "dy {}", dy);
            assert!(c.height() <= available, "dy {}", dy);
            assert!(c.height() <= 800.0, "dy {}", dy);
        }
        assert_eq!(c.height(), 800.0f64.min(1000.0 - 120.0 - 30.0));
    }

    #[test]
    fn test_tiny_screen_keeps_min_height() {
        let mut c = controller(100.0);
        assert_eq!(c.height(), 150.0);
        c.resize_grant();
        c.resize_move(0.0);
        assert_eq!(c.resize_move(-500.0), Some(ContainerEvent::Resize(150.0)));
        assert_eq!(c.resize_move(f64::NAN), None);
    }

    #[test]
    fn test_set_screen_reclamps() {
        let mut c = controller(1000.0);
        c.drag_grant();
        c.drag_release(500.0);
        assert_eq!(c.top_offset(), 620.0);

        c.set_screen(600.0, SafeArea { top: 40.0, bottom: 30.0 });
        assert!(c.top_offset() + c.height() <= 600.0 - 30.0);
        assert!(c.height() >= 150.0);

        c.reset_position();
        assert_eq!(c.top_offset(), 120.0);
        assert_eq!(c.height(), 300.0);
    }
}
