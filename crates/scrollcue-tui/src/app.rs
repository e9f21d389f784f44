use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use scrollcue_core::{AppConfig, Point, SafeArea, Script, Session, SessionEvent};

use crate::input::{Action, SPEED_STEP};
use crate::theme::Theme;

/// Columns kept free on each side of the container
const SIDE_MARGIN: u16 = 2;
/// Smallest container that still has a handle row above and below the text
const MIN_CONTAINER_ROWS: u16 = 3;

/// What the left mouse button is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Idle,
    /// Moving the container by its top handle
    Dragging { origin_row: u16 },
    /// Resizing the container by its bottom handle
    Resizing { origin_row: u16 },
    /// Pressed on the text
    Touching,
}

/// Main application state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub session: Session,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    pub script: Script,
    script_path: Option<PathBuf>,
    /// Script wrapped to the container width
    pub wrapped: Vec<String>,
    needs_measure: bool,
    pub cols: u16,
    pub rows: u16,
    pub pointer: Pointer,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        script: Script,
        script_path: Option<PathBuf>,
        cols: u16,
        rows: u16,
        now: Instant,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let screen_height = prompter_rows(rows) as f64 * config.ui.cell_height_px;
        let session =
            Session::new(&config, screen_height, SafeArea::default(), now).with_event_sender(tx);

        let mut app = Self {
            config,
            theme: Theme::default(),
            session,
            events: rx,
            script,
            script_path,
            wrapped: Vec::new(),
            needs_measure: true,
            cols,
            rows,
            pointer: Pointer::Idle,
            status_message: None,
            should_quit: false,
        };
        app.session.set_script(now, &app.script);
        app.process_session_events(now);
        app
    }

    fn cell_height(&self) -> f64 {
        self.config.ui.cell_height_px
    }

    fn cell_width(&self) -> f64 {
        self.config.ui.cell_width_px
    }

    /// Area above the status bar
    pub fn prompter_area(&self) -> Rect {
        Rect::new(0, 0, self.cols, prompter_rows(self.rows))
    }

    /// Container position in terminal cells, including its border rows
    pub fn container_rect(&self) -> Rect {
        let area = self.prompter_area();
        let container = self.session.container();

        let height = ((container.height / self.cell_height()).round() as u16)
            .max(MIN_CONTAINER_ROWS)
            .min(area.height);
        let top = ((container.top_offset / self.cell_height()).round() as u16)
            .min(area.height.saturating_sub(height));
        let width = area.width.saturating_sub(SIDE_MARGIN * 2);

        Rect::new(area.x + SIDE_MARGIN.min(area.width), area.y + top, width, height)
    }

    /// Where the text is drawn: inside the border with one column of padding
    pub fn text_area(&self) -> Rect {
        let rect = self.container_rect();
        Rect::new(
            rect.x + 2,
            rect.y + 1,
            rect.width.saturating_sub(4),
            rect.height.saturating_sub(2),
        )
    }

    /// Scroll position in terminal rows; positive pushes the text down
    pub fn scroll_rows(&self) -> i32 {
        (self.session.position() / self.cell_height()).round() as i32
    }

    /// Wrap the script to the current width and report its height
    pub fn measure(&mut self, now: Instant) {
        let width = self.text_area().width.max(1) as usize;
        self.wrapped = textwrap::wrap(&self.script.content, width)
            .into_iter()
            .map(|line| line.into_owned())
            .collect();

        let height = self.wrapped.len() as f64 * self.cell_height();
        debug!(lines = self.wrapped.len(), height, "Script measured");
        self.session.on_text_height_change(now, height);
        self.session.on_text_measured(now, true);
    }

    /// Handle session notifications, remeasuring when asked to
    fn process_session_events(&mut self, now: Instant) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::TextMeasured { measured: false } => self.needs_measure = true,
                SessionEvent::PauseScroll => self.set_status("Paused while held"),
                SessionEvent::DoubleTap => self.set_status("Reset to top"),
                SessionEvent::LoopRestarted => self.set_status("Looping from the top"),
                SessionEvent::ResumeScroll | SessionEvent::ScrollStarted => {
                    self.status_message = None;
                }
                _ => {}
            }
        }

        if self.needs_measure {
            self.needs_measure = false;
            self.measure(now);
            // Measuring emits events of its own
            while let Ok(event) = self.events.try_recv() {
                if let SessionEvent::ScrollStarted = event {
                    self.status_message = None;
                }
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => {
                self.session.teardown();
                self.should_quit = true;
            }
            Action::ToggleRecording => {
                let recording = !self.session.is_recording();
                self.session.set_recording(now, recording);
            }
            Action::TogglePause => {
                let paused = !self.session.is_paused();
                self.session.set_paused(now, paused);
            }
            Action::ToggleFocus => {
                let focused = !self.session.is_focused();
                self.session.set_focused(now, focused);
            }
            Action::SpeedUp => {
                let speed = self.session.scroll_speed() as i32 + SPEED_STEP;
                self.session.update_scroll_speed(now, speed);
            }
            Action::SpeedDown => {
                let speed = self.session.scroll_speed() as i32 - SPEED_STEP;
                self.session.update_scroll_speed(now, speed);
            }
            Action::CycleMethod => {
                let mut method_config = self.session.method_config().clone();
                method_config.method = method_config.method.next();
                self.set_status(format!("Method: {}", method_config.method.label()));
                self.session.set_method_config(now, method_config);
            }
            Action::ReloadScript => self.reload_script(now),
            Action::ResetContainer => self.session.reset_container_position(now),
            Action::None => {}
        }
        self.process_session_events(now);
    }

    fn reload_script(&mut self, now: Instant) {
        let Some(path) = self.script_path.clone() else {
            self.set_status("No script file to reload");
            return;
        };
        match Script::load(&path) {
            Ok(script) => {
                self.session.set_script(now, &script);
                self.set_status(format!("Reloaded {}", script.title));
                self.script = script;
            }
            Err(e) => {
                warn!("Failed to reload script {}: {}", path.display(), e);
                self.set_status(format!("Reload failed: {}", e));
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let rect = self.container_rect();
                if !contains(rect, col, row) {
                    return;
                }
                if row == rect.y {
                    self.pointer = Pointer::Dragging { origin_row: row };
                    self.session.drag_grant();
                } else if row + 1 == rect.y + rect.height {
                    self.pointer = Pointer::Resizing { origin_row: row };
                    self.session.resize_grant(now);
                } else {
                    self.pointer = Pointer::Touching;
                    let point = Point::new(
                        (col - rect.x) as f64 * self.cell_width(),
                        (row - rect.y) as f64 * self.cell_height(),
                    );
                    self.session.touch_down(now, point);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.pointer {
                Pointer::Dragging { origin_row } => {
                    self.session.drag_move(self.row_delta(origin_row, row));
                }
                Pointer::Resizing { origin_row } => {
                    self.session.resize_move(now, self.row_delta(origin_row, row));
                }
                Pointer::Touching | Pointer::Idle => {}
            },
            MouseEventKind::Up(MouseButton::Left) => {
                match self.pointer {
                    Pointer::Dragging { origin_row } => {
                        self.session.drag_release(self.row_delta(origin_row, row));
                    }
                    Pointer::Resizing { origin_row } => {
                        self.session.resize_move(now, self.row_delta(origin_row, row));
                        self.session.resize_release(now);
                    }
                    Pointer::Touching => self.session.touch_up(now),
                    Pointer::Idle => {}
                }
                self.pointer = Pointer::Idle;
            }
            _ => {}
        }
        self.process_session_events(now);
    }

    fn row_delta(&self, origin_row: u16, row: u16) -> f64 {
        (row as f64 - origin_row as f64) * self.cell_height()
    }

    pub fn on_resize(&mut self, cols: u16, rows: u16, now: Instant) {
        self.cols = cols;
        self.rows = rows;
        let screen_height = prompter_rows(rows) as f64 * self.cell_height();
        self.session.set_screen(now, screen_height, SafeArea::default());
        self.measure(now);
        self.process_session_events(now);
    }

    pub fn on_focus(&mut self, focused: bool, now: Instant) {
        self.session.set_focused(now, focused);
        self.process_session_events(now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
        self.process_session_events(now);
    }

    /// Poll at the animation rate while something moves on screen
    pub fn needs_fast_update(&self) -> bool {
        self.session.is_animating() || self.pointer != Pointer::Idle
    }

    /// Time until the session has a timer or animation end to process
    pub fn time_until_deadline(&self, now: Instant) -> Option<Duration> {
        self.session
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Estimated time left in the current pass
    pub fn remaining(&self) -> Duration {
        let result = self.session.calculate_duration();
        if result.total_distance <= 0.0 {
            return Duration::ZERO;
        }
        let left = (self.session.position() - result.end_position).max(0.0);
        let ms = result.duration * left / result.total_distance;
        if ms.is_finite() {
            Duration::from_millis(ms as u64)
        } else {
            Duration::ZERO
        }
    }
}

fn prompter_rows(rows: u16) -> u16 {
    rows.saturating_sub(1)
}

fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn app(t0: Instant) -> App {
        let script = Script::from_text("demo", "word ".repeat(400));
        App::new(AppConfig::default(), script, None, 80, 41, t0)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_initial_layout_and_measurement() {
        let t0 = Instant::now();
        let app = app(t0);

        // 300px tall container at 80px from the top, 20px rows
        assert_eq!(app.container_rect(), Rect::new(2, 4, 76, 15));
        assert_eq!(app.text_area().width, 72);
        assert!(!app.wrapped.is_empty());
        assert!(app.session.scroll_state().is_text_measured);
        assert_eq!(
            app.session.scroll_state().text_height,
            app.wrapped.len() as f64 * 20.0
        );
    }

    #[test]
    fn test_recording_key_starts_scrolling() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.handle_action(Action::ToggleRecording, t0);
        assert!(app.session.is_animating());
        assert!(app.needs_fast_update());

        app.tick(t0 + ms(2000));
        assert!(app.scroll_rows() < 1);

        app.handle_action(Action::TogglePause, t0 + ms(2000));
        assert!(!app.session.is_animating());
    }

    #[test]
    fn test_speed_keys_clamp() {
        let t0 = Instant::now();
        let mut app = app(t0);
        for _ in 0..100 {
            app.handle_action(Action::SpeedUp, t0);
        }
        assert_eq!(app.session.scroll_speed(), 100);
        for _ in 0..100 {
            app.handle_action(Action::SpeedDown, t0);
        }
        assert_eq!(app.session.scroll_speed(), 1);
    }

    #[test]
    fn test_drag_handle_moves_container() {
        let t0 = Instant::now();
        let mut app = app(t0);
        let rect = app.container_rect();

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, rect.y), t0);
        assert_eq!(app.pointer, Pointer::Dragging { origin_row: rect.y });
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10, rect.y + 3), t0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 10, rect.y + 3), t0);

        assert_eq!(app.pointer, Pointer::Idle);
        assert_eq!(app.container_rect().y, rect.y + 3);
    }

    #[test]
    fn test_resize_handle_grows_container() {
        let t0 = Instant::now();
        let mut app = app(t0);
        let rect = app.container_rect();
        let bottom = rect.y + rect.height - 1;

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, bottom), t0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10, bottom + 1), t0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10, bottom + 5), t0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 10, bottom + 5), t0);

        // The first drag sample only anchors the gesture
        assert_eq!(app.container_rect().height, rect.height + 4);
    }

    #[test]
    fn test_tap_on_text_toggles_touch_pause() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.handle_action(Action::ToggleRecording, t0);
        let rect = app.container_rect();

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 20, rect.y + 5), t0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20, rect.y + 5), t0 + ms(50));
        app.tick(t0 + ms(400));

        assert!(app.session.is_touch_paused());
        assert!(!app.session.is_animating());
    }

    #[test]
    fn test_cycle_method_and_reset_container() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.handle_action(Action::CycleMethod, t0);
        assert_eq!(app.status_message.as_deref(), Some("Method: wpm"));

        app.session.drag_grant();
        app.session.drag_release(200.0);
        app.handle_action(Action::ResetContainer, t0);
        assert_eq!(app.container_rect().y, 4);
    }

    #[test]
    fn test_reload_without_path_reports_status() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.handle_action(Action::ReloadScript, t0);
        assert_eq!(app.status_message.as_deref(), Some("No script file to reload"));
    }

    #[test]
    fn test_quit_tears_down_session() {
        let t0 = Instant::now();
        let mut app = app(t0);
        app.handle_action(Action::ToggleRecording, t0);
        app.handle_action(Action::Quit, t0);
        assert!(app.should_quit);
        assert!(app.session.is_disposed());
        assert!(!app.session.is_animating());
    }
}
