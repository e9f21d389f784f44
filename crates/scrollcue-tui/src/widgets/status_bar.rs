use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let session = &app.session;

        let (mode_str, mode_color) = if !session.is_recording() {
            (" IDLE ", theme.grey2)
        } else if session.is_paused() || session.is_touch_paused() {
            (" PAUSED ", theme.yellow)
        } else {
            (" REC ", theme.red)
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let mut text = format!(
                " {} | speed {} | {} left",
                session.method_config().method.label(),
                session.scroll_speed(),
                format_remaining(app.remaining()),
            );
            if !session.is_focused() {
                text.push_str(" | unfocused");
            }
            if session.is_reset_indicator_visible() {
                text.push_str(" | reset");
            }
            text
        };

        let help_hint = " q:quit space:rec p:pause +/-:speed m:method ";
        let used = mode_str.width() + status_text.width() + help_hint.width();
        let padding_len = (area.width as usize).saturating_sub(used);

        let bar = Style::default().bg(theme.bg2);
        let line = Line::from(vec![
            Span::styled(
                mode_str,
                Style::default()
                    .fg(theme.bg0)
                    .bg(mode_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(status_text, bar.fg(theme.fg0)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.grey2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// `m:ss`, rounded down
fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::ZERO), "0:00");
        assert_eq!(format_remaining(Duration::from_millis(59_999)), "0:59");
        assert_eq!(format_remaining(Duration::from_secs(185)), "3:05");
    }
}
