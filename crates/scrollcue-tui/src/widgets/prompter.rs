use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Pointer};

/// The movable, resizable text container
pub struct PrompterWidget;

impl PrompterWidget {
    pub fn render(frame: &mut Frame, app: &App) {
        let theme = &app.theme;
        let rect = app.container_rect();
        if rect.width < 4 || rect.height < 3 {
            return;
        }

        let border_color = match app.pointer {
            Pointer::Dragging { .. } | Pointer::Resizing { .. } => theme.border_active,
            _ if app.session.is_touch_paused() => theme.yellow,
            _ => theme.border,
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Line::from(" ═ drag ═ ").alignment(Alignment::Center))
            .title_bottom(Line::from(" ═ resize ═ ").alignment(Alignment::Center))
            .style(Style::default().bg(theme.bg0));
        if app.session.is_reset_indicator_visible() {
            block = block.title(
                Line::from(" ↺ ")
                    .alignment(Alignment::Right)
                    .style(Style::default().fg(theme.aqua)),
            );
        }

        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        let text_area = app.text_area();
        let lines = visible_lines(&app.wrapped, app.scroll_rows(), text_area.height)
            .into_iter()
            .map(|line| {
                Line::styled(
                    line,
                    Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
                )
            })
            .collect::<Vec<_>>();

        frame.render_widget(Paragraph::new(lines), text_area);
    }
}

/// Rows to draw for a scroll offset. A positive offset leaves blank rows
/// above the text; a negative one skips lines that scrolled out.
fn visible_lines(wrapped: &[String], offset_rows: i32, height: u16) -> Vec<&str> {
    let height = height as usize;
    let blank = offset_rows.max(0) as usize;
    let skip = offset_rows.min(0).unsigned_abs() as usize;

    std::iter::repeat("")
        .take(blank)
        .chain(wrapped.iter().skip(skip).map(String::as_str))
        .take(height)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {}", i)).collect()
    }

    #[test]
    fn test_positive_offset_pads_top() {
        let wrapped = lines(3);
        assert_eq!(visible_lines(&wrapped, 1, 3), vec!["", "line 0", "line 1"]);
    }

    #[test]
    fn test_negative_offset_skips_lines() {
        let wrapped = lines(10);
        assert_eq!(visible_lines(&wrapped, -8, 5), vec!["line 8", "line 9"]);
        assert!(visible_lines(&wrapped, -20, 5).is_empty());
    }
}
