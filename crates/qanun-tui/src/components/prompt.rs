use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::branding::INPUT_PLACEHOLDER;
use crate::input::{InputField, ModeSelector};
use crate::theme::Theme;
use crate::ui::{display_width, sanitize_terminal, wrap_text};

const MAX_VISIBLE_LINES: usize = 4;

pub struct Prompt;

impl Prompt {
    fn body_width(width: u16) -> usize {
        (width as usize).saturating_sub(4).max(1)
    }

    /// Rows needed for the draft, borders included.
    pub fn height(input: &InputField, width: u16) -> u16 {
        let lines = wrap_text(input.text(), Self::body_width(width)).len();
        (lines.clamp(1, MAX_VISIBLE_LINES) + 2) as u16
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        input: &InputField,
        modes: &ModeSelector,
        busy_frame: Option<&str>,
        theme: &Theme,
        focused: bool,
    ) {
        let mut title = vec![Span::styled(
            format!(" {} ", modes.active().label()),
            theme.title_style(),
        )];
        if let Some(frame_symbol) = busy_frame {
            title.push(Span::styled(
                format!("{} ", frame_symbol),
                Style::default().fg(theme.accent),
            ));
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused))
            .style(Style::default().bg(theme.background_panel));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let body = Rect {
            x: inner.x + 1,
            width: inner.width.saturating_sub(2),
            ..inner
        };
        if body.height == 0 || body.width == 0 {
            return;
        }

        if input.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    INPUT_PLACEHOLDER,
                    Style::default()
                        .fg(theme.text_muted)
                        .add_modifier(Modifier::ITALIC),
                )),
                body,
            );
            if focused {
                frame.set_cursor(body.x, body.y);
            }
            return;
        }

        let width = Self::body_width(area.width);
        let rows = wrap_text(&sanitize_terminal(input.text()), width);
        let (before, _) = input.split_at_cursor();
        let before_rows = wrap_text(&sanitize_terminal(before), width);
        let cursor_row = before_rows.len().saturating_sub(1);
        let cursor_col = before_rows.last().map(|r| display_width(r)).unwrap_or(0);

        let visible = body.height as usize;
        let skip = (cursor_row + 1).saturating_sub(visible);
        let lines: Vec<Line> = rows
            .into_iter()
            .skip(skip)
            .take(visible)
            .map(|row| Line::from(Span::styled(row, Style::default().fg(theme.text))))
            .collect();
        frame.render_widget(Paragraph::new(lines), body);

        if focused {
            let x = body.x + (cursor_col as u16).min(body.width.saturating_sub(1));
            let y = body.y + (cursor_row - skip) as u16;
            frame.set_cursor(x, y);
        }
    }
}
