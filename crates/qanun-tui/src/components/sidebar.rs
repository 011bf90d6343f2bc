use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::branding::HISTORY_TITLE;
use crate::context::{HistoryRow, SessionHistoryStore};
use crate::theme::Theme;
use crate::ui::{sanitize_terminal, truncate};

/// Session history list. Keeps a keyboard cursor and a scroll offset; the
/// active row itself comes from the store.
#[derive(Debug, Default)]
pub struct Sidebar {
    cursor: usize,
    offset: usize,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    /// Puts the cursor on the active row, e.g. after a refresh.
    pub fn follow_active(&mut self, history: &SessionHistoryStore) {
        self.cursor = history.active_index().unwrap_or(0);
    }

    /// Clamps cursor and offset for a list of `len` rows in a body of `height` rows.
    pub fn sync(&mut self, len: usize, height: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
        let height = height.max(1);
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
        self.offset = self.offset.min(len.saturating_sub(height));
    }

    pub fn body_area(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    /// Maps a click position to a session index.
    pub fn row_at(&self, area: Rect, x: u16, y: u16, len: usize) -> Option<usize> {
        let body = Self::body_area(area);
        if x < body.x || x >= body.x + body.width || y < body.y || y >= body.y + body.height {
            return None;
        }
        let index = self.offset + (y - body.y) as usize;
        (index < len).then_some(index)
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        history: &SessionHistoryStore,
        theme: &Theme,
        focused: bool,
    ) {
        let block = Block::default()
            .title(Span::styled(format!(" {} ", HISTORY_TITLE), theme.title_style()))
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused))
            .style(Style::default().bg(theme.background_panel));
        let body = block.inner(area);
        frame.render_widget(block, area);

        let width = body.width as usize;
        let lines: Vec<Line> = history
            .rows()
            .into_iter()
            .enumerate()
            .skip(self.offset)
            .take(body.height as usize)
            .map(|(index, row)| match row {
                HistoryRow::Placeholder(text) => Line::from(Span::styled(
                    text,
                    Style::default().fg(theme.text_muted),
                )),
                HistoryRow::Session { summary, active } => {
                    let title = truncate(
                        &sanitize_terminal(&summary.title).replace('\n', " "),
                        width.saturating_sub(3),
                    );
                    let mut style = Style::default().fg(theme.text);
                    if active {
                        style = style
                            .fg(theme.primary)
                            .bg(theme.background_element)
                            .add_modifier(Modifier::BOLD);
                    }
                    if focused && index == self.cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let marker = if active { "▌" } else { " " };
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(theme.primary)),
                        Span::styled(format!(" {}", title), style),
                    ])
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), body);
    }
}
