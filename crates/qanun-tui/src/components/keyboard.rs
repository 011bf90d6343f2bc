use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::branding::KEYBOARD_TITLE;
use crate::input::{ArabicKeyboard, KeyCap};
use crate::theme::Theme;
use crate::ui::display_width;

const KEY_GAP: u16 = 1;

/// Draws the on-screen keyboard. Rows run right to left: the first key of
/// each row sits at its right edge.
pub struct KeyboardView;

impl KeyboardView {
    pub fn height(keyboard: &ArabicKeyboard) -> u16 {
        keyboard.rows().len() as u16 + 2
    }

    fn key_width(key: &KeyCap) -> u16 {
        display_width(key.label) as u16 + 2
    }

    /// Screen rectangles of every key in a row, in row order.
    fn row_rects(body: Rect, y: u16, row: &[KeyCap]) -> Vec<Rect> {
        let widths: Vec<u16> = row.iter().map(Self::key_width).collect();
        let total: u16 =
            widths.iter().sum::<u16>() + KEY_GAP * (widths.len().saturating_sub(1) as u16);
        let start = body.x + body.width.saturating_sub(total) / 2;
        let mut right = start + total.min(body.width);
        widths
            .iter()
            .map(|w| {
                let x = right.saturating_sub(*w).max(body.x);
                let rect = Rect {
                    x,
                    y,
                    width: (*w).min(right.saturating_sub(x)),
                    height: 1,
                };
                right = x.saturating_sub(KEY_GAP);
                rect
            })
            .collect()
    }

    fn body(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    pub fn key_at(keyboard: &ArabicKeyboard, area: Rect, x: u16, y: u16) -> Option<(usize, usize)> {
        let body = Self::body(area);
        if y < body.y {
            return None;
        }
        let row_index = (y - body.y) as usize;
        let row = keyboard.rows().get(row_index)?;
        Self::row_rects(body, y, row)
            .iter()
            .position(|rect| rect.width > 0 && x >= rect.x && x < rect.x + rect.width)
            .map(|col| (row_index, col))
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        keyboard: &ArabicKeyboard,
        theme: &Theme,
        focused: bool,
    ) {
        let block = Block::default()
            .title(Span::styled(format!(" {} ", KEYBOARD_TITLE), theme.title_style()))
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused))
            .style(Style::default().bg(theme.background_panel));
        let body = Self::body(area);
        frame.render_widget(block, area);

        let (cursor_row, cursor_col) = keyboard.cursor();
        for (row_index, row) in keyboard.rows().iter().enumerate() {
            let y = body.y + row_index as u16;
            if y >= body.y + body.height {
                break;
            }
            for (col, (key, rect)) in row.iter().zip(Self::row_rects(body, y, row)).enumerate() {
                if rect.width == 0 {
                    continue;
                }
                let selected = focused && row_index == cursor_row && col == cursor_col;
                let style = if selected {
                    Style::default()
                        .fg(theme.background_panel)
                        .bg(theme.primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text).bg(theme.background_element)
                };
                frame.render_widget(
                    Paragraph::new(Span::styled(format!(" {} ", key.label), style)),
                    rect,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn first_key_sits_on_the_right() {
        let keyboard = ArabicKeyboard::new();
        let area = Rect::new(0, 0, 80, KeyboardView::height(&keyboard));
        let body = KeyboardView::body(area);
        let rects = KeyboardView::row_rects(body, body.y, keyboard.rows()[0]);
        assert!(rects[0].x > rects[1].x);
        assert!(rects.windows(2).all(|w| w[1].x + w[1].width < w[0].x + 1));
    }

    #[test]
    fn click_resolves_to_key() {
        let keyboard = ArabicKeyboard::new();
        let area = Rect::new(0, 0, 80, KeyboardView::height(&keyboard));
        let body = KeyboardView::body(area);
        let control_y = body.y + 4;
        let rects = KeyboardView::row_rects(body, control_y, keyboard.rows()[4]);
        let close = rects[2];
        let hit = KeyboardView::key_at(&keyboard, area, close.x + 1, control_y);
        assert_eq!(hit, Some((4, 2)));
        assert_eq!(keyboard.rows()[4][2].action, KeyAction::Close);
        assert_eq!(KeyboardView::key_at(&keyboard, area, 0, control_y), None);
    }
}
