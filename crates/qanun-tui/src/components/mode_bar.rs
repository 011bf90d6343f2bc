use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use qanun_types::Mode;

use crate::input::ModeSelector;
use crate::theme::Theme;
use crate::ui::display_width;

pub struct ModeBar;

impl ModeBar {
    fn chip(index: usize, mode: Mode) -> String {
        format!(" {} {} ", index + 1, mode.label())
    }

    /// Mode under a click inside the bar, if any.
    pub fn mode_at(area: Rect, x: u16, y: u16) -> Option<Mode> {
        if y != area.y || x < area.x {
            return None;
        }
        let column = (x - area.x) as usize;
        let mut start = 0;
        for (i, mode) in Mode::ALL.iter().enumerate() {
            let end = start + display_width(&Self::chip(i, *mode));
            if column >= start && column < end {
                return Some(*mode);
            }
            start = end + 1;
        }
        None
    }

    pub fn render(frame: &mut Frame, area: Rect, selector: &ModeSelector, theme: &Theme) {
        let mut spans = Vec::new();
        for (i, mode) in Mode::ALL.iter().enumerate() {
            let active = selector.is_active(*mode);
            let style = if active {
                Style::default()
                    .fg(theme.background_panel)
                    .bg(theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_muted)
            };
            spans.push(Span::styled(Self::chip(i, *mode), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_map_to_chips() {
        let area = Rect::new(2, 5, 120, 1);
        assert_eq!(ModeBar::mode_at(area, 2, 5), Some(Mode::General));
        let second = 2 + display_width(&ModeBar::chip(0, Mode::General)) as u16 + 1;
        assert_eq!(ModeBar::mode_at(area, second, 5), Some(Mode::Family));
        assert_eq!(ModeBar::mode_at(area, second - 1, 5), None);
        assert_eq!(ModeBar::mode_at(area, 2, 6), None);
    }
}
