use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::branding::RECORDING_LABEL;
use crate::input::Dictation;
use crate::theme::Theme;

pub struct RecordingIndicator;

impl RecordingIndicator {
    pub fn render(frame: &mut Frame, area: Rect, dictation: &Dictation, theme: &Theme) {
        if !dictation.is_recording() {
            return;
        }
        let line = Line::from(vec![
            Span::styled(
                "● ",
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(RECORDING_LABEL, Style::default().fg(theme.error)),
            Span::raw("  "),
            Span::styled(
                dictation.clock(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   [Esc] إلغاء", Style::default().fg(theme.text_muted)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
