use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use qanun_types::{Message, Role};

use crate::branding::{BOT_BADGE, USER_LABEL};
use crate::context::{Transcript, TranscriptEntry};
use crate::theme::Theme;
use crate::ui::{sanitize_terminal, wrap_text};

const CONTENT_INDENT: &str = "  ";

/// Renders the conversation. Bot turns carry a badge and sit on the left;
/// user turns are right-aligned, matching the right-to-left chat layout.
pub struct TranscriptView;

impl TranscriptView {
    pub fn build_lines(
        transcript: &Transcript,
        width: u16,
        theme: &Theme,
        spinner_frame: &str,
    ) -> Vec<Line<'static>> {
        let content_width = (width as usize).saturating_sub(CONTENT_INDENT.len() * 2).max(8);
        let mut lines = Vec::new();

        for entry in transcript.entries() {
            match entry {
                TranscriptEntry::Message(message) => {
                    push_message(&mut lines, message, content_width, theme)
                }
                TranscriptEntry::Typing => {
                    lines.push(badge_line(theme));
                    lines.push(Line::from(vec![
                        Span::raw(CONTENT_INDENT),
                        Span::styled(spinner_frame.to_string(), Style::default().fg(theme.bot_message)),
                        Span::styled(" • • •", Style::default().fg(theme.text_muted)),
                    ]));
                    lines.push(Line::default());
                }
            }
        }

        lines
    }

    /// Scroll offset from the top that keeps `scroll_back` lines below the view.
    pub fn top_offset(total_lines: usize, viewport: usize, scroll_back: usize) -> usize {
        total_lines
            .saturating_sub(viewport)
            .saturating_sub(scroll_back)
    }

    pub fn max_scroll_back(total_lines: usize, viewport: usize) -> usize {
        total_lines.saturating_sub(viewport)
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        lines: Vec<Line<'static>>,
        scroll_back: usize,
        theme: &Theme,
    ) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let total = lines.len();
        let offset = Self::top_offset(total, inner.height as usize, scroll_back);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(theme.text))
                .scroll((offset, 0)),
            inner,
        );

        if scroll_back > 0 {
            let hint = format!(" ↓ {} ", scroll_back);
            let width = hint.chars().count() as u16;
            if inner.width > width && inner.height > 0 {
                frame.render_widget(
                    Paragraph::new(Span::styled(hint, Style::default().fg(theme.text_muted))),
                    Rect {
                        x: inner.x + inner.width - width,
                        y: inner.y + inner.height - 1,
                        width,
                        height: 1,
                    },
                );
            }
        }
    }
}

fn badge_line(theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("◆ ", Style::default().fg(theme.bot_message)),
        Span::styled(
            BOT_BADGE,
            Style::default()
                .fg(theme.bot_message)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn push_message(lines: &mut Vec<Line<'static>>, message: &Message, width: usize, theme: &Theme) {
    let text = sanitize_terminal(&message.text);
    let time = message.clock();
    match message.role {
        Role::Bot => {
            lines.push(badge_line(theme));
            for row in wrap_text(&text, width) {
                lines.push(Line::from(vec![
                    Span::raw(CONTENT_INDENT),
                    Span::styled(row, Style::default().fg(theme.text)),
                ]));
            }
            lines.push(Line::from(vec![
                Span::raw(CONTENT_INDENT),
                Span::styled(time, Style::default().fg(theme.text_muted)),
            ]));
        }
        Role::User => {
            lines.push(
                Line::from(Span::styled(
                    USER_LABEL,
                    Style::default()
                        .fg(theme.user_message)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Right),
            );
            for row in wrap_text(&text, width) {
                lines.push(
                    Line::from(Span::styled(row, Style::default().fg(theme.user_message)))
                        .alignment(Alignment::Right),
                );
            }
            lines.push(
                Line::from(Span::styled(time, Style::default().fg(theme.text_muted)))
                    .alignment(Alignment::Right),
            );
        }
    }
    lines.push(Line::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn bot_turn_has_badge_content_and_time() {
        let mut transcript = Transcript::new();
        let message = Message::bot("جواب");
        let time = message.clock();
        transcript.append(message);
        let lines = TranscriptView::build_lines(&transcript, 80, &Theme::dark(), "⠋");
        let rendered: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            rendered,
            vec![
                format!("◆ {}", BOT_BADGE),
                "  جواب".to_string(),
                format!("  {}", time),
                String::new()
            ]
        );
    }

    #[test]
    fn user_turn_is_right_aligned_without_badge() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("سؤال"));
        let lines = TranscriptView::build_lines(&transcript, 80, &Theme::dark(), "⠋");
        assert!(lines
            .iter()
            .all(|l| l.spans.is_empty() || l.alignment == Some(Alignment::Right)));
        assert!(!lines.iter().any(|l| plain(l).contains(BOT_BADGE)));
    }

    #[test]
    fn control_sequences_never_reach_the_terminal() {
        let mut transcript = Transcript::new();
        transcript.append(Message::bot("\x1b[2Jwiped"));
        let lines = TranscriptView::build_lines(&transcript, 80, &Theme::dark(), "⠋");
        assert!(lines.iter().all(|l| !plain(l).contains('\x1b')));
        assert!(lines.iter().any(|l| plain(l).contains("wiped")));
    }

    #[test]
    fn typing_placeholder_renders_spinner() {
        let mut transcript = Transcript::new();
        transcript.show_typing();
        let lines = TranscriptView::build_lines(&transcript, 80, &Theme::dark(), "⠙");
        assert!(plain(&lines[1]).contains('⠙'));
    }

    #[test]
    fn offsets_follow_tail() {
        assert_eq!(TranscriptView::top_offset(100, 20, 0), 80);
        assert_eq!(TranscriptView::top_offset(100, 20, 30), 50);
        assert_eq!(TranscriptView::top_offset(10, 20, 0), 0);
        assert_eq!(TranscriptView::max_scroll_back(100, 20), 80);
    }
}
