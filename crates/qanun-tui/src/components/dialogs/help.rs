use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "المحادثة",
        &[
            ("Enter", "إرسال السؤال"),
            ("Alt+Enter", "سطر جديد"),
            ("Ctrl+N", "محادثة جديدة"),
            ("Ctrl+L", "مسح المحادثة"),
            ("PgUp/PgDn", "تمرير المحادثة"),
        ],
    ),
    (
        "الأدوات",
        &[
            ("Alt+1..6", "اختيار المجال القانوني"),
            ("Ctrl+O", "المجال التالي"),
            ("Ctrl+K", "لوحة المفاتيح العربية"),
            ("Ctrl+R", "الإملاء الصوتي"),
            ("Ctrl+D", "تنزيل المحادثة"),
        ],
    ),
    (
        "التنقل",
        &[
            ("Tab", "التنقل بين الحقل والسجل ولوحة المفاتيح"),
            ("Ctrl+B", "إظهار/إخفاء السجل"),
            ("F1", "المساعدة"),
            ("Esc", "إلغاء/إغلاق"),
            ("Ctrl+C", "خروج"),
        ],
    ),
];

pub struct HelpDialog {
    open: bool,
}

impl HelpDialog {
    pub fn new() -> Self {
        Self { open: false }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.open {
            return;
        }

        let rows: usize = SECTIONS.iter().map(|(_, keys)| keys.len() + 2).sum();
        let dialog_area = super::centered_rect(64, rows as u16 + 3, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(" المساعدة ", theme.title_style()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.background_panel));
        let inner = super::dialog_inner(block.inner(dialog_area));
        frame.render_widget(block, dialog_area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let mut lines = Vec::new();
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(
                *title,
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, action) in *keys {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<11}", key), Style::default().fg(theme.accent)),
                    Span::styled(*action, Style::default().fg(theme.text)),
                ]));
            }
            lines.push(Line::from(""));
        }

        frame.render_widget(Paragraph::new(lines), layout[0]);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Esc", Style::default().fg(theme.primary)),
                Span::styled(" إغلاق", Style::default().fg(theme.text_muted)),
            ])),
            layout[1],
        );
    }
}

impl Default for HelpDialog {
    fn default() -> Self {
        Self::new()
    }
}
