use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Info,
    Success,
    Warning,
    Error,
}

/// Blocking notice; closes on Enter or Esc.
pub struct AlertDialog {
    title: String,
    message: String,
    alert_type: AlertType,
    open: bool,
}

impl AlertDialog {
    pub fn new(title: &str, message: &str, alert_type: AlertType) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            alert_type,
            open: false,
        }
    }

    /// Replaces the content and opens the dialog.
    pub fn show(&mut self, alert_type: AlertType, message: &str) {
        self.alert_type = alert_type;
        self.title = match alert_type {
            AlertType::Info => "تنبيه",
            AlertType::Success => "تم",
            AlertType::Warning => "تحذير",
            AlertType::Error => "خطأ",
        }
        .to_string();
        self.message = message.to_string();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    fn color(&self, theme: &Theme) -> ratatui::style::Color {
        match self.alert_type {
            AlertType::Info => theme.info,
            AlertType::Success => theme.success,
            AlertType::Warning => theme.warning,
            AlertType::Error => theme.error,
        }
    }

    fn icon(&self) -> &str {
        match self.alert_type {
            AlertType::Info => "ℹ",
            AlertType::Success => "✓",
            AlertType::Warning => "⚠",
            AlertType::Error => "✗",
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.open {
            return;
        }

        let color = self.color(theme);
        let line_count = self.message.lines().count().max(1);
        let dialog_width = 60.min(area.width.saturating_sub(4));
        let dialog_height = (line_count + 6).min(16) as u16;
        let dialog_area = super::centered_rect(dialog_width, dialog_height, area);

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} {} ", self.icon(), self.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.background_panel));

        let inner = super::dialog_inner(block.inner(dialog_area));
        frame.render_widget(block, dialog_area);

        frame.render_widget(
            Paragraph::new(self.message.clone())
                .style(Style::default().fg(theme.text))
                .wrap(Wrap { trim: false })
                .alignment(Alignment::Center),
            Rect {
                x: inner.x,
                y: inner.y + 1,
                width: inner.width,
                height: inner.height.saturating_sub(3),
            },
        );

        let ok_button = Line::from(Span::styled(
            " [ موافق ] ",
            Style::default().fg(theme.text).bg(color),
        ));
        frame.render_widget(
            Paragraph::new(ok_button).alignment(Alignment::Center),
            Rect {
                x: inner.x,
                y: inner.y + inner.height.saturating_sub(2),
                width: inner.width,
                height: 1,
            },
        );
    }
}

impl Default for AlertDialog {
    fn default() -> Self {
        Self::new("", "", AlertType::Info)
    }
}
