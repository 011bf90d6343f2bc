use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::export::{default_filename, ExportFormat};
use crate::theme::Theme;

/// Asks for the download filename and format.
pub struct ExportDialog {
    open: bool,
    filename: String,
    format: ExportFormat,
    /// Whether the user edited the name; toggling format then keeps it.
    edited: bool,
}

impl ExportDialog {
    pub fn new() -> Self {
        Self {
            open: false,
            filename: String::new(),
            format: ExportFormat::Text,
            edited: false,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.edited = false;
        self.filename = default_filename(self.format);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.filename.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn handle_input(&mut self, c: char) {
        if !c.is_control() {
            self.filename.push(c);
            self.edited = true;
        }
    }

    pub fn handle_backspace(&mut self) {
        self.filename.pop();
        self.edited = true;
    }

    pub fn toggle_format(&mut self) {
        self.format = self.format.toggle();
        if !self.edited {
            self.filename = default_filename(self.format);
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.open {
            return;
        }

        let dialog_area = super::centered_rect(70, 9, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(Span::styled(" تنزيل المحادثة ", theme.title_style()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_active))
            .style(Style::default().bg(theme.background_panel));
        let inner = super::dialog_inner(block.inner(dialog_area));
        frame.render_widget(block, dialog_area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled("اسم الملف:", Style::default().fg(theme.text_muted))),
            layout[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{}▏", self.filename),
                Style::default()
                    .fg(theme.text)
                    .bg(theme.background_element),
            )),
            layout[1],
        );

        let format_span = |format: ExportFormat| {
            let style = if self.format == format {
                Style::default()
                    .fg(theme.background_panel)
                    .bg(theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_muted)
            };
            Span::styled(format!(" {} ", format.label()), style)
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("الصيغة: ", Style::default().fg(theme.text_muted)),
                format_span(ExportFormat::Text),
                Span::raw(" "),
                format_span(ExportFormat::Html),
            ])),
            layout[3],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Enter", Style::default().fg(theme.primary)),
                Span::styled(" حفظ  ", Style::default().fg(theme.text_muted)),
                Span::styled("Tab", Style::default().fg(theme.primary)),
                Span::styled(" الصيغة  ", Style::default().fg(theme.text_muted)),
                Span::styled("Esc", Style::default().fg(theme.primary)),
                Span::styled(" إلغاء", Style::default().fg(theme.text_muted)),
            ])),
            layout[5],
        );
    }
}

impl Default for ExportDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_toggle_renames_untouched_default() {
        let mut dialog = ExportDialog::new();
        dialog.open();
        assert!(dialog.filename().ends_with(".txt"));
        dialog.toggle_format();
        assert!(dialog.filename().ends_with(".html"));
        dialog.handle_backspace();
        dialog.toggle_format();
        assert!(dialog.filename().ends_with(".htm"));
        assert_eq!(dialog.format(), ExportFormat::Text);
    }
}
