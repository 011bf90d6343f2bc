use anyhow::Context;
use chrono::{NaiveDate, Utc};
use qanun_types::{Message, Role};
use std::path::{Path, PathBuf};

use crate::branding::APP_NAME;
use crate::context::Transcript;
use crate::ui::escape_markup;

pub const EXPORT_HEADER: &str = "محادثة المساعد القانوني الذكي";
const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Text,
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ExportFormat::Text => ExportFormat::Html,
            ExportFormat::Html => ExportFormat::Text,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Text => "text",
            ExportFormat::Html => "html",
        }
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "المستخدم",
        Role::Bot => "المساعد",
    }
}

/// Plain-text download of the conversation, built from the messages
/// themselves rather than from anything rendered.
pub fn transcript_text<'a, I>(messages: I) -> String
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut out = String::new();
    out.push_str(EXPORT_HEADER);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");
    for message in messages {
        out.push_str(&format!(
            "[{}] {}\n{}\n\n",
            role_label(message.role),
            message.clock(),
            message.text
        ));
    }
    out
}

/// Standalone right-to-left HTML page around the transcript markup.
pub fn transcript_html(transcript: &Transcript) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ar\" dir=\"rtl\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n<div id=\"chat-messages\">\n{}</div>\n</body>\n</html>\n",
        escape_markup(APP_NAME),
        transcript.to_markup()
    )
}

pub fn render(transcript: &Transcript, format: ExportFormat) -> String {
    match format {
        ExportFormat::Text => transcript_text(transcript.messages()),
        ExportFormat::Html => transcript_html(transcript),
    }
}

pub fn default_filename_for(date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "محادثة-قانونية-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn default_filename(format: ExportFormat) -> String {
    default_filename_for(Utc::now().date_naive(), format)
}

/// Resolves `filename` against the export directory, or the current
/// directory when none is configured.
pub fn resolve_export_path(export_dir: Option<&Path>, filename: &str) -> PathBuf {
    let path = PathBuf::from(filename);
    if path.is_absolute() {
        return path;
    }
    match export_dir {
        Some(dir) => dir.join(path),
        None => std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path),
    }
}

pub fn write_export(path: &Path, content: &str) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "transcript exported");
    Ok(path.to_path_buf())
}
