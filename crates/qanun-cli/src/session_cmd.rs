use anyhow::Context;
use std::path::PathBuf;

use qanun_config::Config;
use qanun_tui::context::HistoryRow;
use qanun_tui::export::{self, default_filename, resolve_export_path, write_export};
use qanun_tui::ui::sanitize_terminal;
use qanun_tui::{ApiClient, ChatController, ExportFormat, Transcript};
use qanun_types::Message;

use crate::cli::HistoryFormat;
use crate::run::connect;

fn load_history(chat: &mut ChatController, client: &ApiClient) -> anyhow::Result<()> {
    let sessions = client
        .list_history()
        .context("Failed to fetch conversation history")?;
    let ticket = chat.begin_refresh();
    chat.finish_refresh(ticket, Ok(sessions));
    Ok(())
}

pub(crate) fn list_history(config: &Config, format: HistoryFormat) -> anyhow::Result<()> {
    let client = connect(config)?;
    let mut chat = ChatController::new();
    load_history(&mut chat, &client)?;

    match format {
        HistoryFormat::Json => {
            println!("{}", serde_json::to_string_pretty(chat.history().sessions())?);
        }
        HistoryFormat::Table => {
            for row in chat.history().rows() {
                match row {
                    HistoryRow::Placeholder(text) => println!("{}", text),
                    HistoryRow::Session { summary, active } => println!(
                        "{} {:<24} {}",
                        if active { "*" } else { " " },
                        summary.id,
                        sanitize_terminal(&summary.title).replace('\n', " ")
                    ),
                }
            }
        }
    }
    Ok(())
}

/// Each CLI run starts with an empty cookie jar, so the server only knows
/// earlier conversations when `server.user_id` is configured.
fn identity_hint(config: &Config) -> &'static str {
    if config.user_id().is_some() {
        ""
    } else {
        " (set server.user_id to the browser's user_id cookie to reach earlier conversations)"
    }
}

fn fetch_transcript(config: &Config, session: Option<String>) -> anyhow::Result<Transcript> {
    let client = connect(config)?;
    let mut chat = ChatController::new();

    let id = match session {
        Some(id) => id,
        None => {
            load_history(&mut chat, &client)?;
            chat.history()
                .active_id()
                .map(str::to_string)
                .with_context(|| {
                    format!("No previous conversations to export{}", identity_hint(config))
                })?
        }
    };

    let ticket = chat.begin_select(&id);
    let detail = client
        .get_session(&id)
        .with_context(|| format!("Failed to load conversation {}{}", id, identity_hint(config)))?;
    chat.finish_select(ticket, Ok(detail));
    Ok(chat.transcript().clone())
}

pub(crate) fn show_session(config: &Config, id: &str) -> anyhow::Result<()> {
    let transcript = fetch_transcript(config, Some(id.to_string()))?;
    if transcript.message_count() == 0 {
        println!("(empty)");
        return Ok(());
    }
    print!("{}", format_plain(transcript.messages()));
    Ok(())
}

fn format_plain<'a>(messages: impl Iterator<Item = &'a Message>) -> String {
    let mut out = String::new();
    for message in messages {
        let who = if message.is_user() {
            qanun_tui::branding::USER_LABEL
        } else {
            qanun_tui::branding::BOT_BADGE
        };
        out.push_str(&format!(
            "[{}] {}\n{}\n\n",
            who,
            message.clock(),
            sanitize_terminal(&message.text)
        ));
    }
    out
}

pub(crate) fn export_session(
    config: &Config,
    session: Option<String>,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let transcript = fetch_transcript(config, session)?;
    let path = output.unwrap_or_else(|| {
        resolve_export_path(config.export_dir.as_deref(), &default_filename(format))
    });
    let written = write_export(&path, &export::render(&transcript, format))?;
    println!("{}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_listing_labels_each_turn() {
        let messages = [Message::user("سؤال"), Message::bot("جواب")];
        let out = format_plain(messages.iter());
        assert!(out.starts_with(&format!("[{}] ", qanun_tui::branding::USER_LABEL)));
        assert!(out.contains(&format!("[{}] ", qanun_tui::branding::BOT_BADGE)));
        assert!(out.ends_with("جواب\n\n"));
    }

    #[test]
    fn missing_user_id_is_hinted() {
        let mut config = Config::default();
        assert!(identity_hint(&config).contains("server.user_id"));

        config.server = Some(qanun_config::ServerConfig {
            user_id: Some("abc".to_string()),
            ..Default::default()
        });
        assert_eq!(identity_hint(&config), "");
    }

    #[test]
    fn plain_listing_drops_terminal_escapes() {
        let messages = [Message::bot("\x1b]0;pwned\x07\x1b[2Jhello\rworld")];
        let out = format_plain(messages.iter());
        assert!(!out.contains('\x1b'));
        assert!(!out.contains('\x07'));
        assert!(!out.contains('\r'));
        assert!(out.contains("hello\nworld"));
    }
}
