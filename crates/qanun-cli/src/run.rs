use anyhow::Context;

use qanun_config::Config;
use qanun_tui::ui::sanitize_terminal;
use qanun_tui::{ApiClient, ChatController, SendOutcome};
use qanun_types::Mode;

pub(crate) fn connect(config: &Config) -> anyhow::Result<ApiClient> {
    ApiClient::with_options(&config.base_url(), config.timeout(), config.user_id())
        .with_context(|| format!("Failed to create client for {}", config.base_url()))
}

/// Sends one question and prints the reply. Returns false when the backend
/// could not answer; the localized error text is printed in that case.
pub(crate) fn run_ask(config: &Config, message: &str, mode: Option<Mode>) -> anyhow::Result<bool> {
    let client = connect(config)?;
    let mut chat = ChatController::new();
    let mode = mode.unwrap_or_else(|| config.default_mode());

    let outcome = chat.send_message(message, mode, &client);
    if outcome == SendOutcome::Skipped {
        anyhow::bail!("Message is empty");
    }

    let reply = chat
        .transcript()
        .messages()
        .last()
        .map(|m| sanitize_terminal(&m.text))
        .unwrap_or_default();
    match outcome {
        SendOutcome::Answered => {
            println!("{}", reply);
            Ok(true)
        }
        _ => {
            eprintln!("{}", reply);
            Ok(false)
        }
    }
}
