use clap::Parser;
use std::path::PathBuf;

mod cli;
mod run;
mod session_cmd;
mod tui;

use cli::*;
use run::run_ask;
use session_cmd::{export_session, list_history, show_session};
use tui::run_tui;

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("qanun")
        .join("log")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = qanun_config::load_config(cli.config.as_deref())?;
    if let Some(url) = cli.url.as_deref() {
        qanun_config::validate_base_url(url)?;
        config.set_base_url(url);
    }

    // The TUI owns the terminal, so logs go to a file unless asked otherwise.
    let log_guard = qanun_util::init_tracing(
        config.log_level.as_deref(),
        Some(log_dir()),
        cli.print_logs,
    )?;
    tracing::info!(url = %config.base_url(), "qanun starting");

    match cli.command {
        None => run_tui(config, None)?,
        Some(Commands::Tui { mode }) => run_tui(config, mode)?,
        Some(Commands::Ask { message, mode }) => {
            let ok = run_ask(&config, &message.join(" "), mode)?;
            if !ok {
                drop(log_guard);
                std::process::exit(1);
            }
        }
        Some(Commands::History { format }) => list_history(&config, format)?,
        Some(Commands::Show { id }) => show_session(&config, &id)?,
        Some(Commands::Export {
            session,
            format,
            output,
        }) => export_session(&config, session, format.into(), output)?,
    }

    Ok(())
}
