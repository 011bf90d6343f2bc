use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use qanun_tui::ExportFormat;
use qanun_types::Mode;

#[derive(Parser)]
#[command(name = "qanun")]
#[command(about = "Qanun - terminal client for the legal assistant", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Backend base URL; overrides the configuration.
    #[arg(long, global = true)]
    pub(crate) url: Option<String>,
    /// Extra configuration file, merged last.
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// Log to stderr instead of the log file.
    #[arg(long = "print-logs", global = true, default_value_t = false)]
    pub(crate) print_logs: bool,
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    #[command(about = "Start the interactive terminal client")]
    Tui {
        #[arg(short = 'm', long)]
        mode: Option<Mode>,
    },
    #[command(about = "Ask one question and print the answer")]
    Ask {
        #[arg(value_name = "MESSAGE", trailing_var_arg = true, required = true)]
        message: Vec<String>,
        #[arg(short = 'm', long)]
        mode: Option<Mode>,
    },
    #[command(about = "List previous conversations")]
    History {
        #[arg(long, default_value = "table")]
        format: HistoryFormat,
    },
    #[command(about = "Print a previous conversation")]
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    #[command(about = "Download a conversation transcript")]
    Export {
        /// Session to export; defaults to the active one.
        #[arg(short = 's', long)]
        session: Option<String>,
        #[arg(long, default_value = "text")]
        format: OutputFormat,
        #[arg(short = 'o', long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum HistoryFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Html,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ExportFormat::Text,
            OutputFormat::Html => ExportFormat::Html,
        }
    }
}
