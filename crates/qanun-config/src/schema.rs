use qanun_types::Mode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LANGUAGE: &str = "ar-MA";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictation: Option<DictationConfig>,

    #[serde(
        rename = "exportDir",
        alias = "export_dir",
        skip_serializing_if = "Option::is_none"
    )]
    pub export_dir: Option<PathBuf>,

    #[serde(
        rename = "logLevel",
        alias = "log_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub log_level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tui: Option<TuiConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        rename = "timeoutSecs",
        alias = "timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_secs: Option<u64>,
    /// Seeds the `user_id` cookie so earlier conversations stay listed.
    #[serde(
        rename = "userId",
        alias = "user_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DictationConfig {
    /// Argv of the recognizer; `{lang}` is replaced with `language`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    #[serde(
        rename = "showSidebar",
        alias = "show_sidebar",
        skip_serializing_if = "Option::is_none"
    )]
    pub show_sidebar: Option<bool>,
    #[serde(
        rename = "tickRateMs",
        alias = "tick_rate_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub tick_rate_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Config {
    pub fn merge(&mut self, other: Config) {
        merge_option_replace(&mut self.schema, other.schema);
        merge_option_deep(&mut self.server, other.server);
        merge_option_replace(&mut self.mode, other.mode);
        merge_option_deep(&mut self.dictation, other.dictation);
        merge_option_replace(&mut self.export_dir, other.export_dir);
        merge_option_replace(&mut self.log_level, other.log_level);
        merge_option_deep(&mut self.tui, other.tui);
    }

    pub fn base_url(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.url.as_deref())
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string()
    }

    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.server.get_or_insert_with(ServerConfig::default).url = Some(url.into());
    }

    pub fn timeout(&self) -> Duration {
        let secs = self
            .server
            .as_ref()
            .and_then(|s| s.timeout_secs)
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.server
            .as_ref()
            .and_then(|s| s.user_id.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn default_mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }

    pub fn dictation_language(&self) -> &str {
        self.dictation
            .as_ref()
            .and_then(|d| d.language.as_deref())
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Recognizer argv with `{lang}` substituted. `None` when dictation is unavailable.
    pub fn dictation_command(&self) -> Option<Vec<String>> {
        let command = self.dictation.as_ref()?.command.as_ref()?;
        if command.first().map_or(true, |program| program.trim().is_empty()) {
            return None;
        }
        let language = self.dictation_language();
        Some(
            command
                .iter()
                .map(|arg| arg.replace("{lang}", language))
                .collect(),
        )
    }

    pub fn show_sidebar(&self) -> bool {
        self.tui
            .as_ref()
            .and_then(|t| t.show_sidebar)
            .unwrap_or(true)
    }

    pub fn theme_name(&self) -> &str {
        self.tui
            .as_ref()
            .and_then(|t| t.theme.as_deref())
            .unwrap_or("dark")
    }

    pub fn tick_rate_ms(&self) -> u64 {
        self.tui
            .as_ref()
            .and_then(|t| t.tick_rate_ms)
            .filter(|ms| *ms > 0)
            .unwrap_or(50)
    }
}

trait DeepMerge {
    fn deep_merge(&mut self, other: Self);
}

fn merge_option_replace<T>(target: &mut Option<T>, source: Option<T>) {
    if let Some(value) = source {
        *target = Some(value);
    }
}

fn merge_option_deep<T: DeepMerge>(target: &mut Option<T>, source: Option<T>) {
    if let Some(source_value) = source {
        if let Some(target_value) = target {
            target_value.deep_merge(source_value);
        } else {
            *target = Some(source_value);
        }
    }
}

impl DeepMerge for ServerConfig {
    fn deep_merge(&mut self, other: Self) {
        merge_option_replace(&mut self.url, other.url);
        merge_option_replace(&mut self.timeout_secs, other.timeout_secs);
        merge_option_replace(&mut self.user_id, other.user_id);
    }
}

impl DeepMerge for DictationConfig {
    fn deep_merge(&mut self, other: Self) {
        merge_option_replace(&mut self.command, other.command);
        merge_option_replace(&mut self.language, other.language);
    }
}

impl DeepMerge for TuiConfig {
    fn deep_merge(&mut self, other: Self) {
        merge_option_replace(&mut self.show_sidebar, other.show_sidebar);
        merge_option_replace(&mut self.tick_rate_ms, other.tick_rate_ms);
        merge_option_replace(&mut self.theme, other.theme);
    }
}
