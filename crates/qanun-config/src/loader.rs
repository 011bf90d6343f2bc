use crate::Config;
use anyhow::{Context, Result};
use jsonc_parser::{parse_to_serde_value, ParseOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "QANUN_CONFIG";
pub const BASE_URL_ENV: &str = "QANUN_BASE_URL";

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{env:([^}]+)\}").expect("valid env placeholder pattern"));

pub struct ConfigLoader {
    config: Config,
    config_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            config_paths: Vec::new(),
        }
    }

    pub fn load_from_str(&mut self, content: &str) -> Result<()> {
        let content = substitute_env_vars(content);
        let config: Config =
            parse_jsonc(&content).with_context(|| "Failed to parse config content")?;
        self.config.merge(config);
        Ok(())
    }

    /// Missing files are skipped silently.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let content = substitute_env_vars(&content);
        let config: Config = parse_jsonc(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        self.config.merge(config);
        self.config_paths.push(path.to_path_buf());
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(())
    }

    pub fn load_global(&mut self) -> Result<()> {
        let Some(global_config_path) = global_config_path() else {
            return Ok(());
        };

        for ext in &["jsonc", "json"] {
            let path = global_config_path.with_extension(ext);
            if path.exists() {
                self.load_from_file(&path)?;
                break;
            }
        }

        Ok(())
    }

    pub fn load_from_env(&mut self) -> Result<()> {
        if let Ok(config_path) = env::var(CONFIG_ENV) {
            if !config_path.trim().is_empty() {
                self.load_from_file(config_path.trim())?;
            }
        }
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = env::var(BASE_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                validate_base_url(url)
                    .with_context(|| format!("Invalid {} value", BASE_URL_ENV))?;
                self.config.set_base_url(url);
            }
        }
        Ok(())
    }

    /// Merge order: global file, `QANUN_CONFIG`, explicit path, then
    /// `QANUN_BASE_URL`.
    pub fn load_all(&mut self, explicit: Option<&Path>) -> Result<Config> {
        self.load_global()?;
        self.load_from_env()?;
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            self.load_from_file(path)?;
        }
        self.apply_env_overrides()?;
        validate_base_url(&self.config.base_url())?;
        Ok(self.config.clone())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    ConfigLoader::new().load_all(explicit)
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qanun/qanun"))
}

pub fn validate_base_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).with_context(|| format!("Invalid server url: {}", raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Unsupported server url scheme: {}", parsed.scheme());
    }
    Ok(())
}

fn substitute_env_vars(text: &str) -> String {
    ENV_VAR_RE
        .replace_all(text, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_default()
        })
        .to_string()
}

fn parse_jsonc(content: &str) -> Result<Config> {
    let parse_options = ParseOptions {
        allow_trailing_commas: true,
        ..Default::default()
    };
    let parsed = parse_to_serde_value(content, &parse_options)
        .with_context(|| "Failed to parse JSONC")?
        .context("Config content is empty")?;
    serde_json::from_value(parsed).with_context(|| "Failed to parse config JSON")
}
