pub mod loader;
pub mod schema;

pub use loader::{load_config, validate_base_url, ConfigLoader};
pub use schema::{
    Config, DictationConfig, ServerConfig, TuiConfig, DEFAULT_BASE_URL, DEFAULT_LANGUAGE,
    DEFAULT_TIMEOUT_SECS,
};
