//! # Configuration
//!
//! Optional TOML configuration for the `kif` binary.
//!
//! ```toml
//! log_format = "json"
//!
//! [base_filter]
//! annotated = true
//! rank_mask = 3
//! ```
//!
//! The base filter is conjoined with every filter read from the command
//! line. The `KIF_LOG_FORMAT` environment variable overrides `log_format`.

use crate::cli::read_input_file;
use kif_core::{Filter, KifError};
use serde::Deserialize;
use std::path::Path;

/// Configuration file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "kif.toml";

/// Environment variable overriding the configured log format.
pub const LOG_FORMAT_ENV: &str = "KIF_LOG_FORMAT";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Parse an environment value. Anything but `json` or `text` is ignored.
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Contents of `kif.toml`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KifConfig {
    pub log_format: LogFormat,
    pub base_filter: Option<Filter>,
}

impl KifConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, KifError> {
        toml::from_str(text)
            .map_err(|e| KifError::SerializationError(format!("Invalid configuration: {}", e)))
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, `kif.toml` in the working
    /// directory is used when present, and the defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, KifError> {
        let path = match path {
            Some(path) => path,
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = read_input_file(path)?;
        Self::from_toml_str(&text)
    }

    /// The log format, with `env` (the value of `KIF_LOG_FORMAT`) taking precedence.
    pub fn effective_log_format(&self, env: Option<&str>) -> LogFormat {
        env.and_then(LogFormat::from_env_value)
            .unwrap_or(self.log_format)
    }

    /// Conjoin the base filter, if any, with `filter`.
    pub fn apply_base(&self, filter: &Filter) -> Filter {
        match &self.base_filter {
            Some(base) => base.combine([filter]),
            None => filter.clone(),
        }
    }
}
