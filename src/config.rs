//! TOML console configuration: backend location, form defaults and logging.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use crate::catalogue::SymType;
use crate::client::API_PREFIX;
use crate::view::FormFields;

/// Top-level configuration parsed from TOML.
///
/// Every section is optional; missing values fall back to the defaults of
/// [`ConsoleConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Where the simulation API lives.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Initial form values.
    #[serde(default)]
    pub form: FormConfig,
    /// Log level and destination.
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Scheme and authority of the API server (e.g. `http://127.0.0.1:8000`).
    pub base_url: String,
    /// Path prefix of the catalogue routes.
    pub api_prefix: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            api_prefix: API_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub sym_type: SymType,
    pub loading_level: String,
    pub random_cases: String,
    pub items: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        let form = FormFields::default();
        Self {
            sym_type: form.sym_type,
            loading_level: form.loading_level,
            random_cases: form.random_cases,
            items: form.items,
        }
    }
}

impl FormConfig {
    /// Form fields seeded from this section.
    pub fn to_fields(&self) -> FormFields {
        FormFields {
            sym_type: self.sym_type,
            loading_level: self.loading_level.clone(),
            random_cases: self.random_cases.clone(),
            items: self.items.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// File the interactive console logs to.
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("hynet-console.log"),
        }
    }
}

impl LogConfig {
    /// Parsed level, `Info` if the string is not a known level.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or(LevelFilter::Info)
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g. `"backend.base_url"`).
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ConsoleConfig {
    /// Parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields; an empty vector means the configuration is usable.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let b = &self.backend;
        match reqwest::Url::parse(&b.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            Ok(url) => errors.push(ConfigError::new(
                "backend.base_url",
                format!("must be an http(s) URL with a host, got scheme \"{}\"", url.scheme()),
            )),
            Err(e) => errors.push(ConfigError::new(
                "backend.base_url",
                format!("invalid URL \"{}\": {e}", b.base_url),
            )),
        }
        if !b.api_prefix.is_empty() && !b.api_prefix.starts_with('/') {
            errors.push(ConfigError::new(
                "backend.api_prefix",
                "must be empty or start with '/'",
            ));
        }

        if LevelFilter::from_str(&self.log.level).is_err() {
            errors.push(ConfigError::new(
                "log.level",
                format!(
                    "must be one of off, error, warn, info, debug, trace; got \"{}\"",
                    self.log.level
                ),
            ));
        }

        errors
    }
}
