//! TOML configuration for the `rscs` CLI.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! timeout_secs = 30
//!
//! [table]
//! default_sort = "total_words"
//! include_checksum = false
//!
//! [logging]
//! format = "pretty"
//! ```
//!
//! Every section is optional. `RSCS_API_URL` overrides `api.base_url`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::logging::LogFormat;
use crate::sort::SortField;

/// Environment variable that overrides `[api].base_url`.
pub const API_URL_ENV: &str = "RSCS_API_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableConfig {
    #[serde(default = "default_sort")]
    pub default_sort: SortField,
    #[serde(default)]
    pub include_checksum: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_sort: default_sort(),
            include_checksum: false,
        }
    }
}

fn default_sort() -> SortField {
    SortField::TotalWords
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Parsed and validated `api.base_url`.
    pub fn base_url(&self) -> Result<Url> {
        parse_base_url(&self.api.base_url)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be > 0");
        }
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("api.base_url is not a URL: {}", raw))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("api.base_url must use http or https, got '{}'", other),
    }
    if url.cannot_be_a_base() {
        bail!("api.base_url cannot be used as a base: {}", raw);
    }
    Ok(url)
}

/// Read, parse and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields [`Config::minimal`].
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        return load_config(path);
    }
    let mut config = Config::minimal();
    config.apply_env();
    config.validate()?;
    Ok(config)
}
