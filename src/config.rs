//! TOML configuration parsing and credential resolution.
//!
//! The configuration file is optional. When it is missing the server runs
//! with [`Config::minimal`], which points at the public Gemini endpoints and
//! carries no credential. The API key is normally supplied through the
//! `GEMINI_API_KEY` environment variable, which always wins over the file.
//!
//! ```toml
//! [gemini]
//! api_key = "..."                 # optional, prefer GEMINI_API_KEY
//! base_url = "https://generativelanguage.googleapis.com/v1beta"
//! upload_url = "https://generativelanguage.googleapis.com/upload/v1beta"
//!
//! [server]
//! bind = "127.0.0.1:8787"
//! ```
//!
//! A missing credential is not a configuration error here: tool listing
//! must work without one, so the check is deferred to the first tool call
//! (see [`crate::dispatch::Dispatcher`]).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_UPLOAD_URL: &str = "https://generativelanguage.googleapis.com/upload/v1beta";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            upload_url: default_upload_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_upload_url() -> String {
    DEFAULT_UPLOAD_URL.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

impl GeminiConfig {
    /// Returns the configured API key, treating an empty string as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Whether a credential is available for remote calls.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Replace the file-provided key with `value` when it is non-empty.
    pub fn apply_env_key(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }
}

impl Config {
    /// Default configuration with no credential and public endpoints.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Shorthand used by tests and embedders that already hold a key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let mut config = Self::minimal();
        config.gemini.api_key = Some(api_key.into());
        config
    }
}

/// Parse and validate a configuration document.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load the configuration at `path`, falling back to [`Config::minimal`]
/// when the file does not exist, then overlay `GEMINI_API_KEY`.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_config(&content)?
    } else {
        Config::minimal()
    };

    config.gemini.apply_env_key(std::env::var(API_KEY_ENV).ok());
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    for (field, url) in [
        ("gemini.base_url", &config.gemini.base_url),
        ("gemini.upload_url", &config.gemini.upload_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("{} must be an http(s) URL, got '{}'", field, url);
        }
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(())
}
