//! Application settings loading from config.toml
//!
//! This module provides functionality to load service settings from a TOML
//! configuration file. Every section and field has a default, so a missing
//! config.toml yields a fully usable development configuration. Secrets
//! (database URL, insights API key, bootstrap credentials) are never read
//! from the file; they come from the environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Ingestion transaction budgets
    #[serde(default)]
    pub ingest: IngestSettings,
    /// Session lifetime settings
    #[serde(default)]
    pub session: SessionSettings,
    /// Insights collaborator settings
    #[serde(default)]
    pub insights: InsightsSettings,
}

/// HTTP server settings
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// Address the server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Transaction budgets for ingestion runs (spec'd in seconds so operators
/// can tune them without a rebuild)
#[derive(Debug, Deserialize)]
pub struct IngestSettings {
    /// How long to wait for a pooled connection before giving up
    #[serde(default = "default_lock_wait_seconds")]
    pub lock_wait_seconds: u64,
    /// Overall budget for one ingestion transaction; on expiry the
    /// transaction rolls back and the prior catalog is untouched
    #[serde(default = "default_execution_timeout_seconds")]
    pub execution_timeout_seconds: u64,
}

/// Session lifetime settings
#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    /// Hours a login session stays valid
    #[serde(default = "default_session_ttl_hours")]
    pub ttl_hours: u64,
}

/// Insights collaborator settings. The API key itself is read from the
/// `INSIGHTS_API_KEY` environment variable; if unset, the insights endpoint
/// reports itself unconfigured rather than failing ingestion or charts.
#[derive(Debug, Deserialize)]
pub struct InsightsSettings {
    /// Base URL of the OpenAI-compatible completions API
    #[serde(default = "default_insights_base_url")]
    pub base_url: String,
    /// Model identifier to request
    #[serde(default = "default_insights_model")]
    pub model: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_lock_wait_seconds() -> u64 {
    10
}

fn default_execution_timeout_seconds() -> u64 {
    30
}

fn default_session_ttl_hours() -> u64 {
    24
}

fn default_insights_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_insights_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            lock_wait_seconds: default_lock_wait_seconds(),
            execution_timeout_seconds: default_execution_timeout_seconds(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_hours: default_session_ttl_hours(),
        }
    }
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            base_url: default_insights_base_url(),
            model: default_insights_model(),
        }
    }
}

impl IngestSettings {
    /// Pool acquisition budget as a [`Duration`].
    #[must_use]
    pub const fn lock_wait(&self) -> Duration {
        Duration::from_secs(self.lock_wait_seconds)
    }

    /// Transaction execution budget as a [`Duration`].
    #[must_use]
    pub const fn execution_timeout(&self) -> Duration {
        Duration::from_secs(self.execution_timeout_seconds)
    }
}

impl SessionSettings {
    /// Session lifetime as a [`Duration`].
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours * 3600)
    }
}

/// Loads service settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml), falling back
/// to the built-in defaults when the file does not exist.
pub fn load_default_settings() -> Result<Settings> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_settings(path)
    } else {
        Ok(Settings::default())
    }
}
