//! Runtime configuration
//!
//! Settings come from an optional JSON file in the user config directory,
//! then environment variables override individual fields.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the backend origin (e.g. `http://10.0.0.5:8000`)
pub const API_URL_ENV: &str = "SEARCHDESK_API_URL";

/// Environment variable holding the path to the Mermaid CLI executable
pub const MMDC_ENV: &str = "SEARCHDESK_MMDC";

/// Origin a relative API base is resolved against
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

/// Relative API base used when no origin is configured
pub const RELATIVE_API_BASE: &str = "/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend origin without the `/api` suffix
    pub api_url: Option<String>,
    /// Mermaid CLI executable used for mind maps
    pub mmdc: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the config file (if any) and the environment.
    ///
    /// A broken config file is not fatal: it is logged and defaults are used.
    pub fn load() -> Self {
        let mut settings = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }),
            _ => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// `<config dir>/searchdesk/config.json`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("searchdesk").join("config.json"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from environment lookups. Empty values count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(path) = lookup(MMDC_ENV).filter(|v| !v.trim().is_empty()) {
            self.mmdc = Some(PathBuf::from(path));
        }
    }

    /// API base path: `{origin}/api` when an origin is configured, else `/api`
    pub fn api_base(&self) -> String {
        api_base(self.api_url.as_deref())
    }

    pub fn mmdc_program(&self) -> PathBuf {
        self.mmdc.clone().unwrap_or_else(|| PathBuf::from("mmdc"))
    }
}

pub fn api_base(origin: Option<&str>) -> String {
    match origin.map(str::trim).filter(|o| !o.is_empty()) {
        Some(origin) => format!("{}/api", origin.trim_end_matches('/')),
        None => RELATIVE_API_BASE.to_string(),
    }
}

/// Make a possibly relative base absolute against [`DEFAULT_ORIGIN`]
pub fn absolute_base(base: &str) -> String {
    if base.starts_with('/') {
        format!("{}{}", DEFAULT_ORIGIN, base)
    } else {
        base.trim_end_matches('/').to_string()
    }
}
