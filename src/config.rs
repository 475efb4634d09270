// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then `~/.templ-iconify/config.json`
//! (every field optional), then `TEMPL_ICONIFY_API_URL`, then CLI flags
//! applied by the binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Default Iconify API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.iconify.design";

/// Environment variable overriding the API endpoint.
pub const API_URL_ENV: &str = "TEMPL_ICONIFY_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IconifyConfig {
    /// Base URL of the icon catalog.
    pub api_url: String,
    /// Directory receiving `<package>/<icon>.<ext>` files.
    pub save_dir: PathBuf,
    /// Number of concurrent download workers.
    pub worker_count: usize,
    /// Capacity of the bounded work queue.
    pub queue_capacity: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Extension of generated files.
    pub file_extension: String,
}

impl Default for IconifyConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            save_dir: PathBuf::from("./icons/"),
            worker_count: 10,
            queue_capacity: 1,
            request_timeout_secs: 30,
            file_extension: "templ".to_string(),
        }
    }
}

impl IconifyConfig {
    /// Load defaults, the user config file (if any) and environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        Ok(config)
    }

    /// Parse a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject settings the download pool cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            bail!("worker count must be at least 1");
        }
        if self.queue_capacity == 0 {
            bail!("queue capacity must be at least 1");
        }
        if self.api_url.trim().is_empty() {
            bail!("API URL must not be empty");
        }
        Ok(())
    }
}

/// `~/.templ-iconify/config.json`, if a home directory exists.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".templ-iconify").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IconifyConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.save_dir, PathBuf::from("./icons/"));
        assert_eq!(config.worker_count, 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "worker_count": 4, "save_dir": "out" }"#).unwrap();

        let config = IconifyConfig::from_file(&path).unwrap();
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.save_dir, PathBuf::from("out"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.file_extension, "templ");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = IconifyConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = IconifyConfig {
            worker_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
