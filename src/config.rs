//! Configuration loaded from `quote-viewer.toml`.
//!
//! Every field has a default, so the file is optional. The `QUOTE_API_BASE`
//! environment variable takes precedence over the file for the service URL.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::document::DEFAULT_PLACEHOLDER_URL;
use crate::gateway::DEFAULT_API_BASE;

pub const CONFIG_FILE: &str = "quote-viewer.toml";
pub const API_BASE_ENV: &str = "QUOTE_API_BASE";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteViewerConfig {
    /// Base URL of the quote webhook service.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout, applied to webhook calls and document downloads.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// URL treated as "no artifact configured".
    #[serde(default = "default_placeholder_document_url")]
    pub placeholder_document_url: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_placeholder_document_url() -> String {
    DEFAULT_PLACEHOLDER_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

impl Default for QuoteViewerConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            placeholder_document_url: default_placeholder_document_url(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl QuoteViewerConfig {
    /// Load `quote-viewer.toml` from the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<QuoteViewerConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(base) = std::env::var(API_BASE_ENV)
            && !base.trim().is_empty()
        {
            config.api_base = base;
        }

        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = QuoteViewerConfig::default();
        assert_eq!(config.api_base, "https://automation.osi.vn");
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.placeholder_document_url, DEFAULT_PLACEHOLDER_URL);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_base = "http://localhost:5678"
            request_timeout_secs = 5
            log_format = "json"
        "#;
        let config: QuoteViewerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_base, "http://localhost:5678");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "placeholder_document_url = \"https://cdn.example/none.pdf\"\n",
        )
        .unwrap();

        let config = QuoteViewerConfig::load_from(&path).unwrap();
        assert_eq!(config.placeholder_document_url, "https://cdn.example/none.pdf");
    }

    #[test]
    fn load_from_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "log_format = \"xml\"\n").unwrap();

        assert!(QuoteViewerConfig::load_from(&path).is_err());
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = QuoteViewerConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.request_timeout_secs, 30);
    }
}
