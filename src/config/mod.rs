//! Configuration management
//!
//! Settings come from an optional `~/.blogsmith/config.yaml`, overridden by
//! environment variables (a `.env` file in the working directory is loaded
//! into the environment at startup). Anything left unset falls back to the
//! defaults below.

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::storage::db::DEFAULT_DATABASE_URL;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Provider API base used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Address the HTTP server binds to by default.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Upper bound on a single generation call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Environment variables recognised as overrides.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_BIND: &str = "BLOGSMITH_BIND";
pub const ENV_REQUEST_TIMEOUT: &str = "BLOGSMITH_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Provider API key
    pub openai_api_key: Option<String>,

    /// Model identifier passed to the provider
    pub openai_model: Option<String>,

    /// Provider API base URL (for proxies and compatible gateways)
    pub openai_base_url: Option<String>,

    /// SQLite connection string
    pub database_url: Option<String>,

    /// HTTP bind address for `serve`
    pub bind: Option<String>,

    /// Generation timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Loads the config file (if present) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Reads a YAML config file without applying overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?
            .join(".blogsmith");

        Ok(config_dir.join("config.yaml"))
    }

    /// Overrides fields with non-empty values returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_KEY) {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = get(ENV_MODEL) {
            self.openai_model = Some(v);
        }
        if let Some(v) = get(ENV_BASE_URL) {
            self.openai_base_url = Some(v);
        }
        if let Some(v) = get(ENV_DATABASE_URL) {
            self.database_url = Some(v);
        }
        if let Some(v) = get(ENV_BIND) {
            self.bind = Some(v);
        }
        if let Some(v) = get(ENV_REQUEST_TIMEOUT) {
            match v.trim().parse() {
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid {ENV_REQUEST_TIMEOUT}={v}"),
            }
        }
    }

    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn model(&self) -> &str {
        self.openai_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.openai_base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        let secs = self
            .request_timeout_secs
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let bind = self.bind.as_deref().unwrap_or(DEFAULT_BIND);
        bind.parse()
            .with_context(|| format!("Invalid bind address '{bind}'"))
    }

    /// The API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let visible = chars.len().saturating_sub(4);
            let tail: String = chars[visible..].iter().collect();
            format!("{}{tail}", "*".repeat(visible.min(8)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_key(), None);
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.database_url(), "sqlite:///./blogs.db");
        assert_eq!(config.base_url(), "https://api.openai.com/v1");
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.bind_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            openai_model: Some("from-file".to_string()),
            database_url: Some("file.db".to_string()),
            ..Config::default()
        };
        config.apply_env(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4.1"),
            ("BLOGSMITH_REQUEST_TIMEOUT_SECS", "30"),
        ]));

        assert_eq!(config.api_key(), Some("sk-test"));
        assert_eq!(config.model(), "gpt-4.1");
        assert_eq!(config.database_url(), "file.db");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config {
            openai_api_key: Some("sk-file".to_string()),
            ..Config::default()
        };
        config.apply_env(lookup(&[("OPENAI_API_KEY", "  "), ("OPENAI_MODEL", "")]));
        assert_eq!(config.api_key(), Some("sk-file"));
        assert_eq!(config.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let mut config = Config::default();
        config.apply_env(lookup(&[("BLOGSMITH_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = Config {
            openai_api_key: Some("   ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = Config {
            openai_base_url: Some("http://localhost:9000/v1/".to_string()),
            ..Config::default()
        };
        assert_eq!(config.base_url(), "http://localhost:9000/v1");
    }

    #[test]
    fn test_invalid_bind_address() {
        let config = Config {
            bind: Some("not-an-address".to_string()),
            ..Config::default()
        };
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_masked_api_key() {
        let config = Config {
            openai_api_key: Some("sk-abcdef123456".to_string()),
            ..Config::default()
        };
        let masked = config.masked_api_key().unwrap();
        assert!(masked.ends_with("3456"));
        assert!(!masked.contains("abcdef"));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "openai_model: gpt-4o").unwrap();
        writeln!(file, "database_url: sqlite:///./custom.db").unwrap();
        writeln!(file, "request_timeout_secs: 45").unwrap();
        file.flush().unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.database_url(), "sqlite:///./custom.db");
        assert_eq!(config.request_timeout(), Duration::from_secs(45));
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_load_from_empty_file() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(Config::load_from(file.path()).unwrap(), Config::default());
    }
}
