use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured base URL.
pub const ENV_URL: &str = "TETHER_URL";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the task service
    #[serde(default = "default_url")]
    pub url: String,
    /// Per-request deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Optional theme color overrides, `#RRGGBB` strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub dim: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Load from the default location. A missing file is not an error.
    pub fn load() -> Result<Config, ConfigError> {
        match Config::default_path() {
            Some(path) if path.exists() => Config::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load and parse a specific config file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `$XDG_CONFIG_HOME/tether/config.toml` (platform equivalent via `dirs`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tether").join("config.toml"))
    }

    /// The effective base URL: `--url` flag, then `TETHER_URL`, then config.
    pub fn base_url(&self, flag: Option<&str>) -> String {
        self.base_url_with(flag, std::env::var(ENV_URL).ok())
    }

    fn base_url_with(&self, flag: Option<&str>, env: Option<String>) -> String {
        flag.map(str::to_string)
            .or(env.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| self.server.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.url, "http://localhost:3001");
        assert_eq!(config.server.timeout_secs, 15);
        assert!(config.ui.accent.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r##"
[server]
url = "https://todos.example.com"

[ui]
accent = "#44FF88"
"##,
        )
        .unwrap();
        assert_eq!(config.server.url, "https://todos.example.com");
        // unset fields keep defaults
        assert_eq!(config.server.timeout_secs, 15);
        assert_eq!(config.ui.accent.as_deref(), Some("#44FF88"));
    }

    #[test]
    fn test_base_url_precedence() {
        let mut config = Config::default();
        config.server.url = "http://from-config".into();

        // flag beats env beats config
        assert_eq!(
            config.base_url_with(Some("http://from-flag"), Some("http://from-env".into())),
            "http://from-flag"
        );
        assert_eq!(
            config.base_url_with(None, Some("http://from-env".into())),
            "http://from-env"
        );
        assert_eq!(config.base_url_with(None, None), "http://from-config");
        // empty env var is ignored
        assert_eq!(config.base_url_with(None, Some(String::new())), "http://from-config");
    }

    #[test]
    fn test_load_missing_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(Config::load_from(&path).is_err());
    }
}
