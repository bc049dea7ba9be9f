//! Configuration file parser for ~/.config/onta/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "ONTA_API_URL";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the OnTa backend.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Responses larger than this are rejected.
    pub max_response_bytes: usize,

    /// Where the session database lives. Defaults to `session.db` next to
    /// the config file.
    pub session_db: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 20,
            max_response_bytes: 5 * 1024 * 1024,
            session_db: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = [
        "api_base_url",
        "request_timeout_secs",
        "max_response_bytes",
        "session_db",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - File over 1 MB → `Err(ConfigError::TooLarge)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race: deleted between metadata and read
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), api = %config.api_base_url, "Loaded configuration");
        Ok(config)
    }

    /// Apply environment overrides. `ONTA_API_URL` wins over the file.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_api_url(std::env::var(API_URL_ENV).ok());
        self
    }

    fn apply_api_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(api = %url, "API URL overridden from environment");
            self.api_base_url = url.trim().to_string();
        }
    }

    /// Session database path, resolved against `config_dir` when unset.
    pub fn session_db_path(&self, config_dir: &Path) -> PathBuf {
        self.session_db
            .clone()
            .unwrap_or_else(|| config_dir.join("session.db"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir()
            .join(format!("onta_config_test_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.max_response_bytes, 5 * 1024 * 1024);
        assert!(config.session_db.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/onta_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_timeout_secs, 20);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("partial", "api_base_url = \"https://onta.example.com\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://onta.example.com");
        assert_eq!(config.request_timeout_secs, 20);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
api_base_url = "https://onta.example.com/api"
request_timeout_secs = 5
max_response_bytes = 1024
session_db = "/var/tmp/onta-session.db"
"#;
        let (dir, path) = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://onta.example.com/api");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.max_response_bytes, 1024);
        assert_eq!(
            config.session_db_path(Path::new("/ignored")),
            PathBuf::from("/var/tmp/onta-session.db")
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("wrongtype", "request_timeout_secs = \"soon\"\n");
        assert!(Config::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "api_base_url = \"https://a.example\"\ntheme = 1\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://a.example");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_api_url(Some(" https://override.example ".to_string()));
        assert_eq!(config.api_base_url, "https://override.example");

        config.apply_api_url(Some("   ".to_string()));
        assert_eq!(config.api_base_url, "https://override.example");

        config.apply_api_url(None);
        assert_eq!(config.api_base_url, "https://override.example");
    }

    #[test]
    fn test_session_db_defaults_to_config_dir() {
        let config = Config::default();
        assert_eq!(
            config.session_db_path(Path::new("/home/ana/.config/onta")),
            PathBuf::from("/home/ana/.config/onta/session.db")
        );
    }
}
