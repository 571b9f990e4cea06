//! Configuration management
//!
//! This module handles loading and parsing configuration for the Gazette site.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Pagination configuration
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Comment moderation configuration
    #[serde(default)]
    pub moderation: ModerationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/gazette.db".to_string()
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Maximum number of news items shown on the home page
    #[serde(default = "default_news_per_page")]
    pub news_per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            news_per_page: default_news_per_page(),
        }
    }
}

fn default_news_per_page() -> u32 {
    10
}

/// Comment moderation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Words that are not allowed anywhere in comment text.
    /// Matching is case-insensitive substring search.
    #[serde(default = "default_banned_words")]
    pub banned_words: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            banned_words: default_banned_words(),
        }
    }
}

fn default_banned_words() -> Vec<String> {
    vec!["spam".to_string(), "casino".to_string()]
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        // Handle empty file - return defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - GAZETTE_SERVER_HOST
    /// - GAZETTE_SERVER_PORT
    /// - GAZETTE_DATABASE_URL
    /// - GAZETTE_NEWS_PER_PAGE
    /// - GAZETTE_BANNED_WORDS (comma-separated)
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("GAZETTE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("GAZETTE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(url) = std::env::var("GAZETTE_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(per_page) = std::env::var("GAZETTE_NEWS_PER_PAGE") {
            if let Ok(per_page) = per_page.parse::<u32>() {
                if per_page > 0 {
                    self.pagination.news_per_page = per_page;
                }
            }
        }
        if let Ok(words) = std::env::var("GAZETTE_BANNED_WORDS") {
            let words: Vec<String> = words
                .split(',')
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect();
            if !words.is_empty() {
                self.moderation.banned_words = words;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_host_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255)
                .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d)),
            Just("localhost".to_string()),
            Just("0.0.0.0".to_string()),
            "[a-z][a-z0-9]{0,10}",
        ]
    }

    fn valid_banned_words_strategy() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-z]{3,12}", 1..5)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Serializing a config to YAML and parsing it back yields an
        /// equivalent config.
        #[test]
        fn config_roundtrip(
            host in valid_host_strategy(),
            port in 1u16..=65535,
            per_page in 1u32..=100,
            words in valid_banned_words_strategy(),
        ) {
            let config = Config {
                server: ServerConfig { host: host.clone(), port },
                database: DatabaseConfig { url: "test.db".to_string() },
                pagination: PaginationConfig { news_per_page: per_page },
                moderation: ModerationConfig { banned_words: words.clone() },
            };

            let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let parsed = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(parsed.server.host, host);
            prop_assert_eq!(parsed.server.port, port);
            prop_assert_eq!(parsed.pagination.news_per_page, per_page);
            prop_assert_eq!(parsed.moderation.banned_words, words);
        }

        /// A config file missing optional sections parses with defaults
        /// filled in.
        #[test]
        fn config_defaults_filled(port in 1u16..=65535) {
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "server:\n  port: {}\n", port).expect("Failed to write config");

            let config = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(config.server.port, port);
            prop_assert_eq!(config.server.host, "0.0.0.0");
            prop_assert_eq!(config.pagination.news_per_page, 10);
            prop_assert!(!config.moderation.banned_words.is_empty());
        }
    }
}
