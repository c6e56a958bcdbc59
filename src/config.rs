//! Configuration module for TagRelay.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, TagRelayError};

/// Source feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Source channel name (without the leading `@`).
    #[serde(default = "default_channel")]
    pub channel: String,
    /// How many recent posts the ingestion job pulls per run.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
}

fn default_channel() -> String {
    "UstozShogird".to_string()
}

fn default_fetch_limit() -> usize {
    100
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            fetch_limit: default_fetch_limit(),
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoresConfig {
    /// Path to the subscriber document file.
    #[serde(default = "default_subscribers_path")]
    pub subscribers_path: String,
    /// Path to the item document file.
    #[serde(default = "default_items_path")]
    pub items_path: String,
    /// Path to the hashtag statistics file.
    #[serde(default = "default_stats_path")]
    pub stats_path: String,
}

fn default_subscribers_path() -> String {
    "data/subscribers.json".to_string()
}

fn default_items_path() -> String {
    "data/items.json".to_string()
}

fn default_stats_path() -> String {
    "data/hashtags.json".to_string()
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            subscribers_path: default_subscribers_path(),
            items_path: default_items_path(),
            stats_path: default_stats_path(),
        }
    }
}

/// Delivery pacing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// Delay between consecutive dispatches in broadcast sweeps, seconds.
    #[serde(default = "default_broadcast_delay")]
    pub broadcast_delay_secs: u64,
    /// Delay between dispatches in the interactive per-user path, seconds.
    #[serde(default = "default_interactive_delay")]
    pub interactive_delay_secs: u64,
}

fn default_broadcast_delay() -> u64 {
    1
}

fn default_interactive_delay() -> u64 {
    5
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            broadcast_delay_secs: default_broadcast_delay(),
            interactive_delay_secs: default_interactive_delay(),
        }
    }
}

/// Transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Bot token. Usually left empty here and supplied via the
    /// `TAGRELAY_BOT_TOKEN` environment variable.
    #[serde(default)]
    pub token: String,
    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: default_api_base(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/tagrelay.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Source feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Document store configuration.
    #[serde(default)]
    pub stores: StoresConfig,
    /// Delivery pacing configuration.
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// Transport configuration.
    #[serde(default)]
    pub transport: TransportConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(TagRelayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable
    /// overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| TagRelayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides.
    ///
    /// Supported environment variables:
    /// - `TAGRELAY_BOT_TOKEN`: Override the transport bot token
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("TAGRELAY_BOT_TOKEN") {
            if !token.is_empty() {
                self.transport.token = token;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the transport token is missing.
    pub fn validate(&self) -> Result<()> {
        if self.transport.token.is_empty() {
            return Err(TagRelayError::Config(
                "transport token is not set. \
                 Set it in config.toml or via TAGRELAY_BOT_TOKEN environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.feed.channel, "UstozShogird");
        assert_eq!(config.delivery.broadcast_delay_secs, 1);
        assert_eq!(config.delivery.interactive_delay_secs, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.stores.subscribers_path, "data/subscribers.json");
        assert_eq!(config.transport.api_base, "https://api.telegram.org");
    }

    #[test]
    fn test_parse_partial_overrides() {
        let config = Config::parse(
            r#"
            [feed]
            channel = "MyChannel"

            [delivery]
            broadcast_delay_secs = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.feed.channel, "MyChannel");
        assert_eq!(config.delivery.broadcast_delay_secs, 2);
        // Untouched sections keep their defaults.
        assert_eq!(config.delivery.interactive_delay_secs, 5);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::parse("feed = not valid");
        assert!(matches!(result, Err(TagRelayError::Config(_))));
    }

    #[test]
    fn test_validate_missing_token() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(TagRelayError::Config(_))));
    }

    #[test]
    fn test_validate_with_token() {
        let mut config = Config::default();
        config.transport.token = "123:abc".to_string();
        assert!(config.validate().is_ok());
    }
}
