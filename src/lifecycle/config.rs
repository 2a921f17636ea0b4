//! Order desk configuration

use crate::engine::DEFAULT_TABLE_COUNT;
use crate::snapshot::DEFAULT_SNAPSHOT_KEY;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Order desk configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    /// Simulated kitchen preparation time (env: ORDER_DESK_KITCHEN_DELAY_MS)
    pub kitchen_delay: Duration,
    /// Request channel capacity (env: ORDER_DESK_CHANNEL_BUFFER)
    pub channel_buffer: usize,
    /// Number of dine-in tables (env: ORDER_DESK_TABLE_COUNT)
    pub table_count: u8,
    /// Directory of the file snapshot store (env: ORDER_DESK_SNAPSHOT_DIR)
    pub snapshot_dir: PathBuf,
    /// Snapshot document key (env: ORDER_DESK_SNAPSHOT_KEY)
    pub snapshot_key: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            kitchen_delay: Duration::from_millis(3000),
            channel_buffer: 32,
            table_count: DEFAULT_TABLE_COUNT,
            snapshot_dir: PathBuf::from("data"),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }
}

impl DeskConfig {
    /// Load configuration from environment variables. Unset or unparsable values
    /// fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            kitchen_delay: std::env::var("ORDER_DESK_KITCHEN_DELAY_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.kitchen_delay),
            channel_buffer: std::env::var("ORDER_DESK_CHANNEL_BUFFER")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.channel_buffer),
            table_count: std::env::var("ORDER_DESK_TABLE_COUNT")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.table_count),
            snapshot_dir: std::env::var("ORDER_DESK_SNAPSHOT_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_dir),
            snapshot_key: std::env::var("ORDER_DESK_SNAPSHOT_KEY")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.snapshot_key),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid {
                key: "ORDER_DESK_CHANNEL_BUFFER",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.table_count == 0 {
            return Err(ConfigError::Invalid {
                key: "ORDER_DESK_TABLE_COUNT",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
