//! Error types for configuration and file loading

use thiserror::Error;

use crate::room::RoomId;

/// Invalid rendering configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("configuration value '{field}' must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
}

impl ConfigError {
    /// Fail when `value` is not strictly positive
    pub fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
        if value > 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::NonPositive { field, value })
        }
    }
}

/// Errors reading rooms, configuration, themes, or coordinate files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid coordinate file: {0}")]
    InvalidCoordinates(String),
}

/// Rejected edits to the cross-group connection list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("cannot connect room {0} to itself")]
    SelfConnection(RoomId),

    #[error("a connection between {0} and {1} already exists")]
    Duplicate(RoomId, RoomId),
}
