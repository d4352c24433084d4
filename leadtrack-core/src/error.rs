//! Error types for leadtrack-core
//!
//! Tracking operations never return these to callers; they are logged and
//! degraded to "tracking skipped". They surface only from constructors that
//! open files.

use thiserror::Error;

/// Errors from session-scoped storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors from an event sink
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink has not been configured")]
    NotConfigured,

    #[error("Failed to send event {event}: {reason}")]
    SendFailed { event: String, reason: String },
}

/// Errors while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
