//! Core error types for napnote-core.
//!
//! This module defines the error hierarchy using thiserror. Analytics
//! functions are total over their input domain and never return these;
//! errors only arise at the edges (config files, the session log, and the
//! LLM boundary).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for napnote-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Sleep session log errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// LLM insights errors
    #[error("Insights error: {0}")]
    Insights(#[from] InsightsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Home/config directory could not be prepared
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),
}

/// Errors raised by the local session log when a sleep transition is not
/// allowed from the current state.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Awake -> Asleep requested while a session is already open
    #[error("There is already an active sleep session ({id})")]
    AlreadyAsleep { id: String },

    /// Asleep -> Awake requested with no open session
    #[error("No active sleep session")]
    NoActiveSession,

    /// Unknown session id
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session already has an end time
    #[error("This session has already ended: {0}")]
    AlreadyEnded(String),
}

/// Errors at the LLM completion boundary.
///
/// These never fail an insights request; the service degrades to a
/// statistics-only report instead.
#[derive(Error, Debug)]
pub enum InsightsError {
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the completion API
    #[error("Completion API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Response had no text content
    #[error("Completion API returned no text content")]
    EmptyResponse,

    /// API key environment variable unset or a placeholder
    #[error("API key not configured (set {env_var})")]
    MissingApiKey { env_var: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Timestamp could not be parsed
    #[error("Invalid timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
