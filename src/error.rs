//! Error handling

use thiserror::Error;

/// Failures talking to the alert backend.
///
/// None of these are fatal: the supervisor recovers through reconnect or fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Stream error: {0}")]
    Stream(String),
}

/// One inbound message that could not be decoded. Only that message is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed payload: {reason}")]
pub struct MalformedPayloadError {
    pub reason: String,
}

impl MalformedPayloadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Startup configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
