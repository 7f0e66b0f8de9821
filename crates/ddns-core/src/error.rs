//! Error types for the DDNS system
//!
//! Every network operation returns one of these kinds so the engine can
//! decide to log, sleep and retry instead of unwinding.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Public IP lookup failed (timeout, non-2xx, or a body that is not IPv4)
    #[error("Network error: {0}")]
    Network(String),

    /// Token request failed (transport, non-201, or missing token)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A single record update failed (transport or non-204)
    #[error("DNS update for {record} failed: {message}")]
    DnsUpdate {
        /// Fully qualified record name
        record: String,
        /// Error message
        message: String,
    },

    /// The private key file is missing or unparsable
    #[error("Failed to load private key: {0}")]
    KeyLoad(String),

    /// The signing primitive itself failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a DNS update error for a record
    pub fn dns_update(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DnsUpdate {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Create a key loading error
    pub fn key_load(msg: impl Into<String>) -> Self {
        Self::KeyLoad(msg.into())
    }

    /// Create a signing error
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure came from local key material rather than the network
    pub fn is_key_material(&self) -> bool {
        matches!(self, Self::KeyLoad(_) | Self::Signing(_))
    }
}
