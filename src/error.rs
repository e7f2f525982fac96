// Error types for certwatch
//
// Structured error types using thiserror. Configuration errors are fatal for the
// whole run, connection errors are scoped to a single host and notification
// errors to the final mail step.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Main error type for certwatch operations
#[derive(Debug, Error)]
pub enum WatchError {
    /// Invalid or unreadable configuration
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// A single host could not be probed
    #[error("check failed for {host}:{port}: {source}")]
    ConnectionError {
        host: String,
        port: u16,
        #[source]
        source: ProbeError,
    },

    /// The report could not be built or delivered
    #[error("Notification failed: {details}")]
    NotificationError { details: String },

    /// The run was interrupted before it completed
    #[error("Run cancelled before completion")]
    Cancelled,

    /// Strict mode: the run finished but something in it failed
    #[error("Run finished with failures: {message}")]
    RunFailed { message: String },

    /// Generic I/O error
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: io::Error,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Causes of a failed certificate probe
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connect or handshake did not finish in time
    #[error("timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// DNS, TCP or socket level failure
    #[error("{0}")]
    Io(#[from] io::Error),

    /// TLS negotiation failed
    #[error("TLS handshake failed: {details}")]
    Handshake { details: String },

    /// Host name cannot be used as a TLS server name
    #[error("invalid server name: {name}")]
    InvalidServerName { name: String },

    /// Handshake completed without a peer certificate
    #[error("no certificate presented by server")]
    NoCertificate,

    /// Peer certificate could not be decoded
    #[error("certificate parsing error: {details}")]
    CertificateParse { details: String },
}

impl WatchError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        WatchError::ConfigError {
            message: message.into(),
        }
    }

    /// Shorthand for a notification error
    pub fn notification(details: impl Into<String>) -> Self {
        WatchError::NotificationError {
            details: details.into(),
        }
    }
}

impl From<anyhow::Error> for WatchError {
    fn from(err: anyhow::Error) -> Self {
        WatchError::Other(err.to_string())
    }
}

impl From<tokio::task::JoinError> for WatchError {
    fn from(err: tokio::task::JoinError) -> Self {
        WatchError::Other(format!("Task join error: {}", err))
    }
}

impl From<toml::de::Error> for WatchError {
    fn from(err: toml::de::Error) -> Self {
        WatchError::config(format!("Failed to parse TOML config: {}", err))
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(err: serde_json::Error) -> Self {
        WatchError::config(format!("Failed to parse JSON config: {}", err))
    }
}

impl From<lettre::address::AddressError> for WatchError {
    fn from(err: lettre::address::AddressError) -> Self {
        WatchError::notification(format!("Email address error: {}", err))
    }
}

impl From<lettre::error::Error> for WatchError {
    fn from(err: lettre::error::Error) -> Self {
        WatchError::notification(format!("Email error: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for WatchError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        WatchError::notification(format!("SMTP error: {}", err))
    }
}
