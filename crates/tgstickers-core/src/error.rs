//! Error types for tgstickers.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::auth::SignInState;

/// A shared error type for the whole workspace.
///
/// Sign-in variants mirror the outcomes the remote service can report. The
/// state machine turns the recoverable ones into state transitions; everything
/// else propagates to the caller.
#[derive(Error, Debug, Clone)]
pub enum StickersError {
    /// Transport-level failure talking to the remote service. Never retried.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The remote imposed a flood wait.
    #[error("Rate limited by the remote service, retry after {} seconds", .wait.as_secs())]
    RateLimited { wait: Duration },

    /// The verification code was rejected.
    #[error("The verification code was invalid")]
    InvalidCode,

    /// The account has two-factor authentication enabled.
    #[error("A two-factor password is required")]
    TwoFactorRequired,

    /// The remote answered with something the current step does not accept.
    #[error("Unexpected response from the remote service: {0}")]
    UnexpectedResponse(String),

    /// An operation was invoked from a state that does not define it.
    #[error("Operation '{operation}' is not valid in sign-in state {state}")]
    ProtocolState {
        operation: &'static str,
        state: SignInState,
    },

    /// The phone number is malformed or not a valid number.
    #[error("Invalid phone number: '{0}'")]
    InvalidPhoneNumber(String),

    /// No cache entry exists for the pack.
    #[error("No cached metadata for sticker pack '{short_name}'")]
    CacheMiss { short_name: String },

    /// A local file that had to exist was missing.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// One or more media downloads of a batch failed.
    #[error("{failed} of {total} media downloads failed for pack '{short_name}'")]
    MediaDownload {
        short_name: String,
        failed: usize,
        total: usize,
        errors: Vec<String>,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),
}

impl StickersError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse(message.into())
    }

    pub fn cache_miss(short_name: impl Into<String>) -> Self {
        Self::CacheMiss {
            short_name: short_name.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Check if this is a CacheMiss error
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss { .. })
    }

    /// Check if this is a ProtocolState error
    pub fn is_protocol_state(&self) -> bool {
        matches!(self, Self::ProtocolState { .. })
    }

    /// Check if this is a RateLimited error
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StickersError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StickersError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StickersError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StickersError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for StickersError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, StickersError>`.
pub type Result<T> = std::result::Result<T, StickersError>;
