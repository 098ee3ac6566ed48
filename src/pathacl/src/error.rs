//! Error types for the access-control engine

use thiserror::Error;

/// Access-control engine errors
#[derive(Debug, Error)]
pub enum AclError {
    /// Missing or malformed check, principal, or grant reference
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Grant name was never registered
    #[error("Grant '{0}' does not exist")]
    GrantNotFound(String),

    /// An access or grant extension failed
    #[error("Extension failed: {0}")]
    Extension(#[from] anyhow::Error),

    /// Invalid ACL document
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// TOML document could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for access-control operations
pub type Result<T> = std::result::Result<T, AclError>;
