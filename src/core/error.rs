//! Error types and handling for the file picker service.
//!
//! This module defines a unified error type covering every failure a request
//! or startup can hit, so that the transport layer maps errors in one place.

use thiserror::Error;

use super::security::{PathRejection, RootError};

/// A specialized Result type for file picker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the service.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested filename was refused.
    #[error("Rejected: {0}")]
    Rejected(#[from] PathRejection),

    /// The files directory is missing or unusable.
    #[error("Configuration error: {0}")]
    Root(#[from] RootError),

    /// I/O errors while streaming a file that was already resolved.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The configuration error behind this failure, if any.
    pub fn root_error(&self) -> Option<&RootError> {
        match self {
            Self::Root(e) | Self::Rejected(PathRejection::Configuration(e)) => Some(e),
            _ => None,
        }
    }
}
