//! Error types for contact store operations.

use thiserror::Error;

/// Errors that can occur during contact store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The supplied identifier does not have the store's id shape.
    #[error("cast to id failed for value \"{value}\"")]
    Cast { value: String },

    /// A field failed schema validation.
    #[error("{message}")]
    Validation { message: String },

    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Serialization or deserialization of the collection failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error in a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The closed classification callers dispatch on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed identifier.
    Cast,
    /// Schema validation rejected a field.
    Validation,
    /// Anything else: the store itself failed.
    Other,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Cast { .. } => ErrorKind::Cast,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Unavailable(_) | Self::Serialization(_) | Self::Io(_) => ErrorKind::Other,
        }
    }
}

/// Convenience type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
