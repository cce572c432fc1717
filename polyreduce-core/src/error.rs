//! Error types for polyreduce

use thiserror::Error;

/// Main error type for polyreduce operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Source buffers that cannot describe a triangle mesh
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The mesh graph and the collapse queue disagree; the current pass was aborted
    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    pub fn invariant(message: impl Into<String>) -> Self {
        Error::Invariant(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Error::InvalidData(message.into())
    }
}

/// Result type alias for polyreduce operations
pub type Result<T> = std::result::Result<T, Error>;
