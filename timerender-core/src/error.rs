//! Error types for timerender-core

use thiserror::Error;

/// Main error type for the timerender-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Message catalog error
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A user-supplied timestamp could not be interpreted
    #[error("invalid timestamp {input:?}: {message}")]
    InvalidTimestamp { input: String, message: String },
}

/// Result type alias for timerender-core
pub type Result<T> = std::result::Result<T, Error>;
