//! Error types for the trailwear core library.

use thiserror::Error;

/// Top-level error type for all trailwear operations.
///
/// The wear lifecycle itself never fails: missing surfaces and vanished
/// records degrade silently. Errors only come from the ambient layers
/// (configuration, blob encoding, the `SQLite` blob store).
#[derive(Error, Debug)]
pub enum WearError {
    /// Serialization or deserialization of the persisted blob failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// `SQLite` persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, WearError>;
