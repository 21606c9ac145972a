//! Error types for moodiary-core

use thiserror::Error;

/// Result type alias using moodiary-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in moodiary-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Diary entry not found
    #[error("Diary entry not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Emotion key that maps to no known category
    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Quote API error
    #[error("Quote API error: {0}")]
    QuoteApi(String),
}
