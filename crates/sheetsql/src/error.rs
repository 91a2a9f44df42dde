//! Error types for sheetsql

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while moving values between grids and SQL
#[derive(Debug, Error)]
pub enum Error {
    /// The engine reported a failure on prepare, step, bind or exec
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Caller-supplied shapes do not line up
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// No data rows were supplied
    #[error("Missing data: {0}")]
    MissingData(&'static str),

    /// A value that cannot be bound
    #[error("{0}")]
    InvalidValue(&'static str),

    /// The named table does not exist
    #[error("No such table: {0}")]
    UnknownTable(String),

    /// Core error
    #[error("{0}")]
    Core(#[from] sheetsql_core::Error),
}

impl Error {
    /// Create a shape mismatch error with a message
    pub fn shape<S: Into<String>>(msg: S) -> Self {
        Error::ShapeMismatch(msg.into())
    }
}
