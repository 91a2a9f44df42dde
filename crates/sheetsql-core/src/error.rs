//! Error types for sheetsql-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetsql-core
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A row's width differs from the grid's column count
    #[error("Row {row} has {actual} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// An array was placed inside a grid
    #[error("Cell ({row}, {col}) holds an array; grids are flat")]
    NestedArray { row: usize, col: usize },

    /// A calendar time outside the supported range
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
