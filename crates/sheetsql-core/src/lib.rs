//! # sheetsql-core
//!
//! Core data structures shared by the sheetsql crates.
//!
//! This crate provides the spreadsheet side of the cell/SQL bridge:
//! - [`CellValue`] - One cell's runtime value (number, text, boolean, error, empty, array)
//! - [`Grid`] - A rectangular, row-major block of cell values
//! - [`CalendarTime`] - A whole-second calendar time with spreadsheet serial and unix conversions
//! - [`Affinity`] - The declared storage category of a SQL column
//!
//! ## Example
//!
//! ```rust
//! use sheetsql_core::{Affinity, CellValue, Grid};
//!
//! let grid = Grid::from_rows(vec![
//!     vec![CellValue::from("id"), CellValue::from("dob")],
//!     vec![CellValue::from(1), CellValue::from("1990-05-02")],
//! ])
//! .unwrap();
//!
//! assert_eq!(grid.rows(), 2);
//! assert_eq!(Affinity::from_declared("DATETIME"), Affinity::Datetime);
//! ```

pub mod affinity;
pub mod cell;
pub mod datetime;
pub mod error;

// Re-exports for convenience
pub use affinity::Affinity;
pub use cell::{CellError, CellKind, CellValue, Grid, SharedString};
pub use datetime::{try_parse_datetime, CalendarTime};
pub use error::{Error, Result};
