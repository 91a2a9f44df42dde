//! Cell-related types
//!
//! This module contains:
//! - [`CellValue`] - The value of one cell
//! - [`Grid`] - A rectangular 2-D array of cell values

mod grid;
mod value;

pub use grid::Grid;
pub use value::{CellError, CellKind, CellValue, SharedString};
