//! # sheetsql
//!
//! Move spreadsheet grids in and out of SQLite tables.
//!
//! ## Features
//!
//! - Encode cell values for binding and decode result values back into cells
//! - Guess column types from sample rows
//! - Run a statement and collect its rows into a grid, with optional headers
//! - Create a table from a grid and bulk insert its rows
//! - Bind positional or named parameters from a grid
//!
//! Date/time columns are declared with a type starting with `DATE`. Values
//! bound into them are stored as unix seconds, and values read from them
//! come back as spreadsheet serial day numbers.
//!
//! ## Example
//!
//! ```rust
//! use rusqlite::Connection;
//! use sheetsql::{create_table, execute, BindSet, CellValue, ExecOptions, Grid, InferOptions, Outcome};
//!
//! let mut conn = Connection::open_in_memory().unwrap();
//! let data = Grid::from_rows(vec![
//!     vec!["name".into(), "dob".into()],
//!     vec!["Alice".into(), "1990-05-02".into()],
//! ])
//! .unwrap();
//! create_table(&mut conn, "people", &data, None, None, &InferOptions::default()).unwrap();
//!
//! let (outcome, _) = execute(
//!     &conn,
//!     "SELECT dob FROM people",
//!     &BindSet::None,
//!     &ExecOptions::no_headers(true),
//! )
//! .unwrap();
//! let grid = outcome.into_grid().unwrap();
//! assert_eq!(grid.get(0, 0), Some(&CellValue::Number(32995.0)));
//! ```

pub mod bind;
pub mod codec;
pub mod error;
pub mod exec;
pub mod infer;
pub mod options;
pub mod statement;
pub mod table;

pub use bind::{bind, BindReport, BindSet};
pub use error::{Error, Result};
pub use exec::{execute, materialize, Outcome};
pub use infer::{common_type, infer_column, infer_column_from, infer_types, natural_type};
pub use options::{ExecOptions, InferOptions};
pub use statement::{ColumnKind, StorageKind};
pub use table::{
    build_schema, create_table, create_table_as, insert_query, insert_table, table_schema,
    Column, TableSchema,
};

// Re-export core types
pub use sheetsql_core::{
    try_parse_datetime, Affinity, CalendarTime, CellError, CellKind, CellValue, Grid,
};
