//! # sheetsql-addin
//!
//! Worksheet functions over SQLite, for a spreadsheet host.
//!
//! Databases and statements live in a registry and are passed around as
//! numeric handles. Functions that produce a handle return
//! [`INVALID_HANDLE`] on failure; functions that produce a grid return an
//! error cell. Either way the reason is available from [`last_error`].
//!
//! | Function | Worksheet name |
//! |----------|----------------|
//! | [`sql_db`] | `SQL.DB` |
//! | [`sql_exec`] | `SQL.EXEC` |
//! | [`sql_prepare`] | `SQL.PREPARE` |
//! | [`sql_types`] | `SQL.TYPES` |
//! | [`sql_create_table`] | `SQL.CREATE_TABLE` |
//! | [`sql_insert_table`] | `SQL.INSERT_TABLE` |
//! | [`sql_create_table_as`] | `SQL.CREATE_TABLE_AS` |

mod args;
mod database;
mod error;
mod handles;
mod query;
mod table;

pub use database::{sql_db, sql_db_close};
pub use error::*;
pub use handles::{handle_cell, handle_from_cell, Handle, StatementEntry, INVALID_HANDLE};
pub use query::{sql_exec, sql_prepare, sql_statement_free};
pub use table::{sql_create_table, sql_create_table_as, sql_insert_table, sql_types};
