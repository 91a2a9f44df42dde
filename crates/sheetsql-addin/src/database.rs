//! Opening and closing databases

use rusqlite::Connection;

use crate::error::{finish, AddinError, AddinResult};
use crate::handles::{AddinContext, Handle, INVALID_HANDLE};
use crate::with_context;

const MEMORY: &str = ":memory:";

/// Open a database file, or an in-memory database for `":memory:"` or a
/// blank path.
///
/// Returns [`INVALID_HANDLE`] if the file cannot be opened.
pub fn sql_db(path: &str) -> Handle {
    finish("SQL.DB", open(path), INVALID_HANDLE)
}

fn open(path: &str) -> AddinResult<Handle> {
    let path = path.trim();
    let conn = if path.is_empty() || path == MEMORY {
        Connection::open_in_memory()?
    } else {
        Connection::open(path)?
    };
    log::debug!("opened database {}", if path.is_empty() { MEMORY } else { path });
    with_context!(|mut ctx| Ok(ctx.open_database(conn)))
}

/// Close a database and every statement registered against it
pub fn sql_db_close(db: Handle) -> bool {
    finish("SQL.DB_CLOSE", with_context!(|mut ctx| close(&mut ctx, db)), false)
}

fn close(ctx: &mut AddinContext, db: Handle) -> AddinResult<bool> {
    if ctx.close_database(db) {
        Ok(true)
    } else {
        Err(AddinError::InvalidHandle(db))
    }
}
