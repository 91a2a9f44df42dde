//! Handle management for databases and statements
//!
//! The host only ever sees numbers. Each number maps to an open connection
//! or to a statement record in one process-wide registry, and every use
//! checks that the number is still live.

use std::collections::HashMap;
use std::sync::Mutex;

use lazy_static::lazy_static;
use rusqlite::Connection;
use sheetsql::CellValue;

use crate::error::{AddinError, AddinResult};

/// Opaque handle type
pub type Handle = u64;

/// Returned by handle-producing functions on failure
pub const INVALID_HANDLE: Handle = 0;

/// A statement registered against a database handle.
///
/// The SQL text is kept rather than a prepared statement, which borrows its
/// connection; it is prepared again each time it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementEntry {
    pub db: Handle,
    pub sql: String,
}

/// Registry of live databases and statements
pub struct AddinContext {
    databases: HashMap<Handle, Connection>,
    statements: HashMap<Handle, StatementEntry>,
    next_handle: Handle,
}

impl AddinContext {
    fn new() -> Self {
        Self {
            databases: HashMap::new(),
            statements: HashMap::new(),
            next_handle: 1, // Start at 1, 0 is invalid
        }
    }

    fn allocate(&mut self) -> Handle {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    pub fn open_database(&mut self, conn: Connection) -> Handle {
        let handle = self.allocate();
        self.databases.insert(handle, conn);
        handle
    }

    pub fn database(&self, handle: Handle) -> AddinResult<&Connection> {
        self.databases
            .get(&handle)
            .ok_or(AddinError::InvalidHandle(handle))
    }

    pub fn database_mut(&mut self, handle: Handle) -> AddinResult<&mut Connection> {
        self.databases
            .get_mut(&handle)
            .ok_or(AddinError::InvalidHandle(handle))
    }

    /// Close a database and forget every statement registered against it
    pub fn close_database(&mut self, handle: Handle) -> bool {
        let closed = self.databases.remove(&handle).is_some();
        if closed {
            self.statements.retain(|_, entry| entry.db != handle);
        }
        closed
    }

    pub fn register_statement(&mut self, db: Handle, sql: &str) -> AddinResult<Handle> {
        self.database(db)?;
        let handle = self.allocate();
        self.statements.insert(
            handle,
            StatementEntry {
                db,
                sql: sql.to_string(),
            },
        );
        Ok(handle)
    }

    /// The handle of the statement already registered for `sql` on `db`,
    /// registering one if there is none
    pub fn statement_for(&mut self, db: Handle, sql: &str) -> AddinResult<Handle> {
        let existing = self
            .statements
            .iter()
            .find(|(_, entry)| entry.db == db && entry.sql == sql)
            .map(|(handle, _)| *handle);
        match existing {
            Some(handle) => Ok(handle),
            None => self.register_statement(db, sql),
        }
    }

    pub fn statement(&self, handle: Handle) -> AddinResult<&StatementEntry> {
        self.statements
            .get(&handle)
            .ok_or(AddinError::InvalidHandle(handle))
    }

    pub fn free_statement(&mut self, handle: Handle) -> bool {
        self.statements.remove(&handle).is_some()
    }

    pub fn is_database(&self, handle: Handle) -> bool {
        self.databases.contains_key(&handle)
    }

    pub fn is_statement(&self, handle: Handle) -> bool {
        self.statements.contains_key(&handle)
    }
}

lazy_static! {
    pub static ref CONTEXT: Mutex<AddinContext> = Mutex::new(AddinContext::new());
}

/// Read a handle passed through a cell: a positive whole number
pub fn handle_from_cell(value: &CellValue) -> Option<Handle> {
    match value {
        CellValue::Number(n) if *n >= 1.0 && n.fract() == 0.0 && *n <= u64::MAX as f64 => {
            Some(*n as Handle)
        }
        _ => None,
    }
}

/// A handle as a cell value
pub fn handle_cell(handle: Handle) -> CellValue {
    CellValue::Number(handle as f64)
}

/// Run a body against the locked registry
#[macro_export]
macro_rules! with_context {
    (|$ctx:ident| $body:expr) => {
        match $crate::handles::CONTEXT.lock() {
            Ok($ctx) => $body,
            Err(_) => Err($crate::error::AddinError::Internal),
        }
    };
    (|mut $ctx:ident| $body:expr) => {
        match $crate::handles::CONTEXT.lock() {
            Ok(mut $ctx) => $body,
            Err(_) => Err($crate::error::AddinError::Internal),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique_and_checked() {
        let mut ctx = AddinContext::new();
        let db = ctx.open_database(Connection::open_in_memory().unwrap());
        let stmt = ctx.register_statement(db, "SELECT 1").unwrap();

        assert_ne!(db, INVALID_HANDLE);
        assert_ne!(db, stmt);
        assert!(ctx.is_database(db));
        assert!(ctx.is_statement(stmt));
        assert!(!ctx.is_database(stmt));
        assert_eq!(ctx.statement(stmt).unwrap().sql, "SELECT 1");

        assert!(matches!(
            ctx.register_statement(999, "SELECT 1"),
            Err(AddinError::InvalidHandle(999))
        ));
    }

    #[test]
    fn test_statement_for_reuses_entry() {
        let mut ctx = AddinContext::new();
        let db = ctx.open_database(Connection::open_in_memory().unwrap());
        let other = ctx.open_database(Connection::open_in_memory().unwrap());

        let first = ctx.statement_for(db, "UPDATE t SET a = 1").unwrap();
        assert_eq!(ctx.statement_for(db, "UPDATE t SET a = 1").unwrap(), first);
        assert_ne!(ctx.statement_for(db, "UPDATE t SET a = 2").unwrap(), first);
        assert_ne!(ctx.statement_for(other, "UPDATE t SET a = 1").unwrap(), first);
        assert_eq!(ctx.statements.len(), 3);
    }

    #[test]
    fn test_close_drops_statements() {
        let mut ctx = AddinContext::new();
        let db = ctx.open_database(Connection::open_in_memory().unwrap());
        let stmt = ctx.register_statement(db, "SELECT 1").unwrap();

        assert!(ctx.close_database(db));
        assert!(!ctx.close_database(db));
        assert!(matches!(ctx.database(db), Err(AddinError::InvalidHandle(_))));
        assert!(matches!(ctx.statement(stmt), Err(AddinError::InvalidHandle(_))));
    }

    #[test]
    fn test_handle_from_cell() {
        assert_eq!(handle_from_cell(&CellValue::Number(3.0)), Some(3));
        assert_eq!(handle_from_cell(&CellValue::Number(0.0)), None);
        assert_eq!(handle_from_cell(&CellValue::Number(1.5)), None);
        assert_eq!(handle_from_cell(&CellValue::from("3")), None);
        assert_eq!(handle_from_cell(&handle_cell(42)), Some(42));
    }
}
