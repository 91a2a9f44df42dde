//! Column classification for result rows
//!
//! The engine reports a storage class per value (null, integer, real, text,
//! blob). Date/time and boolean columns are a matter of the declared type,
//! so each result column is classified from both: the declared affinity of
//! the column it came from and the storage class of the value in hand.

use rusqlite::types::ValueRef;
use rusqlite::Statement;
use sheetsql_core::Affinity;

/// Runtime storage class of a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Null,
    Integer,
    Float,
    Text,
    Blob,
}

impl StorageKind {
    pub fn of(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => StorageKind::Null,
            ValueRef::Integer(_) => StorageKind::Integer,
            ValueRef::Real(_) => StorageKind::Float,
            ValueRef::Text(_) => StorageKind::Text,
            ValueRef::Blob(_) => StorageKind::Blob,
        }
    }
}

/// How a result value should be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Null,
    Integer,
    Float,
    Text,
    Blob,
    /// Integer storage under a boolean declaration
    Boolean,
    /// Any non-null storage under a date/time declaration
    Datetime(StorageKind),
}

impl ColumnKind {
    /// Classify a value by its column's declared affinity and its storage.
    ///
    /// NULL is always [`ColumnKind::Null`], whatever the declaration.
    /// Expression columns have no declared type and pass `None`.
    pub fn classify(affinity: Option<Affinity>, value: ValueRef<'_>) -> Self {
        let storage = StorageKind::of(value);
        match (affinity, storage) {
            (_, StorageKind::Null) => ColumnKind::Null,
            (Some(Affinity::Datetime), storage) => ColumnKind::Datetime(storage),
            (Some(Affinity::Boolean), StorageKind::Integer) => ColumnKind::Boolean,
            (_, StorageKind::Integer) => ColumnKind::Integer,
            (_, StorageKind::Float) => ColumnKind::Float,
            (_, StorageKind::Text) => ColumnKind::Text,
            (_, StorageKind::Blob) => ColumnKind::Blob,
        }
    }
}

/// Name and declared affinity of one result column
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    pub name: String,
    pub affinity: Option<Affinity>,
}

/// Describe the result columns of a prepared statement
pub fn result_columns(stmt: &Statement<'_>) -> Vec<ResultColumn> {
    stmt.columns()
        .iter()
        .map(|col| ResultColumn {
            name: col.name().to_string(),
            affinity: col.decl_type().map(Affinity::from_declared),
        })
        .collect()
}
