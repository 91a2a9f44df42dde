//! Declared SQL column affinities

use std::fmt;

use crate::cell::{CellKind, CellValue};
use crate::datetime::try_parse_datetime;

/// Declared storage/interpretation category of a SQL column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affinity {
    Integer,
    Float,
    Text,
    Blob,
    Datetime,
    Boolean,
    Null,
}

/// Natural affinity of each cell kind, before date detection on text.
///
/// Errors and arrays carry no type information.
const CELL_AFFINITY: [(CellKind, Affinity); 6] = [
    (CellKind::Number, Affinity::Float),
    (CellKind::Boolean, Affinity::Boolean),
    (CellKind::String, Affinity::Text),
    (CellKind::Empty, Affinity::Null),
    (CellKind::Error, Affinity::Null),
    (CellKind::Array, Affinity::Null),
];

impl Affinity {
    /// Every affinity, in declaration order
    pub const ALL: [Affinity; 7] = [
        Affinity::Integer,
        Affinity::Float,
        Affinity::Text,
        Affinity::Blob,
        Affinity::Datetime,
        Affinity::Boolean,
        Affinity::Null,
    ];

    /// Canonical type name used in generated DDL
    pub fn type_name(&self) -> &'static str {
        match self {
            Affinity::Integer => "INTEGER",
            Affinity::Float => "FLOAT",
            Affinity::Text => "TEXT",
            Affinity::Blob => "BLOB",
            Affinity::Datetime => "DATETIME",
            Affinity::Boolean => "BOOLEAN",
            Affinity::Null => "NULL",
        }
    }

    /// Look up a canonical type name (case-insensitive)
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.type_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Resolve a declared column type.
    ///
    /// A type starting with `DATE` is a date/time column and a type
    /// containing `BOOL` is a boolean column. Everything else follows the
    /// engine's own affinity rules, with an empty declaration meaning blob.
    pub fn from_declared(declared: &str) -> Self {
        let decl = declared.trim().to_ascii_uppercase();

        if decl.starts_with("DATE") {
            Affinity::Datetime
        } else if decl.contains("BOOL") {
            Affinity::Boolean
        } else if decl == "NULL" {
            Affinity::Null
        } else if decl.contains("INT") {
            Affinity::Integer
        } else if decl.contains("CHAR") || decl.contains("CLOB") || decl.contains("TEXT") {
            Affinity::Text
        } else if decl.is_empty() || decl.contains("BLOB") {
            Affinity::Blob
        } else {
            Affinity::Float
        }
    }

    /// Natural affinity of a cell kind, without looking at the payload
    pub fn of_kind(kind: CellKind) -> Self {
        CELL_AFFINITY
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(Affinity::Null, |(_, a)| *a)
    }

    /// Natural affinity of a cell value: text that parses as a calendar
    /// date/time is [`Affinity::Datetime`].
    pub fn of_value(value: &CellValue) -> Self {
        match value {
            CellValue::String(s) if try_parse_datetime(s.as_str()).is_some() => Affinity::Datetime,
            _ => Self::of_kind(value.kind()),
        }
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, Affinity::Datetime)
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_types() {
        assert_eq!(Affinity::from_declared("DATETIME"), Affinity::Datetime);
        assert_eq!(Affinity::from_declared("date"), Affinity::Datetime);
        assert_eq!(Affinity::from_declared("Date_Of_Birth"), Affinity::Datetime);
        assert_eq!(Affinity::from_declared("BOOLEAN"), Affinity::Boolean);
        assert_eq!(Affinity::from_declared("INTEGER"), Affinity::Integer);
        assert_eq!(Affinity::from_declared("BIGINT"), Affinity::Integer);
        assert_eq!(Affinity::from_declared("VARCHAR(20)"), Affinity::Text);
        assert_eq!(Affinity::from_declared("TEXT"), Affinity::Text);
        assert_eq!(Affinity::from_declared("BLOB"), Affinity::Blob);
        assert_eq!(Affinity::from_declared(""), Affinity::Blob);
        assert_eq!(Affinity::from_declared("FLOAT"), Affinity::Float);
        assert_eq!(Affinity::from_declared("REAL"), Affinity::Float);
        assert_eq!(Affinity::from_declared("NUMERIC"), Affinity::Float);
        assert_eq!(Affinity::from_declared("NULL"), Affinity::Null);
    }

    #[test]
    fn test_type_names_round_trip() {
        for affinity in Affinity::ALL {
            assert_eq!(Affinity::from_type_name(affinity.type_name()), Some(affinity));
            assert_eq!(Affinity::from_declared(affinity.type_name()), affinity);
        }
        assert_eq!(Affinity::from_type_name("varchar"), None);
    }

    #[test]
    fn test_natural_affinity() {
        assert_eq!(Affinity::of_value(&CellValue::Number(1.0)), Affinity::Float);
        assert_eq!(Affinity::of_value(&CellValue::Boolean(true)), Affinity::Boolean);
        assert_eq!(Affinity::of_value(&CellValue::from("Alice")), Affinity::Text);
        assert_eq!(Affinity::of_value(&CellValue::from("1990-05-02")), Affinity::Datetime);
        assert_eq!(Affinity::of_value(&CellValue::Empty), Affinity::Null);
    }
}
