//! Binding caller-supplied values to statement parameters

use rusqlite::Statement;
use sheetsql_core::{CellValue, Grid};

use crate::codec::encode;
use crate::error::Result;

/// Parameter name prefixes the engine recognizes
const PARAMETER_MARKERS: [char; 4] = [':', '@', '$', '?'];

/// Values to bind to a prepared statement
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BindSet {
    /// Nothing to bind
    #[default]
    None,
    /// Values for slots 1..N, in order
    Positional(Vec<CellValue>),
    /// (name, value) pairs resolved through the statement's parameter names
    Named(Vec<(CellValue, CellValue)>),
}

impl BindSet {
    /// Read a bind argument: a two-column array is a list of named pairs,
    /// any other array is flattened row by row into positional values.
    pub fn from_grid(grid: &Grid) -> Self {
        if grid.columns() == 2 {
            BindSet::Named(
                grid.iter_rows()
                    .map(|row| (row[0].clone(), row[1].clone()))
                    .collect(),
            )
        } else {
            BindSet::Positional(grid.values().to_vec())
        }
    }

    /// Read a bind argument that may be missing, a scalar, or an array
    pub fn from_value(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => BindSet::None,
            CellValue::Array(grid) => Self::from_grid(grid),
            scalar => BindSet::Positional(vec![scalar.clone()]),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            BindSet::None => true,
            BindSet::Positional(values) => values.is_empty(),
            BindSet::Named(pairs) => pairs.is_empty(),
        }
    }
}

/// What happened while binding a [`BindSet`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindReport {
    /// Parameters that received a value
    pub bound: usize,
    /// Slots skipped because the name or value was blank
    pub skipped: usize,
    /// Names that matched no parameter in the statement
    pub unresolved: Vec<String>,
}

/// Prefix a parameter name with `:` unless it already carries a marker.
///
/// Returns `None` for a blank name.
pub fn normalize_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        None
    } else if name.starts_with(PARAMETER_MARKERS) {
        Some(name.to_string())
    } else {
        Some(format!(":{name}"))
    }
}

/// Bind values to a prepared statement.
///
/// Blank entries leave their slot untouched. A name that matches no
/// parameter is logged, recorded in the report, and skipped. Text is always
/// bound as text, even when it looks like a date.
pub fn bind(stmt: &mut Statement<'_>, binds: &BindSet) -> Result<BindReport> {
    let mut report = BindReport::default();

    match binds {
        BindSet::None => {}
        BindSet::Positional(values) => {
            for (i, value) in values.iter().enumerate() {
                if value.is_blank() {
                    report.skipped += 1;
                    continue;
                }
                stmt.raw_bind_parameter(i + 1, encode(value, None)?)?;
                report.bound += 1;
            }
        }
        BindSet::Named(pairs) => {
            for (name, value) in pairs {
                let Some(name) = normalize_name(&name.to_string()) else {
                    report.skipped += 1;
                    continue;
                };
                match stmt.parameter_index(&name)? {
                    Some(index) => {
                        stmt.raw_bind_parameter(index, encode(value, None)?)?;
                        report.bound += 1;
                    }
                    None => {
                        log::warn!("{name}: not found");
                        report.unresolved.push(name);
                    }
                }
            }
        }
    }

    log::trace!(
        "bound {} parameter(s), skipped {}, unresolved {}",
        report.bound,
        report.skipped,
        report.unresolved.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn named(pairs: &[(&str, CellValue)]) -> BindSet {
        BindSet::Named(
            pairs
                .iter()
                .map(|(n, v)| (CellValue::from(*n), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("limit").as_deref(), Some(":limit"));
        assert_eq!(normalize_name(" :limit").as_deref(), Some(":limit"));
        assert_eq!(normalize_name("@id").as_deref(), Some("@id"));
        assert_eq!(normalize_name("$x").as_deref(), Some("$x"));
        assert_eq!(normalize_name("  "), None);
    }

    #[test]
    fn test_shape_detection() {
        let pairs = Grid::from_rows(vec![vec![CellValue::from("a"), CellValue::from(1)]]).unwrap();
        assert!(matches!(BindSet::from_grid(&pairs), BindSet::Named(_)));

        let row = Grid::from_row(vec![CellValue::from(1), CellValue::from(2), CellValue::from(3)])
            .unwrap();
        assert_eq!(
            BindSet::from_grid(&row),
            BindSet::Positional(vec![CellValue::from(1), CellValue::from(2), CellValue::from(3)])
        );

        assert_eq!(BindSet::from_value(&CellValue::Empty), BindSet::None);
        assert_eq!(
            BindSet::from_value(&CellValue::from(5)),
            BindSet::Positional(vec![CellValue::from(5)])
        );
    }

    #[test]
    fn test_positional_skips_blanks() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?1, ?2, ?3").unwrap();
        let binds = BindSet::Positional(vec![
            CellValue::from(1),
            CellValue::Empty,
            CellValue::from("x"),
        ]);
        let report = bind(&mut stmt, &binds).unwrap();
        assert_eq!(report.bound, 2);
        assert_eq!(report.skipped, 1);

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get::<_, f64>(0).unwrap(), 1.0);
        assert_eq!(row.get::<_, Option<f64>>(1).unwrap(), None);
        assert_eq!(row.get::<_, String>(2).unwrap(), "x");
    }

    #[test]
    fn test_named_unresolved_is_not_fatal() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT :limit").unwrap();
        let binds = named(&[
            (" :limit", CellValue::from(10)),
            ("bogus", CellValue::from(1)),
            ("", CellValue::from(2)),
        ]);
        let report = bind(&mut stmt, &binds).unwrap();
        assert_eq!(report.bound, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.unresolved, vec![":bogus".to_string()]);

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get::<_, f64>(0).unwrap(), 10.0);
    }

    #[test]
    fn test_date_text_binds_as_text() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT typeof(:d), :d").unwrap();
        bind(&mut stmt, &named(&[("d", CellValue::from("1990-05-02"))])).unwrap();

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get::<_, String>(0).unwrap(), "text");
        assert_eq!(row.get::<_, String>(1).unwrap(), "1990-05-02");
    }

    #[test]
    fn test_bind_error_value_fails() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("SELECT ?1").unwrap();
        let binds = BindSet::Positional(vec![CellValue::Error(sheetsql_core::CellError::Na)]);
        assert!(bind(&mut stmt, &binds).is_err());
    }
}
