//! Reading worksheet arguments

use sheetsql::{CellValue, Grid};

use crate::error::{AddinError, AddinResult};

/// A required, non-blank name such as a table
pub(crate) fn name_arg(what: &str, value: &str) -> AddinResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AddinError::argument(format!("{what} must not be blank")));
    }
    Ok(value.to_string())
}

/// A required range. A scalar is treated as a 1x1 range.
pub(crate) fn grid_arg(what: &str, value: &CellValue) -> AddinResult<Grid> {
    match value {
        CellValue::Array(grid) if !grid.is_empty() => Ok(grid.clone()),
        CellValue::Array(_) | CellValue::Empty => {
            Err(AddinError::argument(format!("{what} is missing")))
        }
        CellValue::Error(e) => Err(AddinError::argument(format!("{what} is {e}"))),
        scalar => Ok(Grid::from_row(vec![scalar.clone()]).map_err(sheetsql::Error::from)?),
    }
}

/// An optional list of cells, flattened row by row
pub(crate) fn list_arg(value: &CellValue) -> Option<Vec<CellValue>> {
    match value {
        CellValue::Empty => None,
        CellValue::Array(grid) => Some(grid.values().to_vec()),
        scalar => Some(vec![scalar.clone()]),
    }
}

/// SQL given as text, or as a range of fragments joined with spaces
pub(crate) fn sql_arg(value: &CellValue) -> AddinResult<String> {
    let sql = match value {
        CellValue::String(s) => s.as_str().trim().to_string(),
        CellValue::Array(grid) => grid
            .values()
            .iter()
            .filter(|v| !v.is_blank())
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    };
    if sql.is_empty() {
        return Err(AddinError::argument("SQL must be text"));
    }
    Ok(sql)
}
