//! Running statements and collecting their rows into grids

use rusqlite::{Connection, Row, Statement};
use sheetsql_core::{CellValue, Grid};

use crate::bind::{bind, BindReport, BindSet};
use crate::codec::decode;
use crate::error::Result;
use crate::options::ExecOptions;
use crate::statement::{result_columns, ColumnKind, ResultColumn};

/// Result of driving a statement to completion
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The first step finished without producing a row
    Done,
    /// Every row, preceded by a header row when requested
    Rows(Grid),
}

impl Outcome {
    pub fn into_grid(self) -> Option<Grid> {
        match self {
            Outcome::Done => None,
            Outcome::Rows(grid) => Some(grid),
        }
    }
}

/// Prepare `sql`, bind `binds`, and materialize the result
pub fn execute(
    conn: &Connection,
    sql: &str,
    binds: &BindSet,
    options: &ExecOptions,
) -> Result<(Outcome, BindReport)> {
    let mut stmt = conn.prepare(sql)?;
    let report = bind(&mut stmt, binds)?;
    let outcome = materialize(&mut stmt, options)?;
    Ok((outcome, report))
}

/// Step an already-bound statement until it is done.
///
/// Engine errors on any step abort the whole call. Values that cannot be
/// decoded become error cells in place.
pub fn materialize(stmt: &mut Statement<'_>, options: &ExecOptions) -> Result<Outcome> {
    let columns = result_columns(stmt);
    let mut rows = stmt.raw_query();

    let Some(first) = rows.next()? else {
        log::trace!("statement done without rows");
        return Ok(Outcome::Done);
    };

    let mut grid = Grid::new(columns.len());
    if options.headers {
        grid.push_row(
            columns
                .iter()
                .map(|c| CellValue::string(c.name.as_str()))
                .collect(),
        )?;
    }
    grid.push_row(decode_row(first, &columns)?)?;

    while let Some(row) = rows.next()? {
        grid.push_row(decode_row(row, &columns)?)?;
    }

    log::debug!(
        "materialized {} row(s) x {} column(s)",
        grid.rows(),
        grid.columns()
    );
    Ok(Outcome::Rows(grid))
}

fn decode_row(row: &Row<'_>, columns: &[ResultColumn]) -> Result<Vec<CellValue>> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = row.get_ref(i)?;
            Ok(decode(ColumnKind::classify(column.affinity, value), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetsql_core::CellError;

    fn db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE people (id INTEGER, name TEXT, dob DATETIME, active BOOLEAN);
             INSERT INTO people VALUES (1, 'Alice', 641606400, 1);
             INSERT INTO people VALUES (2, 'Bob', 0, 0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_rows_with_headers() {
        let conn = db();
        let (outcome, _) = execute(
            &conn,
            "SELECT id, name, dob, active FROM people ORDER BY id",
            &BindSet::None,
            &ExecOptions::default(),
        )
        .unwrap();

        let expected = Grid::from_rows(vec![
            vec!["id".into(), "name".into(), "dob".into(), "active".into()],
            vec![1.into(), "Alice".into(), 32995.0.into(), true.into()],
            vec![2.into(), "Bob".into(), CellValue::Empty, false.into()],
        ])
        .unwrap();
        assert_eq!(outcome, Outcome::Rows(expected));
    }

    #[test]
    fn test_rows_without_headers() {
        let conn = db();
        let (outcome, _) = execute(
            &conn,
            "SELECT name FROM people WHERE id = ?1",
            &BindSet::Positional(vec![CellValue::from(2)]),
            &ExecOptions::no_headers(true),
        )
        .unwrap();
        assert_eq!(
            outcome.into_grid(),
            Some(Grid::from_row(vec!["Bob".into()]).unwrap())
        );
    }

    #[test]
    fn test_no_rows_is_done() {
        let conn = db();
        let (outcome, _) = execute(
            &conn,
            "UPDATE people SET name = 'Carol' WHERE id = 2",
            &BindSet::None,
            &ExecOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Done);

        let (outcome, _) = execute(
            &conn,
            "SELECT * FROM people WHERE id = 99",
            &BindSet::None,
            &ExecOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Done);
    }

    #[test]
    fn test_engine_error_is_fatal() {
        let conn = db();
        let err = execute(&conn, "SELECT * FROM nowhere", &BindSet::None, &ExecOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn test_bad_date_text_is_a_cell_error() {
        let conn = db();
        conn.execute_batch("INSERT INTO people VALUES (3, 'Dan', 'soon', NULL)")
            .unwrap();
        let (outcome, _) = execute(
            &conn,
            "SELECT name, dob FROM people WHERE id = 3",
            &BindSet::None,
            &ExecOptions::no_headers(true),
        )
        .unwrap();
        assert_eq!(
            outcome.into_grid(),
            Some(Grid::from_row(vec!["Dan".into(), CellError::Value.into()]).unwrap())
        );
    }

    #[test]
    fn test_rectangular_with_header() {
        let conn = db();
        let (outcome, _) = execute(
            &conn,
            "SELECT * FROM people",
            &BindSet::None,
            &ExecOptions::default(),
        )
        .unwrap();
        let grid = outcome.into_grid().unwrap();
        assert_eq!(grid.rows(), 3);
        assert!(grid.iter_rows().all(|row| row.len() == 4));
    }
}
