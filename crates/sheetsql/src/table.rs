//! Creating and filling tables from grids

use rusqlite::Connection;
use sheetsql_core::{Affinity, CellValue, Grid};

use crate::codec::encode;
use crate::error::{Error, Result};
use crate::infer::{infer_column_from, natural_type};
use crate::options::InferOptions;

/// One column of a table schema
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Type as written in the DDL
    pub declared_type: String,
    /// Affinity resolved once from `declared_type`
    pub affinity: Affinity,
}

impl Column {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, declared_type: T) -> Self {
        let declared_type = declared_type.into();
        Self {
            name: name.into(),
            affinity: Affinity::from_declared(&declared_type),
            declared_type,
        }
    }
}

/// Ordered columns of a table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSchema {
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn declared_types(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.declared_type.as_str()).collect()
    }

    /// `CREATE TABLE` statement for this schema
    pub fn create_sql(&self, table: &str) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.declared_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE {}({})", quote_identifier(table), columns)
    }
}

/// Quote an identifier for use in generated SQL
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Positional `INSERT` with `?1..?N` placeholders
pub fn insert_sql(table: &str, columns: usize) -> String {
    let placeholders = (1..=columns)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {} VALUES({})", quote_identifier(table), placeholders)
}

/// Work out column names and types for a grid.
///
/// Without explicit `columns`, row 0 of `data` supplies the names. A
/// non-blank explicit type wins (uppercased). A blank entry in an explicit
/// type list takes the natural type of data row 1. With no type list at
/// all, each column's type is inferred across its data rows, skipping the
/// header row when there is one.
pub fn build_schema(
    data: &Grid,
    columns: Option<&[CellValue]>,
    types: Option<&[CellValue]>,
    options: &InferOptions,
) -> Result<TableSchema> {
    if data.is_empty() {
        return Err(Error::MissingData("data must have at least one row"));
    }
    if let Some(columns) = columns {
        if columns.len() != data.columns() {
            return Err(Error::shape(format!(
                "{} column names for {} data columns",
                columns.len(),
                data.columns()
            )));
        }
    }
    if let Some(types) = types {
        if types.len() != data.columns() {
            return Err(Error::shape(format!(
                "{} column types for {} data columns",
                types.len(),
                data.columns()
            )));
        }
        if data.rows() < 2 {
            return Err(Error::shape("explicit types need at least two data rows"));
        }
    }

    // Header cells name columns; they never take part in typing
    let start = usize::from(columns.is_none());
    let mut schema = TableSchema::default();
    for j in 0..data.columns() {
        let name_cell = match columns {
            Some(columns) => &columns[j],
            None => data.get(0, j).unwrap_or(&CellValue::Empty),
        };
        if name_cell.is_blank() {
            return Err(Error::shape(format!("column {} has no name", j + 1)));
        }

        let explicit = types.and_then(|t| explicit_type(&t[j]));
        let declared = match (explicit, types) {
            (Some(declared), _) => declared,
            (None, Some(_)) => {
                natural_type(data.get(1, j).unwrap_or(&CellValue::Empty))
                    .type_name()
                    .to_string()
            }
            (None, None) => infer_column_from(data, j, start, options)
                .type_name()
                .to_string(),
        };

        schema.columns.push(Column::new(name_cell.to_string(), declared));
    }

    Ok(schema)
}

fn explicit_type(cell: &CellValue) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    let declared = cell.to_string().trim().to_uppercase();
    (!declared.is_empty()).then_some(declared)
}

/// Replace `table` with one built from `data` and insert its rows.
///
/// Row 0 is the header unless explicit `columns` are given. Shape problems
/// are reported before any SQL runs. The insert happens in one
/// transaction that is rolled back if any row fails.
pub fn create_table(
    conn: &mut Connection,
    table: &str,
    data: &Grid,
    columns: Option<&[CellValue]>,
    types: Option<&[CellValue]>,
    options: &InferOptions,
) -> Result<TableSchema> {
    let schema = build_schema(data, columns, types, options)?;

    drop_table(conn, table)?;
    let ddl = schema.create_sql(table);
    log::debug!("{ddl}");
    conn.execute_batch(&ddl)?;

    let start = usize::from(columns.is_none());
    let inserted = insert_rows(conn, table, &schema, data.iter_rows().skip(start))?;
    log::debug!("inserted {inserted} row(s) into {table}");

    Ok(schema)
}

/// Append every row of `data` to an existing table.
///
/// The table's declared column types decide how each value is stored.
pub fn insert_table(conn: &mut Connection, table: &str, data: &Grid) -> Result<usize> {
    let schema = table_schema(conn, table)?;
    if schema.len() != data.columns() {
        return Err(Error::shape(format!(
            "table {table} has {} columns, data has {}",
            schema.len(),
            data.columns()
        )));
    }
    insert_rows(conn, table, &schema, data.iter_rows())
}

/// Append the rows produced by a `SELECT` on the same connection
pub fn insert_query(conn: &Connection, table: &str, select: &str) -> Result<usize> {
    let sql = format!("INSERT INTO {} {}", quote_identifier(table), trim_sql(select));
    log::debug!("{sql}");
    Ok(conn.execute(&sql, [])?)
}

/// Replace `table` with the result of a `SELECT`
pub fn create_table_as(conn: &Connection, table: &str, select: &str) -> Result<()> {
    drop_table(conn, table)?;
    let sql = format!("CREATE TABLE {} AS {}", quote_identifier(table), trim_sql(select));
    log::debug!("{sql}");
    conn.execute_batch(&sql)?;
    Ok(())
}

/// Read back the declared schema of an existing table
pub fn table_schema(conn: &Connection, table: &str) -> Result<TableSchema> {
    let mut stmt = conn.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns = stmt
        .query_map([table], |row| {
            Ok(Column::new(row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if columns.is_empty() {
        return Err(Error::UnknownTable(table.to_string()));
    }
    Ok(TableSchema { columns })
}

fn drop_table(conn: &Connection, table: &str) -> Result<()> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_identifier(table)))?;
    Ok(())
}

fn insert_rows<'a, I>(conn: &mut Connection, table: &str, schema: &TableSchema, rows: I) -> Result<usize>
where
    I: Iterator<Item = &'a [CellValue]>,
{
    let tx = conn.transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(&insert_sql(table, schema.len()))?;
        for row in rows {
            for (j, (value, column)) in row.iter().zip(&schema.columns).enumerate() {
                stmt.raw_bind_parameter(j + 1, encode(value, Some(column.affinity))?)?;
            }
            stmt.raw_execute()?;
            count += 1;
        }
    }
    tx.commit()?;
    Ok(count)
}

fn trim_sql(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}
