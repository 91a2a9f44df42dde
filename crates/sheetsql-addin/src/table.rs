//! Building tables from ranges

use sheetsql::{
    create_table, create_table_as, infer_types, insert_query, insert_table, CellValue, Grid,
    InferOptions,
};

use crate::args::{grid_arg, list_arg, name_arg, sql_arg};
use crate::error::{finish, AddinResult};
use crate::handles::{handle_from_cell, AddinContext, Handle, INVALID_HANDLE};
use crate::with_context;

/// Guess a type name for each column of `range` from its first `rows`
/// rows (0 for all). Returns a one-row array.
pub fn sql_types(range: &CellValue, rows: usize) -> CellValue {
    finish(
        "SQL.TYPES",
        types(range, rows),
        CellValue::Error(sheetsql::CellError::Value),
    )
}

fn types(range: &CellValue, rows: usize) -> AddinResult<CellValue> {
    let data = grid_arg("range", range)?;
    let names = infer_types(&data, &InferOptions::sample(rows))
        .into_iter()
        .map(|affinity| CellValue::from(affinity.type_name()))
        .collect();
    Ok(Grid::from_row(names).map_err(sheetsql::Error::from)?.into())
}

/// Replace `table` with the contents of `data` and return `db`.
///
/// Without `columns`, the first row of `data` holds the column names.
/// Types missing from `types` are guessed from the data.
pub fn sql_create_table(
    db: Handle,
    table: &str,
    data: &CellValue,
    columns: &CellValue,
    types: &CellValue,
) -> Handle {
    finish(
        "SQL.CREATE_TABLE",
        with_context!(|mut ctx| create(&mut ctx, db, table, data, columns, types)),
        INVALID_HANDLE,
    )
}

fn create(
    ctx: &mut AddinContext,
    db: Handle,
    table: &str,
    data: &CellValue,
    columns: &CellValue,
    types: &CellValue,
) -> AddinResult<Handle> {
    let table = name_arg("table", table)?;
    let data = grid_arg("data", data)?;
    let columns = list_arg(columns);
    let types = list_arg(types);

    create_table(
        ctx.database_mut(db)?,
        &table,
        &data,
        columns.as_deref(),
        types.as_deref(),
        &InferOptions::default(),
    )?;
    Ok(db)
}

/// Append rows to an existing table and return `db`.
///
/// `data` is a range of rows, or the handle of a statement whose rows are
/// inserted.
pub fn sql_insert_table(db: Handle, table: &str, data: &CellValue) -> Handle {
    finish(
        "SQL.INSERT_TABLE",
        with_context!(|mut ctx| insert(&mut ctx, db, table, data)),
        INVALID_HANDLE,
    )
}

fn insert(ctx: &mut AddinContext, db: Handle, table: &str, data: &CellValue) -> AddinResult<Handle> {
    let table = name_arg("table", table)?;

    let count = match statement_sql(ctx, data)? {
        Some(select) => insert_query(ctx.database(db)?, &table, &select)?,
        None => {
            let data = grid_arg("data", data)?;
            insert_table(ctx.database_mut(db)?, &table, &data)?
        }
    };
    log::debug!("SQL.INSERT_TABLE: {count} row(s) into {table}");
    Ok(db)
}

/// Replace `table` with the result of a query and return `db`.
///
/// `select` is SQL text, a range of SQL fragments, or a statement handle.
pub fn sql_create_table_as(db: Handle, table: &str, select: &CellValue) -> Handle {
    finish(
        "SQL.CREATE_TABLE_AS",
        with_context!(|mut ctx| create_as(&mut ctx, db, table, select)),
        INVALID_HANDLE,
    )
}

fn create_as(
    ctx: &mut AddinContext,
    db: Handle,
    table: &str,
    select: &CellValue,
) -> AddinResult<Handle> {
    let table = name_arg("table", table)?;
    let select = match statement_sql(ctx, select)? {
        Some(sql) => sql,
        None => sql_arg(select)?,
    };
    create_table_as(ctx.database(db)?, &table, &select)?;
    Ok(db)
}

/// The stored SQL when `value` is a live statement handle
fn statement_sql(ctx: &AddinContext, value: &CellValue) -> AddinResult<Option<String>> {
    match handle_from_cell(value) {
        Some(handle) if ctx.is_statement(handle) => Ok(Some(ctx.statement(handle)?.sql.clone())),
        _ => Ok(None),
    }
}
