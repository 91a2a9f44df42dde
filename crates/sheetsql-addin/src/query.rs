//! Preparing and running statements

use sheetsql::{execute, BindSet, CellError, CellValue, ExecOptions, Outcome};

use crate::args::sql_arg;
use crate::error::{finish, set_last_warning, AddinError, AddinResult};
use crate::handles::{handle_cell, AddinContext, Handle, INVALID_HANDLE};
use crate::with_context;

/// Register `sql` against a database without running it.
///
/// The SQL is compiled once to catch syntax errors early.
pub fn sql_prepare(db: Handle, sql: &CellValue) -> Handle {
    finish(
        "SQL.PREPARE",
        with_context!(|mut ctx| prepare(&mut ctx, db, sql)),
        INVALID_HANDLE,
    )
}

fn prepare(ctx: &mut AddinContext, db: Handle, sql: &CellValue) -> AddinResult<Handle> {
    let sql = sql_arg(sql)?;
    ctx.database(db)?.prepare(&sql)?;
    ctx.statement_for(db, &sql)
}

/// Run SQL and return its rows as an array.
///
/// `handle` is a database, in which case `sql` is run, or a statement, in
/// which case its stored SQL is run again and `sql` is ignored. `bind` is
/// empty, a scalar, a range of positional values, or a two-column range of
/// name/value pairs. A statement that produces no rows returns a statement
/// handle; running the same SQL again returns the same handle. Failures
/// return `#VALUE!` and set the last error. Bind names that match no
/// parameter are reported by [`last_warning`](crate::last_warning).
pub fn sql_exec(handle: Handle, sql: &CellValue, bind: &CellValue, no_headers: bool) -> CellValue {
    set_last_warning(None);
    finish(
        "SQL.EXEC",
        with_context!(|mut ctx| exec(&mut ctx, handle, sql, bind, no_headers)),
        CellValue::Error(CellError::Value),
    )
}

fn exec(
    ctx: &mut AddinContext,
    handle: Handle,
    sql: &CellValue,
    bind: &CellValue,
    no_headers: bool,
) -> AddinResult<CellValue> {
    let binds = BindSet::from_value(bind);
    let options = ExecOptions::no_headers(no_headers);

    let (db, sql, existing) = if ctx.is_statement(handle) {
        let entry = ctx.statement(handle)?;
        (entry.db, entry.sql.clone(), Some(handle))
    } else if ctx.is_database(handle) {
        (handle, sql_arg(sql)?, None)
    } else {
        return Err(AddinError::InvalidHandle(handle));
    };

    let (outcome, report) = execute(ctx.database(db)?, &sql, &binds, &options)?;
    if !report.unresolved.is_empty() {
        let message = format!("SQL.EXEC: {}: not found", report.unresolved.join(", "));
        log::warn!("{message}");
        set_last_warning(Some(message));
    }

    match (outcome, existing) {
        (Outcome::Rows(grid), _) => Ok(CellValue::Array(grid)),
        (Outcome::Done, Some(stmt)) => Ok(handle_cell(stmt)),
        (Outcome::Done, None) => Ok(handle_cell(ctx.statement_for(db, &sql)?)),
    }
}

/// Forget a statement handle
pub fn sql_statement_free(stmt: Handle) -> bool {
    finish(
        "SQL.STATEMENT_FREE",
        with_context!(|mut ctx| {
            if ctx.free_statement(stmt) {
                Ok(true)
            } else {
                Err(AddinError::InvalidHandle(stmt))
            }
        }),
        false,
    )
}
