//! sheetsql CLI - move CSV data in and out of SQLite

mod csv_io;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use sheetsql::{
    create_table, execute, infer_types, BindSet, CellValue, ExecOptions, InferOptions, Outcome,
};

use crate::csv_io::{detect_type, read_grid, write_grid, CsvReadOptions};

#[derive(Parser)]
#[command(name = "sheetsql")]
#[command(author, version, about = "Move CSV data in and out of SQLite tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace a table with the contents of a CSV file
    Import {
        /// Database file (":memory:" is accepted but not kept)
        db: PathBuf,

        /// Table to create
        table: String,

        /// Input CSV file
        csv: PathBuf,

        /// Column names; the file then has no header line
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Column types; leave an entry blank to guess it
        #[arg(long, value_delimiter = ',')]
        types: Option<Vec<String>>,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Run SQL and print any rows as CSV
    Query {
        /// Database file
        db: PathBuf,

        /// SQL to run
        sql: String,

        /// Named parameter as name=value (repeatable)
        #[arg(short, long = "bind", value_name = "NAME=VALUE")]
        binds: Vec<String>,

        /// Omit the header row
        #[arg(long)]
        no_headers: bool,
    },

    /// Print the column types guessed for a CSV file
    Types {
        /// Input CSV file
        csv: PathBuf,

        /// Rows to sample (0 for all)
        #[arg(short, long, default_value = "0")]
        rows: usize,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            db,
            table,
            csv,
            columns,
            types,
            delimiter,
        } => import(&db, &table, &csv, columns, types, delimiter),
        Commands::Query {
            db,
            sql,
            binds,
            no_headers,
        } => query(&db, &sql, &binds, no_headers),
        Commands::Types {
            csv,
            rows,
            delimiter,
        } => show_types(&csv, rows, delimiter),
    }
}

fn import(
    db: &Path,
    table: &str,
    input: &Path,
    columns: Option<Vec<String>>,
    types: Option<Vec<String>>,
    delimiter: char,
) -> Result<()> {
    let data = read_csv(input, delimiter)?;
    let mut conn =
        Connection::open(db).with_context(|| format!("Failed to open '{}'", db.display()))?;

    let columns = columns.map(to_cells);
    let types = types.map(to_cells);
    let schema = create_table(
        &mut conn,
        table,
        &data,
        columns.as_deref(),
        types.as_deref(),
        &InferOptions::default(),
    )
    .with_context(|| format!("Failed to import '{}' into {table}", input.display()))?;

    let inserted = data.rows() - usize::from(columns.is_none());
    eprintln!("Imported {inserted} rows into {table}");
    for column in &schema.columns {
        eprintln!("  {} {}", column.name, column.declared_type);
    }

    Ok(())
}

fn query(db: &Path, sql: &str, binds: &[String], no_headers: bool) -> Result<()> {
    let conn =
        Connection::open(db).with_context(|| format!("Failed to open '{}'", db.display()))?;

    let (outcome, report) = execute(
        &conn,
        sql,
        &parse_binds(binds)?,
        &ExecOptions::no_headers(no_headers),
    )
    .context("Query failed")?;

    for name in &report.unresolved {
        eprintln!("Warning: {name}: not found");
    }

    match outcome {
        Outcome::Rows(grid) => {
            write_grid(&grid, io::stdout().lock(), b',').context("Failed to write to stdout")?
        }
        Outcome::Done => eprintln!("Done ({} rows changed)", conn.changes()),
    }

    Ok(())
}

fn show_types(input: &Path, rows: usize, delimiter: char) -> Result<()> {
    let data = read_csv(input, delimiter)?;
    let types = infer_types(&data, &InferOptions::sample(rows));
    println!(
        "{}",
        types
            .iter()
            .map(|t| t.type_name())
            .collect::<Vec<_>>()
            .join(",")
    );
    Ok(())
}

fn read_csv(input: &Path, delimiter: char) -> Result<sheetsql::Grid> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character");
    }
    let options = CsvReadOptions {
        delimiter: delimiter as u8,
        ..Default::default()
    };
    let file =
        File::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;
    let data = read_grid(file, &options)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    if data.is_empty() {
        bail!("'{}' has no rows", input.display());
    }
    Ok(data)
}

fn to_cells(values: Vec<String>) -> Vec<CellValue> {
    values.into_iter().map(CellValue::from).collect()
}

/// Parse `name=value` pairs; values get the same type detection as CSV
/// fields
fn parse_binds(binds: &[String]) -> Result<BindSet> {
    if binds.is_empty() {
        return Ok(BindSet::None);
    }
    let pairs = binds
        .iter()
        .map(|bind| match bind.split_once('=') {
            Some((name, value)) => Ok((CellValue::from(name), detect_type(value))),
            None => bail!("Bind '{bind}' is not of the form name=value"),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(BindSet::Named(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_binds() {
        let binds = parse_binds(&["limit=10".to_string(), ":who=Bob".to_string()]).unwrap();
        assert_eq!(
            binds,
            BindSet::Named(vec![
                ("limit".into(), 10.into()),
                (":who".into(), "Bob".into()),
            ])
        );
        assert_eq!(parse_binds(&[]).unwrap(), BindSet::None);
        assert!(parse_binds(&["novalue".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "sheetsql",
            "import",
            "people.db",
            "people",
            "people.csv",
            "--types",
            "INTEGER,,DATE",
        ])
        .unwrap();
        match cli.command {
            Commands::Import { types, columns, .. } => {
                assert_eq!(
                    types,
                    Some(vec!["INTEGER".to_string(), String::new(), "DATE".to_string()])
                );
                assert_eq!(columns, None);
            }
            _ => panic!("expected import"),
        }
    }
}
