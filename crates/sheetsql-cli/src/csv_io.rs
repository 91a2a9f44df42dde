//! Reading CSV into grids and writing grids as CSV

use std::io::{Read, Write};

use sheetsql::{CellValue, Grid};

/// Options for reading CSV input
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Turn numeric and boolean fields into numbers and booleans
    pub auto_detect_types: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            auto_detect_types: true,
        }
    }
}

/// Read every record, header line included, into a grid
pub fn read_grid<R: Read>(reader: R, options: &CsvReadOptions) -> anyhow::Result<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let row = record
            .iter()
            .map(|field| {
                if options.auto_detect_types {
                    detect_type(field)
                } else {
                    CellValue::from(field)
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(Grid::from_rows(rows)?)
}

/// Detect the type of a field value.
///
/// Date-like text stays text; the table builder recognizes it.
pub fn detect_type(field: &str) -> CellValue {
    let field = field.trim();

    if field.is_empty() {
        return CellValue::Empty;
    }

    match field.to_lowercase().as_str() {
        "true" => return CellValue::Boolean(true),
        "false" => return CellValue::Boolean(false),
        _ => {}
    }

    if let Ok(n) = field.parse::<f64>() {
        return CellValue::Number(n);
    }

    CellValue::from(field)
}

/// Write a grid as CSV, one record per row
pub fn write_grid<W: Write>(grid: &Grid, writer: W, delimiter: u8) -> anyhow::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    for row in grid.iter_rows() {
        csv_writer.write_record(row.iter().map(cell_to_field))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// A cell as CSV field text
fn cell_to_field(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        other => other.to_string(),
    }
}
