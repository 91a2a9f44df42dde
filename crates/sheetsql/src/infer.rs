//! Column type inference
//!
//! Each sampled cell has a natural type; a column's type is the left fold of
//! [`common_type`] over its sample. The fold only ever widens:
//! INTEGER < FLOAT < TEXT < DATETIME, and any pair not on that ladder keeps
//! the running type.

use sheetsql_core::{Affinity, CellValue, Grid};

use crate::options::InferOptions;

/// Natural type of a single cell, before folding across a column
pub fn natural_type(value: &CellValue) -> Affinity {
    Affinity::of_value(value)
}

/// The type that covers both `a` and `b`, biased toward `a`
pub fn common_type(a: Affinity, b: Affinity) -> Affinity {
    use Affinity::*;

    match (a, b) {
        _ if a == b => a,
        (Integer, Float | Text | Datetime) => b,
        (Float, Text | Datetime) => b,
        (Text, Datetime) => b,
        _ => a,
    }
}

/// Infer one column's type from its first rows.
///
/// A column whose sample is entirely empty infers as [`Affinity::Null`],
/// meaning no inference was possible.
pub fn infer_column(grid: &Grid, col: usize, options: &InferOptions) -> Affinity {
    infer_column_from(grid, col, 0, options)
}

/// Infer one column's type from the rows starting at `start`.
///
/// The sample size counts rows from `start`, so a header row can be
/// skipped without shrinking the sample.
pub fn infer_column_from(
    grid: &Grid,
    col: usize,
    start: usize,
    options: &InferOptions,
) -> Affinity {
    let available = grid.rows().saturating_sub(start);
    let rows = options
        .sample_rows
        .map_or(available, |n| n.min(available));

    let mut sample = grid.column(col).skip(start).take(rows).map(natural_type);
    let Some(first) = sample.next() else {
        return Affinity::Null;
    };

    sample.fold(first, |best, natural| {
        if natural == best {
            best
        } else {
            common_type(best, natural)
        }
    })
}

/// Infer the type of every column
pub fn infer_types(grid: &Grid, options: &InferOptions) -> Vec<Affinity> {
    (0..grid.columns())
        .map(|col| infer_column(grid, col, options))
        .collect()
}
