//! Options for query execution and type inference

/// Options for turning a statement's rows into a grid
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Emit a header row of column names (default: true)
    pub headers: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self { headers: true }
    }
}

impl ExecOptions {
    /// Options for a caller that passed a `no_headers` flag
    pub fn no_headers(no_headers: bool) -> Self {
        Self {
            headers: !no_headers,
        }
    }
}

/// Options for guessing column types from sample rows
#[derive(Debug, Clone, Default)]
pub struct InferOptions {
    /// Number of rows to scan (default: all)
    pub sample_rows: Option<usize>,
}

impl InferOptions {
    /// Scan the first `rows` rows; zero means all rows
    pub fn sample(rows: usize) -> Self {
        Self {
            sample_rows: (rows > 0).then_some(rows),
        }
    }
}
