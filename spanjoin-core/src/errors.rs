use thiserror::Error;

use crate::models::value::Value;

/// Errors surfaced by join configuration and execution.
///
/// All of these are deterministic functions of input shape and are raised
/// before any search work begins; there is no partial-result mode.
#[derive(Error, Debug)]
pub enum JoinError {
    #[error("column not found: {0}")]
    MissingColumn(String),

    #[error("boundary column '{column}' must be integer-typed, found {found} at row {row}")]
    BoundaryType {
        column: String,
        found: Value,
        row: usize,
    },

    #[error("range with start > end at row {row}: {start} > {end}")]
    InvertedRange { row: usize, start: i64, end: i64 },

    #[error("column '{column}' has {len} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("unsupported join mode: {0}")]
    InvalidMode(String),
}
