//! Error types for the record-set crate.
//!
//! Every variant describes malformed tabular input. Positions are reported
//! as 1-based line numbers of the source text so operators can find the
//! offending line in the raw export.

use thiserror::Error;

/// Errors raised while decoding or assembling a [`crate::RecordSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordSetError {
    /// The input contained no header row.
    #[error("tabular input is empty")]
    EmptyInput,

    /// A header cell is blank once trimmed of whitespace.
    #[error("column {index} has a blank name")]
    BlankColumnName {
        /// Zero-based position of the blank column.
        index: usize,
    },

    /// Two header cells carry the same name.
    #[error("column name '{name}' appears more than once")]
    DuplicateColumnName {
        /// The repeated column name.
        name: String,
    },

    /// A data row does not have one field per column.
    #[error("line {line} has {found} fields, expected {expected}")]
    RaggedRow {
        /// Line number of the offending row.
        line: u64,
        /// Number of columns declared by the header.
        expected: usize,
        /// Number of fields found on the row.
        found: usize,
    },

    /// The input is not valid UTF-8.
    #[error("line {line} is not valid UTF-8: {message}")]
    InvalidUtf8 {
        /// Line number of the offending row.
        line: u64,
        /// Description of the decoding failure.
        message: String,
    },

    /// A cell could not be converted to its column's inferred type.
    #[error("row {row}, column '{column}': {message}")]
    CellConversion {
        /// Zero-based data row index.
        row: usize,
        /// Column name.
        column: String,
        /// Description of the conversion failure.
        message: String,
    },

    /// Any other failure reported by the delimited-text reader.
    #[error("malformed tabular input: {message}")]
    Malformed {
        /// Description of the reader failure.
        message: String,
    },
}
