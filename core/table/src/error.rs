//! FILENAME: core/table/src/error.rs

use thiserror::Error;

/// Structural problems with a frame or a request made against one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("duplicate column name: {column}")]
    DuplicateColumn { column: String },

    #[error("row has {actual} values but the frame has {expected} columns")]
    RowArity { expected: usize, actual: usize },
}
