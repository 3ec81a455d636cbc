//! FILENAME: core/table/src/frame.rs
//! PURPOSE: Manages the collection of rows (the in-memory dataset).
//! CONTEXT: This file defines the `Frame` struct, a row-major table with
//! named columns. The whole dataset is held in memory; the pipeline only
//! filters, aggregates, and reshapes copies, so every transforming
//! operation returns a fresh Frame and leaves the source untouched.

use rustc_hash::FxHashMap;

use crate::error::SchemaError;
use crate::value::Value;

/// A named-column, row-major table.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Column names in declaration order.
    columns: Vec<String>,

    /// Name -> position lookup for the columns above.
    index: FxHashMap<String, usize>,

    /// Row storage; every row has exactly `columns.len()` values.
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Creates an empty frame with the given column names.
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        let mut index = FxHashMap::default();
        for (pos, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), pos).is_some() {
                return Err(SchemaError::DuplicateColumn {
                    column: name.clone(),
                });
            }
        }
        Ok(Frame {
            columns,
            index,
            rows: Vec::new(),
        })
    }

    /// Creates a frame with columns and initial rows in one step.
    pub fn with_rows(
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, SchemaError> {
        let mut frame = Frame::new(columns)?;
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row. The row must match the frame's column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), SchemaError> {
        if row.len() != self.columns.len() {
            return Err(SchemaError::RowArity {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn row(&self, index: usize) -> &[Value] {
        &self.rows[index]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Position of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolves every requested column, reporting all missing names at
    /// once rather than just the first.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>, SchemaError> {
        let mut positions = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(pos) => positions.push(pos),
                None => missing.push((*name).to_string()),
            }
        }
        if missing.is_empty() {
            Ok(positions)
        } else {
            Err(SchemaError::MissingColumns { columns: missing })
        }
    }

    /// Value at (row, column position). Callers resolve positions once
    /// via `require_columns` and reuse them across the row loop.
    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.rows[row][col]
    }

    /// Returns a new frame keeping only the rows the predicate accepts.
    pub fn filter_rows<F>(&self, mut keep: F) -> Frame
    where
        F: FnMut(&[Value]) -> bool,
    {
        Frame {
            columns: self.columns.clone(),
            index: self.index.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row.as_slice()))
                .cloned()
                .collect(),
        }
    }

    /// Stable-sorts the rows by the given key column positions, ascending.
    pub fn sort_rows_by(&mut self, key_positions: &[usize]) {
        self.rows.sort_by(|a, b| {
            for &pos in key_positions {
                let ord = a[pos].cmp(&b[pos]);
                if ord != std::cmp::Ordering::Equal {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        });
    }
}
