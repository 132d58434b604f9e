// SPDX-License-Identifier: Apache-2.0
//! Typed column storage.
//!
//! A column owns one contiguous vector per kind plus a default value used to
//! fill new rows. Columns may be marked read-only; writes through the public
//! setter are then rejected, while owner-maintained columns (graph endpoint
//! columns) mutate through the crate-private raw path.

use thiserror::Error;

use crate::value::{ColumnKind, Value};

/// Errors raised by table and column operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Write attempted on a read-only column.
    #[error("column '{column}' is read-only")]
    ReadOnly {
        /// Name of the rejected column.
        column: String,
        /// Underlying reason, when the restriction derives from another failure.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// Value kind does not match the column kind.
    #[error("column '{column}' stores {expected:?}, got {got:?}")]
    TypeMismatch {
        /// Column that rejected the write or read.
        column: String,
        /// Kind the column stores.
        expected: ColumnKind,
        /// Kind that was supplied or requested.
        got: ColumnKind,
    },
    /// Unknown column name.
    #[error("no such column '{0}'")]
    NoSuchColumn(String),
    /// Column name already present in the table.
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),
    /// Row handle is not live in this table.
    #[error("row {0} is not valid")]
    InvalidRow(u32),
}

#[derive(Debug, Clone)]
enum ColumnData {
    Text(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
}

impl ColumnData {
    fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Text => Self::Text(Vec::new()),
            ColumnKind::Int => Self::Int(Vec::new()),
            ColumnKind::Float => Self::Float(Vec::new()),
            ColumnKind::Bool => Self::Bool(Vec::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }
}

/// A named, typed column with a row default and a read-only gate.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    data: ColumnData,
    default: Value,
    read_only: bool,
}

impl Column {
    /// New column of `kind` with that kind's zero default.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        let default = match kind {
            ColumnKind::Text => Value::Str(String::new()),
            ColumnKind::Int => Value::Int(0),
            ColumnKind::Float => Value::Float(0.0),
            ColumnKind::Bool => Value::Bool(false),
        };
        Self {
            name: name.into(),
            data: ColumnData::empty(kind),
            default,
            read_only: false,
        }
    }

    /// New column whose kind and row default come from `default`.
    pub fn with_default(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::empty(default.kind()),
            default,
            read_only: false,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage kind.
    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Text(_) => ColumnKind::Text,
            ColumnData::Int(_) => ColumnKind::Int,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Bool(_) => ColumnKind::Bool,
        }
    }

    /// Default value filled into new rows.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Whether public writes are rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Toggle the read-only gate.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Physical cell count (including cells of dead rows).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when no cells are stored.
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// Append one cell holding the default value.
    pub(crate) fn push_default(&mut self) {
        match (&mut self.data, &self.default) {
            (ColumnData::Text(v), Value::Str(d)) => v.push(d.clone()),
            (ColumnData::Int(v), Value::Int(d)) => v.push(*d),
            (ColumnData::Float(v), Value::Float(d)) => v.push(*d),
            (ColumnData::Bool(v), Value::Bool(d)) => v.push(*d),
            // Kind and default are paired at construction.
            _ => debug_assert!(false, "column default kind drifted"),
        }
    }

    /// Reset one cell to the default value (row slot reuse).
    pub(crate) fn reset(&mut self, row: usize) {
        let default = self.default.clone();
        let _ = self.write(row, default);
    }

    /// Owned value of one cell.
    pub fn get(&self, row: usize) -> Option<Value> {
        match &self.data {
            ColumnData::Text(v) => v.get(row).map(|s| Value::Str(s.clone())),
            ColumnData::Int(v) => v.get(row).map(|x| Value::Int(*x)),
            ColumnData::Float(v) => v.get(row).map(|x| Value::Float(*x)),
            ColumnData::Bool(v) => v.get(row).map(|x| Value::Bool(*x)),
        }
    }

    /// Borrowed text cell; `None` when out of bounds or not a text column.
    pub fn get_str(&self, row: usize) -> Option<&str> {
        match &self.data {
            ColumnData::Text(v) => v.get(row).map(String::as_str),
            _ => None,
        }
    }

    /// Integer cell; `None` when out of bounds or not an integer column.
    pub fn get_int(&self, row: usize) -> Option<i64> {
        match &self.data {
            ColumnData::Int(v) => v.get(row).copied(),
            _ => None,
        }
    }

    /// Float cell; `None` when out of bounds or not a float column.
    pub fn get_float(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Float(v) => v.get(row).copied(),
            _ => None,
        }
    }

    /// Boolean cell; `None` when out of bounds or not a boolean column.
    pub fn get_bool(&self, row: usize) -> Option<bool> {
        match &self.data {
            ColumnData::Bool(v) => v.get(row).copied(),
            _ => None,
        }
    }

    /// Write one cell, honoring the read-only gate.
    pub fn set(&mut self, row: usize, value: Value) -> Result<(), DataError> {
        if self.read_only {
            return Err(DataError::ReadOnly {
                column: self.name.clone(),
                source: None,
            });
        }
        self.write(row, value)
    }

    /// Write one cell, bypassing the read-only gate. Kind checks still apply.
    pub(crate) fn set_raw(&mut self, row: usize, value: Value) -> Result<(), DataError> {
        self.write(row, value)
    }

    fn write(&mut self, row: usize, value: Value) -> Result<(), DataError> {
        let mismatch = |column: &str, expected: ColumnKind, got: ColumnKind| {
            Err(DataError::TypeMismatch {
                column: column.to_owned(),
                expected,
                got,
            })
        };
        if row >= self.data.len() {
            return Err(DataError::InvalidRow(crate::table::row_index_u32(row)));
        }
        match (&mut self.data, value) {
            (ColumnData::Text(v), Value::Str(x)) => v[row] = x,
            (ColumnData::Int(v), Value::Int(x)) => v[row] = x,
            (ColumnData::Float(v), Value::Float(x)) => v[row] = x,
            (ColumnData::Bool(v), Value::Bool(x)) => v[row] = x,
            (_, value) => return mismatch(&self.name, self.kind(), value.kind()),
        }
        Ok(())
    }
}
