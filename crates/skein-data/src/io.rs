// SPDX-License-Identifier: Apache-2.0
//! Table schema descriptors and their storage port.
//!
//! A [`TableSchema`] names the columns of a fixed-width record layout; the
//! offset helpers give each column's character span within a record line.
//! Persistence goes through the [`SchemaStore`] port so the core stays free
//! of filesystem code; adapters implement the port outside this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::column::{Column, DataError};
use crate::table::Table;
use crate::value::{ColumnKind, Value};

/// Errors raised by schema persistence.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema not present in the store.
    #[error("schema not found")]
    NotFound,
    /// I/O error while reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One column of a fixed-width record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    /// Column name.
    pub name: String,
    /// Storage kind.
    pub kind: ColumnKind,
    /// Field width in characters within a record line.
    pub width: usize,
    /// Row default, when it differs from the kind's zero value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl SchemaColumn {
    /// Descriptor with the kind's zero default.
    pub fn new(name: impl Into<String>, kind: ColumnKind, width: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            width,
            default: None,
        }
    }

    /// Attach an explicit row default.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Ordered column descriptor for a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Columns in record order.
    pub columns: Vec<SchemaColumn>,
}

impl TableSchema {
    /// Empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column descriptor.
    pub fn push(&mut self, column: SchemaColumn) {
        self.columns.push(column);
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no columns are declared.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First character offset of column `index` within a record line.
    pub fn column_start(&self, index: usize) -> Option<usize> {
        if index >= self.columns.len() {
            return None;
        }
        Some(self.columns[..index].iter().map(|c| c.width).sum())
    }

    /// One-past-last character offset of column `index`.
    pub fn column_end(&self, index: usize) -> Option<usize> {
        let start = self.column_start(index)?;
        Some(start + self.columns[index].width)
    }

    /// Character width of column `index`.
    pub fn column_width(&self, index: usize) -> Option<usize> {
        self.columns.get(index).map(|c| c.width)
    }

    /// Total character width of one record line.
    pub fn line_width(&self) -> usize {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Construct an empty table with this schema's columns.
    ///
    /// A declared default must match its column's kind.
    pub fn build_table(&self) -> Result<Table, DataError> {
        let mut table = Table::new();
        for sc in &self.columns {
            let column = match &sc.default {
                Some(v) if v.kind() == sc.kind => Column::with_default(&sc.name, v.clone()),
                Some(v) => {
                    return Err(DataError::TypeMismatch {
                        column: sc.name.clone(),
                        expected: sc.kind,
                        got: v.kind(),
                    })
                }
                None => Column::new(&sc.name, sc.kind),
            };
            let _ = table.add_column(column)?;
        }
        Ok(table)
    }
}

/// Storage port for raw schema blobs (keyed by logical name).
pub trait SchemaStore {
    /// Load a raw schema blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, SchemaError>;
    /// Persist a raw schema blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), SchemaError>;
}

/// Thin service that serializes schemas and delegates storage to a
/// [`SchemaStore`].
pub struct SchemaService<S> {
    store: S,
}

impl<S> SchemaService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> SchemaService<S>
where
    S: SchemaStore,
{
    /// Load and deserialize the schema for `key`. Returns `Ok(None)` if missing.
    pub fn load(&self, key: &str) -> Result<Option<TableSchema>, SchemaError> {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let schema = serde_json::from_slice(&bytes)?;
                Ok(Some(schema))
            }
            Err(SchemaError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist the schema for `key`.
    pub fn save(&self, key: &str, schema: &TableSchema) -> Result<(), SchemaError> {
        let data = serde_json::to_vec_pretty(schema)?;
        self.store.save_raw(key, &data)
    }
}
