// SPDX-License-Identifier: Apache-2.0
//! Borrowed row views and the read/write capability traits.
//!
//! A tuple is not a stored object; it is a view over (table, row). Consumers
//! that only need field access take the capability traits, so graph node
//! views and visual item contexts can satisfy the same bounds.

use crate::column::DataError;
use crate::table::{Row, Table};
use crate::value::Value;

/// Read access to one row of a table.
pub trait TupleRead {
    /// Backing table.
    fn table(&self) -> &Table;

    /// Viewed row.
    fn row(&self) -> Row;

    /// Owned value of a field.
    fn value(&self, column: &str) -> Result<Value, DataError> {
        self.table().value(self.row(), column)
    }

    /// Borrowed text field.
    fn get_str(&self, column: &str) -> Result<&str, DataError> {
        self.table().get_str(self.row(), column)
    }

    /// Integer field.
    fn get_int(&self, column: &str) -> Result<i64, DataError> {
        self.table().get_int(self.row(), column)
    }

    /// Float field.
    fn get_float(&self, column: &str) -> Result<f64, DataError> {
        self.table().get_float(self.row(), column)
    }

    /// Boolean field.
    fn get_bool(&self, column: &str) -> Result<bool, DataError> {
        self.table().get_bool(self.row(), column)
    }
}

/// Write access to one row of a table.
pub trait TupleWrite: TupleRead {
    /// Mutable backing table.
    fn table_mut(&mut self) -> &mut Table;

    /// Write a field from an owned value.
    fn set_value(&mut self, column: &str, value: Value) -> Result<(), DataError> {
        let row = self.row();
        self.table_mut().set_value(row, column, value)
    }

    /// Write a text field.
    fn set_str(&mut self, column: &str, value: &str) -> Result<(), DataError> {
        self.set_value(column, Value::Str(value.to_owned()))
    }

    /// Write an integer field.
    fn set_int(&mut self, column: &str, value: i64) -> Result<(), DataError> {
        self.set_value(column, Value::Int(value))
    }

    /// Write a float field.
    fn set_float(&mut self, column: &str, value: f64) -> Result<(), DataError> {
        self.set_value(column, Value::Float(value))
    }

    /// Write a boolean field.
    fn set_bool(&mut self, column: &str, value: bool) -> Result<(), DataError> {
        self.set_value(column, Value::Bool(value))
    }
}

/// Read-only view of a single row.
#[derive(Debug, Clone, Copy)]
pub struct TupleRef<'t> {
    table: &'t Table,
    row: Row,
}

impl<'t> TupleRef<'t> {
    pub(crate) fn new(table: &'t Table, row: Row) -> Self {
        Self { table, row }
    }
}

impl TupleRead for TupleRef<'_> {
    fn table(&self) -> &Table {
        self.table
    }

    fn row(&self) -> Row {
        self.row
    }
}

/// Writable view of a single row.
#[derive(Debug)]
pub struct TupleMut<'t> {
    table: &'t mut Table,
    row: Row,
}

impl<'t> TupleMut<'t> {
    pub(crate) fn new(table: &'t mut Table, row: Row) -> Self {
        Self { table, row }
    }
}

impl TupleRead for TupleMut<'_> {
    fn table(&self) -> &Table {
        self.table
    }

    fn row(&self) -> Row {
        self.row
    }
}

impl TupleWrite for TupleMut<'_> {
    fn table_mut(&mut self) -> &mut Table {
        self.table
    }
}
