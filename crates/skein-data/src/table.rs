// SPDX-License-Identifier: Apache-2.0
//! Row-stable tables with synchronous change notification.
//!
//! Rows live in a slot arena: removing a row leaves a hole that a later add
//! reuses, so [`Row`] handles stay stable for the table's lifetime and item
//! identity is always (table, row). Every mutation emits one [`TableEvent`]
//! to the registered listeners after the write has landed; listeners receive
//! only the event, so the notification path cannot write back into the table.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::column::{Column, DataError};
use crate::tuple::{TupleMut, TupleRef};
use crate::value::{ColumnKind, Value};

/// Stable handle to a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Row(pub(crate) u32);

impl Row {
    /// Raw slot index.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Saturating usize-to-u32 conversion for row indices.
pub(crate) fn row_index_u32(row: usize) -> u32 {
    u32::try_from(row).unwrap_or(u32::MAX)
}

/// Change kinds carried by [`TableEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEventKind {
    /// Rows were added.
    RowsAdded,
    /// Rows were removed.
    RowsRemoved,
    /// One cell changed.
    CellUpdated,
}

/// A table change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEvent {
    /// First and last affected row, inclusive.
    pub range: (Row, Row),
    /// Affected column index, when the change is column-scoped.
    pub column: Option<usize>,
    /// What happened.
    pub kind: TableEventKind,
}

impl TableEvent {
    /// Rows covered by this event, in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = Row> {
        (self.range.0 .0..=self.range.1 .0).map(Row)
    }
}

/// Receives table change notifications.
pub trait TableListener {
    /// Called once per mutation, after the change has landed.
    fn table_changed(&mut self, event: &TableEvent);
}

/// Ordered named columns over a slot arena of rows.
pub struct Table {
    columns: Vec<Column>,
    index: FxHashMap<String, usize>,
    occupied: Vec<bool>,
    free: Vec<u32>,
    physical: u32,
    live: usize,
    listeners: Vec<Box<dyn TableListener>>,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.live)
            .finish_non_exhaustive()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Empty table with no columns.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            index: FxHashMap::default(),
            occupied: Vec::new(),
            free: Vec::new(),
            physical: 0,
            live: 0,
            listeners: Vec::new(),
        }
    }

    /// Append a column, backfilling existing row slots with its default.
    pub fn add_column(&mut self, mut column: Column) -> Result<usize, DataError> {
        if self.index.contains_key(column.name()) {
            return Err(DataError::DuplicateColumn(column.name().to_owned()));
        }
        while column.len() < self.occupied.len() {
            column.push_default();
        }
        let position = self.columns.len();
        self.index.insert(column.name().to_owned(), position);
        self.columns.push(column);
        Ok(position)
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Column at `position`.
    pub fn column(&self, position: usize) -> Option<&Column> {
        self.columns.get(position)
    }

    /// Mutable column at `position`.
    ///
    /// Structural state (cell count) is table-owned; use this for flags such
    /// as the read-only gate, not for resizing.
    pub fn column_mut(&mut self, position: usize) -> Option<&mut Column> {
        self.columns.get_mut(position)
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of live rows.
    pub fn row_count(&self) -> usize {
        self.live
    }

    /// True when the table has no live rows.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `row` is a live handle of this table.
    pub fn is_valid_row(&self, row: Row) -> bool {
        self.occupied.get(row.0 as usize).copied().unwrap_or(false)
    }

    /// Live rows in ascending slot order.
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.physical)
            .filter(move |&i| self.occupied[i as usize])
            .map(Row)
    }

    /// Add a row, reusing a freed slot when one exists.
    pub fn add_row(&mut self) -> Row {
        let row = if let Some(slot) = self.free.pop() {
            self.occupied[slot as usize] = true;
            for column in &mut self.columns {
                column.reset(slot as usize);
            }
            Row(slot)
        } else {
            let slot = self.physical;
            self.physical += 1;
            self.occupied.push(true);
            for column in &mut self.columns {
                column.push_default();
            }
            Row(slot)
        };
        self.live += 1;
        self.notify(&TableEvent {
            range: (row, row),
            column: None,
            kind: TableEventKind::RowsAdded,
        });
        row
    }

    /// Remove a row. Its slot may be reused by a later add.
    pub fn remove_row(&mut self, row: Row) -> Result<(), DataError> {
        if !self.is_valid_row(row) {
            return Err(DataError::InvalidRow(row.0));
        }
        self.occupied[row.0 as usize] = false;
        self.free.push(row.0);
        self.live -= 1;
        self.notify(&TableEvent {
            range: (row, row),
            column: None,
            kind: TableEventKind::RowsRemoved,
        });
        Ok(())
    }

    fn resolve(&self, row: Row, column: &str) -> Result<usize, DataError> {
        if !self.is_valid_row(row) {
            return Err(DataError::InvalidRow(row.0));
        }
        self.column_index(column)
            .ok_or_else(|| DataError::NoSuchColumn(column.to_owned()))
    }

    /// Owned value of one cell.
    pub fn value(&self, row: Row, column: &str) -> Result<Value, DataError> {
        let position = self.resolve(row, column)?;
        self.columns[position]
            .get(row.0 as usize)
            .ok_or(DataError::InvalidRow(row.0))
    }

    /// Borrowed text cell.
    pub fn get_str(&self, row: Row, column: &str) -> Result<&str, DataError> {
        let position = self.resolve(row, column)?;
        let col = &self.columns[position];
        col.get_str(row.0 as usize)
            .ok_or_else(|| kind_error(col, ColumnKind::Text))
    }

    /// Integer cell.
    pub fn get_int(&self, row: Row, column: &str) -> Result<i64, DataError> {
        let position = self.resolve(row, column)?;
        let col = &self.columns[position];
        col.get_int(row.0 as usize)
            .ok_or_else(|| kind_error(col, ColumnKind::Int))
    }

    /// Float cell.
    pub fn get_float(&self, row: Row, column: &str) -> Result<f64, DataError> {
        let position = self.resolve(row, column)?;
        let col = &self.columns[position];
        col.get_float(row.0 as usize)
            .ok_or_else(|| kind_error(col, ColumnKind::Float))
    }

    /// Boolean cell.
    pub fn get_bool(&self, row: Row, column: &str) -> Result<bool, DataError> {
        let position = self.resolve(row, column)?;
        let col = &self.columns[position];
        col.get_bool(row.0 as usize)
            .ok_or_else(|| kind_error(col, ColumnKind::Bool))
    }

    /// Write one cell, emitting a cell-update event on success.
    pub fn set_value(&mut self, row: Row, column: &str, value: Value) -> Result<(), DataError> {
        let position = self.resolve(row, column)?;
        self.columns[position].set(row.0 as usize, value)?;
        self.notify(&TableEvent {
            range: (row, row),
            column: Some(position),
            kind: TableEventKind::CellUpdated,
        });
        Ok(())
    }

    /// Write a text cell.
    pub fn set_str(
        &mut self,
        row: Row,
        column: &str,
        value: impl Into<String>,
    ) -> Result<(), DataError> {
        self.set_value(row, column, Value::Str(value.into()))
    }

    /// Write an integer cell.
    pub fn set_int(&mut self, row: Row, column: &str, value: i64) -> Result<(), DataError> {
        self.set_value(row, column, Value::Int(value))
    }

    /// Write a float cell.
    pub fn set_float(&mut self, row: Row, column: &str, value: f64) -> Result<(), DataError> {
        self.set_value(row, column, Value::Float(value))
    }

    /// Write a boolean cell.
    pub fn set_bool(&mut self, row: Row, column: &str, value: bool) -> Result<(), DataError> {
        self.set_value(row, column, Value::Bool(value))
    }

    /// Write one cell by column position, bypassing the read-only gate.
    ///
    /// Reserved for owner-maintained columns (graph endpoints). Emits the
    /// same cell-update event as a public write.
    pub(crate) fn set_raw(
        &mut self,
        row: Row,
        position: usize,
        value: Value,
    ) -> Result<(), DataError> {
        if !self.is_valid_row(row) {
            return Err(DataError::InvalidRow(row.0));
        }
        let col = self
            .columns
            .get_mut(position)
            .ok_or_else(|| DataError::NoSuchColumn(position.to_string()))?;
        col.set_raw(row.0 as usize, value)?;
        self.notify(&TableEvent {
            range: (row, row),
            column: Some(position),
            kind: TableEventKind::CellUpdated,
        });
        Ok(())
    }

    /// Read-only view of one row.
    pub fn tuple(&self, row: Row) -> Result<TupleRef<'_>, DataError> {
        if !self.is_valid_row(row) {
            return Err(DataError::InvalidRow(row.0));
        }
        Ok(TupleRef::new(self, row))
    }

    /// Writable view of one row.
    pub fn tuple_mut(&mut self, row: Row) -> Result<TupleMut<'_>, DataError> {
        if !self.is_valid_row(row) {
            return Err(DataError::InvalidRow(row.0));
        }
        Ok(TupleMut::new(self, row))
    }

    /// Rows whose tuple view satisfies `predicate`, in slot order.
    pub fn rows_matching<F>(&self, predicate: F) -> Vec<Row>
    where
        F: Fn(TupleRef<'_>) -> bool,
    {
        self.rows()
            .filter(|&row| predicate(TupleRef::new(self, row)))
            .collect()
    }

    /// Register a change listener.
    pub fn add_listener(&mut self, listener: Box<dyn TableListener>) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, event: &TableEvent) {
        for listener in &mut self.listeners {
            listener.table_changed(event);
        }
    }
}

fn kind_error(col: &Column, requested: ColumnKind) -> DataError {
    DataError::TypeMismatch {
        column: col.name().to_owned(),
        expected: col.kind(),
        got: requested,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<TableEvent>>>);

    impl TableListener for Recorder {
        fn table_changed(&mut self, event: &TableEvent) {
            self.0.borrow_mut().push(*event);
        }
    }

    fn label_table() -> Table {
        let mut t = Table::new();
        t.add_column(Column::new("label", ColumnKind::Text))
            .expect("column");
        t.add_column(Column::new("weight", ColumnKind::Int))
            .expect("column");
        t
    }

    #[test]
    fn add_and_read_back() {
        let mut t = label_table();
        let r = t.add_row();
        t.set_str(r, "label", "alpha").expect("set");
        t.set_int(r, "weight", 9).expect("set");
        assert_eq!(t.get_str(r, "label").expect("get"), "alpha");
        assert_eq!(t.get_int(r, "weight").expect("get"), 9);
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn removed_slot_is_reused_with_defaults() {
        let mut t = label_table();
        let a = t.add_row();
        t.set_str(a, "label", "stale").expect("set");
        t.remove_row(a).expect("remove");
        assert!(!t.is_valid_row(a));
        let b = t.add_row();
        assert_eq!(a, b, "slot should be recycled");
        assert_eq!(t.get_str(b, "label").expect("get"), "");
    }

    #[test]
    fn read_only_write_fails_and_value_holds() {
        let mut t = label_table();
        let r = t.add_row();
        t.set_int(r, "weight", 4).expect("set");
        let pos = t.column_index("weight").expect("index");
        if let Some(col) = t.column_mut(pos) {
            col.set_read_only(true);
        }
        let err = t.set_int(r, "weight", 8).unwrap_err();
        assert!(matches!(err, DataError::ReadOnly { .. }));
        assert_eq!(t.get_int(r, "weight").expect("get"), 4);
    }

    #[test]
    fn listeners_see_each_mutation_once() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut t = label_table();
        t.add_listener(Box::new(Recorder(Rc::clone(&events))));
        let r = t.add_row();
        t.set_int(r, "weight", 2).expect("set");
        t.remove_row(r).expect("remove");
        let seen = events.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].kind, TableEventKind::RowsAdded);
        assert_eq!(seen[1].kind, TableEventKind::CellUpdated);
        assert_eq!(seen[1].column, t.column_index("weight"));
        assert_eq!(seen[2].kind, TableEventKind::RowsRemoved);
    }

    #[test]
    fn missing_column_is_a_lookup_error() {
        let mut t = label_table();
        let r = t.add_row();
        let err = t.get_int(r, "ghost").unwrap_err();
        assert!(matches!(err, DataError::NoSuchColumn(name) if name == "ghost"));
    }

    #[test]
    fn late_column_backfills_existing_rows() {
        let mut t = label_table();
        let r = t.add_row();
        t.add_column(Column::with_default("score", Value::Float(1.5)))
            .expect("column");
        assert_eq!(t.get_float(r, "score").expect("get"), 1.5);
    }

    #[test]
    fn rows_matching_filters_by_tuple() {
        use crate::tuple::TupleRead;
        let mut t = label_table();
        let a = t.add_row();
        let b = t.add_row();
        t.set_int(a, "weight", 1).expect("set");
        t.set_int(b, "weight", 5).expect("set");
        let heavy = t.rows_matching(|tup| tup.get_int("weight").unwrap_or(0) > 3);
        assert_eq!(heavy, vec![b]);
    }
}
