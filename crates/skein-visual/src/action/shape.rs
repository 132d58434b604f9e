// SPDX-License-Identifier: Apache-2.0

//! Shape assignment actions.

use std::fmt;

use skein_data::{DataError, PredicateChain, Table};

use super::{EncodeError, OrdinalMap};
use crate::item::{ItemId, DEFAULT_SHAPE_PALETTE, SHAPE_NONE};
use crate::render::{ItemContext, ItemPredicate};
use crate::table::VisualTable;

/// Assigns shape codes through a rule chain with a fixed default.
pub struct ShapeAction {
    rules: PredicateChain<ItemPredicate, i32>,
    default_shape: i32,
}

impl fmt::Debug for ShapeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeAction")
            .field("rules", &self.rules.len())
            .field("default_shape", &self.default_shape)
            .finish()
    }
}

impl ShapeAction {
    /// Action assigning `default_shape` to every item no rule claims.
    pub fn new(default_shape: i32) -> Self {
        Self {
            rules: PredicateChain::new(),
            default_shape,
        }
    }

    /// Append a rule pinning a shape code. Earlier rules win.
    pub fn add(&mut self, predicate: ItemPredicate, shape: i32) {
        self.rules.add(predicate, shape);
    }

    /// Shape assigned to unmatched items.
    pub fn default_shape(&self) -> i32 {
        self.default_shape
    }

    /// Replace the shape assigned to unmatched items.
    pub fn set_default_shape(&mut self, shape: i32) {
        self.default_shape = shape;
    }

    /// Shape this action would assign to `item`.
    pub fn shape_for(&self, table: &VisualTable, item: ItemId) -> i32 {
        let ctx = ItemContext { table, item };
        self.rules
            .find_with(|predicate| predicate(ctx))
            .copied()
            .unwrap_or(self.default_shape)
    }

    /// Assign a shape to every item in the table.
    pub fn run(&self, table: &mut VisualTable) -> Result<(), EncodeError> {
        let items: Vec<ItemId> = table.items().collect();
        for item in items {
            let shape = self.shape_for(table, item);
            table.set_shape(item, shape)?;
        }
        Ok(())
    }
}

/// Assigns shape codes from the distinct values of a data column.
///
/// Distinct values are numbered in first-seen order at [`Self::setup`] time
/// and the number indexes a palette, wrapping when values outnumber entries.
/// Rules cascade first, so a predicate can pin individual items.
pub struct DataShapeAction {
    base: ShapeAction,
    field: String,
    palette: Option<Vec<i32>>,
    ordinal: OrdinalMap,
}

impl fmt::Debug for DataShapeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataShapeAction")
            .field("field", &self.field)
            .field("palette", &self.palette)
            .field("ordinal", &self.ordinal.len())
            .finish_non_exhaustive()
    }
}

impl DataShapeAction {
    /// Action deriving shapes from `field`, using the built-in shape palette.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            base: ShapeAction::new(SHAPE_NONE),
            field: field.into(),
            palette: None,
            ordinal: OrdinalMap::new(),
        }
    }

    /// Use a custom shape-code palette instead of the built-in one.
    #[must_use]
    pub fn with_palette(mut self, palette: Vec<i32>) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Column whose values drive the assignment.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Ordinal numbering captured by the last [`Self::setup`].
    pub fn ordinal(&self) -> &OrdinalMap {
        &self.ordinal
    }

    /// Append a rule pinning a shape code ahead of the data lookup.
    pub fn add(&mut self, predicate: ItemPredicate, shape: i32) {
        self.base.add(predicate, shape);
    }

    /// The data lookup owns the default assignment.
    pub fn set_default_shape(&mut self, _shape: i32) -> Result<(), EncodeError> {
        Err(EncodeError::DerivedDefault)
    }

    /// Number the distinct values of the data column over attached items.
    pub fn setup(&mut self, table: &VisualTable, data: &Table) -> Result<(), EncodeError> {
        let mut ordinal = OrdinalMap::new();
        for item in table.items() {
            if let Some(row) = table.data_row(item) {
                ordinal.insert(data.value(row, &self.field)?);
            }
        }
        self.ordinal = ordinal;
        Ok(())
    }

    /// Shape this action would assign to `item`.
    pub fn shape_for(
        &self,
        table: &VisualTable,
        data: &Table,
        item: ItemId,
    ) -> Result<i32, EncodeError> {
        let ruled = self.base.shape_for(table, item);
        if ruled != SHAPE_NONE {
            return Ok(ruled);
        }
        let row = table.data_row(item).ok_or(DataError::InvalidRow(item.0))?;
        let value = data.value(row, &self.field)?;
        let index = self
            .ordinal
            .index_of(&value)
            .ok_or_else(|| EncodeError::UnmappedValue(value.to_string()))?;
        match &self.palette {
            None => Ok(DEFAULT_SHAPE_PALETTE[index % DEFAULT_SHAPE_PALETTE.len()]),
            Some(palette) if palette.is_empty() => Err(EncodeError::MissingPalette),
            Some(palette) => Ok(palette[index % palette.len()]),
        }
    }

    /// Assign a shape to every item in the table.
    pub fn run(&self, table: &mut VisualTable, data: &Table) -> Result<(), EncodeError> {
        let items: Vec<ItemId> = table.items().collect();
        for item in items {
            let shape = self.shape_for(table, data, item)?;
            table.set_shape(item, shape)?;
        }
        Ok(())
    }
}
