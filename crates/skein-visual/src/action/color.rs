// SPDX-License-Identifier: Apache-2.0

//! Color assignment driven by data values.

use std::fmt;

use skein_data::{DataError, PredicateChain, Table};

use super::{EncodeError, OrdinalMap};
use crate::color::Rgba;
use crate::item::ItemId;
use crate::render::{ItemContext, ItemPredicate};
use crate::table::VisualTable;

/// Which color field a [`DataColorAction`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    /// The fill color.
    Fill,
    /// The stroke color.
    Stroke,
    /// The text color.
    Text,
}

/// Assigns palette colors from the distinct values of a data column.
///
/// Same derivation as [`DataShapeAction`](super::DataShapeAction): values
/// are numbered in first-seen order at [`Self::setup`] time and the number
/// indexes the palette, wrapping when values outnumber entries. Rules
/// cascade first.
pub struct DataColorAction {
    field: String,
    target: ColorTarget,
    palette: Vec<Rgba>,
    ordinal: OrdinalMap,
    rules: PredicateChain<ItemPredicate, Rgba>,
}

impl fmt::Debug for DataColorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataColorAction")
            .field("field", &self.field)
            .field("target", &self.target)
            .field("palette", &self.palette.len())
            .field("ordinal", &self.ordinal.len())
            .finish_non_exhaustive()
    }
}

impl DataColorAction {
    /// Action deriving `target` colors from `field` through `palette`.
    pub fn new(field: impl Into<String>, target: ColorTarget, palette: Vec<Rgba>) -> Self {
        Self {
            field: field.into(),
            target,
            palette,
            ordinal: OrdinalMap::new(),
            rules: PredicateChain::new(),
        }
    }

    /// Column whose values drive the assignment.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Color field this action writes.
    pub fn target(&self) -> ColorTarget {
        self.target
    }

    /// Ordinal numbering captured by the last [`Self::setup`].
    pub fn ordinal(&self) -> &OrdinalMap {
        &self.ordinal
    }

    /// Append a rule pinning a color ahead of the data lookup.
    pub fn add(&mut self, predicate: ItemPredicate, color: Rgba) {
        self.rules.add(predicate, color);
    }

    /// The data lookup owns the default assignment.
    pub fn set_default_color(&mut self, _color: Rgba) -> Result<(), EncodeError> {
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

    /// Color this action would assign to `item`.
    pub fn color_for(
        &self,
        table: &VisualTable,
        data: &Table,
        item: ItemId,
    ) -> Result<Rgba, EncodeError> {
        let ctx = ItemContext { table, item };
        if let Some(color) = self.rules.find_with(|predicate| predicate(ctx)) {
            return Ok(*color);
        }
        let row = table.data_row(item).ok_or(DataError::InvalidRow(item.0))?;
        let value = data.value(row, &self.field)?;
        let index = self
            .ordinal
            .index_of(&value)
            .ok_or_else(|| EncodeError::UnmappedValue(value.to_string()))?;
        if self.palette.is_empty() {
            return Err(EncodeError::MissingPalette);
        }
        Ok(self.palette[index % self.palette.len()])
    }

    /// Assign a color to every item in the table.
    pub fn run(&self, table: &mut VisualTable, data: &Table) -> Result<(), EncodeError> {
        let items: Vec<ItemId> = table.items().collect();
        for item in items {
            let color = self.color_for(table, data, item)?;
            match self.target {
                ColorTarget::Fill => table.set_fill_color(item, color)?,
                ColorTarget::Stroke => table.set_stroke_color(item, color)?,
                ColorTarget::Text => table.set_text_color(item, color)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use skein_data::{Column, ColumnKind};

    use super::*;
    use crate::color;
    use crate::item::{ItemFlags, ItemKind};

    fn dataset(values: &[i64]) -> (Table, VisualTable, Vec<ItemId>) {
        let mut data = Table::new();
        data.add_column(Column::new("load", ColumnKind::Int))
            .expect("column");
        let mut table = VisualTable::new(ItemKind::Node, "graph.nodes");
        let items = values
            .iter()
            .map(|value| {
                let row = data.add_row();
                data.set_int(row, "load", *value).expect("set");
                table.attach(row)
            })
            .collect();
        (data, table, items)
    }

    #[test]
    fn palette_wraps_and_targets_the_chosen_field() {
        let (data, mut table, items) = dataset(&[10, 20, 30]);
        let mut action =
            DataColorAction::new("load", ColorTarget::Stroke, vec![color::RED, color::BLUE]);

        action.setup(&table, &data).expect("setup");
        action.run(&mut table, &data).expect("run");

        assert_eq!(table.stroke_color(items[0]), Some(color::RED));
        assert_eq!(table.stroke_color(items[1]), Some(color::BLUE));
        assert_eq!(table.stroke_color(items[2]), Some(color::RED));
        assert_eq!(table.fill_color(items[0]), Some(color::WHITE));
    }

    #[test]
    fn rules_pin_colors_ahead_of_the_palette() {
        let (data, mut table, items) = dataset(&[1, 1]);
        table
            .set_flag(items[0], ItemFlags::HIGHLIGHTED, true)
            .expect("flag");

        let mut action = DataColorAction::new("load", ColorTarget::Fill, vec![color::GREEN]);
        action.add(
            Box::new(|ctx| ctx.table.has_flag(ctx.item, ItemFlags::HIGHLIGHTED)),
            color::WHITE,
        );

        action.setup(&table, &data).expect("setup");
        action.run(&mut table, &data).expect("run");

        assert_eq!(table.fill_color(items[0]), Some(color::WHITE));
        assert_eq!(table.fill_color(items[1]), Some(color::GREEN));
    }

    #[test]
    fn empty_palette_is_rejected() {
        let (data, mut table, _) = dataset(&[5]);
        let mut action = DataColorAction::new("load", ColorTarget::Fill, Vec::new());
        action.setup(&table, &data).expect("setup");

        assert!(matches!(
            action.run(&mut table, &data),
            Err(EncodeError::MissingPalette)
        ));
    }

    #[test]
    fn derived_default_cannot_be_assigned() {
        let mut action = DataColorAction::new("load", ColorTarget::Fill, vec![color::RED]);
        assert!(matches!(
            action.set_default_color(color::BLUE),
            Err(EncodeError::DerivedDefault)
        ));
    }
}
