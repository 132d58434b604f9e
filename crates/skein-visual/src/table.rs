// SPDX-License-Identifier: Apache-2.0

//! Visual item table: per-item draw state layered over a data table.
//!
//! Each attached data [`Row`] gets one [`VisualRow`] slot holding position,
//! color, font, shape, interest, flags, and a cached bounds rectangle. Every
//! effective write lands in a change journal and, when it can alter pixels,
//! widens the accumulated damage region. Readers drain both with
//! [`VisualTable::take_changes`] and [`VisualTable::take_damage`].

use rustc_hash::FxHashMap;
use skein_data::{DataError, Row, TableEvent, TableEventKind};

use crate::item::{
    FieldChange, FieldValue, FontSpec, ItemFlags, ItemId, ItemKind, VisualField, VisualRow,
};
use crate::rect::Rect;
use crate::Rgba;

/// Saturating usize-to-u32 conversion for item indices.
fn item_index_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// How a field write propagates beyond the journal.
#[derive(Debug, Clone, Copy)]
enum ChangeMode {
    /// Invalidates cached bounds and damages the stale rectangle.
    Geometry,
    /// Damages the current rectangle, bounds stay valid.
    Appearance,
    /// Journal only.
    Record,
}

/// Visual state for one item group, keyed by [`ItemId`].
///
/// Slots are recycled through a free list, so an [`ItemId`] is only valid
/// until its item is detached. Stale ids surface as
/// [`DataError::InvalidRow`] from setters and `None` from getters.
#[derive(Debug)]
pub struct VisualTable {
    kind: ItemKind,
    group: String,
    rows: Vec<Option<VisualRow>>,
    free: Vec<u32>,
    by_data: FxHashMap<Row, ItemId>,
    changes: Vec<FieldChange>,
    damage: Rect,
}

impl VisualTable {
    /// Empty table for one item kind under a group name.
    pub fn new(kind: ItemKind, group: impl Into<String>) -> Self {
        Self {
            kind,
            group: group.into(),
            rows: Vec::new(),
            free: Vec::new(),
            by_data: FxHashMap::default(),
            changes: Vec::new(),
            damage: Rect::EMPTY,
        }
    }

    /// Item kind every row of this table shares.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Group name, used to address this table from actions.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Number of attached items.
    pub fn len(&self) -> usize {
        self.by_data.len()
    }

    /// Whether no items are attached.
    pub fn is_empty(&self) -> bool {
        self.by_data.is_empty()
    }

    // ---- attachment ------------------------------------------------------

    /// Attach a data row, creating a visual slot with default state.
    ///
    /// Attaching a row that is already attached returns its existing item.
    pub fn attach(&mut self, data_row: Row) -> ItemId {
        if let Some(&item) = self.by_data.get(&data_row) {
            return item;
        }
        let row = VisualRow::new(data_row);
        let item = if let Some(index) = self.free.pop() {
            self.rows[index as usize] = Some(row);
            ItemId(index)
        } else {
            self.rows.push(Some(row));
            ItemId(item_index_u32(self.rows.len() - 1))
        };
        self.by_data.insert(data_row, item);
        item
    }

    /// Detach an item, damaging its last bounds and recycling the slot.
    ///
    /// Returns whether the item was attached.
    pub fn detach(&mut self, item: ItemId) -> bool {
        let Some(slot) = self.rows.get_mut(item.index()) else {
            return false;
        };
        let Some(row) = slot.take() else {
            return false;
        };
        self.damage = self.damage.union(&row.bounds);
        self.by_data.remove(&row.data_row);
        self.free.push(item.0);
        true
    }

    /// Item attached to a data row, if any.
    pub fn item_for(&self, data_row: Row) -> Option<ItemId> {
        self.by_data.get(&data_row).copied()
    }

    /// Data row behind an item.
    pub fn data_row(&self, item: ItemId) -> Option<Row> {
        self.slot(item).map(|row| row.data_row)
    }

    /// Live items in slot order.
    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|_| ItemId(item_index_u32(index))))
    }

    fn slot(&self, item: ItemId) -> Option<&VisualRow> {
        self.rows.get(item.index()).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, item: ItemId) -> Result<&mut VisualRow, DataError> {
        self.rows
            .get_mut(item.index())
            .and_then(Option::as_mut)
            .ok_or(DataError::InvalidRow(item.0))
    }

    // ---- change plumbing -------------------------------------------------

    fn changed(&mut self, item: ItemId, mode: ChangeMode, change: FieldChange) {
        match mode {
            ChangeMode::Geometry => {
                if let Some(row) = self.rows.get_mut(item.index()).and_then(Option::as_mut) {
                    let stale = row.bounds;
                    row.flags.remove(ItemFlags::VALIDATED);
                    self.damage = self.damage.union(&stale);
                }
            }
            ChangeMode::Appearance => {
                if let Some(bounds) = self.slot(item).map(|row| row.bounds) {
                    self.damage = self.damage.union(&bounds);
                }
            }
            ChangeMode::Record => {}
        }
        self.changes.push(change);
    }

    fn update_f64(
        &mut self,
        item: ItemId,
        field: VisualField,
        pick: fn(&mut VisualRow) -> &mut f64,
        value: f64,
        mode: ChangeMode,
    ) -> Result<(), DataError> {
        let slot = pick(self.slot_mut(item)?);
        let old = *slot;
        if old.to_bits() == value.to_bits() {
            return Ok(());
        }
        *slot = value;
        self.changed(
            item,
            mode,
            FieldChange {
                item,
                field,
                old: FieldValue::F64(old),
                new: FieldValue::F64(value),
            },
        );
        Ok(())
    }

    fn update_color(
        &mut self,
        item: ItemId,
        field: VisualField,
        pick: fn(&mut VisualRow) -> &mut Rgba,
        value: Rgba,
        mode: ChangeMode,
    ) -> Result<(), DataError> {
        let slot = pick(self.slot_mut(item)?);
        let old = *slot;
        if old == value {
            return Ok(());
        }
        *slot = value;
        self.changed(
            item,
            mode,
            FieldChange {
                item,
                field,
                old: FieldValue::Color(old),
                new: FieldValue::Color(value),
            },
        );
        Ok(())
    }

    fn update_font(
        &mut self,
        item: ItemId,
        field: VisualField,
        pick: fn(&mut VisualRow) -> &mut FontSpec,
        value: FontSpec,
        mode: ChangeMode,
    ) -> Result<(), DataError> {
        let slot = pick(self.slot_mut(item)?);
        if *slot == value {
            return Ok(());
        }
        let old = std::mem::replace(slot, value.clone());
        self.changed(
            item,
            mode,
            FieldChange {
                item,
                field,
                old: FieldValue::Font(old),
                new: FieldValue::Font(value),
            },
        );
        Ok(())
    }

    // ---- geometry fields -------------------------------------------------

    /// Current x coordinate.
    pub fn x(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.x)
    }

    /// Current y coordinate.
    pub fn y(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.y)
    }

    /// Set the current x coordinate. Invalidates cached bounds.
    pub fn set_x(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(item, VisualField::X, |row| &mut row.x, value, ChangeMode::Geometry)
    }

    /// Set the current y coordinate. Invalidates cached bounds.
    pub fn set_y(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(item, VisualField::Y, |row| &mut row.y, value, ChangeMode::Geometry)
    }

    /// Animation start x.
    pub fn start_x(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.start_x)
    }

    /// Animation start y.
    pub fn start_y(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.start_y)
    }

    /// Animation end x.
    pub fn end_x(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.end_x)
    }

    /// Animation end y.
    pub fn end_y(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.end_y)
    }

    /// Set the animation start x. Journal only.
    pub fn set_start_x(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(
            item,
            VisualField::StartX,
            |row| &mut row.start_x,
            value,
            ChangeMode::Record,
        )
    }

    /// Set the animation start y. Journal only.
    pub fn set_start_y(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(
            item,
            VisualField::StartY,
            |row| &mut row.start_y,
            value,
            ChangeMode::Record,
        )
    }

    /// Set the animation end x. Journal only.
    pub fn set_end_x(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(
            item,
            VisualField::EndX,
            |row| &mut row.end_x,
            value,
            ChangeMode::Record,
        )
    }

    /// Set the animation end y. Journal only.
    pub fn set_end_y(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(
            item,
            VisualField::EndY,
            |row| &mut row.end_y,
            value,
            ChangeMode::Record,
        )
    }

    /// Current size multiplier.
    pub fn size(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.size)
    }

    /// Animation start size.
    pub fn start_size(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.start_size)
    }

    /// Animation end size.
    pub fn end_size(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.end_size)
    }

    /// Set the current size multiplier. Invalidates cached bounds.
    pub fn set_size(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(
            item,
            VisualField::Size,
            |row| &mut row.size,
            value,
            ChangeMode::Geometry,
        )
    }

    /// Set the animation start size. Journal only.
    pub fn set_start_size(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(
            item,
            VisualField::StartSize,
            |row| &mut row.start_size,
            value,
            ChangeMode::Record,
        )
    }

    /// Set the animation end size. Journal only.
    pub fn set_end_size(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(
            item,
            VisualField::EndSize,
            |row| &mut row.end_size,
            value,
            ChangeMode::Record,
        )
    }

    /// Shape code drawn for the item.
    pub fn shape(&self, item: ItemId) -> Option<i32> {
        self.slot(item).map(|row| row.shape)
    }

    /// Set the shape code. Invalidates cached bounds.
    pub fn set_shape(&mut self, item: ItemId, value: i32) -> Result<(), DataError> {
        let row = self.slot_mut(item)?;
        let old = row.shape;
        if old == value {
            return Ok(());
        }
        row.shape = value;
        self.changed(
            item,
            ChangeMode::Geometry,
            FieldChange {
                item,
                field: VisualField::Shape,
                old: FieldValue::Shape(old),
                new: FieldValue::Shape(value),
            },
        );
        Ok(())
    }

    // ---- appearance fields -----------------------------------------------

    /// Current fill color.
    pub fn fill_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.fill)
    }

    /// Animation start fill color.
    pub fn start_fill_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.start_fill)
    }

    /// Animation end fill color.
    pub fn end_fill_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.end_fill)
    }

    /// Set the current fill color. Damages current bounds.
    pub fn set_fill_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::FillColor,
            |row| &mut row.fill,
            value,
            ChangeMode::Appearance,
        )
    }

    /// Set the animation start fill color. Journal only.
    pub fn set_start_fill_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::StartFillColor,
            |row| &mut row.start_fill,
            value,
            ChangeMode::Record,
        )
    }

    /// Set the animation end fill color. Journal only.
    pub fn set_end_fill_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::EndFillColor,
            |row| &mut row.end_fill,
            value,
            ChangeMode::Record,
        )
    }

    /// Current stroke color.
    pub fn stroke_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.stroke)
    }

    /// Animation start stroke color.
    pub fn start_stroke_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.start_stroke)
    }

    /// Animation end stroke color.
    pub fn end_stroke_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.end_stroke)
    }

    /// Set the current stroke color. Damages current bounds.
    pub fn set_stroke_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::StrokeColor,
            |row| &mut row.stroke,
            value,
            ChangeMode::Appearance,
        )
    }

    /// Set the animation start stroke color. Journal only.
    pub fn set_start_stroke_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::StartStrokeColor,
            |row| &mut row.start_stroke,
            value,
            ChangeMode::Record,
        )
    }

    /// Set the animation end stroke color. Journal only.
    pub fn set_end_stroke_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::EndStrokeColor,
            |row| &mut row.end_stroke,
            value,
            ChangeMode::Record,
        )
    }

    /// Current text color.
    pub fn text_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.text)
    }

    /// Animation start text color.
    pub fn start_text_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.start_text)
    }

    /// Animation end text color.
    pub fn end_text_color(&self, item: ItemId) -> Option<Rgba> {
        self.slot(item).map(|row| row.end_text)
    }

    /// Set the current text color. Damages current bounds.
    pub fn set_text_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::TextColor,
            |row| &mut row.text,
            value,
            ChangeMode::Appearance,
        )
    }

    /// Set the animation start text color. Journal only.
    pub fn set_start_text_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::StartTextColor,
            |row| &mut row.start_text,
            value,
            ChangeMode::Record,
        )
    }

    /// Set the animation end text color. Journal only.
    pub fn set_end_text_color(&mut self, item: ItemId, value: Rgba) -> Result<(), DataError> {
        self.update_color(
            item,
            VisualField::EndTextColor,
            |row| &mut row.end_text,
            value,
            ChangeMode::Record,
        )
    }

    /// Current font.
    pub fn font(&self, item: ItemId) -> Option<&FontSpec> {
        self.slot(item).map(|row| &row.font)
    }

    /// Animation start font.
    pub fn start_font(&self, item: ItemId) -> Option<&FontSpec> {
        self.slot(item).map(|row| &row.start_font)
    }

    /// Animation end font.
    pub fn end_font(&self, item: ItemId) -> Option<&FontSpec> {
        self.slot(item).map(|row| &row.end_font)
    }

    /// Set the current font. Invalidates cached bounds.
    pub fn set_font(&mut self, item: ItemId, value: FontSpec) -> Result<(), DataError> {
        self.update_font(
            item,
            VisualField::Font,
            |row| &mut row.font,
            value,
            ChangeMode::Geometry,
        )
    }

    /// Set the animation start font. Journal only.
    pub fn set_start_font(&mut self, item: ItemId, value: FontSpec) -> Result<(), DataError> {
        self.update_font(
            item,
            VisualField::StartFont,
            |row| &mut row.start_font,
            value,
            ChangeMode::Record,
        )
    }

    /// Set the animation end font. Journal only.
    pub fn set_end_font(&mut self, item: ItemId, value: FontSpec) -> Result<(), DataError> {
        self.update_font(
            item,
            VisualField::EndFont,
            |row| &mut row.end_font,
            value,
            ChangeMode::Record,
        )
    }

    /// Degree-of-interest value.
    pub fn doi(&self, item: ItemId) -> Option<f64> {
        self.slot(item).map(|row| row.doi)
    }

    /// Set the degree-of-interest value. Journal only.
    pub fn set_doi(&mut self, item: ItemId, value: f64) -> Result<(), DataError> {
        self.update_f64(
            item,
            VisualField::Doi,
            |row| &mut row.doi,
            value,
            ChangeMode::Record,
        )
    }

    // ---- flags and bounds ------------------------------------------------

    /// Current flag set.
    pub fn flags(&self, item: ItemId) -> Option<ItemFlags> {
        self.slot(item).map(|row| row.flags)
    }

    /// Whether a flag is set on the item.
    pub fn has_flag(&self, item: ItemId, flag: ItemFlags) -> bool {
        self.slot(item).is_some_and(|row| row.flags.contains(flag))
    }

    /// Set or clear flag bits. Damages current bounds when anything changes.
    ///
    /// The VALIDATED bit is owned by the bounds cache and is stripped from
    /// `flag` here; use [`Self::set_validated`] to manage it.
    pub fn set_flag(&mut self, item: ItemId, flag: ItemFlags, on: bool) -> Result<(), DataError> {
        let flag = flag.difference(ItemFlags::VALIDATED);
        let row = self.slot_mut(item)?;
        let old = row.flags;
        let new = if on { old.union(flag) } else { old.difference(flag) };
        if new == old {
            return Ok(());
        }
        row.flags = new;
        self.changed(
            item,
            ChangeMode::Appearance,
            FieldChange {
                item,
                field: VisualField::Flags,
                old: FieldValue::Flags(old),
                new: FieldValue::Flags(new),
            },
        );
        Ok(())
    }

    /// Whether the cached bounds rectangle is current.
    pub fn is_validated(&self, item: ItemId) -> bool {
        self.has_flag(item, ItemFlags::VALIDATED)
    }

    /// Mark the cached bounds current or stale.
    ///
    /// Invalidating damages the cached rectangle so its area repaints.
    pub fn set_validated(&mut self, item: ItemId, validated: bool) -> Result<(), DataError> {
        let row = self.slot_mut(item)?;
        let old = row.flags;
        if old.contains(ItemFlags::VALIDATED) == validated {
            return Ok(());
        }
        let new = if validated {
            old.union(ItemFlags::VALIDATED)
        } else {
            old.difference(ItemFlags::VALIDATED)
        };
        row.flags = new;
        let stale = row.bounds;
        if !validated {
            self.damage = self.damage.union(&stale);
        }
        self.changes.push(FieldChange {
            item,
            field: VisualField::Flags,
            old: FieldValue::Flags(old),
            new: FieldValue::Flags(new),
        });
        Ok(())
    }

    /// Cached bounds rectangle.
    pub fn bounds(&self, item: ItemId) -> Option<Rect> {
        self.slot(item).map(|row| row.bounds)
    }

    /// Replace the cached bounds. Damages the old and new rectangles.
    ///
    /// Leaves the VALIDATED bit alone; renderers set it through
    /// [`Self::validate_bounds`] after recomputing.
    pub fn set_bounds(&mut self, item: ItemId, bounds: Rect) -> Result<(), DataError> {
        let row = self.slot_mut(item)?;
        let old = row.bounds;
        if old == bounds {
            return Ok(());
        }
        row.bounds = bounds;
        self.damage = self.damage.union(&old).union(&bounds);
        self.changes.push(FieldChange {
            item,
            field: VisualField::Bounds,
            old: FieldValue::Bounds(old),
            new: FieldValue::Bounds(bounds),
        });
        Ok(())
    }

    /// Return the cached bounds, marking them current first if stale.
    ///
    /// Validating a stale rectangle damages it once, so the freshly computed
    /// area is repainted.
    pub fn validate_bounds(&mut self, item: ItemId) -> Result<Rect, DataError> {
        let (validated, bounds) = self
            .slot(item)
            .map(|row| (row.flags.contains(ItemFlags::VALIDATED), row.bounds))
            .ok_or(DataError::InvalidRow(item.0))?;
        if validated {
            return Ok(bounds);
        }
        self.set_validated(item, true)?;
        self.damage = self.damage.union(&bounds);
        Ok(bounds)
    }

    // ---- journal and damage ----------------------------------------------

    /// Pending field changes, in write order.
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// Drain the change journal.
    pub fn take_changes(&mut self) -> Vec<FieldChange> {
        std::mem::take(&mut self.changes)
    }

    /// Split off journal entries from `from` onward, leaving the rest queued.
    pub(crate) fn split_changes(&mut self, from: usize) -> Vec<FieldChange> {
        let at = from.min(self.changes.len());
        self.changes.split_off(at)
    }

    /// Drain the accumulated damage region, `None` when nothing is dirty.
    pub fn take_damage(&mut self) -> Option<Rect> {
        if self.damage.is_empty() {
            return None;
        }
        Some(std::mem::replace(&mut self.damage, Rect::EMPTY))
    }

    // ---- data table events -----------------------------------------------

    /// React to a change in the backing data table.
    ///
    /// Cell updates invalidate the bounds of mapped items, removed rows
    /// detach them. Added rows are ignored; attachment is explicit.
    pub fn apply_data_event(&mut self, event: &TableEvent) {
        match event.kind {
            TableEventKind::CellUpdated => {
                for data_row in event.rows() {
                    if let Some(item) = self.item_for(data_row) {
                        let _ = self.set_validated(item, false);
                    }
                }
            }
            TableEventKind::RowsRemoved => {
                for data_row in event.rows() {
                    if let Some(item) = self.item_for(data_row) {
                        self.detach(item);
                    }
                }
            }
            TableEventKind::RowsAdded => {}
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use skein_data::{Column, ColumnKind, Table, TableListener, Value};

    use super::*;
    use crate::color;

    fn table_with_items(n: usize) -> (VisualTable, Vec<ItemId>) {
        let mut table = VisualTable::new(ItemKind::Node, "graph.nodes");
        let mut data = Table::new();
        let items = (0..n)
            .map(|_| table.attach(data.add_row()))
            .collect::<Vec<_>>();
        (table, items)
    }

    #[test]
    fn attach_is_idempotent_and_detach_recycles_slots() {
        let mut data = Table::new();
        let first = data.add_row();
        let second = data.add_row();

        let mut table = VisualTable::new(ItemKind::Node, "graph.nodes");
        let a = table.attach(first);
        assert_eq!(table.attach(first), a);
        assert_eq!(table.len(), 1);

        assert!(table.detach(a));
        assert!(!table.detach(a));
        assert_eq!(table.item_for(first), None);

        let b = table.attach(second);
        assert_eq!(b.index(), a.index());
        assert_eq!(table.data_row(b), Some(second));
        assert_eq!(table.items().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn geometry_write_invalidates_and_damages_stale_bounds() {
        let (mut table, items) = table_with_items(1);
        let item = items[0];
        let old = Rect::new(10.0, 10.0, 4.0, 4.0);
        table.set_bounds(item, old).expect("bounds");
        table.validate_bounds(item).expect("validate");
        let _ = table.take_damage();
        let _ = table.take_changes();

        table.set_x(item, 50.0).expect("set x");

        assert!(!table.is_validated(item));
        let damage = table.take_damage().expect("damage");
        assert!(damage.contains(10.0, 10.0) && damage.contains(14.0, 14.0));
        let changes = table.take_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, VisualField::X);
        assert_eq!(changes[0].new, FieldValue::F64(50.0));
    }

    #[test]
    fn appearance_write_damages_without_invalidating() {
        let (mut table, items) = table_with_items(1);
        let item = items[0];
        table
            .set_bounds(item, Rect::new(0.0, 0.0, 2.0, 2.0))
            .expect("bounds");
        table.validate_bounds(item).expect("validate");
        let _ = table.take_damage();
        let _ = table.take_changes();

        table.set_fill_color(item, color::RED).expect("fill");

        assert!(table.is_validated(item));
        assert!(table.take_damage().is_some());
        assert_eq!(table.changes().len(), 1);
        assert_eq!(table.changes()[0].field, VisualField::FillColor);
    }

    #[test]
    fn endpoint_writes_journal_without_damage() {
        let (mut table, items) = table_with_items(1);
        let item = items[0];
        let _ = table.take_changes();

        table.set_start_x(item, 3.0).expect("start x");
        table.set_end_fill_color(item, color::BLUE).expect("end fill");
        table.set_doi(item, 0.5).expect("doi");

        assert!(table.take_damage().is_none());
        let fields = table
            .take_changes()
            .into_iter()
            .map(|change| change.field)
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![VisualField::StartX, VisualField::EndFillColor, VisualField::Doi]
        );
    }

    #[test]
    fn writing_the_current_value_is_a_no_op() {
        let (mut table, items) = table_with_items(1);
        let item = items[0];
        let _ = table.take_changes();

        table.set_x(item, 0.0).expect("x");
        table.set_size(item, 1.0).expect("size");
        table.set_fill_color(item, color::WHITE).expect("fill");
        table.set_font(item, FontSpec::default()).expect("font");

        assert!(table.changes().is_empty());
        assert!(table.take_damage().is_none());
    }

    #[test]
    fn set_flag_never_touches_the_validated_bit() {
        let (mut table, items) = table_with_items(1);
        let item = items[0];
        table.validate_bounds(item).expect("validate");
        let _ = table.take_changes();

        table
            .set_flag(item, ItemFlags::VALIDATED | ItemFlags::HIGHLIGHTED, true)
            .expect("set");
        assert!(table.has_flag(item, ItemFlags::HIGHLIGHTED));
        assert!(table.is_validated(item));

        table
            .set_flag(item, ItemFlags::VALIDATED, false)
            .expect("clear");
        assert!(table.is_validated(item));
    }

    #[test]
    fn validate_bounds_returns_cached_rect_and_damages_once() {
        let (mut table, items) = table_with_items(1);
        let item = items[0];
        let rect = Rect::new(5.0, 6.0, 7.0, 8.0);
        table.set_bounds(item, rect).expect("bounds");
        let _ = table.take_damage();

        let first = table.validate_bounds(item).expect("first");
        assert_eq!(first, rect);
        assert!(table.is_validated(item));
        assert!(table.take_damage().is_some());

        let second = table.validate_bounds(item).expect("second");
        assert_eq!(second, rect);
        assert!(table.take_damage().is_none());
    }

    #[test]
    fn stale_items_error_on_write_and_read_none() {
        let (mut table, items) = table_with_items(1);
        let item = items[0];
        table.detach(item);

        assert_eq!(table.x(item), None);
        assert!(matches!(
            table.set_x(item, 1.0),
            Err(DataError::InvalidRow(_))
        ));
    }

    /// Captures data-table events for replay into the visual table.
    struct EventLog(std::rc::Rc<std::cell::RefCell<Vec<TableEvent>>>);

    impl TableListener for EventLog {
        fn table_changed(&mut self, event: &TableEvent) {
            self.0.borrow_mut().push(*event);
        }
    }

    #[test]
    fn data_events_invalidate_and_detach_mapped_items() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut data = Table::new();
        data.add_column(Column::new("label", ColumnKind::Text))
            .expect("column");
        let row = data.add_row();
        data.add_listener(Box::new(EventLog(std::rc::Rc::clone(&log))));

        let mut table = VisualTable::new(ItemKind::Node, "graph.nodes");
        let item = table.attach(row);
        table.validate_bounds(item).expect("validate");

        data.set_value(row, "label", Value::from("hub")).expect("set");
        let update = *log.borrow().last().expect("update event");
        table.apply_data_event(&update);
        assert!(!table.is_validated(item));

        data.remove_row(row).expect("remove");
        let removal = *log.borrow().last().expect("removal event");
        table.apply_data_event(&removal);
        assert_eq!(table.item_for(row), None);
        assert!(table.is_empty());
    }
}
