// SPDX-License-Identifier: Apache-2.0

//! One-way synchronization from a [`VisualTable`] to a scene graph.
//!
//! The binding drains the table's change journal and hands each entry to a
//! [`SceneSink`]. The sink only ever receives `&FieldChange`, so a scene
//! adapter cannot write back into the table while a flush is running; echo
//! loops are ruled out by the direction of the API rather than by a guard
//! flag. Writes that originate in the scene go through
//! [`SceneBinding::apply_from_scene`], which absorbs the journal entries they
//! produce instead of forwarding them.

use skein_data::DataError;
use tracing::debug;

use crate::item::{FieldChange, ItemId};
use crate::table::VisualTable;

/// Receives visual field changes destined for a scene graph.
///
/// Items appear in the sink the first time a change mentions them; adapters
/// create scene nodes lazily for ids they have not seen.
pub trait SceneSink {
    /// Apply one field change to the scene node for `item`.
    fn apply_change(&mut self, item: ItemId, change: &FieldChange);
}

/// Drains visual table journals into a [`SceneSink`].
#[derive(Debug, Default)]
pub struct SceneBinding {
    forwarded: u64,
    absorbed: u64,
}

impl SceneBinding {
    /// New binding with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total changes forwarded to sinks so far.
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Total scene-originated changes absorbed so far.
    pub fn absorbed(&self) -> u64 {
        self.absorbed
    }

    /// Forward all pending table changes to the sink, in write order.
    ///
    /// Returns the number of changes forwarded.
    pub fn flush(&mut self, table: &mut VisualTable, sink: &mut dyn SceneSink) -> usize {
        let changes = table.take_changes();
        for change in &changes {
            sink.apply_change(change.item, change);
        }
        self.forwarded += changes.len() as u64;
        if !changes.is_empty() {
            debug!("flushed {} changes from '{}'", changes.len(), table.group());
        }
        changes.len()
    }

    /// Run a scene-originated write against the table, absorbing its journal.
    ///
    /// Entries produced by `write` are dropped instead of being forwarded on
    /// the next [`Self::flush`], since the scene already holds these values.
    /// Entries queued before the call stay queued. Damage still accumulates
    /// normally.
    pub fn apply_from_scene<F>(
        &mut self,
        table: &mut VisualTable,
        write: F,
    ) -> Result<(), DataError>
    where
        F: FnOnce(&mut VisualTable) -> Result<(), DataError>,
    {
        let before = table.changes().len();
        let result = write(table);
        let produced = table.split_changes(before).len();
        self.absorbed += produced as u64;
        if produced > 0 {
            debug!(
                "absorbed {} scene-originated changes into '{}'",
                produced,
                table.group()
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use skein_data::{Row, Table};

    use super::*;
    use crate::color;
    use crate::item::{FieldValue, ItemKind, VisualField};

    /// Records every change it receives.
    #[derive(Default)]
    struct RecordingSink {
        seen: Vec<(ItemId, VisualField, FieldValue)>,
    }

    impl SceneSink for RecordingSink {
        fn apply_change(&mut self, item: ItemId, change: &FieldChange) {
            self.seen.push((item, change.field, change.new.clone()));
        }
    }

    fn node_table() -> (VisualTable, ItemId, Row) {
        let mut data = Table::new();
        let row = data.add_row();
        let mut table = VisualTable::new(ItemKind::Node, "graph.nodes");
        let item = table.attach(row);
        (table, item, row)
    }

    #[test]
    fn flush_forwards_changes_in_write_order() {
        let (mut table, item, _) = node_table();
        let mut binding = SceneBinding::new();
        let mut sink = RecordingSink::default();

        table.set_x(item, 4.0).expect("x");
        table.set_fill_color(item, color::RED).expect("fill");

        assert_eq!(binding.flush(&mut table, &mut sink), 2);
        assert_eq!(binding.forwarded(), 2);
        assert_eq!(
            sink.seen,
            vec![
                (item, VisualField::X, FieldValue::F64(4.0)),
                (item, VisualField::FillColor, FieldValue::Color(color::RED)),
            ]
        );

        assert_eq!(binding.flush(&mut table, &mut sink), 0);
        assert_eq!(sink.seen.len(), 2);
    }

    #[test]
    fn scene_originated_writes_are_absorbed_not_echoed() {
        let (mut table, item, _) = node_table();
        let mut binding = SceneBinding::new();
        let mut sink = RecordingSink::default();

        binding
            .apply_from_scene(&mut table, |t| {
                t.set_x(item, 9.0)?;
                t.set_y(item, 3.0)
            })
            .expect("scene write");

        assert_eq!(table.x(item), Some(9.0));
        assert_eq!(binding.absorbed(), 2);
        assert_eq!(binding.flush(&mut table, &mut sink), 0);
        assert!(sink.seen.is_empty());

        table.set_y(item, 5.0).expect("later write");
        assert_eq!(binding.flush(&mut table, &mut sink), 1);
        assert_eq!(sink.seen[0].1, VisualField::Y);
    }

    #[test]
    fn absorption_leaves_earlier_queued_changes_pending() {
        let (mut table, item, _) = node_table();
        let mut binding = SceneBinding::new();
        let mut sink = RecordingSink::default();

        table.set_x(item, 2.0).expect("app write");
        binding
            .apply_from_scene(&mut table, |t| t.set_y(item, 8.0))
            .expect("scene write");

        assert_eq!(binding.flush(&mut table, &mut sink), 1);
        assert_eq!(sink.seen[0].1, VisualField::X);
    }

    #[test]
    fn absorbed_writes_still_accumulate_damage() {
        let (mut table, item, _) = node_table();
        table
            .set_bounds(item, crate::Rect::new(1.0, 1.0, 2.0, 2.0))
            .expect("bounds");
        table.validate_bounds(item).expect("validate");
        let _ = table.take_damage();
        let _ = table.take_changes();

        let mut binding = SceneBinding::new();
        binding
            .apply_from_scene(&mut table, |t| t.set_x(item, 7.0))
            .expect("scene write");

        assert!(table.take_damage().is_some());
        assert!(!table.is_validated(item));
    }

    #[test]
    fn scene_write_errors_pass_through() {
        let (mut table, item, _) = node_table();
        table.detach(item);
        let mut binding = SceneBinding::new();

        let result = binding.apply_from_scene(&mut table, |t| t.set_x(item, 1.0));
        assert!(matches!(result, Err(DataError::InvalidRow(_))));
        assert_eq!(binding.absorbed(), 0);
    }
}
