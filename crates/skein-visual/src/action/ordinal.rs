// SPDX-License-Identifier: Apache-2.0

//! First-seen ordinal numbering of data values.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use skein_data::Value;

/// Assigns each distinct [`Value`] a stable index in first-seen order.
///
/// Data-driven actions use the index to pick palette entries, so two items
/// with equal column values always land on the same palette slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdinalMap {
    index: FxHashMap<Value, usize>,
    order: Vec<Value>,
}

impl OrdinalMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from values in iteration order.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut map = Self::new();
        for value in values {
            map.insert(value);
        }
        map
    }

    /// Number a value, returning its index. Repeats keep their first index.
    pub fn insert(&mut self, value: Value) -> usize {
        match self.index.entry(value) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = self.order.len();
                self.order.push(entry.key().clone());
                entry.insert(index);
                index
            }
        }
    }

    /// Index assigned to a value, if it has been seen.
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no values have been numbered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Distinct values in assignment order.
    pub fn values(&self) -> &[Value] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_first_appearance() {
        let map = OrdinalMap::from_values([
            Value::from("b"),
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
        ]);

        assert_eq!(map.len(), 3);
        assert_eq!(map.index_of(&Value::from("b")), Some(0));
        assert_eq!(map.index_of(&Value::from("a")), Some(1));
        assert_eq!(map.index_of(&Value::from("c")), Some(2));
        assert_eq!(map.index_of(&Value::from("d")), None);
        assert_eq!(
            map.values(),
            &[Value::from("b"), Value::from("a"), Value::from("c")]
        );
    }

    #[test]
    fn mixed_kinds_are_distinct_values() {
        let mut map = OrdinalMap::new();
        assert_eq!(map.insert(Value::Int(1)), 0);
        assert_eq!(map.insert(Value::Float(1.0)), 1);
        assert_eq!(map.insert(Value::Int(1)), 0);
    }
}
