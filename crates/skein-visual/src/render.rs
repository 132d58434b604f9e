// SPDX-License-Identifier: Apache-2.0

//! Predicate-routed renderer selection.
//!
//! A [`RendererFactory`] maps each visual item to a renderer value. Rules are
//! consulted in insertion order and the first match wins; items no rule
//! claims fall back to a per-kind default. The factory is generic over the
//! renderer type, so callers can route to trait objects, enums, or plain
//! labels.

use std::fmt;

use skein_data::PredicateChain;

use crate::item::{ItemId, ItemKind};
use crate::table::VisualTable;

/// Borrowed view of one item during predicate evaluation.
#[derive(Clone, Copy)]
pub struct ItemContext<'a> {
    /// Table the item lives in.
    pub table: &'a VisualTable,
    /// The item under evaluation.
    pub item: ItemId,
}

impl fmt::Debug for ItemContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemContext")
            .field("group", &self.table.group())
            .field("item", &self.item)
            .finish()
    }
}

/// Boxed predicate over one visual item.
pub type ItemPredicate = Box<dyn Fn(ItemContext<'_>) -> bool>;

/// Routes items to renderers through an ordered rule chain.
pub struct RendererFactory<R> {
    chain: PredicateChain<ItemPredicate, R>,
    item_default: R,
    edge_default: R,
}

impl<R> fmt::Debug for RendererFactory<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererFactory")
            .field("rules", &self.chain.len())
            .finish_non_exhaustive()
    }
}

impl<R> RendererFactory<R> {
    /// Factory with no rules and the given per-kind defaults.
    pub fn new(item_default: R, edge_default: R) -> Self {
        Self {
            chain: PredicateChain::new(),
            item_default,
            edge_default,
        }
    }

    /// Append a routing rule. Earlier rules win.
    pub fn add(&mut self, predicate: ItemPredicate, renderer: R) {
        self.chain.add(predicate, renderer);
    }

    /// Number of routing rules.
    pub fn rules(&self) -> usize {
        self.chain.len()
    }

    /// Default renderer for non-edge items.
    pub fn item_default(&self) -> &R {
        &self.item_default
    }

    /// Default renderer for edge items.
    pub fn edge_default(&self) -> &R {
        &self.edge_default
    }

    /// Replace the default renderer for non-edge items.
    pub fn set_item_default(&mut self, renderer: R) {
        self.item_default = renderer;
    }

    /// Replace the default renderer for edge items.
    pub fn set_edge_default(&mut self, renderer: R) {
        self.edge_default = renderer;
    }

    /// Renderer for `item`: first matching rule, else the kind default.
    pub fn renderer_for(&self, table: &VisualTable, item: ItemId) -> &R {
        let ctx = ItemContext { table, item };
        if let Some(renderer) = self.chain.find_with(|predicate| predicate(ctx)) {
            return renderer;
        }
        match table.kind() {
            ItemKind::Edge => &self.edge_default,
            ItemKind::Node => &self.item_default,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use skein_data::Table;

    use super::*;
    use crate::item::ItemFlags;

    fn table_of(kind: ItemKind, group: &str, n: usize) -> (VisualTable, Vec<ItemId>) {
        let mut data = Table::new();
        let mut table = VisualTable::new(kind, group);
        let items = (0..n)
            .map(|_| table.attach(data.add_row()))
            .collect::<Vec<_>>();
        (table, items)
    }

    #[test]
    fn defaults_route_by_table_kind() {
        let factory = RendererFactory::new("shape", "line");
        let (nodes, node_items) = table_of(ItemKind::Node, "graph.nodes", 1);
        let (edges, edge_items) = table_of(ItemKind::Edge, "graph.edges", 1);

        assert_eq!(*factory.renderer_for(&nodes, node_items[0]), "shape");
        assert_eq!(*factory.renderer_for(&edges, edge_items[0]), "line");
    }

    #[test]
    fn first_matching_rule_shadows_later_rules_and_defaults() {
        let (mut nodes, items) = table_of(ItemKind::Node, "graph.nodes", 2);
        nodes
            .set_flag(items[0], ItemFlags::HIGHLIGHTED, true)
            .expect("flag");

        let mut factory = RendererFactory::new("shape", "line");
        factory.add(
            Box::new(|ctx| ctx.table.has_flag(ctx.item, ItemFlags::HIGHLIGHTED)),
            "halo",
        );
        factory.add(Box::new(|_| true), "catch-all");

        assert_eq!(factory.rules(), 2);
        assert_eq!(*factory.renderer_for(&nodes, items[0]), "halo");
        assert_eq!(*factory.renderer_for(&nodes, items[1]), "catch-all");
    }

    #[test]
    fn replacing_a_default_affects_only_unmatched_items() {
        let (nodes, items) = table_of(ItemKind::Node, "graph.nodes", 1);
        let mut factory = RendererFactory::new("shape", "line");

        factory.set_item_default("label");
        assert_eq!(*factory.renderer_for(&nodes, items[0]), "label");
        assert_eq!(*factory.edge_default(), "line");
    }
}
