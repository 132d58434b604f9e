// SPDX-License-Identifier: Apache-2.0
//! Node-link graphs over a pair of tables.
//!
//! Nodes and edges are rows of two tables; edge endpoints live in two
//! graph-owned read-only integer columns of the edge table, and adjacency is
//! kept as per-node incidence lists.
//!
//! Invariants:
//! - Every live edge's endpoints are live node rows.
//! - Removing a node cascades to its incident edges before the node dies;
//!   the graph owns this policy.
//! - Endpoint columns reject public writes; only the graph mutates them.

use thiserror::Error;

use crate::column::{Column, DataError};
use crate::table::{Row, Table};
use crate::tuple::{TupleMut, TupleRead};
use crate::value::{ColumnKind, Value};

/// Name of the edge-table column holding the source node row.
pub const EDGE_SOURCE: &str = "source";

/// Name of the edge-table column holding the target node row.
pub const EDGE_TARGET: &str = "target";

// Endpoint column positions; Graph::new installs them first on a fresh table.
const SRC_POS: usize = 0;
const DST_POS: usize = 1;

/// Stable node handle (row of the node table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(Row);

impl NodeId {
    /// Backing row in the node table.
    pub fn row(self) -> Row {
        self.0
    }
}

/// Stable edge handle (row of the edge table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EdgeId(Row);

impl EdgeId {
    /// Backing row in the edge table.
    pub fn row(self) -> Row {
        self.0
    }
}

/// A traversable graph element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GraphElement {
    /// A node.
    Node(NodeId),
    /// An edge.
    Edge(EdgeId),
}

impl GraphElement {
    /// Node handle, if this element is a node.
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            Self::Node(n) => Some(n),
            Self::Edge(_) => None,
        }
    }

    /// Edge handle, if this element is an edge.
    pub fn as_edge(self) -> Option<EdgeId> {
        match self {
            Self::Edge(e) => Some(e),
            Self::Node(_) => None,
        }
    }
}

/// Errors from graph mutations and queries.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Node handle is not live in this graph.
    #[error("node {0:?} is not in this graph")]
    MissingNode(NodeId),
    /// Edge handle is not live in this graph.
    #[error("edge {0:?} is not in this graph")]
    MissingEdge(EdgeId),
    /// Node is not an endpoint of the edge.
    #[error("node {node:?} is not an endpoint of edge {edge:?}")]
    NotIncident {
        /// Queried node.
        node: NodeId,
        /// Queried edge.
        edge: EdgeId,
    },
    /// Underlying table failure.
    #[error(transparent)]
    Data(#[from] DataError),
}

fn locked_int(name: &str) -> Column {
    let mut column = Column::new(name, ColumnKind::Int);
    column.set_read_only(true);
    column
}

/// A node-link graph: node table, edge table, incidence lists.
#[derive(Debug)]
pub struct Graph {
    nodes: Table,
    edges: Table,
    incident: Vec<Vec<EdgeId>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Empty graph. The edge table starts with the two endpoint columns.
    pub fn new() -> Self {
        let mut edges = Table::new();
        // Fresh table: the names cannot collide.
        let _ = edges.add_column(locked_int(EDGE_SOURCE));
        let _ = edges.add_column(locked_int(EDGE_TARGET));
        Self {
            nodes: Table::new(),
            edges,
            incident: Vec::new(),
        }
    }

    /// Node payload table.
    pub fn nodes(&self) -> &Table {
        &self.nodes
    }

    /// Mutable node payload table.
    ///
    /// For payload columns and cells only; add and remove nodes through the
    /// graph so incidence stays consistent.
    pub fn nodes_mut(&mut self) -> &mut Table {
        &mut self.nodes
    }

    /// Edge payload table.
    pub fn edges(&self) -> &Table {
        &self.edges
    }

    /// Mutable edge payload table.
    ///
    /// For payload columns and cells only; add and remove edges through the
    /// graph. Endpoint columns are read-only.
    pub fn edges_mut(&mut self) -> &mut Table {
        &mut self.edges
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.row_count()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.row_count()
    }

    /// Whether `node` is live.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.is_valid_row(node.0)
    }

    /// Whether `edge` is live.
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.is_valid_row(edge.0)
    }

    /// Live node handles in row order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.rows().map(NodeId)
    }

    /// Live edge handles in row order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.rows().map(EdgeId)
    }

    /// Add an isolated node.
    pub fn add_node(&mut self) -> NodeId {
        let row = self.nodes.add_row();
        let slot = row.index() as usize;
        if slot >= self.incident.len() {
            self.incident.resize_with(slot + 1, Vec::new);
        }
        debug_assert!(self.incident[slot].is_empty(), "recycled slot kept edges");
        NodeId(row)
    }

    /// Add an edge between two live nodes.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId, GraphError> {
        if !self.contains_node(source) {
            return Err(GraphError::MissingNode(source));
        }
        if !self.contains_node(target) {
            return Err(GraphError::MissingNode(target));
        }
        let row = self.edges.add_row();
        self.edges
            .set_raw(row, SRC_POS, Value::Int(i64::from(source.0.index())))?;
        self.edges
            .set_raw(row, DST_POS, Value::Int(i64::from(target.0.index())))?;
        let edge = EdgeId(row);
        self.incident[source.0.index() as usize].push(edge);
        if source != target {
            self.incident[target.0.index() as usize].push(edge);
        }
        Ok(edge)
    }

    /// Remove an edge.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<(), GraphError> {
        let source = self.source(edge)?;
        let target = self.target(edge)?;
        self.unlink(source, edge);
        if source != target {
            self.unlink(target, edge);
        }
        self.edges.remove_row(edge.0)?;
        Ok(())
    }

    /// Remove a node, cascading to every incident edge.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), GraphError> {
        if !self.contains_node(node) {
            return Err(GraphError::MissingNode(node));
        }
        let incident = std::mem::take(&mut self.incident[node.0.index() as usize]);
        for edge in incident {
            if let Ok(other) = self.adjacent(edge, node) {
                if other != node {
                    self.unlink(other, edge);
                }
            }
            self.edges.remove_row(edge.0)?;
        }
        self.nodes.remove_row(node.0)?;
        Ok(())
    }

    fn unlink(&mut self, node: NodeId, edge: EdgeId) {
        if let Some(bucket) = self.incident.get_mut(node.0.index() as usize) {
            bucket.retain(|&e| e != edge);
        }
    }

    fn endpoint(&self, edge: EdgeId, position: usize) -> Result<NodeId, GraphError> {
        if !self.contains_edge(edge) {
            return Err(GraphError::MissingEdge(edge));
        }
        let Some(column) = self.edges.column(position) else {
            debug_assert!(false, "endpoint column missing");
            return Err(GraphError::MissingEdge(edge));
        };
        let Some(raw) = column.get_int(edge.0.index() as usize) else {
            debug_assert!(false, "endpoint cell unreadable");
            return Err(GraphError::MissingEdge(edge));
        };
        let Ok(slot) = u32::try_from(raw) else {
            debug_assert!(false, "corrupt endpoint index");
            return Err(GraphError::MissingEdge(edge));
        };
        Ok(NodeId(Row(slot)))
    }

    /// Source node of an edge.
    pub fn source(&self, edge: EdgeId) -> Result<NodeId, GraphError> {
        self.endpoint(edge, SRC_POS)
    }

    /// Target node of an edge.
    pub fn target(&self, edge: EdgeId) -> Result<NodeId, GraphError> {
        self.endpoint(edge, DST_POS)
    }

    /// The endpoint of `edge` opposite to `node`.
    pub fn adjacent(&self, edge: EdgeId, node: NodeId) -> Result<NodeId, GraphError> {
        let source = self.source(edge)?;
        let target = self.target(edge)?;
        if node == source {
            Ok(target)
        } else if node == target {
            Ok(source)
        } else {
            Err(GraphError::NotIncident { node, edge })
        }
    }

    /// Edges incident to `node`. Self-loops are listed once.
    pub fn incident_edges(&self, node: NodeId) -> Result<&[EdgeId], GraphError> {
        if !self.contains_node(node) {
            return Err(GraphError::MissingNode(node));
        }
        Ok(self
            .incident
            .get(node.0.index() as usize)
            .map_or(&[][..], Vec::as_slice))
    }

    /// Incident edge count. Self-loops count once.
    pub fn degree(&self, node: NodeId) -> Result<usize, GraphError> {
        Ok(self.incident_edges(node)?.len())
    }

    /// Graph-aware read view of a node.
    pub fn node_ref(&self, node: NodeId) -> Result<NodeRef<'_>, GraphError> {
        if !self.contains_node(node) {
            return Err(GraphError::MissingNode(node));
        }
        Ok(NodeRef { graph: self, id: node })
    }

    /// Writable payload view of a node.
    pub fn node_mut(&mut self, node: NodeId) -> Result<TupleMut<'_>, GraphError> {
        if !self.contains_node(node) {
            return Err(GraphError::MissingNode(node));
        }
        Ok(self.nodes.tuple_mut(node.0)?)
    }
}

/// Read view of one node that also knows its graph.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> NodeRef<'g> {
    /// Node handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Owning graph.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Neighboring nodes, one per incident edge.
    pub fn neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph
            .incident_edges(self.id)
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&edge| self.graph.adjacent(edge, self.id).ok())
    }

    /// Incident edge count.
    pub fn degree(&self) -> usize {
        self.graph.degree(self.id).unwrap_or(0)
    }
}

impl TupleRead for NodeRef<'_> {
    fn table(&self) -> &Table {
        self.graph.nodes()
    }

    fn row(&self) -> Row {
        self.id.row()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::tuple::TupleWrite;

    fn path3() -> (Graph, [NodeId; 3], [EdgeId; 2]) {
        let mut g = Graph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();
        let ab = g.add_edge(a, b).expect("edge");
        let bc = g.add_edge(b, c).expect("edge");
        (g, [a, b, c], [ab, bc])
    }

    #[test]
    fn endpoints_and_adjacency() {
        let (g, [a, b, c], [ab, bc]) = path3();
        assert_eq!(g.source(ab).expect("source"), a);
        assert_eq!(g.target(ab).expect("target"), b);
        assert_eq!(g.adjacent(ab, a).expect("adjacent"), b);
        assert_eq!(g.adjacent(bc, c).expect("adjacent"), b);
        assert!(matches!(
            g.adjacent(ab, c),
            Err(GraphError::NotIncident { .. })
        ));
    }

    #[test]
    fn node_removal_cascades_to_incident_edges() {
        let (mut g, [a, b, c], [ab, bc]) = path3();
        g.remove_node(b).expect("remove");
        assert!(!g.contains_node(b));
        assert!(!g.contains_edge(ab));
        assert!(!g.contains_edge(bc));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.degree(a).expect("degree"), 0);
        assert_eq!(g.degree(c).expect("degree"), 0);
    }

    #[test]
    fn edge_removal_updates_incidence() {
        let (mut g, [a, b, _], [ab, _]) = path3();
        g.remove_edge(ab).expect("remove");
        assert!(!g.contains_edge(ab));
        assert_eq!(g.degree(a).expect("degree"), 0);
        assert_eq!(g.degree(b).expect("degree"), 1);
    }

    #[test]
    fn endpoint_columns_reject_public_writes() {
        let (mut g, _, [ab, _]) = path3();
        let err = g
            .edges_mut()
            .set_int(ab.row(), EDGE_SOURCE, 99)
            .unwrap_err();
        assert!(matches!(err, DataError::ReadOnly { column, .. } if column == EDGE_SOURCE));
    }

    #[test]
    fn missing_endpoint_rejected() {
        let (mut g, [a, _, _], _) = path3();
        let ghost = {
            let mut other = Graph::new();
            other.add_node();
            other.add_node();
            other.add_node();
            other.add_node()
        };
        let err = g.add_edge(a, ghost).unwrap_err();
        assert!(matches!(err, GraphError::MissingNode(n) if n == ghost));
    }

    #[test]
    fn self_loop_listed_once() {
        let mut g = Graph::new();
        let a = g.add_node();
        let aa = g.add_edge(a, a).expect("edge");
        assert_eq!(g.incident_edges(a).expect("edges"), &[aa]);
        assert_eq!(g.adjacent(aa, a).expect("adjacent"), a);
        g.remove_node(a).expect("remove");
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn recycled_node_slot_starts_isolated() {
        let (mut g, [_, b, _], _) = path3();
        g.remove_node(b).expect("remove");
        let d = g.add_node();
        assert_eq!(d.row(), b.row(), "slot should be recycled");
        assert_eq!(g.degree(d).expect("degree"), 0);
    }

    #[test]
    fn node_ref_walks_neighbors() {
        let (g, [a, b, c], _) = path3();
        let view = g.node_ref(b).expect("node ref");
        let mut near: Vec<NodeId> = view.neighbors().collect();
        near.sort_unstable();
        assert_eq!(near, vec![a, c]);
        assert_eq!(view.degree(), 2);
    }

    #[test]
    fn payload_columns_ride_along() {
        let (mut g, [a, _, _], _) = path3();
        g.nodes_mut()
            .add_column(Column::new("label", ColumnKind::Text))
            .expect("column");
        let mut slot = g.node_mut(a).expect("node mut");
        slot.set_str("label", "root").expect("set");
        let view = g.node_ref(a).expect("node ref");
        assert_eq!(view.get_str("label").expect("get"), "root");
    }
}
