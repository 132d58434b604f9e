// SPDX-License-Identifier: Apache-2.0
//! Depth-bounded breadth-first traversal.
//!
//! The iterator walks outward from one or more seed nodes up to a maximum
//! depth, yielding nodes, edges, or both. Each element is yielded at most
//! once; [`BreadthFirstIterator::depth`] reports the depth an element was
//! first scheduled at.
//!
//! Invariants:
//! - Node depths never exceed the bound; nodes at the bound do not expand
//!   further nodes.
//! - In combined mode, edges between two already-scheduled nodes on the
//!   frontier are still yielded, recorded at `min` of the endpoint depths.

use crate::graph::{EdgeId, Graph, GraphElement, NodeId};

use super::queue::VisitQueue;

/// What a breadth-first pass yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalKind {
    /// Yield nodes only.
    Nodes,
    /// Yield edges only.
    Edges,
    /// Yield nodes and the edges that connect them.
    NodesAndEdges,
}

impl TraversalKind {
    fn includes_edges(self) -> bool {
        matches!(self, Self::Edges | Self::NodesAndEdges)
    }
}

/// Lazy breadth-first iterator over a graph.
#[derive(Debug)]
pub struct BreadthFirstIterator<'g> {
    graph: &'g Graph,
    queue: VisitQueue<GraphElement>,
    kind: TraversalKind,
    max_depth: u32,
}

impl<'g> BreadthFirstIterator<'g> {
    /// Traversal from a single seed node.
    pub fn new(graph: &'g Graph, seed: NodeId, max_depth: u32, kind: TraversalKind) -> Self {
        Self::with_seeds(graph, [seed], max_depth, kind)
    }

    /// Traversal from multiple seed nodes.
    pub fn with_seeds(
        graph: &'g Graph,
        seeds: impl IntoIterator<Item = NodeId>,
        max_depth: u32,
        kind: TraversalKind,
    ) -> Self {
        let mut it = Self {
            graph,
            queue: VisitQueue::new(),
            kind,
            max_depth,
        };
        it.init(seeds, max_depth, kind);
        it
    }

    /// Restart the traversal from new seeds. Seeds that are not live nodes
    /// of the graph are skipped.
    pub fn init(
        &mut self,
        seeds: impl IntoIterator<Item = NodeId>,
        max_depth: u32,
        kind: TraversalKind,
    ) {
        self.queue.clear();
        self.kind = kind;
        self.max_depth = max_depth;
        let seeds: Vec<NodeId> = seeds
            .into_iter()
            .filter(|&n| self.graph.contains_node(n))
            .collect();
        match kind {
            TraversalKind::Nodes | TraversalKind::NodesAndEdges => {
                for &seed in &seeds {
                    self.queue.add(GraphElement::Node(seed), 0);
                }
            }
            TraversalKind::Edges => {
                // All seeds take depth 0 before any edge expansion, so the
                // write-once depth records cannot capture a seed at depth 1.
                for &seed in &seeds {
                    self.queue.visit(GraphElement::Node(seed), 0);
                }
                for &seed in &seeds {
                    let Ok(edges) = self.graph.incident_edges(seed) else {
                        continue;
                    };
                    for &edge in edges {
                        let Ok(far) = self.graph.adjacent(edge, seed) else {
                            continue;
                        };
                        self.queue.visit(GraphElement::Node(far), 1);
                        self.queue.add(GraphElement::Edge(edge), 1);
                    }
                }
            }
        }
    }

    /// Depth `elem` was first scheduled at, if it has been reached.
    pub fn depth(&self, elem: GraphElement) -> Option<u32> {
        self.queue.depth(&elem)
    }

    /// Maximum traversal depth.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    fn expand_node(&mut self, node: NodeId) {
        let graph = self.graph;
        let Some(d) = self.queue.depth(&GraphElement::Node(node)) else {
            debug_assert!(false, "popped node carries no depth");
            return;
        };
        let include_edges = self.kind.includes_edges();
        let Ok(edges) = graph.incident_edges(node) else {
            debug_assert!(false, "popped node left the graph");
            return;
        };
        if d < self.max_depth {
            for &edge in edges {
                let Ok(far) = graph.adjacent(edge, node) else {
                    continue;
                };
                if include_edges {
                    self.queue.add(GraphElement::Edge(edge), d + 1);
                }
                self.queue.add(GraphElement::Node(far), d + 1);
            }
        } else if include_edges && d == self.max_depth {
            // Frontier closure: connect nodes already inside the bound.
            // Seeds (depth 0) are excluded; the edge records the smaller
            // endpoint depth.
            for &edge in edges {
                let Ok(far) = graph.adjacent(edge, node) else {
                    continue;
                };
                if let Some(dv) = self.queue.depth(&GraphElement::Node(far)) {
                    if dv > 0 {
                        self.queue.add(GraphElement::Edge(edge), d.min(dv));
                    }
                }
            }
        }
    }

    fn expand_edge(&mut self, edge: EdgeId) {
        let graph = self.graph;
        let (Ok(u), Ok(v)) = (graph.source(edge), graph.target(edge)) else {
            debug_assert!(false, "popped edge left the graph");
            return;
        };
        let (Some(du), Some(dv)) = (
            self.queue.depth(&GraphElement::Node(u)),
            self.queue.depth(&GraphElement::Node(v)),
        ) else {
            debug_assert!(false, "edge endpoints were never visited");
            return;
        };
        // Balanced endpoints (both seed-adjacent) expand nothing.
        if du == dv {
            return;
        }
        let (deeper, d) = if du > dv { (u, du) } else { (v, dv) };
        if d < self.max_depth {
            let Ok(edges) = graph.incident_edges(deeper) else {
                return;
            };
            for &next in edges {
                if self.queue.depth(&GraphElement::Edge(next)).is_some() {
                    continue;
                }
                let Ok(far) = graph.adjacent(next, deeper) else {
                    continue;
                };
                self.queue.visit(GraphElement::Node(far), d + 1);
                self.queue.add(GraphElement::Edge(next), d + 1);
            }
        }
    }
}

impl Iterator for BreadthFirstIterator<'_> {
    type Item = GraphElement;

    fn next(&mut self) -> Option<GraphElement> {
        let elem = self.queue.pop_front()?;
        match elem {
            GraphElement::Node(node) => self.expand_node(node),
            GraphElement::Edge(edge) => {
                if self.kind == TraversalKind::Edges {
                    self.expand_edge(edge);
                }
            }
        }
        Some(elem)
    }
}
