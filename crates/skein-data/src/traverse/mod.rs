// SPDX-License-Identifier: Apache-2.0
//! Graph traversal: the visit queue and depth-bounded breadth-first search.

mod bfs;
mod queue;

pub use bfs::{BreadthFirstIterator, TraversalKind};
pub use queue::VisitQueue;
