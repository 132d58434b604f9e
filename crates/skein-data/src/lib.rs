// SPDX-License-Identifier: Apache-2.0
//! skein-data: tables, graphs, bounded traversal, and prefix search.
//!
//! The relational core of skein. Tables own typed columns and report changes
//! to listeners; graphs layer endpoint bookkeeping over a node table and an
//! edge table; traversal walks graphs breadth-first under a depth bound;
//! search keeps an incremental prefix-query result set over keyed text.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod column;
mod expr;
mod graph;
mod io;
mod search;
mod table;
mod traverse;
mod tuple;
mod value;

/// Typed column storage and the data error taxonomy.
pub use column::{Column, DataError};
/// First-match predicate chains.
pub use expr::{PredicateChain, TuplePredicate};
/// Graphs layered over node and edge tables.
pub use graph::{
    EdgeId, Graph, GraphElement, GraphError, NodeId, NodeRef, EDGE_SOURCE, EDGE_TARGET,
};
/// Schema descriptors and their storage port.
pub use io::{SchemaColumn, SchemaError, SchemaService, SchemaStore, TableSchema};
/// Incremental prefix search.
pub use search::{PrefixSearchSet, SearchDelta, SearchListener, Trie, DEFAULT_DELIMITERS};
/// Row tables with change events.
pub use table::{Row, Table, TableEvent, TableEventKind, TableListener};
/// Depth-bounded breadth-first traversal.
pub use traverse::{BreadthFirstIterator, TraversalKind, VisitQueue};
/// Read and write views over one table row.
pub use tuple::{TupleMut, TupleRead, TupleRef, TupleWrite};
/// Owned field values and column kinds.
pub use value::{ColumnKind, Value};
