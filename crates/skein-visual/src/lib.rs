// SPDX-License-Identifier: Apache-2.0
//! skein-visual: visual item tables, scene binding, renderer routing, and
//! assignment actions.
//!
//! The presentation core of skein. A [`VisualTable`] overlays draw state on a
//! data table and journals every effective write; a [`SceneBinding`] drains
//! the journal one way into a scene adapter; a [`RendererFactory`] routes
//! items to renderer values through predicate rules; assignment actions
//! encode data columns into shapes and colors through ordinal palettes.
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

mod action;
mod binding;
pub mod color;
mod item;
mod rect;
mod render;
mod table;

/// Data-to-visual assignment actions.
pub use action::{
    ColorTarget, DataColorAction, DataShapeAction, EncodeError, OrdinalMap, ShapeAction,
};
/// One-way scene synchronization.
pub use binding::{SceneBinding, SceneSink};
/// Packed color type.
pub use color::Rgba;
/// Visual item identity, fields, and flags.
pub use item::{
    FieldChange, FieldValue, FontSpec, ItemFlags, ItemId, ItemKind, VisualField,
    DEFAULT_SHAPE_PALETTE, SHAPE_COUNT, SHAPE_CROSS, SHAPE_DIAMOND, SHAPE_ELLIPSE, SHAPE_HEXAGON,
    SHAPE_NONE, SHAPE_RECTANGLE, SHAPE_STAR, SHAPE_TRIANGLE_DOWN, SHAPE_TRIANGLE_LEFT,
    SHAPE_TRIANGLE_RIGHT, SHAPE_TRIANGLE_UP,
};
/// Axis-aligned rectangles.
pub use rect::Rect;
/// Predicate-routed renderer selection.
pub use render::{ItemContext, ItemPredicate, RendererFactory};
/// Visual state tables.
pub use table::VisualTable;
