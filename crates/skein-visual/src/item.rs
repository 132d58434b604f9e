// SPDX-License-Identifier: Apache-2.0
//! Visual item state: handles, flags, shape codes, and the change journal
//! vocabulary.
//!
//! A visual item is a lightweight handle into a [`VisualTable`] arena; the
//! row payload itself stays inside the table. Field mutations are described
//! by [`FieldChange`] entries naming the field and carrying the old and new
//! values.
//!
//! [`VisualTable`]: crate::table::VisualTable

use bitflags::bitflags;
use skein_data::Row;

use crate::color::{Rgba, BLACK, WHITE};
use crate::rect::Rect;

/// Handle to one row of a visual table.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    /// Arena index of the item.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether a visual table holds node-like or edge-like items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Node items.
    Node,
    /// Edge items.
    Edge,
}

bitflags! {
    /// Boolean display state of a visual item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u16 {
        /// Cached bounds are current.
        const VALIDATED = 1 << 0;
        /// Item is drawn.
        const VISIBLE = 1 << 1;
        /// Visibility at the start of the current animation.
        const START_VISIBLE = 1 << 2;
        /// Visibility at the end of the current animation.
        const END_VISIBLE = 1 << 3;
        /// Item responds to interaction.
        const INTERACTIVE = 1 << 4;
        /// Aggregate item is expanded.
        const EXPANDED = 1 << 5;
        /// Layout must not move the item.
        const FIXED = 1 << 6;
        /// Item is highlighted.
        const HIGHLIGHTED = 1 << 7;
        /// Pointer is over the item.
        const HOVERED = 1 << 8;
    }
}

impl ItemFlags {
    /// Flags of a freshly attached item: visible, end-visible, interactive,
    /// and expanded; not yet validated.
    pub fn initial() -> Self {
        Self::VISIBLE | Self::END_VISIBLE | Self::INTERACTIVE | Self::EXPANDED
    }
}

/// "No shape" sentinel, used by shape rules to mean "no opinion".
pub const SHAPE_NONE: i32 = i32::MIN;
/// Ellipse shape code.
pub const SHAPE_ELLIPSE: i32 = 0;
/// Rectangle shape code.
pub const SHAPE_RECTANGLE: i32 = 1;
/// Upward triangle shape code.
pub const SHAPE_TRIANGLE_UP: i32 = 2;
/// Downward triangle shape code.
pub const SHAPE_TRIANGLE_DOWN: i32 = 3;
/// Leftward triangle shape code.
pub const SHAPE_TRIANGLE_LEFT: i32 = 4;
/// Rightward triangle shape code.
pub const SHAPE_TRIANGLE_RIGHT: i32 = 5;
/// Diamond shape code.
pub const SHAPE_DIAMOND: i32 = 6;
/// Cross shape code.
pub const SHAPE_CROSS: i32 = 7;
/// Star shape code.
pub const SHAPE_STAR: i32 = 8;
/// Hexagon shape code.
pub const SHAPE_HEXAGON: i32 = 9;
/// Number of built-in shape codes.
pub const SHAPE_COUNT: usize = 10;

/// The built-in shape codes in palette order. Data-driven shape assignment
/// indexes into this when no explicit palette is given.
pub const DEFAULT_SHAPE_PALETTE: [i32; SHAPE_COUNT] = [
    SHAPE_ELLIPSE,
    SHAPE_RECTANGLE,
    SHAPE_TRIANGLE_UP,
    SHAPE_TRIANGLE_DOWN,
    SHAPE_TRIANGLE_LEFT,
    SHAPE_TRIANGLE_RIGHT,
    SHAPE_DIAMOND,
    SHAPE_CROSS,
    SHAPE_STAR,
    SHAPE_HEXAGON,
];

/// Font request: family name plus point size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Font family name.
    pub family: String,
    /// Point size.
    pub size: f64,
}

impl FontSpec {
    /// Font request from family and size.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("sans-serif", 10.0)
    }
}

/// Names one field of a visual item in journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualField {
    /// Current x.
    X,
    /// Current y.
    Y,
    /// Animation start x.
    StartX,
    /// Animation start y.
    StartY,
    /// Animation end x.
    EndX,
    /// Animation end y.
    EndY,
    /// Current size factor.
    Size,
    /// Animation start size.
    StartSize,
    /// Animation end size.
    EndSize,
    /// Current fill color.
    FillColor,
    /// Animation start fill color.
    StartFillColor,
    /// Animation end fill color.
    EndFillColor,
    /// Current stroke color.
    StrokeColor,
    /// Animation start stroke color.
    StartStrokeColor,
    /// Animation end stroke color.
    EndStrokeColor,
    /// Current text color.
    TextColor,
    /// Animation start text color.
    StartTextColor,
    /// Animation end text color.
    EndTextColor,
    /// Current font.
    Font,
    /// Animation start font.
    StartFont,
    /// Animation end font.
    EndFont,
    /// Shape code.
    Shape,
    /// Degree-of-interest scalar.
    Doi,
    /// Boolean flag set.
    Flags,
    /// Cached bounds.
    Bounds,
}

impl VisualField {
    /// Whether a change to this field moves or resizes the item, requiring
    /// bounds revalidation.
    pub fn affects_geometry(self) -> bool {
        matches!(
            self,
            Self::X | Self::Y | Self::Size | Self::Shape | Self::Font
        )
    }
}

/// Old or new value carried by a journal entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Scalar fields (position, size, DOI).
    F64(f64),
    /// Color fields.
    Color(Rgba),
    /// Shape code.
    Shape(i32),
    /// Font fields.
    Font(FontSpec),
    /// Flag set.
    Flags(ItemFlags),
    /// Bounds rectangle.
    Bounds(Rect),
}

/// One journaled mutation of a visual item field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// The item that changed.
    pub item: ItemId,
    /// Which field changed.
    pub field: VisualField,
    /// Value before the write.
    pub old: FieldValue,
    /// Value after the write.
    pub new: FieldValue,
}

/// Payload of one visual table row.
#[derive(Debug, Clone)]
pub(crate) struct VisualRow {
    pub(crate) data_row: Row,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) start_x: f64,
    pub(crate) start_y: f64,
    pub(crate) end_x: f64,
    pub(crate) end_y: f64,
    pub(crate) size: f64,
    pub(crate) start_size: f64,
    pub(crate) end_size: f64,
    pub(crate) fill: Rgba,
    pub(crate) start_fill: Rgba,
    pub(crate) end_fill: Rgba,
    pub(crate) stroke: Rgba,
    pub(crate) start_stroke: Rgba,
    pub(crate) end_stroke: Rgba,
    pub(crate) text: Rgba,
    pub(crate) start_text: Rgba,
    pub(crate) end_text: Rgba,
    pub(crate) font: FontSpec,
    pub(crate) start_font: FontSpec,
    pub(crate) end_font: FontSpec,
    pub(crate) shape: i32,
    pub(crate) doi: f64,
    pub(crate) flags: ItemFlags,
    pub(crate) bounds: Rect,
}

impl VisualRow {
    /// Fresh row bound to `data_row`, with display defaults.
    pub(crate) fn new(data_row: Row) -> Self {
        Self {
            data_row,
            x: 0.0,
            y: 0.0,
            start_x: 0.0,
            start_y: 0.0,
            end_x: 0.0,
            end_y: 0.0,
            size: 1.0,
            start_size: 1.0,
            end_size: 1.0,
            fill: WHITE,
            start_fill: WHITE,
            end_fill: WHITE,
            stroke: BLACK,
            start_stroke: BLACK,
            end_stroke: BLACK,
            text: BLACK,
            start_text: BLACK,
            end_text: BLACK,
            font: FontSpec::default(),
            start_font: FontSpec::default(),
            end_font: FontSpec::default(),
            shape: SHAPE_RECTANGLE,
            // Minimal interest until a DOI computation assigns one.
            doi: f64::NEG_INFINITY,
            flags: ItemFlags::initial(),
            bounds: Rect::EMPTY,
        }
    }
}
