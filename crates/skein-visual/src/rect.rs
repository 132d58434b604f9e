// SPDX-License-Identifier: Apache-2.0
//! Axis-aligned rectangles for bounds and damage accumulation.

/// Axis-aligned rectangle: min corner plus size.
///
/// Degenerate sizes mark the empty rectangle, which is the identity of
/// [`union`](Self::union).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum x.
    pub x: f64,
    /// Minimum y.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// The empty rectangle.
    pub const EMPTY: Self = Self {
        x: 0.0,
        y: 0.0,
        width: -1.0,
        height: -1.0,
    };

    /// Rectangle from its min corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `width` by `height` centered on (`cx`, `cy`).
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// True when the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Maximum x.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Maximum y.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether the point (`px`, `py`) lies inside. Empty rectangles contain
    /// nothing.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        !self.is_empty()
            && px >= self.x
            && px <= self.max_x()
            && py >= self.y
            && py <= self.max_y()
    }

    /// Smallest rectangle covering both operands. The empty rectangle is the
    /// identity.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Self {
            x,
            y,
            width: max_x - x,
            height: max_y - y,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}
