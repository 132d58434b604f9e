// SPDX-License-Identifier: Apache-2.0
//! RGBA colors with 8-bit components.
//!
//! Palettes are plain slices of [`Rgba`] passed explicitly to the actions
//! that use them; there is no process-wide palette registry.

/// RGBA color with 8-bit components.
pub type Rgba = [u8; 4];

/// Opaque color from red, green, and blue components.
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    [r, g, b, 255]
}

/// Color from red, green, blue, and alpha components.
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    [r, g, b, a]
}

/// Fully transparent black.
pub const TRANSPARENT: Rgba = rgba(0, 0, 0, 0);
/// Opaque black.
pub const BLACK: Rgba = rgb(0, 0, 0);
/// Opaque white.
pub const WHITE: Rgba = rgb(255, 255, 255);
/// Mid gray.
pub const GRAY: Rgba = rgb(128, 128, 128);
/// Light gray.
pub const LIGHT_GRAY: Rgba = rgb(192, 192, 192);
/// Pure red.
pub const RED: Rgba = rgb(255, 0, 0);
/// Pure green.
pub const GREEN: Rgba = rgb(0, 255, 0);
/// Pure blue.
pub const BLUE: Rgba = rgb(0, 0, 255);
