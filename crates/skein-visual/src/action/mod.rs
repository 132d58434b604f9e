// SPDX-License-Identifier: Apache-2.0

//! Assignment actions: batch writers that encode data into visual fields.
//!
//! An action walks every item of one visual table and assigns one visual
//! field per item. Plain actions route through a predicate chain with a
//! fixed default. Data-driven actions instead derive the assignment from a
//! data column: distinct column values are numbered by an [`OrdinalMap`] and
//! the number picks an entry from a palette. Rules still cascade first, so a
//! predicate can pin individual items regardless of their data.

mod color;
mod ordinal;
mod shape;

pub use color::{ColorTarget, DataColorAction};
pub use ordinal::OrdinalMap;
pub use shape::{DataShapeAction, ShapeAction};

use skein_data::DataError;
use thiserror::Error;

/// Failures while running an assignment action.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A data value had no entry in the ordinal map.
    #[error("value '{0}' is missing from the ordinal map; rerun setup")]
    UnmappedValue(String),
    /// The default of a data-derived action is computed, not assignable.
    #[error("data-derived actions compute their default assignment")]
    DerivedDefault,
    /// A custom palette with no entries cannot encode anything.
    #[error("palette is empty")]
    MissingPalette,
    /// The underlying table rejected a read or write.
    #[error(transparent)]
    Data(#[from] DataError),
}
