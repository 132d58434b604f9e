// SPDX-License-Identifier: Apache-2.0
//! Prefix search: the character trie and the incremental search set.

mod prefix;
mod trie;

pub use prefix::{PrefixSearchSet, SearchDelta, SearchListener, DEFAULT_DELIMITERS};
pub use trie::Trie;
