// SPDX-License-Identifier: Apache-2.0
//! Incremental prefix search with membership deltas.
//!
//! A search set indexes keyed text into a trie and maintains the result set
//! of the most recent query. Each executed query reports what entered and
//! left the result set; repeating the current query verbatim is a silent
//! no-op.

use std::collections::BTreeSet;
use std::fmt;

use crate::column::DataError;
use crate::table::{Row, Table};

use super::trie::Trie;

/// Default token delimiters (ASCII whitespace).
pub const DEFAULT_DELIMITERS: &str = " \t\n\r";

/// Membership change produced by one search or clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDelta<K> {
    /// Keys that entered the result set, in ascending order.
    pub added: Vec<K>,
    /// Keys that left the result set, in ascending order.
    pub removed: Vec<K>,
}

impl<K> Default for SearchDelta<K> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<K> SearchDelta<K> {
    /// True when membership did not change.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Observes result-set changes of a [`PrefixSearchSet`].
pub trait SearchListener<K> {
    /// Called once per executed search or clear with the membership delta.
    fn search_changed(&mut self, query: &str, delta: &SearchDelta<K>);
}

/// Trie-backed prefix search over keyed text.
///
/// Multi-term queries union the completions of every token. The result set
/// iterates in ascending key order.
pub struct PrefixSearchSet<K> {
    trie: Trie<K>,
    results: BTreeSet<K>,
    query: String,
    delimiters: String,
    listeners: Vec<Box<dyn SearchListener<K>>>,
}

impl<K: fmt::Debug> fmt::Debug for PrefixSearchSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixSearchSet")
            .field("query", &self.query)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Ord> Default for PrefixSearchSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Ord> PrefixSearchSet<K> {
    /// Case-insensitive search set with whitespace delimiters.
    pub fn new() -> Self {
        Self::with_case_sensitivity(false)
    }

    /// Search set with explicit case sensitivity.
    pub fn with_case_sensitivity(case_sensitive: bool) -> Self {
        Self {
            trie: Trie::new(case_sensitive),
            results: BTreeSet::new(),
            query: String::new(),
            delimiters: DEFAULT_DELIMITERS.to_owned(),
            listeners: Vec::new(),
        }
    }

    /// The most recently executed query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Characters that split text and queries into tokens.
    pub fn delimiters(&self) -> &str {
        &self.delimiters
    }

    /// Replace the delimiter set. Affects future index and search calls only.
    pub fn set_delimiters(&mut self, delimiters: impl Into<String>) {
        self.delimiters = delimiters.into();
    }

    /// Current result keys in ascending order.
    pub fn members(&self) -> impl Iterator<Item = K> + '_ {
        self.results.iter().copied()
    }

    /// Whether `key` is in the current result set.
    pub fn contains(&self, key: K) -> bool {
        self.results.contains(&key)
    }

    /// Result count.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Register a result-set listener.
    pub fn add_listener(&mut self, listener: Box<dyn SearchListener<K>>) {
        self.listeners.push(listener);
    }

    fn tokens<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(|c: char| self.delimiters.contains(c))
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Index `key` under every token of `text`.
    pub fn index(&mut self, key: K, text: &str) {
        let tokens = self.tokens(text);
        for token in tokens {
            self.trie.insert(token, key);
        }
    }

    /// Remove `key` from every token of `text`.
    ///
    /// Reverses a matching [`index`](Self::index) call; the current result
    /// set is not touched until the next search.
    pub fn unindex(&mut self, key: K, text: &str) {
        let tokens = self.tokens(text);
        for token in tokens {
            self.trie.remove(token, key);
        }
    }

    /// Execute `query`: union the completions of every token.
    ///
    /// Returns the membership delta and notifies listeners, except when the
    /// query is identical to the current one, which is a silent no-op.
    pub fn search(&mut self, query: &str) -> SearchDelta<K> {
        if query == self.query {
            return SearchDelta::default();
        }
        let old = std::mem::take(&mut self.results);
        self.query.clear();
        self.query.push_str(query);
        let tokens = self.tokens(query);
        if tokens.is_empty() {
            self.query.clear();
        }
        for token in tokens {
            for key in self.trie.prefix_keys(token) {
                self.results.insert(key);
            }
        }
        let delta = SearchDelta {
            added: self.results.difference(&old).copied().collect(),
            removed: old.difference(&self.results).copied().collect(),
        };
        self.notify(&delta);
        delta
    }

    /// Drop the index and the result set.
    ///
    /// The trie is rebuilt empty; callers re-index their source rows. The
    /// query string is left in place, so re-running it after a clear is a
    /// no-op until a different query intervenes.
    pub fn clear(&mut self) -> SearchDelta<K> {
        self.trie = Trie::new(self.trie.is_case_sensitive());
        let old = std::mem::take(&mut self.results);
        let delta = SearchDelta {
            added: Vec::new(),
            removed: old.into_iter().collect(),
        };
        self.notify(&delta);
        delta
    }

    fn notify(&mut self, delta: &SearchDelta<K>) {
        for listener in &mut self.listeners {
            listener.search_changed(&self.query, delta);
        }
    }
}

impl PrefixSearchSet<Row> {
    /// Index a table row under the tokens of one of its text fields.
    pub fn index_row(&mut self, table: &Table, row: Row, field: &str) -> Result<(), DataError> {
        let text = table.get_str(row, field)?;
        self.index(row, text);
        Ok(())
    }

    /// Remove a table row's tokens from the index.
    pub fn unindex_row(&mut self, table: &Table, row: Row, field: &str) -> Result<(), DataError> {
        let text = table.get_str(row, field)?;
        self.unindex(row, text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn tokens_split_on_all_delimiters() {
        let s: PrefixSearchSet<u32> = PrefixSearchSet::new();
        assert_eq!(s.tokens(" one\ttwo\nthree  "), vec!["one", "two", "three"]);
        assert!(s.tokens(" \t").is_empty());
    }

    #[test]
    fn custom_delimiters_apply() {
        let mut s: PrefixSearchSet<u32> = PrefixSearchSet::new();
        s.set_delimiters(",");
        s.index(1, "red,green blue");
        let delta = s.search("green bl");
        assert_eq!(delta.added, vec![1]);
    }

    #[test]
    fn empty_query_resets_to_blank() {
        let mut s: PrefixSearchSet<u32> = PrefixSearchSet::new();
        s.index(1, "alpha");
        let delta = s.search("alpha");
        assert_eq!(delta.added, vec![1]);
        let delta = s.search("  \t ");
        assert_eq!(delta.removed, vec![1]);
        assert_eq!(s.query(), "");
        assert!(s.is_empty());
    }

    #[test]
    fn clear_drops_index_and_results_but_keeps_query() {
        let mut s: PrefixSearchSet<u32> = PrefixSearchSet::new();
        s.index(1, "alpha");
        let _ = s.search("al");
        let delta = s.clear();
        assert_eq!(delta.removed, vec![1]);
        assert!(s.is_empty());
        assert_eq!(s.query(), "al");
        // The query survived the clear, so repeating it changes nothing.
        let delta = s.search("al");
        assert!(delta.is_empty());
    }

    #[test]
    fn rows_index_through_their_text_field() {
        use crate::column::Column;
        use crate::value::ColumnKind;
        let mut table = Table::new();
        table
            .add_column(Column::new("name", ColumnKind::Text))
            .expect("column");
        let r = table.add_row();
        table.set_str(r, "name", "maple tree").expect("set");
        let mut s: PrefixSearchSet<Row> = PrefixSearchSet::new();
        s.index_row(&table, r, "name").expect("index");
        let delta = s.search("tre");
        assert_eq!(delta.added, vec![r]);
        s.unindex_row(&table, r, "name").expect("unindex");
        let delta = s.search("maple");
        assert!(delta.added.is_empty());
        assert_eq!(delta.removed, vec![r]);
    }
}
