// SPDX-License-Identifier: Apache-2.0
//! First-match predicate chains.
//!
//! A chain pairs predicates with values and resolves lookups in insertion
//! order: the value of the first predicate that accepts the probe wins.
//! Later entries never shadow earlier ones, so specific rules are added
//! before broad fallbacks.

use std::fmt;

/// Boxed pure predicate over a probe value.
pub type TuplePredicate<I> = Box<dyn Fn(&I) -> bool>;

/// Ordered predicate-to-value mapping resolved first-match-wins.
///
/// `P` is the predicate type and `V` the associated value. Chains whose
/// predicates are plain `Fn(&I) -> bool` closures resolve through
/// [`find`](Self::find); heterogeneous or context-carrying predicates go
/// through [`find_with`](Self::find_with).
pub struct PredicateChain<P, V> {
    entries: Vec<(P, V)>,
}

impl<P, V> fmt::Debug for PredicateChain<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateChain")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<P, V> Default for PredicateChain<P, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, V> PredicateChain<P, V> {
    /// Empty chain.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a predicate/value pair after all existing entries.
    pub fn add(&mut self, predicate: P, value: V) {
        self.entries.push((predicate, value));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Value of the first predicate accepted by `test`, scanning in
    /// insertion order.
    pub fn find_with(&self, mut test: impl FnMut(&P) -> bool) -> Option<&V> {
        self.entries.iter().find(|(p, _)| test(p)).map(|(_, v)| v)
    }

    /// Value of the first predicate that accepts `item`.
    pub fn find<I>(&self, item: &I) -> Option<&V>
    where
        P: Fn(&I) -> bool,
    {
        self.find_with(|p| p(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntPredicate = TuplePredicate<i64>;

    fn chain() -> PredicateChain<IntPredicate, &'static str> {
        let mut c: PredicateChain<IntPredicate, &'static str> = PredicateChain::new();
        c.add(Box::new(|n| *n < 0), "negative");
        c.add(Box::new(|n| *n == 0), "zero");
        c.add(Box::new(|_| true), "positive");
        c
    }

    #[test]
    fn first_matching_entry_wins() {
        let c = chain();
        assert_eq!(c.find(&-3), Some(&"negative"));
        assert_eq!(c.find(&0), Some(&"zero"));
        assert_eq!(c.find(&7), Some(&"positive"));
    }

    #[test]
    fn later_entries_never_shadow_earlier_ones() {
        let mut c = chain();
        c.add(Box::new(|n| *n == 0), "shadowed");
        assert_eq!(c.find(&0), Some(&"zero"));
    }

    #[test]
    fn no_match_is_none() {
        let mut c: PredicateChain<IntPredicate, &'static str> = PredicateChain::new();
        c.add(Box::new(|n| *n > 10), "big");
        assert_eq!(c.find(&3), None);
        assert!(c.find_with(|_| false).is_none());
    }

    #[test]
    fn clear_empties_the_chain() {
        let mut c = chain();
        assert_eq!(c.len(), 3);
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.find(&1), None);
    }
}
