// SPDX-License-Identifier: Apache-2.0
//! Character trie over an arena of nodes.
//!
//! Children are kept in sorted order so walks are deterministic. Removal
//! prunes eagerly: a node left with no terminal keys and no children is
//! unlinked from its parent and returned to the free list, so stale words
//! become unreachable immediately.

use std::collections::BTreeMap;

const ROOT: u32 = 0;

#[derive(Debug, Clone)]
struct TrieNode<K> {
    children: BTreeMap<char, u32>,
    keys: Vec<K>,
}

impl<K> Default for TrieNode<K> {
    fn default() -> Self {
        Self {
            children: BTreeMap::new(),
            keys: Vec::new(),
        }
    }
}

/// Prefix tree mapping words to the keys indexed under them.
///
/// Case sensitivity is fixed at construction; an insensitive trie lowercases
/// words on every operation.
#[derive(Debug, Clone)]
pub struct Trie<K> {
    nodes: Vec<TrieNode<K>>,
    free: Vec<u32>,
    case_sensitive: bool,
}

impl<K: Copy + Eq> Trie<K> {
    /// Empty trie.
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            free: Vec::new(),
            case_sensitive,
        }
    }

    /// Whether lookups distinguish case.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// True when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        let root = &self.nodes[ROOT as usize];
        root.children.is_empty() && root.keys.is_empty()
    }

    fn normalized(&self, word: &str) -> String {
        if self.case_sensitive {
            word.to_owned()
        } else {
            word.to_lowercase()
        }
    }

    fn alloc(&mut self) -> u32 {
        if let Some(idx) = self.free.pop() {
            idx
        } else {
            let idx = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
            self.nodes.push(TrieNode::default());
            idx
        }
    }

    /// Index `key` under `word`. Duplicate (word, key) pairs are kept once.
    pub fn insert(&mut self, word: &str, key: K) {
        let word = self.normalized(word);
        let mut current = ROOT;
        for c in word.chars() {
            current = if let Some(&child) = self.nodes[current as usize].children.get(&c) {
                child
            } else {
                let child = self.alloc();
                self.nodes[current as usize].children.insert(c, child);
                child
            };
        }
        let keys = &mut self.nodes[current as usize].keys;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Remove `key` from `word`'s terminal node, pruning emptied branches.
    /// Returns whether the pair was present.
    pub fn remove(&mut self, word: &str, key: K) -> bool {
        let word = self.normalized(word);
        let mut path: Vec<u32> = vec![ROOT];
        let chars: Vec<char> = word.chars().collect();
        for &c in &chars {
            let Some(&child) = self.nodes[*path.last().unwrap_or(&ROOT) as usize]
                .children
                .get(&c)
            else {
                return false;
            };
            path.push(child);
        }
        let terminal = *path.last().unwrap_or(&ROOT);
        let keys = &mut self.nodes[terminal as usize].keys;
        let before = keys.len();
        keys.retain(|&k| k != key);
        let removed = keys.len() != before;
        // Prune from the leaf upward while nodes are empty.
        for i in (1..path.len()).rev() {
            let node = path[i];
            let empty = {
                let n = &self.nodes[node as usize];
                n.keys.is_empty() && n.children.is_empty()
            };
            if !empty {
                break;
            }
            let parent = path[i - 1];
            self.nodes[parent as usize].children.remove(&chars[i - 1]);
            self.nodes[node as usize] = TrieNode::default();
            self.free.push(node);
        }
        removed
    }

    fn find(&self, prefix: &str) -> Option<u32> {
        let prefix = self.normalized(prefix);
        let mut current = ROOT;
        for c in prefix.chars() {
            current = *self.nodes[current as usize].children.get(&c)?;
        }
        Some(current)
    }

    /// Every key indexed at or below `prefix`, in deterministic walk order.
    pub fn prefix_keys(&self, prefix: &str) -> Vec<K> {
        let Some(start) = self.find(prefix) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            let n = &self.nodes[node as usize];
            out.extend(n.keys.iter().copied());
            // Reverse so the smallest child is walked first.
            stack.extend(n.children.values().rev().copied());
        }
        out
    }

    #[cfg(test)]
    fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}
