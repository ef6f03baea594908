//! Prefix tree over path segments.
//!
//! # Responsibilities
//! - Store compiled prefixes
//! - Look up the longest prefix governing a request path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Lookup cost is O(path depth), independent of route count
//! - Children kept in a `BTreeMap` so iteration order is stable

use std::collections::BTreeMap;

use crate::routing::matcher::{path_segments, PathPrefix};

#[derive(Debug, Clone)]
struct Node<T> {
    value: Option<T>,
    children: BTreeMap<String, Node<T>>,
}

impl<T> Node<T> {
    fn empty() -> Self {
        Self {
            value: None,
            children: BTreeMap::new(),
        }
    }
}

/// Maps segment prefixes to values with longest-match lookup.
#[derive(Debug, Clone)]
pub struct PrefixTree<T> {
    root: Node<T>,
}

impl<T> PrefixTree<T> {
    pub fn new() -> Self {
        Self {
            root: Node::empty(),
        }
    }

    /// Insert a value for `prefix`, returning the previous value if any.
    pub fn insert(&mut self, prefix: &PathPrefix, value: T) -> Option<T> {
        let mut node = &mut self.root;
        for segment in prefix.segments() {
            node = node
                .children
                .entry(segment.clone())
                .or_insert_with(Node::empty);
        }

        node.value.replace(value)
    }

    /// Find the value of the deepest prefix that governs `path`.
    pub fn longest_match(&self, path: &str) -> Option<&T> {
        let mut node = &self.root;
        let mut best = node.value.as_ref();

        for segment in path_segments(path) {
            match node.children.get(segment) {
                Some(child) => {
                    node = child;
                    if let Some(value) = node.value.as_ref() {
                        best = Some(value);
                    }
                }
                None => break,
            }
        }

        best
    }

}

impl<T> Default for PrefixTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
