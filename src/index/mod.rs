//! Index Module
//!
//! Maps each key to the byte offset of its most recent record in a store's
//! buffer.
//!
//! ## Responsibilities
//! - Track the latest offset per key (older offsets are forgotten)
//! - Ordered iteration over keys
//! - Reconstruction from raw bytes (see [`rebuild`])
//!
//! ## Data Structure Choice
//! BTreeMap: ordered keys make dumps and comparisons deterministic.

mod rebuild;

use std::collections::BTreeMap;

pub use rebuild::{rebuild, RebuildReport};

/// Key → offset of the key's most recent record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: BTreeMap<Vec<u8>, usize>,
}

impl Index {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the latest record for `key`
    pub fn get(&self, key: &[u8]) -> Option<usize> {
        self.entries.get(key).copied()
    }

    /// Point `key` at `offset`, returning the offset it replaced
    pub fn insert(&mut self, key: &[u8], offset: usize) -> Option<usize> {
        // Avoid reallocating the key on overwrite
        match self.entries.get_mut(key) {
            Some(slot) => Some(std::mem::replace(slot, offset)),
            None => self.entries.insert(key.to_vec(), offset),
        }
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], usize)> {
        self.entries.iter().map(|(k, &off)| (k.as_slice(), off))
    }

    /// Keys in order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.keys().map(|k| k.as_slice())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
