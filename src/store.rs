//! Store Module
//!
//! The key-value store: an append-only byte arena plus an index by offset.
//!
//! ## Responsibilities
//! - Append encoded records and keep the index in lockstep
//! - Resolve reads through the index
//! - Adopt raw bytes received from another process and rebuild the index
//!
//! ## Ownership
//! Each `Store` owns its buffer exclusively. Building a store from bytes moves
//! them in; no two stores ever share a mutable buffer. Mutation needs
//! `&mut self`, so concurrent writers must be serialized by the caller.

use crate::codec::{decode_record, encode_record, encoded_len, RecordScanner};
use crate::error::{LiteError, Result};
use crate::index::{self, Index, RebuildReport};

/// Append-only key-value store
///
/// Overwriting a key appends a new record and moves the index entry; the
/// superseded record stays in the buffer. Space is never reclaimed.
#[derive(Debug, Clone, Default)]
pub struct Store {
    /// Concatenated encoded records, in write order
    data: Vec<u8>,

    /// Key → offset of latest record
    index: Index,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt raw bytes as the buffer of a new store
    ///
    /// The index starts empty: every `read` fails with `KeyNotFound` until
    /// [`rebuild_index`](Self::rebuild_index) has run.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            index: Index::new(),
        }
    }

    /// Pair a buffer with an existing index
    ///
    /// The index is not checked against the buffer. A stale pairing surfaces
    /// as `CorruptIndex` on `read`.
    pub fn from_parts(data: Vec<u8>, index: Index) -> Self {
        Self { data, index }
    }

    /// Append a record for `key` and point the index at it
    ///
    /// Returns the offset the record starts at. Fails only with
    /// `RecordTooLarge`, in which case nothing is appended.
    pub fn write(&mut self, key: &[u8], value: &[u8]) -> Result<usize> {
        let offset = self.data.len();

        self.data.reserve(encoded_len(key, value));
        encode_record(&mut self.data, key, value)?;
        self.index.insert(key, offset);

        Ok(offset)
    }

    /// Value of the most recent write to `key`
    pub fn read(&self, key: &[u8]) -> Result<&[u8]> {
        let offset = self.index.get(key).ok_or(LiteError::KeyNotFound)?;

        match decode_record(&self.data, offset) {
            Ok((record, _)) if record.key == key => Ok(record.value),
            _ => Err(LiteError::CorruptIndex { offset }),
        }
    }

    /// Replace the index with one scanned from the buffer
    ///
    /// On `MalformedRecord` the current index is kept as it was.
    pub fn rebuild_index(&mut self) -> Result<RebuildReport> {
        let (index, report) = index::rebuild(&self.data)?;
        self.index = index;
        Ok(report)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keys in the index
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    /// Every record in the buffer, superseded ones included, in write order
    pub fn records(&self) -> RecordScanner<'_> {
        RecordScanner::new(&self.data)
    }

    /// CRC32 of the buffer, for comparing both ends of a transfer
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(&self.data)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The serialized buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Buffer length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn into_parts(self) -> (Vec<u8>, Index) {
        (self.data, self.index)
    }
}

impl From<Vec<u8>> for Store {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}
