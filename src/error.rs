//! Error types for litekv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using LiteError
pub type Result<T> = std::result::Result<T, LiteError>;

/// Unified error type for litekv operations
#[derive(Debug, Error)]
pub enum LiteError {
    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    /// A length prefix is truncated or claims more bytes than remain
    #[error("Malformed record at offset {offset}: {reason}")]
    MalformedRecord { offset: usize, reason: String },

    /// A key or value is longer than a u32 length prefix can describe
    #[error("Record {field} too large: {len} bytes does not fit a u32 length prefix")]
    RecordTooLarge { field: &'static str, len: usize },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    /// An index entry no longer decodes to the record it was created for
    #[error("Corrupt index: entry at offset {offset} does not decode to its key")]
    CorruptIndex { offset: usize },

    // -------------------------------------------------------------------------
    // Channel Errors
    // -------------------------------------------------------------------------
    #[error("Capacity exceeded: {len} bytes does not fit in a {capacity} byte region")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("Channel lock failed: {0}")]
    Lock(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LiteError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        LiteError::MalformedRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// True for `KeyNotFound`, the one error callers usually treat as absence
    pub fn is_not_found(&self) -> bool {
        matches!(self, LiteError::KeyNotFound)
    }
}
