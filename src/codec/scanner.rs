//! Record Scanner
//!
//! Sequential iteration over every record in a buffer, in write order.

use crate::error::Result;

use super::record::{decode_record, Record};

/// Iterator over `(offset, record)` pairs from offset 0 to the end of a buffer
///
/// Yields a `MalformedRecord` error at most once; the scan stops after it.
pub struct RecordScanner<'a> {
    buf: &'a [u8],
    /// Start of the next record
    offset: usize,
    /// Set after an error so the iterator is fused
    failed: bool,
}

impl<'a> RecordScanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            failed: false,
        }
    }

    /// Offset the scan has reached (end of the last decoded record)
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for RecordScanner<'a> {
    type Item = Result<(usize, Record<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }

        match decode_record(self.buf, self.offset) {
            Ok((record, next)) => {
                let start = self.offset;
                self.offset = next;
                Some(Ok((start, record)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for RecordScanner<'_> {}
