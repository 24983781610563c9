//! Index Rebuild
//!
//! Reconstructs an index purely from buffer bytes, with no access to the
//! writer's own index.
//!
//! The buffer is append-only and scanned in write order, so letting each
//! record overwrite the entry for its key leaves every key pointing at its
//! latest write.

use crate::codec::RecordScanner;
use crate::error::Result;

use super::Index;

/// Result of a rebuild scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Number of records decoded
    pub records_scanned: u64,

    /// Number of distinct keys in the rebuilt index
    pub distinct_keys: usize,

    /// Records whose key was written again later in the buffer
    pub records_superseded: u64,

    /// Bytes consumed by the scan (equals the buffer length on success)
    pub bytes_scanned: usize,
}

/// Scan `buf` from offset 0 to its end and build a fresh index
///
/// The whole buffer must consist of complete records. Trailing bytes that do
/// not form a record (a truncated copy, or unused region capacity the caller
/// failed to cut off) fail with `MalformedRecord`.
pub fn rebuild(buf: &[u8]) -> Result<(Index, RebuildReport)> {
    let mut index = Index::new();
    let mut report = RebuildReport::default();

    let mut scanner = RecordScanner::new(buf);
    for item in scanner.by_ref() {
        let (offset, record) = item?;

        if index.insert(record.key, offset).is_some() {
            report.records_superseded += 1;
        }
        report.records_scanned += 1;
    }

    report.distinct_keys = index.len();
    report.bytes_scanned = scanner.offset();

    Ok((index, report))
}
