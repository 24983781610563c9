//! Record encoding and decoding
//!
//! A record is `key_len (4) + key + value_len (4) + value`, lengths
//! little-endian. Decoding borrows from the buffer; nothing is copied.

use bytes::{Buf, BufMut};

use crate::error::{LiteError, Result};

/// Size of one length prefix (bytes)
pub const LEN_PREFIX_SIZE: usize = 4;

/// Fixed bytes per record on top of key and value: two length prefixes
pub const RECORD_OVERHEAD: usize = 2 * LEN_PREFIX_SIZE;

/// A decoded record, borrowed from the buffer it was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl Record<'_> {
    /// Number of bytes this record occupies when encoded
    pub fn encoded_len(&self) -> usize {
        encoded_len(self.key, self.value)
    }
}

/// Number of bytes `encode_record` appends for this pair
pub fn encoded_len(key: &[u8], value: &[u8]) -> usize {
    RECORD_OVERHEAD + key.len() + value.len()
}

/// Append one encoded record to `buf`
///
/// Both lengths are checked before anything is written, so a
/// `RecordTooLarge` error leaves `buf` untouched.
pub fn encode_record<B: BufMut>(buf: &mut B, key: &[u8], value: &[u8]) -> Result<()> {
    let key_len = field_len("key", key)?;
    let value_len = field_len("value", value)?;

    buf.put_u32_le(key_len);
    buf.put_slice(key);
    buf.put_u32_le(value_len);
    buf.put_slice(value);

    Ok(())
}

/// Decode the record starting at `offset`
///
/// Returns the record and the offset of the next record
/// (`offset + 8 + key_len + value_len`).
pub fn decode_record(buf: &[u8], offset: usize) -> Result<(Record<'_>, usize)> {
    if offset > buf.len() {
        return Err(LiteError::malformed(
            offset,
            format!("offset is past the end of a {} byte buffer", buf.len()),
        ));
    }

    let mut pos = offset;
    let key = read_field(buf, &mut pos, offset, "key")?;
    let value = read_field(buf, &mut pos, offset, "value")?;

    Ok((Record { key, value }, pos))
}

fn field_len(field: &'static str, bytes: &[u8]) -> Result<u32> {
    u32::try_from(bytes.len()).map_err(|_| LiteError::RecordTooLarge {
        field,
        len: bytes.len(),
    })
}

/// Read one length-prefixed field at `*pos` and advance past it
fn read_field<'a>(
    buf: &'a [u8],
    pos: &mut usize,
    record_offset: usize,
    field: &str,
) -> Result<&'a [u8]> {
    let mut rest = &buf[*pos..];

    if rest.remaining() < LEN_PREFIX_SIZE {
        return Err(LiteError::malformed(
            record_offset,
            format!(
                "{} length prefix truncated: {} of {} bytes remain",
                field,
                rest.remaining(),
                LEN_PREFIX_SIZE
            ),
        ));
    }

    let len = rest.get_u32_le() as usize;
    if rest.remaining() < len {
        return Err(LiteError::malformed(
            record_offset,
            format!(
                "{} claims {} bytes but only {} remain",
                field,
                len,
                rest.remaining()
            ),
        ));
    }

    let start = *pos + LEN_PREFIX_SIZE;
    *pos = start + len;
    Ok(&buf[start..*pos])
}
