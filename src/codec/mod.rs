//! Record Codec Module
//!
//! Deterministic, reversible mapping between a key-value pair and a byte run.
//!
//! ## Record Format
//! ```text
//! ┌──────────────┬──────────┬────────────────┬────────────┐
//! │ KeyLen (4)   │   Key    │  ValueLen (4)  │   Value    │
//! │ u32 LE       │          │  u32 LE        │            │
//! └──────────────┴──────────┴────────────────┴────────────┘
//! ```
//!
//! ## Buffer Format
//! Zero or more records concatenated with no separators, padding, or
//! checksum. The end of meaningful data is carried out of band.

mod record;
mod scanner;

pub use record::{
    decode_record, encode_record, encoded_len, Record, LEN_PREFIX_SIZE, RECORD_OVERHEAD,
};
pub use scanner::RecordScanner;
