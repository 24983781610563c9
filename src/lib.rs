//! # litekv
//!
//! A minimal key-value store whose serialized bytes can be handed to another
//! process through a shared memory region, where the index is rebuilt from
//! those bytes alone:
//! - Append-only buffer of length-prefixed records
//! - Key → offset index maintained in lockstep with writes
//! - Index reconstruction by scanning the raw buffer
//! - Fixed-capacity shared region behind a single exclusive lock
//!
//! ## Architecture Overview
//!
//! ```text
//!        Writer process                         Reader process
//! ┌─────────────────────────┐            ┌─────────────────────────┐
//! │ Store                   │            │ Store::from_bytes       │
//! │  ┌───────┐  ┌────────┐  │            │  ┌───────┐  ┌────────┐  │
//! │  │ data  │  │ Index  │  │            │  │ data  │  │ Index  │◄─┼── rebuild
//! │  └───┬───┘  └────────┘  │            │  └───▲───┘  └────────┘  │
//! └──────┼──────────────────┘            └──────┼──────────────────┘
//!        │ publish                              │ receive
//!        │          ┌─────────────────────┐     │
//!        └─────────►│   Shared Channel    ├─────┘
//!                   │ region (capacity C) │
//!                   │ + exclusive lock    │
//!                   └─────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use litekv::channel::{self, MemoryChannel};
//! use litekv::Store;
//!
//! let mut writer = Store::new();
//! writer.write(b"foo", b"bar")?;
//!
//! let shm = MemoryChannel::new(litekv::DEFAULT_CAPACITY);
//! let len = channel::publish(&shm, &writer)?;
//!
//! let reader = channel::receive(&shm, len)?;
//! assert_eq!(reader.read(b"foo")?, b"bar");
//! # Ok::<(), litekv::LiteError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod index;
pub mod store;
pub mod channel;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LiteError, Result};
pub use config::{Config, DEFAULT_CAPACITY};
pub use index::{Index, RebuildReport};
pub use store::Store;
pub use channel::SharedChannel;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of litekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
