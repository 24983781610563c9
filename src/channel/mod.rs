//! Shared Channel Module
//!
//! Moves a store's serialized buffer between independent participants
//! through a fixed-capacity byte region guarded by one exclusive lock.
//!
//! ## Protocol
//! ```text
//!  writer                       region (capacity C)                reader
//!  ──────                       ───────────────────                ──────
//!  Store::write ...
//!  publish ── lock ─ transfer_in(data) ─ unlock ──►
//!                                        ◄── lock ─ transfer_out(len) ─ unlock ── receive
//!                                                                   Store::from_bytes
//!                                                                   rebuild_index
//! ```
//!
//! The lock gives exclusive access to the bytes, nothing more. There is no
//! generation counter: a reader cannot tell which publish it observed, and a
//! later publish sends no signal to readers that already copied out.
//!
//! The meaningful length travels out of band (`publish` returns it, `receive`
//! takes it); the region carries no end marker.

mod memory;
mod mmap;

pub use memory::MemoryChannel;
pub use mmap::MmapChannel;

use crate::error::{LiteError, Result};
use crate::store::Store;

/// A fixed-capacity byte region behind an exclusive lock
///
/// The region is only reachable through the [`LockedRegion`] handed to the
/// closure, so nothing can touch it outside the lock.
pub trait SharedChannel {
    /// Fixed size of the region (bytes)
    fn capacity(&self) -> usize;

    /// Run `f` with exclusive access to the region
    ///
    /// Blocks until the lock is held. If acquiring it fails, `f` is never
    /// called. The lock is released on every exit path of `f`, including
    /// errors and panics.
    fn with_exclusive_lock<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut LockedRegion<'_>) -> Result<T>;
}

/// The region's bytes while the lock is held
pub struct LockedRegion<'a> {
    bytes: &'a mut [u8],
}

impl<'a> LockedRegion<'a> {
    /// Wrap the region's bytes. Only call this while holding the region lock.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Copy `data` to the start of the region and zero the remainder
    ///
    /// Fails with `CapacityExceeded` before touching the region if `data`
    /// does not fit.
    pub fn transfer_in(&mut self, data: &[u8]) -> Result<()> {
        let capacity = self.capacity();
        if data.len() > capacity {
            return Err(LiteError::CapacityExceeded {
                len: data.len(),
                capacity,
            });
        }

        let (head, tail) = self.bytes.split_at_mut(data.len());
        head.copy_from_slice(data);
        tail.fill(0);

        tracing::trace!(len = data.len(), capacity, "transferred into region");
        Ok(())
    }

    /// Copy the first `len` bytes out of the region
    pub fn transfer_out(&self, len: usize) -> Result<Vec<u8>> {
        let capacity = self.capacity();
        if len > capacity {
            return Err(LiteError::CapacityExceeded { len, capacity });
        }

        tracing::trace!(len, capacity, "transferred out of region");
        Ok(self.bytes[..len].to_vec())
    }
}

// =============================================================================
// Protocol glue
// =============================================================================

/// Copy a store's buffer into the channel
///
/// Returns the number of meaningful bytes, which the reader needs for
/// [`receive`]. An oversized buffer fails with `CapacityExceeded` without
/// taking the lock.
pub fn publish<C: SharedChannel>(channel: &C, store: &Store) -> Result<usize> {
    let data = store.as_bytes();
    let capacity = channel.capacity();
    if data.len() > capacity {
        return Err(LiteError::CapacityExceeded {
            len: data.len(),
            capacity,
        });
    }

    channel.with_exclusive_lock(|region| region.transfer_in(data))?;
    Ok(data.len())
}

/// Copy `len` bytes out of the channel into a new store, without indexing
///
/// The returned store answers `KeyNotFound` for everything until its index
/// is rebuilt.
pub fn fetch<C: SharedChannel>(channel: &C, len: usize) -> Result<Store> {
    let data = channel.with_exclusive_lock(|region| region.transfer_out(len))?;
    Ok(Store::from_bytes(data))
}

/// Copy `len` bytes out of the channel and rebuild the index over them
pub fn receive<C: SharedChannel>(channel: &C, len: usize) -> Result<Store> {
    let mut store = fetch(channel, len)?;
    store.rebuild_index()?;
    Ok(store)
}
