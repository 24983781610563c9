//! In-process channel
//!
//! A heap region behind a mutex. Participants are threads of one process.

use parking_lot::Mutex;

use crate::error::Result;

use super::{LockedRegion, SharedChannel};

/// Shared channel backed by process memory
pub struct MemoryChannel {
    region: Mutex<Vec<u8>>,
    capacity: usize,
}

impl MemoryChannel {
    /// Create a zero-filled region of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            region: Mutex::new(vec![0u8; capacity]),
            capacity,
        }
    }

    /// Copy of the whole region, taken under the lock
    pub fn snapshot(&self) -> Vec<u8> {
        self.region.lock().clone()
    }
}

impl SharedChannel for MemoryChannel {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn with_exclusive_lock<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut LockedRegion<'_>) -> Result<T>,
    {
        // parking_lot guards do not poison; a panic in `f` just unlocks
        let mut bytes = self.region.lock();
        let mut region = LockedRegion::new(&mut bytes[..]);
        f(&mut region)
    }
}
