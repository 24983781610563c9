//! Memory-mapped channel
//!
//! The region is a file mapped `MAP_SHARED` into every participant; under
//! `/dev/shm` that is POSIX shared memory. Exclusion uses two locks:
//!
//! - an advisory `flock` on a separate lock file, across processes;
//! - a mutex around the mapping, across threads of this process, since
//!   threads sharing one open file description do not exclude each other
//!   through `flock`.
//!
//! The mutex is always taken first and released last.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use fs2::FileExt;
use memmap2::{MmapMut, MmapOptions};
use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{LiteError, Result};

use super::{LockedRegion, SharedChannel};

/// Shared channel backed by a mapped file and a lock file
pub struct MmapChannel {
    config: Config,

    /// The mapped region (mutex serializes threads of this process)
    map: Mutex<MmapMut>,

    /// Holds the inter-process advisory lock
    lock_file: File,
}

impl MmapChannel {
    /// Open or create the region and lock files described by `config`
    ///
    /// A region file shorter than `capacity` is extended with zeros; an
    /// existing, longer file is mapped up to `capacity` only.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let region = open_rw(&config.region_path)?;
        if region.metadata()?.len() < config.capacity as u64 {
            region.set_len(config.capacity as u64)?;
        }

        // SAFETY: the mapping is only read or written through `LockedRegion`
        // while both the mutex and the file lock are held. A participant that
        // ignores the lock can still race us; that is the documented contract
        // of the region, not memory unsafety in this process.
        let map = unsafe { MmapOptions::new().len(config.capacity).map_mut(&region)? };

        let lock_file = open_rw(&config.lock_path)?;

        tracing::debug!(
            region = %config.region_path.display(),
            lock = %config.lock_path.display(),
            capacity = config.capacity,
            "opened shared region"
        );

        Ok(Self {
            config,
            map: Mutex::new(map),
            lock_file,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Unmap the region and delete the region and lock files
    ///
    /// Files that are already gone are not an error. Other participants that
    /// still have the region mapped keep their mapping.
    pub fn remove(self) -> Result<()> {
        let Self {
            config,
            map,
            lock_file,
        } = self;
        drop(map);
        drop(lock_file);

        remove_if_exists(&config.region_path)?;
        remove_if_exists(&config.lock_path)?;

        tracing::debug!(region = %config.region_path.display(), "removed shared region");
        Ok(())
    }
}

impl SharedChannel for MmapChannel {
    fn capacity(&self) -> usize {
        self.config.capacity
    }

    fn with_exclusive_lock<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut LockedRegion<'_>) -> Result<T>,
    {
        let mut map = self.map.lock();

        FileExt::lock_exclusive(&self.lock_file).map_err(LiteError::Lock)?;
        let _flock = FlockGuard {
            file: &self.lock_file,
        };
        tracing::trace!(lock = %self.config.lock_path.display(), "region lock acquired");

        let mut region = LockedRegion::new(&mut map[..]);
        f(&mut region)
    }
}

/// Releases the advisory lock on drop, including during unwinding
struct FlockGuard<'a> {
    file: &'a File,
}

impl Drop for FlockGuard<'_> {
    fn drop(&mut self) {
        match FileExt::unlock(self.file) {
            Ok(()) => tracing::trace!("region lock released"),
            // The kernel drops the lock when the file is closed at the latest
            Err(e) => tracing::warn!(error = %e, "failed to release region lock"),
        }
    }
}

fn open_rw(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
