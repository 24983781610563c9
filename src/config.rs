//! Configuration for litekv
//!
//! Centralized configuration for the shared region with sensible defaults.

use std::path::PathBuf;

use crate::error::{LiteError, Result};

/// Default size of the shared region (bytes)
pub const DEFAULT_CAPACITY: usize = 4096;

/// Configuration of a shared channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Region Configuration
    // -------------------------------------------------------------------------
    /// File backing the shared region. Under `/dev/shm` this is POSIX
    /// shared memory; anywhere else it is an ordinary mapped file.
    pub region_path: PathBuf,

    /// Fixed size of the shared region (bytes)
    pub capacity: usize,

    // -------------------------------------------------------------------------
    // Lock Configuration
    // -------------------------------------------------------------------------
    /// File holding the advisory exclusive lock for the region
    pub lock_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region_path: PathBuf::from("/dev/shm/litekv_region"),
            capacity: DEFAULT_CAPACITY,
            lock_path: PathBuf::from("/dev/shm/litekv.lock"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration describes a usable region
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LiteError::Config(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if self.capacity as u64 > u32::MAX as u64 {
            return Err(LiteError::Config(format!(
                "capacity {} exceeds the maximum of {} bytes",
                self.capacity,
                u32::MAX
            )));
        }
        if self.region_path == self.lock_path {
            return Err(LiteError::Config(format!(
                "region and lock must be different files: {}",
                self.region_path.display()
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the file backing the shared region
    pub fn region_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.region_path = path.into();
        self
    }

    /// Set the lock file
    pub fn lock_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.lock_path = path.into();
        self
    }

    /// Set the region capacity (in bytes)
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
