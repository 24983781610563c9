//! Tests for MmapChannel
//!
//! These tests verify:
//! - Region and lock files are created at the configured size
//! - Bytes published through one handle are visible through another
//! - Capacity checks and configuration validation
//! - File removal
//! - Exclusion between independently opened handles

use std::sync::Arc;
use std::thread;

use litekv::channel::{self, MmapChannel};
use litekv::{Config, LiteError, SharedChannel, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn temp_config(capacity: usize) -> (TempDir, Config) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .region_path(temp_dir.path().join("region"))
        .lock_path(temp_dir.path().join("region.lock"))
        .capacity(capacity)
        .build();
    (temp_dir, config)
}

fn sample_store() -> Store {
    let mut store = Store::new();
    store.write(b"foo", b"bar").unwrap();
    store.write(b"foo2", b"bar2").unwrap();
    store.write(b"foo3", b"bar3").unwrap();
    store.write(b"foo4", b"bar4").unwrap();
    store
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_files() {
    let (_temp, config) = temp_config(4096);

    let shm = MmapChannel::open(config.clone()).unwrap();

    assert!(config.region_path.exists());
    assert!(config.lock_path.exists());
    assert_eq!(std::fs::metadata(&config.region_path).unwrap().len(), 4096);
    assert_eq!(shm.capacity(), 4096);
    assert_eq!(shm.config(), &config);
}

#[test]
fn test_open_new_region_is_zeroed() {
    let (_temp, config) = temp_config(128);
    let shm = MmapChannel::open(config).unwrap();

    let bytes = shm
        .with_exclusive_lock(|region| region.transfer_out(128))
        .unwrap();

    assert_eq!(bytes, vec![0u8; 128]);
}

#[test]
fn test_open_rejects_zero_capacity() {
    let (_temp, config) = temp_config(0);

    let result = MmapChannel::open(config);

    assert!(matches!(result, Err(LiteError::Config(_))));
}

#[test]
fn test_open_rejects_shared_lock_and_region() {
    let (temp, _) = temp_config(64);
    let path = temp.path().join("same");
    let config = Config::builder()
        .region_path(&path)
        .lock_path(&path)
        .capacity(64)
        .build();

    assert!(matches!(MmapChannel::open(config), Err(LiteError::Config(_))));
}

#[test]
fn test_open_missing_directory() {
    let (temp, _) = temp_config(64);
    let config = Config::builder()
        .region_path(temp.path().join("nope").join("region"))
        .lock_path(temp.path().join("region.lock"))
        .capacity(64)
        .build();

    assert!(matches!(MmapChannel::open(config), Err(LiteError::Io(_))));
}

// =============================================================================
// Transfer Tests
// =============================================================================

#[test]
fn test_publish_receive_same_handle() {
    let (_temp, config) = temp_config(4096);
    let shm = MmapChannel::open(config).unwrap();
    let writer = sample_store();

    let len = channel::publish(&shm, &writer).unwrap();
    let reader = channel::receive(&shm, len).unwrap();

    assert_eq!(reader.read(b"foo").unwrap(), b"bar");
    assert_eq!(reader.read(b"foo3").unwrap(), b"bar3");
    assert!(matches!(reader.read(b"missing"), Err(LiteError::KeyNotFound)));
}

#[test]
fn test_publish_visible_through_second_handle() {
    let (_temp, config) = temp_config(4096);
    let writer_shm = MmapChannel::open(config.clone()).unwrap();
    let reader_shm = MmapChannel::open(config).unwrap();
    let writer = sample_store();

    let len = channel::publish(&writer_shm, &writer).unwrap();
    drop(writer_shm);
    let reader = channel::receive(&reader_shm, len).unwrap();

    assert_eq!(reader.read(b"foo2").unwrap(), b"bar2");
    assert_eq!(reader.checksum(), writer.checksum());
}

#[test]
fn test_reopen_keeps_contents() {
    let (_temp, config) = temp_config(256);
    let len = {
        let shm = MmapChannel::open(config.clone()).unwrap();
        channel::publish(&shm, &sample_store()).unwrap()
    };

    let shm = MmapChannel::open(config).unwrap();
    let reader = channel::receive(&shm, len).unwrap();

    assert_eq!(reader.read(b"foo4").unwrap(), b"bar4");
}

#[test]
fn test_capacity_exceeded_leaves_region() {
    let (_temp, config) = temp_config(4096);
    let shm = MmapChannel::open(config).unwrap();
    let len = channel::publish(&shm, &sample_store()).unwrap();

    let mut big = Store::new();
    big.write(b"big", &vec![1u8; 5000 - 11]).unwrap();
    let result = channel::publish(&shm, &big);

    assert!(matches!(
        result,
        Err(LiteError::CapacityExceeded { len: 5000, capacity: 4096 })
    ));
    let reader = channel::receive(&shm, len).unwrap();
    assert_eq!(reader.read(b"foo").unwrap(), b"bar");
}

#[test]
fn test_larger_existing_file_is_mapped_to_capacity() {
    let (_temp, config) = temp_config(64);
    std::fs::write(&config.region_path, vec![0xEE; 1024]).unwrap();

    let shm = MmapChannel::open(config.clone()).unwrap();

    assert_eq!(shm.capacity(), 64);
    assert!(matches!(
        shm.with_exclusive_lock(|region| region.transfer_out(65)),
        Err(LiteError::CapacityExceeded { .. })
    ));
    assert_eq!(std::fs::metadata(&config.region_path).unwrap().len(), 1024);
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_deletes_files() {
    let (_temp, config) = temp_config(64);
    let shm = MmapChannel::open(config.clone()).unwrap();

    shm.remove().unwrap();

    assert!(!config.region_path.exists());
    assert!(!config.lock_path.exists());
}

#[test]
fn test_remove_tolerates_missing_files() {
    let (_temp, config) = temp_config(64);
    let first = MmapChannel::open(config.clone()).unwrap();
    let second = MmapChannel::open(config).unwrap();

    first.remove().unwrap();
    second.remove().unwrap();
}

// =============================================================================
// Lock Tests
// =============================================================================

#[test]
fn test_independent_handles_exclude_each_other() {
    let (_temp, config) = temp_config(512);
    let mut handles = Vec::new();

    for t in 1..=4u8 {
        let shm = MmapChannel::open(config.clone()).unwrap();
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                let payload = vec![t; 512];
                shm.with_exclusive_lock(|region| {
                    region.transfer_in(&payload)?;
                    thread::yield_now();
                    let seen = region.transfer_out(512)?;
                    assert_eq!(seen, payload);
                    Ok(())
                })
                .unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_shared_handle_across_threads() {
    let (_temp, config) = temp_config(4096);
    let shm = Arc::new(MmapChannel::open(config).unwrap());
    let (tx, rx) = crossbeam::channel::bounded::<usize>(1);

    let writer_shm = Arc::clone(&shm);
    let writer = thread::spawn(move || {
        let len = channel::publish(&*writer_shm, &sample_store()).unwrap();
        tx.send(len).unwrap();
    });

    let len = rx.recv().unwrap();
    writer.join().unwrap();
    let reader = channel::receive(&*shm, len).unwrap();

    assert_eq!(reader.key_count(), 4);
}
