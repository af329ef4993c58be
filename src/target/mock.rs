//! Mock block device for testing and dry runs
//!
//! This module provides an in-memory implementation of the [`BlockDevice`]
//! trait. It performs no system calls, which makes tests fast and
//! deterministic, and lets `--dry-run` walk the whole motion program without
//! touching the real disk.
//!
//! # Features
//!
//! - Tracks every seek and read for verification
//! - Fails seeks or reads on chosen call numbers, or always
//! - Simulates partial reads
//! - Shared state, so a clone kept by the test sees what the accessor did
//!
//! # Example
//!
//! ```
//! use hdmotion::target::{BlockDevice, Geometry};
//! use hdmotion::target::mock::{MockDevice, OperationKind};
//!
//! let mut device = MockDevice::new(Geometry::new(1024 * 1024, 512));
//! let handle = device.clone();
//!
//! device.seek(8192).unwrap();
//! let mut buf = [0u8; 512];
//! device.read(&mut buf).unwrap();
//!
//! let ops = handle.operations();
//! assert_eq!(ops.len(), 2);
//! assert_eq!(ops[0].kind, OperationKind::Seek);
//! assert_eq!(ops[1].offset, 8192);
//! ```

use super::{BlockDevice, Geometry};
use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// Kind of recorded operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Seek,
    Read,
}

/// Record of an operation for test verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub kind: OperationKind,
    /// Cursor position the operation targeted
    pub offset: u64,
    /// Requested length (0 for seeks)
    pub length: usize,
    /// Whether the operation was made to fail
    pub failed: bool,
}

#[derive(Debug, Default)]
struct MockState {
    cursor: u64,
    seek_calls: usize,
    read_calls: usize,
    fail_all_reads: bool,
    fail_seeks_on: HashSet<usize>,
    fail_reads_on: HashSet<usize>,
    error_code: i32,
    bytes_per_read: usize,
    operations: Vec<OperationRecord>,
}

/// Mock block device
///
/// Seek and read calls are numbered from 0, separately. Reads past the end
/// of the device return the bytes that fit (possibly 0), like a real device.
#[derive(Debug, Clone)]
pub struct MockDevice {
    geometry: Geometry,
    state: Arc<Mutex<MockState>>,
}

impl MockDevice {
    /// Create a mock device that succeeds every operation
    pub fn new(geometry: Geometry) -> Self {
        let state = MockState {
            error_code: libc::EIO,
            ..MockState::default()
        };
        Self {
            geometry,
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A poisoned lock only means a test panicked mid-call; the counters are still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fail every read from now on
    pub fn set_fail_all_reads(&self, fail: bool) {
        self.state().fail_all_reads = fail;
    }

    /// Fail the seek with the given call number
    pub fn fail_seek_on(&self, call: usize) {
        self.state().fail_seeks_on.insert(call);
    }

    /// Fail the read with the given call number
    pub fn fail_read_on(&self, call: usize) {
        self.state().fail_reads_on.insert(call);
    }

    /// OS error code reported by injected failures (default EIO)
    pub fn set_error_code(&self, code: i32) {
        self.state().error_code = code;
    }

    /// Cap the bytes returned per read to simulate partial transfers
    ///
    /// 0 (default) returns the full requested length.
    pub fn set_bytes_per_read(&self, bytes: usize) {
        self.state().bytes_per_read = bytes;
    }

    /// Copy of all recorded operations
    pub fn operations(&self) -> Vec<OperationRecord> {
        self.state().operations.clone()
    }

    /// Offsets of all successful reads, in order
    pub fn read_offsets(&self) -> Vec<u64> {
        self.state()
            .operations
            .iter()
            .filter(|op| op.kind == OperationKind::Read && !op.failed)
            .map(|op| op.offset)
            .collect()
    }

    /// Number of seek calls made so far
    pub fn seek_count(&self) -> usize {
        self.state().seek_calls
    }

    /// Number of read calls made so far
    pub fn read_count(&self) -> usize {
        self.state().read_calls
    }
}

impl BlockDevice for MockDevice {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn seek(&mut self, offset: u64) -> io::Result<()> {
        let mut state = self.state();
        let call = state.seek_calls;
        state.seek_calls += 1;

        let failed = state.fail_seeks_on.contains(&call);
        state.operations.push(OperationRecord {
            kind: OperationKind::Seek,
            offset,
            length: 0,
            failed,
        });

        if failed {
            return Err(io::Error::from_raw_os_error(state.error_code));
        }

        state.cursor = offset;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state();
        let call = state.read_calls;
        state.read_calls += 1;

        let offset = state.cursor;
        let failed = state.fail_all_reads || state.fail_reads_on.contains(&call);
        state.operations.push(OperationRecord {
            kind: OperationKind::Read,
            offset,
            length: buf.len(),
            failed,
        });

        if failed {
            return Err(io::Error::from_raw_os_error(state.error_code));
        }

        let remaining = self.geometry.size_bytes.saturating_sub(offset);
        let mut bytes = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));
        if state.bytes_per_read > 0 {
            bytes = bytes.min(state.bytes_per_read);
        }

        buf[..bytes].fill(0);
        state.cursor = offset + bytes as u64;
        Ok(bytes)
    }
}
