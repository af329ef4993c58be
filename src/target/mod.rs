//! Device abstraction
//!
//! This module defines the contract the motion core needs from a storage
//! device: its geometry, a way to reposition the read cursor, and a way to
//! read bytes at the cursor. Nothing else about the device matters here.
//!
//! # Implementations
//!
//! - **BlockTarget**: a raw block device (or a regular image file) opened
//!   read-only, with geometry from `BLKGETSIZE64` / `BLKSSZGET`
//! - **MockDevice**: an in-memory device that records every operation and can
//!   be told to fail, used by tests and by `--dry-run`
//!
//! # Example
//!
//! ```
//! use hdmotion::target::{BlockDevice, Geometry};
//! use hdmotion::target::mock::MockDevice;
//!
//! let mut device = MockDevice::new(Geometry::new(1024 * 1024, 512));
//! device.seek(4096).unwrap();
//!
//! let mut buf = vec![0u8; 512];
//! assert_eq!(device.read(&mut buf).unwrap(), 512);
//! assert_eq!(device.geometry().block_count(), 2048);
//! ```

use serde::Serialize;
use std::io;

/// Block device contract
///
/// Implementations own their underlying handle exclusively. All calls are
/// synchronous: `seek` and `read` block until the device has responded.
///
/// # Thread Safety
///
/// Devices must be `Send` so an opened device can be handed to whichever
/// thread runs the sequencer, but only one caller ever uses a device.
pub trait BlockDevice: Send {
    /// Size and minimum addressable unit of the device
    ///
    /// Fixed for the lifetime of the device.
    fn geometry(&self) -> Geometry;

    /// Move the read cursor to an absolute byte offset
    fn seek(&mut self, offset: u64) -> io::Result<()>;

    /// Read into `buf` at the current cursor
    ///
    /// Returns the number of bytes transferred, which may be less than
    /// `buf.len()`.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Device geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    /// Total addressable size in bytes
    pub size_bytes: u64,

    /// Minimum addressable unit in bytes (sector size, typically 512)
    pub block_size: u64,
}

impl Geometry {
    pub fn new(size_bytes: u64, block_size: u64) -> Self {
        Self { size_bytes, block_size }
    }

    /// Check `block_size > 0` and `size_bytes >= block_size`
    pub fn is_valid(&self) -> bool {
        self.block_size > 0 && self.size_bytes >= self.block_size
    }

    /// Number of whole blocks on the device
    pub fn block_count(&self) -> u64 {
        if self.block_size == 0 {
            return 0;
        }
        self.size_bytes / self.block_size
    }
}

impl<D: BlockDevice + ?Sized> BlockDevice for Box<D> {
    fn geometry(&self) -> Geometry {
        (**self).geometry()
    }

    fn seek(&mut self, offset: u64) -> io::Result<()> {
        (**self).seek(offset)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }
}

pub mod block;
pub mod mock;

pub use block::BlockTarget;
pub use mock::MockDevice;
