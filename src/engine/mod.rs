//! Position-to-device translation
//!
//! The [`DeviceAccessor`] turns a normalized head position into a safe,
//! sector-aligned positioned read on one device. It is the only component
//! that talks to the device; the motion sequencer calls it once per position.
//!
//! # Offset math
//!
//! For a clamped position `p` in [0.0, 1.0]:
//!
//! ```text
//! offset = floor(p * (size_bytes - transfer_size))
//! offset = offset - offset % block_size
//! ```
//!
//! so every offset is aligned to the block size and a full transfer at that
//! offset stays inside the device.
//!
//! # Example
//!
//! ```
//! use hdmotion::engine::DeviceAccessor;
//! use hdmotion::target::{Geometry, MockDevice};
//!
//! let device = MockDevice::new(Geometry::new(1_048_576, 512));
//! let mut accessor = DeviceAccessor::new(device, None).unwrap();
//!
//! assert_eq!(accessor.move_to(0.0).unwrap().offset, 0);
//! assert_eq!(accessor.move_to(1.0).unwrap().offset, 1_048_064);
//! ```

use crate::error::MoveError;
use crate::target::{BlockDevice, Geometry};
use crate::util::buffer::AlignedBuffer;

/// Outcome of one device access attempt
pub type MoveResult = std::result::Result<MoveOutcome, MoveError>;

/// A successful head move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Position after clamping to [0.0, 1.0]
    pub position: f64,

    /// Aligned byte offset the read was issued at
    pub offset: u64,

    /// Bytes actually transferred (partial reads count as success)
    pub bytes_read: usize,
}

/// Clamp a position to [0.0, 1.0]
///
/// NaN maps to 0.0.
#[inline]
pub fn clamp_position(position: f64) -> f64 {
    if position.is_nan() {
        return 0.0;
    }
    position.clamp(0.0, 1.0)
}

/// Compute the aligned byte offset for a position
///
/// The position is clamped first. The caller guarantees
/// `geometry.block_size > 0` and `transfer_size <= geometry.size_bytes`.
pub fn aligned_offset(position: f64, geometry: Geometry, transfer_size: u64) -> u64 {
    let position = clamp_position(position);
    let span = geometry.size_bytes.saturating_sub(transfer_size);

    // `as` saturates, and p <= 1.0 keeps the product within span
    let offset = ((position * span as f64).floor() as u64).min(span);
    offset - offset % geometry.block_size
}

/// Synchronous accessor over one exclusively owned device
///
/// Holds a single scratch buffer, aligned to the device block size, reused
/// for every read.
pub struct DeviceAccessor<D: BlockDevice> {
    device: D,
    geometry: Geometry,
    transfer_size: usize,
    buffer: AlignedBuffer,
}

impl<D: BlockDevice> DeviceAccessor<D> {
    /// Wrap a device
    ///
    /// # Arguments
    ///
    /// * `device` - The opened device
    /// * `transfer_size` - Bytes per read; defaults to the device block size
    ///
    /// # Errors
    ///
    /// Fails if the geometry is invalid, or the transfer size is smaller than
    /// one block, not a whole number of blocks, or larger than the device.
    pub fn new(device: D, transfer_size: Option<u64>) -> crate::Result<Self> {
        let geometry = device.geometry();
        if !geometry.is_valid() {
            anyhow::bail!(
                "invalid device geometry: size={} bytes, block_size={} bytes",
                geometry.size_bytes,
                geometry.block_size
            );
        }

        let transfer = transfer_size.unwrap_or(geometry.block_size);
        if transfer < geometry.block_size || transfer % geometry.block_size != 0 {
            anyhow::bail!(
                "transfer size ({} bytes) must be a multiple of the block size ({} bytes)",
                transfer,
                geometry.block_size
            );
        }
        if transfer > geometry.size_bytes {
            anyhow::bail!(
                "transfer size ({} bytes) exceeds device size ({} bytes)",
                transfer,
                geometry.size_bytes
            );
        }

        let transfer_size = usize::try_from(transfer)
            .map_err(|_| anyhow::anyhow!("transfer size too large: {} bytes", transfer))?;
        let alignment = usize::try_from(geometry.block_size).unwrap_or(4096);
        let buffer = AlignedBuffer::new(transfer_size, alignment)?;

        Ok(Self {
            device,
            geometry,
            transfer_size,
            buffer,
        })
    }

    /// Move the head to a normalized position
    ///
    /// Clamps, computes the aligned offset, seeks and reads one transfer.
    /// A seek failure skips the read.
    pub fn move_to(&mut self, position: f64) -> MoveResult {
        let position = clamp_position(position);
        let offset = self.offset_for(position);

        if let Err(source) = self.device.seek(offset) {
            return Err(MoveError::Position {
                position,
                offset,
                source,
            });
        }

        let length = self.transfer_size;
        match self.device.read(&mut self.buffer.as_mut_slice()[..length]) {
            Ok(bytes_read) => Ok(MoveOutcome {
                position,
                offset,
                bytes_read,
            }),
            Err(source) => Err(MoveError::Read {
                position,
                offset,
                length,
                source,
            }),
        }
    }

    /// Aligned byte offset `move_to` would use for a position
    pub fn offset_for(&self, position: f64) -> u64 {
        aligned_offset(position, self.geometry, self.transfer_size as u64)
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Bytes read per move
    pub fn transfer_size(&self) -> usize {
        self.transfer_size
    }

    /// Give the device back, releasing the scratch buffer
    pub fn into_inner(self) -> D {
        self.device
    }
}
