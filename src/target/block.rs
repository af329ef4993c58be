//! Block device target implementation
//!
//! This module opens raw block devices (e.g., /dev/sda, /dev/nvme0n1) read-only
//! and implements the [`BlockDevice`] contract on top of them.
//!
//! # Features
//!
//! - Opens devices read-only, optionally with O_DIRECT to bypass the page cache
//! - Detects device size via ioctl (BLKGETSIZE64)
//! - Detects logical sector size via ioctl (BLKSSZGET)
//! - Falls back to file length and 512-byte sectors for regular image files
//! - Resolves bare disk numbers ("0", "1", ...) to /dev/sda, /dev/sdb, ...
//!
//! # Requirements
//!
//! - Root or appropriate permissions to access block devices
//! - With O_DIRECT, buffers and transfers aligned to the sector size
//!
//! # Example
//!
//! ```no_run
//! use hdmotion::target::BlockDevice;
//! use hdmotion::target::block::BlockTarget;
//! use std::path::PathBuf;
//!
//! // Note: Requires root permissions
//! let target = BlockTarget::open(PathBuf::from("/dev/sdb"), false).unwrap();
//! let geometry = target.geometry();
//! println!("{} bytes, {} byte sectors", geometry.size_bytes, geometry.block_size);
//! // Device is closed when `target` is dropped
//! ```

use super::{BlockDevice, Geometry};
use crate::error::OpenError;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

// ioctl request code for getting block device size in bytes
const BLKGETSIZE64: libc::c_ulong = 0x80081272;

// ioctl request code for getting logical sector size
const BLKSSZGET: libc::c_ulong = 0x1268;

/// Sector size assumed for regular files
const DEFAULT_SECTOR_SIZE: u64 = 512;

/// Resolve a user-supplied device identifier to a path
///
/// A purely numeric identifier `N` names the N-th SCSI/SATA disk
/// (`0` is `/dev/sda`). Anything else is taken as a path.
pub fn resolve_device_path(identifier: &str) -> PathBuf {
    let id = identifier.trim();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(index) = id.parse::<u8>() {
            if index < 26 {
                let letter = (b'a' + index) as char;
                return PathBuf::from(format!("/dev/sd{}", letter));
            }
        }
    }
    PathBuf::from(id)
}

/// Block device target
///
/// Owns the open device handle. The handle is released exactly once, when
/// the target is dropped, on every exit path.
#[derive(Debug)]
pub struct BlockTarget {
    /// Path to the device (e.g., /dev/sda)
    path: PathBuf,

    /// Open read-only handle
    file: File,

    /// Geometry detected at open time
    geometry: Geometry,

    /// Opened with O_DIRECT
    direct: bool,
}

impl BlockTarget {
    /// Open a device read-only and detect its geometry
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the block device or image file
    /// * `direct` - Open with O_DIRECT
    ///
    /// # Errors
    ///
    /// `DeviceNotFound` / `AccessDenied` when the open fails for those
    /// reasons, `Geometry` when the size queries fail, and `InvalidGeometry`
    /// when the device is smaller than one sector.
    pub fn open(path: PathBuf, direct: bool) -> Result<Self, OpenError> {
        let mut options = OpenOptions::new();
        options.read(true);
        if direct {
            options.custom_flags(libc::O_DIRECT);
        }

        let file = match options.open(&path) {
            Ok(file) => file,
            Err(err) => return Err(OpenError::from_open(path, err)),
        };

        let geometry = match detect_geometry(&file) {
            Ok(geometry) => geometry,
            Err(source) => return Err(OpenError::Geometry { path, source }),
        };

        if !geometry.is_valid() {
            return Err(OpenError::InvalidGeometry {
                path,
                size_bytes: geometry.size_bytes,
                block_size: geometry.block_size,
            });
        }

        log::info!(
            "opened {} (size={} bytes, block_size={} bytes, direct={})",
            path.display(),
            geometry.size_bytes,
            geometry.block_size,
            direct
        );

        Ok(Self {
            path,
            file,
            geometry,
            direct,
        })
    }

    /// Path the target was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the target was opened with O_DIRECT
    pub fn is_direct(&self) -> bool {
        self.direct
    }
}

/// Detect size and sector size of an open file or block device
fn detect_geometry(file: &File) -> io::Result<Geometry> {
    let metadata = file.metadata()?;

    if !metadata.file_type().is_block_device() {
        return Ok(Geometry::new(metadata.len(), DEFAULT_SECTOR_SIZE));
    }

    let fd = file.as_raw_fd();

    let mut size: u64 = 0;
    let result = unsafe { libc::ioctl(fd, BLKGETSIZE64, &mut size) };
    if result < 0 {
        return Err(io::Error::last_os_error());
    }

    let mut sector_size: libc::c_int = 0;
    let result = unsafe { libc::ioctl(fd, BLKSSZGET, &mut sector_size) };
    if result < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(Geometry::new(size, sector_size.max(0) as u64))
}

impl BlockDevice for BlockTarget {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn seek(&mut self, offset: u64) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset)).map(|_| ())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}
