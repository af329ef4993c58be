//! Error types for device access
//!
//! Two families of errors exist:
//!
//! - [`MoveError`]: a single head move failed. These are recoverable; the
//!   sequencer records them and carries on with the next position.
//! - [`OpenError`]: the device could not be opened or its geometry could not
//!   be determined. These are fatal and stop the run before any motion.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A failed head move
///
/// Both variants carry the clamped position that was requested and the
/// aligned byte offset that was computed for it, so the error line printed
/// by the progress sink can be understood on its own.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Repositioning the read cursor failed; no read was issued
    #[error("seek to offset {offset} failed: {source}")]
    Position {
        position: f64,
        offset: u64,
        #[source]
        source: io::Error,
    },

    /// The read at the new position failed
    #[error("read of {length} bytes at offset {offset} failed: {source}")]
    Read {
        position: f64,
        offset: u64,
        length: usize,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    /// Clamped position of the failed move
    pub fn position(&self) -> f64 {
        match self {
            MoveError::Position { position, .. } | MoveError::Read { position, .. } => *position,
        }
    }

    /// Aligned byte offset of the failed move
    pub fn offset(&self) -> u64 {
        match self {
            MoveError::Position { offset, .. } | MoveError::Read { offset, .. } => *offset,
        }
    }

    /// Short name of the failing step ("seek" or "read")
    pub fn kind(&self) -> &'static str {
        match self {
            MoveError::Position { .. } => "seek",
            MoveError::Read { .. } => "read",
        }
    }

    /// Underlying OS error code, if the failure came from a syscall
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            MoveError::Position { source, .. } | MoveError::Read { source, .. } => {
                source.raw_os_error()
            }
        }
    }
}

/// Failure to open a device or to read its geometry
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("device not found: {0}")]
    DeviceNotFound(PathBuf),

    #[error("access denied: {0} (raw device access usually requires root privileges)")]
    AccessDenied(PathBuf),

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to query geometry of {path}: {source}")]
    Geometry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid geometry for {path}: size={size_bytes} bytes, block size={block_size} bytes")]
    InvalidGeometry {
        path: PathBuf,
        size_bytes: u64,
        block_size: u64,
    },
}

impl OpenError {
    /// Classify an `open(2)` failure for `path`
    pub fn from_open(path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => OpenError::DeviceNotFound(path),
            io::ErrorKind::PermissionDenied => OpenError::AccessDenied(path),
            _ => OpenError::Io { path, source: err },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_accessors() {
        let err = MoveError::Read {
            position: 0.25,
            offset: 4096,
            length: 512,
            source: io::Error::from_raw_os_error(libc::EIO),
        };

        assert_eq!(err.kind(), "read");
        assert_eq!(err.position(), 0.25);
        assert_eq!(err.offset(), 4096);
        assert_eq!(err.raw_os_error(), Some(libc::EIO));
        assert!(err.to_string().contains("offset 4096"));
    }

    #[test]
    fn test_move_error_without_os_code() {
        let err = MoveError::Position {
            position: 1.0,
            offset: 0,
            source: io::Error::new(io::ErrorKind::Other, "mock failure"),
        };

        assert_eq!(err.kind(), "seek");
        assert_eq!(err.raw_os_error(), None);
    }

    #[test]
    fn test_open_error_classification() {
        let path = PathBuf::from("/dev/nonexistent");

        let not_found = OpenError::from_open(path.clone(), io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(not_found, OpenError::DeviceNotFound(_)));

        let denied = OpenError::from_open(path.clone(), io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, OpenError::AccessDenied(_)));
        assert!(denied.to_string().contains("root"));

        let other = OpenError::from_open(path, io::Error::from_raw_os_error(libc::EBUSY));
        assert!(matches!(other, OpenError::Io { .. }));
    }
}
