//! Aligned scratch buffer for positioned reads
//!
//! O_DIRECT reads need a buffer aligned to the device's sector size. The
//! accessor allocates one of these at start-up and reuses it for every read;
//! its contents are never inspected.

use anyhow::Context;
use std::alloc::{alloc_zeroed, dealloc, Layout};

/// Memory-aligned buffer suitable for O_DIRECT operations
pub struct AlignedBuffer {
    ptr: *mut u8,
    size: usize,
    layout: Layout,
}

impl AlignedBuffer {
    /// Allocate a zeroed buffer
    ///
    /// # Arguments
    /// * `size` - Size of the buffer in bytes (must be > 0)
    /// * `alignment` - Alignment requirement, rounded up to a power of two
    pub fn new(size: usize, alignment: usize) -> crate::Result<Self> {
        if size == 0 {
            anyhow::bail!("buffer size must be greater than 0");
        }

        let alignment = alignment.max(1).next_power_of_two();
        let layout = Layout::from_size_align(size, alignment)
            .with_context(|| format!("invalid buffer layout: size={}, alignment={}", size, alignment))?;

        // SAFETY: layout has a non-zero size
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            anyhow::bail!("failed to allocate {} byte buffer", size);
        }

        Ok(Self { ptr, size, layout })
    }

    /// Get the buffer as a mutable slice
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: ptr is valid for `size` bytes for the lifetime of self
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.size) }
    }

    /// Get the size of the buffer in bytes
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the alignment of the buffer
    #[inline(always)]
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    /// Verify that the buffer is properly aligned
    #[inline(always)]
    pub fn is_aligned(&self) -> bool {
        (self.ptr as usize) % self.layout.align() == 0
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        unsafe {
            dealloc(self.ptr, self.layout);
        }
    }
}

// AlignedBuffer is Send because it owns its memory
unsafe impl Send for AlignedBuffer {}
