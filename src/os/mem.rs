//! Anonymous memory mappings, and the mmap-backed upstream built on them.

use std::ptr::{self, NonNull};
use std::sync::Mutex;

use libc::{MAP_ANONYMOUS, MAP_FAILED, MAP_NORESERVE, MAP_PRIVATE, PROT_READ, PROT_WRITE};
use once_cell::sync::Lazy;

use crate::alloc::upstream::UpstreamAlloc;
use crate::putln;
use crate::util::num::round_up;

static PAGE: Lazy<usize> = Lazy::new(page_size::get);

/// A private, read/write, `MAP_NORESERVE` anonymous mapping. Page-rounded,
/// zero-filled by the kernel, unmapped on drop.
pub struct MmapRegion {
    ptr: NonNull<u8>,
    len: usize,
}

impl MmapRegion {
    /// Map at least `size` bytes (rounded up to whole pages). `None` if the
    /// kernel refuses; the errno goes to stderr since callers can't do
    /// anything smarter with it.
    ///
    /// # Panics
    ///
    /// If `size` is zero.
    pub fn map(size: usize) -> Option<MmapRegion> {
        assert!(size > 0, "refusing to mmap() zero bytes");
        let len = round_up(size, *PAGE);
        // SAFETY: anonymous mapping at a kernel-chosen address; no fd, no
        // existing memory is touched.
        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                PROT_READ | PROT_WRITE,
                MAP_NORESERVE | MAP_ANONYMOUS | MAP_PRIVATE,
                -1,
                0,
            )
        };
        if ptr == MAP_FAILED {
            // SAFETY: errno location is always valid on the calling thread.
            let errno = unsafe { *libc::__errno_location() };
            putln!(
                "mmap(",
                len,
                ") failed, errno ",
                errno,
                if errno == libc::ENOMEM { " (ENOMEM)" } else { "" },
            );
            return None;
        }
        NonNull::new(ptr as *mut u8).map(|ptr| MmapRegion { ptr, len })
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// SAFETY: the mapping is plain process memory with no thread affinity.
unsafe impl Send for MmapRegion {}

impl Drop for MmapRegion {
    fn drop(&mut self) {
        // SAFETY: `ptr` is the page-aligned start of a mapping of exactly
        // `len` bytes, and nobody else unmaps it.
        unsafe {
            libc::munmap(self.ptr.as_ptr() as _, self.len);
        }
    }
}

/// Upstream that serves reservations from fresh anonymous mappings, keeping
/// every region alive until the upstream itself drops. Tests want exactly
/// that: the arena must outlive the shim borrowing it, and `MAP_NORESERVE`
/// makes even huge test arenas close to free.
pub struct MmapUpstream {
    regions: Mutex<Vec<MmapRegion>>,
}

impl MmapUpstream {
    pub fn new() -> Self {
        Self {
            regions: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MmapUpstream {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: regions handed out stay mapped and writable until this value
// drops; the interior mutex serializes `reserve`.
unsafe impl UpstreamAlloc for MmapUpstream {
    fn reserve(&self, size: usize) -> *mut u8 {
        let Some(region) = MmapRegion::map(size) else {
            return ptr::null_mut();
        };
        let data = region.as_ptr();
        self.regions
            .lock()
            .expect("mmap upstream lock poisoned")
            .push(region);
        data
    }
}
