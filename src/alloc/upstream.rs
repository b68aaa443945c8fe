//! Where the arena's backing memory comes from.
//!
//! The shim shadows `malloc`, so the one real allocation it performs -- the
//! arena reservation -- has to reach *past* itself. On the interposed path
//! that means asking the dynamic linker for the next `malloc` in resolution
//! order. Tests and demos swap in an mmap-backed upstream instead
//! ([`crate::os::mem::MmapUpstream`]) so a gigabyte arena costs address
//! space, not resident pages.

use std::ffi::c_void;
use std::mem;

use libc::size_t;
use once_cell::sync::OnceCell;

use crate::putln;

/// A source of one-shot region reservations.
///
/// # Safety
///
/// `reserve` must return either null or a pointer to a region valid for
/// reads and writes of `size` bytes, which stays valid (and is never handed
/// out again) for the implementation's lifetime.
pub unsafe trait UpstreamAlloc {
    /// Reserve `size` bytes. Null means the reservation failed.
    fn reserve(&self, size: usize) -> *mut u8;
}

type CMalloc = unsafe extern "C" fn(size_t) -> *mut c_void;

/// Upstream that resolves the *next* `malloc` after this shim -- the real
/// allocator we were preloaded in front of. Resolution happens once.
pub struct RtldNext {
    real_malloc: OnceCell<CMalloc>,
}

impl RtldNext {
    pub const fn new() -> Self {
        Self {
            real_malloc: OnceCell::new(),
        }
    }

    /// # Aborts
    ///
    /// If the linker has no further `malloc` to offer. There is no fallback
    /// (without a real allocator there is no arena to serve from), and a
    /// panic here could recurse into the interposed allocator while it
    /// holds its lock.
    fn resolve(&self) -> CMalloc {
        *self.real_malloc.get_or_init(|| {
            // SAFETY: plain symbol lookup against a static C string.
            let sym = unsafe { libc::dlsym(libc::RTLD_NEXT, c"malloc".as_ptr()) };
            if sym.is_null() {
                putln!("dlsym(RTLD_NEXT, \"malloc\") came back null, aborting");
                std::process::abort();
            }
            // SAFETY: whatever resolves under the name `malloc` has the C
            // malloc signature.
            unsafe { mem::transmute::<*mut c_void, CMalloc>(sym) }
        })
    }
}

impl Default for RtldNext {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: forwards to the process's real `malloc`, which owns its returned
// regions until `free` -- and this shim never frees.
unsafe impl UpstreamAlloc for RtldNext {
    fn reserve(&self, size: usize) -> *mut u8 {
        let real_malloc = self.resolve();
        // SAFETY: any size is a valid malloc() argument.
        unsafe { real_malloc(size as size_t) as *mut u8 }
    }
}
