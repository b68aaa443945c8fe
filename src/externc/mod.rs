//! The preload surface: `malloc`, `realloc` and `free` under their real
//! names, backed by one process-wide shim.
//!
//! Compiled only with the `interpose` feature so that ordinary Rust
//! consumers of the crate -- including its own tests -- keep their real
//! heap. The preload artifact is the cdylib:
//!
//! ```text
//! cargo build --release --features interpose
//! LD_PRELOAD=target/release/libscattermalloc.so ./host-program
//! ```
//!
//! Every allocation in the host, third-party libraries included, then lands
//! in the arena at a scattered offset. Add `--features bump` to advance a
//! wrap-around cursor instead of drawing random offsets.
//!
//! The non-locking bump helper is deliberately *not* exported: it is only
//! sound under the shim's lock, and preloaded callers can't hold it.

use libc::{c_void, size_t};

use crate::alloc::shim::{Shim, ShimConfig, Strategy};
use crate::alloc::upstream::RtldNext;

const INTERPOSED_STRATEGY: Strategy = if cfg!(feature = "bump") {
    Strategy::BumpCursor
} else {
    Strategy::RandomOffset
};

/// The one shim every interposed call lands on.
#[no_mangle]
pub static SCATTERMALLOC: Shim<RtldNext> =
    Shim::new(RtldNext::new(), ShimConfig::interposed(INTERPOSED_STRATEGY));

#[no_mangle]
pub unsafe extern "C" fn malloc(size: size_t) -> *mut c_void {
    match SCATTERMALLOC.allocate(size) {
        Some(data) => data.as_ptr() as _,
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn realloc(ptr: *mut c_void, new_size: size_t) -> *mut c_void {
    // SAFETY: the contract is the caller's -- `ptr` is null or a previous
    // return of ours with enough readable headroom.
    match unsafe { SCATTERMALLOC.reallocate(ptr as *mut u8, new_size) } {
        Some(data) => data.as_ptr() as _,
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub unsafe extern "C" fn free(ptr: *mut c_void) {
    SCATTERMALLOC.deallocate(ptr as *mut u8);
}
