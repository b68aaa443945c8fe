//! Scatter a process's heap across one big arena.
//!
//! `scattermalloc` interposes on `malloc`/`realloc`/`free` and serves every
//! request from a single pre-reserved region, at a pseudo-random offset.
//! Nothing is ever reclaimed. Programs with latent pointer bugs (stale
//! reads, overruns, accidental reuse) tend to fall over quickly when every
//! allocation lands somewhere fresh -- which is the whole idea.
//!
//! Two ways in:
//!
//! - **Preload** (C/C++ hosts): build the cdylib with `--features interpose`
//!   and `LD_PRELOAD` it in front of the host. See [`externc`].
//! - **In-process** (Rust hosts and tests): construct a [`Shim`] over an
//!   upstream of your choosing, or install one as `#[global_allocator]`.
//!
//! The bump-cursor strategy ([`Strategy::BumpCursor`]) trades the randomness
//! for a simpler wrap-around cursor; both are first-class and separately
//! tested. Neither one frees memory. That is not an oversight.

pub mod alloc;
pub mod os;
pub mod util;

#[cfg(feature = "interpose")]
pub mod externc;

pub use crate::alloc::shim::{Counters, Shim, ShimConfig, Strategy};
pub use crate::alloc::upstream::{RtldNext, UpstreamAlloc};
