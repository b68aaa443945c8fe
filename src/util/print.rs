//! Printing that never touches the heap.
//!
//! Once interposed, this shim *is* the process allocator, so `eprintln!`
//! (which may allocate while formatting and takes std's stderr lock) is off
//! the table. Everything here formats into a fixed stack buffer and leaves
//! through a single `write(2)`.

use std::ffi::c_void;
use std::fmt;

/// One diagnostic line, at most [`RawLine::CAP`] bytes, flushed to stderr as
/// a single `write(2)` so concurrent lines don't interleave mid-word.
pub struct RawLine {
    buf: [u8; Self::CAP],
    len: usize,
}

impl RawLine {
    pub const CAP: usize = 192;

    pub const fn new() -> Self {
        Self {
            buf: [0; Self::CAP],
            len: 0,
        }
    }

    /// Write the buffered bytes to stderr. Short writes and errors are
    /// ignored; there is nowhere to report them.
    pub fn flush(&mut self) {
        if self.len == 0 {
            return;
        }
        // SAFETY: `buf[..len]` is initialized and stderr is fd 2 for the
        // life of the process.
        unsafe {
            libc::write(
                libc::STDERR_FILENO,
                self.buf.as_ptr() as *const c_void,
                self.len,
            );
        }
        self.len = 0;
    }
}

impl Default for RawLine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for RawLine {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Truncate rather than grow; a clipped diagnostic beats a recursive
        // malloc.
        let n = s.len().min(Self::CAP - self.len);
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

/// Lowercase-hex wrapper for the places diagnostics print offsets.
pub struct Hex(pub usize);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Print each argument's `Display` form straight to stderr, no heap.
#[macro_export]
macro_rules! put {
    ($($arg:expr),* $(,)?) => {{
        #[allow(unused_imports)]
        use ::std::fmt::Write as _;
        #[allow(unused_mut)]
        let mut line = $crate::util::print::RawLine::new();
        $(let _ = ::std::write!(line, "{}", $arg);)*
        line.flush();
    }};
}

/// [`put!`] with a trailing newline.
#[macro_export]
macro_rules! putln {
    ($($arg:expr),* $(,)?) => {{
        use ::std::fmt::Write as _;
        let mut line = $crate::util::print::RawLine::new();
        $(let _ = ::std::write!(line, "{}", $arg);)*
        let _ = ::std::write!(line, "\n");
        line.flush();
    }};
}
