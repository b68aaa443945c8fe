/// Shunt a closure onto a `#[cold]` path, so the caller's fast path stays
/// tight after inlining.
#[cold]
pub fn cold_path<R>(f: impl FnOnce() -> R) -> R {
    f()
}
