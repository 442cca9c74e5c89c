//! Stack growth for deep traversals.
//!
//! Copying follows the reference graph of its input depth-first, so a linked
//! list with a million nodes recurses a million times. Every recursive step of
//! the copy engine runs inside [`ensure_sufficient_stack`], which moves the
//! work onto a freshly allocated stack segment when the current one runs low.
//!
//! - **Native targets**: backed by `stacker::maybe_grow`.
//! - **wasm32**: calls through directly; the host owns the stack.
//!
//! Callers that prefer a hard failure over unbounded growth set a depth limit
//! on the engine's configuration instead.

/// Headroom to keep before a recursive step (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if less than the red zone
/// remains on the current one.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// wasm32: no stack switching.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
