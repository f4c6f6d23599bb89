//! Stack safety for the recursive rewrite and evaluation passes.
//!
//! Two separate concerns live here:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand so that
//!   deeply nested MAST trees never overflow the thread stack.
//! - [`DepthBudget`] bounds the *logical* recursion depth. Evaluating a
//!   non-terminating constant (a function that calls itself forever) would
//!   otherwise keep growing the stack until memory runs out; the budget turns
//!   that into a reportable error instead.
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack.
//! - **WASM targets**: No-op passthrough.

use std::fmt;

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone threshold, additional
/// stack space is allocated before calling `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Returned by [`DepthBudget::enter`] once the configured limit is reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: usize,
}

impl fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recursion depth limit of {} exceeded", self.limit)
    }
}

impl std::error::Error for DepthExceeded {}

/// Counter for logical recursion depth.
///
/// Every successful [`enter`](Self::enter) must be paired with an
/// [`exit`](Self::exit), including on error paths.
#[derive(Clone, Debug)]
pub struct DepthBudget {
    limit: usize,
    depth: usize,
}

impl DepthBudget {
    pub const fn new(limit: usize) -> Self {
        DepthBudget { limit, depth: 0 }
    }

    /// Record one more level of recursion.
    ///
    /// The depth is left unchanged when the limit is hit, so the caller must
    /// not call `exit` for a failed `enter`.
    #[inline]
    pub fn enter(&mut self) -> Result<(), DepthExceeded> {
        if self.depth >= self.limit {
            return Err(DepthExceeded { limit: self.limit });
        }
        self.depth += 1;
        Ok(())
    }

    #[inline]
    pub fn exit(&mut self) {
        debug_assert!(self.depth > 0, "DepthBudget::exit without matching enter");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests;
