//! Compile-time values for the Qy monomorphizer.
//!
//! - [`ValueTable`]: append-only store of immutable values with structural
//!   equality (serialize, hash, compare).
//! - [`CellStore`]: mutable indirection cells that pointer values refer to.

mod cell;
mod value;

pub use cell::CellStore;
pub use value::{
    Capture, Closure, LocalBinding, PointerInfo, ValueData, ValueKind, ValueTable, DEFAULT_MAX_HASH_BYTES,
    MIN_MAX_HASH_BYTES,
};
