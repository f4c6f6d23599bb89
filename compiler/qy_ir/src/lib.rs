//! Core IR for the Qy monomorphizer.
//!
//! Everything the front-end hands over lives here:
//!
//! - typed IDs for every table in a session ([`ids`])
//! - interned names, split into type-names and value-names ([`Name`], [`StringInterner`])
//! - operators and literal suffixes shared by rewrite and evaluation ([`ops`])
//! - the MAST node arena ([`Mast`])
//! - the global definition table ([`DefTable`])
//! - the error type every crate in the workspace reports through ([`MonoError`])

/// Compile-time size check for hot data structures.
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod defs;
pub mod error;
pub mod ids;
mod interner;
pub mod mast;
mod name;
pub mod ops;

pub use defs::{Def, DefKind, DefTable, DefTarget};
pub use error::{ErrorCategory, MonoError, MonoResult};
pub use ids::{ArgListId, CellId, DefId, ElemId, ExpId, MonoModId, PolyModId, TsId, TypeId, ValueId};
pub use interner::{InternError, StringInterner};
pub use mast::{ActualArg, Elem, Exp, Mast, NodeKind, TypeSpec};
pub use name::Name;
pub use ops::{AllocationTarget, BinaryOp, FloatSuffix, IntSuffix, Ses, UnaryOp};

static_assert_size!(Name, 4);
static_assert_size!(ExpId, 4);
static_assert_size!(Option<DefTarget>, 8);
