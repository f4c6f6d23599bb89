//! Canonical argument lists and types.
//!
//! Both tables hash-cons: asking twice for a structurally equal list or type
//! returns the same ID, so ID equality is structural equality.
//!
//! - [`ArgListTrie`]: sequences of type/value arguments as paths in a prefix
//!   trie. Used as the key for tuple types and module instantiations.
//! - [`TypePool`]: primitive types at fixed IDs plus memoized compound types.

mod arg_list;
mod pool;

pub use arg_list::{Arg, ArgListTrie};
pub use pool::{float_type, int_type, TypeData, TypeKind, TypePool};
