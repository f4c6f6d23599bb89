//! Opaque typed indices into the session's tables.
//!
//! Each table gets its own newtype so a `TypeId` can never be passed where a
//! `ValueId` is expected. All IDs are dense `u32` indices; `INVALID` is the
//! sentinel used for "no entry".

use std::fmt;
use std::hash::{Hash, Hasher};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Sentinel value for "no entry".
            pub const INVALID: $name = $name(u32::MAX);

            /// Create from a raw index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Create the ID for slot `index` of a table.
            ///
            /// # Panics
            /// Panics if the table has outgrown the 32-bit index space.
            #[inline]
            pub fn from_index(index: usize) -> Self {
                match u32::try_from(index) {
                    Ok(raw) if raw != u32::MAX => Self(raw),
                    _ => panic!("{} table exceeded capacity at {index} entries", stringify!($name)),
                }
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Returns `true` if this is a valid (non-sentinel) ID.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl Hash for $name {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if *self == Self::INVALID {
                    write!(f, "{}::INVALID", stringify!($name))
                } else {
                    write!(f, "{}({})", stringify!($name), self.0)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

define_id!(
    /// Type-specifier node in the MAST.
    TsId
);
define_id!(
    /// Expression node in the MAST.
    ExpId
);
define_id!(
    /// Chain element node in the MAST.
    ElemId
);
define_id!(
    /// Entry in the global definition table.
    DefId
);
define_id!(
    /// Interned, immutable compile-time value.
    ValueId
);
define_id!(
    /// Canonical monomorphic type.
    TypeId
);
define_id!(
    /// Node of the argument-list trie; identifies a whole argument sequence.
    ArgListId
);
define_id!(PolyModId);
define_id!(MonoModId);
define_id!(
    /// Mutable indirection cell referenced by pointer values.
    CellId
);

impl TsId {
    /// The unit type-spec singleton.
    pub const UNIT: TsId = TsId(0);
}

impl ExpId {
    /// The unit expression singleton.
    pub const UNIT: ExpId = ExpId(0);
}

impl ValueId {
    /// The unit value singleton.
    pub const UNIT: ValueId = ValueId(0);
}

impl ArgListId {
    /// The empty argument list (trie root).
    pub const EMPTY: ArgListId = ArgListId(0);
}

/// Primitive types are pre-minted at these fixed indices.
impl TypeId {
    pub const UNIT: TypeId = TypeId(0);
    pub const U1: TypeId = TypeId(1);
    pub const U8: TypeId = TypeId(2);
    pub const U16: TypeId = TypeId(3);
    pub const U32: TypeId = TypeId(4);
    pub const U64: TypeId = TypeId(5);
    pub const S8: TypeId = TypeId(6);
    pub const S16: TypeId = TypeId(7);
    pub const S32: TypeId = TypeId(8);
    pub const S64: TypeId = TypeId(9);
    pub const F32: TypeId = TypeId(10);
    pub const F64: TypeId = TypeId(11);
    pub const STRING: TypeId = TypeId(12);

    /// First index available for compound types.
    pub const FIRST_DYNAMIC: u32 = 13;

    /// Returns `true` for the pre-minted primitive types.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}
