//! Interned identifier.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Interned string identifier.
///
/// Layout: bit 31 marks a type-name, bits 30-0 index the interner's string
/// storage. The same spelling interned as a type-name and as a value-name
/// yields two different `Name`s.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    const TYPE_BIT: u32 = 1 << 31;

    /// Maximum string index.
    pub const MAX_INDEX: u32 = Self::TYPE_BIT - 1;

    #[inline]
    pub(crate) const fn new(index: u32, is_type: bool) -> Self {
        debug_assert!(index <= Self::MAX_INDEX);
        if is_type {
            Name(index | Self::TYPE_BIT)
        } else {
            Name(index)
        }
    }

    /// Index into the interner's string storage.
    #[inline]
    pub const fn index(self) -> usize {
        (self.0 & Self::MAX_INDEX) as usize
    }

    #[inline]
    pub const fn is_type_name(self) -> bool {
        self.0 & Self::TYPE_BIT != 0
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Hash for Name {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let space = if self.is_type_name() { "type" } else { "value" };
        write!(f, "Name({space}#{})", self.index())
    }
}
