//! String interner for identifiers.
//!
//! Each session owns one interner; it is not shared across threads. Strings
//! are stored once, and each namespace (type-names, value-names) keeps its
//! own lookup map into that storage.

use crate::Name;
use rustc_hash::FxHashMap;

/// Error when interning a string fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    #[error("interner exceeded capacity: {count} strings, max is {max}", max = Name::MAX_INDEX)]
    Overflow { count: usize },
}

#[derive(Default)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    /// Spelling to storage index, for strings interned as type-names.
    types: FxHashMap<Box<str>, u32>,
    /// Spelling to storage index, for strings interned as value-names.
    values: FxHashMap<Box<str>, u32>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s` as a type-name.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity. Use `try_intern_type` for
    /// fallible interning.
    #[inline]
    pub fn intern_type(&mut self, s: &str) -> Name {
        self.try_intern_type(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Intern `s` as a value-name.
    ///
    /// # Panics
    /// Panics if the interner exceeds capacity.
    #[inline]
    pub fn intern_value(&mut self, s: &str) -> Name {
        self.try_intern_value(s).unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn try_intern_type(&mut self, s: &str) -> Result<Name, InternError> {
        self.try_intern(s, true)
    }

    pub fn try_intern_value(&mut self, s: &str) -> Result<Name, InternError> {
        self.try_intern(s, false)
    }

    fn try_intern(&mut self, s: &str, is_type: bool) -> Result<Name, InternError> {
        let map = if is_type { &self.types } else { &self.values };
        if let Some(&index) = map.get(s) {
            return Ok(Name::new(index, is_type));
        }

        let count = self.strings.len();
        let index = u32::try_from(count)
            .ok()
            .filter(|&i| i <= Name::MAX_INDEX)
            .ok_or(InternError::Overflow { count })?;
        self.strings.push(s.into());
        let map = if is_type { &mut self.types } else { &mut self.values };
        map.insert(s.into(), index);
        Ok(Name::new(index, is_type))
    }

    /// Look up the spelling of an interned name.
    ///
    /// Returns `"<unknown>"` for a name minted by a different interner.
    pub fn lookup(&self, name: Name) -> &str {
        self.strings.get(name.index()).map_or("<unknown>", |s| s)
    }

    /// Number of stored strings (a spelling used in both namespaces counts twice).
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
