//! Substitution of bound variables by total constants.
//!
//! Built once per module instantiation and dropped after the module's fields
//! are rewritten. Every entry is validated on insertion: the key must be a
//! bound variable and the replacement a total constant of the matching sort.

use qy_ir::{DefId, DefKind, DefTable, MonoError, MonoResult};
use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: FxHashMap<DefId, DefId>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, defs: &DefTable, bound: DefId, replacement: DefId) -> MonoResult<()> {
        let invalid = |reason| MonoError::InvalidSubstitution {
            bound,
            replacement,
            reason,
        };
        let bound_kind = defs.kind(bound)?;
        let replacement_kind = defs.kind(replacement)?;
        if !bound_kind.is_bound_var() {
            return Err(invalid("only bound variables can be substituted"));
        }
        if !replacement_kind.is_total() {
            return Err(invalid("replacement must be a total constant"));
        }
        let sorts_match = matches!(
            (bound_kind, replacement_kind),
            (DefKind::BvExp, DefKind::ConstTotVal) | (DefKind::BvTs, DefKind::ConstTotTid)
        );
        if !sorts_match {
            return Err(invalid("replacement sort does not match the bound variable"));
        }
        if self.map.contains_key(&bound) {
            return Err(invalid("bound variable is already substituted"));
        }
        self.map.insert(bound, replacement);
        Ok(())
    }

    /// The replacement for `def`, or `def` itself when it has none.
    #[inline]
    pub fn rw_def_id(&self, def: DefId) -> DefId {
        self.map.get(&def).copied().unwrap_or(def)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
