//! Global definition table.
//!
//! Every global name the front-end produces is a [`Def`]: a kind, a name and
//! at most one target. Bound variables (module parameters) never get a
//! target; constant definitions get theirs once, either at creation or by a
//! single later [`DefTable::set_target`] (to allow forward references while
//! a module is being built). Definitions are never removed.

use crate::ids::{DefId, ExpId, TsId, TypeId, ValueId};
use crate::{MonoError, MonoResult, Name};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// Bound value parameter of a polymorphic module.
    BvExp,
    /// Bound type parameter of a polymorphic module.
    BvTs,
    /// Constant defined by an expression node.
    ConstExp,
    /// Constant defined by a type-spec node.
    ConstTs,
    /// Fully evaluated value.
    ConstTotVal,
    /// Fully evaluated type.
    ConstTotTid,
}

impl DefKind {
    #[inline]
    pub fn is_bound_var(self) -> bool {
        matches!(self, DefKind::BvExp | DefKind::BvTs)
    }

    #[inline]
    pub fn is_total(self) -> bool {
        matches!(self, DefKind::ConstTotVal | DefKind::ConstTotTid)
    }

    /// Does this kind describe a type (as opposed to a value)?
    #[inline]
    pub fn is_type(self) -> bool {
        matches!(self, DefKind::BvTs | DefKind::ConstTs | DefKind::ConstTotTid)
    }

    fn accepts(self, target: DefTarget) -> bool {
        matches!(
            (self, target),
            (DefKind::ConstExp, DefTarget::Exp(_))
                | (DefKind::ConstTs, DefTarget::Ts(_))
                | (DefKind::ConstTotVal, DefTarget::Value(_))
                | (DefKind::ConstTotTid, DefTarget::Type(_))
        )
    }
}

/// What a constant definition is bound to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefTarget {
    Exp(ExpId),
    Ts(TsId),
    Value(ValueId),
    Type(TypeId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Def {
    pub kind: DefKind,
    pub name: Name,
    target: Option<DefTarget>,
}

impl Def {
    pub fn target(&self) -> Option<DefTarget> {
        self.target
    }
}

#[derive(Default)]
pub struct DefTable {
    defs: Vec<Def>,
}

impl DefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a definition without a target.
    pub fn declare(&mut self, kind: DefKind, name: Name) -> DefId {
        let id = DefId::from_index(self.defs.len());
        self.defs.push(Def { kind, name, target: None });
        id
    }

    pub fn define_bound_var_exp(&mut self, name: Name) -> DefId {
        self.declare(DefKind::BvExp, name)
    }

    pub fn define_bound_var_ts(&mut self, name: Name) -> DefId {
        self.declare(DefKind::BvTs, name)
    }

    /// Declare a `ConstExp` whose body is attached later with `set_target`,
    /// e.g. for self-referential definitions.
    pub fn declare_const_exp(&mut self, name: Name) -> DefId {
        self.declare(DefKind::ConstExp, name)
    }

    pub fn declare_const_ts(&mut self, name: Name) -> DefId {
        self.declare(DefKind::ConstTs, name)
    }

    pub fn define_const_exp(&mut self, name: Name, exp: ExpId) -> DefId {
        self.define(DefKind::ConstExp, name, DefTarget::Exp(exp))
    }

    pub fn define_const_ts(&mut self, name: Name, ts: TsId) -> DefId {
        self.define(DefKind::ConstTs, name, DefTarget::Ts(ts))
    }

    pub fn define_total_value(&mut self, name: Name, value: ValueId) -> DefId {
        self.define(DefKind::ConstTotVal, name, DefTarget::Value(value))
    }

    pub fn define_total_type(&mut self, name: Name, ty: TypeId) -> DefId {
        self.define(DefKind::ConstTotTid, name, DefTarget::Type(ty))
    }

    fn define(&mut self, kind: DefKind, name: Name, target: DefTarget) -> DefId {
        debug_assert!(kind.accepts(target));
        let id = DefId::from_index(self.defs.len());
        self.defs.push(Def {
            kind,
            name,
            target: Some(target),
        });
        id
    }

    /// Bind a declared constant to its target.
    ///
    /// Fails for bound variables, for a second call on the same definition
    /// and for a target that does not match the definition's kind.
    pub fn set_target(&mut self, id: DefId, target: DefTarget) -> MonoResult<()> {
        let def = self
            .defs
            .get_mut(id.index())
            .ok_or_else(|| MonoError::unknown("definition", id.raw()))?;
        if def.target.is_some() {
            return Err(MonoError::TargetAlreadySet { def: id });
        }
        if !def.kind.accepts(target) {
            return Err(MonoError::TargetKindMismatch { def: id, kind: def.kind });
        }
        def.target = Some(target);
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: DefId) -> MonoResult<&Def> {
        self.defs.get(id.index()).ok_or_else(|| MonoError::unknown("definition", id.raw()))
    }

    pub fn kind(&self, id: DefId) -> MonoResult<DefKind> {
        self.get(id).map(|def| def.kind)
    }

    pub fn name(&self, id: DefId) -> MonoResult<Name> {
        self.get(id).map(|def| def.name)
    }

    pub fn is_bound_var(&self, id: DefId) -> MonoResult<bool> {
        self.get(id).map(|def| def.kind.is_bound_var())
    }

    /// The target of a definition, failing if it was never set.
    pub fn target(&self, id: DefId) -> MonoResult<DefTarget> {
        self.get(id)?.target.ok_or(MonoError::TargetUnset { def: id })
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterate over all definitions with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (DefId, &Def)> {
        self.defs.iter().enumerate().map(|(i, def)| (DefId::from_index(i), def))
    }
}
