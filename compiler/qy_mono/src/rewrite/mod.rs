//! Polymorphic-to-monomorphic rewriting (p2m).
//!
//! # Design
//!
//! The rewriter walks polymorphic MAST and produces monomorphic MAST under a
//! [`Substitution`]. Nodes are never edited: an unchanged subtree keeps its
//! ID, a changed one is re-pushed with rewritten children. Global references
//! are where the work happens:
//!
//! - total constants are already monomorphic and stay as they are;
//! - bound variables are replaced through the substitution;
//! - `ConstExp`/`ConstTs` definitions are followed into their bodies. If the
//!   body changes, a fresh definition is minted for the rewritten body so the
//!   original stays valid for other instantiations.
//! - `GetPolyModuleField` nodes have their arguments rewritten and evaluated,
//!   the module is instantiated, and the node becomes a `GetMonoModuleField`.
//!
//! Following definitions can loop (`a = b`, `b = a`, or a recursive
//! function). The visiting set threaded through every call holds the
//! definitions on the current path; reaching one of them again is handled by
//! the session's [`CyclePolicy`].

use qy_ir::{
    ActualArg, DefId, DefKind, DefTarget, ElemId, Elem, Exp, ExpId, MonoError, MonoModId, MonoResult, PolyModId,
    TsId, TypeSpec,
};
use qy_types::Arg;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::eval::Evaluator;
use crate::{CyclePolicy, Session, Substitution};

/// Definitions on the current rewrite path.
pub type Visiting = FxHashSet<DefId>;

pub struct Rewriter<'s, 'a> {
    session: &'s mut Session,
    sub: &'a Substitution,
    policy: CyclePolicy,
    /// Definitions whose rewritten form is already known in this pass.
    memo: FxHashMap<DefId, DefId>,
    /// In-progress definition to the placeholder minted for a back-reference.
    placeholders: FxHashMap<DefId, DefId>,
}

impl<'s, 'a> Rewriter<'s, 'a> {
    pub fn new(session: &'s mut Session, sub: &'a Substitution) -> Self {
        let policy = session.config().cycle_policy;
        Rewriter {
            session,
            sub,
            policy,
            memo: FxHashMap::default(),
            placeholders: FxHashMap::default(),
        }
    }

    /// Pre-seed the memo, e.g. with the poly-field to mono-field mapping of a
    /// module being instantiated.
    #[must_use]
    pub(crate) fn with_memo(mut self, memo: FxHashMap<DefId, DefId>) -> Self {
        self.memo = memo;
        self
    }

    pub fn rewrite_ts(&mut self, ts: TsId) -> MonoResult<TsId> {
        self.ts(ts, &mut Visiting::default())
    }

    pub fn rewrite_exp(&mut self, exp: ExpId) -> MonoResult<ExpId> {
        self.exp(exp, &mut Visiting::default())
    }

    pub fn rewrite_def(&mut self, def: DefId) -> MonoResult<DefId> {
        self.global(def, &mut Visiting::default())
    }

    /// Rewrite the body of `poly_field` into the declared `mono_field`.
    pub(crate) fn define_field(&mut self, poly_field: DefId, mono_field: DefId) -> MonoResult<()> {
        let mut visiting = Visiting::default();
        visiting.insert(poly_field);
        let target = match self.session.defs.target(poly_field)? {
            DefTarget::Exp(exp) => DefTarget::Exp(self.exp(exp, &mut visiting)?),
            DefTarget::Ts(ts) => DefTarget::Ts(self.ts(ts, &mut visiting)?),
            other => {
                return Err(MonoError::invariant(format!("poly field {poly_field:?} targets {other:?}")));
            }
        };
        self.session.defs.set_target(mono_field, target)
    }

    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> MonoResult<T>) -> MonoResult<T> {
        self.session.depth.enter()?;
        let result = qy_stack::ensure_sufficient_stack(|| f(self));
        self.session.depth.exit();
        result
    }

    fn global(&mut self, def: DefId, visiting: &mut Visiting) -> MonoResult<DefId> {
        match self.session.defs.kind(def)? {
            DefKind::ConstTotVal | DefKind::ConstTotTid => Ok(def),
            DefKind::BvExp | DefKind::BvTs => Ok(self.sub.rw_def_id(def)),
            kind @ (DefKind::ConstExp | DefKind::ConstTs) => {
                if let Some(&done) = self.memo.get(&def) {
                    return Ok(done);
                }
                if visiting.contains(&def) {
                    return self.back_reference(def, kind);
                }
                visiting.insert(def);
                let result = self.rewrite_body(def, kind, visiting);
                visiting.remove(&def);
                result
            }
        }
    }

    fn back_reference(&mut self, def: DefId, kind: DefKind) -> MonoResult<DefId> {
        match self.policy {
            CyclePolicy::PassThrough => {
                tracing::debug!(?def, "cycle: leaving reference unexpanded");
                Ok(def)
            }
            CyclePolicy::Rebind => {
                if let Some(&placeholder) = self.placeholders.get(&def) {
                    return Ok(placeholder);
                }
                let name = self.session.defs.name(def)?;
                let placeholder = self.session.defs.declare(kind, name);
                tracing::debug!(?def, ?placeholder, "cycle: rebinding to placeholder");
                self.placeholders.insert(def, placeholder);
                Ok(placeholder)
            }
        }
    }

    fn rewrite_body(&mut self, def: DefId, kind: DefKind, visiting: &mut Visiting) -> MonoResult<DefId> {
        let new_target = match self.session.defs.target(def)? {
            DefTarget::Exp(exp) => {
                let new = self.exp(exp, visiting)?;
                (new != exp).then_some(DefTarget::Exp(new))
            }
            DefTarget::Ts(ts) => {
                let new = self.ts(ts, visiting)?;
                (new != ts).then_some(DefTarget::Ts(new))
            }
            other => return Err(MonoError::invariant(format!("constant {def:?} targets {other:?}"))),
        };

        let result = match (new_target, self.placeholders.remove(&def)) {
            (None, None) => def,
            (Some(target), Some(placeholder)) => {
                self.session.defs.set_target(placeholder, target)?;
                placeholder
            }
            (Some(target), None) => {
                let name = self.session.defs.name(def)?;
                let fresh = self.session.defs.declare(kind, name);
                self.session.defs.set_target(fresh, target)?;
                tracing::trace!(?def, ?fresh, "rewrote definition");
                fresh
            }
            // Referencing the placeholder always changes the body.
            (None, Some(placeholder)) => {
                return Err(MonoError::invariant(format!(
                    "placeholder {placeholder:?} minted for unchanged {def:?}"
                )));
            }
        };
        self.memo.insert(def, result);
        Ok(result)
    }

    fn ts(&mut self, id: TsId, visiting: &mut Visiting) -> MonoResult<TsId> {
        self.descend(|this| this.ts_inner(id, visiting))
    }

    fn ts_inner(&mut self, id: TsId, visiting: &mut Visiting) -> MonoResult<TsId> {
        let rewritten = match self.session.mast.ts(id)?.clone() {
            TypeSpec::Unit
            | TypeSpec::Int(_)
            | TypeSpec::Float(_)
            | TypeSpec::String
            | TypeSpec::LocalId(_)
            | TypeSpec::GetMonoModuleField { .. } => return Ok(id),
            TypeSpec::GlobalId(def) => {
                let new = self.global(def, visiting)?;
                if new == def {
                    return Ok(id);
                }
                TypeSpec::GlobalId(new)
            }
            TypeSpec::Ptr { pointee, is_mut } => {
                let new = self.ts(pointee, visiting)?;
                if new == pointee {
                    return Ok(id);
                }
                TypeSpec::Ptr { pointee: new, is_mut }
            }
            TypeSpec::Array { elem, count, is_mut } => {
                let new_elem = self.ts(elem, visiting)?;
                let new_count = self.exp(count, visiting)?;
                if new_elem == elem && new_count == count {
                    return Ok(id);
                }
                TypeSpec::Array {
                    elem: new_elem,
                    count: new_count,
                    is_mut,
                }
            }
            TypeSpec::Slice { elem, is_mut } => {
                let new = self.ts(elem, visiting)?;
                if new == elem {
                    return Ok(id);
                }
                TypeSpec::Slice { elem: new, is_mut }
            }
            TypeSpec::FuncSgn { arg, ret, ses } => {
                let new_arg = self.ts(arg, visiting)?;
                let new_ret = self.ts(ret, visiting)?;
                if new_arg == arg && new_ret == ret {
                    return Ok(id);
                }
                TypeSpec::FuncSgn {
                    arg: new_arg,
                    ret: new_ret,
                    ses,
                }
            }
            TypeSpec::Tuple(elems) => match self.ts_list(&elems, visiting)? {
                Some(new) => TypeSpec::Tuple(new),
                None => return Ok(id),
            },
            TypeSpec::GetPolyModuleField { module, field, args } => {
                let (module, field) = self.instantiate_ref(module, field, &args, visiting)?;
                TypeSpec::GetMonoModuleField { module, field }
            }
        };
        Ok(self.session.mast.push_ts(rewritten))
    }

    fn exp(&mut self, id: ExpId, visiting: &mut Visiting) -> MonoResult<ExpId> {
        self.descend(|this| this.exp_inner(id, visiting))
    }

    fn exp_inner(&mut self, id: ExpId, visiting: &mut Visiting) -> MonoResult<ExpId> {
        let rewritten = match self.session.mast.exp(id)?.clone() {
            Exp::Unit
            | Exp::Int { .. }
            | Exp::Float { .. }
            | Exp::String(_)
            | Exp::LocalId(_)
            | Exp::GetMonoModuleField { .. } => return Ok(id),
            Exp::GlobalId(def) => {
                let new = self.global(def, visiting)?;
                if new == def {
                    return Ok(id);
                }
                Exp::GlobalId(new)
            }
            Exp::Call { callee, arg, non_tot } => {
                let new_callee = self.exp(callee, visiting)?;
                let new_arg = self.exp(arg, visiting)?;
                if new_callee == callee && new_arg == arg {
                    return Ok(id);
                }
                Exp::Call {
                    callee: new_callee,
                    arg: new_arg,
                    non_tot,
                }
            }
            Exp::Unary { op, arg } => {
                let new = self.exp(arg, visiting)?;
                if new == arg {
                    return Ok(id);
                }
                Exp::Unary { op, arg: new }
            }
            Exp::Binary { op, lhs, rhs } => {
                let new_lhs = self.exp(lhs, visiting)?;
                let new_rhs = self.exp(rhs, visiting)?;
                if new_lhs == lhs && new_rhs == rhs {
                    return Ok(id);
                }
                Exp::Binary {
                    op,
                    lhs: new_lhs,
                    rhs: new_rhs,
                }
            }
            Exp::IfThenElse { cond, then, otherwise } => {
                let new_cond = self.exp(cond, visiting)?;
                let new_then = self.exp(then, visiting)?;
                let new_otherwise = self.exp(otherwise, visiting)?;
                if new_cond == cond && new_then == then && new_otherwise == otherwise {
                    return Ok(id);
                }
                Exp::IfThenElse {
                    cond: new_cond,
                    then: new_then,
                    otherwise: new_otherwise,
                }
            }
            Exp::Tuple(elems) => match self.exp_list(&elems, visiting)? {
                Some(new) => Exp::Tuple(new),
                None => return Ok(id),
            },
            Exp::GetTupleField { tuple, index } => {
                let new = self.exp(tuple, visiting)?;
                if new == tuple {
                    return Ok(id);
                }
                Exp::GetTupleField { tuple: new, index }
            }
            Exp::Lambda { params, body } => {
                let new = self.exp(body, visiting)?;
                if new == body {
                    return Ok(id);
                }
                Exp::Lambda { params, body: new }
            }
            Exp::AllocateOne { init, target, is_mut } => {
                let new = self.exp(init, visiting)?;
                if new == init {
                    return Ok(id);
                }
                Exp::AllocateOne {
                    init: new,
                    target,
                    is_mut,
                }
            }
            Exp::AllocateMany {
                init,
                count,
                target,
                is_mut,
            } => {
                let new_init = self.exp(init, visiting)?;
                let new_count = self.exp(count, visiting)?;
                if new_init == init && new_count == count {
                    return Ok(id);
                }
                Exp::AllocateMany {
                    init: new_init,
                    count: new_count,
                    target,
                    is_mut,
                }
            }
            Exp::Chain { elems, ret } => {
                let new_elems = self.elem_list(&elems, visiting)?;
                let new_ret = self.exp(ret, visiting)?;
                if new_elems.is_none() && new_ret == ret {
                    return Ok(id);
                }
                Exp::Chain {
                    elems: new_elems.unwrap_or(elems),
                    ret: new_ret,
                }
            }
            Exp::Cast { ts, exp } => {
                let new_ts = self.ts(ts, visiting)?;
                let new_exp = self.exp(exp, visiting)?;
                if new_ts == ts && new_exp == exp {
                    return Ok(id);
                }
                Exp::Cast { ts: new_ts, exp: new_exp }
            }
            Exp::GetPolyModuleField { module, field, args } => {
                let (module, field) = self.instantiate_ref(module, field, &args, visiting)?;
                Exp::GetMonoModuleField { module, field }
            }
        };
        Ok(self.session.mast.push_exp(rewritten))
    }

    fn elem(&mut self, id: ElemId, visiting: &mut Visiting) -> MonoResult<ElemId> {
        let rewritten = match self.session.mast.elem(id)?.clone() {
            Elem::BindType { name, init } => {
                let new = self.ts(init, visiting)?;
                if new == init {
                    return Ok(id);
                }
                Elem::BindType { name, init: new }
            }
            Elem::BindValue { name, init } => {
                let new = self.exp(init, visiting)?;
                if new == init {
                    return Ok(id);
                }
                Elem::BindValue { name, init: new }
            }
            Elem::Discard(exp) => {
                let new = self.exp(exp, visiting)?;
                if new == exp {
                    return Ok(id);
                }
                Elem::Discard(new)
            }
        };
        Ok(self.session.mast.push_elem(rewritten))
    }

    /// Rewrite each element; `None` when none of them changed.
    fn ts_list(&mut self, ids: &[TsId], visiting: &mut Visiting) -> MonoResult<Option<Vec<TsId>>> {
        let new = ids.iter().map(|&id| self.ts(id, visiting)).collect::<MonoResult<Vec<_>>>()?;
        Ok((new.as_slice() != ids).then_some(new))
    }

    fn exp_list(&mut self, ids: &[ExpId], visiting: &mut Visiting) -> MonoResult<Option<Vec<ExpId>>> {
        let new = ids.iter().map(|&id| self.exp(id, visiting)).collect::<MonoResult<Vec<_>>>()?;
        Ok((new.as_slice() != ids).then_some(new))
    }

    fn elem_list(&mut self, ids: &[ElemId], visiting: &mut Visiting) -> MonoResult<Option<Vec<ElemId>>> {
        let new = ids.iter().map(|&id| self.elem(id, visiting)).collect::<MonoResult<Vec<_>>>()?;
        Ok((new.as_slice() != ids).then_some(new))
    }

    /// Evaluate the actual arguments, instantiate `module` with them and
    /// resolve `field` in the instance.
    fn instantiate_ref(
        &mut self,
        module: PolyModId,
        field: DefId,
        args: &[ActualArg],
        visiting: &mut Visiting,
    ) -> MonoResult<(MonoModId, DefId)> {
        let mut actuals = Vec::with_capacity(args.len());
        for arg in args {
            let actual = match *arg {
                ActualArg::Type(ts) => {
                    let mono_ts = self.ts(ts, visiting)?;
                    Arg::Type(Evaluator::new(self.session, None).eval_ts(mono_ts)?)
                }
                ActualArg::Value(exp) => {
                    let mono_exp = self.exp(exp, visiting)?;
                    Arg::Value(Evaluator::new(self.session, None).eval_exp(mono_exp)?)
                }
            };
            actuals.push(actual);
        }
        let session = &mut *self.session;
        let list = session.arg_lists.from_args(&session.values, &actuals)?;
        let mono = session.instantiate_poly_mod(module, list)?;
        let mono_field = session.modules.mono_field_for(mono, field)?;
        Ok((mono, mono_field))
    }
}

#[cfg(test)]
mod tests;
