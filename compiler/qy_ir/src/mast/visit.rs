//! Free-variable analysis over the MAST.

use rustc_hash::FxHashSet;

use super::{ActualArg, Elem, Exp, Mast, TypeSpec};
use crate::ids::{ElemId, ExpId, TsId};
use crate::{MonoResult, Name};

impl Mast {
    /// Local names a lambda body refers to without binding them itself.
    ///
    /// `params` are bound for the whole body. Names are returned in order of
    /// first occurrence, without duplicates. Global references are not
    /// locals and never appear.
    pub fn free_locals(&self, params: &[Name], body: ExpId) -> MonoResult<Vec<Name>> {
        let mut walker = FreeLocals {
            mast: self,
            bound: params.to_vec(),
            seen: FxHashSet::default(),
            free: Vec::new(),
        };
        walker.exp(body)?;
        Ok(walker.free)
    }
}

struct FreeLocals<'a> {
    mast: &'a Mast,
    /// Names in scope at the current point, innermost last.
    bound: Vec<Name>,
    seen: FxHashSet<Name>,
    free: Vec<Name>,
}

impl FreeLocals<'_> {
    fn use_name(&mut self, name: Name) {
        if !self.bound.contains(&name) && self.seen.insert(name) {
            self.free.push(name);
        }
    }

    fn args(&mut self, args: &[ActualArg]) -> MonoResult<()> {
        for arg in args {
            match *arg {
                ActualArg::Type(ts) => self.ts(ts)?,
                ActualArg::Value(exp) => self.exp(exp)?,
            }
        }
        Ok(())
    }

    fn ts(&mut self, id: TsId) -> MonoResult<()> {
        let mast = self.mast;
        qy_stack::ensure_sufficient_stack(|| match mast.ts(id)? {
            TypeSpec::Unit
            | TypeSpec::Int(_)
            | TypeSpec::Float(_)
            | TypeSpec::String
            | TypeSpec::GlobalId(_)
            | TypeSpec::GetMonoModuleField { .. } => Ok(()),
            TypeSpec::LocalId(name) => {
                self.use_name(*name);
                Ok(())
            }
            TypeSpec::Ptr { pointee: elem, .. } | TypeSpec::Slice { elem, .. } => self.ts(*elem),
            TypeSpec::Array { elem, count, .. } => {
                self.ts(*elem)?;
                self.exp(*count)
            }
            TypeSpec::FuncSgn { arg, ret, .. } => {
                self.ts(*arg)?;
                self.ts(*ret)
            }
            TypeSpec::Tuple(elems) => elems.iter().try_for_each(|&e| self.ts(e)),
            TypeSpec::GetPolyModuleField { args, .. } => self.args(args),
        })
    }

    fn exp(&mut self, id: ExpId) -> MonoResult<()> {
        let mast = self.mast;
        qy_stack::ensure_sufficient_stack(|| match mast.exp(id)? {
            Exp::Unit
            | Exp::Int { .. }
            | Exp::Float { .. }
            | Exp::String(_)
            | Exp::GlobalId(_)
            | Exp::GetMonoModuleField { .. } => Ok(()),
            Exp::LocalId(name) => {
                self.use_name(*name);
                Ok(())
            }
            Exp::Call { callee: a, arg: b, .. }
            | Exp::Binary { lhs: a, rhs: b, .. }
            | Exp::AllocateMany { init: a, count: b, .. } => {
                self.exp(*a)?;
                self.exp(*b)
            }
            Exp::Unary { arg, .. }
            | Exp::GetTupleField { tuple: arg, .. }
            | Exp::AllocateOne { init: arg, .. } => self.exp(*arg),
            Exp::IfThenElse { cond, then, otherwise } => {
                self.exp(*cond)?;
                self.exp(*then)?;
                self.exp(*otherwise)
            }
            Exp::Tuple(elems) => elems.iter().try_for_each(|&e| self.exp(e)),
            Exp::Lambda { params, body } => {
                let mark = self.bound.len();
                self.bound.extend_from_slice(params);
                let result = self.exp(*body);
                self.bound.truncate(mark);
                result
            }
            Exp::Chain { elems, ret } => {
                let mark = self.bound.len();
                let result = self.chain(elems, *ret);
                self.bound.truncate(mark);
                result
            }
            Exp::Cast { ts, exp } => {
                self.ts(*ts)?;
                self.exp(*exp)
            }
            Exp::GetPolyModuleField { args, .. } => self.args(args),
        })
    }

    fn chain(&mut self, elems: &[ElemId], ret: ExpId) -> MonoResult<()> {
        let mast = self.mast;
        for &elem in elems {
            match mast.elem(elem)? {
                Elem::BindType { name, init } => {
                    self.ts(*init)?;
                    self.bound.push(*name);
                }
                Elem::BindValue { name, init } => {
                    self.exp(*init)?;
                    self.bound.push(*name);
                }
                Elem::Discard(exp) => self.exp(*exp)?,
            }
        }
        self.exp(ret)
    }
}
