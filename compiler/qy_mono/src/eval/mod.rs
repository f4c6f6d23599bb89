//! Evaluation of monomorphic MAST (`eval_mono`).
//!
//! Strict, depth-first evaluation of type-specs to canonical [`TypeId`]s and
//! expressions to canonical [`ValueId`]s. The evaluator owns a lexical
//! [`Stack`] and borrows the session mutably: it interns every value and
//! type it produces and evaluates global definitions through the session,
//! which caches them.
//!
//! The input must already be monomorphic. A `GetPolyModuleField` node or a
//! bound variable reaching this point means the p2m pass was skipped.

mod cast;
mod operators;
mod scope_guard;
mod stack;

pub use stack::{FrameKind, Stack};

use qy_ir::{
    DefId, Elem, ElemId, Exp, ExpId, FloatSuffix, IntSuffix, MonoError, MonoModId, MonoResult, Name, TsId, TypeId,
    TypeSpec, ValueId,
};
use qy_types::{float_type, int_type};
use qy_values::{Capture, Closure, LocalBinding, PointerInfo, ValueData, ValueTable};

use crate::Session;

/// Serialized size of one pointer element of an allocate-many slice.
const POINTER_BYTES: u64 = 8;

pub(crate) struct Evaluator<'s> {
    pub(crate) session: &'s mut Session,
    pub(crate) stack: Stack,
    /// Mono module whose code is running; lambdas register against it.
    module: Option<MonoModId>,
}

impl<'s> Evaluator<'s> {
    pub(crate) fn new(session: &'s mut Session, module: Option<MonoModId>) -> Self {
        Evaluator {
            session,
            stack: Stack::new(),
            module,
        }
    }

    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> MonoResult<T>) -> MonoResult<T> {
        self.session.depth.enter()?;
        let result = qy_stack::ensure_sufficient_stack(|| f(self));
        self.session.depth.exit();
        result
    }

    pub(crate) fn eval_ts(&mut self, id: TsId) -> MonoResult<TypeId> {
        self.descend(|this| this.eval_ts_inner(id))
    }

    pub(crate) fn eval_exp(&mut self, id: ExpId) -> MonoResult<ValueId> {
        self.descend(|this| this.eval_exp_inner(id))
    }

    fn eval_ts_inner(&mut self, id: TsId) -> MonoResult<TypeId> {
        match self.session.mast.ts(id)?.clone() {
            TypeSpec::Unit => Ok(TypeId::UNIT),
            TypeSpec::Int(suffix) => Ok(int_type(suffix)),
            TypeSpec::Float(suffix) => Ok(float_type(suffix)),
            TypeSpec::String => Ok(TypeId::STRING),
            TypeSpec::LocalId(name) => self.stack.lookup_type(name),
            TypeSpec::GlobalId(def) => self.global_type(def, None),
            TypeSpec::Ptr { pointee, is_mut } => {
                let pointee = self.eval_ts(pointee)?;
                Ok(self.session.types.pointer(pointee, is_mut))
            }
            TypeSpec::Array { elem, count, is_mut } => {
                let elem = self.eval_ts(elem)?;
                let count = self.eval_exp(count)?;
                self.session.values.as_count(count)?;
                let session = &mut *self.session;
                session.types.array(&mut session.arg_lists, &session.values, elem, count, is_mut)
            }
            TypeSpec::Slice { elem, is_mut } => {
                let elem = self.eval_ts(elem)?;
                Ok(self.session.types.slice(elem, is_mut))
            }
            TypeSpec::FuncSgn { arg, ret, ses } => {
                let arg = self.eval_ts(arg)?;
                let ret = self.eval_ts(ret)?;
                Ok(self.session.types.function(arg, ret, ses))
            }
            TypeSpec::Tuple(elems) => {
                let elems = elems.iter().map(|&e| self.eval_ts(e)).collect::<MonoResult<Vec<_>>>()?;
                let session = &mut *self.session;
                session.types.tuple_of(&mut session.arg_lists, &elems)
            }
            TypeSpec::GetPolyModuleField { .. } => Err(MonoError::PolyFieldInEval),
            TypeSpec::GetMonoModuleField { module, field } => self.global_type(field, Some(module)),
        }
    }

    fn eval_exp_inner(&mut self, id: ExpId) -> MonoResult<ValueId> {
        let node = self.session.mast.exp(id)?.clone();
        tracing::trace!(?id, kind = ?node.kind(), "eval");
        match node {
            Exp::Unit => Ok(ValueId::UNIT),
            Exp::Int { mantissa, is_neg, suffix } => Ok(int_literal(&mut self.session.values, mantissa, is_neg, suffix)),
            Exp::Float { value, suffix } => Ok(float_literal(&mut self.session.values, value, suffix)),
            Exp::String(chars) => self.session.values.push_string(chars),
            Exp::LocalId(name) => self.stack.lookup_value(name),
            Exp::GlobalId(def) => self.global_value(def, None),
            Exp::Call { callee, arg, non_tot } => {
                if non_tot {
                    return Err(MonoError::NonTotalCall);
                }
                let callee = self.eval_exp(callee)?;
                let arg = self.eval_exp(arg)?;
                self.call(callee, arg)
            }
            Exp::Unary { op, arg } => {
                let arg = self.eval_exp(arg)?;
                let session = &mut *self.session;
                operators::evaluate_unary(&mut session.values, &session.cells, op, arg)
            }
            Exp::Binary { op, lhs, rhs } => {
                let lhs = self.eval_exp(lhs)?;
                let rhs = self.eval_exp(rhs)?;
                operators::evaluate_binary(&mut self.session.values, op, lhs, rhs)
            }
            Exp::IfThenElse { cond, then, otherwise } => {
                let cond = self.eval_exp(cond)?;
                if self.session.values.as_u1(cond)? {
                    self.eval_exp(then)
                } else {
                    self.eval_exp(otherwise)
                }
            }
            Exp::Tuple(elems) => {
                let elems = elems.iter().map(|&e| self.eval_exp(e)).collect::<MonoResult<Vec<_>>>()?;
                self.session.values.push_tuple(elems)
            }
            Exp::GetTupleField { tuple, index } => {
                let tuple = self.eval_exp(tuple)?;
                match self.session.values.data(tuple)? {
                    ValueData::Tuple(_) => self.session.values.seq_elem(tuple, index),
                    other => Err(MonoError::invariant(format!(
                        "tuple field access on a {:?} value",
                        other.kind()
                    ))),
                }
            }
            Exp::Lambda { params, body } => self.lambda(id, params, body),
            Exp::AllocateOne { init, target, is_mut } => {
                let init = self.eval_exp(init)?;
                let cell = self.session.cells.push(init);
                Ok(self.session.values.push_pointer(PointerInfo { cell, target, is_mut }))
            }
            Exp::AllocateMany {
                init,
                count,
                target,
                is_mut,
            } => {
                let init = self.eval_exp(init)?;
                let count = self.eval_exp(count)?;
                let count = self.session.values.as_count(count)?;
                let limit = self.session.values.max_hash_bytes();
                let bytes = count.saturating_mul(POINTER_BYTES);
                if bytes > u64::try_from(limit).unwrap_or(u64::MAX) {
                    return Err(MonoError::ValueTooLarge {
                        bytes: usize::try_from(bytes).unwrap_or(usize::MAX),
                        limit,
                    });
                }
                let session = &mut *self.session;
                let pointers = (0..count)
                    .map(|_| {
                        let cell = session.cells.push(init);
                        session.values.push_pointer(PointerInfo { cell, target, is_mut })
                    })
                    .collect();
                session.values.push_slice(pointers)
            }
            Exp::Chain { elems, ret } => self.with_frame(FrameKind::Block, |scoped| {
                for &elem in &elems {
                    scoped.eval_elem(elem)?;
                }
                scoped.eval_exp(ret)
            }),
            Exp::Cast { ts, exp } => {
                let ty = self.eval_ts(ts)?;
                let value = self.eval_exp(exp)?;
                let session = &mut *self.session;
                cast::cast_value(&mut session.values, &session.types, value, ty)
            }
            Exp::GetPolyModuleField { .. } => Err(MonoError::PolyFieldInEval),
            Exp::GetMonoModuleField { module, field } => self.global_value(field, Some(module)),
        }
    }

    fn eval_elem(&mut self, id: ElemId) -> MonoResult<()> {
        match self.session.mast.elem(id)?.clone() {
            Elem::BindType { name, init } => {
                let ty = self.eval_ts(init)?;
                self.stack.define_type(name, ty);
            }
            Elem::BindValue { name, init } => {
                let value = self.eval_exp(init)?;
                self.stack.define_value(name, value);
            }
            Elem::Discard(exp) => {
                self.eval_exp(exp)?;
            }
        }
        Ok(())
    }

    fn global_value(&mut self, def: DefId, module: Option<MonoModId>) -> MonoResult<ValueId> {
        match self.session.eval_global(def, module.or(self.module))? {
            LocalBinding::Value(value) => Ok(value),
            LocalBinding::Type(_) => Err(MonoError::invariant(format!("type definition {def:?} used as a value"))),
        }
    }

    fn global_type(&mut self, def: DefId, module: Option<MonoModId>) -> MonoResult<TypeId> {
        match self.session.eval_global(def, module.or(self.module))? {
            LocalBinding::Type(ty) => Ok(ty),
            LocalBinding::Value(_) => Err(MonoError::invariant(format!("value definition {def:?} used as a type"))),
        }
    }

    /// Build a closure over the free locals of `body` and register the
    /// lambda with the running module.
    fn lambda(&mut self, id: ExpId, params: Vec<Name>, body: ExpId) -> MonoResult<ValueId> {
        let captures = self
            .session
            .mast
            .free_locals(&params, body)?
            .into_iter()
            .map(|name| self.stack.lookup(name).map(|binding| Capture { name, binding }))
            .collect::<MonoResult<Vec<_>>>()?;
        if let Some(module) = self.module {
            self.session.modules.register_lambda(module, id)?;
        }
        Ok(self.session.values.push_function(Closure {
            params,
            body,
            captures,
            module: self.module,
        }))
    }

    fn call(&mut self, callee: ValueId, arg: ValueId) -> MonoResult<ValueId> {
        let closure = self.session.values.func_info(callee)?.clone();
        let params = bind_params(&self.session.values, &closure.params, arg)?;
        let caller_module = self.module;
        self.module = closure.module.or(caller_module);
        let result = self.with_frame(FrameKind::Call, |scoped| {
            for capture in &closure.captures {
                scoped.stack.define(capture.name, capture.binding);
            }
            for (name, value) in params {
                scoped.stack.define_value(name, value);
            }
            scoped.eval_exp(closure.body)
        });
        self.module = caller_module;
        result
    }
}

/// Pair parameters with the argument: one parameter takes it whole, several
/// destructure a tuple of equal arity, none ignore it.
fn bind_params(values: &ValueTable, params: &[Name], arg: ValueId) -> MonoResult<Vec<(Name, ValueId)>> {
    match params {
        [] => Ok(Vec::new()),
        [single] => Ok(vec![(*single, arg)]),
        _ => {
            let elems = match values.data(arg)? {
                ValueData::Tuple(elems) => elems,
                other => {
                    return Err(MonoError::invariant(format!(
                        "{} parameters need a tuple argument, found {:?}",
                        params.len(),
                        other.kind()
                    )));
                }
            };
            if elems.len() != params.len() {
                return Err(MonoError::ArityMismatch {
                    expected: params.len(),
                    found: elems.len(),
                });
            }
            Ok(params.iter().copied().zip(elems.iter().copied()).collect())
        }
    }
}

/// Intern an integer literal, wrapping the magnitude into the suffix width.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    reason = "literals wrap into the width named by their suffix"
)]
fn int_literal(values: &mut ValueTable, mantissa: u64, is_neg: bool, suffix: IntSuffix) -> ValueId {
    let bits = if is_neg { mantissa.wrapping_neg() } else { mantissa };
    match suffix {
        IntSuffix::U1 => values.push_u1(bits & 1 == 1),
        IntSuffix::U8 => values.push_u8(bits as u8),
        IntSuffix::U16 => values.push_u16(bits as u16),
        IntSuffix::U32 => values.push_u32(bits as u32),
        IntSuffix::U64 => values.push_u64(bits),
        IntSuffix::S8 => values.push_s8(bits as i8),
        IntSuffix::S16 => values.push_s16(bits as i16),
        IntSuffix::S32 => values.push_s32(bits as i32),
        IntSuffix::S64 => values.push_s64(bits as i64),
    }
}

#[allow(clippy::cast_possible_truncation, reason = "f32 literals round from f64")]
fn float_literal(values: &mut ValueTable, value: f64, suffix: FloatSuffix) -> ValueId {
    match suffix {
        FloatSuffix::F32 => values.push_f32(value as f32),
        FloatSuffix::F64 => values.push_f64(value),
    }
}
