//! MAST: the arena of type-specifier, expression and chain-element nodes.
//!
//! # Design
//!
//! Each node category is a closed enum stored in its own `Vec`, addressed by
//! its own ID type ([`TsId`], [`ExpId`], [`ElemId`]). Nodes are immutable once
//! pushed: the rewrite pass never edits a node in place, it pushes a new one.
//! The arena only grows.
//!
//! Two singleton nodes exist from construction: [`TsId::UNIT`] and
//! [`ExpId::UNIT`].
//!
//! # Identifiers
//!
//! `LocalId` nodes name chain bindings and lambda parameters and are resolved
//! against the evaluation stack. `GlobalId` nodes reference the definition
//! table and are where substitution and module instantiation hook in.

mod visit;

use crate::ids::{DefId, ElemId, ExpId, MonoModId, PolyModId, TsId};
use crate::ops::{AllocationTarget, BinaryOp, FloatSuffix, IntSuffix, Ses, UnaryOp};
use crate::{MonoError, MonoResult, Name};

/// An actual argument supplied to a polymorphic module.
#[derive(Clone, Debug, PartialEq)]
pub enum ActualArg {
    Type(TsId),
    Value(ExpId),
}

/// Type-specifier node.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeSpec {
    Unit,
    Int(IntSuffix),
    Float(FloatSuffix),
    String,
    LocalId(Name),
    GlobalId(DefId),
    Ptr {
        pointee: TsId,
        is_mut: bool,
    },
    Array {
        elem: TsId,
        count: ExpId,
        is_mut: bool,
    },
    Slice {
        elem: TsId,
        is_mut: bool,
    },
    FuncSgn {
        arg: TsId,
        ret: TsId,
        ses: Ses,
    },
    Tuple(Vec<TsId>),
    GetPolyModuleField {
        module: PolyModId,
        field: DefId,
        args: Vec<ActualArg>,
    },
    GetMonoModuleField {
        module: MonoModId,
        field: DefId,
    },
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Exp {
    Unit,
    Int {
        mantissa: u64,
        is_neg: bool,
        suffix: IntSuffix,
    },
    Float {
        value: f64,
        suffix: FloatSuffix,
    },
    String(Vec<char>),
    LocalId(Name),
    GlobalId(DefId),
    /// `non_tot` marks a call to a function that is not total.
    Call {
        callee: ExpId,
        arg: ExpId,
        non_tot: bool,
    },
    Unary {
        op: UnaryOp,
        arg: ExpId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExpId,
        rhs: ExpId,
    },
    IfThenElse {
        cond: ExpId,
        then: ExpId,
        otherwise: ExpId,
    },
    Tuple(Vec<ExpId>),
    GetTupleField {
        tuple: ExpId,
        index: usize,
    },
    Lambda {
        params: Vec<Name>,
        body: ExpId,
    },
    AllocateOne {
        init: ExpId,
        target: AllocationTarget,
        is_mut: bool,
    },
    AllocateMany {
        init: ExpId,
        count: ExpId,
        target: AllocationTarget,
        is_mut: bool,
    },
    Chain {
        elems: Vec<ElemId>,
        ret: ExpId,
    },
    Cast {
        ts: TsId,
        exp: ExpId,
    },
    GetPolyModuleField {
        module: PolyModId,
        field: DefId,
        args: Vec<ActualArg>,
    },
    GetMonoModuleField {
        module: MonoModId,
        field: DefId,
    },
}

/// Chain element node.
#[derive(Clone, Debug, PartialEq)]
pub enum Elem {
    BindType { name: Name, init: TsId },
    BindValue { name: Name, init: ExpId },
    /// Evaluate for effect and drop the result.
    Discard(ExpId),
}

/// Flat tag over every node category, for diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TsUnit,
    TsInt,
    TsFloat,
    TsString,
    TsLocalId,
    TsGlobalId,
    TsPtr,
    TsArray,
    TsSlice,
    TsFuncSgn,
    TsTuple,
    TsGetPolyModuleField,
    TsGetMonoModuleField,
    ExpUnit,
    ExpInt,
    ExpFloat,
    ExpString,
    ExpLocalId,
    ExpGlobalId,
    ExpCall,
    ExpUnary,
    ExpBinary,
    ExpIfThenElse,
    ExpTuple,
    ExpGetTupleField,
    ExpLambda,
    ExpAllocateOne,
    ExpAllocateMany,
    ExpChain,
    ExpCast,
    ExpGetPolyModuleField,
    ExpGetMonoModuleField,
    ElemBindType,
    ElemBindValue,
    ElemDiscard,
}

impl TypeSpec {
    pub fn kind(&self) -> NodeKind {
        match self {
            TypeSpec::Unit => NodeKind::TsUnit,
            TypeSpec::Int(_) => NodeKind::TsInt,
            TypeSpec::Float(_) => NodeKind::TsFloat,
            TypeSpec::String => NodeKind::TsString,
            TypeSpec::LocalId(_) => NodeKind::TsLocalId,
            TypeSpec::GlobalId(_) => NodeKind::TsGlobalId,
            TypeSpec::Ptr { .. } => NodeKind::TsPtr,
            TypeSpec::Array { .. } => NodeKind::TsArray,
            TypeSpec::Slice { .. } => NodeKind::TsSlice,
            TypeSpec::FuncSgn { .. } => NodeKind::TsFuncSgn,
            TypeSpec::Tuple(_) => NodeKind::TsTuple,
            TypeSpec::GetPolyModuleField { .. } => NodeKind::TsGetPolyModuleField,
            TypeSpec::GetMonoModuleField { .. } => NodeKind::TsGetMonoModuleField,
        }
    }
}

impl Exp {
    pub fn kind(&self) -> NodeKind {
        match self {
            Exp::Unit => NodeKind::ExpUnit,
            Exp::Int { .. } => NodeKind::ExpInt,
            Exp::Float { .. } => NodeKind::ExpFloat,
            Exp::String(_) => NodeKind::ExpString,
            Exp::LocalId(_) => NodeKind::ExpLocalId,
            Exp::GlobalId(_) => NodeKind::ExpGlobalId,
            Exp::Call { .. } => NodeKind::ExpCall,
            Exp::Unary { .. } => NodeKind::ExpUnary,
            Exp::Binary { .. } => NodeKind::ExpBinary,
            Exp::IfThenElse { .. } => NodeKind::ExpIfThenElse,
            Exp::Tuple(_) => NodeKind::ExpTuple,
            Exp::GetTupleField { .. } => NodeKind::ExpGetTupleField,
            Exp::Lambda { .. } => NodeKind::ExpLambda,
            Exp::AllocateOne { .. } => NodeKind::ExpAllocateOne,
            Exp::AllocateMany { .. } => NodeKind::ExpAllocateMany,
            Exp::Chain { .. } => NodeKind::ExpChain,
            Exp::Cast { .. } => NodeKind::ExpCast,
            Exp::GetPolyModuleField { .. } => NodeKind::ExpGetPolyModuleField,
            Exp::GetMonoModuleField { .. } => NodeKind::ExpGetMonoModuleField,
        }
    }
}

impl Elem {
    pub fn kind(&self) -> NodeKind {
        match self {
            Elem::BindType { .. } => NodeKind::ElemBindType,
            Elem::BindValue { .. } => NodeKind::ElemBindValue,
            Elem::Discard(_) => NodeKind::ElemDiscard,
        }
    }
}

/// Arena owning every MAST node of a session.
pub struct Mast {
    type_specs: Vec<TypeSpec>,
    exps: Vec<Exp>,
    elems: Vec<Elem>,
}

impl Mast {
    pub fn new() -> Self {
        Mast {
            type_specs: vec![TypeSpec::Unit],
            exps: vec![Exp::Unit],
            elems: Vec::new(),
        }
    }

    /// Push a type-spec node. `TypeSpec::Unit` returns the singleton.
    pub fn push_ts(&mut self, ts: TypeSpec) -> TsId {
        if matches!(ts, TypeSpec::Unit) {
            return TsId::UNIT;
        }
        let id = TsId::from_index(self.type_specs.len());
        self.type_specs.push(ts);
        id
    }

    /// Push an expression node. `Exp::Unit` returns the singleton.
    pub fn push_exp(&mut self, exp: Exp) -> ExpId {
        if matches!(exp, Exp::Unit) {
            return ExpId::UNIT;
        }
        let id = ExpId::from_index(self.exps.len());
        self.exps.push(exp);
        id
    }

    pub fn push_elem(&mut self, elem: Elem) -> ElemId {
        let id = ElemId::from_index(self.elems.len());
        self.elems.push(elem);
        id
    }

    #[inline]
    pub fn ts(&self, id: TsId) -> MonoResult<&TypeSpec> {
        self.type_specs.get(id.index()).ok_or_else(|| MonoError::unknown("type-spec", id.raw()))
    }

    #[inline]
    pub fn exp(&self, id: ExpId) -> MonoResult<&Exp> {
        self.exps.get(id.index()).ok_or_else(|| MonoError::unknown("expression", id.raw()))
    }

    #[inline]
    pub fn elem(&self, id: ElemId) -> MonoResult<&Elem> {
        self.elems.get(id.index()).ok_or_else(|| MonoError::unknown("chain element", id.raw()))
    }

    /// Shorthand for an integer literal.
    pub fn int(&mut self, value: i64, suffix: IntSuffix) -> ExpId {
        self.push_exp(Exp::Int {
            mantissa: value.unsigned_abs(),
            is_neg: value < 0,
            suffix,
        })
    }

    /// Total node count across all categories.
    pub fn len(&self) -> usize {
        self.type_specs.len() + self.exps.len() + self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Mast {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
