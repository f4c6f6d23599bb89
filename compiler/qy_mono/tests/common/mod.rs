//! Shared helpers for building small programs directly in MAST.

#![allow(dead_code)]

use qy_ir::{BinaryOp, DefId, DefTarget, Exp, ExpId, IntSuffix, Name, PolyModId, TsId, TypeSpec};
use qy_mono::{Session, SessionConfig};
use qy_values::ValueData;

/// A session plus shorthand for the node shapes the tests need.
pub struct Program {
    pub session: Session,
}

impl Program {
    pub fn new() -> Self {
        Program { session: Session::new() }
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Program {
            session: Session::with_config(config),
        }
    }

    pub fn name(&mut self, s: &str) -> Name {
        self.session.interner.intern_value(s)
    }

    pub fn int(&mut self, v: i64) -> ExpId {
        self.session.mast.int(v, IntSuffix::S32)
    }

    pub fn global(&mut self, def: DefId) -> ExpId {
        self.session.mast.push_exp(Exp::GlobalId(def))
    }

    pub fn local(&mut self, name: Name) -> ExpId {
        self.session.mast.push_exp(Exp::LocalId(name))
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExpId, rhs: ExpId) -> ExpId {
        self.session.mast.push_exp(Exp::Binary { op, lhs, rhs })
    }

    pub fn call(&mut self, callee: ExpId, arg: ExpId) -> ExpId {
        self.session.mast.push_exp(Exp::Call {
            callee,
            arg,
            non_tot: false,
        })
    }

    pub fn if_then_else(&mut self, cond: ExpId, then: ExpId, otherwise: ExpId) -> ExpId {
        self.session.mast.push_exp(Exp::IfThenElse { cond, then, otherwise })
    }

    pub fn lambda(&mut self, param: Name, body: ExpId) -> ExpId {
        self.session.mast.push_exp(Exp::Lambda {
            params: vec![param],
            body,
        })
    }

    pub fn global_ts(&mut self, def: DefId) -> TsId {
        self.session.mast.push_ts(TypeSpec::GlobalId(def))
    }

    pub fn bv_exp(&mut self, name: &str) -> DefId {
        let name = self.name(name);
        self.session.defs.define_bound_var_exp(name)
    }

    pub fn bv_ts(&mut self, name: &str) -> DefId {
        let name = self.session.interner.intern_type(name);
        self.session.defs.define_bound_var_ts(name)
    }

    pub fn poly(&mut self, name: &str, formals: Vec<DefId>) -> PolyModId {
        let name = self.name(name);
        self.session.new_polymorphic_module(name, formals).unwrap()
    }

    /// Declare a `ConstExp` field whose body is built afterwards, so it can
    /// refer to itself.
    pub fn declare_field(&mut self, poly: PolyModId, name: &str) -> DefId {
        let name = self.name(name);
        let def = self.session.defs.declare_const_exp(name);
        self.session.add_poly_field(poly, def).unwrap();
        def
    }

    pub fn define(&mut self, def: DefId, body: ExpId) {
        self.session.defs.set_target(def, DefTarget::Exp(body)).unwrap();
    }

    pub fn field(&mut self, poly: PolyModId, name: &str, body: ExpId) -> DefId {
        let def = self.declare_field(poly, name);
        self.define(def, body);
        def
    }

    /// Data of the value a total definition is bound to.
    pub fn value_of(&self, total: DefId) -> ValueData {
        match self.session.defs.target(total).unwrap() {
            DefTarget::Value(value) => self.session.values.data(value).unwrap().clone(),
            other => panic!("{total:?} is not a total value: {other:?}"),
        }
    }
}
