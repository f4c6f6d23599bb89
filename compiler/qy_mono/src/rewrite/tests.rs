#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::SessionConfig;
use pretty_assertions::assert_eq;
use qy_ir::{BinaryOp, IntSuffix, Name};

struct Fixture {
    session: Session,
    x_bv: DefId,
    x_total: DefId,
}

/// A session with a bound variable `x` and a total constant `5s32`.
fn fixture(config: SessionConfig) -> Fixture {
    let mut session = Session::with_config(config);
    let x = session.interner.intern_value("x");
    let x_bv = session.defs.define_bound_var_exp(x);
    let five = session.values.push_s32(5);
    let x_total = session.defs.define_total_value(x, five);
    Fixture { session, x_bv, x_total }
}

impl Fixture {
    fn sub(&self) -> Substitution {
        let mut sub = Substitution::new();
        sub.insert(&self.session.defs, self.x_bv, self.x_total).unwrap();
        sub
    }

    fn global(&mut self, def: DefId) -> ExpId {
        self.session.mast.push_exp(Exp::GlobalId(def))
    }

    fn name(&mut self, s: &str) -> Name {
        self.session.interner.intern_value(s)
    }

    /// `\n. self(n) + x` bound to a fresh `ConstExp` named `name`.
    fn self_referential(&mut self, name: &str) -> DefId {
        let name = self.name(name);
        let n = self.name("n");
        let def = self.session.defs.declare_const_exp(name);
        let callee = self.global(def);
        let arg = self.session.mast.push_exp(Exp::LocalId(n));
        let call = self.session.mast.push_exp(Exp::Call {
            callee,
            arg,
            non_tot: false,
        });
        let x = self.global(self.x_bv);
        let body = self.session.mast.push_exp(Exp::Binary {
            op: BinaryOp::Add,
            lhs: call,
            rhs: x,
        });
        let lambda = self.session.mast.push_exp(Exp::Lambda { params: vec![n], body });
        self.session.defs.set_target(def, DefTarget::Exp(lambda)).unwrap();
        def
    }

    /// The callee of the recursive call inside a definition built by
    /// `self_referential`.
    fn recursive_callee(&self, def: DefId) -> DefId {
        let mast = &self.session.mast;
        let DefTarget::Exp(lambda) = self.session.defs.target(def).unwrap() else {
            panic!("expected an expression target");
        };
        let Exp::Lambda { body, .. } = mast.exp(lambda).unwrap() else {
            panic!("expected a lambda");
        };
        let Exp::Binary { lhs, .. } = mast.exp(*body).unwrap() else {
            panic!("expected a binary node");
        };
        let Exp::Call { callee, .. } = mast.exp(*lhs).unwrap() else {
            panic!("expected a call");
        };
        let Exp::GlobalId(callee) = mast.exp(*callee).unwrap() else {
            panic!("expected a global reference");
        };
        *callee
    }
}

#[test]
fn test_unchanged_tree_keeps_its_id() {
    let mut f = fixture(SessionConfig::default());
    let one = f.session.mast.int(1, IntSuffix::S32);
    let two = f.session.mast.int(2, IntSuffix::S32);
    let sum = f.session.mast.push_exp(Exp::Binary {
        op: BinaryOp::Add,
        lhs: one,
        rhs: two,
    });
    let sub = f.sub();
    let nodes_before = f.session.mast.len();

    assert_eq!(f.session.rewrite_exp(sum, &sub), Ok(sum));
    assert_eq!(f.session.mast.len(), nodes_before);
}

#[test]
fn test_bound_variable_is_substituted() {
    let mut f = fixture(SessionConfig::default());
    let x = f.global(f.x_bv);
    let one = f.session.mast.int(1, IntSuffix::S32);
    let sum = f.session.mast.push_exp(Exp::Binary {
        op: BinaryOp::Add,
        lhs: x,
        rhs: one,
    });
    let sub = f.sub();

    let rewritten = f.session.rewrite_exp(sum, &sub).unwrap();
    assert!(rewritten != sum);
    let Exp::Binary { lhs, rhs, .. } = f.session.mast.exp(rewritten).unwrap().clone() else {
        panic!("expected a binary node");
    };
    assert_eq!(f.session.mast.exp(lhs), Ok(&Exp::GlobalId(f.x_total)));
    assert_eq!(rhs, one, "untouched subtrees are shared");
}

#[test]
fn test_unmapped_bound_variable_is_left_alone() {
    let mut f = fixture(SessionConfig::default());
    let x = f.global(f.x_bv);
    assert_eq!(f.session.rewrite_exp(x, &Substitution::new()), Ok(x));
}

#[test]
fn test_constant_body_is_copied_not_edited() {
    let mut f = fixture(SessionConfig::default());
    let c_name = f.name("c");
    let x = f.global(f.x_bv);
    let c = f.session.defs.define_const_exp(c_name, x);
    let sub = f.sub();

    let rewritten = f.session.rewrite_def(c, &sub).unwrap();
    assert!(rewritten != c);
    assert_eq!(f.session.defs.kind(rewritten), Ok(DefKind::ConstExp));
    assert_eq!(f.session.defs.name(rewritten), Ok(c_name));
    assert_eq!(f.session.defs.target(c), Ok(DefTarget::Exp(x)));

    let DefTarget::Exp(body) = f.session.defs.target(rewritten).unwrap() else {
        panic!("expected an expression target");
    };
    assert_eq!(f.session.mast.exp(body), Ok(&Exp::GlobalId(f.x_total)));
}

#[test]
fn test_total_constants_are_identity() {
    let mut f = fixture(SessionConfig::default());
    let sub = f.sub();
    assert_eq!(f.session.rewrite_def(f.x_total, &sub), Ok(f.x_total));
}

#[test]
fn test_type_specs_are_rewritten() {
    let mut f = fixture(SessionConfig::default());
    let t = f.session.interner.intern_type("T");
    let t_bv = f.session.defs.define_bound_var_ts(t);
    let t_total = f.session.defs.define_total_type(t, qy_ir::TypeId::F64);
    let t_ref = f.session.mast.push_ts(TypeSpec::GlobalId(t_bv));
    let ptr = f.session.mast.push_ts(TypeSpec::Ptr {
        pointee: t_ref,
        is_mut: false,
    });
    let mut sub = Substitution::new();
    sub.insert(&f.session.defs, t_bv, t_total).unwrap();

    let rewritten = f.session.rewrite_ts(ptr, &sub).unwrap();
    let TypeSpec::Ptr { pointee, .. } = f.session.mast.ts(rewritten).unwrap().clone() else {
        panic!("expected a pointer type-spec");
    };
    assert_eq!(f.session.mast.ts(pointee), Ok(&TypeSpec::GlobalId(t_total)));
}

#[test]
fn test_cycle_passes_through_unexpanded() {
    let mut f = fixture(SessionConfig::default());
    let rec = f.self_referential("rec");
    let sub = f.sub();

    let rewritten = f.session.rewrite_def(rec, &sub).unwrap();
    assert!(rewritten != rec);
    // The back-reference still names the original, unsubstituted definition.
    assert_eq!(f.recursive_callee(rewritten), rec);
}

#[test]
fn test_cycle_rebinds_to_rewritten_definition() {
    let mut f = fixture(SessionConfig::builder().cycle_policy(CyclePolicy::Rebind).build());
    let rec = f.self_referential("rec");
    let sub = f.sub();

    let rewritten = f.session.rewrite_def(rec, &sub).unwrap();
    assert!(rewritten != rec);
    assert_eq!(f.recursive_callee(rewritten), rewritten);
}

#[test]
fn test_rebind_memoizes_shared_definitions() {
    let mut f = fixture(SessionConfig::builder().cycle_policy(CyclePolicy::Rebind).build());
    let c_name = f.name("c");
    let x = f.global(f.x_bv);
    let c = f.session.defs.define_const_exp(c_name, x);
    let c_ref = f.global(c);
    let pair = f.session.mast.push_exp(Exp::Tuple(vec![c_ref, c_ref]));
    let sub = f.sub();
    let defs_before = f.session.defs.len();

    let rewritten = f.session.rewrite_exp(pair, &sub).unwrap();
    let Exp::Tuple(elems) = f.session.mast.exp(rewritten).unwrap().clone() else {
        panic!("expected a tuple");
    };
    let first = f.session.mast.exp(elems[0]).unwrap().clone();
    let second = f.session.mast.exp(elems[1]).unwrap().clone();
    assert_eq!(first, second);
    assert!(first != Exp::GlobalId(c));
    assert_eq!(f.session.defs.len(), defs_before + 1);
}

#[test]
fn test_pass_through_memoizes_shared_definitions() {
    let mut f = fixture(SessionConfig::default());
    let c_name = f.name("c");
    let x = f.global(f.x_bv);
    let c = f.session.defs.define_const_exp(c_name, x);
    let first_ref = f.global(c);
    let second_ref = f.global(c);
    let pair = f.session.mast.push_exp(Exp::Tuple(vec![first_ref, second_ref]));
    let sub = f.sub();
    let defs_before = f.session.defs.len();

    let rewritten = f.session.rewrite_exp(pair, &sub).unwrap();
    let Exp::Tuple(elems) = f.session.mast.exp(rewritten).unwrap().clone() else {
        panic!("expected a tuple");
    };
    assert_eq!(f.session.mast.exp(elems[0]), f.session.mast.exp(elems[1]));
    assert_eq!(f.session.defs.len(), defs_before + 1);
}

#[test]
fn test_rebound_cycle_fills_its_placeholder() {
    let mut f = fixture(SessionConfig::builder().cycle_policy(CyclePolicy::Rebind).build());
    let a_name = f.name("a");
    let a = f.session.defs.declare_const_exp(a_name);
    let a_ref = f.global(a);
    f.session.defs.set_target(a, DefTarget::Exp(a_ref)).unwrap();
    let defs_before = f.session.defs.len();

    // `a = a` rewrites to a placeholder that refers to itself.
    let rewritten = f.session.rewrite_def(a, &Substitution::new()).unwrap();
    assert_eq!(f.session.defs.len(), defs_before + 1);
    let DefTarget::Exp(body) = f.session.defs.target(rewritten).unwrap() else {
        panic!("expected an expression target");
    };
    assert_eq!(f.session.mast.exp(body), Ok(&Exp::GlobalId(rewritten)));
}

#[test]
fn test_cycle_under_pass_through_mints_nothing() {
    let mut f = fixture(SessionConfig::default());
    let a_name = f.name("a");
    let a = f.session.defs.declare_const_exp(a_name);
    let a_ref = f.global(a);
    f.session.defs.set_target(a, DefTarget::Exp(a_ref)).unwrap();
    let defs_before = f.session.defs.len();

    assert_eq!(f.session.rewrite_def(a, &Substitution::new()), Ok(a));
    assert_eq!(f.session.defs.len(), defs_before);
}

#[test]
fn test_poly_field_reference_is_instantiated() {
    let mut f = fixture(SessionConfig::default());
    let m = f.name("m");
    let y = f.name("y");
    let poly = f.session.new_polymorphic_module(m, vec![f.x_bv]).unwrap();
    let one = f.session.mast.int(1, IntSuffix::S32);
    let x = f.global(f.x_bv);
    let sum = f.session.mast.push_exp(Exp::Binary {
        op: BinaryOp::Add,
        lhs: x,
        rhs: one,
    });
    let y_def = f.session.defs.define_const_exp(y, sum);
    f.session.add_poly_field(poly, y_def).unwrap();

    let seven = f.session.mast.int(7, IntSuffix::S32);
    let get = f.session.mast.push_exp(Exp::GetPolyModuleField {
        module: poly,
        field: y_def,
        args: vec![ActualArg::Value(seven)],
    });
    let rewritten = f.session.rewrite_exp(get, &Substitution::new()).unwrap();

    let Exp::GetMonoModuleField { module, field } = f.session.mast.exp(rewritten).unwrap().clone() else {
        panic!("expected a mono module field");
    };
    let instance = f.session.modules.mono(module).unwrap();
    assert_eq!(instance.fields().len(), 1);
    assert_eq!(instance.fields()[0].def, field);
    let total = instance.fields()[0].total.expect("instances are evaluated eagerly");
    let DefTarget::Value(value) = f.session.defs.target(total).unwrap() else {
        panic!("expected a value");
    };
    assert_eq!(f.session.values.data(value), Ok(&qy_values::ValueData::S32(8)));
}
