use super::*;
use crate::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn test_unit_singletons() {
    let mut mast = Mast::new();
    assert_eq!(mast.push_ts(TypeSpec::Unit), TsId::UNIT);
    assert_eq!(mast.push_exp(Exp::Unit), ExpId::UNIT);
    assert_eq!(mast.ts(TsId::UNIT).map(TypeSpec::kind), Ok(NodeKind::TsUnit));
    assert_eq!(mast.exp(ExpId::UNIT).map(Exp::kind), Ok(NodeKind::ExpUnit));
}

#[test]
fn test_push_and_get() {
    let mut mast = Mast::new();
    let five = mast.int(5, IntSuffix::S32);
    let neg = mast.int(-3, IntSuffix::S8);
    let sum = mast.push_exp(Exp::Binary {
        op: BinaryOp::Add,
        lhs: five,
        rhs: neg,
    });

    assert_eq!(
        mast.exp(neg),
        Ok(&Exp::Int {
            mantissa: 3,
            is_neg: true,
            suffix: IntSuffix::S8
        })
    );
    assert_eq!(mast.exp(sum).map(Exp::kind), Ok(NodeKind::ExpBinary));
}

#[test]
fn test_unknown_id() {
    let mast = Mast::new();
    assert_eq!(
        mast.exp(ExpId::new(99)),
        Err(MonoError::UnknownId {
            table: "expression",
            index: 99
        })
    );
    assert!(mast.elem(ElemId::new(0)).is_err());
}

#[test]
fn test_free_locals_of_lambda() {
    let mut interner = StringInterner::new();
    let mut mast = Mast::new();
    let x = interner.intern_value("x");
    let y = interner.intern_value("y");
    let z = interner.intern_value("z");

    // (x) -> chain { z = y } in x + z + y
    let y_ref = mast.push_exp(Exp::LocalId(y));
    let bind_z = mast.push_elem(Elem::BindValue { name: z, init: y_ref });
    let x_ref = mast.push_exp(Exp::LocalId(x));
    let z_ref = mast.push_exp(Exp::LocalId(z));
    let xz = mast.push_exp(Exp::Binary {
        op: BinaryOp::Add,
        lhs: x_ref,
        rhs: z_ref,
    });
    let xzy = mast.push_exp(Exp::Binary {
        op: BinaryOp::Add,
        lhs: xz,
        rhs: y_ref,
    });
    let body = mast.push_exp(Exp::Chain {
        elems: vec![bind_z],
        ret: xzy,
    });

    assert_eq!(mast.free_locals(&[x], body), Ok(vec![y]));
}

#[test]
fn test_free_locals_sees_type_names() {
    let mut interner = StringInterner::new();
    let mut mast = Mast::new();
    let t = interner.intern_type("T");
    let v = interner.intern_value("v");

    let t_ref = mast.push_ts(TypeSpec::LocalId(t));
    let v_ref = mast.push_exp(Exp::LocalId(v));
    let cast = mast.push_exp(Exp::Cast { ts: t_ref, exp: v_ref });

    assert_eq!(mast.free_locals(&[], cast), Ok(vec![t, v]));
}

#[test]
fn test_free_locals_nested_lambda_shadows() {
    let mut interner = StringInterner::new();
    let mut mast = Mast::new();
    let a = interner.intern_value("a");
    let b = interner.intern_value("b");

    // () -> (a) -> a + b
    let a_ref = mast.push_exp(Exp::LocalId(a));
    let b_ref = mast.push_exp(Exp::LocalId(b));
    let sum = mast.push_exp(Exp::Binary {
        op: BinaryOp::Add,
        lhs: a_ref,
        rhs: b_ref,
    });
    let inner = mast.push_exp(Exp::Lambda {
        params: vec![a],
        body: sum,
    });

    assert_eq!(mast.free_locals(&[], inner), Ok(vec![b]));
}
