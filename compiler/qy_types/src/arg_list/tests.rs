#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_empty_list() {
    let trie = ArgListTrie::new();
    assert_eq!(trie.len(ArgListId::EMPTY), Ok(0));
    assert_eq!(trie.to_vec(ArgListId::EMPTY), Ok(vec![]));
    assert!(trie.head(ArgListId::EMPTY).is_err());
    assert!(trie.tail(ArgListId::EMPTY).is_err());
}

#[test]
fn test_reverse_construction_reads_forward() {
    let values = ValueTable::default();
    let mut trie = ArgListTrie::new();

    // Logical list [S32, U8, F64]: insert F64 first.
    let l1 = trie.cons_type(ArgListId::EMPTY, TypeId::F64).unwrap();
    let l2 = trie.cons_type(l1, TypeId::U8).unwrap();
    let l3 = trie.cons_type(l2, TypeId::S32).unwrap();

    assert_eq!(
        trie.to_vec(l3).unwrap(),
        vec![Arg::Type(TypeId::S32), Arg::Type(TypeId::U8), Arg::Type(TypeId::F64)]
    );
    assert_eq!(trie.head(l3), Ok(Arg::Type(TypeId::S32)));
    assert_eq!(trie.tail(l3), Ok(l2));
    assert_eq!(trie.len(l3), Ok(3));

    let same = trie
        .from_args(&values, &[Arg::Type(TypeId::S32), Arg::Type(TypeId::U8), Arg::Type(TypeId::F64)])
        .unwrap();
    assert_eq!(same, l3);
}

#[test]
fn test_equal_sequences_share_id() {
    let mut trie = ArgListTrie::new();
    let a = trie.from_types(&[TypeId::S32, TypeId::U1]).unwrap();
    let b = trie.from_types(&[TypeId::S32, TypeId::U1]).unwrap();
    let c = trie.from_types(&[TypeId::U1, TypeId::S32]).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_value_edges_use_structural_equality() {
    let mut values = ValueTable::default();
    let mut trie = ArgListTrie::new();

    let five_a = values.push_s32(5);
    let five_b = values.push_s32(5);
    assert_ne!(five_a, five_b);

    let a = trie.cons_value(&values, ArgListId::EMPTY, five_a).unwrap();
    let b = trie.cons_value(&values, ArgListId::EMPTY, five_b).unwrap();
    assert_eq!(a, b);

    let six = values.push_s32(6);
    let c = trie.cons_value(&values, ArgListId::EMPTY, six).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_tuples_of_distinct_functions_get_distinct_edges() {
    let mut values = ValueTable::default();
    let mut trie = ArgListTrie::new();
    let closure = || qy_values::Closure {
        params: Vec::new(),
        body: qy_ir::ExpId::UNIT,
        captures: Vec::new(),
        module: None,
    };
    let f = values.push_function(closure());
    let g = values.push_function(closure());
    let tf = values.push_tuple(vec![f]).unwrap();
    let tg = values.push_tuple(vec![g]).unwrap();

    let a = trie.cons_value(&values, ArgListId::EMPTY, tf).unwrap();
    let b = trie.cons_value(&values, ArgListId::EMPTY, tg).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_type_and_value_edges_are_separate() {
    let mut values = ValueTable::default();
    let mut trie = ArgListTrie::new();
    let v = values.push_u32(8);

    let as_value = trie.cons_value(&values, ArgListId::EMPTY, v).unwrap();
    let as_type = trie.cons_type(ArgListId::EMPTY, TypeId::new(v.raw())).unwrap();
    assert_ne!(as_value, as_type);
}

#[test]
fn test_mixed_list() {
    let mut values = ValueTable::default();
    let mut trie = ArgListTrie::new();
    let n = values.push_u64(4);
    let args = [Arg::Type(TypeId::F32), Arg::Value(n)];
    let list = trie.from_args(&values, &args).unwrap();

    assert_eq!(trie.to_vec(list).unwrap(), args.to_vec());
    assert!(trie.to_types(list).is_err());
}

#[test]
fn test_unknown_list() {
    let trie = ArgListTrie::new();
    assert_eq!(
        trie.len(ArgListId::new(12)),
        Err(MonoError::UnknownId {
            table: "argument list",
            index: 12
        })
    );
}
