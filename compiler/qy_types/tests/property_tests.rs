//! Property tests for type canonicalization.
//!
//! Structurally equal requests must yield the same `TypeId`; structurally
//! different requests must not.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use qy_ir::TypeId;
use qy_types::{ArgListTrie, TypePool};
use qy_values::ValueTable;

fn primitive() -> impl Strategy<Value = TypeId> {
    (0..TypeId::FIRST_DYNAMIC).prop_map(TypeId::new)
}

proptest! {
    #[test]
    fn tuples_canonicalize(xs in prop::collection::vec(primitive(), 0..6),
                           ys in prop::collection::vec(primitive(), 0..6)) {
        let mut pool = TypePool::new();
        let mut trie = ArgListTrie::new();
        let tx = pool.tuple_of(&mut trie, &xs).unwrap();
        let ty = pool.tuple_of(&mut trie, &ys).unwrap();
        prop_assert_eq!(tx == ty, xs == ys);
    }

    #[test]
    fn nested_pointers_canonicalize(depth in 1usize..6, is_mut in any::<bool>(), base in primitive()) {
        let mut pool = TypePool::new();
        let build = |pool: &mut TypePool| {
            (0..depth).fold(base, |ty, _| pool.pointer(ty, is_mut))
        };
        let first = build(&mut pool);
        let len = pool.len();
        let second = build(&mut pool);
        prop_assert_eq!(first, second);
        prop_assert_eq!(pool.len(), len);
    }

    #[test]
    fn array_counts_compare_by_value(a in 0u64..16, b in 0u64..16) {
        let mut pool = TypePool::new();
        let mut trie = ArgListTrie::new();
        let mut values = ValueTable::default();
        let va = values.push_u64(a);
        let vb = values.push_u64(b);
        let ta = pool.array(&mut trie, &values, TypeId::U8, va, false).unwrap();
        let tb = pool.array(&mut trie, &values, TypeId::U8, vb, false).unwrap();
        prop_assert_eq!(ta == tb, a == b);
    }
}
