//! Property tests for value structural equality.
//!
//! Equality must be an equivalence relation that agrees with equality of
//! the underlying Rust data, independent of which IDs the values got.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use qy_values::ValueTable;

proptest! {
    #[test]
    fn scalar_equality_matches_data(a in any::<i32>(), b in any::<i32>()) {
        let mut values = ValueTable::default();
        let va = values.push_s32(a);
        let vb = values.push_s32(b);
        prop_assert_eq!(values.equals(va, vb), a == b);
        prop_assert_eq!(values.equals(vb, va), a == b);
    }

    #[test]
    fn string_equality_matches_data(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
        let mut values = ValueTable::default();
        let va = values.push_str(&a).unwrap();
        let vb = values.push_str(&b).unwrap();
        prop_assert_eq!(values.equals(va, vb), a == b);
    }

    #[test]
    fn tuple_equality_is_elementwise(xs in prop::collection::vec(any::<u16>(), 0..8),
                                     ys in prop::collection::vec(any::<u16>(), 0..8)) {
        let mut values = ValueTable::default();
        let ex: Vec<_> = xs.iter().map(|&x| values.push_u16(x)).collect();
        let ey: Vec<_> = ys.iter().map(|&y| values.push_u16(y)).collect();
        let tx = values.push_tuple(ex).unwrap();
        let ty = values.push_tuple(ey).unwrap();
        prop_assert_eq!(values.equals(tx, ty), xs == ys);
    }

    #[test]
    fn equal_values_hash_equal(xs in prop::collection::vec(any::<i64>(), 0..6)) {
        let mut values = ValueTable::default();
        let first: Vec<_> = xs.iter().map(|&x| values.push_s64(x)).collect();
        let second: Vec<_> = xs.iter().map(|&x| values.push_s64(x)).collect();
        let a = values.push_array(first).unwrap();
        let b = values.push_array(second).unwrap();
        prop_assert!(values.equals(a, b));
        prop_assert_eq!(values.hash_of(a).unwrap(), values.hash_of(b).unwrap());
    }
}
