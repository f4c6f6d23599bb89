//! Value casts.
//!
//! Numeric casts follow Rust `as` semantics: integers truncate or extend,
//! floats saturate into integers, and casting to `U1` tests against zero.
//! Every numeric source goes through an `i128` or `f64` intermediate, which
//! holds each source width exactly. Tuples cast element-wise.

use qy_ir::{MonoError, MonoResult, TypeId, ValueId};
use qy_types::{TypeKind, TypePool};
use qy_values::{ValueData, ValueKind, ValueTable};

#[derive(Copy, Clone, Debug)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn of(data: &ValueData) -> Option<Number> {
        Some(match *data {
            ValueData::U1(v) => Number::Int(i128::from(v)),
            ValueData::U8(v) => Number::Int(i128::from(v)),
            ValueData::U16(v) => Number::Int(i128::from(v)),
            ValueData::U32(v) => Number::Int(i128::from(v)),
            ValueData::U64(v) => Number::Int(i128::from(v)),
            ValueData::S8(v) => Number::Int(i128::from(v)),
            ValueData::S16(v) => Number::Int(i128::from(v)),
            ValueData::S32(v) => Number::Int(i128::from(v)),
            ValueData::S64(v) => Number::Int(i128::from(v)),
            ValueData::F32(v) => Number::Float(f64::from(v)),
            ValueData::F64(v) => Number::Float(v),
            _ => return None,
        })
    }
}

macro_rules! convert {
    ($number:expr, $ty:ty) => {
        match $number {
            Number::Int(i) => i as $ty,
            Number::Float(f) => f as $ty,
        }
    };
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::float_cmp,
    reason = "casts implement `as` semantics"
)]
fn push_number(values: &mut ValueTable, target: TypeKind, number: Number) -> MonoResult<ValueId> {
    Ok(match target {
        TypeKind::U1 => values.push_u1(match number {
            Number::Int(i) => i != 0,
            Number::Float(f) => f != 0.0,
        }),
        TypeKind::U8 => values.push_u8(convert!(number, u8)),
        TypeKind::U16 => values.push_u16(convert!(number, u16)),
        TypeKind::U32 => values.push_u32(convert!(number, u32)),
        TypeKind::U64 => values.push_u64(convert!(number, u64)),
        TypeKind::S8 => values.push_s8(convert!(number, i8)),
        TypeKind::S16 => values.push_s16(convert!(number, i16)),
        TypeKind::S32 => values.push_s32(convert!(number, i32)),
        TypeKind::S64 => values.push_s64(convert!(number, i64)),
        TypeKind::F32 => values.push_f32(convert!(number, f32)),
        TypeKind::F64 => values.push_f64(convert!(number, f64)),
        other => return Err(MonoError::invariant(format!("{other:?} is not a numeric type"))),
    })
}

/// Cast `value` to the type `ty`.
pub(super) fn cast_value(values: &mut ValueTable, types: &TypePool, value: ValueId, ty: TypeId) -> MonoResult<ValueId> {
    let target = types.kind(ty)?;
    let source = values.kind(value)?;
    match target {
        TypeKind::Array | TypeKind::Slice | TypeKind::Pointer => Err(MonoError::Unsupported {
            feature: "casts to array, slice or pointer types",
        }),
        TypeKind::Tuple => {
            if source != ValueKind::Tuple {
                return Err(MonoError::invariant(format!("cannot cast a {source:?} value to a tuple")));
            }
            let elem_types = types.tuple_elems(ty)?.to_vec();
            let elems = values.seq(value)?.to_vec();
            if elems.len() != elem_types.len() {
                return Err(MonoError::ArityMismatch {
                    expected: elem_types.len(),
                    found: elems.len(),
                });
            }
            let cast = elems
                .into_iter()
                .zip(elem_types)
                .map(|(elem, elem_ty)| cast_value(values, types, elem, elem_ty))
                .collect::<MonoResult<Vec<_>>>()?;
            values.push_tuple(cast)
        }
        TypeKind::Unit | TypeKind::String | TypeKind::Function => {
            let same = matches!(
                (target, source),
                (TypeKind::Unit, ValueKind::Unit)
                    | (TypeKind::String, ValueKind::String)
                    | (TypeKind::Function, ValueKind::Function)
            );
            if same {
                Ok(value)
            } else {
                Err(MonoError::invariant(format!("cannot cast a {source:?} value to {target:?}")))
            }
        }
        _ => {
            let number = Number::of(values.data(value)?)
                .ok_or_else(|| MonoError::invariant(format!("cannot cast a {source:?} value to {target:?}")))?;
            push_number(values, target, number)
        }
    }
}
