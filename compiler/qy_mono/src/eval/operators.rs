//! Unary and binary operators over the value table.
//!
//! Direct enum dispatch on the operand payloads. Both operands of a binary
//! operator must have the same `ValueKind`. Integer arithmetic wraps at the
//! operand width; `U1` is treated as a one-bit integer, so addition is xor
//! and multiplication is and.

use std::ops::{Add, Div, Mul, Rem, Sub};

use qy_ir::{BinaryOp, MonoError, MonoResult, UnaryOp, ValueId};
use qy_values::{CellStore, ValueData, ValueTable};

/// Result of a binary operator before it is interned.
enum Outcome<T> {
    Num(T),
    Bool(bool),
}

trait WrappingInt: Copy + PartialOrd {
    const ZERO: Self;
    const ONE: Self;

    fn add_w(self, rhs: Self) -> Self;
    fn sub_w(self, rhs: Self) -> Self;
    fn mul_w(self, rhs: Self) -> Self;
    fn div_w(self, rhs: Self) -> Self;
    fn rem_w(self, rhs: Self) -> Self;

    /// Exponent as a loop bound; negative exponents run zero times.
    fn pow_bound(self) -> u64;
}

macro_rules! impl_wrapping_int {
    ($($ty:ty),*) => {
        $(
            impl WrappingInt for $ty {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                fn add_w(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                fn sub_w(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                fn mul_w(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                fn div_w(self, rhs: Self) -> Self {
                    self.wrapping_div(rhs)
                }

                fn rem_w(self, rhs: Self) -> Self {
                    self.wrapping_rem(rhs)
                }

                fn pow_bound(self) -> u64 {
                    u64::try_from(self).unwrap_or(0)
                }
            }
        )*
    };
}

impl_wrapping_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl WrappingInt for bool {
    const ZERO: Self = false;
    const ONE: Self = true;

    fn add_w(self, rhs: Self) -> Self {
        self ^ rhs
    }

    fn sub_w(self, rhs: Self) -> Self {
        self ^ rhs
    }

    fn mul_w(self, rhs: Self) -> Self {
        self & rhs
    }

    fn div_w(self, _rhs: Self) -> Self {
        self
    }

    fn rem_w(self, _rhs: Self) -> Self {
        false
    }

    fn pow_bound(self) -> u64 {
        u64::from(self)
    }
}

/// `base` multiplied `exp.pow_bound()` times, by squaring.
///
/// Wrapping multiplication is associative, so this matches the naive loop.
fn wrapping_pow<T: WrappingInt>(base: T, exp: T) -> T {
    let mut result = T::ONE;
    let mut base = base;
    let mut bound = exp.pow_bound();
    while bound > 0 {
        if bound & 1 == 1 {
            result = result.mul_w(base);
        }
        base = base.mul_w(base);
        bound >>= 1;
    }
    result
}

fn int_binary<T: WrappingInt>(op: BinaryOp, a: T, b: T) -> MonoResult<Outcome<T>> {
    Ok(match op {
        BinaryOp::Add => Outcome::Num(a.add_w(b)),
        BinaryOp::Sub => Outcome::Num(a.sub_w(b)),
        BinaryOp::Mul => Outcome::Num(a.mul_w(b)),
        BinaryOp::Div | BinaryOp::Rem if b == T::ZERO => return Err(MonoError::DivisionByZero),
        BinaryOp::Div => Outcome::Num(a.div_w(b)),
        BinaryOp::Rem => Outcome::Num(a.rem_w(b)),
        BinaryOp::Pow => Outcome::Num(wrapping_pow(a, b)),
        BinaryOp::Lt => Outcome::Bool(a < b),
        BinaryOp::Le => Outcome::Bool(a <= b),
        BinaryOp::Gt => Outcome::Bool(a > b),
        BinaryOp::Ge => Outcome::Bool(a >= b),
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
            return Err(not_defined(op, "integer"));
        }
    })
}

trait FloatArith:
    Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self> + Rem<Output = Self>
{
    fn pow(self, rhs: Self) -> Self;
}

impl FloatArith for f32 {
    fn pow(self, rhs: Self) -> Self {
        self.powf(rhs)
    }
}

impl FloatArith for f64 {
    fn pow(self, rhs: Self) -> Self {
        self.powf(rhs)
    }
}

fn float_binary<T: FloatArith>(op: BinaryOp, a: T, b: T) -> MonoResult<Outcome<T>> {
    Ok(match op {
        BinaryOp::Add => Outcome::Num(a + b),
        BinaryOp::Sub => Outcome::Num(a - b),
        BinaryOp::Mul => Outcome::Num(a * b),
        BinaryOp::Div => Outcome::Num(a / b),
        BinaryOp::Rem => Outcome::Num(a % b),
        BinaryOp::Pow => Outcome::Num(a.pow(b)),
        BinaryOp::Lt => Outcome::Bool(a < b),
        BinaryOp::Le => Outcome::Bool(a <= b),
        BinaryOp::Gt => Outcome::Bool(a > b),
        BinaryOp::Ge => Outcome::Bool(a >= b),
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
            return Err(not_defined(op, "float"));
        }
    })
}

#[cold]
fn not_defined(op: BinaryOp, operands: &str) -> MonoError {
    MonoError::invariant(format!("`{}` is not defined on {operands} operands", op.as_symbol()))
}

fn intern<T>(values: &mut ValueTable, outcome: Outcome<T>, push: fn(&mut ValueTable, T) -> ValueId) -> ValueId {
    match outcome {
        Outcome::Num(v) => push(values, v),
        Outcome::Bool(b) => values.push_u1(b),
    }
}

pub(super) fn evaluate_binary(values: &mut ValueTable, op: BinaryOp, lhs: ValueId, rhs: ValueId) -> MonoResult<ValueId> {
    let kind = values.kind(lhs)?;
    let rhs_kind = values.kind(rhs)?;
    if kind != rhs_kind {
        return Err(MonoError::invariant(format!(
            "`{}` operands differ in kind: {kind:?} and {rhs_kind:?}",
            op.as_symbol()
        )));
    }

    match op {
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = values.equals(lhs, rhs);
            return Ok(values.push_u1(equal == (op == BinaryOp::Eq)));
        }
        BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
            let (a, b) = (values.as_u1(lhs)?, values.as_u1(rhs)?);
            let result = if op == BinaryOp::LogicalAnd { a && b } else { a || b };
            return Ok(values.push_u1(result));
        }
        _ => {}
    }

    match (values.data(lhs)?, values.data(rhs)?) {
        (&ValueData::U1(a), &ValueData::U1(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_u1)),
        (&ValueData::U8(a), &ValueData::U8(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_u8)),
        (&ValueData::U16(a), &ValueData::U16(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_u16)),
        (&ValueData::U32(a), &ValueData::U32(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_u32)),
        (&ValueData::U64(a), &ValueData::U64(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_u64)),
        (&ValueData::S8(a), &ValueData::S8(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_s8)),
        (&ValueData::S16(a), &ValueData::S16(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_s16)),
        (&ValueData::S32(a), &ValueData::S32(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_s32)),
        (&ValueData::S64(a), &ValueData::S64(b)) => Ok(intern(values, int_binary(op, a, b)?, ValueTable::push_s64)),
        (&ValueData::F32(a), &ValueData::F32(b)) => Ok(intern(values, float_binary(op, a, b)?, ValueTable::push_f32)),
        (&ValueData::F64(a), &ValueData::F64(b)) => Ok(intern(values, float_binary(op, a, b)?, ValueTable::push_f64)),
        _ => Err(MonoError::invariant(format!(
            "`{}` is not defined on {kind:?} operands",
            op.as_symbol()
        ))),
    }
}

pub(super) fn evaluate_unary(
    values: &mut ValueTable,
    cells: &CellStore,
    op: UnaryOp,
    arg: ValueId,
) -> MonoResult<ValueId> {
    match op {
        UnaryOp::DeRef => cells.get(values.pointer_info(arg)?.cell),
        UnaryOp::LogicalNot => {
            let b = values.as_u1(arg)?;
            Ok(values.push_u1(!b))
        }
        UnaryOp::Pos => {
            let kind = values.kind(arg)?;
            if kind.is_scalar() {
                Ok(arg)
            } else {
                Err(MonoError::invariant(format!("unary `+` is not defined on {kind:?} values")))
            }
        }
        UnaryOp::Neg => match *values.data(arg)? {
            // One-bit negation is the identity.
            ValueData::U1(_) => Ok(arg),
            ValueData::U8(v) => Ok(values.push_u8(v.wrapping_neg())),
            ValueData::U16(v) => Ok(values.push_u16(v.wrapping_neg())),
            ValueData::U32(v) => Ok(values.push_u32(v.wrapping_neg())),
            ValueData::U64(v) => Ok(values.push_u64(v.wrapping_neg())),
            ValueData::S8(v) => Ok(values.push_s8(v.wrapping_neg())),
            ValueData::S16(v) => Ok(values.push_s16(v.wrapping_neg())),
            ValueData::S32(v) => Ok(values.push_s32(v.wrapping_neg())),
            ValueData::S64(v) => Ok(values.push_s64(v.wrapping_neg())),
            ValueData::F32(v) => Ok(values.push_f32(-v)),
            ValueData::F64(v) => Ok(values.push_f64(-v)),
            ref other => Err(MonoError::invariant(format!(
                "unary `-` is not defined on {:?} values",
                other.kind()
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_pow_matches_repeated_multiplication() {
        for base in [0u8, 1, 2, 3, 7, 255] {
            for exp in 0u8..20 {
                let mut naive = 1u8;
                for _ in 0..exp {
                    naive = naive.wrapping_mul(base);
                }
                assert_eq!(wrapping_pow(base, exp), naive, "{base}^{exp}");
            }
        }
    }

    #[test]
    fn test_negative_exponent_yields_one() {
        assert_eq!(wrapping_pow(5i32, -3), 1);
    }

    #[test]
    fn test_one_bit_arithmetic() {
        assert!(matches!(int_binary(BinaryOp::Add, true, true), Ok(Outcome::Num(false))));
        assert!(matches!(int_binary(BinaryOp::Mul, true, false), Ok(Outcome::Num(false))));
        assert!(matches!(int_binary(BinaryOp::Div, true, false), Err(MonoError::DivisionByZero)));
    }
}
