//! Operators, effect specifiers and literal suffixes.

use std::fmt;

/// Side-effect specifier of a function signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ses {
    /// Total: terminates without effects. The only kind callable at compile time.
    Tot,
    /// Divergent.
    Dv,
    /// State.
    St,
    /// Exceptions.
    Exn,
    /// Anything.
    Ml,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    LogicalNot,
    DeRef,
    Pos,
    Neg,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::LogicalNot => "not",
            UnaryOp::DeRef => "*",
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Pow,
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Pow => "^",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::LogicalAnd => "and",
            BinaryOp::LogicalOr => "or",
        }
    }

    /// Ordering comparisons; the result is always `U1`.
    pub fn is_ordering(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AllocationTarget {
    Stack,
    Heap,
}

/// Width and signedness of an integer literal or type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntSuffix {
    U1,
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
}

impl IntSuffix {
    pub fn is_signed(self) -> bool {
        matches!(self, IntSuffix::S8 | IntSuffix::S16 | IntSuffix::S32 | IntSuffix::S64)
    }

    pub fn bit_width(self) -> u32 {
        match self {
            IntSuffix::U1 => 1,
            IntSuffix::U8 | IntSuffix::S8 => 8,
            IntSuffix::U16 | IntSuffix::S16 => 16,
            IntSuffix::U32 | IntSuffix::S32 => 32,
            IntSuffix::U64 | IntSuffix::S64 => 64,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FloatSuffix {
    F32,
    F64,
}
