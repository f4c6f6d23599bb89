//! Errors reported by the monomorphizer.
//!
//! Every failure is fatal to the current evaluation request. The variants are
//! grouped by [`ErrorCategory`] so callers can tell a malformed input graph
//! apart from a feature that is not implemented and from a configured
//! resource limit being hit.

use crate::defs::DefKind;
use crate::ids::DefId;
use crate::Name;

pub type MonoResult<T> = Result<T, MonoError>;

/// Coarse classification of a [`MonoError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The input graph broke a contract the front-end is expected to uphold.
    InputContract,
    /// A well-formed construct the evaluator does not handle.
    Unsupported,
    /// A configured or physical limit was exceeded.
    Resource,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MonoError {
    #[error("internal invariant violated: {message}")]
    InvariantViolation { message: String },

    #[error("bound variable {def:?} reached evaluation without a substitution")]
    BoundVariableInEval { def: DefId },

    #[error("polymorphic module field reached evaluation before rewriting")]
    PolyFieldInEval,

    #[error("non-total function call in a compile-time context")]
    NonTotalCall,

    #[error("definition {def:?} depends on itself")]
    CyclicDefinition { def: DefId },

    #[error("expected {expected} arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("undefined local {name:?}")]
    UndefinedLocal { name: Name },

    #[error("cannot substitute {bound:?} with {replacement:?}: {reason}")]
    InvalidSubstitution { bound: DefId, replacement: DefId, reason: &'static str },

    #[error("target of {def:?} is already set")]
    TargetAlreadySet { def: DefId },

    #[error("target of {def:?} was never set")]
    TargetUnset { def: DefId },

    #[error("target does not match definition kind {kind:?} of {def:?}")]
    TargetKindMismatch { def: DefId, kind: DefKind },

    #[error("unsupported: {feature}")]
    Unsupported { feature: &'static str },

    #[error("value serialization needs {bytes} bytes, limit is {limit}")]
    ValueTooLarge { bytes: usize, limit: usize },

    #[error("evaluation exceeded the recursion limit of {limit}")]
    RecursionLimit { limit: usize },

    #[error("unknown {table} id {index}")]
    UnknownId { table: &'static str, index: u32 },
}

impl MonoError {
    /// Build an [`InvariantViolation`](Self::InvariantViolation).
    #[cold]
    pub fn invariant(message: impl Into<String>) -> Self {
        MonoError::InvariantViolation { message: message.into() }
    }

    #[cold]
    pub fn unknown(table: &'static str, index: u32) -> Self {
        MonoError::UnknownId { table, index }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MonoError::Unsupported { .. } => ErrorCategory::Unsupported,
            MonoError::ValueTooLarge { .. } | MonoError::RecursionLimit { .. } => ErrorCategory::Resource,
            MonoError::InvariantViolation { .. }
            | MonoError::BoundVariableInEval { .. }
            | MonoError::PolyFieldInEval
            | MonoError::NonTotalCall
            | MonoError::CyclicDefinition { .. }
            | MonoError::ArityMismatch { .. }
            | MonoError::DivisionByZero
            | MonoError::UndefinedLocal { .. }
            | MonoError::InvalidSubstitution { .. }
            | MonoError::TargetAlreadySet { .. }
            | MonoError::TargetUnset { .. }
            | MonoError::TargetKindMismatch { .. }
            | MonoError::UnknownId { .. } => ErrorCategory::InputContract,
        }
    }
}

impl From<qy_stack::DepthExceeded> for MonoError {
    fn from(err: qy_stack::DepthExceeded) -> Self {
        MonoError::RecursionLimit { limit: err.limit }
    }
}
