//! Lexical stack for evaluation.
//!
//! A stack of frames, each mapping names to value or type bindings. Lookup
//! walks from the innermost frame outward and stops after the nearest
//! [`FrameKind::Call`] frame: a function body sees its own block bindings,
//! its parameters and its captures, never the caller's locals.

use qy_ir::{MonoError, MonoResult, Name, TypeId, ValueId};
use qy_values::LocalBinding;
use rustc_hash::FxHashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Function body. Lookup does not continue past it.
    Call,
    /// Chain block. Transparent to lookup.
    Block,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    bindings: FxHashMap<Name, LocalBinding>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Frame {
            kind,
            bindings: FxHashMap::default(),
        }
    }
}

#[derive(Debug)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    /// Create a stack holding one root `Call` frame.
    pub fn new() -> Self {
        Stack {
            frames: vec![Frame::new(FrameKind::Call)],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn push_frame(&mut self, kind: FrameKind) {
        self.frames.push(Frame::new(kind));
    }

    /// Pop the innermost frame. The root frame is never popped.
    #[inline]
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind `name` in the innermost frame, shadowing outer bindings.
    pub fn define(&mut self, name: Name, binding: LocalBinding) {
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(name, binding);
        }
    }

    pub fn define_value(&mut self, name: Name, value: ValueId) {
        self.define(name, LocalBinding::Value(value));
    }

    pub fn define_type(&mut self, name: Name, ty: TypeId) {
        self.define(name, LocalBinding::Type(ty));
    }

    pub fn lookup(&self, name: Name) -> MonoResult<LocalBinding> {
        for frame in self.frames.iter().rev() {
            if let Some(&binding) = frame.bindings.get(&name) {
                return Ok(binding);
            }
            if frame.kind == FrameKind::Call {
                break;
            }
        }
        Err(MonoError::UndefinedLocal { name })
    }

    pub fn lookup_value(&self, name: Name) -> MonoResult<ValueId> {
        match self.lookup(name)? {
            LocalBinding::Value(value) => Ok(value),
            LocalBinding::Type(_) => Err(MonoError::invariant(format!("{name:?} is bound to a type, not a value"))),
        }
    }

    pub fn lookup_type(&self, name: Name) -> MonoResult<TypeId> {
        match self.lookup(name)? {
            LocalBinding::Type(ty) => Ok(ty),
            LocalBinding::Value(_) => Err(MonoError::invariant(format!("{name:?} is bound to a value, not a type"))),
        }
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
