//! RAII frame guards for the evaluator's stack.
//!
//! [`ScopedEvaluator`] pops the frame it pushed when dropped, so an early
//! `?` return out of a chain or a call body never leaves a stale frame
//! behind. The guard holds `&mut Evaluator` and derefs to it, which keeps the
//! whole evaluator usable inside the scope.
//!
//! ```text
//! self.with_frame(FrameKind::Block, |scoped| {
//!     scoped.stack.define_value(name, value);
//!     scoped.eval_exp(body)
//! })
//! ```

use std::ops::{Deref, DerefMut};

use super::{Evaluator, FrameKind};

pub(crate) struct ScopedEvaluator<'guard, 's> {
    evaluator: &'guard mut Evaluator<'s>,
}

impl Drop for ScopedEvaluator<'_, '_> {
    fn drop(&mut self) {
        self.evaluator.stack.pop_frame();
    }
}

impl<'s> Deref for ScopedEvaluator<'_, 's> {
    type Target = Evaluator<'s>;

    fn deref(&self) -> &Self::Target {
        self.evaluator
    }
}

impl DerefMut for ScopedEvaluator<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.evaluator
    }
}

impl<'s> Evaluator<'s> {
    /// Push a frame that is popped when the returned guard drops.
    pub(crate) fn scoped(&mut self, kind: FrameKind) -> ScopedEvaluator<'_, 's> {
        self.stack.push_frame(kind);
        ScopedEvaluator { evaluator: self }
    }

    /// Run `f` inside a fresh frame of the given kind.
    pub(crate) fn with_frame<T, F>(&mut self, kind: FrameKind, f: F) -> T
    where
        F: FnOnce(&mut ScopedEvaluator<'_, 's>) -> T,
    {
        let mut scoped = self.scoped(kind);
        f(&mut scoped)
    }
}
