#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use qy_ir::StringInterner;

#[test]
fn test_define_lookup() {
    let mut interner = StringInterner::new();
    let x = interner.intern_value("x");

    let mut stack = Stack::new();
    stack.define_value(x, ValueId::UNIT);
    assert_eq!(stack.lookup_value(x), Ok(ValueId::UNIT));
}

#[test]
fn test_undefined_local() {
    let mut interner = StringInterner::new();
    let x = interner.intern_value("x");

    let stack = Stack::new();
    assert_eq!(stack.lookup(x), Err(MonoError::UndefinedLocal { name: x }));
}

#[test]
fn test_block_frames_are_transparent() {
    let mut interner = StringInterner::new();
    let x = interner.intern_value("x");
    let t = interner.intern_type("T");

    let mut stack = Stack::new();
    stack.define_type(t, TypeId::S32);
    stack.push_frame(FrameKind::Block);
    stack.define_value(x, ValueId::UNIT);

    assert_eq!(stack.lookup_type(t), Ok(TypeId::S32));
    assert_eq!(stack.lookup_value(x), Ok(ValueId::UNIT));

    stack.pop_frame();
    assert!(stack.lookup(x).is_err());
}

#[test]
fn test_call_frame_hides_caller_locals() {
    let mut interner = StringInterner::new();
    let x = interner.intern_value("x");
    let y = interner.intern_value("y");

    let mut stack = Stack::new();
    stack.define_value(x, ValueId::UNIT);
    stack.push_frame(FrameKind::Call);
    stack.push_frame(FrameKind::Block);
    stack.define_value(y, ValueId::UNIT);

    assert_eq!(stack.lookup_value(y), Ok(ValueId::UNIT));
    assert_eq!(stack.lookup(x), Err(MonoError::UndefinedLocal { name: x }));
}

#[test]
fn test_shadowing() {
    let mut interner = StringInterner::new();
    let t = interner.intern_type("T");

    let mut stack = Stack::new();
    stack.define_type(t, TypeId::S32);
    stack.push_frame(FrameKind::Block);
    stack.define_type(t, TypeId::F64);
    assert_eq!(stack.lookup_type(t), Ok(TypeId::F64));

    stack.pop_frame();
    assert_eq!(stack.lookup_type(t), Ok(TypeId::S32));
}

#[test]
fn test_sort_mismatch() {
    let mut interner = StringInterner::new();
    let t = interner.intern_type("T");

    let mut stack = Stack::new();
    stack.define_type(t, TypeId::U8);
    assert!(matches!(stack.lookup_value(t), Err(MonoError::InvariantViolation { .. })));
}

#[test]
fn test_root_frame_never_popped() {
    let mut stack = Stack::new();
    stack.pop_frame();
    stack.pop_frame();
    assert_eq!(stack.depth(), 1);

    stack.push_frame(FrameKind::Call);
    assert_eq!(stack.depth(), 2);
}
