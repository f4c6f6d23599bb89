//! Human-readable dumps of modules, definitions, values and types.
//!
//! Used for debugging and in test failure messages. Output is plain text and
//! not meant to be parsed.

use std::fmt::Write;

use qy_ir::{DefId, DefKind, DefTarget, MonoModId, MonoResult, PolyModId, TypeId, ValueId};
use qy_types::{TypeData, TypeKind};
use qy_values::ValueData;

use crate::Session;

impl Session {
    /// `name (DefId(n)): Kind`
    pub fn describe_def(&self, def: DefId) -> MonoResult<String> {
        let name = self.interner.lookup(self.defs.name(def)?);
        let kind = match self.defs.kind(def)? {
            DefKind::BvExp => "BvExp",
            DefKind::BvTs => "BvTs",
            DefKind::ConstExp => "ConstExp",
            DefKind::ConstTs => "ConstTs",
            DefKind::ConstTotVal => "ConstTotVal",
            DefKind::ConstTotTid => "ConstTotTid",
        };
        Ok(format!("{name} ({def:?}): {kind}"))
    }

    pub fn describe_poly_module(&self, poly: PolyModId) -> MonoResult<String> {
        let module = self.modules.poly(poly)?;
        let mut out = format!("PolyMod: {}\n", self.interner.lookup(module.name));
        for &field in &module.fields {
            let _ = writeln!(out, "- {}", self.describe_def(field)?);
        }
        Ok(out)
    }

    /// Fields of a mono module, with their evaluated results when known.
    pub fn describe_mono_module(&self, mono: MonoModId) -> MonoResult<String> {
        let module = self.modules.mono(mono)?;
        let mut out = format!("MonoMod: {}\n", self.interner.lookup(module.name));
        for field in module.fields() {
            let _ = write!(out, "- {}", self.describe_def(field.def)?);
            if let Some(total) = field.total {
                let _ = write!(out, " = {}", self.format_total(total)?);
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Every poly module followed by every mono module.
    pub fn dump_modules(&self) -> MonoResult<String> {
        let mut out = String::new();
        for poly in self.modules.poly_ids() {
            out.push_str(&self.describe_poly_module(poly)?);
        }
        for mono in self.modules.mono_ids() {
            out.push_str(&self.describe_mono_module(mono)?);
        }
        Ok(out)
    }

    fn format_total(&self, total: DefId) -> MonoResult<String> {
        match self.defs.target(total)? {
            DefTarget::Value(value) => self.format_value(value),
            DefTarget::Type(ty) => self.format_type(ty),
            other => Ok(format!("{other:?}")),
        }
    }

    pub fn format_value(&self, value: ValueId) -> MonoResult<String> {
        Ok(match self.values.data(value)? {
            ValueData::Unit => "()".to_owned(),
            ValueData::U1(v) => format!("{v}"),
            ValueData::U8(v) => format!("{v}u8"),
            ValueData::U16(v) => format!("{v}u16"),
            ValueData::U32(v) => format!("{v}u32"),
            ValueData::U64(v) => format!("{v}u64"),
            ValueData::S8(v) => format!("{v}s8"),
            ValueData::S16(v) => format!("{v}s16"),
            ValueData::S32(v) => format!("{v}s32"),
            ValueData::S64(v) => format!("{v}s64"),
            ValueData::F32(v) => format!("{v}f32"),
            ValueData::F64(v) => format!("{v}f64"),
            ValueData::String(chars) => format!("{:?}", chars.iter().collect::<String>()),
            ValueData::Tuple(elems) => format!("({})", self.format_values(elems)?),
            ValueData::Array(elems) => format!("[{}]", self.format_values(elems)?),
            ValueData::Slice(elems) => format!("&[{}]", self.format_values(elems)?),
            ValueData::Function(closure) => format!("<fn/{}>", closure.params.len()),
            ValueData::Pointer(info) => {
                let mutability = if info.is_mut { "mut " } else { "" };
                format!("<ptr {mutability}{:?}>", info.cell)
            }
        })
    }

    fn format_values(&self, values: &[ValueId]) -> MonoResult<String> {
        let parts = values.iter().map(|&v| self.format_value(v)).collect::<MonoResult<Vec<_>>>()?;
        Ok(parts.join(", "))
    }

    pub fn format_type(&self, ty: TypeId) -> MonoResult<String> {
        Ok(match self.types.data(ty)? {
            TypeData::Primitive(kind) => primitive_name(*kind).to_owned(),
            TypeData::Tuple { elems, .. } => {
                let parts = elems.iter().map(|&t| self.format_type(t)).collect::<MonoResult<Vec<_>>>()?;
                format!("({})", parts.join(", "))
            }
            TypeData::Pointer { pointee, is_mut } => {
                let mutability = if *is_mut { "mut " } else { "" };
                format!("*{mutability}{}", self.format_type(*pointee)?)
            }
            TypeData::Array { elem, count, is_mut } => {
                let mutability = if *is_mut { "mut " } else { "" };
                format!("[{mutability}{}; {}]", self.format_type(*elem)?, self.format_value(*count)?)
            }
            TypeData::Slice { elem, is_mut } => {
                let mutability = if *is_mut { "mut " } else { "" };
                format!("[{mutability}{}]", self.format_type(*elem)?)
            }
            TypeData::Function { arg, ret, ses } => {
                format!("fn({}) -> {} {ses:?}", self.format_type(*arg)?, self.format_type(*ret)?)
            }
        })
    }
}

fn primitive_name(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Unit => "()",
        TypeKind::U1 => "u1",
        TypeKind::U8 => "u8",
        TypeKind::U16 => "u16",
        TypeKind::U32 => "u32",
        TypeKind::U64 => "u64",
        TypeKind::S8 => "s8",
        TypeKind::S16 => "s16",
        TypeKind::S32 => "s32",
        TypeKind::S64 => "s64",
        TypeKind::F32 => "f32",
        TypeKind::F64 => "f64",
        TypeKind::String => "string",
        TypeKind::Tuple | TypeKind::Pointer | TypeKind::Array | TypeKind::Slice | TypeKind::Function => "?",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_nested_value() {
        let mut session = Session::new();
        let five = session.values.push_s32(5);
        let s = session.values.push_str("hi").unwrap();
        let tuple = session.values.push_tuple(vec![five, s, ValueId::UNIT]).unwrap();
        assert_eq!(session.format_value(tuple).unwrap(), r#"(5s32, "hi", ())"#);
    }

    #[test]
    fn test_format_compound_type() {
        let mut session = Session::new();
        let ptr = session.types.pointer(TypeId::U8, true);
        let tuple = session.types.tuple_of(&mut session.arg_lists, &[TypeId::S32, ptr]).unwrap();
        assert_eq!(session.format_type(tuple).unwrap(), "(s32, *mut u8)");
    }

    #[test]
    fn test_describe_mono_module_with_totals() {
        let mut session = Session::new();
        let m = session.interner.intern_value("m");
        let x = session.interner.intern_value("x");
        let mono = session.new_monomorphic_module(m, None).unwrap();
        let seven = session.mast.int(7, qy_ir::IntSuffix::U8);
        let field = session.defs.define_const_exp(x, seven);
        session.add_mono_field(mono, field).unwrap();
        session.evaluate_mono_module(mono).unwrap();

        let text = session.describe_mono_module(mono).unwrap();
        assert_eq!(text, format!("MonoMod: m\n- x ({field:?}): ConstExp = 7u8\n"));
    }
}
