//! Value table.
//!
//! # Design
//!
//! Values are immutable and append-only. Every value carries its serialized
//! bytes and their hash, computed once at construction, so structural
//! equality is a hash check followed by a byte comparison. Sequences
//! serialize by concatenating the cached bytes of their elements, which keeps
//! construction linear in the size of the new value.
//!
//! # Serialization
//!
//! - scalars: native width, little-endian (`U1` is one byte)
//! - strings: 8-byte little-endian length, then one 32-bit code point per char
//! - tuples, arrays, slices: concatenation of element serializations
//! - pointers: 8-byte cell index
//! - unit, functions: nothing
//!
//! A value whose serialization would exceed the table's byte budget is
//! rejected with [`MonoError::ValueTooLarge`].

mod serialize;

use std::hash::Hasher;

use qy_ir::{AllocationTarget, CellId, ExpId, MonoError, MonoModId, MonoResult, Name, TypeId, ValueId};
use rustc_hash::FxHasher;

/// Default serialization budget per value (64 KiB).
pub const DEFAULT_MAX_HASH_BYTES: usize = 64 * 1024;

/// Smallest accepted budget; every scalar must fit.
pub const MIN_MAX_HASH_BYTES: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Unit,
    U1,
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    F32,
    F64,
    String,
    Tuple,
    Array,
    Slice,
    Function,
    Pointer,
}

impl ValueKind {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ValueKind::U1
                | ValueKind::U8
                | ValueKind::U16
                | ValueKind::U32
                | ValueKind::U64
                | ValueKind::S8
                | ValueKind::S16
                | ValueKind::S32
                | ValueKind::S64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, ValueKind::F32 | ValueKind::F64)
    }

    pub fn is_scalar(self) -> bool {
        self.is_integer() || self.is_float()
    }
}

/// A name bound on the evaluation stack: either a value or a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocalBinding {
    Value(ValueId),
    Type(TypeId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub name: Name,
    pub binding: LocalBinding,
}

/// Payload of a function value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    pub params: Vec<Name>,
    /// Lambda body in the monomorphic MAST.
    pub body: ExpId,
    /// Free locals of the body, captured when the lambda was evaluated.
    pub captures: Vec<Capture>,
    /// Module whose evaluation created this closure.
    pub module: Option<MonoModId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerInfo {
    pub cell: CellId,
    pub target: AllocationTarget,
    pub is_mut: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueData {
    Unit,
    U1(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    F32(f32),
    F64(f64),
    String(Vec<char>),
    Tuple(Vec<ValueId>),
    Array(Vec<ValueId>),
    Slice(Vec<ValueId>),
    Function(Closure),
    Pointer(PointerInfo),
}

impl ValueData {
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueData::Unit => ValueKind::Unit,
            ValueData::U1(_) => ValueKind::U1,
            ValueData::U8(_) => ValueKind::U8,
            ValueData::U16(_) => ValueKind::U16,
            ValueData::U32(_) => ValueKind::U32,
            ValueData::U64(_) => ValueKind::U64,
            ValueData::S8(_) => ValueKind::S8,
            ValueData::S16(_) => ValueKind::S16,
            ValueData::S32(_) => ValueKind::S32,
            ValueData::S64(_) => ValueKind::S64,
            ValueData::F32(_) => ValueKind::F32,
            ValueData::F64(_) => ValueKind::F64,
            ValueData::String(_) => ValueKind::String,
            ValueData::Tuple(_) => ValueKind::Tuple,
            ValueData::Array(_) => ValueKind::Array,
            ValueData::Slice(_) => ValueKind::Slice,
            ValueData::Function(_) => ValueKind::Function,
            ValueData::Pointer(_) => ValueKind::Pointer,
        }
    }

    /// Elements of a tuple, array or slice.
    pub fn as_seq(&self) -> Option<&[ValueId]> {
        match self {
            ValueData::Tuple(elems) | ValueData::Array(elems) | ValueData::Slice(elems) => Some(elems),
            _ => None,
        }
    }
}

struct Entry {
    data: ValueData,
    hash: u64,
    bytes: Box<[u8]>,
}

pub struct ValueTable {
    entries: Vec<Entry>,
    max_hash_bytes: usize,
}

impl ValueTable {
    /// Create a table whose values may serialize to at most `max_hash_bytes`.
    ///
    /// Budgets below [`MIN_MAX_HASH_BYTES`] are raised to it.
    pub fn new(max_hash_bytes: usize) -> Self {
        let mut table = ValueTable {
            entries: Vec::new(),
            max_hash_bytes: max_hash_bytes.max(MIN_MAX_HASH_BYTES),
        };
        let unit = table.insert(ValueData::Unit, Vec::new());
        debug_assert_eq!(unit, ValueId::UNIT);
        table
    }

    pub fn max_hash_bytes(&self) -> usize {
        self.max_hash_bytes
    }

    fn insert(&mut self, data: ValueData, bytes: Vec<u8>) -> ValueId {
        let mut hasher = FxHasher::default();
        hasher.write(&bytes);
        let id = ValueId::from_index(self.entries.len());
        self.entries.push(Entry {
            data,
            hash: hasher.finish(),
            bytes: bytes.into_boxed_slice(),
        });
        id
    }

    /// Intern an arbitrary value.
    ///
    /// `ValueData::Unit` always yields [`ValueId::UNIT`].
    pub fn push(&mut self, data: ValueData) -> MonoResult<ValueId> {
        if matches!(data, ValueData::Unit) {
            return Ok(ValueId::UNIT);
        }
        let bytes = self.serialize(&data)?;
        Ok(self.insert(data, bytes))
    }

    /// Scalars always fit within [`MIN_MAX_HASH_BYTES`].
    fn push_scalar(&mut self, data: ValueData) -> ValueId {
        let mut bytes = Vec::with_capacity(8);
        serialize::write_scalar(&data, &mut bytes);
        self.insert(data, bytes)
    }

    pub fn push_unit(&self) -> ValueId {
        ValueId::UNIT
    }

    pub fn push_u1(&mut self, v: bool) -> ValueId {
        self.push_scalar(ValueData::U1(v))
    }

    pub fn push_u8(&mut self, v: u8) -> ValueId {
        self.push_scalar(ValueData::U8(v))
    }

    pub fn push_u16(&mut self, v: u16) -> ValueId {
        self.push_scalar(ValueData::U16(v))
    }

    pub fn push_u32(&mut self, v: u32) -> ValueId {
        self.push_scalar(ValueData::U32(v))
    }

    pub fn push_u64(&mut self, v: u64) -> ValueId {
        self.push_scalar(ValueData::U64(v))
    }

    pub fn push_s8(&mut self, v: i8) -> ValueId {
        self.push_scalar(ValueData::S8(v))
    }

    pub fn push_s16(&mut self, v: i16) -> ValueId {
        self.push_scalar(ValueData::S16(v))
    }

    pub fn push_s32(&mut self, v: i32) -> ValueId {
        self.push_scalar(ValueData::S32(v))
    }

    pub fn push_s64(&mut self, v: i64) -> ValueId {
        self.push_scalar(ValueData::S64(v))
    }

    pub fn push_f32(&mut self, v: f32) -> ValueId {
        self.push_scalar(ValueData::F32(v))
    }

    pub fn push_f64(&mut self, v: f64) -> ValueId {
        self.push_scalar(ValueData::F64(v))
    }

    pub fn push_string(&mut self, chars: Vec<char>) -> MonoResult<ValueId> {
        self.push(ValueData::String(chars))
    }

    pub fn push_str(&mut self, s: &str) -> MonoResult<ValueId> {
        self.push_string(s.chars().collect())
    }

    pub fn push_tuple(&mut self, elems: Vec<ValueId>) -> MonoResult<ValueId> {
        self.push(ValueData::Tuple(elems))
    }

    pub fn push_array(&mut self, elems: Vec<ValueId>) -> MonoResult<ValueId> {
        self.push(ValueData::Array(elems))
    }

    pub fn push_slice(&mut self, elems: Vec<ValueId>) -> MonoResult<ValueId> {
        self.push(ValueData::Slice(elems))
    }

    pub fn push_function(&mut self, closure: Closure) -> ValueId {
        self.insert(ValueData::Function(closure), Vec::new())
    }

    pub fn push_pointer(&mut self, info: PointerInfo) -> ValueId {
        let bytes = u64::from(info.cell.raw()).to_le_bytes().to_vec();
        self.insert(ValueData::Pointer(info), bytes)
    }

    fn entry(&self, id: ValueId) -> MonoResult<&Entry> {
        self.entries.get(id.index()).ok_or_else(|| MonoError::unknown("value", id.raw()))
    }

    #[inline]
    pub fn data(&self, id: ValueId) -> MonoResult<&ValueData> {
        self.entry(id).map(|e| &e.data)
    }

    #[inline]
    pub fn kind(&self, id: ValueId) -> MonoResult<ValueKind> {
        self.entry(id).map(|e| e.data.kind())
    }

    pub fn hash_of(&self, id: ValueId) -> MonoResult<u64> {
        self.entry(id).map(|e| e.hash)
    }

    pub fn bytes_of(&self, id: ValueId) -> MonoResult<&[u8]> {
        self.entry(id).map(|e| &*e.bytes)
    }

    /// Elements of a tuple, array or slice value.
    pub fn seq(&self, id: ValueId) -> MonoResult<&[ValueId]> {
        let data = self.data(id)?;
        data.as_seq()
            .ok_or_else(|| MonoError::invariant(format!("{:?} value {id:?} is not a sequence", data.kind())))
    }

    pub fn seq_count(&self, id: ValueId) -> MonoResult<usize> {
        self.seq(id).map(<[ValueId]>::len)
    }

    pub fn seq_elem(&self, id: ValueId, index: usize) -> MonoResult<ValueId> {
        let elems = self.seq(id)?;
        elems.get(index).copied().ok_or_else(|| {
            MonoError::invariant(format!("index {index} out of range for {id:?} with {} elements", elems.len()))
        })
    }

    pub fn func_info(&self, id: ValueId) -> MonoResult<&Closure> {
        match self.data(id)? {
            ValueData::Function(closure) => Ok(closure),
            other => Err(MonoError::invariant(format!("expected a function value, found {:?}", other.kind()))),
        }
    }

    pub fn pointer_info(&self, id: ValueId) -> MonoResult<PointerInfo> {
        match self.data(id)? {
            ValueData::Pointer(info) => Ok(*info),
            other => Err(MonoError::invariant(format!("expected a pointer value, found {:?}", other.kind()))),
        }
    }

    pub fn as_u1(&self, id: ValueId) -> MonoResult<bool> {
        match self.data(id)? {
            ValueData::U1(b) => Ok(*b),
            other => Err(MonoError::invariant(format!("expected a U1 value, found {:?}", other.kind()))),
        }
    }

    /// Read an integer value of any width as a non-negative count.
    pub fn as_count(&self, id: ValueId) -> MonoResult<u64> {
        let count = match *self.data(id)? {
            ValueData::U1(v) => Some(u64::from(v)),
            ValueData::U8(v) => Some(u64::from(v)),
            ValueData::U16(v) => Some(u64::from(v)),
            ValueData::U32(v) => Some(u64::from(v)),
            ValueData::U64(v) => Some(v),
            ValueData::S8(v) => u64::try_from(v).ok(),
            ValueData::S16(v) => u64::try_from(v).ok(),
            ValueData::S32(v) => u64::try_from(v).ok(),
            ValueData::S64(v) => u64::try_from(v).ok(),
            _ => None,
        };
        count.ok_or_else(|| MonoError::invariant(format!("value {id:?} is not a non-negative integer")))
    }

    /// Structural equality.
    ///
    /// Same ID is always equal and differing kinds never are. Scalars compare
    /// by bit pattern and strings by bytes. Sequences are filtered by hash
    /// and bytes, then compared element by element, since their bytes carry
    /// no element boundaries. Functions are equal only to themselves;
    /// pointers are equal when they share a cell.
    pub fn equals(&self, a: ValueId, b: ValueId) -> bool {
        if a == b {
            return true;
        }
        let (Ok(ea), Ok(eb)) = (self.entry(a), self.entry(b)) else {
            return false;
        };
        let kind = ea.data.kind();
        if kind != eb.data.kind() {
            return false;
        }
        match kind {
            ValueKind::Unit => true,
            ValueKind::Function => false,
            ValueKind::String => ea.hash == eb.hash && ea.bytes == eb.bytes,
            ValueKind::Tuple | ValueKind::Array | ValueKind::Slice => {
                if ea.hash != eb.hash || ea.bytes != eb.bytes {
                    return false;
                }
                match (ea.data.as_seq(), eb.data.as_seq()) {
                    (Some(xs), Some(ys)) => {
                        xs.len() == ys.len() && xs.iter().zip(ys).all(|(&x, &y)| self.equals(x, y))
                    }
                    _ => false,
                }
            }
            _ => ea.bytes == eb.bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HASH_BYTES)
    }
}
