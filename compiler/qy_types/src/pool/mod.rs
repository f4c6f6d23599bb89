//! Type pool: canonical monomorphic types.
//!
//! # Design
//!
//! Primitives are minted at construction at the fixed indices named by the
//! `TypeId` constants (`TypeId::UNIT`..`TypeId::STRING`). Every compound
//! constructor memoizes on its structural key:
//!
//! | Type     | Key                                      |
//! |----------|------------------------------------------|
//! | Tuple    | argument list of element types           |
//! | Pointer  | `(pointee, is_mut)`                      |
//! | Slice    | `(elem, is_mut)`                         |
//! | Array    | `(elem, [count] as argument list, is_mut)` |
//! | Function | `(arg, ret, ses)`                        |
//!
//! Array counts go through the argument-list trie so that two distinct
//! value IDs holding the same count produce the same array type.

use qy_ir::{ArgListId, FloatSuffix, IntSuffix, MonoError, MonoResult, Ses, TypeId, ValueId};
use qy_values::ValueTable;
use rustc_hash::FxHashMap;

use crate::ArgListTrie;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
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
    Pointer,
    Array,
    Slice,
    Function,
}

impl TypeKind {
    const PRIMITIVES: [TypeKind; 13] = [
        TypeKind::Unit,
        TypeKind::U1,
        TypeKind::U8,
        TypeKind::U16,
        TypeKind::U32,
        TypeKind::U64,
        TypeKind::S8,
        TypeKind::S16,
        TypeKind::S32,
        TypeKind::S64,
        TypeKind::F32,
        TypeKind::F64,
        TypeKind::String,
    ];

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            TypeKind::U1
                | TypeKind::U8
                | TypeKind::U16
                | TypeKind::U32
                | TypeKind::U64
                | TypeKind::S8
                | TypeKind::S16
                | TypeKind::S32
                | TypeKind::S64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, TypeKind::F32 | TypeKind::F64)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeData {
    Primitive(TypeKind),
    Tuple { args: ArgListId, elems: Vec<TypeId> },
    Pointer { pointee: TypeId, is_mut: bool },
    Array { elem: TypeId, count: ValueId, is_mut: bool },
    Slice { elem: TypeId, is_mut: bool },
    Function { arg: TypeId, ret: TypeId, ses: Ses },
}

impl TypeData {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeData::Primitive(kind) => *kind,
            TypeData::Tuple { .. } => TypeKind::Tuple,
            TypeData::Pointer { .. } => TypeKind::Pointer,
            TypeData::Array { .. } => TypeKind::Array,
            TypeData::Slice { .. } => TypeKind::Slice,
            TypeData::Function { .. } => TypeKind::Function,
        }
    }
}

/// Type of an integer literal with the given suffix.
pub fn int_type(suffix: IntSuffix) -> TypeId {
    match suffix {
        IntSuffix::U1 => TypeId::U1,
        IntSuffix::U8 => TypeId::U8,
        IntSuffix::U16 => TypeId::U16,
        IntSuffix::U32 => TypeId::U32,
        IntSuffix::U64 => TypeId::U64,
        IntSuffix::S8 => TypeId::S8,
        IntSuffix::S16 => TypeId::S16,
        IntSuffix::S32 => TypeId::S32,
        IntSuffix::S64 => TypeId::S64,
    }
}

pub fn float_type(suffix: FloatSuffix) -> TypeId {
    match suffix {
        FloatSuffix::F32 => TypeId::F32,
        FloatSuffix::F64 => TypeId::F64,
    }
}

pub struct TypePool {
    types: Vec<TypeData>,
    tuples: FxHashMap<ArgListId, TypeId>,
    pointers: FxHashMap<(TypeId, bool), TypeId>,
    slices: FxHashMap<(TypeId, bool), TypeId>,
    arrays: FxHashMap<(TypeId, ArgListId, bool), TypeId>,
    functions: FxHashMap<(TypeId, TypeId, Ses), TypeId>,
}

impl TypePool {
    pub fn new() -> Self {
        let types = TypeKind::PRIMITIVES.iter().map(|&kind| TypeData::Primitive(kind)).collect::<Vec<_>>();
        debug_assert_eq!(types.len(), TypeId::FIRST_DYNAMIC as usize);
        TypePool {
            types,
            tuples: FxHashMap::default(),
            pointers: FxHashMap::default(),
            slices: FxHashMap::default(),
            arrays: FxHashMap::default(),
            functions: FxHashMap::default(),
        }
    }

    fn push(&mut self, data: TypeData) -> TypeId {
        let id = TypeId::from_index(self.types.len());
        tracing::trace!(?id, ?data, "new type");
        self.types.push(data);
        id
    }

    #[inline]
    pub fn data(&self, id: TypeId) -> MonoResult<&TypeData> {
        self.types.get(id.index()).ok_or_else(|| MonoError::unknown("type", id.raw()))
    }

    #[inline]
    pub fn kind(&self, id: TypeId) -> MonoResult<TypeKind> {
        self.data(id).map(TypeData::kind)
    }

    /// The pre-minted type of a primitive kind; `None` for compound kinds.
    pub fn primitive(kind: TypeKind) -> Option<TypeId> {
        TypeKind::PRIMITIVES
            .iter()
            .position(|&k| k == kind)
            .map(TypeId::from_index)
    }

    /// Tuple type from an argument list of element types.
    pub fn tuple(&mut self, trie: &ArgListTrie, args: ArgListId) -> MonoResult<TypeId> {
        if let Some(&id) = self.tuples.get(&args) {
            return Ok(id);
        }
        let elems = trie.to_types(args)?;
        let id = self.push(TypeData::Tuple { args, elems });
        self.tuples.insert(args, id);
        Ok(id)
    }

    pub fn tuple_of(&mut self, trie: &mut ArgListTrie, elems: &[TypeId]) -> MonoResult<TypeId> {
        let args = trie.from_types(elems)?;
        self.tuple(trie, args)
    }

    pub fn tuple_elems(&self, id: TypeId) -> MonoResult<&[TypeId]> {
        match self.data(id)? {
            TypeData::Tuple { elems, .. } => Ok(elems),
            other => Err(MonoError::invariant(format!("expected a tuple type, found {:?}", other.kind()))),
        }
    }

    pub fn pointer(&mut self, pointee: TypeId, is_mut: bool) -> TypeId {
        if let Some(&id) = self.pointers.get(&(pointee, is_mut)) {
            return id;
        }
        let id = self.push(TypeData::Pointer { pointee, is_mut });
        self.pointers.insert((pointee, is_mut), id);
        id
    }

    pub fn slice(&mut self, elem: TypeId, is_mut: bool) -> TypeId {
        if let Some(&id) = self.slices.get(&(elem, is_mut)) {
            return id;
        }
        let id = self.push(TypeData::Slice { elem, is_mut });
        self.slices.insert((elem, is_mut), id);
        id
    }

    /// Array type; `count` is compared by value, not by ID.
    pub fn array(
        &mut self,
        trie: &mut ArgListTrie,
        values: &ValueTable,
        elem: TypeId,
        count: ValueId,
        is_mut: bool,
    ) -> MonoResult<TypeId> {
        let count_key = trie.cons_value(values, ArgListId::EMPTY, count)?;
        let key = (elem, count_key, is_mut);
        if let Some(&id) = self.arrays.get(&key) {
            return Ok(id);
        }
        let id = self.push(TypeData::Array { elem, count, is_mut });
        self.arrays.insert(key, id);
        Ok(id)
    }

    pub fn function(&mut self, arg: TypeId, ret: TypeId, ses: Ses) -> TypeId {
        if let Some(&id) = self.functions.get(&(arg, ret, ses)) {
            return id;
        }
        let id = self.push(TypeData::Function { arg, ret, ses });
        self.functions.insert((arg, ret, ses), id);
        id
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}
