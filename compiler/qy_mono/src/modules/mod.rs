//! Polymorphic and monomorphic module templates.
//!
//! A [`PolyModule`] is what the front-end declares: formal bound variables
//! plus field definitions whose bodies live in polymorphic MAST. A
//! [`MonoModule`] is either declared directly by the front-end or produced by
//! instantiating a poly module with a concrete argument list; its fields
//! point into monomorphic MAST and, once evaluated, at total constants.
//!
//! This module only stores and indexes; instantiation itself lives on
//! [`Session`](crate::Session) in `instantiate.rs`.

mod instantiate;

use qy_ir::{ArgListId, DefId, ExpId, MonoError, MonoModId, MonoResult, Name, PolyModId};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModParent {
    Poly(PolyModId),
    Mono(MonoModId),
}

pub struct PolyModule {
    pub name: Name,
    pub formals: Vec<DefId>,
    pub fields: Vec<DefId>,
    instances: FxHashMap<ArgListId, MonoModId>,
}

impl PolyModule {
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MonoField {
    /// `ConstExp`/`ConstTs` definition whose body is monomorphic.
    pub def: DefId,
    /// `ConstTotVal`/`ConstTotTid` definition, once the field is evaluated.
    pub total: Option<DefId>,
}

pub struct MonoModule {
    pub name: Name,
    pub parent: Option<ModParent>,
    /// Arguments this module was instantiated with; empty for modules the
    /// front-end declares directly.
    pub args: ArgListId,
    fields: Vec<MonoField>,
    /// Poly field definition to index in `fields`.
    by_poly_field: FxHashMap<DefId, usize>,
    lambdas: Vec<ExpId>,
    seen_lambdas: FxHashSet<ExpId>,
}

impl MonoModule {
    pub fn fields(&self) -> &[MonoField] {
        &self.fields
    }

    pub fn lambdas(&self) -> &[ExpId] {
        &self.lambdas
    }
}

#[derive(Default)]
pub struct ModuleTable {
    polys: Vec<PolyModule>,
    monos: Vec<MonoModule>,
    /// Mono field definition to the module that owns it.
    owners: FxHashMap<DefId, MonoModId>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_poly(&mut self, name: Name, formals: Vec<DefId>) -> PolyModId {
        let id = PolyModId::from_index(self.polys.len());
        self.polys.push(PolyModule {
            name,
            formals,
            fields: Vec::new(),
            instances: FxHashMap::default(),
        });
        id
    }

    pub fn new_mono(&mut self, name: Name, parent: Option<ModParent>, args: ArgListId) -> MonoModId {
        let id = MonoModId::from_index(self.monos.len());
        self.monos.push(MonoModule {
            name,
            parent,
            args,
            fields: Vec::new(),
            by_poly_field: FxHashMap::default(),
            lambdas: Vec::new(),
            seen_lambdas: FxHashSet::default(),
        });
        id
    }

    pub fn poly(&self, id: PolyModId) -> MonoResult<&PolyModule> {
        self.polys.get(id.index()).ok_or_else(|| MonoError::unknown("poly module", id.raw()))
    }

    fn poly_mut(&mut self, id: PolyModId) -> MonoResult<&mut PolyModule> {
        self.polys.get_mut(id.index()).ok_or_else(|| MonoError::unknown("poly module", id.raw()))
    }

    pub fn mono(&self, id: MonoModId) -> MonoResult<&MonoModule> {
        self.monos.get(id.index()).ok_or_else(|| MonoError::unknown("mono module", id.raw()))
    }

    fn mono_mut(&mut self, id: MonoModId) -> MonoResult<&mut MonoModule> {
        self.monos.get_mut(id.index()).ok_or_else(|| MonoError::unknown("mono module", id.raw()))
    }

    pub(crate) fn push_poly_field(&mut self, poly: PolyModId, def: DefId) -> MonoResult<()> {
        self.poly_mut(poly)?.fields.push(def);
        Ok(())
    }

    /// Append a field to a mono module, returning its index.
    pub(crate) fn push_mono_field(&mut self, mono: MonoModId, def: DefId) -> MonoResult<usize> {
        let module = self.mono_mut(mono)?;
        let index = module.fields.len();
        module.fields.push(MonoField { def, total: None });
        self.owners.insert(def, mono);
        Ok(index)
    }

    /// Append a field produced from `poly_field` during instantiation.
    pub(crate) fn push_instantiated_field(&mut self, mono: MonoModId, poly_field: DefId, def: DefId) -> MonoResult<()> {
        let index = self.push_mono_field(mono, def)?;
        self.mono_mut(mono)?.by_poly_field.insert(poly_field, index);
        Ok(())
    }

    pub(crate) fn set_field_total(&mut self, mono: MonoModId, index: usize, total: DefId) -> MonoResult<()> {
        let field = self
            .mono_mut(mono)?
            .fields
            .get_mut(index)
            .ok_or_else(|| MonoError::invariant(format!("{mono:?} has no field {index}")))?;
        field.total = Some(total);
        Ok(())
    }

    /// The field of `mono` that was instantiated from `poly_field`.
    pub fn mono_field_for(&self, mono: MonoModId, poly_field: DefId) -> MonoResult<DefId> {
        let module = self.mono(mono)?;
        module
            .by_poly_field
            .get(&poly_field)
            .and_then(|&index| module.fields.get(index))
            .map(|field| field.def)
            .ok_or_else(|| MonoError::invariant(format!("{mono:?} has no field instantiated from {poly_field:?}")))
    }

    pub fn owner_of(&self, def: DefId) -> Option<MonoModId> {
        self.owners.get(&def).copied()
    }

    pub fn cached_instance(&self, poly: PolyModId, args: ArgListId) -> MonoResult<Option<MonoModId>> {
        Ok(self.poly(poly)?.instances.get(&args).copied())
    }

    pub(crate) fn cache_instance(&mut self, poly: PolyModId, args: ArgListId, mono: MonoModId) -> MonoResult<()> {
        self.poly_mut(poly)?.instances.insert(args, mono);
        Ok(())
    }

    pub(crate) fn uncache_instance(&mut self, poly: PolyModId, args: ArgListId) -> MonoResult<()> {
        self.poly_mut(poly)?.instances.remove(&args);
        Ok(())
    }

    /// Record a lambda encountered while evaluating `mono`. Returns its index;
    /// registering the same lambda again returns the existing index.
    pub fn register_lambda(&mut self, mono: MonoModId, lambda: ExpId) -> MonoResult<usize> {
        let module = self.mono_mut(mono)?;
        if module.seen_lambdas.insert(lambda) {
            module.lambdas.push(lambda);
            return Ok(module.lambdas.len() - 1);
        }
        module
            .lambdas
            .iter()
            .position(|&l| l == lambda)
            .ok_or_else(|| MonoError::invariant("lambda registry out of sync"))
    }

    pub fn lambda_count(&self, mono: MonoModId) -> MonoResult<usize> {
        Ok(self.mono(mono)?.lambdas.len())
    }

    pub fn lambda_at(&self, mono: MonoModId, index: usize) -> MonoResult<ExpId> {
        self.mono(mono)?
            .lambdas
            .get(index)
            .copied()
            .ok_or_else(|| MonoError::invariant(format!("{mono:?} has no lambda {index}")))
    }

    pub fn poly_count(&self) -> usize {
        self.polys.len()
    }

    pub fn mono_count(&self) -> usize {
        self.monos.len()
    }

    pub fn mono_ids(&self) -> impl Iterator<Item = MonoModId> {
        (0..self.monos.len()).map(MonoModId::from_index)
    }

    pub fn poly_ids(&self) -> impl Iterator<Item = PolyModId> {
        (0..self.polys.len()).map(PolyModId::from_index)
    }
}

#[cfg(test)]
mod tests;
