//! The session: owner of every table.
//!
//! Independent sessions share nothing, so two compilations can run on two
//! threads. A single session is driven through `&mut self` from one thread.

use qy_ir::{
    DefId, DefKind, DefTable, DefTarget, ExpId, Mast, MonoError, MonoModId, MonoResult, Name, PolyModId,
    StringInterner, TsId, TypeId, ValueId,
};
use qy_stack::DepthBudget;
use qy_types::{ArgListTrie, TypePool};
use qy_values::{CellStore, LocalBinding, ValueTable};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::eval::Evaluator;
use crate::modules::{ModParent, ModuleTable};
use crate::rewrite::Rewriter;
use crate::{SessionConfig, Substitution};

pub struct Session {
    pub interner: StringInterner,
    pub mast: Mast,
    pub defs: DefTable,
    pub values: ValueTable,
    pub cells: CellStore,
    pub arg_lists: ArgListTrie,
    pub types: TypePool,
    pub modules: ModuleTable,
    config: SessionConfig,
    /// Shared by every nested rewrite and evaluation step.
    pub(crate) depth: DepthBudget,
    /// Results of evaluated `ConstExp`/`ConstTs` definitions.
    evaluated: FxHashMap<DefId, LocalBinding>,
    /// Definitions whose evaluation is on the current call path.
    in_progress: FxHashSet<DefId>,
    /// Definition to the total definition minted for it by `eval_def`.
    totals: FxHashMap<DefId, DefId>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Session {
            interner: StringInterner::new(),
            mast: Mast::new(),
            defs: DefTable::new(),
            values: ValueTable::new(config.max_value_hash_bytes),
            cells: CellStore::new(),
            arg_lists: ArgListTrie::new(),
            types: TypePool::new(),
            modules: ModuleTable::new(),
            depth: DepthBudget::new(config.max_eval_depth),
            config,
            evaluated: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            totals: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // Module construction

    pub fn new_polymorphic_module(&mut self, name: Name, formals: Vec<DefId>) -> MonoResult<PolyModId> {
        for &formal in &formals {
            if !self.defs.is_bound_var(formal)? {
                return Err(MonoError::invariant(format!("formal {formal:?} is not a bound variable")));
            }
        }
        Ok(self.modules.new_poly(name, formals))
    }

    /// Add a field to a poly module. The field must be a `ConstExp` or
    /// `ConstTs` definition; its target may still be unset.
    pub fn add_poly_field(&mut self, poly: PolyModId, def: DefId) -> MonoResult<()> {
        let kind = self.defs.kind(def)?;
        if !matches!(kind, DefKind::ConstExp | DefKind::ConstTs) {
            return Err(MonoError::invariant(format!("poly field {def:?} has kind {kind:?}")));
        }
        self.modules.push_poly_field(poly, def)
    }

    pub fn new_monomorphic_module(&mut self, name: Name, parent: Option<MonoModId>) -> MonoResult<MonoModId> {
        if let Some(parent) = parent {
            self.modules.mono(parent)?;
        }
        let parent = parent.map(ModParent::Mono);
        Ok(self.modules.new_mono(name, parent, qy_ir::ArgListId::EMPTY))
    }

    pub fn add_mono_field(&mut self, mono: MonoModId, def: DefId) -> MonoResult<usize> {
        let kind = self.defs.kind(def)?;
        if kind.is_bound_var() {
            return Err(MonoError::invariant(format!("mono field {def:?} is a bound variable")));
        }
        self.modules.push_mono_field(mono, def)
    }

    // Rewriting

    /// Rewrite a type-spec into monomorphic MAST under `sub`.
    pub fn rewrite_ts(&mut self, ts: TsId, sub: &Substitution) -> MonoResult<TsId> {
        Rewriter::new(self, sub).rewrite_ts(ts)
    }

    /// Rewrite an expression into monomorphic MAST under `sub`.
    pub fn rewrite_exp(&mut self, exp: ExpId, sub: &Substitution) -> MonoResult<ExpId> {
        Rewriter::new(self, sub).rewrite_exp(exp)
    }

    /// Rewrite the definition `def` under `sub`, returning `def` itself when
    /// nothing changes.
    pub fn rewrite_def(&mut self, def: DefId, sub: &Substitution) -> MonoResult<DefId> {
        Rewriter::new(self, sub).rewrite_def(def)
    }

    // Evaluation

    /// Rewrite `ts` under `sub`, then evaluate it to a canonical type.
    #[tracing::instrument(level = "debug", skip(self, sub))]
    pub fn eval_type(&mut self, ts: TsId, sub: &Substitution, module: Option<MonoModId>) -> MonoResult<TypeId> {
        let mono_ts = self.rewrite_ts(ts, sub)?;
        Evaluator::new(self, module).eval_ts(mono_ts)
    }

    /// Rewrite `exp` under `sub`, then evaluate it to a value.
    #[tracing::instrument(level = "debug", skip(self, sub))]
    pub fn eval_exp(&mut self, exp: ExpId, sub: &Substitution, module: Option<MonoModId>) -> MonoResult<ValueId> {
        let mono_exp = self.rewrite_exp(exp, sub)?;
        Evaluator::new(self, module).eval_exp(mono_exp)
    }

    /// Force a definition to a total constant.
    ///
    /// Total definitions are returned as-is. Constants are rewritten (which
    /// instantiates any poly module they reference), evaluated, and bound
    /// to a fresh `ConstTotVal`/`ConstTotTid` definition with the same name.
    /// Repeated calls return the same total definition.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn eval_def(&mut self, def: DefId, module: Option<MonoModId>) -> MonoResult<DefId> {
        let kind = self.defs.kind(def)?;
        if kind.is_total() {
            return Ok(def);
        }
        if kind.is_bound_var() {
            return Err(MonoError::BoundVariableInEval { def });
        }
        if let Some(&total) = self.totals.get(&def) {
            return Ok(total);
        }
        let mono_def = self.rewrite_def(def, &Substitution::new())?;
        let binding = self.eval_global(mono_def, module)?;
        let name = self.defs.name(def)?;
        let total = match binding {
            LocalBinding::Value(value) => self.defs.define_total_value(name, value),
            LocalBinding::Type(ty) => self.defs.define_total_type(name, ty),
        };
        self.totals.insert(def, total);
        Ok(total)
    }

    /// Evaluate every field of a monomorphic module that has no total yet.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn evaluate_mono_module(&mut self, mono: MonoModId) -> MonoResult<()> {
        let field_count = self.modules.mono(mono)?.fields().len();
        for index in 0..field_count {
            let field = self.modules.mono(mono)?.fields()[index];
            if field.total.is_some() {
                continue;
            }
            let total = self.eval_def(field.def, Some(mono))?;
            self.modules.set_field_total(mono, index, total)?;
        }
        Ok(())
    }

    /// Evaluate a global definition of the monomorphic MAST.
    ///
    /// Results of `ConstExp`/`ConstTs` definitions are cached. A definition
    /// that is reached again while its own evaluation is still running is an
    /// immediate cycle.
    pub(crate) fn eval_global(&mut self, def: DefId, module: Option<MonoModId>) -> MonoResult<LocalBinding> {
        let kind = self.defs.kind(def)?;
        match kind {
            DefKind::BvExp | DefKind::BvTs => Err(MonoError::BoundVariableInEval { def }),
            DefKind::ConstTotVal | DefKind::ConstTotTid => match self.defs.target(def)? {
                DefTarget::Value(value) => Ok(LocalBinding::Value(value)),
                DefTarget::Type(ty) => Ok(LocalBinding::Type(ty)),
                other => Err(MonoError::invariant(format!("total {def:?} targets {other:?}"))),
            },
            DefKind::ConstExp | DefKind::ConstTs => {
                if let Some(&binding) = self.evaluated.get(&def) {
                    return Ok(binding);
                }
                if !self.in_progress.insert(def) {
                    tracing::debug!(?def, "cyclic definition");
                    return Err(MonoError::CyclicDefinition { def });
                }
                let module = self.modules.owner_of(def).or(module);
                let result = self.eval_const_body(def, module);
                self.in_progress.remove(&def);
                let binding = result?;
                self.evaluated.insert(def, binding);
                Ok(binding)
            }
        }
    }

    fn eval_const_body(&mut self, def: DefId, module: Option<MonoModId>) -> MonoResult<LocalBinding> {
        let target = self.defs.target(def)?;
        let mut evaluator = Evaluator::new(self, module);
        match target {
            DefTarget::Exp(exp) => evaluator.eval_exp(exp).map(LocalBinding::Value),
            DefTarget::Ts(ts) => evaluator.eval_ts(ts).map(LocalBinding::Type),
            other => Err(MonoError::invariant(format!("constant {def:?} targets {other:?}"))),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
