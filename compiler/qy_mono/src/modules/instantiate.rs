//! Poly module instantiation.

use qy_ir::{ArgListId, DefId, DefKind, MonoError, MonoModId, MonoResult, PolyModId};
use qy_types::Arg;
use rustc_hash::FxHashMap;

use super::ModParent;
use crate::rewrite::Rewriter;
use crate::{Session, Substitution};

impl Session {
    /// Instantiate `poly` with the actual arguments `args`.
    ///
    /// Instances are cached per argument list; since argument lists are
    /// hash-consed, structurally equal arguments yield the same module. The
    /// new module is cached before its fields are rewritten, so a field that
    /// refers back to its own instantiation resolves to the module being
    /// built. A failed instantiation is removed from the cache again, so a
    /// later request retries it instead of seeing a half-built module.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn instantiate_poly_mod(&mut self, poly: PolyModId, args: ArgListId) -> MonoResult<MonoModId> {
        if let Some(mono) = self.modules.cached_instance(poly, args)? {
            tracing::debug!(?mono, "instance cache hit");
            return Ok(mono);
        }

        let module = self.modules.poly(poly)?;
        let name = module.name;
        let formals = module.formals.clone();
        let poly_fields = module.fields.clone();

        let actuals = self.arg_lists.to_vec(args)?;
        if actuals.len() != formals.len() {
            return Err(MonoError::ArityMismatch {
                expected: formals.len(),
                found: actuals.len(),
            });
        }

        let mut sub = Substitution::new();
        for (&formal, actual) in formals.iter().zip(actuals) {
            let formal_name = self.defs.name(formal)?;
            let total = match (self.defs.kind(formal)?, actual) {
                (DefKind::BvExp, Arg::Value(value)) => self.defs.define_total_value(formal_name, value),
                (DefKind::BvTs, Arg::Type(ty)) => self.defs.define_total_type(formal_name, ty),
                (kind, actual) => {
                    return Err(MonoError::invariant(format!(
                        "formal {formal:?} of kind {kind:?} cannot take {actual:?}"
                    )));
                }
            };
            sub.insert(&self.defs, formal, total)?;
        }

        let mono = self.modules.new_mono(name, Some(ModParent::Poly(poly)), args);
        self.modules.cache_instance(poly, args, mono)?;
        tracing::debug!(?mono, fields = poly_fields.len(), "instantiating");

        if let Err(err) = self.fill_instance(mono, &poly_fields, &sub) {
            tracing::debug!(?mono, %err, "instantiation failed");
            self.modules.uncache_instance(poly, args)?;
            return Err(err);
        }
        Ok(mono)
    }

    /// Declare, rewrite and evaluate the fields of a freshly cached instance.
    fn fill_instance(&mut self, mono: MonoModId, poly_fields: &[DefId], sub: &Substitution) -> MonoResult<()> {
        let mut fields = Vec::with_capacity(poly_fields.len());
        for &poly_field in poly_fields {
            let kind = self.defs.kind(poly_field)?;
            let field_name = self.defs.name(poly_field)?;
            let mono_field = self.defs.declare(kind, field_name);
            self.modules.push_instantiated_field(mono, poly_field, mono_field)?;
            fields.push((poly_field, mono_field));
        }

        // Sibling references resolve to this instance's own fields.
        let memo: FxHashMap<_, _> = fields.iter().copied().collect();
        let mut rewriter = Rewriter::new(self, sub).with_memo(memo);
        for &(poly_field, mono_field) in &fields {
            rewriter.define_field(poly_field, mono_field)?;
        }

        self.evaluate_mono_module(mono)
    }
}
