use super::*;
use pretty_assertions::assert_eq;
use qy_ir::StringInterner;

fn name(s: &str) -> Name {
    StringInterner::new().intern_value(s)
}

#[test]
fn test_poly_and_mono_registration() {
    let mut modules = ModuleTable::new();
    let poly = modules.new_poly(name("Vec"), vec![DefId::new(0)]);
    assert_eq!(modules.push_poly_field(poly, DefId::new(1)), Ok(()));

    let mono = modules.new_mono(name("Vec"), Some(ModParent::Poly(poly)), ArgListId::new(3));
    assert_eq!(modules.push_instantiated_field(mono, DefId::new(1), DefId::new(9)), Ok(()));

    assert_eq!(modules.poly(poly).map(|p| p.fields.clone()), Ok(vec![DefId::new(1)]));
    assert_eq!(modules.mono_field_for(mono, DefId::new(1)), Ok(DefId::new(9)));
    assert_eq!(modules.owner_of(DefId::new(9)), Some(mono));
    assert!(modules.mono_field_for(mono, DefId::new(2)).is_err());
}

#[test]
fn test_instance_cache() {
    let mut modules = ModuleTable::new();
    let poly = modules.new_poly(name("Box"), Vec::new());
    let mono = modules.new_mono(name("Box"), Some(ModParent::Poly(poly)), ArgListId::EMPTY);

    assert_eq!(modules.cached_instance(poly, ArgListId::EMPTY), Ok(None));
    assert_eq!(modules.cache_instance(poly, ArgListId::EMPTY, mono), Ok(()));
    assert_eq!(modules.cached_instance(poly, ArgListId::EMPTY), Ok(Some(mono)));
    assert_eq!(modules.poly(poly).map(PolyModule::instance_count), Ok(1));

    assert_eq!(modules.uncache_instance(poly, ArgListId::EMPTY), Ok(()));
    assert_eq!(modules.cached_instance(poly, ArgListId::EMPTY), Ok(None));
}

#[test]
fn test_field_totals() {
    let mut modules = ModuleTable::new();
    let mono = modules.new_mono(name("main"), None, ArgListId::EMPTY);
    let index = modules.push_mono_field(mono, DefId::new(4));
    assert_eq!(index, Ok(0));
    assert_eq!(modules.set_field_total(mono, 0, DefId::new(5)), Ok(()));
    assert_eq!(
        modules.mono(mono).map(|m| m.fields().to_vec()),
        Ok(vec![MonoField {
            def: DefId::new(4),
            total: Some(DefId::new(5))
        }])
    );
    assert!(modules.set_field_total(mono, 1, DefId::new(5)).is_err());
}

#[test]
fn test_lambda_registry_dedups() {
    let mut modules = ModuleTable::new();
    let mono = modules.new_mono(name("main"), None, ArgListId::EMPTY);

    assert_eq!(modules.register_lambda(mono, ExpId::new(7)), Ok(0));
    assert_eq!(modules.register_lambda(mono, ExpId::new(8)), Ok(1));
    assert_eq!(modules.register_lambda(mono, ExpId::new(7)), Ok(0));
    assert_eq!(modules.lambda_count(mono), Ok(2));
    assert_eq!(modules.lambda_at(mono, 1), Ok(ExpId::new(8)));
    assert!(modules.lambda_at(mono, 2).is_err());
}

#[test]
fn test_unknown_modules() {
    let modules = ModuleTable::new();
    assert!(modules.poly(PolyModId::new(0)).is_err());
    assert!(modules.mono(MonoModId::new(0)).is_err());
    assert_eq!(modules.mono_ids().count(), 0);
}
