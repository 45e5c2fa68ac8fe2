use super::*;
use crate::def::{ClassDef, DefinitionStore, FunctionDef};
use crate::types::Variance;
use crate::{TypeDatabase, TypeInterner};

#[test]
fn test_own_members_come_before_inherited() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let ctx = SolverContext::new(&interner, &store);
    let contains = interner.intern_string("contains");
    let item = interner.intern_string("item");

    let e = store.register_type_param(interner.intern_string("E"), Variance::Out);
    let base = store.register_class(
        ClassDef::new(interner.intern_string("Base")).with_type_params(vec![e]),
    );
    let inherited = store.register_function(
        FunctionDef::new(contains)
            .with_owner(base)
            .with_param(item, interner.type_param(e))
            .operator(),
    );

    let t = store.register_type_param(interner.intern_string("T"), Variance::Invariant);
    let t_ty = interner.type_param(t);
    let derived = store.register_class(
        ClassDef::new(interner.intern_string("Derived"))
            .with_type_params(vec![t])
            .with_supertypes(vec![interner.application(base, &[t_ty])]),
    );
    let own = store.register_function(
        FunctionDef::new(contains)
            .with_owner(derived)
            .with_param(item, TypeId::INT)
            .operator(),
    );
    let _ = store.register_function(FunctionDef::new(interner.intern_string("size")).with_owner(derived));

    let derived_strings = interner.application(derived, &[TypeId::STRING]);
    let found = member_functions_named(ctx, derived_strings, contains);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].function, own);
    assert_eq!(found[0].declaring_class, derived);
    assert_eq!(found[0].class_substitution.get(t), Some(TypeId::STRING));
    assert_eq!(found[1].function, inherited);
    assert_eq!(found[1].declaring_class, base);
    assert_eq!(found[1].class_substitution.get(e), Some(TypeId::STRING));
}

#[test]
fn test_type_parameter_uses_upper_bound_members() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let ctx = SolverContext::new(&interner, &store);
    let contains = interner.intern_string("contains");

    let range = store.register_class(ClassDef::new(interner.intern_string("Range")));
    let member = store.register_function(
        FunctionDef::new(contains)
            .with_owner(range)
            .with_param(interner.intern_string("value"), TypeId::INT)
            .operator(),
    );
    let t = store.register_type_param(interner.intern_string("T"), Variance::Invariant);
    store.set_upper_bound(t, interner.application(range, &[]));

    let found = member_functions_named(ctx, interner.type_param(t), contains);
    assert_eq!(found.iter().map(|m| m.function).collect::<Vec<_>>(), vec![member]);

    let unbounded = store.register_type_param(interner.intern_string("U"), Variance::Invariant);
    assert!(member_functions_named(ctx, interner.type_param(unbounded), contains).is_empty());
}

#[test]
fn test_intrinsic_and_nullable_types_have_no_members() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let ctx = SolverContext::new(&interner, &store);
    let contains = interner.intern_string("contains");
    let range = store.register_class(ClassDef::new(interner.intern_string("Range")));
    let _ = store.register_function(FunctionDef::new(contains).with_owner(range).operator());
    let range_ty = interner.application(range, &[]);

    assert_eq!(member_functions_named(ctx, range_ty, contains).len(), 1);
    assert!(member_functions_named(ctx, interner.nullable(range_ty), contains).is_empty());
    assert!(member_functions_named(ctx, TypeId::STRING, contains).is_empty());
}

#[test]
fn test_cyclic_supertypes_terminate() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let ctx = SolverContext::new(&interner, &store);
    let contains = interner.intern_string("contains");
    let a = store.register_class(ClassDef::new(interner.intern_string("A")));
    let b = store.register_class(ClassDef::new(interner.intern_string("B")));
    store.add_supertype(a, interner.application(b, &[]));
    store.add_supertype(b, interner.application(a, &[]));
    let member = store.register_function(FunctionDef::new(contains).with_owner(b).operator());

    let found = member_functions_named(ctx, interner.application(a, &[]), contains);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].function, member);
}
