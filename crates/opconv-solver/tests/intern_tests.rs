use super::*;

#[test]
fn test_builtin_ids_are_stable() {
    let interner = TypeInterner::new();
    assert_eq!(
        interner.lookup(TypeId::INT),
        Some(TypeData::Intrinsic(IntrinsicKind::Int))
    );
    assert_eq!(
        interner.lookup(TypeId::ERROR),
        Some(TypeData::Intrinsic(IntrinsicKind::Error))
    );
    assert_eq!(
        interner.lookup(TypeId::NULLABLE_ANY),
        Some(TypeData::Nullable(TypeId::ANY))
    );
    assert_eq!(
        interner.lookup(TypeId::NULL),
        Some(TypeData::Nullable(TypeId::NOTHING))
    );
    assert_eq!(interner.len(), TypeId::FIRST_USER as usize);
}

#[test]
fn test_interning_is_structural() {
    let interner = TypeInterner::new();
    let a = interner.application(DefId(1), &[TypeId::INT]);
    let b = interner.application(DefId(1), &[TypeId::INT]);
    let c = interner.application(DefId(1), &[TypeId::STRING]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(!a.is_builtin());
}

#[test]
fn test_nullable_is_idempotent() {
    let interner = TypeInterner::new();
    let int_q = interner.nullable(TypeId::INT);
    assert_eq!(interner.nullable(int_q), int_q);
    assert_eq!(interner.nullable(TypeId::ANY), TypeId::NULLABLE_ANY);
    assert_eq!(interner.nullable(TypeId::NOTHING), TypeId::NULL);
    assert_eq!(interner.non_null(int_q), TypeId::INT);
    assert_eq!(interner.non_null(TypeId::INT), TypeId::INT);
    assert!(interner.is_marked_nullable(int_q));
    assert!(!interner.is_marked_nullable(TypeId::INT));
}

#[test]
fn test_error_type_never_becomes_nullable() {
    let interner = TypeInterner::new();
    assert_eq!(interner.nullable(TypeId::ERROR), TypeId::ERROR);
}

#[test]
fn test_unknown_id_lookup_is_none() {
    let interner = TypeInterner::new();
    assert_eq!(interner.lookup(TypeId(10_000)), None);
    assert_eq!(interner.nullable(TypeId(10_000)), TypeId(10_000));
}

#[test]
fn test_string_interning_round_trip() {
    let interner = TypeInterner::new();
    let atom = interner.intern_string("Container");
    assert_eq!(interner.intern_string("Container"), atom);
    assert_eq!(&*interner.resolve_atom(atom), "Container");
}
