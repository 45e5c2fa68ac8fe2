use super::*;
use crate::def::{ClassDef, DefinitionStore};
use crate::{TypeDatabase, TypeInterner};

struct Fixture {
    interner: TypeInterner,
    store: DefinitionStore,
}

impl Fixture {
    fn new() -> Self {
        Self {
            interner: TypeInterner::new(),
            store: DefinitionStore::new(),
        }
    }

    fn ctx(&self) -> SolverContext<'_> {
        SolverContext::new(&self.interner, &self.store)
    }

    fn param(&self, name: &str) -> (TypeParamId, TypeId) {
        let id = self
            .store
            .register_type_param(self.interner.intern_string(name), Variance::Invariant);
        (id, self.interner.type_param(id))
    }

    fn class(&self, name: &str, variances: &[Variance]) -> DefId {
        let params = variances
            .iter()
            .map(|&variance| {
                self.store
                    .register_type_param(self.interner.intern_string("E"), variance)
            })
            .collect();
        self.store
            .register_class(ClassDef::new(self.interner.intern_string(name)).with_type_params(params))
    }

    fn relate(&self, free: &[TypeParamId], sub: TypeId, sup: TypeId) -> Option<Substitution> {
        let mut free = free.to_vec();
        free.sort_unstable();
        let mut unifier = Unifier::new(self.ctx(), &free);
        unifier.relate_subtype(sub, sup).then(|| unifier.finish())
    }
}

#[test]
fn test_free_param_binds_on_either_side() {
    let f = Fixture::new();
    let (t, t_ty) = f.param("T");

    let sub = f.relate(&[t], TypeId::INT, t_ty).expect("binds supertype side");
    assert_eq!(sub.get(t), Some(TypeId::INT));

    let sub = f.relate(&[t], t_ty, TypeId::STRING).expect("binds subtype side");
    assert_eq!(sub.get(t), Some(TypeId::STRING));
}

#[test]
fn test_rigid_param_relates_through_bound() {
    let f = Fixture::new();
    let (_, t_ty) = f.param("T");
    // Unbounded `T` has the implicit `Any?` bound.
    assert!(f.relate(&[], t_ty, TypeId::NULLABLE_ANY).is_some());
    assert!(f.relate(&[], t_ty, TypeId::ANY).is_none());
    assert!(f.relate(&[], TypeId::INT, t_ty).is_none());
    assert!(f.relate(&[], t_ty, t_ty).is_some());
}

#[test]
fn test_nullable_rules() {
    let f = Fixture::new();
    let int_q = f.interner.nullable(TypeId::INT);
    assert!(f.relate(&[], TypeId::INT, int_q).is_some());
    assert!(f.relate(&[], int_q, TypeId::INT).is_none());
    assert!(f.relate(&[], TypeId::NULL, int_q).is_some());
    assert!(f.relate(&[], TypeId::NULL, TypeId::INT).is_none());
    assert!(f.relate(&[], int_q, TypeId::NULLABLE_ANY).is_some());
}

#[test]
fn test_nothing_and_any() {
    let f = Fixture::new();
    assert!(f.relate(&[], TypeId::NOTHING, TypeId::STRING).is_some());
    assert!(f.relate(&[], TypeId::STRING, TypeId::ANY).is_some());
    assert!(f.relate(&[], TypeId::ANY, TypeId::STRING).is_none());
    assert!(f.relate(&[], TypeId::INT, TypeId::LONG).is_none());
}

#[test]
fn test_error_relates_to_everything() {
    let f = Fixture::new();
    assert!(f.relate(&[], TypeId::ERROR, TypeId::INT).is_some());
    assert!(f.relate(&[], TypeId::STRING, TypeId::ERROR).is_some());
}

#[test]
fn test_free_param_binds_to_nullable_through_nullable_target() {
    let f = Fixture::new();
    let (t, t_ty) = f.param("T");
    let t_q = f.interner.nullable(t_ty);

    let sub = f.relate(&[t], f.interner.nullable(TypeId::INT), t_q).expect("T? matches Int?");
    assert_eq!(sub.get(t), Some(TypeId::INT));

    let sub = f.relate(&[t], TypeId::STRING, t_q).expect("T? matches String");
    assert_eq!(sub.get(t), Some(TypeId::STRING));
}

#[test]
fn test_invariant_arguments_must_agree() {
    let f = Fixture::new();
    let list = f.class("MutableList", &[Variance::Invariant]);
    let (t, t_ty) = f.param("T");
    let ints = f.interner.application(list, &[TypeId::INT]);
    let anys = f.interner.application(list, &[TypeId::ANY]);

    assert!(f.relate(&[], ints, anys).is_none());
    let sub = f
        .relate(&[t], ints, f.interner.application(list, &[t_ty]))
        .expect("T binds to Int");
    assert_eq!(sub.get(t), Some(TypeId::INT));
}

#[test]
fn test_variance_directs_argument_relation() {
    let f = Fixture::new();
    let source = f.class("Source", &[Variance::Out]);
    let sink = f.class("Sink", &[Variance::In]);

    let out_int = f.interner.application(source, &[TypeId::INT]);
    let out_any = f.interner.application(source, &[TypeId::ANY]);
    assert!(f.relate(&[], out_int, out_any).is_some());
    assert!(f.relate(&[], out_any, out_int).is_none());

    let in_int = f.interner.application(sink, &[TypeId::INT]);
    let in_any = f.interner.application(sink, &[TypeId::ANY]);
    assert!(f.relate(&[], in_any, in_int).is_some());
    assert!(f.relate(&[], in_int, in_any).is_none());
}

#[test]
fn test_supertype_walk_instantiates_arguments() {
    let f = Fixture::new();
    let collection = f.class("Collection", &[Variance::Out]);
    let (e, e_ty) = f.param("E");
    let list = f.store.register_class(
        ClassDef::new(f.interner.intern_string("List"))
            .with_type_params(vec![e])
            .with_supertypes(vec![f.interner.application(collection, &[e_ty])]),
    );
    let (t, t_ty) = f.param("T");

    let strings = f.interner.application(list, &[TypeId::STRING]);
    let target = f.interner.application(collection, &[t_ty]);
    let sub = f.relate(&[t], strings, target).expect("List<String> <: Collection<T>");
    assert_eq!(sub.get(t), Some(TypeId::STRING));

    let unrelated = f.class("Unrelated", &[]);
    assert!(f.relate(&[], f.interner.application(unrelated, &[]), target).is_none());
}

#[test]
fn test_bound_is_checked_when_binding() {
    let f = Fixture::new();
    let (t, t_ty) = f.param("T");
    let number = f.class("Number", &[]);
    let number_ty = f.interner.application(number, &[]);
    f.store.set_upper_bound(t, number_ty);

    assert!(f.relate(&[t], TypeId::STRING, t_ty).is_none());
    let boxed = f.class("BoxedNumber", &[]);
    f.store.add_supertype(boxed, number_ty);
    let boxed_ty = f.interner.application(boxed, &[]);
    let sub = f.relate(&[t], boxed_ty, t_ty).expect("within bound");
    assert_eq!(sub.get(t), Some(boxed_ty));
}

#[test]
fn test_occurs_check_rejects_infinite_types() {
    let f = Fixture::new();
    let list = f.class("List", &[Variance::Out]);
    let (t, t_ty) = f.param("T");
    let list_t = f.interner.application(list, &[t_ty]);
    assert!(f.relate(&[t], list_t, t_ty).is_none());
}

#[test]
fn test_failed_alternative_rolls_back_bindings() {
    let f = Fixture::new();
    let pair = f.class("Pair", &[Variance::Invariant, Variance::Invariant]);
    let (t, t_ty) = f.param("T");
    // Pair<Int, String> against Pair<T, T>: T binds to Int, then fails on String.
    let concrete = f.interner.application(pair, &[TypeId::INT, TypeId::STRING]);
    let generic = f.interner.application(pair, &[t_ty, t_ty]);
    assert!(f.relate(&[t], concrete, generic).is_none());

    let same = f.interner.application(pair, &[TypeId::INT, TypeId::INT]);
    let sub = f.relate(&[t], same, generic).expect("consistent binding");
    assert_eq!(sub.get(t), Some(TypeId::INT));
}

#[test]
fn test_finish_resolves_chained_bindings() {
    let f = Fixture::new();
    let pair = f.class("Pair", &[Variance::Invariant, Variance::Invariant]);
    let (t, t_ty) = f.param("T");
    let (u, u_ty) = f.param("U");
    // Pair<T, U> against Pair<U, Int>: T := U, U := Int.
    let left = f.interner.application(pair, &[t_ty, u_ty]);
    let right = f.interner.application(pair, &[u_ty, TypeId::INT]);
    let sub = f.relate(&[t, u], left, right).expect("unifiable");
    assert_eq!(sub.get(u), Some(TypeId::INT));
    assert_eq!(sub.get(t), Some(TypeId::INT));
}
