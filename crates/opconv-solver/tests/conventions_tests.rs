use super::*;
use crate::def::{ClassDef, DefId, DefinitionStore, FunctionId};
use crate::types::{TypeId, Variance};
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

    fn class(&self, name: &str) -> (DefId, TypeId) {
        let id = self
            .store
            .register_class(ClassDef::new(self.interner.intern_string(name)));
        (id, self.interner.application(id, &[]))
    }

    fn register(&self, function: FunctionDef) -> (FunctionId, FunctionSignature) {
        let id = self.store.register_function(function.clone());
        (id, FunctionSignature::declared(self.ctx(), id, &function))
    }

    fn named(&self, name: &str) -> FunctionDef {
        FunctionDef::new(self.interner.intern_string(name))
    }
}

#[test]
fn test_operator_names() {
    assert_eq!(OperatorName::Contains.as_str(), "contains");
    assert_eq!(OperatorName::GetValue.as_str(), "getValue");
    assert_eq!(OperatorName::SetValue.as_str(), "setValue");
    assert_eq!(OperatorName::Contains.required_value_params(), 1);
    assert_eq!(OperatorName::GetValue.required_value_params(), 2);
    assert_eq!(OperatorName::SetValue.required_value_params(), 3);
}

#[test]
fn test_eligibility_requires_operator_marking_and_arity() {
    let f = Fixture::new();
    let convention = OperatorConvention::Contains {
        argument_type: FuzzyType::concrete(TypeId::INT),
    };
    let item = f.interner.intern_string("item");
    let marked = f.named("contains").with_param(item, TypeId::INT).operator();
    let unmarked = f.named("contains").with_param(item, TypeId::INT);
    let wrong_arity = f
        .named("contains")
        .with_param(item, TypeId::INT)
        .with_param(item, TypeId::INT)
        .operator();
    assert!(convention.is_eligible(&marked));
    assert!(!convention.is_eligible(&unmarked));
    assert!(!convention.is_eligible(&wrong_arity));
    assert_eq!(convention.name(), OperatorName::Contains);
}

#[test]
fn test_contains_binds_own_type_params() {
    let f = Fixture::new();
    let (t, t_ty) = f.param("T");
    let (_, signature) = f.register(
        f.named("contains")
            .with_type_params(vec![t])
            .with_param(f.interner.intern_string("item"), t_ty)
            .returning(TypeId::BOOLEAN)
            .operator(),
    );
    let convention = OperatorConvention::Contains {
        argument_type: FuzzyType::concrete(TypeId::STRING),
    };
    let sub = convention
        .check_is_suitable_by_type(f.ctx(), &signature, &[])
        .expect("T accepts String");
    assert_eq!(sub.get(t), Some(TypeId::STRING));
}

#[test]
fn test_contains_rejects_incompatible_argument() {
    let f = Fixture::new();
    let (_, signature) = f.register(
        f.named("contains")
            .with_param(f.interner.intern_string("item"), TypeId::INT)
            .operator(),
    );
    let convention = OperatorConvention::Contains {
        argument_type: FuzzyType::concrete(TypeId::STRING),
    };
    assert!(convention.check_is_suitable_by_type(f.ctx(), &signature, &[]).is_none());

    let nullable = OperatorConvention::Contains {
        argument_type: FuzzyType::concrete(f.interner.nullable(TypeId::INT)),
    };
    assert!(nullable.check_is_suitable_by_type(f.ctx(), &signature, &[]).is_none());
}

#[test]
fn test_contains_binds_caller_free_params() {
    let f = Fixture::new();
    let (_, signature) = f.register(
        f.named("contains")
            .with_param(f.interner.intern_string("item"), TypeId::LONG)
            .operator(),
    );
    let (x, x_ty) = f.param("X");
    let convention = OperatorConvention::Contains {
        argument_type: FuzzyType::new(&f.interner, x_ty, [x]),
    };
    let sub = convention
        .check_is_suitable_by_type(f.ctx(), &signature, &[x])
        .expect("X binds to Long");
    assert_eq!(sub.get(x), Some(TypeId::LONG));
}

#[test]
fn test_get_value_chains_owner_and_return_constraints() {
    let f = Fixture::new();
    let (_, owner_ty) = f.class("Owner");
    let (r, r_ty) = f.param("R");
    let (t, t_ty) = f.param("T");
    let this_ref = f.interner.intern_string("thisRef");
    let property = f.interner.intern_string("property");
    let (_, signature) = f.register(
        f.named("getValue")
            .with_type_params(vec![r, t])
            .with_param(this_ref, r_ty)
            .with_param(property, TypeId::ANY)
            .returning(t_ty)
            .operator(),
    );

    let convention = OperatorConvention::GetValue {
        property_owner: FuzzyType::concrete(owner_ty),
        property_type: Some(FuzzyType::concrete(TypeId::STRING)),
    };
    let sub = convention
        .check_is_suitable_by_type(f.ctx(), &signature, &[])
        .expect("both constraints hold");
    assert_eq!(sub.get(r), Some(owner_ty));
    assert_eq!(sub.get(t), Some(TypeId::STRING));

    let without_type = OperatorConvention::GetValue {
        property_owner: FuzzyType::concrete(owner_ty),
        property_type: None,
    };
    let sub = without_type
        .check_is_suitable_by_type(f.ctx(), &signature, &[])
        .expect("owner constraint holds");
    assert_eq!(sub.get(r), Some(owner_ty));
    assert!(!sub.contains(t));
}

#[test]
fn test_get_value_return_sees_owner_binding() {
    let f = Fixture::new();
    let (t, t_ty) = f.param("T");
    let this_ref = f.interner.intern_string("thisRef");
    let property = f.interner.intern_string("property");
    // operator fun <T> getValue(thisRef: T, property: Any): T
    let (_, signature) = f.register(
        f.named("getValue")
            .with_type_params(vec![t])
            .with_param(this_ref, t_ty)
            .with_param(property, TypeId::ANY)
            .returning(t_ty)
            .operator(),
    );
    let mismatched = OperatorConvention::GetValue {
        property_owner: FuzzyType::concrete(TypeId::INT),
        property_type: Some(FuzzyType::concrete(TypeId::STRING)),
    };
    assert!(mismatched.check_is_suitable_by_type(f.ctx(), &signature, &[]).is_none());

    let matching = OperatorConvention::GetValue {
        property_owner: FuzzyType::concrete(TypeId::INT),
        property_type: Some(FuzzyType::concrete(TypeId::ANY)),
    };
    let sub = matching
        .check_is_suitable_by_type(f.ctx(), &signature, &[])
        .expect("Int <: Any");
    assert_eq!(sub.get(t), Some(TypeId::INT));
}

#[test]
fn test_get_value_without_return_type_is_rejected_when_constrained() {
    let f = Fixture::new();
    let (_, owner_ty) = f.class("Owner");
    let (_, signature) = f.register(
        f.named("getValue")
            .with_param(f.interner.intern_string("thisRef"), TypeId::NULLABLE_ANY)
            .with_param(f.interner.intern_string("property"), TypeId::ANY)
            .operator(),
    );
    let constrained = OperatorConvention::GetValue {
        property_owner: FuzzyType::concrete(owner_ty),
        property_type: Some(FuzzyType::concrete(TypeId::NULLABLE_ANY)),
    };
    assert!(constrained.check_is_suitable_by_type(f.ctx(), &signature, &[]).is_none());

    let unconstrained = OperatorConvention::GetValue {
        property_owner: FuzzyType::concrete(owner_ty),
        property_type: None,
    };
    assert!(unconstrained.check_is_suitable_by_type(f.ctx(), &signature, &[]).is_some());
}

#[test]
fn test_set_value_checks_owner_only() {
    let f = Fixture::new();
    let (_, owner_ty) = f.class("Owner");
    let (_, other_ty) = f.class("Other");
    let (_, signature) = f.register(
        f.named("setValue")
            .with_param(f.interner.intern_string("thisRef"), owner_ty)
            .with_param(f.interner.intern_string("property"), TypeId::ANY)
            .with_param(f.interner.intern_string("value"), TypeId::INT)
            .operator(),
    );
    let fits = OperatorConvention::SetValue {
        property_owner: FuzzyType::concrete(owner_ty),
    };
    assert_eq!(
        fits.check_is_suitable_by_type(f.ctx(), &signature, &[]),
        Some(Substitution::new())
    );
    let mismatched = OperatorConvention::SetValue {
        property_owner: FuzzyType::concrete(other_ty),
    };
    assert!(mismatched.check_is_suitable_by_type(f.ctx(), &signature, &[]).is_none());
}
