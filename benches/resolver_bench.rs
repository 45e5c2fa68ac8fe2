//! Operator resolution and lowering benchmarks.
//!
//! Measures the resolution cache against uncached search, and the cost of
//! lowering a fused indexed augmented assignment.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use opconv::lowering::{
    CalleeSymbol, ExprId, LoweringEngine, ReceiverValue, ResolvedCall, ResolvedCallMap,
    SyntaxArena, TableCallGenerator, VariableId, VariableSymbol,
};
use opconv::solver::{
    ClassDef, DefinitionStore, FunctionDef, FunctionScope, FuzzyType,
    OperatorConventionResolver, SolverContext, TypeDatabase, TypeId, TypeInterner, Variance,
};

/// `class Container<E>` with an extension `contains`, queried over
/// `Container<X>` for every builtin `X`.
fn bench_find_operator(c: &mut Criterion) {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let e = store.register_type_param(interner.intern_string("E"), Variance::Invariant);
    let container = store
        .register_class(ClassDef::new(interner.intern_string("Container")).with_type_params(vec![e]));
    let t = store.register_type_param(interner.intern_string("T"), Variance::Invariant);
    let t_ty = interner.type_param(t);
    let contains = store.register_function(
        FunctionDef::new(interner.intern_string("contains"))
            .with_type_params(vec![t])
            .with_receiver(interner.application(container, &[t_ty]))
            .with_param(interner.intern_string("item"), t_ty)
            .returning(TypeId::BOOLEAN)
            .operator(),
    );
    let scope = FunctionScope::new(&store).with_function(contains);
    let ctx = SolverContext::new(&interner, &store);

    let queries: Vec<FuzzyType> = [
        TypeId::INT,
        TypeId::LONG,
        TypeId::DOUBLE,
        TypeId::STRING,
        TypeId::BOOLEAN,
    ]
    .iter()
    .map(|&arg| FuzzyType::concrete(interner.application(container, &[arg])))
    .collect();

    let mut group = c.benchmark_group("find_operator");
    for rounds in [1usize, 16] {
        group.bench_with_input(BenchmarkId::new("cached", rounds), &rounds, |b, &rounds| {
            b.iter(|| {
                let resolver = OperatorConventionResolver::contains(
                    ctx,
                    FuzzyType::concrete(TypeId::NULLABLE_ANY),
                    &scope,
                    None,
                );
                for _ in 0..rounds {
                    for query in &queries {
                        black_box(resolver.find_operator(query));
                    }
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("uncached", rounds), &rounds, |b, &rounds| {
            b.iter(|| {
                let resolver = OperatorConventionResolver::contains(
                    ctx,
                    FuzzyType::concrete(TypeId::NULLABLE_ANY),
                    &scope,
                    None,
                );
                for _ in 0..rounds {
                    for query in &queries {
                        black_box(resolver.find_operator_no_cache(query));
                    }
                }
            })
        });
    }
    group.finish();
}

fn local(arena: &mut SyntaxArena, table: &mut ResolvedCallMap, id: u32, ty: TypeId) -> ExprId {
    let symbol = VariableSymbol {
        id: VariableId(id),
        name: opconv::Atom(id),
        ty,
        delegated: false,
    };
    let expr = arena.name(symbol.name, ty);
    table.record_call(expr, ResolvedCall::new(CalleeSymbol::Variable(symbol), ty));
    expr
}

/// `arr[i] += 1`, fused and unfused.
fn bench_indexed_increment(c: &mut Criterion) {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let operator = |name: &str, params: &[TypeId], returns: TypeId| {
        let mut function = FunctionDef::new(interner.intern_string(name))
            .returning(returns)
            .operator();
        for &ty in params {
            function = function.with_param(interner.intern_string("p"), ty);
        }
        store.register_function(function)
    };
    let get = operator("get", &[TypeId::INT], TypeId::INT);
    let set = operator("set", &[TypeId::INT, TypeId::INT], TypeId::UNIT);
    let plus = operator("plus", &[TypeId::INT], TypeId::INT);
    let array_ty =
        interner.application(store.register_class(ClassDef::new(interner.intern_string("IntArray"))), &[]);

    let mut arena = SyntaxArena::new();
    let mut table = ResolvedCallMap::new();
    let array = local(&mut arena, &mut table, 1, array_ty);
    let index = local(&mut arena, &mut table, 2, TypeId::INT);
    let target = arena.indexed(array, &[index], TypeId::INT);
    let one = arena.literal(opconv::lowering::Literal::Int(1), TypeId::INT);
    let assignment = arena.binary("+=", target, one, TypeId::UNIT);
    for (call, is_get) in [(get, true), (set, false)] {
        let call = ResolvedCall::function(call, TypeId::INT)
            .with_dispatch_receiver(ReceiverValue::Expression(array))
            .with_argument(index);
        if is_get {
            table.record_indexed_get(target, call);
        } else {
            table.record_indexed_set(target, call);
        }
    }
    table.record_call(
        assignment,
        ResolvedCall::function(plus, TypeId::INT)
            .with_dispatch_receiver(ReceiverValue::Expression(target))
            .with_argument(one),
    );
    table.mark_simple_reassignment(assignment);

    let ctx = SolverContext::new(&interner, &store);
    let mut group = c.benchmark_group("lower_indexed_increment");
    for fuse in [true, false] {
        let name = if fuse { "fused" } else { "unfused" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut engine =
                    LoweringEngine::new(ctx, &arena, &table, TableCallGenerator::new(&arena, &table))
                        .with_options(
                            opconv::LoweringOptions::default().with_fuse_augmented_assignment(fuse),
                        );
                black_box(engine.generate_binary_expression(black_box(assignment)))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_operator, bench_indexed_increment);
criterion_main!(benches);
