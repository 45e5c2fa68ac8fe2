//! Member lookup by name on a type.
//!
//! A class application's members are its own class's members followed by
//! inherited members, walking supertypes breadth-first. Every candidate
//! carries the substitution from the declaring class's type parameters to the
//! arguments they take at the queried type, so `Box<Int>` sees
//! `contains(item: T)` as `contains(item: Int)`.

use crate::SolverContext;
use crate::def::{DefId, FunctionId};
use crate::substitution::Substitution;
use crate::types::{TypeApplication, TypeData, TypeId};
use opconv_common::Atom;
use opconv_common::limits::{MAX_SUPERTYPE_WALK, MAX_UNIFICATION_DEPTH};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// A member function seen through the queried type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberCandidate {
    pub function: FunctionId,
    pub declaring_class: DefId,
    /// Declaring class type parameters to their arguments at the queried type.
    pub class_substitution: Substitution,
}

/// Members named `name` of `ty`, own members first.
///
/// Type parameters contribute the members of their upper bound. Intrinsic and
/// nullable types have no members.
pub fn member_functions_named(
    ctx: SolverContext<'_>,
    ty: TypeId,
    name: Atom,
) -> Vec<MemberCandidate> {
    match class_instance(ctx, ty, 0) {
        Some(app) => collect_members(ctx, app, name),
        None => Vec::new(),
    }
}

fn class_instance(ctx: SolverContext<'_>, ty: TypeId, depth: u32) -> Option<TypeApplication> {
    if depth >= MAX_UNIFICATION_DEPTH {
        return None;
    }
    match ctx.db.lookup(ty)? {
        TypeData::Application(app) => Some(app),
        TypeData::TypeParameter(param) => {
            let bound = ctx.defs.upper_bound(param)?;
            class_instance(ctx, bound, depth + 1)
        }
        TypeData::Nullable(_) | TypeData::Intrinsic(_) => None,
    }
}

fn collect_members(ctx: SolverContext<'_>, start: TypeApplication, name: Atom) -> Vec<MemberCandidate> {
    let db = ctx.db;
    let mut found = Vec::new();
    let mut seen_functions: FxHashSet<FunctionId> = FxHashSet::default();
    let mut visited: FxHashSet<DefId> = FxHashSet::default();
    let mut queue: VecDeque<TypeApplication> = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if visited.len() >= MAX_SUPERTYPE_WALK || !visited.insert(current.class) {
            continue;
        }
        let Some(class) = ctx.defs.class(current.class) else {
            continue;
        };
        let class_substitution = Substitution::for_arguments(&class.type_params, &current.args);
        for &member in &class.members {
            let named = ctx
                .defs
                .function(member)
                .is_some_and(|function| function.name == name);
            if named && seen_functions.insert(member) {
                found.push(MemberCandidate {
                    function: member,
                    declaring_class: current.class,
                    class_substitution: class_substitution.clone(),
                });
            }
        }
        for &supertype in &class.supertypes {
            if let Some(TypeData::Application(app)) = db.lookup(class_substitution.apply(db, supertype))
            {
                queue.push_back(app);
            }
        }
    }
    found
}

#[cfg(test)]
#[path = "../tests/member_scope_tests.rs"]
mod tests;
