//! Subtype unification with free type parameters.
//!
//! `Unifier::relate_subtype(sub, sup)` answers "is there a binding of the free
//! parameters that makes `sub <: sup`?" and records that binding. Rules:
//!
//! - A free parameter on either side binds to the other side; a parameter that
//!   is already bound is related through its binding.
//! - `Error` relates to everything.
//! - `T <: S?` iff `T <: S` (or `T = T'?` and `T' <: S`). A nullable type is
//!   never a subtype of a non-null one.
//! - `Nothing` is the bottom, `Any` the top of the non-null hierarchy.
//! - Class applications walk the supertype graph to the target class and then
//!   relate type arguments by the target's declared variance.
//! - Rigid parameters relate by identity or through their upper bound.
//!
//! Alternatives (the two ways a nullable target can be satisfied) are tried
//! speculatively: bindings made by a failed attempt are rolled back.

use crate::SolverContext;
use crate::def::DefId;
use crate::substitution::{Substitution, occurs_in};
use crate::types::{IntrinsicKind, TypeApplication, TypeData, TypeId, TypeParamId, Variance};
use opconv_common::limits::{MAX_SUPERTYPE_WALK, MAX_UNIFICATION_DEPTH};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::trace;

pub(crate) struct Unifier<'a> {
    ctx: SolverContext<'a>,
    free: &'a [TypeParamId],
    bindings: Substitution,
    depth: u32,
}

impl<'a> Unifier<'a> {
    /// `free` must be sorted.
    pub(crate) fn new(ctx: SolverContext<'a>, free: &'a [TypeParamId]) -> Self {
        Self {
            ctx,
            free,
            bindings: Substitution::new(),
            depth: 0,
        }
    }

    #[inline]
    fn is_free(&self, param: TypeParamId) -> bool {
        self.free.binary_search(&param).is_ok()
    }

    /// The recorded bindings, with bindings that mention other bound
    /// parameters resolved through them.
    pub(crate) fn finish(self) -> Substitution {
        let db = self.ctx.db;
        let mut current = self.bindings;
        for _ in 0..current.len() {
            let next = Substitution::from_pairs(
                current.iter().map(|(param, ty)| (param, current.apply(db, ty))),
            );
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Run `f`, discarding any bindings it made if it fails.
    fn speculate(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let snapshot = self.bindings.clone();
        if f(self) {
            true
        } else {
            self.bindings = snapshot;
            false
        }
    }

    pub(crate) fn relate_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if self.depth >= MAX_UNIFICATION_DEPTH {
            trace!(sub = sub.0, sup = sup.0, "unification depth exceeded");
            return false;
        }
        self.depth += 1;
        let result = self.relate_subtype_inner(sub, sup);
        self.depth -= 1;
        result
    }

    fn relate_subtype_inner(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup || sub == TypeId::ERROR || sup == TypeId::ERROR {
            return true;
        }
        let db = self.ctx.db;
        let (Some(sub_data), Some(sup_data)) = (db.lookup(sub), db.lookup(sup)) else {
            return false;
        };

        if let TypeData::TypeParameter(param) = sup_data
            && self.is_free(param)
        {
            return match self.bindings.get(param) {
                Some(bound) => self.relate_subtype(sub, bound),
                None => self.bind(param, sub),
            };
        }
        if let TypeData::TypeParameter(param) = sub_data
            && self.is_free(param)
        {
            return match self.bindings.get(param) {
                Some(bound) => self.relate_subtype(bound, sup),
                None => self.bind(param, sup),
            };
        }

        match (sub_data, sup_data) {
            (TypeData::Nullable(sub_inner), TypeData::Nullable(sup_inner)) => {
                self.relate_subtype(sub_inner, sup_inner)
            }
            (_, TypeData::Nullable(sup_inner)) => {
                if self.speculate(|u| u.relate_subtype(sub, sup_inner)) {
                    return true;
                }
                // A rigid parameter whose bound admits null can still fit `S?`.
                match self.rigid_bound(sub) {
                    Some(bound) => self.relate_subtype(bound, sup),
                    None => false,
                }
            }
            (TypeData::Nullable(_), _) => false,
            (TypeData::Intrinsic(IntrinsicKind::Nothing), _) => true,
            (TypeData::TypeParameter(param), _) => {
                let bound = self
                    .ctx
                    .defs
                    .upper_bound(param)
                    .unwrap_or(TypeId::NULLABLE_ANY);
                self.relate_subtype(bound, sup)
            }
            (_, TypeData::Intrinsic(IntrinsicKind::Any)) => true,
            (TypeData::Application(sub_app), TypeData::Application(sup_app)) => {
                self.relate_applications(&sub_app, &sup_app)
            }
            _ => false,
        }
    }

    fn rigid_bound(&self, ty: TypeId) -> Option<TypeId> {
        match self.ctx.db.lookup(ty) {
            Some(TypeData::TypeParameter(param)) if !self.is_free(param) => Some(
                self.ctx
                    .defs
                    .upper_bound(param)
                    .unwrap_or(TypeId::NULLABLE_ANY),
            ),
            _ => None,
        }
    }

    fn relate_equal(&mut self, a: TypeId, b: TypeId) -> bool {
        self.relate_subtype(a, b) && self.relate_subtype(b, a)
    }

    /// `ty` with the current bindings applied until nothing changes.
    fn resolve(&self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..=self.bindings.len() {
            let next = self.bindings.apply(self.ctx.db, current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn bind(&mut self, param: TypeParamId, ty: TypeId) -> bool {
        let db = self.ctx.db;
        let ty = self.resolve(ty);
        if db.lookup(ty) == Some(TypeData::TypeParameter(param)) {
            return true;
        }
        if occurs_in(db, param, ty) {
            trace!(param = param.0, ty = ty.0, "occurs check failed");
            return false;
        }
        self.speculate(|u| {
            u.bindings.insert(param, ty);
            match u.ctx.defs.upper_bound(param) {
                Some(bound) => u.relate_subtype(ty, bound),
                None => true,
            }
        })
    }

    fn relate_applications(&mut self, sub: &TypeApplication, sup: &TypeApplication) -> bool {
        let Some(instance) = self.find_supertype_instance(sub, sup.class) else {
            return false;
        };
        let Some(class) = self.ctx.defs.class(sup.class) else {
            return false;
        };
        if instance.args.len() != sup.args.len() {
            return false;
        }
        for (index, (&sub_arg, &sup_arg)) in instance.args.iter().zip(sup.args.iter()).enumerate() {
            let variance = class
                .type_params
                .get(index)
                .map(|&param| self.ctx.defs.variance(param))
                .unwrap_or_default();
            let related = match variance {
                Variance::Out => self.relate_subtype(sub_arg, sup_arg),
                Variance::In => self.relate_subtype(sup_arg, sub_arg),
                Variance::Invariant => self.relate_equal(sub_arg, sup_arg),
            };
            if !related {
                return false;
            }
        }
        true
    }

    /// Breadth-first search of `sub`'s supertypes for an application of
    /// `target`, instantiated with `sub`'s arguments.
    fn find_supertype_instance(
        &self,
        sub: &TypeApplication,
        target: DefId,
    ) -> Option<TypeApplication> {
        if sub.class == target {
            return Some(sub.clone());
        }
        let db = self.ctx.db;
        let mut visited: FxHashSet<DefId> = FxHashSet::default();
        let mut queue: VecDeque<TypeApplication> = VecDeque::new();
        queue.push_back(sub.clone());
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.class) || visited.len() > MAX_SUPERTYPE_WALK {
                continue;
            }
            let Some(class) = self.ctx.defs.class(current.class) else {
                continue;
            };
            let class_args = Substitution::for_arguments(&class.type_params, &current.args);
            for &supertype in &class.supertypes {
                let instantiated = class_args.apply(db, supertype);
                let Some(TypeData::Application(app)) = db.lookup(instantiated) else {
                    continue;
                };
                if app.class == target {
                    return Some(app);
                }
                queue.push_back(app);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../tests/unify_tests.rs"]
mod tests;
