//! Fuzzy types: a type paired with the type parameters still free in it.
//!
//! A `FuzzyType` is the unit of convention matching. The free-parameter set is
//! restricted to parameters that actually occur in the type and kept sorted,
//! so two fuzzy types built from the same type and the same (relevant) free
//! parameters compare and hash equal. That is what makes them usable as
//! resolution-cache keys.

use crate::SolverContext;
use crate::intern::TypeDatabase;
use crate::substitution::{Substitution, collect_type_params};
use crate::types::{IntrinsicKind, Nullability, TypeData, TypeId, TypeParamId};
use crate::unify::Unifier;
use opconv_common::limits::MAX_UNIFICATION_DEPTH;
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FuzzyType {
    ty: TypeId,
    free_params: SmallVec<[TypeParamId; 4]>,
}

impl FuzzyType {
    /// `ty` with those of `free_params` that occur in it considered free.
    pub fn new(
        db: &dyn TypeDatabase,
        ty: TypeId,
        free_params: impl IntoIterator<Item = TypeParamId>,
    ) -> Self {
        let mut used = Vec::new();
        collect_type_params(db, ty, &mut used);
        let mut free: SmallVec<[TypeParamId; 4]> = free_params
            .into_iter()
            .filter(|param| used.contains(param))
            .collect();
        free.sort_unstable();
        free.dedup();
        Self {
            ty,
            free_params: free,
        }
    }

    /// A type with no free parameters.
    pub fn concrete(ty: TypeId) -> Self {
        Self {
            ty,
            free_params: SmallVec::new(),
        }
    }

    #[inline]
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    #[inline]
    pub fn free_params(&self) -> &[TypeParamId] {
        &self.free_params
    }

    #[inline]
    pub fn is_concrete(&self) -> bool {
        self.free_params.is_empty()
    }

    pub fn nullability(&self, ctx: SolverContext<'_>) -> Nullability {
        type_nullability(ctx, self.ty, 0)
    }

    /// A substitution of the free parameters of both sides under which
    /// `self <: other`, if one exists.
    pub fn check_is_subtype_of(
        &self,
        ctx: SolverContext<'_>,
        other: &FuzzyType,
    ) -> Option<Substitution> {
        let free = merge_free(&self.free_params, &other.free_params);
        let mut unifier = Unifier::new(ctx, &free);
        unifier
            .relate_subtype(self.ty, other.ty)
            .then(|| unifier.finish())
    }

    /// A substitution of the free parameters of both sides under which
    /// `other <: self`, if one exists.
    pub fn check_is_super_type_of(
        &self,
        ctx: SolverContext<'_>,
        other: &FuzzyType,
    ) -> Option<Substitution> {
        let free = merge_free(&self.free_params, &other.free_params);
        let mut unifier = Unifier::new(ctx, &free);
        unifier
            .relate_subtype(other.ty, self.ty)
            .then(|| unifier.finish())
    }

    pub fn check_is_subtype_of_type(
        &self,
        ctx: SolverContext<'_>,
        candidate: TypeId,
    ) -> Option<Substitution> {
        self.check_is_subtype_of(ctx, &FuzzyType::concrete(candidate))
    }

    pub fn check_is_super_type_of_type(
        &self,
        ctx: SolverContext<'_>,
        candidate: TypeId,
    ) -> Option<Substitution> {
        self.check_is_super_type_of(ctx, &FuzzyType::concrete(candidate))
    }
}

fn merge_free(a: &[TypeParamId], b: &[TypeParamId]) -> SmallVec<[TypeParamId; 8]> {
    let mut merged: SmallVec<[TypeParamId; 8]> = a.iter().chain(b).copied().collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

fn type_nullability(ctx: SolverContext<'_>, ty: TypeId, depth: u32) -> Nullability {
    if depth >= MAX_UNIFICATION_DEPTH {
        return Nullability::Unknown;
    }
    match ctx.db.lookup(ty) {
        Some(TypeData::Nullable(_)) => Nullability::Nullable,
        Some(TypeData::Intrinsic(IntrinsicKind::Error)) | None => Nullability::Unknown,
        Some(TypeData::TypeParameter(param)) => match ctx.defs.upper_bound(param) {
            None => Nullability::Unknown,
            Some(bound) => match type_nullability(ctx, bound, depth + 1) {
                Nullability::NotNull => Nullability::NotNull,
                Nullability::Nullable | Nullability::Unknown => Nullability::Unknown,
            },
        },
        Some(TypeData::Intrinsic(_)) | Some(TypeData::Application(_)) => Nullability::NotNull,
    }
}

#[cfg(test)]
#[path = "../tests/fuzzy_tests.rs"]
mod tests;
