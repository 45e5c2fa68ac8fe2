//! Type substitutions.
//!
//! A `Substitution` maps type-parameter identities to types. It is a plain
//! value: applying it never mutates the substituted type or function, and
//! `chain` builds a new substitution instead of extending an existing one.

use crate::SolverContext;
use crate::def::{FunctionDef, FunctionId};
use crate::intern::TypeDatabase;
use crate::types::{ParamInfo, TypeData, TypeId, TypeParamId};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

/// Mapping from type parameters to types.
///
/// Partial substitutions (not covering every free parameter) are valid.
/// Equality ignores insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    map: IndexMap<TypeParamId, TypeId, FxBuildHasher>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(param, type)` pairs; later pairs win on duplicates.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (TypeParamId, TypeId)>) -> Self {
        let mut substitution = Self::new();
        for (param, ty) in pairs {
            substitution.insert(param, ty);
        }
        substitution
    }

    /// Bind each parameter to the argument at the same position.
    pub fn for_arguments(params: &[TypeParamId], args: &[TypeId]) -> Self {
        Self::from_pairs(params.iter().copied().zip(args.iter().copied()))
    }

    pub fn insert(&mut self, param: TypeParamId, ty: TypeId) {
        self.map.insert(param, ty);
    }

    #[inline]
    pub fn get(&self, param: TypeParamId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    #[inline]
    pub fn contains(&self, param: TypeParamId) -> bool {
        self.map.contains_key(&param)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeParamId, TypeId)> + '_ {
        self.map.iter().map(|(&param, &ty)| (param, ty))
    }

    /// Compose two substitutions.
    ///
    /// Applying the result is equivalent to applying `first` and then
    /// `second`: `first`'s bindings are rewritten through `second`, and
    /// `second`'s bindings for parameters `first` leaves alone are kept.
    pub fn chain(db: &dyn TypeDatabase, first: &Substitution, second: &Substitution) -> Self {
        if first.is_empty() {
            return second.clone();
        }
        if second.is_empty() {
            return first.clone();
        }
        let mut result = Substitution::new();
        for (param, ty) in first.iter() {
            result.insert(param, second.apply(db, ty));
        }
        for (param, ty) in second.iter() {
            if !first.contains(param) {
                result.insert(param, ty);
            }
        }
        result
    }

    /// Substitute every bound type parameter occurring in `ty`.
    pub fn apply(&self, db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
        if self.is_empty() || ty.is_builtin() {
            return ty;
        }
        match db.lookup(ty) {
            Some(TypeData::TypeParameter(param)) => self.get(param).unwrap_or(ty),
            Some(TypeData::Nullable(inner)) => {
                let substituted = self.apply(db, inner);
                if substituted == inner {
                    ty
                } else {
                    db.nullable(substituted)
                }
            }
            Some(TypeData::Application(app)) => {
                let args: SmallVec<[TypeId; 2]> =
                    app.args.iter().map(|&arg| self.apply(db, arg)).collect();
                if args == app.args {
                    ty
                } else {
                    db.application(app.class, &args)
                }
            }
            Some(TypeData::Intrinsic(_)) | None => ty,
        }
    }

    /// The substituted view of a function's signature.
    pub fn apply_to_function(
        &self,
        ctx: SolverContext<'_>,
        id: FunctionId,
        function: &FunctionDef,
    ) -> FunctionSignature {
        let db = ctx.db;
        FunctionSignature {
            function: id,
            type_params: function
                .type_params
                .iter()
                .copied()
                .filter(|&param| !self.contains(param))
                .collect(),
            receiver_type: function.receiver_type.map(|ty| self.apply(db, ty)),
            value_params: function
                .value_params
                .iter()
                .map(|param| ParamInfo::new(param.name, self.apply(db, param.type_id)))
                .collect(),
            return_type: function.return_type.map(|ty| self.apply(db, ty)),
        }
    }
}

/// A function signature after substitution.
///
/// Same identity as the declaration (`function`); only the types differ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSignature {
    pub function: FunctionId,
    /// Own type parameters the substitution left unbound.
    pub type_params: Vec<TypeParamId>,
    pub receiver_type: Option<TypeId>,
    pub value_params: Vec<ParamInfo>,
    pub return_type: Option<TypeId>,
}

impl FunctionSignature {
    /// The declared signature, with nothing substituted.
    pub fn declared(ctx: SolverContext<'_>, id: FunctionId, function: &FunctionDef) -> Self {
        Substitution::new().apply_to_function(ctx, id, function)
    }

    pub fn param_type(&self, index: usize) -> Option<TypeId> {
        self.value_params.get(index).map(|param| param.type_id)
    }
}

/// Does `param` occur anywhere in `ty`?
pub(crate) fn occurs_in(db: &dyn TypeDatabase, param: TypeParamId, ty: TypeId) -> bool {
    if ty.is_builtin() {
        return false;
    }
    match db.lookup(ty) {
        Some(TypeData::TypeParameter(p)) => p == param,
        Some(TypeData::Nullable(inner)) => occurs_in(db, param, inner),
        Some(TypeData::Application(app)) => app.args.iter().any(|&arg| occurs_in(db, param, arg)),
        Some(TypeData::Intrinsic(_)) | None => false,
    }
}

/// Collect the type parameters occurring in `ty`, in first-occurrence order.
pub fn collect_type_params(db: &dyn TypeDatabase, ty: TypeId, out: &mut Vec<TypeParamId>) {
    if ty.is_builtin() {
        return;
    }
    match db.lookup(ty) {
        Some(TypeData::TypeParameter(p)) => {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        Some(TypeData::Nullable(inner)) => collect_type_params(db, inner, out),
        Some(TypeData::Application(app)) => {
            for &arg in &app.args {
                collect_type_params(db, arg, out);
            }
        }
        Some(TypeData::Intrinsic(_)) | None => {}
    }
}

#[cfg(test)]
#[path = "../tests/substitution_tests.rs"]
mod tests;
