//! Operator convention resolution.
//!
//! `OperatorConventionResolver` finds the function implementing one reserved
//! operator convention for a queried type:
//!
//! 1. Unless the type is nullable, its member functions with the reserved
//!    name, own members before inherited ones.
//! 2. Extension operators visible in the lexical scope, then those from the
//!    project index, matched on their extension receiver.
//!
//! The first suitable candidate of the first tier that has one wins. Results,
//! including "no operator", are memoized per `FuzzyType` for the lifetime of
//! the resolver. A resolver is single-task state: the caches use `RefCell`
//! and `OnceCell`, so it cannot be shared across threads.

use crate::SolverContext;
use crate::conventions::OperatorConvention;
use crate::def::{DefId, FunctionId};
use crate::format::TypeFormatter;
use crate::fuzzy::FuzzyType;
use crate::member_scope::member_functions_named;
use crate::operator_trace;
use crate::scope::{DeclarationIndex, LexicalScope};
use crate::substitution::{FunctionSignature, Substitution};
use crate::types::{Nullability, TypeParamId};
use opconv_common::Atom;
use opconv_common::limits::RESOLUTION_CACHE_CAPACITY;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::{Cell, OnceCell, RefCell};
use tracing::{debug, trace};

/// A function satisfying a convention, with the bindings that make it fit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorMatch {
    pub function: FunctionId,
    pub substitution: Substitution,
}

impl OperatorMatch {
    /// The matched function's signature with `substitution` applied.
    pub fn signature(&self, ctx: SolverContext<'_>) -> Option<FunctionSignature> {
        let function = ctx.defs.function(self.function)?;
        Some(
            self.substitution
                .apply_to_function(ctx, self.function, &function),
        )
    }
}

/// Resolution cache counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolverCacheStats {
    pub hits: u64,
    /// Uncached searches performed.
    pub misses: u64,
}

pub struct OperatorConventionResolver<'a> {
    ctx: SolverContext<'a>,
    convention: OperatorConvention,
    name: Atom,
    scope: &'a dyn LexicalScope,
    index: Option<&'a dyn DeclarationIndex>,
    extension_operators: OnceCell<Vec<FunctionId>>,
    classes_with_member_operators: OnceCell<Vec<DefId>>,
    cache: RefCell<FxHashMap<FuzzyType, Option<OperatorMatch>>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<'a> OperatorConventionResolver<'a> {
    pub fn new(
        ctx: SolverContext<'a>,
        convention: OperatorConvention,
        scope: &'a dyn LexicalScope,
        index: Option<&'a dyn DeclarationIndex>,
    ) -> Self {
        let name = ctx.db.intern_string(convention.name().as_str());
        Self {
            ctx,
            convention,
            name,
            scope,
            index,
            extension_operators: OnceCell::new(),
            classes_with_member_operators: OnceCell::new(),
            cache: RefCell::new(FxHashMap::with_capacity_and_hasher(
                RESOLUTION_CACHE_CAPACITY,
                Default::default(),
            )),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Resolver for `contains`, fitting `argument_type` as the tested element.
    pub fn contains(
        ctx: SolverContext<'a>,
        argument_type: FuzzyType,
        scope: &'a dyn LexicalScope,
        index: Option<&'a dyn DeclarationIndex>,
    ) -> Self {
        Self::new(
            ctx,
            OperatorConvention::Contains { argument_type },
            scope,
            index,
        )
    }

    /// Resolver for `getValue` on a property of `property_owner`.
    pub fn get_value(
        ctx: SolverContext<'a>,
        property_owner: FuzzyType,
        property_type: Option<FuzzyType>,
        scope: &'a dyn LexicalScope,
        index: Option<&'a dyn DeclarationIndex>,
    ) -> Self {
        Self::new(
            ctx,
            OperatorConvention::GetValue {
                property_owner,
                property_type,
            },
            scope,
            index,
        )
    }

    /// Resolver for `setValue` on a property of `property_owner`.
    pub fn set_value(
        ctx: SolverContext<'a>,
        property_owner: FuzzyType,
        scope: &'a dyn LexicalScope,
        index: Option<&'a dyn DeclarationIndex>,
    ) -> Self {
        Self::new(
            ctx,
            OperatorConvention::SetValue { property_owner },
            scope,
            index,
        )
    }

    #[inline]
    pub fn convention(&self) -> &OperatorConvention {
        &self.convention
    }

    pub fn cache_stats(&self) -> ResolverCacheStats {
        ResolverCacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }

    /// The operator for `ty`, memoized.
    pub fn find_operator(&self, ty: &FuzzyType) -> Option<OperatorMatch> {
        let lookup = operator_trace::Lookup::begin(self.convention.name().as_str(), ty);

        let cached = self.cache.borrow().get(ty).cloned();
        if let Some(result) = cached {
            self.hits.set(self.hits.get() + 1);
            if let Some(lookup) = lookup {
                lookup.finish(result.as_ref().map(|m| m.function), true);
            }
            return result;
        }

        let result = self.find_operator_no_cache(ty);
        self.misses.set(self.misses.get() + 1);
        self.cache.borrow_mut().insert(ty.clone(), result.clone());
        if let Some(lookup) = lookup {
            lookup.finish(result.as_ref().map(|m| m.function), false);
        }
        result
    }

    /// The operator for `ty`, bypassing the cache.
    pub fn find_operator_no_cache(&self, ty: &FuzzyType) -> Option<OperatorMatch> {
        let ctx = self.ctx;
        debug!(
            convention = self.convention.name().as_str(),
            ty = %TypeFormatter::new(ctx).format(ty.ty()),
            "find_operator_no_cache"
        );

        if ty.nullability(ctx) != Nullability::Nullable
            && let Some(found) = self.find_member_operator(ty)
        {
            return Some(found);
        }

        for &id in self.extension_operators() {
            let Some(function) = ctx.defs.function(id) else {
                continue;
            };
            let Some(receiver) = function.receiver_type else {
                continue;
            };
            let receiver = FuzzyType::new(ctx.db, receiver, function.type_params.iter().copied());
            if let Some(substitution) = ty.check_is_subtype_of(ctx, &receiver) {
                trace!(function = id.0, "extension operator matched");
                return Some(OperatorMatch {
                    function: id,
                    substitution,
                });
            }
        }
        None
    }

    fn find_member_operator(&self, ty: &FuzzyType) -> Option<OperatorMatch> {
        let ctx = self.ctx;
        for candidate in member_functions_named(ctx, ty.ty(), self.name) {
            let Some(function) = ctx.defs.function(candidate.function) else {
                continue;
            };
            if !self.convention.is_eligible(&function) {
                continue;
            }
            let signature =
                candidate
                    .class_substitution
                    .apply_to_function(ctx, candidate.function, &function);
            if let Some(substitution) =
                self.convention
                    .check_is_suitable_by_type(ctx, &signature, ty.free_params())
            {
                trace!(function = candidate.function.0, "member operator matched");
                return Some(OperatorMatch {
                    function: candidate.function,
                    substitution: Substitution::chain(
                        ctx.db,
                        &candidate.class_substitution,
                        &substitution,
                    ),
                });
            }
        }
        None
    }

    /// Eligible, suitable extension operators: scope first, then the index.
    pub fn extension_operators(&self) -> &[FunctionId] {
        self.extension_operators.get_or_init(|| {
            let ctx = self.ctx;
            let from_scope = self.scope.collect_functions(self.name).into_iter().filter(|&id| {
                ctx.defs
                    .function(id)
                    .is_some_and(|function| function.is_extension())
            });
            let from_index = self
                .index
                .map(|index| index.top_level_extension_operators_by_name(self.name))
                .unwrap_or_default();

            let mut seen: FxHashSet<FunctionId> = FxHashSet::default();
            let operators: Vec<FunctionId> = from_scope
                .chain(from_index)
                .filter(|&id| self.is_applicable(id, &[]))
                .filter(|&id| seen.insert(id))
                .collect();
            operator_trace::candidate_set(
                self.convention.name().as_str(),
                "extension_operators",
                operators.len(),
            );
            operators
        })
    }

    /// Classes declaring an eligible, suitable member operator. Empty without
    /// a project index.
    pub fn classes_with_member_operators(&self) -> &[DefId] {
        self.classes_with_member_operators.get_or_init(|| {
            let Some(index) = self.index else {
                return Vec::new();
            };
            let ctx = self.ctx;
            let mut seen: FxHashSet<DefId> = FxHashSet::default();
            let mut classes = Vec::new();
            for id in index.member_operators_by_name(self.name) {
                let Some(owner) = ctx.defs.function(id).and_then(|function| function.owner)
                else {
                    continue;
                };
                let class_params = ctx
                    .defs
                    .class(owner)
                    .map(|class| class.type_params)
                    .unwrap_or_default();
                if self.is_applicable(id, &class_params) && seen.insert(owner) {
                    classes.push(owner);
                }
            }
            operator_trace::candidate_set(
                self.convention.name().as_str(),
                "member_classes",
                classes.len(),
            );
            classes
        })
    }

    /// Eligible and suitable with its own type parameters (and `extra_free`)
    /// left free.
    fn is_applicable(&self, id: FunctionId, extra_free: &[TypeParamId]) -> bool {
        let ctx = self.ctx;
        let Some(function) = ctx.defs.function(id) else {
            return false;
        };
        if !self.convention.is_eligible(&function) {
            return false;
        }
        let signature = FunctionSignature::declared(ctx, id, &function);
        self.convention
            .check_is_suitable_by_type(ctx, &signature, extra_free)
            .is_some()
    }
}

#[cfg(test)]
#[path = "../tests/operator_resolver_tests.rs"]
mod tests;
