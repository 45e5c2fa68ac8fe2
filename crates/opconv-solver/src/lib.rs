//! Operator Convention Solver
//!
//! This crate answers one question for the lowering pipeline: which declared
//! function implements a reserved operator convention (`contains`,
//! `getValue`, `setValue`) for a given type, and under which substitution of
//! its type parameters.
//!
//! - **Interned types**: `TypeId` comparison is type equality
//! - **Fuzzy types**: types paired with the parameters still free in them
//! - **Unification**: subtype checks that bind free parameters
//! - **Resolver**: member-first, then extension lookup, memoized per type
pub mod conventions;
pub mod def;
mod format;
pub mod fuzzy;
mod intern;
pub mod member_scope;
pub mod operator_resolver;
mod operator_trace;
pub mod scope;
pub mod substitution;
pub mod types;
mod unify;

pub use conventions::{OperatorConvention, OperatorName};
pub use def::{ClassDef, DefId, DefinitionStore, FunctionDef, FunctionId};
pub use format::TypeFormatter;
pub use fuzzy::FuzzyType;
pub use intern::{TypeDatabase, TypeInterner};
pub use member_scope::{MemberCandidate, member_functions_named};
pub use operator_resolver::{OperatorConventionResolver, OperatorMatch, ResolverCacheStats};
pub use scope::{DeclarationIndex, FunctionScope, LexicalScope, StoreDeclarationIndex};
pub use substitution::{FunctionSignature, Substitution};
pub use types::*;

/// Read-only view of the type and definition tables shared by every solver
/// query.
#[derive(Copy, Clone)]
pub struct SolverContext<'a> {
    pub db: &'a dyn TypeDatabase,
    pub defs: &'a DefinitionStore,
}

impl<'a> SolverContext<'a> {
    pub const fn new(db: &'a dyn TypeDatabase, defs: &'a DefinitionStore) -> Self {
        Self { db, defs }
    }
}
