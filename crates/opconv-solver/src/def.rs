//! Definition identifiers and storage for the solver.
//!
//! Classes, functions and type parameters are owned by the host's symbol
//! table. The solver sees them through a `DefinitionStore`, which hands out
//! stable ids and never lets a resolver mutate a registered definition.
//!
//! | Id | Stored | Example |
//! |----|--------|---------|
//! | `DefId` | `ClassDef` | `class Container<T>` |
//! | `FunctionId` | `FunctionDef` | `operator fun <T> Container<T>.contains(item: T): Boolean` |
//! | `TypeParamId` | `TypeParamInfo` | the `T` above |

use crate::types::{ParamInfo, TypeId, TypeParamId, TypeParamInfo, Variance};
use dashmap::DashMap;
use opconv_common::Atom;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning unique instance IDs to `DefinitionStore` instances.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// Identifiers
// =============================================================================

/// Class definition identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

/// Function definition identifier.
///
/// This is the "underlying identity" of a candidate function: substituted
/// views of the same function share it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

// =============================================================================
// Definitions
// =============================================================================

/// A class (or interface) with its members.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: Atom,
    pub type_params: Vec<TypeParamId>,
    /// Direct supertypes, expressed over `type_params`.
    pub supertypes: Vec<TypeId>,
    /// Member functions in declaration order.
    pub members: Vec<FunctionId>,
}

impl ClassDef {
    pub const fn new(name: Atom) -> Self {
        Self {
            name,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParamId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_supertypes(mut self, supertypes: Vec<TypeId>) -> Self {
        self.supertypes = supertypes;
        self
    }
}

/// A candidate function as declared.
#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub name: Atom,
    /// Owning class for members, `None` for top-level and extension functions.
    pub owner: Option<DefId>,
    pub type_params: Vec<TypeParamId>,
    pub value_params: Vec<ParamInfo>,
    /// `None` when the declaration has no explicit return type.
    pub return_type: Option<TypeId>,
    /// Extension receiver type, for extension-form functions.
    pub receiver_type: Option<TypeId>,
    /// Explicit `operator` modifier.
    pub is_operator: bool,
}

impl FunctionDef {
    pub const fn new(name: Atom) -> Self {
        Self {
            name,
            owner: None,
            type_params: Vec::new(),
            value_params: Vec::new(),
            return_type: None,
            receiver_type: None,
            is_operator: false,
        }
    }

    pub const fn with_owner(mut self, owner: DefId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParamId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_param(mut self, name: Atom, type_id: TypeId) -> Self {
        self.value_params.push(ParamInfo::new(name, type_id));
        self
    }

    pub const fn with_receiver(mut self, receiver: TypeId) -> Self {
        self.receiver_type = Some(receiver);
        self
    }

    pub const fn returning(mut self, return_type: TypeId) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub const fn operator(mut self) -> Self {
        self.is_operator = true;
        self
    }

    #[inline]
    pub const fn is_extension(&self) -> bool {
        self.receiver_type.is_some()
    }
}

// =============================================================================
// DefinitionStore
// =============================================================================

/// Thread-safe storage for definitions.
///
/// Uses `DashMap` so one store can back several per-task resolvers.
pub struct DefinitionStore {
    /// Unique instance ID for debugging
    instance_id: u64,
    classes: DashMap<DefId, ClassDef>,
    functions: DashMap<FunctionId, Arc<FunctionDef>>,
    type_params: DashMap<TypeParamId, TypeParamInfo>,
    next_class: AtomicU32,
    next_function: AtomicU32,
    next_type_param: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "DefinitionStore::new - creating new instance");
        Self {
            instance_id,
            classes: DashMap::new(),
            functions: DashMap::new(),
            type_params: DashMap::new(),
            next_class: AtomicU32::new(DefId::FIRST_VALID),
            next_function: AtomicU32::new(1),
            next_type_param: AtomicU32::new(1),
        }
    }

    // -------------------------------------------------------------------------
    // Type parameters
    // -------------------------------------------------------------------------

    /// Register a type parameter with the implicit `Any?` bound.
    pub fn register_type_param(&self, name: Atom, variance: Variance) -> TypeParamId {
        let id = TypeParamId(self.next_type_param.fetch_add(1, Ordering::SeqCst));
        self.type_params.insert(
            id,
            TypeParamInfo {
                name,
                upper_bound: None,
                variance,
            },
        );
        id
    }

    /// Set the upper bound after registration, so a bound may mention the
    /// parameter itself (`T : Comparable<T>`).
    pub fn set_upper_bound(&self, id: TypeParamId, bound: TypeId) {
        if let Some(mut info) = self.type_params.get_mut(&id) {
            info.upper_bound = Some(bound);
        }
    }

    pub fn type_param(&self, id: TypeParamId) -> Option<TypeParamInfo> {
        self.type_params.get(&id).map(|r| r.clone())
    }

    pub fn upper_bound(&self, id: TypeParamId) -> Option<TypeId> {
        self.type_params.get(&id).and_then(|r| r.upper_bound)
    }

    pub fn variance(&self, id: TypeParamId) -> Variance {
        self.type_params
            .get(&id)
            .map(|r| r.variance)
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    pub fn register_class(&self, class: ClassDef) -> DefId {
        let id = DefId(self.next_class.fetch_add(1, Ordering::SeqCst));
        trace!(
            instance_id = self.instance_id,
            def_id = id.0,
            members = class.members.len(),
            "DefinitionStore::register_class"
        );
        self.classes.insert(id, class);
        id
    }

    pub fn class(&self, id: DefId) -> Option<ClassDef> {
        self.classes.get(&id).map(|r| r.clone())
    }

    pub fn class_name(&self, id: DefId) -> Option<Atom> {
        self.classes.get(&id).map(|r| r.name)
    }

    /// Add a supertype to an already registered class.
    pub fn add_supertype(&self, class: DefId, supertype: TypeId) {
        if let Some(mut def) = self.classes.get_mut(&class) {
            def.supertypes.push(supertype);
        }
    }

    // -------------------------------------------------------------------------
    // Functions
    // -------------------------------------------------------------------------

    /// Register a function. Members are appended to their owner's member list.
    pub fn register_function(&self, function: FunctionDef) -> FunctionId {
        let id = FunctionId(self.next_function.fetch_add(1, Ordering::SeqCst));
        trace!(
            instance_id = self.instance_id,
            function_id = id.0,
            owner = ?function.owner,
            is_operator = function.is_operator,
            "DefinitionStore::register_function"
        );
        if let Some(owner) = function.owner
            && let Some(mut class) = self.classes.get_mut(&owner)
        {
            class.members.push(id);
        }
        self.functions.insert(id, Arc::new(function));
        id
    }

    pub fn function(&self, id: FunctionId) -> Option<Arc<FunctionDef>> {
        self.functions.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// All functions with the given name, ordered by id.
    pub fn functions_named(&self, name: Atom) -> Vec<FunctionId> {
        let mut ids: Vec<FunctionId> = self
            .functions
            .iter()
            .filter(|entry| entry.value().name == name)
            .map(|entry| *entry.key())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
