//! Type interning.
//!
//! All `TypeData` construction goes through the factory methods on
//! `TypeDatabase`, which keep the structural invariants (no nested nullable,
//! `Error?` collapses to `Error`) in one place.

use crate::def::DefId;
use crate::types::{IntrinsicKind, TypeApplication, TypeData, TypeId, TypeParamId};
use indexmap::IndexSet;
use opconv_common::{Atom, SharedInterner};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::sync::{Arc, RwLock};

/// Read/intern access to types and names.
pub trait TypeDatabase {
    fn intern(&self, data: TypeData) -> TypeId;
    fn lookup(&self, id: TypeId) -> Option<TypeData>;
    fn intern_string(&self, s: &str) -> Atom;
    fn resolve_atom(&self, atom: Atom) -> Arc<str>;

    /// `ty?`. Idempotent.
    fn nullable(&self, ty: TypeId) -> TypeId {
        match self.lookup(ty) {
            Some(TypeData::Nullable(_)) | Some(TypeData::Intrinsic(IntrinsicKind::Error)) | None => {
                ty
            }
            Some(_) => self.intern(TypeData::Nullable(ty)),
        }
    }

    /// Strip one level of `?`.
    fn non_null(&self, ty: TypeId) -> TypeId {
        match self.lookup(ty) {
            Some(TypeData::Nullable(inner)) => inner,
            _ => ty,
        }
    }

    fn is_marked_nullable(&self, ty: TypeId) -> bool {
        matches!(self.lookup(ty), Some(TypeData::Nullable(_)))
    }

    fn application(&self, class: DefId, args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Application(TypeApplication {
            class,
            args: SmallVec::from_slice(args),
        }))
    }

    fn type_param(&self, id: TypeParamId) -> TypeId {
        self.intern(TypeData::TypeParameter(id))
    }
}

const BUILTINS: [TypeData; 9] = [
    TypeData::Intrinsic(IntrinsicKind::Error),
    TypeData::Intrinsic(IntrinsicKind::Any),
    TypeData::Intrinsic(IntrinsicKind::Nothing),
    TypeData::Intrinsic(IntrinsicKind::Unit),
    TypeData::Intrinsic(IntrinsicKind::Boolean),
    TypeData::Intrinsic(IntrinsicKind::Int),
    TypeData::Intrinsic(IntrinsicKind::Long),
    TypeData::Intrinsic(IntrinsicKind::Double),
    TypeData::Intrinsic(IntrinsicKind::String),
];

/// Thread-safe type interner.
///
/// The interner is shared by every resolver and lowering engine of one
/// analysis session; ids are stable for its lifetime.
pub struct TypeInterner {
    types: RwLock<IndexSet<TypeData, FxBuildHasher>>,
    atoms: SharedInterner,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut types: IndexSet<TypeData, FxBuildHasher> = IndexSet::default();
        for data in BUILTINS {
            types.insert(data);
        }
        // Ids 9 and 10: `Any?` and `Nothing?`.
        types.insert(TypeData::Nullable(TypeId::ANY));
        types.insert(TypeData::Nullable(TypeId::NOTHING));
        debug_assert_eq!(types.len() as u32, TypeId::FIRST_USER);

        let atoms = SharedInterner::new();
        atoms.intern_common();
        Self {
            types: RwLock::new(types),
            atoms,
        }
    }

    /// Number of interned types, builtins included.
    pub fn len(&self) -> usize {
        self.types.read().map(|types| types.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeDatabase for TypeInterner {
    fn intern(&self, data: TypeData) -> TypeId {
        if let Ok(types) = self.types.read()
            && let Some(index) = types.get_index_of(&data)
        {
            return TypeId(index as u32);
        }
        let Ok(mut types) = self.types.write() else {
            return TypeId::ERROR;
        };
        let (index, _) = types.insert_full(data);
        TypeId(index as u32)
    }

    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().ok()?;
        types.get_index(id.0 as usize).cloned()
    }

    fn intern_string(&self, s: &str) -> Atom {
        self.atoms.intern(s)
    }

    fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.atoms.resolve(atom)
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
