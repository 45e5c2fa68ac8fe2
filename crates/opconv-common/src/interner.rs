//! Name interning.
//!
//! Function, class and type-parameter names are interned once and passed
//! around as `Atom` handles, so name lookups in the convention resolver and
//! the declaration index are integer comparisons.

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// An interned name. Resolve it through the interner that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty name.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names that show up in nearly every resolution request.
const COMMON_NAMES: &[&str] = &[
    // Operator conventions
    "contains",
    "getValue",
    "setValue",
    "get",
    "set",
    "compareTo",
    "equals",
    "plus",
    "minus",
    "times",
    "div",
    "rem",
    "rangeTo",
    "plusAssign",
    "minusAssign",
    "timesAssign",
    "divAssign",
    "remAssign",
    // Builtin types
    "Any",
    "Nothing",
    "Unit",
    "Boolean",
    "Int",
    "Long",
    "Double",
    "String",
    // Convention parameters
    "thisRef",
    "property",
    "value",
    "element",
    "item",
];

/// Thread-safe name interner.
///
/// Shared by the type interner and the definition store, which per-task
/// resolvers read concurrently. Atoms are dense: the n-th distinct name gets
/// `Atom(n)`, with `Atom::NONE` reserved for the empty name.
pub struct SharedInterner {
    atoms: DashMap<Arc<str>, Atom, FxBuildHasher>,
    names: RwLock<Vec<Arc<str>>>,
}

impl SharedInterner {
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let atoms = DashMap::with_hasher(FxBuildHasher);
        atoms.insert(empty.clone(), Atom::NONE);
        Self {
            atoms,
            names: RwLock::new(vec![empty]),
        }
    }

    pub fn intern(&self, name: &str) -> Atom {
        if let Some(atom) = self.atoms.get(name) {
            return *atom;
        }
        let Ok(mut names) = self.names.write() else {
            return Atom::NONE;
        };
        // Another writer may have interned it between the two lookups.
        if let Some(atom) = self.atoms.get(name) {
            return *atom;
        }
        let atom = Atom(names.len() as u32);
        let owned: Arc<str> = Arc::from(name);
        names.push(owned.clone());
        self.atoms.insert(owned, atom);
        atom
    }

    /// The name behind `atom`, or `""` for atoms this interner never produced.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let names = self.names.read().ok()?;
        names.get(atom.0 as usize).cloned()
    }

    /// The atom for an already interned name, without interning it.
    pub fn lookup(&self, name: &str) -> Option<Atom> {
        self.atoms.get(name).map(|atom| *atom)
    }

    /// Number of interned names, the empty name included.
    pub fn len(&self) -> usize {
        self.names.read().map(|names| names.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-intern convention, builtin type and parameter names.
    pub fn intern_common(&self) {
        for name in COMMON_NAMES {
            self.intern(name);
        }
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
