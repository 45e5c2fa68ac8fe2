//! Name lookup collaborators.
//!
//! The resolver never walks source files. It asks a `LexicalScope` for the
//! functions visible by simple name at the call site and, when a project-wide
//! index exists, a `DeclarationIndex` for operator declarations anywhere in
//! the project. Both are read-only.

use crate::def::{DefinitionStore, FunctionId};
use opconv_common::Atom;

/// Functions visible by simple name at one program point.
pub trait LexicalScope {
    /// Every function named `name`, regardless of receiver applicability.
    fn collect_functions(&self, name: Atom) -> Vec<FunctionId>;
}

/// Project-wide operator declarations.
pub trait DeclarationIndex {
    fn top_level_extension_operators_by_name(&self, name: Atom) -> Vec<FunctionId>;
    fn member_operators_by_name(&self, name: Atom) -> Vec<FunctionId>;
}

/// A lexical scope listing its visible functions explicitly.
#[derive(Clone, Default)]
pub struct FunctionScope<'a> {
    defs: Option<&'a DefinitionStore>,
    visible: Vec<FunctionId>,
}

impl<'a> FunctionScope<'a> {
    pub fn new(defs: &'a DefinitionStore) -> Self {
        Self {
            defs: Some(defs),
            visible: Vec::new(),
        }
    }

    /// A scope with nothing visible.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_function(mut self, function: FunctionId) -> Self {
        self.declare(function);
        self
    }

    pub fn declare(&mut self, function: FunctionId) {
        if !self.visible.contains(&function) {
            self.visible.push(function);
        }
    }
}

impl LexicalScope for FunctionScope<'_> {
    fn collect_functions(&self, name: Atom) -> Vec<FunctionId> {
        let Some(defs) = self.defs else {
            return Vec::new();
        };
        self.visible
            .iter()
            .copied()
            .filter(|&id| defs.function(id).is_some_and(|function| function.name == name))
            .collect()
    }
}

/// Index over every operator function registered in a `DefinitionStore`.
pub struct StoreDeclarationIndex<'a> {
    defs: &'a DefinitionStore,
}

impl<'a> StoreDeclarationIndex<'a> {
    pub const fn new(defs: &'a DefinitionStore) -> Self {
        Self { defs }
    }

    fn operators_named(&self, name: Atom, keep: impl Fn(bool, bool) -> bool) -> Vec<FunctionId> {
        self.defs
            .functions_named(name)
            .into_iter()
            .filter(|&id| {
                self.defs.function(id).is_some_and(|function| {
                    function.is_operator && keep(function.owner.is_some(), function.is_extension())
                })
            })
            .collect()
    }
}

impl DeclarationIndex for StoreDeclarationIndex<'_> {
    fn top_level_extension_operators_by_name(&self, name: Atom) -> Vec<FunctionId> {
        self.operators_named(name, |is_member, is_extension| !is_member && is_extension)
    }

    fn member_operators_by_name(&self, name: Atom) -> Vec<FunctionId> {
        self.operators_named(name, |is_member, _| is_member)
    }
}
