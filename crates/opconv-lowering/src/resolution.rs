//! Resolved-call descriptors produced by type inference.
//!
//! Lowering never resolves names or overloads itself. Every call, variable
//! and property reference it needs was decided upstream and recorded in a
//! `ResolutionTable`, keyed by the surface expression.

use crate::syntax::{ExprId, SyntaxArena};
use opconv_common::Atom;
use opconv_solver::{FunctionId, Substitution, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableSymbol {
    pub id: VariableId,
    pub name: Atom,
    pub ty: TypeId,
    /// `val x by delegate`
    pub delegated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertySymbol {
    pub id: PropertyId,
    pub name: Atom,
    pub ty: TypeId,
}

/// What a resolved reference points to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalleeSymbol {
    Function(FunctionId),
    Variable(VariableSymbol),
    Property(PropertySymbol),
}

/// A receiver argument of a resolved call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiverValue {
    /// An explicit receiver expression.
    Expression(ExprId),
    /// An implicit receiver (`this` of an enclosing scope).
    Implicit { ty: TypeId },
}

impl ReceiverValue {
    pub fn ty(&self, arena: &SyntaxArena) -> TypeId {
        match self {
            ReceiverValue::Expression(expr) => {
                arena.get(*expr).map(|e| e.ty).unwrap_or(TypeId::ERROR)
            }
            ReceiverValue::Implicit { ty } => *ty,
        }
    }
}

/// One resolved call, variable access or property access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCall {
    pub callee: CalleeSymbol,
    pub dispatch_receiver: Option<ReceiverValue>,
    pub extension_receiver: Option<ReceiverValue>,
    pub value_arguments: Vec<ExprId>,
    /// Type arguments inferred for the callee's type parameters.
    pub substitution: Substitution,
    pub result_type: TypeId,
    /// Reached through `?.`.
    pub safe_call: bool,
}

impl ResolvedCall {
    pub fn new(callee: CalleeSymbol, result_type: TypeId) -> Self {
        Self {
            callee,
            dispatch_receiver: None,
            extension_receiver: None,
            value_arguments: Vec::new(),
            substitution: Substitution::new(),
            result_type,
            safe_call: false,
        }
    }

    pub fn function(function: FunctionId, result_type: TypeId) -> Self {
        Self::new(CalleeSymbol::Function(function), result_type)
    }

    pub fn with_dispatch_receiver(mut self, receiver: ReceiverValue) -> Self {
        self.dispatch_receiver = Some(receiver);
        self
    }

    pub fn with_extension_receiver(mut self, receiver: ReceiverValue) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    pub fn with_argument(mut self, argument: ExprId) -> Self {
        self.value_arguments.push(argument);
        self
    }

    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = substitution;
        self
    }

    pub const fn safe(mut self) -> Self {
        self.safe_call = true;
        self
    }

    pub fn function_id(&self) -> Option<FunctionId> {
        match self.callee {
            CalleeSymbol::Function(id) => Some(id),
            CalleeSymbol::Variable(_) | CalleeSymbol::Property(_) => None,
        }
    }
}

/// Keyed lookup of resolved calls, filled by type inference.
pub trait ResolutionTable {
    /// The call, variable or property an expression resolved to.
    fn resolved_call(&self, expr: ExprId) -> Option<&ResolvedCall>;
    /// The `get` operator call of an indexed expression.
    fn indexed_get_call(&self, expr: ExprId) -> Option<&ResolvedCall>;
    /// The `set` operator call of an indexed expression.
    fn indexed_set_call(&self, expr: ExprId) -> Option<&ResolvedCall>;
    /// Whether an augmented assignment stores its operator result back into
    /// the target, as opposed to calling an assign-operator for effect.
    fn is_simple_reassignment(&self, expr: ExprId) -> bool;
}

/// In-memory `ResolutionTable`.
#[derive(Clone, Debug, Default)]
pub struct ResolvedCallMap {
    calls: FxHashMap<ExprId, ResolvedCall>,
    indexed_get: FxHashMap<ExprId, ResolvedCall>,
    indexed_set: FxHashMap<ExprId, ResolvedCall>,
    simple_reassignments: FxHashSet<ExprId>,
}

impl ResolvedCallMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&mut self, expr: ExprId, call: ResolvedCall) {
        self.calls.insert(expr, call);
    }

    pub fn record_indexed_get(&mut self, expr: ExprId, call: ResolvedCall) {
        self.indexed_get.insert(expr, call);
    }

    pub fn record_indexed_set(&mut self, expr: ExprId, call: ResolvedCall) {
        self.indexed_set.insert(expr, call);
    }

    pub fn mark_simple_reassignment(&mut self, expr: ExprId) {
        self.simple_reassignments.insert(expr);
    }

    pub fn len(&self) -> usize {
        self.calls.len() + self.indexed_get.len() + self.indexed_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResolutionTable for ResolvedCallMap {
    fn resolved_call(&self, expr: ExprId) -> Option<&ResolvedCall> {
        self.calls.get(&expr)
    }

    fn indexed_get_call(&self, expr: ExprId) -> Option<&ResolvedCall> {
        self.indexed_get.get(&expr)
    }

    fn indexed_set_call(&self, expr: ExprId) -> Option<&ResolvedCall> {
        self.indexed_set.get(&expr)
    }

    fn is_simple_reassignment(&self, expr: ExprId) -> bool {
        self.simple_reassignments.contains(&expr)
    }
}
