//! Surface expression storage.
//!
//! The parser and type inference stages fill a `SyntaxArena`; lowering only
//! reads it. Expressions refer to each other by `ExprId`, and each carries
//! the static type inference assigned to it.

use opconv_common::Atom;
use opconv_common::limits::INLINE_INDEX_COUNT;
use opconv_solver::TypeId;
use smallvec::SmallVec;
use std::fmt;

/// Index of an expression in its `SyntaxArena`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source range of an expression, for diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub length: u32,
}

impl Span {
    pub const fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Long(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    Null,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// A simple name: local variable, property, or implicit-receiver member.
    Name(Atom),
    /// `receiver.selector` or `receiver?.selector`.
    Qualified {
        receiver: ExprId,
        selector: Atom,
        safe_call: bool,
    },
    /// `base[i, j, ...]`
    Indexed {
        base: ExprId,
        indices: SmallVec<[ExprId; INLINE_INDEX_COUNT]>,
    },
    /// `left <operator> right`, including assignments. The operator is the
    /// raw token text.
    Binary {
        operator: String,
        left: ExprId,
        right: ExprId,
    },
    Call {
        callee: Atom,
        arguments: Vec<ExprId>,
    },
    Literal(Literal),
    This,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Static type assigned by inference.
    pub ty: TypeId,
    pub span: Span,
}

/// Arena-based storage for surface expressions.
#[derive(Debug, Default)]
pub struct SyntaxArena {
    exprs: Vec<Expr>,
}

impl SyntaxArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expression without source position.
    pub fn add(&mut self, kind: ExprKind, ty: TypeId) -> ExprId {
        self.add_spanned(kind, ty, Span::default())
    }

    pub fn add_spanned(&mut self, kind: ExprKind, ty: TypeId, span: Span) -> ExprId {
        let index = self.exprs.len() as u32;
        self.exprs.push(Expr { kind, ty, span });
        ExprId(index)
    }

    pub fn get(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    // Convenience constructors

    pub fn name(&mut self, name: Atom, ty: TypeId) -> ExprId {
        self.add(ExprKind::Name(name), ty)
    }

    pub fn literal(&mut self, literal: Literal, ty: TypeId) -> ExprId {
        self.add(ExprKind::Literal(literal), ty)
    }

    pub fn binary(&mut self, operator: &str, left: ExprId, right: ExprId, ty: TypeId) -> ExprId {
        self.add(
            ExprKind::Binary {
                operator: operator.to_string(),
                left,
                right,
            },
            ty,
        )
    }

    pub fn indexed(&mut self, base: ExprId, indices: &[ExprId], ty: TypeId) -> ExprId {
        self.add(
            ExprKind::Indexed {
                base,
                indices: SmallVec::from_slice(indices),
            },
            ty,
        )
    }
}
