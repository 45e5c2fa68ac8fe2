//! Fatal lowering failures.
//!
//! These abort lowering of the current expression only. Recoverable problems
//! (unknown operator tokens) become `ErrorExpr` nodes plus a `Diagnostic`
//! instead.

use crate::syntax::ExprId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoweringError {
    /// A reachable surface form lowering does not handle yet.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
    /// Type inference left no resolved call where one is required.
    #[error("missing resolved call for {what} at expression {expr}")]
    MissingResolvedCall { expr: ExprId, what: &'static str },
    #[error("expression {0} is not in the syntax arena")]
    UnknownExpression(ExprId),
    #[error("expression {0} is not a binary expression")]
    NotBinaryExpression(ExprId),
    /// A `CallGenerator` was handed an expression with subexpressions, which
    /// only the lowering engine walks.
    #[error("expression {0} has subexpressions and is lowered by the engine")]
    CompositeOperand(ExprId),
}
