//! Expression Lowering
//!
//! Lowers resolved binary and assignment expressions to a typed IR.
//!
//! Inputs are a `SyntaxArena` of surface expressions and a `ResolutionTable`
//! of the calls type inference chose for them. Nothing is resolved here:
//! lowering only assembles IR from decisions already made.
//!
//! - **LValues**: assignment targets built once, receivers and indices
//!   lowered once
//! - **Fusion**: `a[i] += x` becomes a single read-modify-write node
//! - **Comparisons**: primitive operator nodes related to the resolved
//!   `compareTo`/`equals`
pub mod codegen;
pub mod engine;
pub mod error;
pub mod ir;
pub mod lvalue;
pub mod options;
pub mod resolution;
pub mod syntax;

pub use codegen::{CallGenerator, TableCallGenerator};
pub use engine::{LoweringEngine, OPERATORS_WITHOUT_IR_TAG, operator_for_token};
pub use error::LoweringError;
pub use ir::{
    FusedTarget, IrBinaryOperator, IrCall, IrConst, IrExpr, IrOperator, IrReadModifyWrite,
    OperatorCategory, ReceiverSlot,
};
pub use lvalue::LValue;
pub use options::LoweringOptions;
pub use resolution::{
    CalleeSymbol, PropertyId, PropertySymbol, ReceiverValue, ResolutionTable, ResolvedCall,
    ResolvedCallMap, VariableId, VariableSymbol,
};
pub use syntax::{Expr, ExprId, ExprKind, Literal, Span, SyntaxArena};
