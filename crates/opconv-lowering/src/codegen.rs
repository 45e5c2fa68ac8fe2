//! Leaf operand and call node lowering.
//!
//! `LoweringEngine` walks every expression that has subexpressions (binary
//! expressions, indexed reads, calls, property reads) and hands the leaves
//! and the finished call nodes to a `CallGenerator`. `TableCallGenerator` is
//! the default implementation, reading the syntax arena and the
//! resolved-call table directly.

use crate::error::LoweringError;
use crate::ir::{IrCall, IrConst, IrExpr, IrOperator};
use crate::resolution::{CalleeSymbol, ReceiverValue, ResolutionTable, ResolvedCall};
use crate::syntax::{ExprId, ExprKind, Literal, SyntaxArena};
use tracing::trace;

pub trait CallGenerator {
    /// Lower a leaf operand: a literal, `this`, or a local variable read.
    fn generate_expression(&mut self, expr: ExprId) -> Result<IrExpr, LoweringError>;

    fn generate_receiver(&mut self, receiver: &ReceiverValue) -> Result<IrExpr, LoweringError>;

    /// Build the call node for `call` from already lowered receivers and
    /// arguments.
    fn generate_call(
        &mut self,
        expr: ExprId,
        call: &ResolvedCall,
        dispatch_receiver: Option<IrExpr>,
        extension_receiver: Option<IrExpr>,
        arguments: Vec<IrExpr>,
        origin: Option<IrOperator>,
    ) -> Result<IrExpr, LoweringError>;
}

pub struct TableCallGenerator<'a> {
    arena: &'a SyntaxArena,
    table: &'a dyn ResolutionTable,
}

impl<'a> TableCallGenerator<'a> {
    pub fn new(arena: &'a SyntaxArena, table: &'a dyn ResolutionTable) -> Self {
        Self { arena, table }
    }
}

impl CallGenerator for TableCallGenerator<'_> {
    fn generate_expression(&mut self, expr: ExprId) -> Result<IrExpr, LoweringError> {
        let node = self
            .arena
            .get(expr)
            .ok_or(LoweringError::UnknownExpression(expr))?;
        trace!(expr = expr.0, "TableCallGenerator::generate_expression");
        match &node.kind {
            ExprKind::Literal(literal) => Ok(IrExpr::Const {
                value: lower_literal(literal),
                ty: node.ty,
            }),
            ExprKind::This => Ok(IrExpr::GetThis { ty: node.ty }),
            ExprKind::Name(_) | ExprKind::Qualified { .. } => {
                let call = self
                    .table
                    .resolved_call(expr)
                    .ok_or(LoweringError::MissingResolvedCall {
                        expr,
                        what: "name reference",
                    })?;
                match &call.callee {
                    CalleeSymbol::Variable(symbol) if symbol.delegated => Err(
                        LoweringError::NotImplemented("delegated local variable read"),
                    ),
                    CalleeSymbol::Variable(symbol) => Ok(IrExpr::GetVariable {
                        variable: symbol.id,
                        ty: node.ty,
                    }),
                    CalleeSymbol::Property(_) => Err(LoweringError::CompositeOperand(expr)),
                    CalleeSymbol::Function(_) => {
                        Err(LoweringError::NotImplemented("function reference"))
                    }
                }
            }
            ExprKind::Indexed { .. } | ExprKind::Call { .. } | ExprKind::Binary { .. } => {
                Err(LoweringError::CompositeOperand(expr))
            }
        }
    }

    fn generate_receiver(&mut self, receiver: &ReceiverValue) -> Result<IrExpr, LoweringError> {
        match receiver {
            ReceiverValue::Expression(expr) => self.generate_expression(*expr),
            ReceiverValue::Implicit { ty } => Ok(IrExpr::GetThis { ty: *ty }),
        }
    }

    fn generate_call(
        &mut self,
        _expr: ExprId,
        call: &ResolvedCall,
        dispatch_receiver: Option<IrExpr>,
        extension_receiver: Option<IrExpr>,
        arguments: Vec<IrExpr>,
        origin: Option<IrOperator>,
    ) -> Result<IrExpr, LoweringError> {
        let function = call
            .function_id()
            .ok_or(LoweringError::NotImplemented("call to a non-function symbol"))?;
        Ok(IrExpr::Call(IrCall {
            function,
            dispatch_receiver: dispatch_receiver.map(Box::new),
            extension_receiver: extension_receiver.map(Box::new),
            arguments,
            ty: call.result_type,
            origin,
        }))
    }
}

fn lower_literal(literal: &Literal) -> IrConst {
    match literal {
        Literal::Int(value) => IrConst::Int(*value),
        Literal::Long(value) => IrConst::Long(*value),
        Literal::Double(value) => IrConst::Double(*value),
        Literal::Boolean(value) => IrConst::Boolean(*value),
        Literal::String(value) => IrConst::String(value.clone()),
        Literal::Null => IrConst::Null,
    }
}
