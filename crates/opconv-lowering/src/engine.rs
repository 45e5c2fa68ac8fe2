//! Binary and assignment expression lowering.
//!
//! `LoweringEngine::generate_binary_expression` maps the surface operator
//! token to an `IrOperator` and lowers by the operator's category:
//!
//! | Category | Tokens | Lowering |
//! |---|---|---|
//! | Assignment | `=` | store into the target |
//! | Augmented assignment | `+= -= *= /= %=` | fused read-modify-write, or read, call, store |
//! | Call | `+ - * / % .. in !in` | call to the resolved operator function |
//! | Comparison | `< <= > >=` | primitive compare over non-null operands |
//! | Equality | `== !=` | primitive compare over nullable operands |
//! | Identity | `=== !==` | primitive compare, no coercion, no related function |
//!
//! Tokens without an IR operator lower to `IrExpr::ErrorExpr` and record a
//! diagnostic; lowering of the surrounding code continues.

use crate::codegen::CallGenerator;
use crate::error::LoweringError;
use crate::ir::{IrBinaryOperator, IrExpr, IrOperator, OperatorCategory};
use crate::lvalue::LValue;
use crate::options::LoweringOptions;
use crate::resolution::{CalleeSymbol, ReceiverValue, ResolutionTable, ResolvedCall};
use crate::syntax::{Expr, ExprId, ExprKind, SyntaxArena};
use opconv_common::limits::INLINE_INDEX_COUNT;
use opconv_common::{Diagnostic, diagnostic_codes};
use opconv_solver::{FunctionId, SolverContext, TypeId};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Operator tokens the surface language has but which are not lowered as
/// binary expressions.
pub const OPERATORS_WITHOUT_IR_TAG: &[&str] = &["&&", "||", "?:"];

/// The IR operator for a surface token.
pub fn operator_for_token(token: &str) -> Option<IrOperator> {
    let operator = match token {
        "=" => IrOperator::Eq,
        "+=" => IrOperator::PlusEq,
        "-=" => IrOperator::MinusEq,
        "*=" => IrOperator::MulEq,
        "/=" => IrOperator::DivEq,
        "%=" => IrOperator::ModEq,
        "+" => IrOperator::Plus,
        "-" => IrOperator::Minus,
        "*" => IrOperator::Mul,
        "/" => IrOperator::Div,
        "%" => IrOperator::Mod,
        ".." => IrOperator::RangeTo,
        "in" => IrOperator::In,
        "!in" => IrOperator::NotIn,
        "<" => IrOperator::Lt,
        "<=" => IrOperator::LtEq,
        ">" => IrOperator::Gt,
        ">=" => IrOperator::GtEq,
        "==" => IrOperator::EqEq,
        "!=" => IrOperator::NotEq,
        "===" => IrOperator::EqEqEq,
        "!==" => IrOperator::NotEqEq,
        _ => return None,
    };
    Some(operator)
}

pub struct LoweringEngine<'a, G> {
    ctx: SolverContext<'a>,
    arena: &'a SyntaxArena,
    table: &'a dyn ResolutionTable,
    generator: G,
    options: LoweringOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, G: CallGenerator> LoweringEngine<'a, G> {
    pub fn new(
        ctx: SolverContext<'a>,
        arena: &'a SyntaxArena,
        table: &'a dyn ResolutionTable,
        generator: G,
    ) -> Self {
        Self {
            ctx,
            arena,
            table,
            generator,
            options: LoweringOptions::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: LoweringOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> LoweringOptions {
        self.options
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Lower one binary or assignment expression.
    pub fn generate_binary_expression(&mut self, expr: ExprId) -> Result<IrExpr, LoweringError> {
        let node = self.expr(expr)?;
        let ExprKind::Binary {
            operator,
            left,
            right,
        } = &node.kind
        else {
            return Err(LoweringError::NotBinaryExpression(expr));
        };
        let Some(op) = operator_for_token(operator) else {
            return Ok(self.unsupported_operator(node, operator));
        };
        trace!(expr = expr.0, operator = op.token(), "generate_binary_expression");

        match op.category() {
            OperatorCategory::Assignment => self.generate_assignment(*left, *right),
            OperatorCategory::AugmentedAssignment => {
                self.generate_augmented_assignment(expr, op, *left, *right)
            }
            OperatorCategory::Call => self.generate_operator_call(expr, op),
            OperatorCategory::Comparison => {
                self.generate_primitive_comparison(expr, op, *left, *right, false)
            }
            OperatorCategory::Equality => {
                self.generate_primitive_comparison(expr, op, *left, *right, true)
            }
            OperatorCategory::Identity => self.generate_identity(op, *left, *right),
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    fn generate_assignment(&mut self, left: ExprId, right: ExprId) -> Result<IrExpr, LoweringError> {
        let lvalue = self.build_lvalue(left)?;
        let value = self.generate_operand(right)?;
        lvalue.store(value)
    }

    fn generate_augmented_assignment(
        &mut self,
        expr: ExprId,
        op: IrOperator,
        left: ExprId,
        right: ExprId,
    ) -> Result<IrExpr, LoweringError> {
        let call = self.required_call(expr, "augmented assignment operator")?;
        let function = call.function_id().ok_or(LoweringError::NotImplemented(
            "augmented assignment resolved to a non-function",
        ))?;
        let lvalue = self.build_lvalue(left)?;
        let value = self.generate_operand(right)?;
        let simple = self.table.is_simple_reassignment(expr);

        if simple && self.options.fuse_augmented_assignment && lvalue.supports_fusion() {
            debug!(expr = expr.0, operator = op.token(), "fused read-modify-write");
            return lvalue.fused(op, function, value);
        }

        let current = lvalue.load()?;
        let result = self.call_with_operands(expr, call, current, value, op)?;
        if simple {
            lvalue.store(result)
        } else {
            Ok(result)
        }
    }

    fn generate_operator_call(
        &mut self,
        expr: ExprId,
        op: IrOperator,
    ) -> Result<IrExpr, LoweringError> {
        let call = self.required_call(expr, "operator call")?;
        let lowered = self.generate_resolved_call(expr, call, Some(op))?;
        if op == IrOperator::NotIn {
            Ok(IrExpr::Not {
                value: Box::new(lowered),
            })
        } else {
            Ok(lowered)
        }
    }

    /// Comparison and equality: a primitive operator node related to the
    /// resolved `compareTo`/`equals`, with operands coerced to the resolved
    /// receiver and parameter types. Equality compares nullable views, since
    /// either side may be null.
    fn generate_primitive_comparison(
        &mut self,
        expr: ExprId,
        op: IrOperator,
        left: ExprId,
        right: ExprId,
        nullable_operands: bool,
    ) -> Result<IrExpr, LoweringError> {
        let what = if nullable_operands {
            "equality operator"
        } else {
            "comparison operator"
        };
        let call = self.required_call(expr, what)?;
        let function = call
            .function_id()
            .ok_or(LoweringError::NotImplemented("comparison resolved to a non-function"))?;
        let (receiver_ty, parameter_ty) = self.operand_types(call, function);

        let left = self.generate_operand(left)?;
        let right = self.generate_operand(right)?;
        let db = self.ctx.db;
        let view = |ty: TypeId| {
            if nullable_operands {
                db.nullable(ty)
            } else {
                db.non_null(ty)
            }
        };
        let left_ty = view(receiver_ty.unwrap_or_else(|| left.ty()));
        let right_ty = view(parameter_ty.unwrap_or_else(|| right.ty()));

        Ok(IrExpr::Binary(IrBinaryOperator {
            operator: op,
            ty: TypeId::BOOLEAN,
            related: Some(function),
            left: Box::new(coerce(left, left_ty)),
            right: Box::new(coerce(right, right_ty)),
        }))
    }

    fn generate_identity(
        &mut self,
        op: IrOperator,
        left: ExprId,
        right: ExprId,
    ) -> Result<IrExpr, LoweringError> {
        let left = self.generate_operand(left)?;
        let right = self.generate_operand(right)?;
        Ok(IrExpr::Binary(IrBinaryOperator {
            operator: op,
            ty: TypeId::BOOLEAN,
            related: None,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn unsupported_operator(&mut self, node: &Expr, token: &str) -> IrExpr {
        let code = if OPERATORS_WITHOUT_IR_TAG.contains(&token) {
            diagnostic_codes::OPERATOR_WITHOUT_IR_TAG
        } else {
            diagnostic_codes::UNSUPPORTED_OPERATOR
        };
        debug!(token, code, "operator lowered to error expression");
        if self.options.report_unknown_operators {
            self.diagnostics.push(Diagnostic::from_code(
                node.span.start,
                node.span.length,
                code,
                &[token],
            ));
        }
        IrExpr::ErrorExpr {
            text: token.to_string(),
        }
    }

    // =========================================================================
    // LValues
    // =========================================================================

    /// Build the assignment target for `expr`, lowering its receiver and index
    /// subexpressions exactly once.
    pub fn build_lvalue(&mut self, expr: ExprId) -> Result<LValue, LoweringError> {
        let node = self.expr(expr)?;
        match &node.kind {
            ExprKind::Indexed { base, indices } => {
                let base = self.generate_operand(*base)?;
                let indices = indices
                    .iter()
                    .map(|&index| self.generate_operand(index))
                    .collect::<Result<SmallVec<[IrExpr; INLINE_INDEX_COUNT]>, _>>()?;
                let table = self.table;
                Ok(LValue::Indexed {
                    expr,
                    base: Box::new(base),
                    indices,
                    get_call: table.indexed_get_call(expr).cloned(),
                    set_call: table.indexed_set_call(expr).cloned(),
                    ty: node.ty,
                })
            }
            ExprKind::Name(_) | ExprKind::Qualified { .. } => {
                let call = self.required_call(expr, "assignment target")?;
                match &call.callee {
                    CalleeSymbol::Variable(symbol) if symbol.delegated => Err(
                        LoweringError::NotImplemented("assignment to a delegated local variable"),
                    ),
                    CalleeSymbol::Variable(symbol) => Ok(LValue::Variable {
                        symbol: symbol.clone(),
                    }),
                    CalleeSymbol::Property(symbol) => {
                        let dispatch = self.lower_receiver(call.dispatch_receiver.as_ref())?;
                        let extension = self.lower_receiver(call.extension_receiver.as_ref())?;
                        let safe_call = call.safe_call
                            || matches!(node.kind, ExprKind::Qualified { safe_call: true, .. });
                        Ok(LValue::Property {
                            symbol: symbol.clone(),
                            dispatch_receiver: dispatch.map(Box::new),
                            extension_receiver: extension.map(Box::new),
                            safe_call,
                        })
                    }
                    CalleeSymbol::Function(_) => Err(LoweringError::NotImplemented(
                        "assignment to a function call result",
                    )),
                }
            }
            _ => Err(LoweringError::NotImplemented("assignment target form")),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn expr(&self, expr: ExprId) -> Result<&'a Expr, LoweringError> {
        let arena = self.arena;
        arena.get(expr).ok_or(LoweringError::UnknownExpression(expr))
    }

    fn required_call(
        &self,
        expr: ExprId,
        what: &'static str,
    ) -> Result<&'a ResolvedCall, LoweringError> {
        let table = self.table;
        table
            .resolved_call(expr)
            .ok_or(LoweringError::MissingResolvedCall { expr, what })
    }

    /// Lower an operand. Forms with subexpressions are lowered here, so a
    /// binary expression nested in an index, a call argument or a receiver
    /// never reaches the generator.
    fn generate_operand(&mut self, expr: ExprId) -> Result<IrExpr, LoweringError> {
        match &self.expr(expr)?.kind {
            ExprKind::Binary { .. } => self.generate_binary_expression(expr),
            ExprKind::Indexed { .. } => self.build_lvalue(expr)?.load(),
            ExprKind::Name(_) | ExprKind::Qualified { .. }
                if self.is_property_reference(expr) =>
            {
                self.build_lvalue(expr)?.load()
            }
            ExprKind::Call { .. } => {
                let call = self.required_call(expr, "call")?;
                self.generate_resolved_call(expr, call, None)
            }
            _ => self.generator.generate_expression(expr),
        }
    }

    fn is_property_reference(&self, expr: ExprId) -> bool {
        matches!(
            self.table.resolved_call(expr).map(|call| &call.callee),
            Some(CalleeSymbol::Property(_))
        )
    }

    /// Lower the receivers and value arguments of `call` in order, then hand
    /// them to the generator.
    fn generate_resolved_call(
        &mut self,
        expr: ExprId,
        call: &ResolvedCall,
        origin: Option<IrOperator>,
    ) -> Result<IrExpr, LoweringError> {
        let dispatch = self.lower_receiver(call.dispatch_receiver.as_ref())?;
        let extension = self.lower_receiver(call.extension_receiver.as_ref())?;
        let arguments = call
            .value_arguments
            .iter()
            .map(|&argument| self.generate_operand(argument))
            .collect::<Result<Vec<_>, _>>()?;
        self.generator
            .generate_call(expr, call, dispatch, extension, arguments, origin)
    }

    fn lower_receiver(
        &mut self,
        receiver: Option<&ReceiverValue>,
    ) -> Result<Option<IrExpr>, LoweringError> {
        match receiver {
            None => Ok(None),
            Some(ReceiverValue::Expression(expr)) => self.generate_operand(*expr).map(Some),
            Some(implicit @ ReceiverValue::Implicit { .. }) => {
                self.generator.generate_receiver(implicit).map(Some)
            }
        }
    }

    /// Call the operator of `call` with `left` in its receiver slot and
    /// `right` as its single argument.
    fn call_with_operands(
        &mut self,
        expr: ExprId,
        call: &ResolvedCall,
        left: IrExpr,
        right: IrExpr,
        op: IrOperator,
    ) -> Result<IrExpr, LoweringError> {
        let (dispatch, extension) = if call.extension_receiver.is_some() {
            (self.lower_receiver(call.dispatch_receiver.as_ref())?, Some(left))
        } else {
            (Some(left), None)
        };
        self.generator
            .generate_call(expr, call, dispatch, extension, vec![right], Some(op))
    }

    /// Receiver and first parameter types of `function` as resolved at `call`.
    fn operand_types(
        &self,
        call: &ResolvedCall,
        function: FunctionId,
    ) -> (Option<TypeId>, Option<TypeId>) {
        let signature = self
            .ctx
            .defs
            .function(function)
            .map(|def| call.substitution.apply_to_function(self.ctx, function, &def));
        let receiver_ty = signature
            .as_ref()
            .and_then(|signature| signature.receiver_type)
            .or_else(|| {
                call.dispatch_receiver
                    .as_ref()
                    .map(|receiver| receiver.ty(self.arena))
            });
        let parameter_ty = signature.and_then(|signature| signature.param_type(0));
        (receiver_ty, parameter_ty)
    }
}

fn coerce(value: IrExpr, ty: TypeId) -> IrExpr {
    if value.ty() == ty {
        value
    } else {
        IrExpr::Coerce {
            value: Box::new(value),
            ty,
        }
    }
}

#[cfg(test)]
#[path = "../tests/engine_tests.rs"]
mod tests;
