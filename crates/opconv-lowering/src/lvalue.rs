//! Assignable targets.
//!
//! An `LValue` is built once per assignment, with its receiver and index
//! subexpressions already lowered. Reads and writes reuse those lowered
//! nodes instead of lowering the source expressions again.

use crate::error::LoweringError;
use crate::ir::{FusedTarget, IrCall, IrExpr, IrOperator, IrReadModifyWrite, ReceiverSlot};
use crate::resolution::{PropertySymbol, ResolvedCall, VariableSymbol};
use crate::syntax::ExprId;
use opconv_common::limits::INLINE_INDEX_COUNT;
use opconv_solver::{FunctionId, TypeId};
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq)]
pub enum LValue {
    /// A non-delegated local variable.
    Variable { symbol: VariableSymbol },
    Property {
        symbol: PropertySymbol,
        dispatch_receiver: Option<Box<IrExpr>>,
        extension_receiver: Option<Box<IrExpr>>,
        safe_call: bool,
    },
    /// `base[indices]`, read through `get_call` and written through `set_call`.
    Indexed {
        expr: ExprId,
        base: Box<IrExpr>,
        indices: SmallVec<[IrExpr; INLINE_INDEX_COUNT]>,
        get_call: Option<ResolvedCall>,
        set_call: Option<ResolvedCall>,
        ty: TypeId,
    },
}

impl LValue {
    pub fn ty(&self) -> TypeId {
        match self {
            LValue::Variable { symbol } => symbol.ty,
            LValue::Property { symbol, .. } => symbol.ty,
            LValue::Indexed { ty, .. } => *ty,
        }
    }

    /// Whether a single read-modify-write node can update this target.
    /// Indexed targets need both operators, taking the base in the same slot.
    pub fn supports_fusion(&self) -> bool {
        match self {
            LValue::Variable { .. } => true,
            LValue::Indexed {
                get_call: Some(get),
                set_call: Some(set),
                ..
            } => base_slot(get) == base_slot(set),
            LValue::Indexed { .. } | LValue::Property { .. } => false,
        }
    }

    pub fn load(&self) -> Result<IrExpr, LoweringError> {
        match self {
            LValue::Variable { symbol } => Ok(IrExpr::GetVariable {
                variable: symbol.id,
                ty: symbol.ty,
            }),
            LValue::Property {
                symbol,
                dispatch_receiver,
                extension_receiver,
                safe_call,
            } => Ok(IrExpr::GetProperty {
                property: symbol.id,
                dispatch_receiver: dispatch_receiver.clone(),
                extension_receiver: extension_receiver.clone(),
                safe_call: *safe_call,
                ty: symbol.ty,
            }),
            LValue::Indexed {
                expr,
                base,
                indices,
                get_call,
                ..
            } => {
                let call = get_call
                    .as_ref()
                    .ok_or(LoweringError::MissingResolvedCall {
                        expr: *expr,
                        what: "indexed get operator",
                    })?;
                indexed_call(call, base, indices.iter().cloned().collect())
            }
        }
    }

    pub fn store(&self, value: IrExpr) -> Result<IrExpr, LoweringError> {
        match self {
            LValue::Variable { symbol } => Ok(IrExpr::SetVariable {
                variable: symbol.id,
                value: Box::new(value),
            }),
            LValue::Property {
                symbol,
                dispatch_receiver,
                extension_receiver,
                safe_call,
            } => Ok(IrExpr::SetProperty {
                property: symbol.id,
                dispatch_receiver: dispatch_receiver.clone(),
                extension_receiver: extension_receiver.clone(),
                safe_call: *safe_call,
                value: Box::new(value),
            }),
            LValue::Indexed {
                expr,
                base,
                indices,
                set_call,
                ..
            } => {
                let call = set_call
                    .as_ref()
                    .ok_or(LoweringError::MissingResolvedCall {
                        expr: *expr,
                        what: "indexed set operator",
                    })?;
                let mut arguments: Vec<IrExpr> = indices.iter().cloned().collect();
                arguments.push(value);
                indexed_call(call, base, arguments)
            }
        }
    }

    /// One node reading this target, applying `function` with `value`, and
    /// writing the result back.
    pub fn fused(
        &self,
        operator: IrOperator,
        function: FunctionId,
        value: IrExpr,
    ) -> Result<IrExpr, LoweringError> {
        let target = match self {
            LValue::Variable { symbol } => FusedTarget::Variable {
                variable: symbol.id,
                ty: symbol.ty,
            },
            LValue::Indexed {
                base,
                indices,
                get_call: Some(get),
                set_call: Some(set),
                ..
            } => {
                let slot = base_slot(get);
                if slot != base_slot(set) {
                    return Err(LoweringError::NotImplemented(
                        "fused indexed access with mixed member and extension operators",
                    ));
                }
                let (Some(get), Some(set)) = (get.function_id(), set.function_id()) else {
                    return Err(LoweringError::NotImplemented(
                        "indexed access resolved to a non-function",
                    ));
                };
                FusedTarget::Indexed {
                    base: base.clone(),
                    base_slot: slot,
                    indices: indices.iter().cloned().collect(),
                    get,
                    set,
                }
            }
            LValue::Indexed { .. } | LValue::Property { .. } => {
                return Err(LoweringError::NotImplemented(
                    "fused read-modify-write on this target",
                ));
            }
        };
        Ok(IrExpr::ReadModifyWrite(IrReadModifyWrite {
            target,
            operator,
            function,
            value: Box::new(value),
        }))
    }
}

/// The receiver slot `call` resolved the indexed base into.
fn base_slot(call: &ResolvedCall) -> ReceiverSlot {
    if call.extension_receiver.is_some() {
        ReceiverSlot::Extension
    } else {
        ReceiverSlot::Dispatch
    }
}

fn indexed_call(
    call: &ResolvedCall,
    base: &IrExpr,
    arguments: Vec<IrExpr>,
) -> Result<IrExpr, LoweringError> {
    let function = call.function_id().ok_or(LoweringError::NotImplemented(
        "indexed access resolved to a non-function",
    ))?;
    let base = Box::new(base.clone());
    let (dispatch_receiver, extension_receiver) = match base_slot(call) {
        ReceiverSlot::Dispatch => (Some(base), None),
        ReceiverSlot::Extension => (None, Some(base)),
    };
    Ok(IrExpr::Call(IrCall {
        function,
        dispatch_receiver,
        extension_receiver,
        arguments,
        ty: call.result_type,
        origin: None,
    }))
}

#[cfg(test)]
#[path = "../tests/lvalue_tests.rs"]
mod tests;
