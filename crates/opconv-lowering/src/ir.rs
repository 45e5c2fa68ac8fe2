//! Typed intermediate representation produced by lowering.
//!
//! Nodes are immutable values. Every node knows its result type; stores and
//! read-modify-writes have type `Unit`.

use crate::resolution::{PropertyId, VariableId};
use opconv_solver::{FunctionId, TypeId};

/// IR operator tags for binary and assignment expressions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IrOperator {
    Eq,
    PlusEq,
    MinusEq,
    MulEq,
    DivEq,
    ModEq,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    RangeTo,
    In,
    NotIn,
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
}

/// How an operator is lowered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Assignment,
    AugmentedAssignment,
    /// Lowered as a call to the resolved operator function.
    Call,
    Comparison,
    Equality,
    Identity,
}

impl IrOperator {
    pub const fn category(self) -> OperatorCategory {
        match self {
            IrOperator::Eq => OperatorCategory::Assignment,
            IrOperator::PlusEq
            | IrOperator::MinusEq
            | IrOperator::MulEq
            | IrOperator::DivEq
            | IrOperator::ModEq => OperatorCategory::AugmentedAssignment,
            IrOperator::Plus
            | IrOperator::Minus
            | IrOperator::Mul
            | IrOperator::Div
            | IrOperator::Mod
            | IrOperator::RangeTo
            | IrOperator::In
            | IrOperator::NotIn => OperatorCategory::Call,
            IrOperator::Lt | IrOperator::LtEq | IrOperator::Gt | IrOperator::GtEq => {
                OperatorCategory::Comparison
            }
            IrOperator::EqEq | IrOperator::NotEq => OperatorCategory::Equality,
            IrOperator::EqEqEq | IrOperator::NotEqEq => OperatorCategory::Identity,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            IrOperator::Eq => "=",
            IrOperator::PlusEq => "+=",
            IrOperator::MinusEq => "-=",
            IrOperator::MulEq => "*=",
            IrOperator::DivEq => "/=",
            IrOperator::ModEq => "%=",
            IrOperator::Plus => "+",
            IrOperator::Minus => "-",
            IrOperator::Mul => "*",
            IrOperator::Div => "/",
            IrOperator::Mod => "%",
            IrOperator::RangeTo => "..",
            IrOperator::In => "in",
            IrOperator::NotIn => "!in",
            IrOperator::Lt => "<",
            IrOperator::LtEq => "<=",
            IrOperator::Gt => ">",
            IrOperator::GtEq => ">=",
            IrOperator::EqEq => "==",
            IrOperator::NotEq => "!=",
            IrOperator::EqEqEq => "===",
            IrOperator::NotEqEq => "!==",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum IrConst {
    Int(i64),
    Long(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    Null,
}

/// A call to a resolved function.
#[derive(Clone, Debug, PartialEq)]
pub struct IrCall {
    pub function: FunctionId,
    pub dispatch_receiver: Option<Box<IrExpr>>,
    pub extension_receiver: Option<Box<IrExpr>>,
    pub arguments: Vec<IrExpr>,
    pub ty: TypeId,
    /// Operator this call was desugared from.
    pub origin: Option<IrOperator>,
}

/// A primitive binary operation with an optional related convention
/// function (e.g. the `compareTo` or `equals` it stands for).
#[derive(Clone, Debug, PartialEq)]
pub struct IrBinaryOperator {
    pub operator: IrOperator,
    pub ty: TypeId,
    pub related: Option<FunctionId>,
    pub left: Box<IrExpr>,
    pub right: Box<IrExpr>,
}

/// Which receiver of an operator call the indexed base is passed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReceiverSlot {
    /// Member operator: the base is the dispatch receiver.
    Dispatch,
    /// Extension operator: the base is the extension receiver.
    Extension,
}

/// Target of a fused read-modify-write.
#[derive(Clone, Debug, PartialEq)]
pub enum FusedTarget {
    Variable {
        variable: VariableId,
        ty: TypeId,
    },
    Indexed {
        base: Box<IrExpr>,
        /// Shared by `get` and `set`.
        base_slot: ReceiverSlot,
        indices: Vec<IrExpr>,
        get: FunctionId,
        set: FunctionId,
    },
}

/// Reads the target once, applies `function` with `value`, and stores the
/// result back. Receiver and index subexpressions are evaluated once.
#[derive(Clone, Debug, PartialEq)]
pub struct IrReadModifyWrite {
    pub target: FusedTarget,
    pub operator: IrOperator,
    pub function: FunctionId,
    pub value: Box<IrExpr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum IrExpr {
    Const {
        value: IrConst,
        ty: TypeId,
    },
    GetThis {
        ty: TypeId,
    },
    GetVariable {
        variable: VariableId,
        ty: TypeId,
    },
    SetVariable {
        variable: VariableId,
        value: Box<IrExpr>,
    },
    GetProperty {
        property: PropertyId,
        dispatch_receiver: Option<Box<IrExpr>>,
        extension_receiver: Option<Box<IrExpr>>,
        safe_call: bool,
        ty: TypeId,
    },
    SetProperty {
        property: PropertyId,
        dispatch_receiver: Option<Box<IrExpr>>,
        extension_receiver: Option<Box<IrExpr>>,
        safe_call: bool,
        value: Box<IrExpr>,
    },
    Call(IrCall),
    Binary(IrBinaryOperator),
    ReadModifyWrite(IrReadModifyWrite),
    /// Implicit conversion of `value` to `ty` (boxing, nullable view).
    Coerce {
        value: Box<IrExpr>,
        ty: TypeId,
    },
    /// Boolean negation.
    Not {
        value: Box<IrExpr>,
    },
    /// Placeholder for an expression that could not be lowered; carries the
    /// offending source text.
    ErrorExpr {
        text: String,
    },
}

impl IrExpr {
    pub fn ty(&self) -> TypeId {
        match self {
            IrExpr::Const { ty, .. }
            | IrExpr::GetThis { ty }
            | IrExpr::GetVariable { ty, .. }
            | IrExpr::GetProperty { ty, .. }
            | IrExpr::Coerce { ty, .. } => *ty,
            IrExpr::SetVariable { .. }
            | IrExpr::SetProperty { .. }
            | IrExpr::ReadModifyWrite(_) => TypeId::UNIT,
            IrExpr::Call(call) => call.ty,
            IrExpr::Binary(binary) => binary.ty,
            IrExpr::Not { .. } => TypeId::BOOLEAN,
            IrExpr::ErrorExpr { .. } => TypeId::ERROR,
        }
    }

    /// Visit direct children in evaluation order.
    pub fn for_each_child(&self, f: &mut impl FnMut(&IrExpr)) {
        match self {
            IrExpr::Const { .. }
            | IrExpr::GetThis { .. }
            | IrExpr::GetVariable { .. }
            | IrExpr::ErrorExpr { .. } => {}
            IrExpr::SetVariable { value, .. } | IrExpr::Coerce { value, .. } | IrExpr::Not { value } => {
                f(value)
            }
            IrExpr::GetProperty {
                dispatch_receiver,
                extension_receiver,
                ..
            } => {
                visit_opt(dispatch_receiver, f);
                visit_opt(extension_receiver, f);
            }
            IrExpr::SetProperty {
                dispatch_receiver,
                extension_receiver,
                value,
                ..
            } => {
                visit_opt(dispatch_receiver, f);
                visit_opt(extension_receiver, f);
                f(value);
            }
            IrExpr::Call(call) => {
                visit_opt(&call.dispatch_receiver, f);
                visit_opt(&call.extension_receiver, f);
                call.arguments.iter().for_each(|arg| f(arg));
            }
            IrExpr::Binary(binary) => {
                f(&binary.left);
                f(&binary.right);
            }
            IrExpr::ReadModifyWrite(rmw) => {
                if let FusedTarget::Indexed { base, indices, .. } = &rmw.target {
                    f(base);
                    indices.iter().for_each(|index| f(index));
                }
                f(&rmw.value);
            }
        }
    }

    /// Number of nodes in this tree satisfying `pred`, this node included.
    pub fn count_matching(&self, pred: &impl Fn(&IrExpr) -> bool) -> usize {
        let mut count = usize::from(pred(self));
        self.for_each_child(&mut |child| count += child.count_matching(pred));
        count
    }
}

fn visit_opt(expr: &Option<Box<IrExpr>>, f: &mut impl FnMut(&IrExpr)) {
    if let Some(expr) = expr {
        f(expr);
    }
}
