//! Reserved operator names and their shape predicates.
//!
//! Each convention only decides whether one function's signature fits the
//! caller's types; the search itself lives in `operator_resolver`.

use crate::SolverContext;
use crate::def::FunctionDef;
use crate::fuzzy::FuzzyType;
use crate::substitution::{FunctionSignature, Substitution};
use crate::types::TypeParamId;
use smallvec::SmallVec;
use tracing::trace;

/// A reserved function name granting special syntax to its implementors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperatorName {
    /// `x in c`
    Contains,
    /// Delegated property read.
    GetValue,
    /// Delegated property write.
    SetValue,
}

impl OperatorName {
    pub const fn as_str(self) -> &'static str {
        match self {
            OperatorName::Contains => "contains",
            OperatorName::GetValue => "getValue",
            OperatorName::SetValue => "setValue",
        }
    }

    /// Number of value parameters an implementation must declare.
    pub const fn required_value_params(self) -> usize {
        match self {
            OperatorName::Contains => 1,
            OperatorName::GetValue => 2,
            OperatorName::SetValue => 3,
        }
    }
}

/// A convention together with the caller-side types it must fit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperatorConvention {
    Contains {
        /// Type of the left operand of `in`.
        argument_type: FuzzyType,
    },
    GetValue {
        property_owner: FuzzyType,
        /// Expected type of the delegated property, when known.
        property_type: Option<FuzzyType>,
    },
    SetValue {
        property_owner: FuzzyType,
    },
}

impl OperatorConvention {
    pub const fn name(&self) -> OperatorName {
        match self {
            OperatorConvention::Contains { .. } => OperatorName::Contains,
            OperatorConvention::GetValue { .. } => OperatorName::GetValue,
            OperatorConvention::SetValue { .. } => OperatorName::SetValue,
        }
    }

    /// Explicitly marked `operator` with the arity this convention needs.
    pub fn is_eligible(&self, function: &FunctionDef) -> bool {
        function.is_operator && function.value_params.len() == self.name().required_value_params()
    }

    /// A substitution under which `signature` fits this convention's types.
    ///
    /// `free` are the caller-side parameters that may still be bound; the
    /// signature's own unbound type parameters are free as well.
    pub fn check_is_suitable_by_type(
        &self,
        ctx: SolverContext<'_>,
        signature: &FunctionSignature,
        free: &[TypeParamId],
    ) -> Option<Substitution> {
        let free: SmallVec<[TypeParamId; 8]> = signature
            .type_params
            .iter()
            .chain(free)
            .copied()
            .collect();
        let result = match self {
            OperatorConvention::Contains { argument_type } => {
                let parameter = FuzzyType::new(ctx.db, signature.param_type(0)?, free);
                parameter.check_is_super_type_of(ctx, argument_type)
            }
            OperatorConvention::GetValue {
                property_owner,
                property_type,
            } => {
                let this_ref = FuzzyType::new(ctx.db, signature.param_type(0)?, free.clone());
                let owner_sub = this_ref.check_is_super_type_of(ctx, property_owner)?;
                match property_type {
                    None => Some(owner_sub),
                    Some(expected) => {
                        let Some(return_type) = signature.return_type else {
                            trace!(
                                function = signature.function.0,
                                "getValue without declared return type"
                            );
                            return None;
                        };
                        let returned =
                            FuzzyType::new(ctx.db, owner_sub.apply(ctx.db, return_type), free);
                        let return_sub = returned.check_is_subtype_of(ctx, expected)?;
                        Some(Substitution::chain(ctx.db, &owner_sub, &return_sub))
                    }
                }
            }
            OperatorConvention::SetValue { property_owner } => {
                let this_ref = FuzzyType::new(ctx.db, signature.param_type(0)?, free);
                this_ref.check_is_super_type_of(ctx, property_owner)
            }
        };
        trace!(
            convention = self.name().as_str(),
            function = signature.function.0,
            suitable = result.is_some(),
            "check_is_suitable_by_type"
        );
        result
    }
}

#[cfg(test)]
#[path = "../tests/conventions_tests.rs"]
mod tests;
