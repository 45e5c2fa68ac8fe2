//! opconv: operator convention resolution and expression lowering.
//!
//! This package ties the workspace crates together:
//!
//! - [`common`]: atoms, diagnostics and shared limits
//! - [`solver`]: fuzzy types, substitutions and the operator convention
//!   resolver (`contains`, `getValue`, `setValue`)
//! - [`lowering`]: binary and assignment lowering to a typed IR

pub use opconv_common as common;
pub use opconv_lowering as lowering;
pub use opconv_solver as solver;

pub use opconv_common::{Atom, Diagnostic};
pub use opconv_lowering::{IrExpr, LoweringEngine, LoweringError, LoweringOptions};
pub use opconv_solver::{
    FuzzyType, OperatorConvention, OperatorConventionResolver, OperatorMatch, SolverContext,
    Substitution, TypeId,
};

// Tracing configuration (text / tree / JSON output for debugging)
pub mod tracing_config;
