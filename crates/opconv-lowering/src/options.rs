//! Lowering configuration.

/// Knobs for `LoweringEngine`.
///
/// Construct with `LoweringOptions::default()` and adjust with the `with_*`
/// methods.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoweringOptions {
    /// Emit a single read-modify-write node for augmented assignments whose
    /// target supports it. When off, every augmented assignment is lowered as
    /// separate read, operator call and write.
    pub fuse_augmented_assignment: bool,
    /// Record a diagnostic for operator tokens that cannot be lowered.
    pub report_unknown_operators: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            fuse_augmented_assignment: true,
            report_unknown_operators: true,
        }
    }
}

impl LoweringOptions {
    pub const fn with_fuse_augmented_assignment(mut self, fuse: bool) -> Self {
        self.fuse_augmented_assignment = fuse;
        self
    }

    pub const fn with_report_unknown_operators(mut self, report: bool) -> Self {
        self.report_unknown_operators = report;
        self
    }
}
