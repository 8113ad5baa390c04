//! Shared deterministic types for resolver core logic.

/// Classification of a single validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The validation command exited zero.
    Pass,
    /// The validation command failed; `diagnostics` is its decoded stderr.
    Fail { diagnostics: String },
}

/// Counters describing one top-level resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveSummary {
    /// Units (name or name/version) that went through install.
    pub units: u32,
    /// Validation runs across all units.
    pub validation_runs: u32,
    /// Resolutions triggered by missing-package diagnostics.
    pub nested_resolutions: u32,
}
