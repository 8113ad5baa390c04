//! Stable exit codes for the `typefix` CLI.

/// Target validation passed.
pub const OK: i32 = 0;
/// Invalid package name, invalid config, or an I/O / spawn failure.
pub const INVALID: i32 = 1;
/// A unit's validation kept failing and the repair policy gave up.
pub const UNRESOLVED: i32 = 2;
/// Missing-package diagnostics formed a cycle back to an in-progress unit.
pub const CIRCULAR: i32 = 3;
/// A checkout or install command exhausted its configured retry cap.
pub const RETRIES_EXHAUSTED: i32 = 4;
