//! Reactive installer for type-declaration packages.
//!
//! Given a target package, `typefix` checks it out, installs it, and runs its
//! validation. Failed validations are scanned for missing-module diagnostics,
//! each named package is resolved recursively, and validation is retried until
//! it passes or the repair policy gives up.
//!
//! - **[`core`]**: Pure, deterministic logic (package refs, diagnostic parsing,
//!   retry and repair policies). No I/O.
//! - **[`io`]**: Side-effecting adapters (config, filesystem layout, child
//!   processes). Process spawning sits behind a trait so tests can script it.
//!
//! [`resolve`] coordinates the two to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod resolve;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
