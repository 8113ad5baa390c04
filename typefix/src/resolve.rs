//! Reactive resolution of missing type packages.
//!
//! For a target unit the resolver checks the package out, recurses into its
//! sibling versions, installs it, then validates. Each failed validation is
//! mined for missing-package diagnostics; every named package is resolved the
//! same way before validating again. The loop ends when validation passes or
//! the repair policy gives up.

use std::fmt;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::core::diagnostics::missing_packages;
use crate::core::package::PackageRef;
use crate::core::repair::{GiveUpReason, RepairDecision, RepairPolicy, RepairTracker};
use crate::core::retry::RetryPolicy;
use crate::core::types::{ResolveSummary, ValidationOutcome};
use crate::io::commands::Commands;
use crate::io::config::{CONFIG_FILE_NAME, TypefixConfig, load_config};
use crate::io::layout::Workspace;
use crate::io::process::CommandRunner;
use crate::io::resilient::run_until_success;
use crate::io::validation::run_validation;
use crate::io::versions::find_versions;

const BANNER_RULE: &str =
    "================================================================================";

/// A unit was re-entered while its own resolution was still in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularDependencyError {
    /// Units from the outermost in-progress one down to the re-entered unit.
    pub chain: Vec<String>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular dependency: {}", self.chain.join(" -> "))
    }
}

impl std::error::Error for CircularDependencyError {}

/// Validation kept failing and the repair policy gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedValidationError {
    pub unit: String,
    pub validations: u32,
    pub reason: GiveUpReason,
}

impl fmt::Display for UnresolvedValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation of {} did not converge after {} run(s): {}",
            self.unit, self.validations, self.reason
        )
    }
}

impl std::error::Error for UnresolvedValidationError {}

/// Resolver state for one top-level invocation.
///
/// `out`/`err` receive banners and the validation tool's passthrough output.
pub struct Resolver<'a, R, O, E> {
    workspace: &'a Workspace,
    commands: Commands<'a>,
    runner: &'a R,
    retry: RetryPolicy,
    repair: RepairPolicy,
    out: O,
    err: E,
    in_progress: Vec<PackageRef>,
    summary: ResolveSummary,
}

impl<'a, R, O, E> Resolver<'a, R, O, E>
where
    R: CommandRunner,
    O: Write,
    E: Write,
{
    pub fn new(
        config: &'a TypefixConfig,
        workspace: &'a Workspace,
        runner: &'a R,
        out: O,
        err: E,
    ) -> Self {
        Self {
            workspace,
            commands: Commands::new(config, workspace),
            runner,
            retry: config.retry_policy(),
            repair: config.repair_policy(),
            out,
            err,
            in_progress: Vec::new(),
            summary: ResolveSummary::default(),
        }
    }

    pub fn summary(&self) -> ResolveSummary {
        self.summary
    }

    /// Run the installer in the workspace root itself.
    pub fn install_root(&mut self) -> Result<()> {
        let spec = self.commands.install(self.workspace.root())?;
        run_until_success(self.runner, &spec, self.retry)
            .context("install workspace root")?;
        Ok(())
    }

    /// Resolve `package`, recursing into versions and missing dependencies.
    ///
    /// With `skip_test` the unit is only materialized and installed.
    pub fn resolve(&mut self, package: &PackageRef, skip_test: bool) -> Result<()> {
        if self.in_progress.contains(package) {
            let mut chain: Vec<String> = self.in_progress.iter().map(PackageRef::unit).collect();
            chain.push(package.unit());
            warn!(unit = %package, "re-entered unit still in progress");
            return Err(CircularDependencyError { chain }.into());
        }

        self.in_progress.push(package.clone());
        let result = self.resolve_unit(package, skip_test);
        self.in_progress.pop();
        result
    }

    #[instrument(skip_all, fields(unit = %package, skip_test = skip_test))]
    fn resolve_unit(&mut self, package: &PackageRef, skip_test: bool) -> Result<()> {
        if package.version.is_none() {
            self.materialize(&package.name)?;
            for version in find_versions(self.workspace, &package.name)? {
                self.resolve(&package.versioned(version), false)?;
            }
        }

        self.banner(package)?;
        self.install(package)?;
        self.summary.units += 1;

        if skip_test {
            debug!("skipping validation");
            return Ok(());
        }
        self.repair(package)
    }

    fn materialize(&mut self, name: &str) -> Result<()> {
        let spec = self.commands.checkout(name)?;
        run_until_success(self.runner, &spec, self.retry)
            .with_context(|| format!("check out {name}"))?;
        Ok(())
    }

    /// Install the unit; a unit without a directory has nothing to install.
    fn install(&mut self, package: &PackageRef) -> Result<()> {
        let dir = self.workspace.unit_dir(package);
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no install directory, skipping install");
            return Ok(());
        }
        let spec = self.commands.install(&dir)?;
        run_until_success(self.runner, &spec, self.retry)
            .with_context(|| format!("install {package}"))?;
        Ok(())
    }

    fn repair(&mut self, package: &PackageRef) -> Result<()> {
        let mut tracker = RepairTracker::new(self.repair);
        loop {
            let diagnostics = match self.validate(package)? {
                ValidationOutcome::Pass => {
                    info!(unit = %package, validations = tracker.failures() + 1, "validation passed");
                    return Ok(());
                }
                ValidationOutcome::Fail { diagnostics } => diagnostics,
            };

            let missing = usable_packages(&diagnostics);
            if let RepairDecision::GiveUp(reason) =
                tracker.record_failure(&diagnostics, missing.len())
            {
                warn!(unit = %package, %reason, "giving up on validation");
                return Err(UnresolvedValidationError {
                    unit: package.unit(),
                    validations: tracker.failures(),
                    reason,
                }
                .into());
            }

            debug!(unit = %package, missing = missing.len(), "resolving missing packages");
            for dependency in &missing {
                self.summary.nested_resolutions += 1;
                self.resolve(dependency, false)?;
            }
        }
    }

    fn validate(&mut self, package: &PackageRef) -> Result<ValidationOutcome> {
        let spec = self.commands.validate(package)?;
        self.summary.validation_runs += 1;
        run_validation(self.runner, &spec, &mut self.out, &mut self.err)
            .with_context(|| format!("validate {package}"))
    }

    fn banner(&mut self, package: &PackageRef) -> Result<()> {
        writeln!(
            self.out,
            "{BANNER_RULE}\nFixup {} {}\n{BANNER_RULE}",
            package.name,
            package.version_label()
        )
        .context("write banner")?;
        self.out.flush().context("flush stdout")
    }
}

/// Missing packages named in `diagnostics` that are valid package names.
fn usable_packages(diagnostics: &str) -> Vec<PackageRef> {
    missing_packages(diagnostics)
        .into_iter()
        .filter_map(|name| match PackageRef::new(&name) {
            Ok(package) => Some(package),
            Err(err) => {
                warn!(name = %name, err = %err, "ignoring missing module that is not a package");
                None
            }
        })
        .collect()
}

/// Resolve `target` in the workspace at `root`, as the CLI does.
///
/// Loads `.typefix.toml` from `root`, installs the workspace root and the
/// bootstrap package (without validation) if configured, then resolves the
/// target until its validation passes.
pub fn run_fixup<R, O, E>(
    root: &Path,
    target: &PackageRef,
    runner: &R,
    out: O,
    err: E,
) -> Result<ResolveSummary>
where
    R: CommandRunner,
    O: Write,
    E: Write,
{
    let config_path = root.join(CONFIG_FILE_NAME);
    let config = load_config(&config_path)?;
    let workspace = Workspace::new(root, &config.types_dir);
    debug!(root = %root.display(), types_dir = %config.types_dir, "workspace loaded");

    let mut resolver = Resolver::new(&config, &workspace, runner, out, err);
    if config.install_workspace_root {
        resolver.install_root()?;
    }
    if let Some(bootstrap) = config.bootstrap() {
        let bootstrap = PackageRef::new(bootstrap)?;
        resolver.resolve(&bootstrap, true)?;
    }
    resolver.resolve(target, false)?;

    let summary = resolver.summary();
    info!(
        target = %target,
        units = summary.units,
        validation_runs = summary.validation_runs,
        nested = summary.nested_resolutions,
        "resolution converged"
    );
    Ok(summary)
}
