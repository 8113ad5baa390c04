//! Command specs for the checkout, install, and validation collaborators.

use std::path::Path;

use anyhow::Result;

use crate::core::package::PackageRef;
use crate::io::config::TypefixConfig;
use crate::io::layout::Workspace;
use crate::io::process::CommandSpec;

/// Builds collaborator invocations from config and workspace layout.
#[derive(Debug, Clone)]
pub struct Commands<'a> {
    config: &'a TypefixConfig,
    workspace: &'a Workspace,
}

impl<'a> Commands<'a> {
    pub fn new(config: &'a TypefixConfig, workspace: &'a Workspace) -> Self {
        Self { config, workspace }
    }

    /// `<checkout> <types_dir>/<name>`, run from the workspace root.
    pub fn checkout(&self, name: &str) -> Result<CommandSpec> {
        let path = self.workspace.checkout_path(name);
        CommandSpec::from_parts(
            &self.config.checkout.command,
            &[path.as_str()],
            self.workspace.root().to_path_buf(),
        )
    }

    /// `<install>`, run inside `dir`.
    pub fn install(&self, dir: &Path) -> Result<CommandSpec> {
        CommandSpec::from_parts(&self.config.install.command, &[], dir.to_path_buf())
    }

    /// `<validate> <name>[/<version>]`, run from the workspace root.
    pub fn validate(&self, package: &PackageRef) -> Result<CommandSpec> {
        let unit = package.unit();
        CommandSpec::from_parts(
            &self.config.validate.command,
            &[unit.as_str()],
            self.workspace.root().to_path_buf(),
        )
    }
}
