//! Test-only helpers: a scripted command runner and temporary workspaces.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::io::layout::Workspace;
use crate::io::process::{CommandOutput, CommandRunner, CommandSpec, OutputMode};

impl CommandOutput {
    /// Successful exit with no output.
    pub fn passed() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    /// Failed exit with `stderr` text.
    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }
}

/// Command runner that replays scripted outputs keyed by command line.
///
/// Commands without a (remaining) script succeed with empty output. Every
/// invocation is recorded in order.
#[derive(Default)]
pub struct ScriptedRunner {
    scripts: RefCell<HashMap<String, VecDeque<CommandOutput>>>,
    calls: RefCell<Vec<(CommandSpec, OutputMode)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outputs for `command_line` (program and args joined by spaces).
    pub fn script(&self, command_line: &str, outputs: Vec<CommandOutput>) {
        self.scripts
            .borrow_mut()
            .entry(command_line.to_string())
            .or_default()
            .extend(outputs);
    }

    pub fn calls(&self) -> Vec<(CommandSpec, OutputMode)> {
        self.calls.borrow().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(spec, _)| spec.command_line())
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput> {
        self.calls.borrow_mut().push((spec.clone(), mode));
        let next = self
            .scripts
            .borrow_mut()
            .get_mut(&spec.command_line())
            .and_then(VecDeque::pop_front);
        Ok(next.unwrap_or_else(CommandOutput::passed))
    }
}

/// Temporary workspace root with an empty `types/` directory.
pub struct TestWorkspace {
    _temp: TempDir,
    workspace: Workspace,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        fs::create_dir_all(temp.path().join("types")).context("create types dir")?;
        let workspace = Workspace::new(temp.path(), "types");
        Ok(Self {
            _temp: temp,
            workspace,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn add_package(&self, name: &str) -> Result<()> {
        let dir = self.workspace.package_dir(name);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))
    }

    pub fn add_version(&self, name: &str, version: &str) -> Result<()> {
        let dir = self.workspace.package_dir(name).join(version);
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))
    }

    /// Create a regular file directly inside the package dir.
    pub fn add_file(&self, name: &str, file: &str) -> Result<()> {
        let path = self.workspace.package_dir(name).join(file);
        fs::write(&path, "").with_context(|| format!("write {}", path.display()))
    }
}
