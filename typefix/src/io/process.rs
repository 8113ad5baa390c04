//! Child process execution behind a [`CommandRunner`] seam.
//!
//! Every command carries its own working directory; the process-wide current
//! directory is never changed. Tests substitute a scripted runner that records
//! invocations instead of spawning processes.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument};

/// A fully specified external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: PathBuf,
}

impl CommandSpec {
    /// Build from a `[program, args...]` vector plus trailing arguments.
    pub fn from_parts(parts: &[String], extra: &[&str], workdir: PathBuf) -> Result<Self> {
        let (program, leading) = parts
            .split_first()
            .ok_or_else(|| anyhow!("command must not be empty"))?;
        let mut args = leading.to_vec();
        args.extend(extra.iter().map(|arg| arg.to_string()));
        Ok(Self {
            program: program.clone(),
            args,
            workdir,
        })
    }

    /// Program and arguments joined by spaces, for logs and error messages.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Whether child stdout/stderr are captured or inherited from this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Inherit,
    Capture,
}

/// Exit code and (when captured) output of a finished child.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Abstraction over process spawning.
pub trait CommandRunner {
    /// Run `spec` to completion. A non-zero exit is not an error; failing to
    /// spawn the program is.
    fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput>;
}

/// Runner that spawns real child processes and blocks until they exit.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    #[instrument(skip_all, fields(command = %spec, workdir = %spec.workdir.display()))]
    fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.workdir)
            .stdin(Stdio::inherit());

        debug!("spawning child process");
        let output = match mode {
            OutputMode::Inherit => cmd.status().map(|status| CommandOutput {
                code: status.code(),
                ..CommandOutput::default()
            }),
            OutputMode::Capture => cmd.output().map(|output| CommandOutput {
                code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            }),
        };
        let output = match output {
            Ok(output) => output,
            Err(e) => {
                error!(err = %e, "failed to spawn command");
                return Err(e).with_context(|| format!("spawn {}", spec.command_line()));
            }
        };

        debug!(exit_code = ?output.code, "command finished");
        Ok(output)
    }
}
