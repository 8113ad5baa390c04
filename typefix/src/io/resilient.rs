//! Blocking command execution that retries until the command succeeds.

use std::fmt;

use anyhow::Result;
use tracing::{debug, instrument, warn};

use crate::core::retry::RetryPolicy;
use crate::io::process::{CommandRunner, CommandSpec, OutputMode};

/// A command kept failing until the retry policy ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetriesExhaustedError {
    pub command: String,
    pub attempts: u32,
}

impl fmt::Display for RetriesExhaustedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` still failing after {} attempt(s)",
            self.command, self.attempts
        )
    }
}

impl std::error::Error for RetriesExhaustedError {}

/// Run `spec` with inherited output, retrying immediately on non-zero exit.
///
/// No backoff and no distinction between failure kinds. Under the default
/// unbounded policy a permanently failing command blocks forever.
/// Returns the number of attempts it took.
#[instrument(skip_all, fields(command = %spec))]
pub fn run_until_success<R: CommandRunner>(
    runner: &R,
    spec: &CommandSpec,
    policy: RetryPolicy,
) -> Result<u32> {
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        let output = runner.run(spec, OutputMode::Inherit)?;
        if output.success() {
            debug!(attempts, "command succeeded");
            return Ok(attempts);
        }
        warn!(attempts, exit_code = ?output.code, "command failed");
        if !policy.allows_another(attempts) {
            return Err(RetriesExhaustedError {
                command: spec.command_line(),
                attempts,
            }
            .into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::process::CommandOutput;
    use crate::test_support::ScriptedRunner;
    use std::path::PathBuf;

    fn spec() -> CommandSpec {
        CommandSpec {
            program: "git".to_string(),
            args: vec!["sparse-checkout".to_string(), "add".to_string()],
            workdir: PathBuf::from("/work"),
        }
    }

    #[test]
    fn retries_until_success() {
        let runner = ScriptedRunner::new();
        runner.script(
            "git sparse-checkout add",
            vec![CommandOutput::failed(1, ""), CommandOutput::failed(128, "")],
        );

        let attempts =
            run_until_success(&runner, &spec(), RetryPolicy::unbounded()).expect("success");
        assert_eq!(attempts, 3);
        assert_eq!(runner.command_lines().len(), 3);
    }

    #[test]
    fn limited_policy_surfaces_exhaustion() {
        let runner = ScriptedRunner::new();
        runner.script(
            "git sparse-checkout add",
            vec![CommandOutput::failed(1, ""); 5],
        );

        let err = run_until_success(&runner, &spec(), RetryPolicy::limited(2))
            .expect_err("exhausted");
        let exhausted = err
            .downcast_ref::<RetriesExhaustedError>()
            .expect("typed error");
        assert_eq!(exhausted.attempts, 2);
        assert_eq!(runner.command_lines().len(), 2);
    }
}
