//! Single validation run for one unit, with output passthrough.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::types::ValidationOutcome;
use crate::io::process::{CommandRunner, CommandSpec, OutputMode};

/// Run the validation command once and classify it.
///
/// Output is captured, then forwarded verbatim to `out`/`err` and flushed,
/// so the caller sees the tool's output whatever the outcome. Never retried.
/// On failure the diagnostics are stderr decoded as UTF-8 (lossy).
#[instrument(skip_all, fields(command = %spec))]
pub fn run_validation<R, O, E>(
    runner: &R,
    spec: &CommandSpec,
    out: &mut O,
    err: &mut E,
) -> Result<ValidationOutcome>
where
    R: CommandRunner,
    O: Write,
    E: Write,
{
    let output = runner.run(spec, OutputMode::Capture)?;

    out.write_all(&output.stdout).context("forward validation stdout")?;
    out.flush().context("flush stdout")?;
    err.write_all(&output.stderr).context("forward validation stderr")?;
    err.flush().context("flush stderr")?;

    if output.success() {
        debug!("validation passed");
        return Ok(ValidationOutcome::Pass);
    }
    debug!(exit_code = ?output.code, "validation failed");
    Ok(ValidationOutcome::Fail {
        diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
