//! Reactive type-declaration package resolver.
//!
//! Checks out and installs a package, runs its tests, and keeps resolving the
//! packages named in "Cannot find module" diagnostics until the tests pass.
//! Collaborator commands and limits come from `.typefix.toml` in the current
//! directory, which is also the workspace root.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use typefix::core::package::PackageRef;
use typefix::exit_codes;
use typefix::io::process::SystemRunner;
use typefix::io::resilient::RetriesExhaustedError;
use typefix::logging;
use typefix::resolve::{CircularDependencyError, UnresolvedValidationError, run_fixup};

#[derive(Parser)]
#[command(
    name = "typefix",
    version,
    about = "Install a types package and every package its tests report missing"
)]
struct Cli {
    /// Package to resolve (directory name under the types directory).
    name: String,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    let target = PackageRef::new(&cli.name).context("invalid package name")?;
    let root = std::env::current_dir().context("read current directory")?;
    info!(root = %root.display(), target = %target, "starting resolution");
    run_fixup(
        &root,
        &target,
        &SystemRunner,
        std::io::stdout(),
        std::io::stderr(),
    )?;
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<UnresolvedValidationError>().is_some() {
        exit_codes::UNRESOLVED
    } else if err.downcast_ref::<CircularDependencyError>().is_some() {
        exit_codes::CIRCULAR
    } else if err.downcast_ref::<RetriesExhaustedError>().is_some() {
        exit_codes::RETRIES_EXHAUSTED
    } else {
        exit_codes::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typefix::core::repair::GiveUpReason;

    #[test]
    fn parse_single_positional() {
        let cli = Cli::parse_from(["typefix", "react"]);
        assert_eq!(cli.name, "react");
    }

    #[test]
    fn missing_name_is_a_usage_error() {
        assert!(Cli::try_parse_from(["typefix"]).is_err());
    }

    #[test]
    fn typed_errors_map_to_exit_codes() {
        let unresolved = anyhow::Error::new(UnresolvedValidationError {
            unit: "foo".to_string(),
            validations: 3,
            reason: GiveUpReason::Stalled { consecutive: 3 },
        })
        .context("resolve foo");
        assert_eq!(exit_code_for(&unresolved), exit_codes::UNRESOLVED);

        let circular = anyhow::Error::new(CircularDependencyError {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        });
        assert_eq!(exit_code_for(&circular), exit_codes::CIRCULAR);

        let exhausted = anyhow::Error::new(RetriesExhaustedError {
            command: "npm install".to_string(),
            attempts: 2,
        })
        .context("install foo");
        assert_eq!(exit_code_for(&exhausted), exit_codes::RETRIES_EXHAUSTED);

        assert_eq!(
            exit_code_for(&anyhow::anyhow!("bad config")),
            exit_codes::INVALID
        );
    }
}
