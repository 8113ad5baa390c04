//! CLI tests for `typefix <name>`.
//!
//! Spawns the binary in a temporary workspace whose collaborators are `sh`
//! scripts configured through `.typefix.toml`, and checks exit codes and the
//! passthrough of validation output.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use typefix::exit_codes;
use typefix::io::config::{
    CONFIG_FILE_NAME, CommandConfig, RepairConfig, RetryConfig, TypefixConfig, write_config,
};

fn sh(script: &str) -> CommandConfig {
    CommandConfig {
        command: vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "typefix-test".to_string(),
        ],
    }
}

/// Config whose collaborators succeed, log their invocations, and validate via `validate`.
fn config(validate: &str) -> TypefixConfig {
    TypefixConfig {
        bootstrap_package: String::new(),
        install_workspace_root: false,
        checkout: sh(r#"echo "checkout $1" >> "$PWD/calls.log""#),
        install: sh("true"),
        validate: sh(validate),
        repair: RepairConfig {
            stall_limit: 2,
            max_validations: 0,
        },
        ..TypefixConfig::default()
    }
}

fn run_typefix(root: &Path, name: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_typefix"))
        .current_dir(root)
        .arg(name)
        .output()
        .expect("spawn typefix")
}

#[test]
fn passing_validation_exits_ok() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_config(
        &temp.path().join(CONFIG_FILE_NAME),
        &config(r#"echo "tests for $1 passed""#),
    )
    .expect("write config");

    let output = run_typefix(temp.path(), "foo");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Fixup foo latest"));
    assert!(stdout.contains("tests for foo passed"));
}

#[test]
fn missing_dependency_is_resolved_before_revalidating() {
    let temp = tempfile::tempdir().expect("tempdir");
    // `foo` fails until `bar` has been checked out.
    let validate = r#"
case "$1" in
  foo)
    if grep -q "checkout types/bar" calls.log; then exit 0; fi
    echo "error TS2307: Cannot find module 'bar' or its corresponding type declarations." >&2
    exit 1;;
  *) exit 0;;
esac"#;
    write_config(&temp.path().join(CONFIG_FILE_NAME), &config(validate)).expect("write config");

    let output = run_typefix(temp.path(), "foo");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let log = fs::read_to_string(temp.path().join("calls.log")).expect("calls log");
    assert_eq!(log, "checkout types/foo\ncheckout types/bar\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot find module 'bar'"));
}

#[test]
fn unrelated_failure_exits_unresolved() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_config(
        &temp.path().join(CONFIG_FILE_NAME),
        &config(r#"echo "error TS2322: Type 'string' is not assignable." >&2; exit 1"#),
    )
    .expect("write config");

    let output = run_typefix(temp.path(), "foo");

    assert_eq!(output.status.code(), Some(exit_codes::UNRESOLVED));
}

#[test]
fn circular_missing_packages_exit_circular() {
    let temp = tempfile::tempdir().expect("tempdir");
    let validate = r#"
case "$1" in
  a) other=b;;
  *) other=a;;
esac
echo "Cannot find module '$other' or its corresponding type declarations." >&2
exit 1"#;
    write_config(&temp.path().join(CONFIG_FILE_NAME), &config(validate)).expect("write config");

    let output = run_typefix(temp.path(), "a");

    assert_eq!(output.status.code(), Some(exit_codes::CIRCULAR));
    assert!(String::from_utf8_lossy(&output.stderr).contains("circular dependency: a -> b -> a"));
}

#[test]
fn failing_checkout_with_retry_cap_exits_retries_exhausted() {
    let temp = tempfile::tempdir().expect("tempdir");
    let cfg = TypefixConfig {
        checkout: sh("exit 1"),
        retry: RetryConfig { max_attempts: 3 },
        ..config("exit 0")
    };
    write_config(&temp.path().join(CONFIG_FILE_NAME), &cfg).expect("write config");

    let output = run_typefix(temp.path(), "foo");

    assert_eq!(output.status.code(), Some(exit_codes::RETRIES_EXHAUSTED));
}

#[test]
fn invalid_package_name_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = run_typefix(temp.path(), "../escape");

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}
