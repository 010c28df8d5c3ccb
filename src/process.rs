//! Shell command execution.
//!
//! Every mutating action in both binaries goes through here: a command is a
//! single string handed to `sh -c`, so pipes, redirects, env-var prefixes,
//! and globs behave exactly as they would at an operator's prompt.
//!
//! Two modes:
//!
//! - [`run`] streams output to the operator's terminal and returns only
//!   success/failure. Used for installers and package managers whose
//!   progress the operator should see.
//! - [`run_captured`] pipes stdout into memory (stderr stays on the
//!   terminal) and returns it trimmed. Used when a step must parse the
//!   output: version strings, IP addresses, release tags.
//!
//! A non-zero exit in either mode becomes a [`CommandFailure`] carrying the
//! command string and normalized exit code. Callers treat that as fatal via
//! `?` except where a step's contract declares the failure expected.

use anyhow::{Context, Result};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// A child process exited non-zero.
///
/// Carries enough for the top-level handler to report the failing command
/// and propagate the child's exit code as the process exit status.
#[derive(Debug, Error)]
#[error("command `{command}` exited with status {code}")]
pub struct CommandFailure {
    /// The shell command string as invoked.
    pub command: String,
    /// Normalized exit code (128+signal if killed by a signal).
    pub code: i32,
}

/// Map an exit status to a plain code.
///
/// On Unix a signal death maps to the conventional 128+signal so it stays
/// distinguishable from ordinary failure codes.
pub fn normalize_exit(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(code) = status.code() {
            code
        } else if let Some(sig) = status.signal() {
            128 + sig
        } else {
            1
        }
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(1)
    }
}

fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

fn check(command: &str, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(CommandFailure {
        command: command.to_string(),
        code: normalize_exit(status),
    }
    .into())
}

/// Run a shell command, streaming its output to the terminal.
pub fn run(command: &str) -> Result<()> {
    let status = shell(command)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to spawn `{}`", command))?;

    check(command, status)
}

/// Run a shell command, capturing stdout.
///
/// stderr is left on the terminal so failures from quiet commands still
/// surface to the operator. Trailing whitespace and newlines are trimmed
/// from the captured output.
pub fn run_captured(command: &str) -> Result<String> {
    let output = shell(command)
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| format!("failed to spawn `{}`", command))?;

    check(command, output.status)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout.trim_end().to_string())
}

/// Pull the child exit code out of an error chain, if the root cause was a
/// failed command. Used by `main` to propagate the child's code.
pub fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<CommandFailure>().map(|f| f.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_succeeds_on_zero_exit() {
        assert!(run("true").is_ok());
    }

    #[test]
    fn run_fails_on_nonzero_exit() {
        let err = run("exit 1").unwrap_err();
        let failure = err.downcast_ref::<CommandFailure>().unwrap();
        assert_eq!(failure.code, 1);
        assert_eq!(failure.command, "exit 1");
    }

    #[test]
    fn run_captured_trims_trailing_newline() {
        let out = run_captured("echo hello").unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn run_captured_honors_pipes() {
        let out = run_captured("printf 'a\\nb\\nc\\n' | wc -l").unwrap();
        assert_eq!(out.trim(), "3");
    }

    #[test]
    fn run_captured_preserves_exit_code() {
        let err = run_captured("exit 42").unwrap_err();
        let failure = err.downcast_ref::<CommandFailure>().unwrap();
        assert_eq!(failure.code, 42);
    }

    #[test]
    fn failure_message_names_command_and_code() {
        let err = run("exit 3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "command `exit 3` exited with status 3"
        );
    }

    #[test]
    fn exit_code_extracts_from_chain() {
        let err = run("exit 7").unwrap_err();
        assert_eq!(exit_code(&err), Some(7));

        let other = anyhow::anyhow!("unrelated");
        assert_eq!(exit_code(&other), None);
    }

    #[test]
    fn expected_failure_falls_back() {
        // The pattern the ELRepo step relies on: a failing probe chains
        // into an alternate command instead of aborting.
        let result = run("exit 1").or_else(|_| run("true"));
        assert!(result.is_ok());
    }
}
