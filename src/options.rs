//! Process-wide run flags.
//!
//! Parsed once from argv before anything else happens; read-only for the
//! rest of the run.

use anyhow::{bail, Result};

/// Flags shared by every step of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Answer yes to every confirmation without reading stdin.
    pub assume_yes: bool,
    /// Join an existing cluster instead of initializing a new one.
    pub agent: bool,
}

/// What a binary should do with its arguments.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Run(RunOptions),
    Help,
}

/// Parse the shared flag set.
///
/// `usage` is the calling binary's usage text, echoed when an argument is
/// not recognized. `agent_allowed` is false for the binary that has no
/// agent branch, so `--agent` there is an ordinary unknown argument.
pub fn parse_invocation(args: &[String], agent_allowed: bool, usage: &str) -> Result<Invocation> {
    let mut opts = RunOptions::default();

    for arg in args {
        match arg.as_str() {
            "-y" | "--yes" | "--force" => opts.assume_yes = true,
            "--agent" if agent_allowed => opts.agent = true,
            "-h" | "--help" => return Ok(Invocation::Help),
            other => bail!("unknown argument '{}'\n\n{}", other, usage),
        }
    }

    Ok(Invocation::Run(opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_with_no_arguments() {
        let parsed = parse_invocation(&[], true, "usage").unwrap();
        assert_eq!(parsed, Invocation::Run(RunOptions::default()));
    }

    #[test]
    fn yes_flag_aliases() {
        for flag in ["-y", "--yes", "--force"] {
            let parsed = parse_invocation(&args(&[flag]), true, "usage").unwrap();
            match parsed {
                Invocation::Run(opts) => assert!(opts.assume_yes, "{} should force", flag),
                Invocation::Help => panic!("{} parsed as help", flag),
            }
        }
    }

    #[test]
    fn agent_flag_when_allowed() {
        let parsed = parse_invocation(&args(&["--agent", "-y"]), true, "usage").unwrap();
        assert_eq!(
            parsed,
            Invocation::Run(RunOptions {
                assume_yes: true,
                agent: true,
            })
        );
    }

    #[test]
    fn agent_flag_rejected_when_not_allowed() {
        let err = parse_invocation(&args(&["--agent"]), false, "usage text").unwrap_err();
        assert!(err.to_string().contains("--agent"));
        assert!(err.to_string().contains("usage text"));
    }

    #[test]
    fn unknown_argument_carries_usage() {
        let err = parse_invocation(&args(&["--bogus"]), true, "usage text").unwrap_err();
        assert!(err.to_string().contains("'--bogus'"));
        assert!(err.to_string().contains("usage text"));
    }

    #[test]
    fn help_flag_short_circuits() {
        let parsed = parse_invocation(&args(&["-h", "--bogus"]), true, "usage").unwrap();
        assert_eq!(parsed, Invocation::Help);
    }
}
