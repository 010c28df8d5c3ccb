//! Operator prompts.
//!
//! Every interactive decision in both binaries goes through a [`Prompter`].
//! Yes/no answers are normalized by [`is_yes`]; free-text questions come in
//! a plain variant (empty answer means "skip the dependent step") and a
//! wrapped variant that re-asks until the operator supplies something.
//!
//! With `assume_yes` set the prompter never touches stdin: confirmations
//! resolve to yes, defaulted questions take their default, and required
//! questions without a default fail rather than hang an unattended run.

use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};

/// Normalize a yes/no answer. Only `y`, after trimming and ignoring case,
/// counts as yes; everything else (empty included) is no.
pub fn is_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}

/// Asks questions on stdout and reads answers from stdin.
#[derive(Debug, Clone)]
pub struct Prompter {
    assume_yes: bool,
}

impl Prompter {
    pub fn new(assume_yes: bool) -> Self {
        Prompter { assume_yes }
    }

    /// Yes/no question; empty answer means no.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        self.confirm_from(question, &mut io::stdin().lock())
    }

    /// Free-text question; empty answer maps to `None`.
    pub fn ask(&self, question: &str) -> Result<Option<String>> {
        self.ask_from(question, &mut io::stdin().lock())
    }

    /// Free-text question that re-asks until the answer is non-empty.
    pub fn ask_required(&self, question: &str) -> Result<String> {
        self.ask_required_from(question, &mut io::stdin().lock())
    }

    /// Free-text question with a pre-filled default; empty answer takes
    /// the default.
    pub fn ask_with_default(&self, question: &str, default: &str) -> Result<String> {
        self.ask_with_default_from(question, default, &mut io::stdin().lock())
    }

    fn confirm_from<R: BufRead>(&self, question: &str, input: &mut R) -> Result<bool> {
        if self.assume_yes {
            println!("{} [y/n] y", question);
            return Ok(true);
        }

        print!("{} [y/n] ", question);
        io::stdout().flush()?;

        match read_answer(input)? {
            Some(answer) => Ok(is_yes(&answer)),
            None => Ok(false),
        }
    }

    fn ask_from<R: BufRead>(&self, question: &str, input: &mut R) -> Result<Option<String>> {
        if self.assume_yes {
            return Ok(None);
        }

        print!("{} ", question);
        io::stdout().flush()?;

        match read_answer(input)? {
            Some(answer) if !answer.is_empty() => Ok(Some(answer)),
            _ => Ok(None),
        }
    }

    fn ask_required_from<R: BufRead>(&self, question: &str, input: &mut R) -> Result<String> {
        if self.assume_yes {
            bail!(
                "'{}' requires an answer, but --yes suppresses prompts;\n\
                 supply the value via its environment variable or drop --yes",
                question
            );
        }

        loop {
            print!("{} ", question);
            io::stdout().flush()?;

            match read_answer(input)? {
                Some(answer) if !answer.is_empty() => return Ok(answer),
                Some(_) => continue,
                None => bail!("stdin closed while waiting for '{}'", question),
            }
        }
    }

    fn ask_with_default_from<R: BufRead>(
        &self,
        question: &str,
        default: &str,
        input: &mut R,
    ) -> Result<String> {
        if self.assume_yes {
            println!("{} [{}] {}", question, default, default);
            return Ok(default.to_string());
        }

        print!("{} [{}] ", question, default);
        io::stdout().flush()?;

        match read_answer(input)? {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Ok(default.to_string()),
        }
    }
}

/// One trimmed line from the operator; `None` on EOF.
fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
