//! Confirmation prompts for destructive actions

use crate::error::{Error, Result};
use std::io::{self, BufRead, IsTerminal, Write};

/// Asks the user to approve an action before it is sent
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}

/// Prompts on stderr and reads the answer from stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm {
    /// Approve without asking (`--yes`)
    pub assume_yes: bool,
}

impl TerminalConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn ask(&self, prompt: &str, interactive: bool, input: &mut impl BufRead) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        if !interactive {
            return Err(Error::Validation(
                "Confirmation required. Re-run with --yes to proceed.".to_string(),
            ));
        }

        eprint!("{} [y/N] ", prompt);
        io::stderr().flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        self.ask(prompt, interactive, &mut stdin.lock())
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
