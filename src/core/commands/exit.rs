use super::{Command, CommandError};
use crate::core::state::ShellState;
use std::io::Write;

/// Ends the interpreter with status 0. Background children are left running.
#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, _args: &[String], _state: &ShellState) -> Result<(), CommandError> {
        std::io::stdout().flush()?;
        std::process::exit(0);
    }
}
