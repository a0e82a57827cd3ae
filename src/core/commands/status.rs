use super::{Command, CommandError};
use crate::core::state::ShellState;

/// Prints how the last foreground command ended.
#[derive(Clone)]
pub struct StatusCommand;

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCommand {
    pub fn new() -> Self {
        Self
    }

    pub fn report(state: &ShellState) -> String {
        state.last_status().to_string()
    }
}

impl Command for StatusCommand {
    fn execute(&self, _args: &[String], state: &ShellState) -> Result<(), CommandError> {
        println!("{}", Self::report(state));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ExitOutcome;
    use pretty_assertions::assert_eq;

    #[test]
    fn reports_exit_value_zero_before_any_command() {
        assert_eq!(StatusCommand::report(&ShellState::default()), "exit value 0");
    }

    #[test]
    fn reports_signal_termination() {
        let mut state = ShellState::default();
        state.record_foreground(ExitOutcome::Signaled(15));
        assert_eq!(StatusCommand::report(&state), "terminated by signal 15");
    }

    #[test]
    fn reports_exit_code() {
        let mut state = ShellState::default();
        state.record_foreground(ExitOutcome::Exited(127));
        assert_eq!(StatusCommand::report(&state), "exit value 127");
    }
}
