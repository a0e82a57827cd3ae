use super::expansion::ExpansionHandler;
use super::{parser, Command};
use crate::error::ShellError;
use crate::process::Launch;

pub(crate) trait CommandHandler {
    fn execute_command(&mut self, line: &str) -> Result<(), ShellError>;
}

impl CommandHandler for super::Shell {
    fn execute_command(&mut self, line: &str) -> Result<(), ShellError> {
        let line = parser::truncate_line(line);
        if parser::is_blank_or_comment(line) {
            return Ok(());
        }

        let expanded = self.expand_line(line);
        let Some(parsed) = parser::parse(&expanded) else {
            return Ok(());
        };

        let name = &parsed.args[0];
        if self.builtins.is_builtin(name) {
            return self
                .builtins
                .execute(name, &parsed.args[1..], &self.state)
                .map_err(ShellError::from);
        }

        let command = Command::plan(parsed.args, parsed.background)?;
        match self.lifecycle.run(command, &mut self.state)? {
            // Toggles that arrived while the child was running.
            Launch::Foreground(_) => self.handle_signal_events()?,
            Launch::Background(child) => log::debug!("pid {} left running", child.pid),
        }
        self.lifecycle.reap_sweep()?;
        Ok(())
    }
}
