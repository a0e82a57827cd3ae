use std::collections::BTreeMap;

mod cd;
mod exit;
mod status;

pub use cd::CdCommand;
pub use exit::ExitCommand;
pub use status::StatusCommand;

use crate::core::state::ShellState;

#[derive(Debug)]
pub enum CommandError {
    NotFound(String),
    ExecutionError(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NotFound(cmd) => write!(f, "not a builtin: {}", cmd),
            CommandError::ExecutionError(msg) => write!(f, "{}", msg),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

/// A command that runs inside the interpreter's own process.
pub trait Command {
    fn execute(&self, args: &[String], state: &ShellState) -> Result<(), CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Cd(CdCommand),
    Exit(ExitCommand),
    Status(StatusCommand),
}

impl Command for CommandType {
    fn execute(&self, args: &[String], state: &ShellState) -> Result<(), CommandError> {
        match self {
            CommandType::Cd(cmd) => cmd.execute(args, state),
            CommandType::Exit(cmd) => cmd.execute(args, state),
            CommandType::Status(cmd) => cmd.execute(args, state),
        }
    }
}

/// Dispatches `exit`, `cd` and `status`.
#[derive(Clone)]
pub struct CommandExecutor {
    commands: BTreeMap<String, CommandType>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("cd".to_string(), CommandType::Cd(CdCommand::new()));
        commands.insert("exit".to_string(), CommandType::Exit(ExitCommand::new()));
        commands.insert(
            "status".to_string(),
            CommandType::Status(StatusCommand::new()),
        );

        Self { commands }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[String],
        state: &ShellState,
    ) -> Result<(), CommandError> {
        match self.commands.get(command) {
            Some(cmd) => cmd.execute(args, state),
            None => Err(CommandError::NotFound(command.to_string())),
        }
    }

    pub fn is_builtin(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }
}
