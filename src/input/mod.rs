mod editor;
mod plain;

pub use editor::EditorSource;
pub use plain::PlainSource;

use std::io::{self, IsTerminal};

use crate::error::ShellError;

/// The prompt written before every line.
pub const PROMPT: &str = ": ";

/// What a single read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// One line, without its trailing newline.
    Line(String),
    /// The read was abandoned (Ctrl-C / Ctrl-Z at the prompt, or a signal).
    Interrupted,
    /// No more input.
    Eof,
}

/// Somewhere lines of input come from.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;
}

/// Use the line editor on a terminal unless `plain` is requested.
pub fn open(plain: bool) -> Result<Box<dyn LineSource>, ShellError> {
    if !plain && io::stdin().is_terminal() {
        log::debug!("reading input with the line editor");
        Ok(Box::new(EditorSource::new()?))
    } else {
        log::debug!("reading input as plain lines");
        Ok(Box::new(PlainSource::new(io::stdin().lock())))
    }
}
