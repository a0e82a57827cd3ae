use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::{
    Cmd, ConditionalEventHandler, DefaultEditor, Event, EventContext, EventHandler, KeyEvent,
    RepeatCount,
};

use super::{LineSource, ReadOutcome};
use crate::error::ShellError;
use crate::process::SignalSubsystem;

/// Interactive line editing on a terminal.
///
/// The terminal is in raw mode while a line is edited, so Ctrl-Z never reaches us as a
/// signal. It is re-bound to raise the mode-toggle signal at the interpreter and abandon
/// the line, which sends it down the same path as an external `kill -TSTP`.
pub struct EditorSource {
    editor: DefaultEditor,
}

struct ToggleModeKey;

impl ConditionalEventHandler for ToggleModeKey {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        _ctx: &EventContext,
    ) -> Option<Cmd> {
        if let Err(e) = SignalSubsystem::raise_toggle() {
            log::warn!("could not raise SIGTSTP: {}", e);
        }
        Some(Cmd::Interrupt)
    }
}

impl EditorSource {
    pub fn new() -> Result<Self, ShellError> {
        let mut editor = DefaultEditor::new()?;
        editor.set_auto_add_history(true);
        editor.bind_sequence(
            KeyEvent::ctrl('Z'),
            EventHandler::Conditional(Box::new(ToggleModeKey)),
        );

        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }
}
