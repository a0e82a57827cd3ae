mod executor;
mod expansion;
pub mod parser;
mod redirect;

pub use expansion::expand_pid;
pub use redirect::Command;

use crate::{
    core::{commands::CommandExecutor, ShellState},
    error::ShellError,
    flags::Flags,
    input::{self, LineSource, ReadOutcome, PROMPT},
    process::{self, LifecycleManager, ProcessId, SignalEvent, SignalSubsystem},
};

use executor::CommandHandler;

pub struct Shell {
    pub(crate) source: Box<dyn LineSource>,
    pub(crate) state: ShellState,
    pub(crate) signals: SignalSubsystem,
    pub(crate) builtins: CommandExecutor,
    pub(crate) lifecycle: LifecycleManager,
    pub(crate) pid: ProcessId,
}

impl Shell {
    pub fn new(flags: &Flags) -> Result<Self, ShellError> {
        let signals = SignalSubsystem::install()?;
        let state = ShellState::new(signals.state().clone());
        let source = input::open(flags.is_set("plain"))?;

        Ok(Shell {
            source,
            state,
            signals,
            builtins: CommandExecutor::new(),
            lifecycle: LifecycleManager::new(),
            pid: process::getpid(),
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        log::debug!("interpreter pid {}", self.pid);

        loop {
            self.handle_signal_events()?;

            let line = match self.source.read_line(PROMPT)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => break,
            };

            self.handle_signal_events()?;

            if let Err(e) = self.execute_command(&line) {
                if e.is_fatal() {
                    return Err(e);
                }
                eprintln!("smallsh: {}", e);
            }
        }
        Ok(())
    }

    /// Act on signals that arrived since the last call.
    pub(crate) fn handle_signal_events(&mut self) -> Result<(), ShellError> {
        for event in self.signals.state().take_pending() {
            match event {
                SignalEvent::Interrupt => match self.state.signals().foreground_pid() {
                    Some(pid) => log::debug!("interrupt while pid {} is in the foreground", pid),
                    None => log::debug!("interrupt ignored"),
                },
                SignalEvent::ToggleMode => {
                    if self.state.toggle_foreground_only() {
                        println!("\nEntering foreground-only mode (& is now ignored)");
                        self.lifecycle.reap_sweep()?;
                    } else {
                        println!("\nExiting foreground-only mode");
                    }
                }
            }
        }
        Ok(())
    }
}
