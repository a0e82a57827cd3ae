use std::sync::Arc;

use crate::process::signal::SignalState;
use crate::process::ExitOutcome;

/// Interpreter-wide state for one run.
///
/// `foreground_only` and `last_foreground_status` are only touched by the read-eval
/// loop. Everything a signal handler reads or writes lives in [`SignalState`].
#[derive(Debug)]
pub struct ShellState {
    foreground_only: bool,
    last_foreground_status: ExitOutcome,
    signals: Arc<SignalState>,
}

impl ShellState {
    pub fn new(signals: Arc<SignalState>) -> Self {
        Self {
            foreground_only: false,
            last_foreground_status: ExitOutcome::default(),
            signals,
        }
    }

    pub fn foreground_only(&self) -> bool {
        self.foreground_only
    }

    /// Flip foreground-only mode and return the new value.
    pub fn toggle_foreground_only(&mut self) -> bool {
        self.foreground_only = !self.foreground_only;
        log::debug!("foreground-only mode: {}", self.foreground_only);
        self.foreground_only
    }

    pub fn last_status(&self) -> ExitOutcome {
        self.last_foreground_status
    }

    /// Store the outcome of a foreground child that has fully terminated.
    pub fn record_foreground(&mut self, outcome: ExitOutcome) {
        self.last_foreground_status = outcome;
    }

    pub fn signals(&self) -> &Arc<SignalState> {
        &self.signals
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(Arc::new(SignalState::new()))
    }
}
