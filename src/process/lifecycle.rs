use super::executor::{ChildHandle, ProcessExecutor};
use super::wait::{self, ExitOutcome};
use super::ProcessError;
use crate::core::state::ShellState;
use crate::shell::Command;

/// How a launched command was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Waited for; carries the decoded outcome.
    Foreground(ExitOutcome),
    /// Left running; will be picked up by a later reap sweep.
    Background(ChildHandle),
}

/// Decides foreground vs background, waits, and reaps.
#[derive(Clone, Debug, Default)]
pub struct LifecycleManager {
    executor: ProcessExecutor,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self {
            executor: ProcessExecutor::new(),
        }
    }

    pub fn run(&self, mut command: Command, state: &mut ShellState) -> Result<Launch, ProcessError> {
        if state.foreground_only() && command.background {
            log::debug!("foreground-only mode, ignoring '&' for {:?}", command.argv);
            command.background = false;
        }

        let child = self.executor.spawn(&command)?;

        if command.background {
            println!("background pid is {}", child.pid);
            return Ok(Launch::Background(child));
        }

        state.signals().track_foreground(child.pid);
        let outcome = wait::wait_for(child.pid);
        state.signals().clear_foreground();
        let outcome = outcome?;

        // A plain `exit 1` is echoed straight away and deliberately not remembered
        // as the last status.
        if outcome == ExitOutcome::Exited(1) {
            println!("{}", outcome);
        } else {
            state.record_foreground(outcome);
        }

        Ok(Launch::Foreground(outcome))
    }

    /// Report and reap every child that has already terminated, without blocking.
    pub fn reap_sweep(&self) -> Result<usize, ProcessError> {
        let mut reaped = 0;
        while let Some((pid, outcome)) = wait::try_reap_any()? {
            log::debug!("reaped pid {}: {:?}", pid, outcome);
            println!("background pid {} is done: {}", pid, outcome);
            reaped += 1;
        }
        Ok(reaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn command(argv: &[&str], background: bool) -> Command {
        Command {
            argv: argv.iter().map(|s| s.to_string()).collect(),
            background,
            input_path: None,
            output_path: None,
        }
    }

    #[test]
    fn foreground_outcome_is_recorded() {
        let manager = LifecycleManager::new();
        let mut state = ShellState::default();

        let launch = manager
            .run(command(&["sh", "-c", "exit 4"], false), &mut state)
            .unwrap();

        assert_eq!(launch, Launch::Foreground(ExitOutcome::Exited(4)));
        assert_eq!(state.last_status(), ExitOutcome::Exited(4));
        assert_eq!(state.signals().foreground_pid(), None);
    }

    #[test]
    fn exit_code_one_does_not_touch_last_status() {
        let manager = LifecycleManager::new();
        let mut state = ShellState::default();

        manager
            .run(command(&["sh", "-c", "exit 3"], false), &mut state)
            .unwrap();
        let launch = manager.run(command(&["false"], false), &mut state).unwrap();

        assert_eq!(launch, Launch::Foreground(ExitOutcome::Exited(1)));
        assert_eq!(state.last_status(), ExitOutcome::Exited(3));

        manager.run(command(&["true"], false), &mut state).unwrap();
        assert_eq!(state.last_status(), ExitOutcome::Exited(0));
    }

    #[test]
    fn signal_death_is_recorded() {
        let manager = LifecycleManager::new();
        let mut state = ShellState::default();

        manager
            .run(command(&["sh", "-c", "kill -TERM $$"], false), &mut state)
            .unwrap();

        assert_eq!(state.last_status(), ExitOutcome::Signaled(libc::SIGTERM));
    }

    #[test]
    fn background_returns_without_waiting() {
        let manager = LifecycleManager::new();
        let mut state = ShellState::default();
        state.record_foreground(ExitOutcome::Exited(7));

        let launch = manager
            .run(command(&["sleep", "0.2"], true), &mut state)
            .unwrap();

        let Launch::Background(child) = launch else {
            panic!("expected a background launch, got {:?}", launch);
        };
        assert!(child.pid > 0);
        assert_eq!(state.signals().foreground_pid(), None);
        // background children never change the last status
        assert_eq!(state.last_status(), ExitOutcome::Exited(7));
        assert_eq!(wait::wait_for(child.pid).unwrap(), ExitOutcome::Exited(0));
    }

    #[test]
    fn foreground_only_mode_forces_foreground() {
        let manager = LifecycleManager::new();
        let mut state = ShellState::default();
        state.toggle_foreground_only();

        let launch = manager
            .run(command(&["sh", "-c", "exit 5"], true), &mut state)
            .unwrap();

        assert_eq!(launch, Launch::Foreground(ExitOutcome::Exited(5)));
        assert_eq!(state.last_status(), ExitOutcome::Exited(5));
    }
}
