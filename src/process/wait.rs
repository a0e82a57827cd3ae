use std::fmt;
use std::io;

use libc::{c_int, WEXITSTATUS, WIFEXITED, WIFSIGNALED, WNOHANG, WTERMSIG};

use super::{cerr, ProcessError, ProcessId};

/// The normalized result of a terminated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited(u8),
    Signaled(i32),
}

impl Default for ExitOutcome {
    fn default() -> Self {
        ExitOutcome::Exited(0)
    }
}

impl ExitOutcome {
    /// Decode a raw `waitpid` status. Returns `None` for stop/continue
    /// notifications, which are not terminations.
    pub fn from_raw(status: c_int) -> Option<Self> {
        if WIFEXITED(status) {
            Some(ExitOutcome::Exited(WEXITSTATUS(status) as u8))
        } else if WIFSIGNALED(status) {
            Some(ExitOutcome::Signaled(WTERMSIG(status)))
        } else {
            None
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Exited(code) => write!(f, "exit value {}", code),
            ExitOutcome::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

fn waitpid(pid: ProcessId, flags: c_int) -> io::Result<(ProcessId, c_int)> {
    let mut status: c_int = 0;
    let pid = cerr(unsafe { libc::waitpid(pid, &mut status, flags) })?;
    Ok((pid, status))
}

/// Block until `pid` terminates.
pub fn wait_for(pid: ProcessId) -> Result<ExitOutcome, ProcessError> {
    loop {
        match waitpid(pid, 0) {
            Ok((_, status)) => {
                if let Some(outcome) = ExitOutcome::from_raw(status) {
                    return Ok(outcome);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ProcessError::WaitFailed(e)),
        }
    }
}

/// Reap one terminated child, if any, without blocking.
pub fn try_reap_any() -> Result<Option<(ProcessId, ExitOutcome)>, ProcessError> {
    loop {
        match waitpid(-1, WNOHANG) {
            Ok((0, _)) => return Ok(None),
            Ok((pid, status)) => match ExitOutcome::from_raw(status) {
                Some(outcome) => return Ok(Some((pid, outcome))),
                None => continue,
            },
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.raw_os_error() == Some(libc::ECHILD) => return Ok(None),
            Err(e) => return Err(ProcessError::WaitFailed(e)),
        }
    }
}
