use std::fmt;

pub mod executor;
pub mod lifecycle;
pub mod signal;
pub mod wait;

pub use executor::{ChildHandle, ProcessExecutor};
pub use lifecycle::{Launch, LifecycleManager};
pub use signal::{SignalEvent, SignalSubsystem};
pub use wait::ExitOutcome;

pub type ProcessId = libc::pid_t;

#[derive(Debug)]
pub enum ProcessError {
    ForkFailed(std::io::Error),
    WaitFailed(std::io::Error),
    Usage(String),
    InvalidArgument(String),
    SignalError(String),
}

impl ProcessError {
    /// Whether the interpreter can keep going after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProcessError::ForkFailed(_) | ProcessError::SignalError(_)
        )
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::ForkFailed(e) => write!(f, "fork: {}", e),
            ProcessError::WaitFailed(e) => write!(f, "wait: {}", e),
            ProcessError::Usage(msg) => write!(f, "syntax error: {}", msg),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "invalid argument (contains NUL byte): {:?}", arg)
            }
            ProcessError::SignalError(msg) => write!(f, "signal setup: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

/// Turns the `-1` convention of libc calls into an `io::Result`.
pub(crate) fn cerr<Int: Copy + TryInto<libc::c_long>>(res: Int) -> std::io::Result<Int> {
    match res.try_into() {
        Ok(-1) => Err(std::io::Error::last_os_error()),
        _ => Ok(res),
    }
}

/// Process id of the interpreter itself.
pub fn getpid() -> ProcessId {
    unsafe { libc::getpid() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cerr_maps_minus_one_to_os_error() {
        assert!(cerr(-1 as libc::c_int).is_err());
        assert_eq!(cerr(0 as libc::c_int).ok(), Some(0));
        assert_eq!(cerr(42 as libc::pid_t).ok(), Some(42));
    }

    #[test]
    fn only_creation_and_signal_failures_are_fatal() {
        let fork = ProcessError::ForkFailed(std::io::Error::from_raw_os_error(libc::EAGAIN));
        assert!(fork.is_fatal());
        assert!(ProcessError::SignalError("x".into()).is_fatal());
        assert!(!ProcessError::Usage("missing path after '<'".into()).is_fatal());
        assert!(!ProcessError::InvalidArgument("a\0b".into()).is_fatal());
    }

    #[test]
    fn getpid_matches_std() {
        assert_eq!(getpid() as u32, std::process::id());
    }
}
