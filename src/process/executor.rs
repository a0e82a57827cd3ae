use std::ffi::{CStr, CString};
use std::io::{self, Write};

use libc::{c_char, c_int};

use super::{cerr, signal, ProcessError, ProcessId};
use crate::shell::Command;

/// Child exit status when a redirection target cannot be opened.
pub const EXIT_REDIRECT_FAILED: c_int = 2;
/// Child exit status when the program was found but could not be executed.
pub const EXIT_CANNOT_EXECUTE: c_int = 126;
/// Child exit status when the program was not found on the search path.
pub const EXIT_NOT_FOUND: c_int = 127;

/// A freshly created child, valid until it is waited for or reaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildHandle {
    pub pid: ProcessId,
}

enum ForkResult {
    Parent(ProcessId),
    Child,
}

fn fork() -> io::Result<ForkResult> {
    let pid = cerr(unsafe { libc::fork() })?;
    if pid == 0 {
        Ok(ForkResult::Child)
    } else {
        Ok(ForkResult::Parent(pid))
    }
}

fn to_cstring(value: &str) -> Result<CString, ProcessError> {
    CString::new(value).map_err(|_| ProcessError::InvalidArgument(value.to_owned()))
}

/// Everything the child needs, built before `fork` so that the child only makes
/// async-signal-safe calls until `execvp` replaces it.
struct ExecPlan {
    argv: Vec<CString>,
    /// NULL-terminated pointers into `argv`; the heap buffers of `argv` never move.
    argv_ptrs: Vec<*const c_char>,
    input: Option<CString>,
    output: Option<CString>,
    input_failed: Vec<u8>,
    output_failed: Vec<u8>,
    not_found: Vec<u8>,
    cannot_execute: Vec<u8>,
}

impl ExecPlan {
    fn new(command: &Command) -> Result<Self, ProcessError> {
        let argv = command
            .argv
            .iter()
            .map(|arg| to_cstring(arg))
            .collect::<Result<Vec<_>, _>>()?;
        if argv.is_empty() {
            return Err(ProcessError::Usage("missing command".to_string()));
        }

        let mut argv_ptrs: Vec<*const c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(std::ptr::null());

        let program = &command.argv[0];
        let input_path = command.input_path.as_deref().unwrap_or_default();
        let output_path = command.output_path.as_deref().unwrap_or_default();

        Ok(Self {
            argv,
            argv_ptrs,
            input: command.input_path.as_deref().map(to_cstring).transpose()?,
            output: command.output_path.as_deref().map(to_cstring).transpose()?,
            input_failed: format!("smallsh: cannot open {} for input\n", input_path).into_bytes(),
            output_failed: format!("smallsh: cannot open {} for output\n", output_path)
                .into_bytes(),
            not_found: format!("smallsh: {}: command not found\n", program).into_bytes(),
            cannot_execute: format!("smallsh: {}: cannot execute\n", program).into_bytes(),
        })
    }

    /// Runs in the child. Never returns.
    fn exec(&self, blocked: &signal::TerminateBlock) -> ! {
        signal::reset_for_child();
        blocked.restore();

        if let Some(path) = &self.input {
            if redirect(path, libc::O_RDONLY, libc::STDIN_FILENO).is_err() {
                fail(&self.input_failed, EXIT_REDIRECT_FAILED);
            }
        }

        if let Some(path) = &self.output {
            let flags = libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC;
            if redirect(path, flags, libc::STDOUT_FILENO).is_err() {
                fail(&self.output_failed, EXIT_REDIRECT_FAILED);
            }
        }

        // SAFETY: `argv_ptrs` is a NULL-terminated array of pointers into `self.argv`,
        // which outlives the call.
        unsafe {
            libc::execvp(self.argv_ptrs[0], self.argv_ptrs.as_ptr());
        }

        match io::Error::last_os_error().raw_os_error() {
            Some(libc::ENOENT) | Some(libc::ENOTDIR) => fail(&self.not_found, EXIT_NOT_FOUND),
            _ => fail(&self.cannot_execute, EXIT_CANNOT_EXECUTE),
        }
    }
}

/// Open `path` and make it the descriptor `target`.
fn redirect(path: &CStr, flags: c_int, target: c_int) -> io::Result<()> {
    let fd = cerr(unsafe { libc::open(path.as_ptr(), flags, 0o666 as libc::c_uint) })?;
    if fd == target {
        return Ok(());
    }
    let result = cerr(unsafe { libc::dup2(fd, target) });
    unsafe {
        libc::close(fd);
    }
    result.map(|_| ())
}

fn fail(message: &[u8], status: c_int) -> ! {
    unsafe {
        libc::write(libc::STDERR_FILENO, message.as_ptr().cast(), message.len());
        libc::_exit(status)
    }
}

/// Creates child processes for external commands.
#[derive(Clone, Debug, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Fork a child that applies the redirections of `command` and execs it.
    ///
    /// Only process-creation failures are returned as errors; anything that goes wrong
    /// inside the child becomes its exit status.
    pub fn spawn(&self, command: &Command) -> Result<ChildHandle, ProcessError> {
        let plan = ExecPlan::new(command)?;

        // Unflushed output would otherwise be written twice.
        io::stdout().flush().ok();
        io::stderr().flush().ok();

        let blocked = signal::TerminateBlock::new()
            .map_err(|e| ProcessError::SignalError(e.to_string()))?;

        match fork().map_err(ProcessError::ForkFailed)? {
            ForkResult::Parent(pid) => {
                drop(blocked);
                log::debug!(
                    "spawned pid {} for {:?} (background: {})",
                    pid,
                    command.argv,
                    command.background
                );
                Ok(ChildHandle { pid })
            }
            ForkResult::Child => plan.exec(&blocked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::wait::wait_for;
    use crate::process::ExitOutcome;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn command(argv: &[&str]) -> Command {
        Command {
            argv: argv.iter().map(|s| s.to_string()).collect(),
            background: false,
            input_path: None,
            output_path: None,
        }
    }

    fn run(command: &Command) -> ExitOutcome {
        let child = ProcessExecutor::new().spawn(command).unwrap();
        wait_for(child.pid).unwrap()
    }

    #[test]
    fn runs_program_from_search_path() {
        assert_eq!(run(&command(&["true"])), ExitOutcome::Exited(0));
        assert_eq!(run(&command(&["sh", "-c", "exit 3"])), ExitOutcome::Exited(3));
    }

    #[test]
    fn missing_program_exits_127() {
        let outcome = run(&command(&["smallsh-test-no-such-program"]));
        assert_eq!(outcome, ExitOutcome::Exited(EXIT_NOT_FOUND as u8));
    }

    #[test]
    fn non_executable_file_exits_126() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("not-executable");
        fs::write(&script, "#!/bin/sh\n").unwrap();

        let outcome = run(&command(&[script.to_str().unwrap()]));
        assert_eq!(outcome, ExitOutcome::Exited(EXIT_CANNOT_EXECUTE as u8));
    }

    #[test]
    fn output_redirection_creates_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        fs::write(&out, "stale contents that are longer than the new ones\n").unwrap();

        let mut cmd = command(&["echo", "fresh"]);
        cmd.output_path = Some(out.to_str().unwrap().to_string());

        assert_eq!(run(&cmd), ExitOutcome::Exited(0));
        assert_eq!(fs::read_to_string(&out).unwrap(), "fresh\n");
    }

    #[test]
    fn input_and_output_redirection_together() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "one\ntwo\nthree\n").unwrap();

        let mut cmd = command(&["wc", "-l"]);
        cmd.input_path = Some(input.to_str().unwrap().to_string());
        cmd.output_path = Some(output.to_str().unwrap().to_string());

        assert_eq!(run(&cmd), ExitOutcome::Exited(0));
        assert_eq!(fs::read_to_string(&output).unwrap().trim(), "3");
    }

    #[test]
    fn unopenable_input_fails_the_child_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut cmd = command(&["cat"]);
        cmd.input_path = Some(dir.path().join("missing").to_str().unwrap().to_string());

        assert_eq!(run(&cmd), ExitOutcome::Exited(EXIT_REDIRECT_FAILED as u8));
    }

    #[test]
    fn unopenable_output_fails_the_child_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut cmd = command(&["echo", "hi"]);
        cmd.output_path = Some(
            dir.path()
                .join("no-such-dir")
                .join("out")
                .to_str()
                .unwrap()
                .to_string(),
        );

        assert_eq!(run(&cmd), ExitOutcome::Exited(EXIT_REDIRECT_FAILED as u8));
    }

    #[test]
    fn child_runs_with_terminate_unblocked() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("status");
        let mut cmd = command(&["cat", "/proc/self/status"]);
        cmd.output_path = Some(report.to_str().unwrap().to_string());

        assert_eq!(run(&cmd), ExitOutcome::Exited(0));

        let blocked = fs::read_to_string(&report)
            .unwrap()
            .lines()
            .find_map(|line| line.strip_prefix("SigBlk:"))
            .map(|mask| u64::from_str_radix(mask.trim(), 16).unwrap())
            .unwrap();
        assert_eq!(blocked & (1u64 << (libc::SIGTERM - 1)), 0);
    }

    #[test]
    fn nul_byte_is_rejected_before_fork() {
        let result = ProcessExecutor::new().spawn(&command(&["echo", "a\0b"]));
        assert!(matches!(result, Err(ProcessError::InvalidArgument(_))));
    }

    #[test]
    fn empty_argv_is_a_usage_error() {
        let result = ProcessExecutor::new().spawn(&command(&[]));
        assert!(matches!(result, Err(ProcessError::Usage(_))));
    }
}
