//! Signal handling for the interpreter.
//!
//! Handler bodies only touch atomics (and, for terminate, `kill`/`_exit`), so everything
//! here is async-signal-safe. Interrupts and mode toggles are counted and turned into
//! [`SignalEvent`]s that the read-eval loop drains at its next safe point.
use std::io;
use std::mem::MaybeUninit;
use std::sync::{
    atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering},
    Arc,
};

use signal_hook::consts::{SIGINT, SIGTERM, SIGTSTP};
use signal_hook::low_level;
use signal_hook::SigId;

use super::{cerr, ProcessError, ProcessId};

/// Signals the read-eval loop reacts to at its next safe point.
///
/// Terminate never shows up here: its handler finishes the interpreter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Interrupt,
    ToggleMode,
}

impl SignalEvent {
    pub fn number(self) -> libc::c_int {
        match self {
            SignalEvent::Interrupt => SIGINT,
            SignalEvent::ToggleMode => SIGTSTP,
        }
    }
}

/// The part of the interpreter state that crosses the asynchronous boundary.
///
/// Every field is written from a signal handler or read by one.
#[derive(Debug, Default)]
pub struct SignalState {
    interrupts: AtomicUsize,
    toggles: AtomicUsize,
    terminating: AtomicBool,
    /// `0` when no foreground child is running.
    foreground_pid: AtomicI32,
}

impl SignalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that `event` arrived. Only counts; safe inside a handler.
    pub fn record(&self, event: SignalEvent) {
        match event {
            SignalEvent::Interrupt => {
                self.interrupts.fetch_add(1, Ordering::SeqCst);
            }
            SignalEvent::ToggleMode => {
                self.toggles.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Drain the counted interrupts and toggles, in that order.
    pub fn take_pending(&self) -> Vec<SignalEvent> {
        let interrupts = self.interrupts.swap(0, Ordering::SeqCst);
        let toggles = self.toggles.swap(0, Ordering::SeqCst);

        let mut events = Vec::with_capacity(interrupts + toggles);
        events.extend(std::iter::repeat(SignalEvent::Interrupt).take(interrupts));
        events.extend(std::iter::repeat(SignalEvent::ToggleMode).take(toggles));
        events
    }

    /// Returns `true` exactly once: for the first caller.
    pub fn begin_termination(&self) -> bool {
        !self.terminating.swap(true, Ordering::SeqCst)
    }

    pub fn track_foreground(&self, pid: ProcessId) {
        self.foreground_pid.store(pid, Ordering::SeqCst);
    }

    pub fn clear_foreground(&self) {
        self.foreground_pid.store(0, Ordering::SeqCst);
    }

    pub fn foreground_pid(&self) -> Option<ProcessId> {
        match self.foreground_pid.load(Ordering::SeqCst) {
            0 => None,
            pid => Some(pid),
        }
    }
}

/// Owns the installed handlers. Dropping it unregisters them.
pub struct SignalSubsystem {
    state: Arc<SignalState>,
    sig_ids: Vec<SigId>,
}

impl SignalSubsystem {
    /// Install the interrupt, mode-toggle and terminate handlers.
    pub fn install() -> Result<Self, ProcessError> {
        let state = Arc::new(SignalState::new());
        let mut sig_ids = Vec::with_capacity(3);

        for event in [SignalEvent::Interrupt, SignalEvent::ToggleMode] {
            let state = Arc::clone(&state);
            // SAFETY: the action only performs a lock-free atomic increment.
            let id = unsafe { low_level::register(event.number(), move || state.record(event)) }
                .map_err(|e| ProcessError::SignalError(e.to_string()))?;
            sig_ids.push(id);
        }

        let term_state = Arc::clone(&state);
        // SAFETY: `swap` on an atomic, `kill`, `emulate_default_handler` and `exit` are all
        // async-signal-safe, and nothing here allocates or panics.
        let id = unsafe {
            low_level::register(SIGTERM, move || {
                if term_state.begin_termination() {
                    broadcast_terminate();
                    let _ = low_level::emulate_default_handler(SIGTERM);
                    low_level::exit(128 + SIGTERM);
                }
            })
        }
        .map_err(|e| ProcessError::SignalError(e.to_string()))?;
        sig_ids.push(id);

        log::debug!("signal handlers installed for SIGINT, SIGTSTP, SIGTERM");
        Ok(Self { state, sig_ids })
    }

    pub fn state(&self) -> &Arc<SignalState> {
        &self.state
    }

    /// Deliver the mode-toggle signal to the interpreter itself.
    pub fn raise_toggle() -> std::io::Result<()> {
        low_level::raise(SIGTSTP)
    }
}

impl Drop for SignalSubsystem {
    fn drop(&mut self) {
        for id in self.sig_ids.drain(..) {
            low_level::unregister(id);
        }
    }
}

/// Send the terminate signal to every process in our own process group.
fn broadcast_terminate() {
    // SAFETY: `kill` is async-signal-safe and cannot cause UB for any argument.
    unsafe {
        libc::kill(0, SIGTERM);
    }
}

/// SIGTERM held back for as long as this value lives.
///
/// Spans `fork`: the child only lets SIGTERM through again once its dispositions are
/// reset, so it can never run the interpreter's broadcast handler.
pub(crate) struct TerminateBlock {
    previous: libc::sigset_t,
}

impl TerminateBlock {
    pub(crate) fn new() -> io::Result<Self> {
        let mut set = MaybeUninit::<libc::sigset_t>::zeroed();
        let mut previous = MaybeUninit::<libc::sigset_t>::zeroed();

        cerr(unsafe { libc::sigemptyset(set.as_mut_ptr()) })?;
        cerr(unsafe { libc::sigaddset(set.as_mut_ptr(), SIGTERM) })?;
        cerr(unsafe { libc::sigprocmask(libc::SIG_BLOCK, set.as_ptr(), previous.as_mut_ptr()) })?;

        Ok(Self {
            previous: unsafe { previous.assume_init() },
        })
    }

    /// Reinstate the mask from before the block. Only calls `sigprocmask(2)`.
    pub(crate) fn restore(&self) {
        unsafe {
            libc::sigprocmask(libc::SIG_SETMASK, &self.previous, std::ptr::null_mut());
        }
    }
}

impl Drop for TerminateBlock {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Signal dispositions for a freshly forked child, applied before exec.
///
/// Only calls `signal(2)`, so it is safe between `fork` and `exec`.
pub(crate) fn reset_for_child() {
    unsafe {
        libc::signal(SIGINT, libc::SIG_DFL);
        libc::signal(SIGTERM, libc::SIG_DFL);
        libc::signal(SIGTSTP, libc::SIG_IGN);
    }
}
