//! Signal listener that forwards INT/TERM/HUP to the supervised child.
//!
//! The listener is installed before the child is spawned so a signal
//! landing in the spawn window cannot kill the coordinator with the
//! default disposition and skip teardown. A signal received before the
//! child pid is registered is held and delivered on registration.
//!
//! The listener thread never runs teardown itself; it records the signal
//! and forwards it, and the waiting thread runs the one teardown pass
//! after the child is reaped. Repeated signals are forwarded again but
//! can never re-trigger teardown.

use crate::error::{GuardError, Result};
use crate::logging::log_line;
use crate::process::send_signal;
use nix::sys::signal::Signal;
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Forwarding target plus any signal that arrived before it existed.
#[derive(Debug, Default)]
struct ForwardState {
    child_pid: Option<u32>,
    pending: Option<i32>,
}

/// Forwards interrupting signals to the registered child while installed.
///
/// Dropping the forwarder closes the signal stream and joins the listener
/// thread, restoring default dispositions.
pub struct SignalForwarder {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
    state: Arc<Mutex<ForwardState>>,
    last_signal: Arc<AtomicI32>,
}

impl SignalForwarder {
    /// Install handlers for INT, TERM, and HUP. Signals are recorded from
    /// this point on; forwarding starts once `set_child` registers a pid.
    pub fn install() -> Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP]).map_err(|e| {
            GuardError::Runtime(format!("failed to register signal handlers: {}", e))
        })?;
        let handle = signals.handle();
        let state = Arc::new(Mutex::new(ForwardState::default()));
        let last_signal = Arc::new(AtomicI32::new(0));

        let thread_state = Arc::clone(&state);
        let seen = Arc::clone(&last_signal);
        let thread = std::thread::spawn(move || {
            for sig in signals.forever() {
                seen.store(sig, Ordering::SeqCst);
                let mut state = thread_state.lock().unwrap_or_else(|p| p.into_inner());
                match state.child_pid {
                    Some(pid) => forward(sig, pid),
                    None => {
                        log_line(
                            "cleanup",
                            &format!("received signal {} before the command started", sig),
                        );
                        state.pending = Some(sig);
                    }
                }
            }
        });

        Ok(Self {
            handle,
            thread: Some(thread),
            state,
            last_signal,
        })
    }

    /// Register the spawned child as the forwarding target, delivering a
    /// signal that arrived while the child was being spawned.
    pub fn set_child(&self, child_pid: u32) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.child_pid = Some(child_pid);
        if let Some(sig) = state.pending.take() {
            forward(sig, child_pid);
        }
    }

    /// The most recently received signal number, if any arrived.
    pub fn last_signal(&self) -> Option<i32> {
        match self.last_signal.load(Ordering::SeqCst) {
            0 => None,
            sig => Some(sig),
        }
    }
}

/// Forward one signal, tolerating a child that is already gone.
fn forward(sig: i32, child_pid: u32) {
    log_line(
        "cleanup",
        &format!("received signal {}, forwarding to pid {}", sig, child_pid),
    );
    if let Ok(signal) = Signal::try_from(sig) {
        let _ = send_signal(child_pid, signal);
    }
}

impl Drop for SignalForwarder {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
