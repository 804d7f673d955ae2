//! Signal flags polled by the event loop.
//!
//! Handlers only store into atomics; all real work (restoring the terminal,
//! re-laying out after a resize) happens on the loop thread. SIGTSTP is caught
//! and ignored so a stray Ctrl-Z cannot leave the terminal in raw mode behind
//! a stopped process.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM, SIGTSTP, SIGWINCH};
use signal_hook::flag;
use tracing::debug;

use crate::TerminalError;

pub const TERMINATION_SIGNALS: [i32; 4] = [SIGINT, SIGTERM, SIGQUIT, SIGHUP];

#[derive(Debug, Clone, Default)]
pub struct SignalFlags {
    terminate: Arc<AtomicUsize>,
    resize: Arc<AtomicBool>,
}

impl SignalFlags {
    /// Flags with no handlers installed; tests raise them by hand.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn install() -> Result<Self, TerminalError> {
        let flags = Self::default();
        for sig in TERMINATION_SIGNALS {
            flag::register_usize(sig, Arc::clone(&flags.terminate), sig as usize)
                .map_err(TerminalError::Signal)?;
        }
        flag::register(SIGWINCH, Arc::clone(&flags.resize)).map_err(TerminalError::Signal)?;
        // Nothing reads this flag; registering a handler replaces the stop.
        flag::register(SIGTSTP, Arc::new(AtomicBool::new(false)))
            .map_err(TerminalError::Signal)?;
        debug!(target: "terminal.signals", "installed");
        Ok(flags)
    }

    /// Termination signal received, if any.
    pub fn terminated(&self) -> Option<i32> {
        match self.terminate.load(Ordering::SeqCst) {
            0 => None,
            sig => Some(sig as i32),
        }
    }

    /// Consume a pending resize notification.
    pub fn take_resize(&self) -> bool {
        self.resize.swap(false, Ordering::SeqCst)
    }

    pub fn raise_terminate(&self, sig: i32) {
        self.terminate.store(sig as usize, Ordering::SeqCst);
    }

    pub fn raise_resize(&self) {
        self.resize.store(true, Ordering::SeqCst);
    }
}

/// Run the default disposition for `sig` (used after the terminal has been
/// restored so the exit status reflects the signal).
pub fn reraise(sig: i32) -> io::Result<()> {
    signal_hook::low_level::emulate_default_handler(sig)
}
