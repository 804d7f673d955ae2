//! System clipboard bridge over `arboard`.
//!
//! Construction never fails: a missing clipboard provider (no display server,
//! unsupported platform) is remembered and reported on each call, and the
//! dispatcher falls back to its in-session copy.

use core_state::{Clipboard, ClipboardError};
use tracing::debug;

pub struct SystemClipboard {
    inner: Result<arboard::Clipboard, String>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = arboard::Clipboard::new().map_err(|e| {
            debug!(target: "clipboard", error = %e, "system_clipboard_unavailable");
            e.to_string()
        });
        Self { inner }
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        self.inner
            .as_mut()
            .map_err(|reason| ClipboardError::Unavailable(reason.clone()))
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text)
            .map_err(|e| ClipboardError::Failed {
                op: "copy",
                reason: e.to_string(),
            })
    }

    fn paste(&mut self) -> Result<Option<String>, ClipboardError> {
        match self.handle()?.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(ClipboardError::Failed {
                op: "paste",
                reason: e.to_string(),
            }),
        }
    }
}
