//! Clipboard collaborator contract.
//!
//! Both calls are fallible and synchronous. The binary provides a system
//! clipboard bridge; tests and headless sessions use [`MemoryClipboard`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard {op} failed: {reason}")]
    Failed { op: &'static str, reason: String },
}

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
    /// `Ok(None)` when the clipboard holds no text.
    fn paste(&mut self) -> Result<Option<String>, ClipboardError>;
}

/// Process-local clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn paste(&mut self) -> Result<Option<String>, ClipboardError> {
        Ok(self.contents.clone())
    }
}

/// Always fails; exercises the in-session fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn copy(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no clipboard provider".into()))
    }

    fn paste(&mut self) -> Result<Option<String>, ClipboardError> {
        Err(ClipboardError::Unavailable("no clipboard provider".into()))
    }
}
