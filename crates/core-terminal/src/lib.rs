//! Terminal backend abstraction and crossterm implementation.
//!
//! Entering the editor screen switches to raw mode and the alternate screen,
//! enables SGR mouse reporting and bracketed paste, and sets a steady bar
//! cursor with a custom color. Restoration undoes all of that and is guarded by
//! a process-wide one-shot latch: normal exit, the panic hook, a termination
//! signal, and `Drop` may all ask for it, but the sequence is written once per
//! `enter`.
//!
//! Setup failures are reported but not fatal to the session: a terminal that
//! refuses raw mode still gets a (degraded) editor.

use std::io::{self, Stdout, Write, stdout};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor::{Hide, SetCursorStyle, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, queue,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode,
        enable_raw_mode,
    },
};
use thiserror::Error;
use tracing::{debug, warn};

pub mod signals;
pub use signals::SignalFlags;

/// Cursor color while the editor owns the screen.
pub const CURSOR_COLOR: &str = "#ffb000";

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal setup failed: {0}")]
    Setup(#[source] io::Error),
    #[error("cannot query terminal size: {0}")]
    Size(#[source] io::Error),
    #[error("terminal output failed: {0}")]
    Output(#[from] io::Error),
    #[error("cannot install signal handler: {0}")]
    Signal(#[source] io::Error),
}

/// Enable button-event mouse tracking with SGR (1006) coordinates.
#[derive(Debug, Clone, Copy)]
pub struct EnableSgrMouse;

impl crossterm::Command for EnableSgrMouse {
    fn write_ansi(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        f.write_str("\x1b[?1000h\x1b[?1002h\x1b[?1006h")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DisableSgrMouse;

impl crossterm::Command for DisableSgrMouse {
    fn write_ansi(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        f.write_str("\x1b[?1006l\x1b[?1002l\x1b[?1000l")
    }
}

/// OSC 12: set the cursor color.
#[derive(Debug, Clone, Copy)]
pub struct SetCursorColor<'a>(pub &'a str);

impl crossterm::Command for SetCursorColor<'_> {
    fn write_ansi(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "\x1b]12;{}\x07", self.0)
    }
}

/// OSC 112: reset the cursor color.
#[derive(Debug, Clone, Copy)]
pub struct ResetCursorColor;

impl crossterm::Command for ResetCursorColor {
    fn write_ansi(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        f.write_str("\x1b]112\x07")
    }
}

/// Arm-once / fire-once latch.
#[derive(Debug)]
pub struct RestoreLatch {
    armed: AtomicBool,
}

impl RestoreLatch {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
        }
    }
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
    /// True exactly once per `arm`.
    pub fn fire(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

impl Default for RestoreLatch {
    fn default() -> Self {
        Self::new()
    }
}

static LATCH: RestoreLatch = RestoreLatch::new();

/// Queue the editor-screen setup sequence (everything but raw mode).
pub fn write_enter_sequence<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(
        out,
        EnterAlternateScreen,
        EnableSgrMouse,
        EnableBracketedPaste,
        SetCursorStyle::SteadyBar,
        SetCursorColor(CURSOR_COLOR),
        Clear(ClearType::All)
    )?;
    out.flush()
}

/// Queue the restoration sequence (everything but raw mode).
pub fn write_restore_sequence<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(
        out,
        DisableBracketedPaste,
        DisableSgrMouse,
        ResetCursorColor,
        SetCursorStyle::DefaultUserShape,
        Show,
        LeaveAlternateScreen
    )?;
    out.flush()
}

/// Restore the terminal if the editor screen is active. Safe to call from
/// any exit path any number of times; only the first call after `enter` acts.
pub fn restore_terminal() {
    if !LATCH.fire() {
        return;
    }
    let mut out = stdout();
    if let Err(e) = write_restore_sequence(&mut out) {
        warn!(target: "terminal", error = %e, "restore_sequence_failed");
    }
    if let Err(e) = disable_raw_mode() {
        warn!(target: "terminal", error = %e, "disable_raw_mode_failed");
    }
    debug!(target: "terminal", "restored");
}

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<(), TerminalError>;
    fn leave(&mut self) -> Result<(), TerminalError>;
    /// `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16), TerminalError>;
    fn set_title(&mut self, title: &str) -> Result<(), TerminalError>;
    /// Sink for rendered frames.
    fn output(&mut self) -> &mut dyn Write;
}

pub struct CrosstermBackend {
    entered: bool,
    out: Stdout,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self {
            entered: false,
            out: stdout(),
        }
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<(), TerminalError> {
        if self.entered {
            return Ok(());
        }
        if let Err(e) = enable_raw_mode() {
            warn!(target: "terminal", error = %e, "raw_mode_unavailable");
        }
        LATCH.arm();
        self.entered = true;
        write_enter_sequence(&mut self.out).map_err(TerminalError::Setup)?;
        execute!(self.out, Hide).map_err(TerminalError::Setup)?;
        debug!(target: "terminal", "entered");
        Ok(())
    }

    fn leave(&mut self) -> Result<(), TerminalError> {
        if self.entered {
            restore_terminal();
            self.entered = false;
        }
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16), TerminalError> {
        crossterm::terminal::size().map_err(TerminalError::Size)
    }

    fn set_title(&mut self, title: &str) -> Result<(), TerminalError> {
        execute!(self.out, SetTitle(title))?;
        Ok(())
    }

    fn output(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// In-memory backend for driving the event loop without a terminal.
#[derive(Debug)]
pub struct HeadlessBackend {
    pub out: Vec<u8>,
    pub cols: u16,
    pub rows: u16,
    pub entered: bool,
    pub title: Option<String>,
}

impl HeadlessBackend {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            out: Vec::new(),
            cols,
            rows,
            entered: false,
            title: None,
        }
    }
}

impl TerminalBackend for HeadlessBackend {
    fn enter(&mut self) -> Result<(), TerminalError> {
        self.entered = true;
        write_enter_sequence(&mut self.out)?;
        Ok(())
    }
    fn leave(&mut self) -> Result<(), TerminalError> {
        if self.entered {
            write_restore_sequence(&mut self.out)?;
            self.entered = false;
        }
        Ok(())
    }
    fn size(&self) -> Result<(u16, u16), TerminalError> {
        Ok((self.cols, self.rows))
    }
    fn set_title(&mut self, title: &str) -> Result<(), TerminalError> {
        self.title = Some(title.to_string());
        Ok(())
    }
    fn output(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}
