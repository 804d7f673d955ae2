//! Byte sources for the decoder.
//!
//! `poll_byte` never blocks: it returns `Ok(None)` when no byte is available
//! right now. The event loop drains until `None` and then idles.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Read};
use std::os::fd::AsFd;

use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no terminal available for keyboard input")]
    NoTerminal(#[source] io::Error),
    #[error("terminal read failed")]
    Read(#[from] io::Error),
}

pub trait ByteSource {
    fn poll_byte(&mut self) -> Result<Option<u8>, InputError>;
}

/// The controlling terminal, polled with a zero timeout.
pub struct TtySource {
    file: File,
}

impl TtySource {
    /// Use stdin when it is a terminal; otherwise (document piped on stdin)
    /// open `/dev/tty` for keyboard input.
    pub fn open() -> Result<Self, InputError> {
        let stdin = io::stdin();
        let file = if stdin.is_terminal() {
            let fd = stdin
                .as_fd()
                .try_clone_to_owned()
                .map_err(InputError::NoTerminal)?;
            File::from(fd)
        } else {
            debug!(target: "input.source", "stdin_not_tty_using_dev_tty");
            OpenOptions::new()
                .read(true)
                .open("/dev/tty")
                .map_err(InputError::NoTerminal)?
        };
        Ok(Self { file })
    }
}

impl ByteSource for TtySource {
    fn poll_byte(&mut self) -> Result<Option<u8>, InputError> {
        let ready = {
            let mut fds = [PollFd::new(self.file.as_fd(), PollFlags::POLLIN)];
            match poll(&mut fds, PollTimeout::ZERO) {
                Ok(0) => false,
                Ok(_) => fds[0]
                    .revents()
                    .is_some_and(|r| r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP)),
                Err(nix::errno::Errno::EINTR) => false,
                Err(e) => return Err(InputError::Read(io::Error::from(e))),
            }
        };
        if !ready {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.file.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => {
                Ok(None)
            }
            Err(e) => Err(InputError::Read(e)),
        }
    }
}

/// Pre-recorded bytes; used by tests and by replaying captured input.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSource {
    bytes: VecDeque<u8>,
}

impl ScriptedSource {
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            bytes: bytes.as_ref().iter().copied().collect(),
        }
    }

    /// Append more bytes, as if they arrived later.
    pub fn feed(&mut self, bytes: impl AsRef<[u8]>) {
        self.bytes.extend(bytes.as_ref());
    }
}

impl ByteSource for ScriptedSource {
    fn poll_byte(&mut self) -> Result<Option<u8>, InputError> {
        Ok(self.bytes.pop_front())
    }
}
