//! Terminal command log.
//!
//! Render paths push commands here instead of writing to stdout directly, so a
//! frame is emitted in one flush and tests can inspect exactly what a redraw
//! would send.
//!
//! Invariants:
//! * Commands keep their order; nothing is written before `flush_to`.
//! * Positions are absolute, (0,0) origin.
//! * Consecutive prints with the same flags are merged into one command.

use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

use crate::CellFlags;
use crate::style::apply_flags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ClearAll,
    MoveTo(u16, u16),
    /// Clear from the current position to the end of the line.
    ClearToEol,
    Print(String, CellFlags),
    ShowCursor,
    HideCursor,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
    pub print_commands: u64,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_to_eol(&mut self) {
        self.cmds.push(Command::ClearToEol);
    }
    pub fn print<S: Into<String>>(&mut self, s: S, flags: CellFlags) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        if let Some(Command::Print(prev, f)) = self.cmds.last_mut()
            && *f == flags
        {
            prev.push_str(&s);
            return;
        }
        self.print_commands += 1;
        self.cmds.push(Command::Print(s, flags));
    }
    pub fn show_cursor(&mut self) {
        self.cmds.push(Command::ShowCursor);
    }
    pub fn hide_cursor(&mut self) {
        self.cmds.push(Command::HideCursor);
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Queue every command on `out` and flush once. The log is drained.
    pub fn flush_to<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let mut current = CellFlags::empty();
        for cmd in self.cmds.drain(..) {
            match cmd {
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearToEol => {
                    if !current.is_empty() {
                        apply_flags(out, CellFlags::empty())?;
                        current = CellFlags::empty();
                    }
                    queue!(out, Clear(ClearType::UntilNewLine))?
                }
                Command::Print(s, flags) => {
                    if flags != current {
                        apply_flags(out, flags)?;
                        current = flags;
                    }
                    queue!(out, Print(s))?
                }
                Command::ShowCursor => queue!(out, Show)?,
                Command::HideCursor => queue!(out, Hide)?,
            }
        }
        if !current.is_empty() {
            apply_flags(out, CellFlags::empty())?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_style_prints_merge() {
        let mut w = Writer::new();
        w.move_to(0, 0);
        w.print("ab", CellFlags::empty());
        w.print("c", CellFlags::empty());
        w.print("d", CellFlags::SELECTION);
        w.print("", CellFlags::BOLD);
        assert_eq!(
            w.commands(),
            &[
                Command::MoveTo(0, 0),
                Command::Print("abc".into(), CellFlags::empty()),
                Command::Print("d".into(), CellFlags::SELECTION),
            ]
        );
        assert_eq!(w.print_commands, 2);
    }

    #[test]
    fn flush_writes_text_and_drains() {
        let mut w = Writer::new();
        w.move_to(2, 3);
        w.print("hi", CellFlags::empty());
        w.print("!", CellFlags::REVERSE);
        let mut out: Vec<u8> = Vec::new();
        w.flush_to(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("\x1b[4;3H"), "{s:?}");
        assert!(s.contains("hi"));
        assert!(s.contains("\x1b[7m"), "{s:?}");
        assert!(w.is_empty());
    }
}
