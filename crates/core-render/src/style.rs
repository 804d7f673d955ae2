//! Cell flags to terminal attributes.
//!
//! Every style change starts from a reset, so a run's appearance depends only
//! on its own flags and never on the run before it.

use std::io::Write;

use crossterm::{
    queue,
    style::{Attribute, Color, SetAttribute, SetBackgroundColor, SetForegroundColor},
};

use crate::CellFlags;

pub fn apply_flags<W: Write>(out: &mut W, flags: CellFlags) -> std::io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    if flags.contains(CellFlags::REVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if flags.contains(CellFlags::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if flags.contains(CellFlags::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    // The current match wins over an ordinary match highlight.
    if flags.contains(CellFlags::CURRENT_MATCH) {
        queue!(out, SetBackgroundColor(Color::Yellow), SetForegroundColor(Color::Black))?;
    } else if flags.contains(CellFlags::MATCH) {
        queue!(out, SetBackgroundColor(Color::DarkYellow), SetForegroundColor(Color::Black))?;
    }
    if flags.contains(CellFlags::ERROR) {
        queue!(out, SetForegroundColor(Color::Red))?;
    } else if flags.contains(CellFlags::WARNING) {
        queue!(out, SetForegroundColor(Color::Yellow))?;
    }
    Ok(())
}
