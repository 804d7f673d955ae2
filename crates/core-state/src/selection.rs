//! Selection model and the click/drag state machine.
//!
//! A `Selection` stores its two ends in raw anchor order: `start` is the fixed
//! (anchor) side and `end` follows the pointer or cursor. Rendering and deletion
//! always go through [`normalize`] which returns the document-ordered pair.
//!
//! `SelectionMode` decides how the live end is recomputed on every update:
//! * `Character(anchor)`: raw positions.
//! * `Word { line, start, end }`: both ends snap outward to word boundaries
//!   computed with the shared three-way classifier.
//! * `Line(anchor_line)`: both ends snap to whole lines.
//! * `None`: a programmatic selection (select-all, find match) with no drag
//!   semantics attached.

use core_text::motion::word_range_at;
use core_text::{Buffer, Position, ordered};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    None,
    Character(Position),
    Word { line: usize, start: usize, end: usize },
    Line(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
    pub mode: SelectionMode,
}

/// Document-ordered `(start, end)` of two positions.
pub fn normalize(a: Position, b: Position) -> (Position, Position) {
    ordered(a, b)
}

impl Selection {
    /// Character selection anchored (and currently collapsed) at `anchor`.
    pub fn anchored(anchor: Position) -> Self {
        Self {
            start: anchor,
            end: anchor,
            mode: SelectionMode::Character(anchor),
        }
    }

    /// Programmatic range without drag semantics.
    pub fn range(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            mode: SelectionMode::None,
        }
    }

    pub fn normalized(&self) -> (Position, Position) {
        normalize(self.start, self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open test per line. Interior lines are wholly selected; the first line
    /// from the start column onward and the last line up to (excluding) the end column.
    pub fn contains(&self, line: usize, column: usize) -> bool {
        let (s, e) = self.normalized();
        if line < s.line || line > e.line || s == e {
            return false;
        }
        if s.line == e.line {
            return column >= s.column && column < e.column;
        }
        if line == s.line {
            column >= s.column
        } else if line == e.line {
            column < e.column
        } else {
            true
        }
    }

    /// Start a pointer selection at `pos`; `clicks` picks the mode
    /// (1 character, 2 word, 3+ line).
    pub fn press(buf: &Buffer, pos: Position, clicks: u8) -> Self {
        let pos = buf.clamp(pos);
        let sel = match clicks {
            0 | 1 => Self::anchored(pos),
            2 => {
                let (ws, we) = word_range_at(buf.line(pos.line).unwrap_or_default(), pos.column);
                Self {
                    start: Position::new(pos.line, ws),
                    end: Position::new(pos.line, we),
                    mode: SelectionMode::Word {
                        line: pos.line,
                        start: ws,
                        end: we,
                    },
                }
            }
            _ => Self {
                start: Position::new(pos.line, 0),
                end: Position::new(pos.line, buf.line_len(pos.line)),
                mode: SelectionMode::Line(pos.line),
            },
        };
        trace!(target: "state.selection", clicks, line = pos.line, column = pos.column, "press");
        sel
    }

    /// Re-derive both ends from the anchor and the pointer position.
    pub fn drag_to(&mut self, buf: &Buffer, pos: Position) {
        let pos = buf.clamp(pos);
        match self.mode {
            SelectionMode::None => {
                self.end = pos;
            }
            SelectionMode::Character(anchor) => {
                self.start = anchor;
                self.end = pos;
            }
            SelectionMode::Word { line, start, end } => {
                let (ws, we) = word_range_at(buf.line(pos.line).unwrap_or_default(), pos.column);
                let anchor_start = Position::new(line, start);
                let anchor_end = Position::new(line, end);
                if pos < anchor_start {
                    self.start = anchor_end;
                    self.end = Position::new(pos.line, ws);
                } else {
                    self.start = anchor_start;
                    self.end = Position::new(pos.line, we);
                }
            }
            SelectionMode::Line(anchor_line) => {
                if pos.line >= anchor_line {
                    self.start = Position::new(anchor_line, 0);
                    self.end = Position::new(pos.line, buf.line_len(pos.line));
                } else {
                    self.start = Position::new(anchor_line, buf.line_len(anchor_line));
                    self.end = Position::new(pos.line, 0);
                }
            }
        }
    }

    /// End a drag. A collapsed character selection becomes a bare cursor (`None`).
    pub fn release(self) -> Option<Self> {
        if self.is_empty() && matches!(self.mode, SelectionMode::Character(_)) {
            trace!(target: "state.selection", "release_degenerate_cleared");
            return None;
        }
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(lines: &[&str]) -> Buffer {
        Buffer::new(lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn contains_is_half_open_per_line() {
        let sel = Selection::range(Position::new(2, 3), Position::new(0, 1));
        assert!(!sel.contains(0, 0));
        assert!(sel.contains(0, 1));
        assert!(sel.contains(1, 0));
        assert!(sel.contains(1, 500));
        assert!(sel.contains(2, 2));
        assert!(!sel.contains(2, 3));
        assert!(!sel.contains(3, 0));
    }

    #[test]
    fn double_click_selects_word_and_drag_extends_by_words() {
        let buf = b(&["alpha beta gamma"]);
        let mut sel = Selection::press(&buf, Position::new(0, 7), 2);
        assert_eq!(sel.normalized(), (Position::new(0, 6), Position::new(0, 10)));
        sel.drag_to(&buf, Position::new(0, 13));
        assert_eq!(sel.normalized(), (Position::new(0, 6), Position::new(0, 16)));
        sel.drag_to(&buf, Position::new(0, 1));
        assert_eq!(sel.normalized(), (Position::new(0, 0), Position::new(0, 10)));
    }

    #[test]
    fn triple_click_selects_lines() {
        let buf = b(&["one", "two", "three"]);
        let mut sel = Selection::press(&buf, Position::new(1, 1), 3);
        assert_eq!(sel.normalized(), (Position::new(1, 0), Position::new(1, 3)));
        sel.drag_to(&buf, Position::new(2, 0));
        assert_eq!(sel.normalized(), (Position::new(1, 0), Position::new(2, 5)));
        sel.drag_to(&buf, Position::new(0, 2));
        assert_eq!(sel.normalized(), (Position::new(0, 0), Position::new(1, 3)));
    }

    #[test]
    fn release_clears_degenerate_character_selection() {
        let buf = b(&["abc"]);
        let sel = Selection::press(&buf, Position::new(0, 1), 1);
        assert_eq!(sel.release(), None);
        let mut sel = Selection::press(&buf, Position::new(0, 1), 1);
        sel.drag_to(&buf, Position::new(0, 3));
        assert!(sel.release().is_some());
    }
}
