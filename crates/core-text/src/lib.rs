//! Line-oriented text buffer.
//!
//! The document is an ordered vector of logical lines. No line terminators are
//! stored; adjacency implies a newline. Columns count Unicode scalars (`char`),
//! never bytes or display cells, so every API here translates between scalar
//! columns and byte offsets at the edges.
//!
//! Invariants:
//! - `lines` is never empty. An empty document is a single empty line.
//! - `generation` increases on every mutation. Layout caches key on it.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use tracing::trace;

pub mod motion;
pub mod width;

pub use motion::{CharClass, classify};
pub use width::{char_width, str_width};

/// A logical position: line index plus scalar column within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn origin() -> Self {
        Self { line: 0, column: 0 }
    }

    /// Clamp into `0 <= line < line_count` and `0 <= column <= len(line)`.
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.column = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.column > max_len {
            self.column = max_len;
        }
    }
}

/// Normalize `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Byte offset of scalar column `column` in `line` (clamped to the line end).
pub fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(b, _)| b)
        .unwrap_or(line.len())
}

/// Scalar count of a string.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
    generation: u64,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Buffer {
    /// Build a buffer from collaborator-supplied lines. An empty vector becomes one empty line.
    pub fn new(mut lines: Vec<String>) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            generation: 0,
        }
    }

    /// Split `text` on normalized newlines.
    pub fn from_text(text: &str) -> Self {
        let norm = normalize_newlines(text);
        Self::new(norm.split('\n').map(str::to_string).collect())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Scalar length of a line (0 when out of range).
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map(|l| char_len(l)).unwrap_or(0)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clamp a position into this buffer.
    pub fn clamp(&self, pos: Position) -> Position {
        let mut p = pos;
        p.clamp_to(self.line_count(), |l| self.line_len(l));
        p
    }

    /// End-of-document position.
    pub fn end(&self) -> Position {
        let last = self.lines.len() - 1;
        Position::new(last, self.line_len(last))
    }

    /// Scalar at `pos`, if any.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.lines.get(pos.line)?.chars().nth(pos.column)
    }

    /// Lines joined with `\n`: the persisted byte contract.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Stable content hash used for dirty tracking.
    pub fn content_hash(&self) -> u64 {
        content_hash(&self.lines)
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    /// Replace all content (undo/redo restore). Generation still advances.
    pub fn replace_lines(&mut self, mut lines: Vec<String>) {
        if lines.is_empty() {
            lines.push(String::new());
        }
        self.lines = lines;
        self.bump();
    }

    /// Insert a single scalar; returns the position after it.
    pub fn insert_char(&mut self, pos: Position, c: char) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_offset(line, pos.column);
        line.insert(at, c);
        self.bump();
        Position::new(pos.line, pos.column + 1)
    }

    /// Split the line at `pos`; returns the start of the new line.
    pub fn split_line(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        let line = &mut self.lines[pos.line];
        let at = byte_offset(line, pos.column);
        let tail = line.split_off(at);
        self.lines.insert(pos.line + 1, tail);
        self.bump();
        Position::new(pos.line + 1, 0)
    }

    /// Insert possibly multi-line text (`\n` separated, already normalized) at `pos`.
    /// Returns the position immediately after the inserted text.
    pub fn insert_text(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        if text.is_empty() {
            return pos;
        }
        let mut pieces = text.split('\n');
        let first = pieces.next().unwrap_or_default();
        let rest: Vec<&str> = pieces.collect();
        let line = &mut self.lines[pos.line];
        let at = byte_offset(line, pos.column);
        if rest.is_empty() {
            line.insert_str(at, first);
            self.bump();
            return Position::new(pos.line, pos.column + char_len(first));
        }
        let tail = line.split_off(at);
        line.push_str(first);
        let last_idx = rest.len() - 1;
        let mut new_lines: Vec<String> = Vec::with_capacity(rest.len());
        for (i, piece) in rest.iter().enumerate() {
            if i == last_idx {
                let mut s = String::with_capacity(piece.len() + tail.len());
                s.push_str(piece);
                s.push_str(&tail);
                new_lines.push(s);
            } else {
                new_lines.push((*piece).to_string());
            }
        }
        let end = Position::new(pos.line + rest.len(), char_len(rest[last_idx]));
        let insert_at = pos.line + 1;
        self.lines.splice(insert_at..insert_at, new_lines);
        self.bump();
        trace!(target: "text.buffer", lines_added = rest.len(), generation = self.generation, "insert_text");
        end
    }

    /// Text between two positions (document order is enforced).
    pub fn text_range(&self, a: Position, b: Position) -> String {
        let (start, end) = ordered(self.clamp(a), self.clamp(b));
        if start.line == end.line {
            let line = &self.lines[start.line];
            let s = byte_offset(line, start.column);
            let e = byte_offset(line, end.column);
            return line[s..e].to_string();
        }
        let mut out = String::new();
        let first = &self.lines[start.line];
        out.push_str(&first[byte_offset(first, start.column)..]);
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        let last = &self.lines[end.line];
        out.push_str(&last[..byte_offset(last, end.column)]);
        out
    }

    /// Remove the text between two positions and return it.
    ///
    /// Multi-line ranges splice the start line's prefix onto the end line's suffix
    /// and drop the intervening lines in one bulk removal.
    pub fn remove_range(&mut self, a: Position, b: Position) -> String {
        let (start, end) = ordered(self.clamp(a), self.clamp(b));
        if start == end {
            return String::new();
        }
        let removed = self.text_range(start, end);
        if start.line == end.line {
            let line = &mut self.lines[start.line];
            let s = byte_offset(line, start.column);
            let e = byte_offset(line, end.column);
            line.replace_range(s..e, "");
        } else {
            let suffix = {
                let last = &self.lines[end.line];
                last[byte_offset(last, end.column)..].to_string()
            };
            let first = &mut self.lines[start.line];
            let cut = byte_offset(first, start.column);
            first.truncate(cut);
            first.push_str(&suffix);
            self.lines.drain(start.line + 1..=end.line);
            trace!(target: "text.buffer", lines_removed = end.line - start.line, "remove_range");
        }
        self.bump();
        removed
    }

    /// Backspace semantics: remove the scalar before `pos`, joining lines at column 0.
    /// Returns the new cursor position.
    pub fn delete_char_before(&mut self, pos: Position) -> Position {
        let pos = self.clamp(pos);
        if pos.column > 0 {
            let start = Position::new(pos.line, pos.column - 1);
            self.remove_range(start, pos);
            start
        } else if pos.line > 0 {
            let start = Position::new(pos.line - 1, self.line_len(pos.line - 1));
            self.remove_range(start, pos);
            start
        } else {
            pos
        }
    }

    /// Forward delete: remove the scalar at `pos`, joining the next line at line end.
    /// Returns true when something was removed.
    pub fn delete_char_at(&mut self, pos: Position) -> bool {
        let pos = self.clamp(pos);
        let len = self.line_len(pos.line);
        if pos.column < len {
            self.remove_range(pos, Position::new(pos.line, pos.column + 1));
            true
        } else if pos.line + 1 < self.line_count() {
            self.remove_range(pos, Position::new(pos.line + 1, 0));
            true
        } else {
            false
        }
    }
}

/// Document-ordered pair.
pub fn ordered(a: Position, b: Position) -> (Position, Position) {
    if a <= b { (a, b) } else { (b, a) }
}

pub fn content_hash<S: AsRef<str>>(lines: &[S]) -> u64 {
    let mut h = DefaultHasher::new();
    for l in lines {
        h.write(l.as_ref().as_bytes());
        h.write_u8(b'\n');
    }
    h.finish()
}
