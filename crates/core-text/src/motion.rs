//! Word classification and word-wise scanning.
//!
//! One three-way classifier (`Word` / `Punctuation` / `Whitespace`) backs every
//! word operation: forward jump, backward jump, smart delete, and double-click
//! word selection. They all agree on boundaries because they share `classify`.
//!
//! Forward rule: skip a leading whitespace run, then skip the run of scalars
//! sharing the class of the first non-whitespace scalar. Backward is the mirror
//! image. Line ends act as hard stops: from the end of a line the forward jump
//! lands on the start of the next line, and from column 0 the backward jump lands
//! on the end of the previous line.

use crate::{Buffer, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Word,
    Punctuation,
    Whitespace,
}

/// Alphanumeric or `_` is a word scalar; whitespace is whitespace; everything else punctuation.
pub fn classify(c: char) -> CharClass {
    if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else if c.is_whitespace() {
        CharClass::Whitespace
    } else {
        CharClass::Punctuation
    }
}

/// Column reached by a forward word scan within one line's scalars.
pub fn scan_forward(chars: &[char], from: usize) -> usize {
    let mut i = from.min(chars.len());
    while i < chars.len() && classify(chars[i]) == CharClass::Whitespace {
        i += 1;
    }
    if i < chars.len() {
        let class = classify(chars[i]);
        while i < chars.len() && classify(chars[i]) == class {
            i += 1;
        }
    }
    i
}

/// Column reached by a backward word scan within one line's scalars.
pub fn scan_backward(chars: &[char], from: usize) -> usize {
    let mut i = from.min(chars.len());
    while i > 0 && classify(chars[i - 1]) == CharClass::Whitespace {
        i -= 1;
    }
    if i > 0 {
        let class = classify(chars[i - 1]);
        while i > 0 && classify(chars[i - 1]) == class {
            i -= 1;
        }
    }
    i
}

/// Next word boundary after `pos`.
pub fn word_forward(buf: &Buffer, pos: Position) -> Position {
    let pos = buf.clamp(pos);
    let chars: Vec<char> = buf.line(pos.line).unwrap_or_default().chars().collect();
    if pos.column >= chars.len() {
        if pos.line + 1 < buf.line_count() {
            return Position::new(pos.line + 1, 0);
        }
        return pos;
    }
    Position::new(pos.line, scan_forward(&chars, pos.column))
}

/// Previous word boundary before `pos`.
pub fn word_backward(buf: &Buffer, pos: Position) -> Position {
    let pos = buf.clamp(pos);
    if pos.column == 0 {
        if pos.line > 0 {
            return Position::new(pos.line - 1, buf.line_len(pos.line - 1));
        }
        return pos;
    }
    let chars: Vec<char> = buf.line(pos.line).unwrap_or_default().chars().collect();
    Position::new(pos.line, scan_backward(&chars, pos.column))
}

/// The run of same-class scalars containing `column` as a half-open `[start, end)`.
///
/// A column at the line end resolves to the run ending there. Empty lines yield `(0, 0)`.
pub fn word_range_at(line: &str, column: usize) -> (usize, usize) {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return (0, 0);
    }
    let idx = column.min(chars.len() - 1);
    let class = classify(chars[idx]);
    let mut start = idx;
    while start > 0 && classify(chars[start - 1]) == class {
        start -= 1;
    }
    let mut end = idx + 1;
    while end < chars.len() && classify(chars[end]) == class {
        end += 1;
    }
    (start, end)
}
