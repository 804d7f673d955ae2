//! Scalar display width.
//!
//! All width decisions (wrapping, cursor placement, hit-testing) flow through
//! `char_width`. Rules:
//! - wide East Asian glyphs count 2,
//! - combining / zero-width marks count 0,
//! - control scalars count 0 (they are never printed).

use unicode_width::UnicodeWidthChar;

/// Terminal cells occupied by a single scalar.
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 0;
    }
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Width of a whole string.
pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Width of the first `column` scalars of `line`.
pub fn prefix_width(line: &str, column: usize) -> usize {
    line.chars().take(column).map(char_width).sum()
}

/// Width of the scalar range `[start, end)` of `line`.
pub fn range_width(line: &str, start: usize, end: usize) -> usize {
    line.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .map(char_width)
        .sum()
}

/// Map a display offset (cells from the start of the segment beginning at scalar
/// `start`) back to a scalar column, stopping at `end`. A cell inside a wide glyph
/// resolves to that glyph's column.
pub fn column_at_offset(line: &str, start: usize, end: usize, offset: usize) -> usize {
    let mut cells = 0usize;
    let mut col = start;
    for c in line.chars().skip(start).take(end.saturating_sub(start)) {
        let w = char_width(c);
        if cells + w > offset {
            return col;
        }
        cells += w;
        col += 1;
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_one() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(str_width("hello"), 5);
    }

    #[test]
    fn cjk_is_two() {
        assert_eq!(char_width('漢'), 2);
        assert_eq!(str_width("漢字"), 4);
    }

    #[test]
    fn combining_and_control_are_zero() {
        assert_eq!(char_width('\u{0301}'), 0);
        assert_eq!(char_width('\u{200B}'), 0);
        assert_eq!(char_width('\t'), 0);
        assert_eq!(char_width('\u{1b}'), 0);
    }

    #[test]
    fn prefix_width_mixed() {
        let s = "a漢e\u{0301}b";
        assert_eq!(prefix_width(s, 0), 0);
        assert_eq!(prefix_width(s, 2), 3);
        assert_eq!(prefix_width(s, 4), 4);
        assert_eq!(prefix_width(s, 99), 5);
    }

    #[test]
    fn column_at_offset_inside_wide_glyph() {
        let s = "a漢b";
        assert_eq!(column_at_offset(s, 0, 3, 0), 0);
        assert_eq!(column_at_offset(s, 0, 3, 1), 1);
        assert_eq!(column_at_offset(s, 0, 3, 2), 1);
        assert_eq!(column_at_offset(s, 0, 3, 3), 2);
        assert_eq!(column_at_offset(s, 0, 3, 40), 3);
    }
}
