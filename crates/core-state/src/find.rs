//! Incremental find.
//!
//! The query is recomputed against the whole buffer on every edit. Two modes:
//! * literal: case-insensitive, non-overlapping, left to right per line;
//! * regex: entered when the query is wrapped in `/…/`. Zero-length matches are
//!   dropped. A compile failure records the error, clears the matches, and
//!   leaves the session running.
//!
//! Match ranges are scalar columns on a single line.

use std::ops::Range;

use core_text::{Buffer, Position, char_len};
use regex::Regex;
use tracing::{debug, trace};

use crate::field::TextField;
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindMatch {
    pub line: usize,
    pub columns: Range<usize>,
}

impl FindMatch {
    pub fn start(&self) -> Position {
        Position::new(self.line, self.columns.start)
    }
    pub fn end(&self) -> Position {
        Position::new(self.line, self.columns.end)
    }
}

/// View state captured when find mode is entered, restored on cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedView {
    pub cursor: Position,
    pub selection: Option<Selection>,
    pub scroll_top: usize,
}

#[derive(Debug, Clone)]
pub struct FindState {
    pub field: TextField,
    pub matches: Vec<FindMatch>,
    pub current: Option<usize>,
    pub error: Option<String>,
    pub regex: bool,
    pub saved: SavedView,
}

/// Split a query into its regex body when wrapped in slashes.
fn regex_body(query: &str) -> Option<&str> {
    if query.len() >= 2 && query.starts_with('/') && query.ends_with('/') {
        Some(&query[1..query.len() - 1])
    } else {
        None
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Case-insensitive, non-overlapping literal scan of one line.
pub fn literal_matches(line: &str, needle: &[char]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    if needle.is_empty() {
        return out;
    }
    let hay: Vec<char> = line.chars().map(fold).collect();
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        if hay[i..i + needle.len()] == *needle {
            out.push(i..i + needle.len());
            i += needle.len();
        } else {
            i += 1;
        }
    }
    out
}

/// Regex matches of one line as scalar column ranges, zero-length matches dropped.
pub fn regex_matches(line: &str, re: &Regex) -> Vec<Range<usize>> {
    re.find_iter(line)
        .filter(|m| m.start() != m.end())
        .map(|m| {
            let s = char_len(&line[..m.start()]);
            s..s + char_len(m.as_str())
        })
        .collect()
}

impl FindState {
    pub fn new(saved: SavedView, seed: &str) -> Self {
        Self {
            field: TextField::with_text(seed),
            matches: Vec::new(),
            current: None,
            error: None,
            regex: false,
            saved,
        }
    }

    pub fn query(&self) -> &str {
        self.field.text()
    }

    /// Rebuild the match list and pick the first match at or after the
    /// position find mode started from.
    pub fn recompute(&mut self, buf: &Buffer) {
        self.matches.clear();
        self.current = None;
        self.error = None;
        let query = self.field.text().to_string();
        self.regex = regex_body(&query).is_some();
        if query.is_empty() {
            return;
        }
        match regex_body(&query) {
            Some(body) => {
                if body.is_empty() {
                    return;
                }
                match Regex::new(body) {
                    Ok(re) => {
                        for (idx, line) in buf.lines().iter().enumerate() {
                            for cols in regex_matches(line, &re) {
                                self.matches.push(FindMatch { line: idx, columns: cols });
                            }
                        }
                    }
                    Err(e) => {
                        debug!(target: "state.find", "regex_compile_error");
                        self.error = Some(compact_regex_error(&e));
                        return;
                    }
                }
            }
            None => {
                let needle: Vec<char> = query.chars().map(fold).collect();
                for (idx, line) in buf.lines().iter().enumerate() {
                    for cols in literal_matches(line, &needle) {
                        self.matches.push(FindMatch { line: idx, columns: cols });
                    }
                }
            }
        }
        if !self.matches.is_empty() {
            let origin = self.saved.cursor;
            let idx = self
                .matches
                .iter()
                .position(|m| m.start() >= origin)
                .unwrap_or(0);
            self.current = Some(idx);
        }
        trace!(target: "state.find", matches = self.matches.len(), regex = self.regex, "recompute");
    }

    /// Re-run after a buffer edit, keeping the current index where possible.
    pub fn refresh(&mut self, buf: &Buffer) {
        let prev = self.current;
        self.recompute(buf);
        if let Some(p) = prev
            && !self.matches.is_empty()
        {
            self.current = Some(p.min(self.matches.len() - 1));
        }
    }

    pub fn current_match(&self) -> Option<&FindMatch> {
        self.current.and_then(|i| self.matches.get(i))
    }

    /// Advance circularly to the next match.
    pub fn next(&mut self) -> Option<&FindMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        self.current = Some(self.current.map(|c| (c + 1) % n).unwrap_or(0));
        self.current_match()
    }

    /// Step circularly to the previous match.
    pub fn prev(&mut self) -> Option<&FindMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        self.current = Some(self.current.map(|c| (c + n - 1) % n).unwrap_or(n - 1));
        self.current_match()
    }

    /// Footer summary: `n/m`, `no matches`, or the compile error.
    pub fn summary(&self) -> String {
        if let Some(err) = &self.error {
            return err.clone();
        }
        if self.query().is_empty() || (self.regex && self.query().len() <= 2) {
            return String::new();
        }
        match self.current {
            Some(i) if !self.matches.is_empty() => format!("{}/{}", i + 1, self.matches.len()),
            _ => "no matches".to_string(),
        }
    }
}

/// The regex crate renders multi-line diagnostics; the footer has one row.
fn compact_regex_error(e: &regex::Error) -> String {
    let text = e.to_string();
    let last = text
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("invalid pattern")
        .trim();
    let last = last.strip_prefix("error: ").unwrap_or(last);
    format!("regex: {last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(query: &str) -> FindState {
        FindState::new(
            SavedView {
                cursor: Position::origin(),
                selection: None,
                scroll_top: 0,
            },
            query,
        )
    }

    fn b(lines: &[&str]) -> Buffer {
        Buffer::new(lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn literal_cat_matches_three_in_line_order() {
        let buf = b(&["concatenate", "cat", "scatter"]);
        let mut f = state("cat");
        f.recompute(&buf);
        let got: Vec<(usize, Range<usize>)> =
            f.matches.iter().map(|m| (m.line, m.columns.clone())).collect();
        assert_eq!(got, vec![(0, 3..6), (1, 0..3), (2, 1..4)]);
        assert_eq!(f.current, Some(0));
    }

    #[test]
    fn literal_is_case_insensitive_and_non_overlapping() {
        let buf = b(&["AaAa", "ÉTÉ été"]);
        let mut f = state("aa");
        f.recompute(&buf);
        assert_eq!(f.matches.len(), 2);
        let mut f = state("été");
        f.recompute(&buf);
        let cols: Vec<_> = f.matches.iter().map(|m| m.columns.clone()).collect();
        assert_eq!(cols, vec![0..3, 4..7]);
    }

    #[test]
    fn regex_anchor_matches_capitalized_lines() {
        let buf = b(&["Hello", "world", "Test"]);
        let mut f = state("/^[A-Z]/");
        f.recompute(&buf);
        assert!(f.regex);
        let lines: Vec<usize> = f.matches.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![0, 2]);
    }

    #[test]
    fn regex_drops_zero_length_matches() {
        let buf = b(&["abc"]);
        let mut f = state("/x*/");
        f.recompute(&buf);
        assert!(f.matches.is_empty());
        assert_eq!(f.summary(), "no matches");
    }

    #[test]
    fn regex_compile_error_is_recorded() {
        let buf = b(&["abc"]);
        let mut f = state("/(/");
        f.recompute(&buf);
        assert!(f.matches.is_empty());
        assert!(f.error.as_deref().is_some_and(|e| e.starts_with("regex:")));
        assert_eq!(f.current_match(), None);
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let buf = b(&["x x", "x"]);
        let mut f = state("x");
        f.recompute(&buf);
        assert_eq!(f.summary(), "1/3");
        f.prev();
        assert_eq!(f.current, Some(2));
        f.next();
        assert_eq!(f.current, Some(0));
        f.next();
        f.next();
        f.next();
        assert_eq!(f.current, Some(0));
    }

    #[test]
    fn current_starts_at_or_after_origin() {
        let buf = b(&["dog", "dog", "dog"]);
        let mut f = FindState::new(
            SavedView {
                cursor: Position::new(1, 1),
                selection: None,
                scroll_top: 0,
            },
            "dog",
        );
        f.recompute(&buf);
        assert_eq!(f.current, Some(2));
    }

    #[test]
    fn multibyte_regex_columns_are_scalars() {
        let buf = b(&["漢字 kana"]);
        let mut f = state("/kana/");
        f.recompute(&buf);
        assert_eq!(f.matches[0].columns, 3..7);
    }
}
