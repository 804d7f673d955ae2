//! Wrapped-line layout cache.
//!
//! Converts logical lines into `VisualRow`s for a given content width and keeps
//! them cached between frames.
//!
//! Cache key: `(width, buffer generation)`. The cache holds the flattened row
//! vector plus a per-line offset table (`offsets[l]` is the index of line `l`'s
//! first row). An edit confined to lines `[a, b)` rewraps only those lines:
//! each line's old row span is replaced in place and every later offset is
//! shifted by the row-count delta.
//!
//! Edits that add or remove lines go through [`LayoutCache::splice`]: the
//! replaced lines get placeholder rows queued for rewrap, and every later
//! line keeps its rows with offsets and line numbers shifted.
//!
//! Full rebuild happens when:
//! * the width changes,
//! * the line count no longer matches the offset table,
//! * "invalidate everything" was requested,
//! * the generation moved without any targeted invalidation.
//!
//! Invariants (after `ensure`):
//! * `offsets.len() == buffer.line_count()` and offsets are non-decreasing.
//! * every line owns at least one row; an empty line owns one `[0, 0)` row.
//! * exactly one row per line has `is_first` and exactly one `is_end_of_line`.

use std::collections::BTreeSet;
use std::ops::Range;

use core_text::width::{char_width, column_at_offset, range_width};
use core_text::{Buffer, Position};
use tracing::trace;

/// One screen row: the scalar range `[start, end)` of logical line `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRow {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    /// First row of its line; carries the gutter number.
    pub is_first: bool,
    /// Last row of its line; its end boundary is inclusive for the cursor.
    pub is_end_of_line: bool,
}

impl VisualRow {
    /// Whether `column` of this row's line belongs to this row.
    pub fn holds(&self, column: usize) -> bool {
        if self.is_end_of_line {
            column >= self.start && column <= self.end
        } else {
            column >= self.start && column < self.end
        }
    }
}

/// Greedy display-width-aware wrap of one line.
///
/// Returns strictly increasing scalar cut points starting at 0 and ending at
/// the line length. An empty line yields `[0, 0]`. A row breaks after the last
/// whitespace run seen since the previous break when one exists, otherwise mid
/// run. A scalar wider than `width` still gets a row of its own.
pub fn wrap_line_indices(line: &str, width: usize) -> Vec<usize> {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();
    if n == 0 {
        return vec![0, 0];
    }
    let width = width.max(1);
    let mut cuts = vec![0];
    let mut row_start = 0usize;
    let mut row_w = 0usize;
    let mut last_break: Option<usize> = None;
    let mut i = 0usize;
    while i < n {
        let w = char_width(chars[i]);
        if row_w + w > width && i > row_start {
            let cut = match last_break {
                Some(b) if b > row_start && b <= i => b,
                _ => i,
            };
            cuts.push(cut);
            row_start = cut;
            row_w = chars[cut..i].iter().map(|c| char_width(*c)).sum();
            last_break = None;
            continue;
        }
        row_w += w;
        if chars[i].is_whitespace() && i + 1 < n && !chars[i + 1].is_whitespace() {
            last_break = Some(i + 1);
        }
        i += 1;
    }
    cuts.push(n);
    cuts
}

fn rows_for_line(idx: usize, line: &str, width: usize) -> Vec<VisualRow> {
    let cuts = wrap_line_indices(line, width);
    let count = cuts.len() - 1;
    cuts.windows(2)
        .enumerate()
        .map(|(k, w)| VisualRow {
            line: idx,
            start: w[0],
            end: w[1],
            is_first: k == 0,
            is_end_of_line: k + 1 == count,
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct LayoutCache {
    width: usize,
    generation: Option<u64>,
    rows: Vec<VisualRow>,
    offsets: Vec<usize>,
    pending: BTreeSet<usize>,
    full: bool,
    last_rewrapped: usize,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            full: true,
            ..Self::default()
        }
    }

    /// Mark lines for rewrap. `None` invalidates everything.
    pub fn invalidate(&mut self, lines: Option<Range<usize>>) {
        match lines {
            Some(r) => self.pending.extend(r),
            None => self.full = true,
        }
    }

    /// Lines `[at, at + removed)` were replaced by `inserted` lines.
    pub fn splice(&mut self, at: usize, removed: usize, inserted: usize) {
        if self.full || at + removed > self.offsets.len() {
            self.full = true;
            return;
        }
        let row_start = self.line_rows(at).start;
        let row_end = match removed {
            0 => row_start,
            n => self.line_rows(at + n - 1).end,
        };
        let placeholders = (at..at + inserted).map(|line| VisualRow {
            line,
            start: 0,
            end: 0,
            is_first: true,
            is_end_of_line: true,
        });
        self.rows.splice(row_start..row_end, placeholders);
        self.offsets
            .splice(at..at + removed, (0..inserted).map(|k| row_start + k));
        let row_delta = inserted as isize - (row_end - row_start) as isize;
        let line_delta = inserted as isize - removed as isize;
        for off in &mut self.offsets[at + inserted..] {
            *off = off.saturating_add_signed(row_delta);
        }
        if line_delta != 0 {
            for row in &mut self.rows[row_start + inserted..] {
                row.line = row.line.saturating_add_signed(line_delta);
            }
        }
        self.pending = std::mem::take(&mut self.pending)
            .into_iter()
            .filter_map(|l| match l {
                l if l < at => Some(l),
                l if l < at + removed => None,
                l => Some(l.saturating_add_signed(line_delta)),
            })
            .chain(at..at + inserted)
            .collect();
        trace!(target: "model.layout", at, removed, inserted, "splice");
    }

    /// Bring the cache up to date with `buf` at `width`.
    pub fn ensure(&mut self, buf: &Buffer, width: usize) {
        let width = width.max(1);
        let line_count = buf.line_count();
        let stale_generation = self.generation != Some(buf.generation());
        if self.full
            || width != self.width
            || self.offsets.len() != line_count
            || (stale_generation && self.pending.is_empty())
        {
            self.rebuild(buf, width);
            return;
        }
        if self.pending.is_empty() {
            self.last_rewrapped = 0;
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        let mut count = 0;
        for l in pending.into_iter().filter(|l| *l < line_count) {
            self.rewrap_line(buf, l);
            count += 1;
        }
        self.last_rewrapped = count;
        self.generation = Some(buf.generation());
        trace!(target: "model.layout", lines = count, rows = self.rows.len(), "incremental");
    }

    fn rebuild(&mut self, buf: &Buffer, width: usize) {
        self.rows.clear();
        self.offsets.clear();
        for (idx, line) in buf.lines().iter().enumerate() {
            self.offsets.push(self.rows.len());
            self.rows.extend(rows_for_line(idx, line, width));
        }
        self.width = width;
        self.generation = Some(buf.generation());
        self.pending.clear();
        self.full = false;
        self.last_rewrapped = buf.line_count();
        trace!(target: "model.layout", width, rows = self.rows.len(), "full_rebuild");
    }

    fn rewrap_line(&mut self, buf: &Buffer, l: usize) {
        let span = self.line_rows(l);
        let fresh = rows_for_line(l, buf.line(l).unwrap_or_default(), self.width);
        let old_len = span.len();
        let new_len = fresh.len();
        self.rows.splice(span, fresh);
        if new_len != old_len {
            for off in &mut self.offsets[l + 1..] {
                *off = *off + new_len - old_len;
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }
    pub fn rows(&self) -> &[VisualRow] {
        &self.rows
    }
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
    pub fn row(&self, idx: usize) -> Option<&VisualRow> {
        self.rows.get(idx)
    }
    /// Lines rewrapped by the most recent `ensure`.
    pub fn last_rewrapped(&self) -> usize {
        self.last_rewrapped
    }

    /// Row index span owned by logical line `l`.
    pub fn line_rows(&self, l: usize) -> Range<usize> {
        let Some(&start) = self.offsets.get(l) else {
            return self.rows.len()..self.rows.len();
        };
        let end = self.offsets.get(l + 1).copied().unwrap_or(self.rows.len());
        start..end
    }

    /// Visual row index holding `pos`. Only the line's own span is scanned.
    pub fn cursor_row(&self, pos: Position) -> usize {
        let span = self.line_rows(pos.line);
        if span.is_empty() {
            return self.rows.len().saturating_sub(1);
        }
        let last = span.end - 1;
        span.into_iter()
            .find(|r| self.rows[*r].holds(pos.column))
            .unwrap_or(last)
    }

    /// Display offset of `pos` inside its visual row.
    pub fn column_x(&self, buf: &Buffer, pos: Position) -> usize {
        let Some(row) = self.rows.get(self.cursor_row(pos)) else {
            return 0;
        };
        range_width(buf.line(row.line).unwrap_or_default(), row.start, pos.column)
    }

    /// Logical position at display offset `x` of visual row `row_idx`.
    ///
    /// Offsets past the row end land on the row end; for rows that are not the
    /// last of their line that is the final scalar, since the end column
    /// belongs to the following row.
    pub fn position_at(&self, buf: &Buffer, row_idx: usize, x: usize) -> Position {
        let Some(row) = self.rows.get(row_idx.min(self.rows.len().saturating_sub(1))) else {
            return Position::origin();
        };
        let line = buf.line(row.line).unwrap_or_default();
        let mut col = column_at_offset(line, row.start, row.end, x);
        if !row.is_end_of_line && col >= row.end {
            col = row.end.saturating_sub(1).max(row.start);
        }
        Position::new(row.line, col)
    }
}
