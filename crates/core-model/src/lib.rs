//! Editor model: state plus the derived layout and screen geometry.
//!
//! `EditorModel` is the single value the event loop owns. It wraps
//! `EditorState` (source of truth for the document) with everything computed
//! from it: the wrapped-row cache, the scroll window, and the scrollbar.
//!
//! Buffer-changed protocol: after mutating the buffer the dispatcher calls
//! [`EditorModel::buffer_changed`] with the affected logical-line range (or
//! `None` for "everything"), or [`EditorModel::lines_replaced`] when the
//! line count changed. That single call
//! * invalidates the affected layout rows,
//! * recomputes the dirty flag against the saved-content hash,
//! * re-runs find when find mode is active with a non-empty query.
//!
//! Scroll invariants (after `sync`):
//! * `state.scroll_top <= max_scroll()`.
//! * if `state.follow_cursor` was set, the cursor's visual row is inside
//!   `[scroll_top, scroll_top + body_rows)` and the flag is cleared.

use std::ops::Range;

use core_state::EditorState;
use core_text::Position;
use tracing::trace;

mod geometry;
mod layout;
mod scrollbar;

pub use geometry::{FOOTER_ROWS, HEADER_ROWS, ScreenGeometry};
pub use layout::{LayoutCache, VisualRow, wrap_line_indices};
pub use scrollbar::{Scrollbar, ScrollbarHit};

pub struct EditorModel {
    pub state: EditorState,
    pub layout: LayoutCache,
    pub geometry: ScreenGeometry,
}

impl EditorModel {
    pub fn new(state: EditorState, cols: u16, rows: u16) -> Self {
        let mut model = Self {
            state,
            layout: LayoutCache::new(),
            geometry: ScreenGeometry::new(cols, rows),
        };
        model.sync();
        model
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.geometry = ScreenGeometry::new(cols, rows);
        self.state.follow_cursor = true;
        self.sync();
    }

    /// Notify that the buffer changed in `lines` (`None` = everything).
    pub fn buffer_changed(&mut self, lines: Option<Range<usize>>) {
        self.layout.invalidate(lines.clone());
        trace!(target: "model", ?lines, "buffer_changed");
        self.after_change();
    }

    /// Notify that lines `[at, at + removed)` became `inserted` lines.
    pub fn lines_replaced(&mut self, at: usize, removed: usize, inserted: usize) {
        self.layout.splice(at, removed, inserted);
        trace!(target: "model", at, removed, inserted, "lines_replaced");
        self.after_change();
    }

    fn after_change(&mut self) {
        self.state.clamp_cursor();
        self.state.recompute_dirty();
        if let Some(find) = &mut self.state.find
            && !find.query().is_empty()
        {
            find.refresh(&self.state.buffer);
        }
        trace!(target: "model", dirty = self.state.is_dirty(), "change_applied");
        self.sync();
    }

    pub fn text_width(&self) -> usize {
        self.geometry.text_width(self.state.buffer.line_count())
    }

    pub fn body_rows(&self) -> usize {
        self.geometry.body_rows()
    }

    /// Refresh layout and clamp the scroll window.
    pub fn sync(&mut self) {
        let width = self.text_width();
        self.layout.ensure(&self.state.buffer, width);
        if self.state.follow_cursor {
            self.ensure_cursor_visible();
            self.state.follow_cursor = false;
        }
        self.state.scroll_top = self.state.scroll_top.min(self.max_scroll());
    }

    pub fn total_rows(&self) -> usize {
        self.layout.row_count()
    }

    pub fn max_scroll(&self) -> usize {
        self.total_rows().saturating_sub(self.body_rows())
    }

    pub fn cursor_row(&self) -> usize {
        self.layout.cursor_row(self.state.cursor)
    }

    /// Scroll the minimum amount that brings the cursor row on screen.
    pub fn ensure_cursor_visible(&mut self) {
        let row = self.cursor_row();
        let body = self.body_rows().max(1);
        if row < self.state.scroll_top {
            self.state.scroll_top = row;
        } else if row >= self.state.scroll_top + body {
            self.state.scroll_top = row + 1 - body;
        }
    }

    /// Scroll the window by `delta` visual rows without moving the cursor.
    pub fn scroll_by(&mut self, delta: isize) {
        let top = self.state.scroll_top as isize + delta;
        self.state.scroll_top = (top.max(0) as usize).min(self.max_scroll());
    }

    pub fn scrollbar(&self) -> Scrollbar {
        Scrollbar::compute(self.total_rows(), self.body_rows(), self.state.scroll_top)
    }

    /// Screen cell of the cursor, or `None` when its row is scrolled out.
    pub fn cursor_screen(&self) -> Option<(u16, u16)> {
        let row = self.cursor_row();
        let top = self.state.scroll_top;
        if row < top || row >= top + self.body_rows() {
            return None;
        }
        let x = self.layout.column_x(&self.state.buffer, self.state.cursor);
        let gutter = self.geometry.gutter_width(self.state.buffer.line_count());
        let col = (gutter + x).min(self.geometry.scrollbar_col().saturating_sub(1) as usize);
        Some((col as u16, self.geometry.body_top() + (row - top) as u16))
    }

    /// Document position under a body cell; cells beyond the text clamp to the
    /// nearest row and column.
    pub fn position_at_cell(&self, col: u16, screen_row: u16) -> Option<Position> {
        let body = self.geometry.body_row_at(screen_row)?;
        let row = (self.state.scroll_top + body).min(self.total_rows().saturating_sub(1));
        let gutter = self.geometry.gutter_width(self.state.buffer.line_count());
        let x = (col as usize).saturating_sub(gutter);
        Some(self.layout.position_at(&self.state.buffer, row, x))
    }

    /// Position under a screen cell, clamping rows outside the body to the
    /// neighbouring visual row so drags past an edge keep extending.
    pub fn position_at_screen(&self, col: u16, screen_row: u16) -> Position {
        let rel = screen_row as isize - self.geometry.body_top() as isize;
        let rel = rel.clamp(-1, self.body_rows() as isize);
        let last = self.total_rows().saturating_sub(1) as isize;
        let row = (self.state.scroll_top as isize + rel).clamp(0, last) as usize;
        let gutter = self.geometry.gutter_width(self.state.buffer.line_count());
        let x = (col as usize).saturating_sub(gutter);
        self.layout.position_at(&self.state.buffer, row, x)
    }

    /// Position reached by moving `delta` visual rows from the cursor, keeping
    /// the sticky display column.
    pub fn vertical_target(&mut self, delta: isize) -> Position {
        let cur_row = self.cursor_row();
        let x = match self.state.preferred_x {
            Some(x) => x,
            None => {
                let x = self.layout.column_x(&self.state.buffer, self.state.cursor);
                self.state.preferred_x = Some(x);
                x
            }
        };
        let last = self.total_rows().saturating_sub(1) as isize;
        let target = cur_row as isize + delta;
        if target < 0 {
            return Position::origin();
        }
        if target > last {
            return self.state.buffer.end();
        }
        self.layout.position_at(&self.state.buffer, target as usize, x)
    }
}
