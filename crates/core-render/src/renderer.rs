//! Previous-frame diffing.
//!
//! `Renderer` keeps the last emitted frame and repaints only rows whose cells
//! changed. Each repainted row is: move to column 0, print style runs up to the
//! last non-blank cell, then clear to end of line. `invalidate` (resize, first
//! frame) forces a clear screen and a repaint of every row.

use core_model::EditorModel;
use tracing::trace;

use crate::compose::{Composed, compose};
use crate::writer::Writer;
use crate::{CellFlags, Frame};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u64,
    pub full_frames: u64,
    pub rows_repainted: u64,
    pub rows_skipped: u64,
}

#[derive(Debug, Default)]
pub struct Renderer {
    prev: Option<Frame>,
    last_repainted: Vec<u16>,
    stats: RenderStats,
}

fn emit_row(w: &mut Writer, frame: &Frame, y: u16) {
    w.move_to(0, y);
    let row = frame.row(y);
    let end = row
        .iter()
        .rposition(|c| !c.is_blank())
        .map(|i| i + 1)
        .unwrap_or(0);
    for (cluster, _, flags, x) in frame.row_leaders(y) {
        if x as usize >= end {
            break;
        }
        w.print(cluster, flags);
    }
    if end < row.len() {
        w.clear_to_eol();
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame; the next render repaints everything.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Rows written by the most recent `render`.
    pub fn last_repainted(&self) -> &[u16] {
        &self.last_repainted
    }

    /// Queue the output for `model` onto `w`. `cursor_on` is the blink phase.
    pub fn render(&mut self, model: &EditorModel, cursor_on: bool, w: &mut Writer) {
        let Composed { frame, cursor } = compose(model);
        let full = self
            .prev
            .as_ref()
            .is_none_or(|p| p.width != frame.width || p.height != frame.height);
        self.last_repainted.clear();
        w.hide_cursor();
        if full {
            w.clear_all();
            self.stats.full_frames += 1;
        }
        for y in 0..frame.height {
            let changed = full || self.prev.as_ref().is_some_and(|p| p.row(y) != frame.row(y));
            if changed {
                emit_row(w, &frame, y);
                self.last_repainted.push(y);
                self.stats.rows_repainted += 1;
            } else {
                self.stats.rows_skipped += 1;
            }
        }
        if let Some((x, y)) = cursor
            && cursor_on
        {
            w.move_to(x, y);
            w.show_cursor();
        }
        self.stats.frames += 1;
        trace!(
            target: "render.frame",
            full,
            repainted = self.last_repainted.len(),
            cursor_visible = cursor.is_some() && cursor_on,
            "frame"
        );
        self.prev = Some(frame);
    }
}
