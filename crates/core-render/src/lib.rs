//! Frame composition and incremental terminal output.
//!
//! A frame is a grid of [`Cell`]s. Leader cells hold a printable scalar plus
//! any zero-width marks that follow it; a wide glyph's second column is a
//! continuation cell (width 0) that never prints. Control scalars never reach
//! the grid.
//!
//! Pipeline per redraw:
//! 1. [`compose::compose`] paints header, body and footer into a fresh `Frame`
//!    from the `EditorModel` and reports where the terminal cursor belongs.
//! 2. [`Renderer::render`] compares each row with the previous frame and
//!    queues output only for rows that changed (all rows after `invalidate`).
//! 3. The [`writer::Writer`] command log is flushed to the terminal in one go.
//!
//! Invariants:
//! - Leader: width >= 1, `cluster` non-empty.
//! - Continuation: width == 0, `cluster` empty, directly after its leader.
//! - Styling flags cover leader and continuations alike; emission reads leaders only.

use bitflags::bitflags;

pub mod compose;
mod renderer;
pub mod status;
pub mod style;
pub mod writer;

pub use compose::{Composed, compose};
pub use renderer::{RenderStats, Renderer};
pub use writer::{Command, Writer};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CellFlags: u16 {
        const REVERSE       = 0b0000_0001;
        const BOLD          = 0b0000_0010;
        const DIM           = 0b0000_0100;
        const MATCH         = 0b0000_1000;
        const CURRENT_MATCH = 0b0001_0000;
        const WARNING       = 0b0010_0000;
        const ERROR         = 0b0100_0000;
    }
}

impl CellFlags {
    pub const SELECTION: Self = Self::REVERSE;
    pub const HEADER: Self = Self::REVERSE.union(Self::BOLD);
    pub const GUTTER: Self = Self::DIM;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub cluster: String,
    /// Visual width in columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    pub fn leader(cluster: &str, width: u16, flags: CellFlags) -> Self {
        Self {
            cluster: cluster.to_string(),
            width: width.max(1) as u8,
            flags,
        }
    }
    #[inline]
    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            cluster: String::new(),
            width: 0,
            flags,
        }
    }
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }

    /// Unstyled space.
    pub fn is_blank(&self) -> bool {
        self.cluster == " " && self.flags.is_empty()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            cluster: " ".to_string(),
            width: 1,
            flags: CellFlags::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Set a cluster at (x,y) and continuation cells for the rest of its width.
    /// A glyph that would cross the right edge is not drawn.
    pub fn set_cluster(&mut self, x: u16, y: u16, cluster: &str, width: u16, flags: CellFlags) {
        let w = width.max(1);
        if y >= self.height || x.saturating_add(w) > self.width {
            return;
        }
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(cluster, w, flags);
        }
        for dx in 1..w {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx] = Cell::continuation(flags);
            }
        }
    }

    /// Append a zero-width scalar to the leader at (x,y).
    pub fn append_to_cluster(&mut self, x: u16, y: u16, c: char) {
        if let Some(idx) = self.index(x, y)
            && self.cells[idx].is_leader()
        {
            self.cells[idx].cluster.push(c);
        }
    }

    /// Add flags over a span of cells (leaders and continuations).
    pub fn apply_flags_span(&mut self, x: u16, y: u16, span_width: u16, flags: CellFlags) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    /// Paint `text` from column `x`, stopping before `limit`. Control scalars
    /// are dropped and zero-width scalars join the preceding glyph. Returns the
    /// column after the last painted glyph.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, flags: CellFlags, limit: u16) -> u16 {
        let limit = limit.min(self.width);
        let mut x = x;
        let mut last: Option<u16> = None;
        let mut buf = [0u8; 4];
        for c in text.chars() {
            if c.is_control() {
                continue;
            }
            let w = core_text::char_width(c) as u16;
            if w == 0 {
                if let Some(lx) = last {
                    self.append_to_cluster(lx, y, c);
                }
                continue;
            }
            if x + w > limit {
                break;
            }
            self.set_cluster(x, y, c.encode_utf8(&mut buf), w, flags);
            last = Some(x);
            x += w;
        }
        x
    }

    /// Iterate leader cells of a row as `(cluster, width, flags, x)`.
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (&str, u16, CellFlags, u16)> + '_ {
        self.row(y)
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_leader())
            .map(|(x, cell)| (cell.cluster.as_str(), cell.width as u16, cell.flags, x as u16))
    }

    /// Printable text of a row (diagnostics and tests).
    pub fn row_text(&self, y: u16) -> String {
        self.row_leaders(y).map(|(c, ..)| c).collect()
    }

    /// Flags at a cell.
    pub fn flags_at(&self, x: u16, y: u16) -> CellFlags {
        self.index(x, y)
            .map(|i| self.cells[i].flags)
            .unwrap_or_else(CellFlags::empty)
    }
}
