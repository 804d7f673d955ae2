//! Screen partition: one header row, the body, two footer rows (key hints and
//! status/prompt). Body columns are split into gutter, text, and one scrollbar
//! column on the right.

pub const HEADER_ROWS: u16 = 1;
pub const FOOTER_ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub cols: u16,
    pub rows: u16,
}

impl ScreenGeometry {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn body_top(&self) -> u16 {
        HEADER_ROWS.min(self.rows)
    }

    pub fn body_rows(&self) -> usize {
        self.rows.saturating_sub(HEADER_ROWS + FOOTER_ROWS) as usize
    }

    /// First footer row (key hints); the status row follows it.
    pub fn footer_top(&self) -> u16 {
        self.body_top() + self.body_rows() as u16
    }

    /// Line-number digits plus one separating space.
    pub fn gutter_width(&self, line_count: usize) -> usize {
        let digits = line_count.max(1).to_string().len();
        digits + 1
    }

    pub fn scrollbar_col(&self) -> u16 {
        self.cols.saturating_sub(1)
    }

    /// Columns available for wrapped text.
    pub fn text_width(&self, line_count: usize) -> usize {
        (self.cols as usize)
            .saturating_sub(self.gutter_width(line_count) + 1)
            .max(1)
    }

    /// Body row index for a screen row, if the row is inside the body.
    pub fn body_row_at(&self, screen_row: u16) -> Option<usize> {
        let top = self.body_top();
        if screen_row < top {
            return None;
        }
        let r = (screen_row - top) as usize;
        (r < self.body_rows()).then_some(r)
    }
}
