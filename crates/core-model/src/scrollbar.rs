//! Vertical scrollbar geometry.
//!
//! * thumb height = `max(1, track² / total)` when `total > track`;
//!   0 (no thumb, nothing draggable) when everything fits.
//! * thumb top = `round(offset / max_offset * (track - thumb))`.
//! * dragging inverts the thumb-top mapping; clicking the track pages by 90%.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollbarHit {
    Above,
    Handle,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scrollbar {
    pub track: usize,
    pub total: usize,
    pub offset: usize,
    pub thumb_height: usize,
    pub thumb_top: usize,
}

impl Scrollbar {
    pub fn compute(total_rows: usize, track_height: usize, offset: usize) -> Self {
        if total_rows <= track_height || track_height == 0 {
            return Self {
                track: track_height,
                total: total_rows,
                offset: 0,
                thumb_height: 0,
                thumb_top: 0,
            };
        }
        let thumb_height = (track_height * track_height / total_rows).clamp(1, track_height);
        let max_offset = total_rows - track_height;
        let offset = offset.min(max_offset);
        let free = track_height - thumb_height;
        let thumb_top = ((offset as f64 / max_offset as f64) * free as f64).round() as usize;
        Self {
            track: track_height,
            total: total_rows,
            offset,
            thumb_height,
            thumb_top: thumb_top.min(free),
        }
    }

    pub fn visible(&self) -> bool {
        self.thumb_height > 0
    }

    pub fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.track)
    }

    /// Classify a track row. `None` when there is no thumb.
    pub fn hit_test(&self, row: usize) -> Option<ScrollbarHit> {
        if !self.visible() || row >= self.track {
            return None;
        }
        Some(if row < self.thumb_top {
            ScrollbarHit::Above
        } else if row < self.thumb_top + self.thumb_height {
            ScrollbarHit::Handle
        } else {
            ScrollbarHit::Below
        })
    }

    /// Scroll offset that puts the thumb top at `top` (inverse of `compute`).
    pub fn offset_for_thumb_top(&self, top: usize) -> usize {
        let free = self.track.saturating_sub(self.thumb_height);
        if free == 0 {
            return 0;
        }
        let top = top.min(free);
        ((top as f64 / free as f64) * self.max_offset() as f64).round() as usize
    }

    /// Rows moved by a track click.
    pub fn page(&self) -> usize {
        (self.track * 9 / 10).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_thumb_when_content_fits() {
        let sb = Scrollbar::compute(10, 10, 0);
        assert_eq!(sb.thumb_height, 0);
        assert!(!sb.visible());
        assert_eq!(sb.hit_test(3), None);
        assert_eq!(Scrollbar::compute(3, 10, 5).thumb_height, 0);
    }

    #[test]
    fn thumb_size_and_position() {
        let sb = Scrollbar::compute(100, 10, 0);
        assert_eq!(sb.thumb_height, 1);
        assert_eq!(sb.thumb_top, 0);
        let sb = Scrollbar::compute(40, 20, 20);
        assert_eq!(sb.thumb_height, 10);
        assert_eq!(sb.thumb_top, 10);
        let sb = Scrollbar::compute(40, 20, 10);
        assert_eq!(sb.thumb_top, 5);
    }

    #[test]
    fn hit_test_regions() {
        let sb = Scrollbar::compute(40, 20, 10);
        assert_eq!(sb.hit_test(4), Some(ScrollbarHit::Above));
        assert_eq!(sb.hit_test(5), Some(ScrollbarHit::Handle));
        assert_eq!(sb.hit_test(14), Some(ScrollbarHit::Handle));
        assert_eq!(sb.hit_test(15), Some(ScrollbarHit::Below));
        assert_eq!(sb.hit_test(20), None);
    }

    #[test]
    fn drag_inverse_round_trips_thumb_top() {
        let sb = Scrollbar::compute(200, 20, 0);
        for top in 0..=(sb.track - sb.thumb_height) {
            let off = sb.offset_for_thumb_top(top);
            assert_eq!(Scrollbar::compute(200, 20, off).thumb_top, top);
        }
        assert_eq!(sb.page(), 18);
    }
}
