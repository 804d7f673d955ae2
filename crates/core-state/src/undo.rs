use std::collections::VecDeque;
use std::time::{Duration, Instant};

use core_text::Position;
use tracing::trace;

use crate::selection::Selection;

/// Default maximum number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 100;
/// Default window within which same-kind coalescable edits merge.
pub const COALESCE_WINDOW: Duration = Duration::from_millis(500);

/// Operation classification attached to every recorded snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Insert,
    Backspace,
    Delete,
    Newline,
    Paste,
    Cut,
    DeleteWord,
    DeleteSelection,
    Replace,
}

impl OpKind {
    /// Typing and backspacing bursts collapse into one undo step.
    pub fn is_coalescable(self) -> bool {
        matches!(self, OpKind::Insert | OpKind::Backspace)
    }
}

/// Immutable capture of everything undo restores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoSnapshot {
    pub lines: Vec<String>,
    pub cursor: Position,
    pub selection: Option<Selection>,
    pub scroll_top: usize,
}

pub struct UndoEngine {
    undo_stack: VecDeque<UndoSnapshot>,
    redo_stack: Vec<UndoSnapshot>,
    capacity: usize,
    window: Duration,
    /// Kind and time of the last recorded (or coalesced) operation.
    last: Option<(OpKind, Instant)>,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new(UNDO_HISTORY_MAX, COALESCE_WINDOW)
    }
}

impl UndoEngine {
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
            window,
            last: None,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Record the pre-mutation state for an operation of `kind` at `now`.
    ///
    /// `capture` is only invoked when a new entry is actually pushed; a
    /// coalesced edit reuses the entry taken at the start of its run. Returns
    /// true when a snapshot was pushed.
    pub fn record_at<F>(&mut self, kind: OpKind, now: Instant, capture: F) -> bool
    where
        F: FnOnce() -> UndoSnapshot,
    {
        if kind.is_coalescable()
            && let Some((last_kind, at)) = self.last
            && last_kind == kind
            && now.saturating_duration_since(at) < self.window
        {
            self.last = Some((kind, now));
            trace!(target: "state.undo", ?kind, undo_depth = self.undo_stack.len(), "coalesced");
            return false;
        }
        let snap = capture();
        self.undo_stack.push_back(snap);
        trace!(target: "state.undo", ?kind, undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "push_snapshot");
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
        self.last = Some((kind, now));
        true
    }

    /// Pop the latest undo entry, parking `current` on the redo stack.
    pub fn undo(&mut self, current: UndoSnapshot) -> Option<UndoSnapshot> {
        let prev = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        self.last = None;
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        Some(prev)
    }

    /// Pop the latest redo entry, parking `current` on the undo stack.
    pub fn redo(&mut self, current: UndoSnapshot) -> Option<UndoSnapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        self.last = None;
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_pop");
        Some(next)
    }

    /// Close the current coalescing run so the next edit starts a new undo step.
    pub fn break_run(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(text: &str) -> UndoSnapshot {
        UndoSnapshot {
            lines: vec![text.to_string()],
            cursor: Position::origin(),
            selection: None,
            scroll_top: 0,
        }
    }

    #[test]
    fn coalescable_kinds_merge_within_window() {
        let mut u = UndoEngine::default();
        let t0 = Instant::now();
        assert!(u.record_at(OpKind::Insert, t0, || snap("")));
        assert!(!u.record_at(OpKind::Insert, t0 + Duration::from_millis(200), || snap("a")));
        assert!(!u.record_at(OpKind::Insert, t0 + Duration::from_millis(400), || snap("ab")));
        assert_eq!(u.undo_depth(), 1);
        // Window slides from the previous keystroke, not the first.
        assert!(!u.record_at(OpKind::Insert, t0 + Duration::from_millis(850), || snap("abc")));
        assert!(u.record_at(OpKind::Insert, t0 + Duration::from_millis(1400), || snap("abcd")));
        assert_eq!(u.undo_depth(), 2);
    }

    #[test]
    fn kind_change_breaks_run() {
        let mut u = UndoEngine::default();
        let t0 = Instant::now();
        u.record_at(OpKind::Insert, t0, || snap(""));
        assert!(u.record_at(OpKind::Backspace, t0, || snap("a")));
        assert!(u.record_at(OpKind::Newline, t0, || snap("")));
        assert!(u.record_at(OpKind::Newline, t0, || snap("")));
        assert_eq!(u.undo_depth(), 4);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut u = UndoEngine::new(3, COALESCE_WINDOW);
        let t0 = Instant::now();
        for i in 0..5 {
            u.record_at(OpKind::Delete, t0, || snap(&i.to_string()));
        }
        assert_eq!(u.undo_depth(), 3);
        let mut cur = snap("x");
        let mut seen = Vec::new();
        while let Some(prev) = u.undo(cur.clone()) {
            seen.push(prev.lines[0].clone());
            cur = prev;
        }
        assert_eq!(seen, vec!["4", "3", "2"]);
    }

    #[test]
    fn new_record_clears_redo() {
        let mut u = UndoEngine::default();
        let t0 = Instant::now();
        u.record_at(OpKind::Delete, t0, || snap("a"));
        let prev = u.undo(snap("b"));
        assert_eq!(prev, Some(snap("a")));
        assert_eq!(u.redo_depth(), 1);
        u.record_at(OpKind::Delete, t0, || snap("a"));
        assert_eq!(u.redo_depth(), 0);
    }

    #[test]
    fn undo_breaks_coalescing_run() {
        let mut u = UndoEngine::default();
        let t0 = Instant::now();
        u.record_at(OpKind::Insert, t0, || snap(""));
        u.undo(snap("a"));
        assert!(u.record_at(OpKind::Insert, t0, || snap("")));
    }
}
