//! Editor state: the document buffer plus everything the dispatcher mutates.
//!
//! `EditorState` is a single value owned by the event loop and threaded through
//! every handler by exclusive `&mut`. Nothing in it is shared or locked.
//!
//! Invariants (hold after every dispatcher call):
//! * `cursor` is clamped into `buffer` (`0 <= line < line_count`,
//!   `0 <= column <= len(line)`).
//! * `selection`, when present, has both ends clamped into `buffer`. An empty
//!   selection may exist transiently during a drag; release clears it.
//! * `dirty == (buffer.content_hash() != saved_hash)` after every
//!   "buffer changed" notification.
//! * `find` exists only while find mode is active and is dropped on exit.
//!
//! Undo protocol: every mutation calls `record_undo_at` *before* touching the
//! buffer. Snapshots capture lines, cursor, selection and scroll offset; see
//! `undo` for coalescing rules.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use core_text::{Buffer, Position};

pub mod clipboard;
pub mod field;
pub mod find;
pub mod selection;
pub mod undo;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, UnavailableClipboard};
pub use field::TextField;
pub use find::{FindMatch, FindState, SavedView};
pub use selection::{Selection, SelectionMode, normalize};
pub use undo::{COALESCE_WINDOW, OpKind, UNDO_HISTORY_MAX, UndoEngine, UndoSnapshot};

/// Lifetime of a status-line message.
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// Ephemeral status message shown in the footer until `expires_at`.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub kind: MessageKind,
    pub expires_at: Instant,
}

/// What the left button is currently dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Text,
    /// Scrollbar handle, remembering the grab row relative to the thumb top.
    Scrollbar { grab: usize },
}

/// Counts consecutive presses on the same cell within a time window.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last: Option<((u16, u16), Instant)>,
    count: u8,
}

impl ClickTracker {
    /// Register a press at `cell` and return the click count (saturating at 3).
    pub fn register_at(&mut self, cell: (u16, u16), now: Instant, window: Duration) -> u8 {
        self.count = match self.last {
            Some((prev, at)) if prev == cell && now.saturating_duration_since(at) <= window => {
                (self.count + 1).min(3)
            }
            _ => 1,
        };
        self.last = Some((cell, now));
        self.count
    }
}

pub struct EditorState {
    pub buffer: Buffer,
    pub cursor: Position,
    /// Sticky display offset within a visual row for vertical movement.
    pub preferred_x: Option<usize>,
    pub selection: Option<Selection>,
    /// First visible visual row.
    pub scroll_top: usize,
    pub undo: UndoEngine,
    pub find: Option<FindState>,
    /// Save-as prompt, present while the footer is asking for a file name.
    pub save_prompt: Option<TextField>,
    pub ephemeral_status: Option<EphemeralMessage>,
    pub file_path: Option<PathBuf>,
    pub clicks: ClickTracker,
    pub drag: Option<DragKind>,
    /// Set by a first Ctrl-Q on a dirty buffer; a second press before this quits.
    pub quit_armed_until: Option<Instant>,
    pub should_quit: bool,
    /// Ask the viewport to scroll the cursor row into view on the next layout pass.
    pub follow_cursor: bool,
    /// In-session copy of the last copied text; used when the clipboard fails.
    pub session_clipboard: Option<String>,
    saved_hash: u64,
    dirty: bool,
}

impl EditorState {
    pub fn new(buffer: Buffer, file_path: Option<PathBuf>) -> Self {
        let saved_hash = buffer.content_hash();
        Self {
            buffer,
            cursor: Position::origin(),
            preferred_x: None,
            selection: None,
            scroll_top: 0,
            undo: UndoEngine::default(),
            find: None,
            save_prompt: None,
            ephemeral_status: None,
            file_path,
            clicks: ClickTracker::default(),
            drag: None,
            quit_armed_until: None,
            should_quit: false,
            follow_cursor: true,
            session_clipboard: None,
            saved_hash,
            dirty: false,
        }
    }

    /// Idempotent clamp of the cursor (and selection ends) into the buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor = self.buffer.clamp(self.cursor);
        if let Some(sel) = &mut self.selection {
            sel.start = self.buffer.clamp(sel.start);
            sel.end = self.buffer.clamp(sel.end);
        }
    }

    /// Anchor a character selection at the cursor.
    pub fn start_selection(&mut self) {
        self.selection = Some(Selection::anchored(self.cursor));
    }

    /// Move the live end of the selection to the cursor.
    pub fn update_selection(&mut self) {
        if let Some(sel) = &mut self.selection {
            sel.end = self.cursor;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Non-empty selection, document ordered.
    pub fn selection_range(&self) -> Option<(Position, Position)> {
        self.selection
            .filter(|s| !s.is_empty())
            .map(|s| s.normalized())
    }

    pub fn is_position_selected(&self, line: usize, column: usize) -> bool {
        self.selection.is_some_and(|s| s.contains(line, column))
    }

    pub fn selected_text(&self) -> Option<String> {
        let (s, e) = self.selection_range()?;
        Some(self.buffer.text_range(s, e))
    }

    pub fn snapshot(&self) -> UndoSnapshot {
        UndoSnapshot {
            lines: self.buffer.lines().to_vec(),
            cursor: self.cursor,
            selection: self.selection,
            scroll_top: self.scroll_top,
        }
    }

    /// Restore an undo/redo snapshot. The caller notifies "buffer changed".
    pub fn restore(&mut self, snap: UndoSnapshot) {
        self.buffer.replace_lines(snap.lines);
        self.cursor = snap.cursor;
        self.selection = snap.selection;
        self.scroll_top = snap.scroll_top;
        self.preferred_x = None;
        self.clamp_cursor();
    }

    /// Record the current state for an operation of `kind` (coalescing aware).
    pub fn record_undo_at(&mut self, kind: OpKind, now: Instant) -> bool {
        let Self {
            undo,
            buffer,
            cursor,
            selection,
            scroll_top,
            ..
        } = self;
        undo.record_at(kind, now, || UndoSnapshot {
            lines: buffer.lines().to_vec(),
            cursor: *cursor,
            selection: *selection,
            scroll_top: *scroll_top,
        })
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.undo.undo(current) {
            Some(prev) => {
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.undo.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Compare the buffer against the last saved content.
    pub fn recompute_dirty(&mut self) {
        self.dirty = self.buffer.content_hash() != self.saved_hash;
    }

    /// Adopt the current content as saved.
    pub fn mark_saved(&mut self) {
        self.saved_hash = self.buffer.content_hash();
        self.dirty = false;
    }

    pub fn set_ephemeral_at<S: Into<String>>(&mut self, msg: S, kind: MessageKind, now: Instant) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            kind,
            expires_at: now + MESSAGE_TTL,
        });
    }

    /// Clear an expired message; returns true if one was cleared.
    pub fn tick_ephemeral_at(&mut self, now: Instant) -> bool {
        if let Some(m) = &self.ephemeral_status
            && now >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }

    /// File name shown in the header.
    pub fn display_name(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(lines: &[&str]) -> EditorState {
        EditorState::new(
            Buffer::new(lines.iter().map(|s| s.to_string()).collect()),
            None,
        )
    }

    #[test]
    fn clamp_cursor_is_idempotent() {
        let mut s = st(&["abc", "de"]);
        s.cursor = Position::new(7, 9);
        s.clamp_cursor();
        assert_eq!(s.cursor, Position::new(1, 2));
        s.clamp_cursor();
        assert_eq!(s.cursor, Position::new(1, 2));
    }

    #[test]
    fn shift_style_selection_follows_cursor() {
        let mut s = st(&["abcdef"]);
        s.cursor = Position::new(0, 4);
        s.start_selection();
        s.cursor = Position::new(0, 1);
        s.update_selection();
        assert_eq!(s.selection_range(), Some((Position::new(0, 1), Position::new(0, 4))));
        assert_eq!(s.selected_text().as_deref(), Some("bcd"));
        assert!(s.is_position_selected(0, 3));
        assert!(!s.is_position_selected(0, 4));
    }

    #[test]
    fn dirty_tracks_saved_hash() {
        let mut s = st(&["x"]);
        assert!(!s.is_dirty());
        s.buffer.insert_char(Position::origin(), 'y');
        s.recompute_dirty();
        assert!(s.is_dirty());
        s.buffer.delete_char_at(Position::origin());
        s.recompute_dirty();
        assert!(!s.is_dirty());
        s.buffer.insert_char(Position::origin(), 'z');
        s.mark_saved();
        assert!(!s.is_dirty());
    }

    #[test]
    fn undo_restores_cursor_selection_and_scroll() {
        let mut s = st(&["hello"]);
        let t0 = Instant::now();
        s.cursor = Position::new(0, 5);
        s.scroll_top = 2;
        s.selection = Some(Selection::range(Position::new(0, 0), Position::new(0, 2)));
        s.record_undo_at(OpKind::Delete, t0);
        s.buffer.remove_range(Position::new(0, 0), Position::new(0, 2));
        s.cursor = Position::origin();
        s.selection = None;
        s.scroll_top = 0;
        assert!(s.undo());
        assert_eq!(s.buffer.lines(), &["hello"]);
        assert_eq!(s.cursor, Position::new(0, 5));
        assert_eq!(s.scroll_top, 2);
        assert!(s.selection.is_some());
        assert!(s.redo());
        assert_eq!(s.buffer.lines(), &["llo"]);
        assert!(!s.redo());
    }

    #[test]
    fn ephemeral_lifecycle() {
        let mut s = st(&[""]);
        let t0 = Instant::now();
        s.set_ephemeral_at("Saved", MessageKind::Info, t0);
        assert!(!s.tick_ephemeral_at(t0 + Duration::from_secs(1)));
        assert!(s.tick_ephemeral_at(t0 + MESSAGE_TTL));
        assert!(s.ephemeral_status.is_none());
    }

    #[test]
    fn click_tracker_counts_same_cell_presses() {
        let mut c = ClickTracker::default();
        let t0 = Instant::now();
        let w = Duration::from_millis(400);
        assert_eq!(c.register_at((3, 4), t0, w), 1);
        assert_eq!(c.register_at((3, 4), t0 + Duration::from_millis(100), w), 2);
        assert_eq!(c.register_at((3, 4), t0 + Duration::from_millis(200), w), 3);
        assert_eq!(c.register_at((3, 4), t0 + Duration::from_millis(300), w), 3);
        assert_eq!(c.register_at((4, 4), t0 + Duration::from_millis(350), w), 1);
        assert_eq!(c.register_at((4, 4), t0 + Duration::from_secs(2), w), 1);
    }

    #[test]
    fn display_name_defaults_to_untitled() {
        let mut s = st(&[""]);
        assert_eq!(s.display_name(), "untitled");
        s.file_path = Some(PathBuf::from("/tmp/notes.txt"));
        assert_eq!(s.display_name(), "notes.txt");
    }
}
