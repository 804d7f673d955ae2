//! Single-line editable field used by the find query and the save-as prompt.
//!
//! Carries its own cursor and selection anchor, independent of the document.
//! Columns are scalar indices.

use core_text::{byte_offset, char_len};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
    anchor: Option<usize>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field seeded with `text`, cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: char_len(text),
            anchor: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Ordered selected scalar range, if non-empty.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let a = self.anchor?;
        if a == self.cursor {
            return None;
        }
        Some((a.min(self.cursor), a.max(self.cursor)))
    }

    fn delete_selection(&mut self) -> bool {
        let Some((s, e)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        let bs = byte_offset(&self.text, s);
        let be = byte_offset(&self.text, e);
        self.text.replace_range(bs..be, "");
        self.cursor = s;
        self.anchor = None;
        true
    }

    /// Insert text (newlines are dropped) replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        let clean: String = s.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let at = byte_offset(&self.text, self.cursor);
        self.text.insert_str(at, &clean);
        self.cursor += char_len(&clean);
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() || self.cursor == 0 {
            return;
        }
        let s = byte_offset(&self.text, self.cursor - 1);
        let e = byte_offset(&self.text, self.cursor);
        self.text.replace_range(s..e, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.delete_selection() || self.cursor >= self.len() {
            return;
        }
        let s = byte_offset(&self.text, self.cursor);
        let e = byte_offset(&self.text, self.cursor + 1);
        self.text.replace_range(s..e, "");
    }

    fn move_to(&mut self, col: usize, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = col.min(self.len());
    }

    pub fn left(&mut self, extend: bool) {
        if !extend && let Some((s, _)) = self.selection() {
            self.move_to(s, false);
            return;
        }
        self.move_to(self.cursor.saturating_sub(1), extend);
    }

    pub fn right(&mut self, extend: bool) {
        if !extend && let Some((_, e)) = self.selection() {
            self.move_to(e, false);
            return;
        }
        self.move_to(self.cursor + 1, extend);
    }

    pub fn home(&mut self, extend: bool) {
        self.move_to(0, extend);
    }

    pub fn end(&mut self, extend: bool) {
        self.move_to(self.len(), extend);
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.len();
    }
}
