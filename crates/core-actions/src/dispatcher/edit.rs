//! Text edit action handling.
//!
//! Every edit that finds a non-empty selection replaces it: the selection is
//! removed first (inside the same undo step), then the edit applies at the
//! join point. Multi-line selection removal is a single bulk splice in
//! `Buffer::remove_range`.

use std::ops::Range;

use core_model::EditorModel;
use core_state::{EditorState, OpKind};
use core_text::motion::{word_backward, word_forward};
use core_text::{Position, normalize_newlines};
use tracing::trace;

use super::{DispatchEnv, DispatchResult};
use crate::EditKind;

/// Remove the selection (if any) and land the cursor on the join point.
pub(crate) fn delete_selection(state: &mut EditorState) -> bool {
    let Some((start, end)) = state.selection_range() else {
        state.selection = None;
        return false;
    };
    state.buffer.remove_range(start, end);
    state.cursor = start;
    state.selection = None;
    true
}

/// Record, mutate, notify. Callers filter out no-op edits before calling.
pub(crate) fn apply_edit<F>(
    model: &mut EditorModel,
    env: &DispatchEnv<'_>,
    kind: OpKind,
    f: F,
) -> DispatchResult
where
    F: FnOnce(&mut EditorState),
{
    let state = &mut model.state;
    let lines_before = state.buffer.line_count();
    let (lo, hi) = match state.selection_range() {
        Some((s, e)) => (s.line.min(state.cursor.line), e.line.max(state.cursor.line)),
        None => (state.cursor.line, state.cursor.line),
    };
    state.record_undo_at(kind, env.now);
    f(state);
    state.preferred_x = None;
    state.follow_cursor = true;
    let lines_after = state.buffer.line_count();
    trace!(target: "actions.dispatch", ?kind, line = state.cursor.line, column = state.cursor.column, "edit");
    if lines_after == lines_before {
        let range: Range<usize> = lo.min(state.cursor.line)..hi.max(state.cursor.line) + 1;
        model.buffer_changed(Some(range));
    } else {
        // One contiguous span changed; pad it by a line each side for joins.
        let at = lo.min(state.cursor.line).saturating_sub(1);
        let end = (hi + 2 + lines_before.saturating_sub(lines_after)).min(lines_before);
        let removed = end - at;
        let inserted = (removed + lines_after).saturating_sub(lines_before);
        model.lines_replaced(at, removed, inserted);
    }
    DispatchResult::dirty()
}

/// Insert (normalized) text at the cursor, replacing any selection.
pub(crate) fn insert_text(
    model: &mut EditorModel,
    env: &DispatchEnv<'_>,
    kind: OpKind,
    text: &str,
) -> DispatchResult {
    let text = normalize_newlines(text);
    if text.is_empty() && model.state.selection_range().is_none() {
        return DispatchResult::clean();
    }
    apply_edit(model, env, kind, |st| {
        delete_selection(st);
        st.cursor = st.buffer.insert_text(st.cursor, &text);
    })
}

pub(crate) fn handle_edit(
    kind: EditKind,
    model: &mut EditorModel,
    env: &DispatchEnv<'_>,
) -> DispatchResult {
    let has_sel = model.state.selection_range().is_some();
    match kind {
        EditKind::InsertChar(c) => {
            let op = if has_sel { OpKind::Replace } else { OpKind::Insert };
            apply_edit(model, env, op, |st| {
                delete_selection(st);
                st.cursor = st.buffer.insert_char(st.cursor, c);
            })
        }
        EditKind::InsertText(text) => insert_text(model, env, OpKind::Paste, &text),
        EditKind::Newline => apply_edit(model, env, OpKind::Newline, |st| {
            delete_selection(st);
            st.cursor = st.buffer.split_line(st.cursor);
        }),
        EditKind::Tab => {
            let spaces = " ".repeat(env.config.tab_width.max(1));
            let op = if has_sel { OpKind::Replace } else { OpKind::Insert };
            apply_edit(model, env, op, |st| {
                delete_selection(st);
                st.cursor = st.buffer.insert_text(st.cursor, &spaces);
            })
        }
        EditKind::Backspace => {
            if has_sel {
                return apply_edit(model, env, OpKind::DeleteSelection, |st| {
                    delete_selection(st);
                });
            }
            if model.state.cursor == Position::origin() {
                return DispatchResult::clean();
            }
            apply_edit(model, env, OpKind::Backspace, |st| {
                st.cursor = st.buffer.delete_char_before(st.cursor);
            })
        }
        EditKind::Delete => {
            if has_sel {
                return apply_edit(model, env, OpKind::DeleteSelection, |st| {
                    delete_selection(st);
                });
            }
            if model.state.cursor == model.state.buffer.end() {
                return DispatchResult::clean();
            }
            apply_edit(model, env, OpKind::Delete, |st| {
                st.buffer.delete_char_at(st.cursor);
            })
        }
        EditKind::DeleteWordBackward | EditKind::DeleteWordForward => {
            if has_sel {
                return apply_edit(model, env, OpKind::DeleteSelection, |st| {
                    delete_selection(st);
                });
            }
            let cursor = model.state.cursor;
            let target = if kind == EditKind::DeleteWordBackward {
                word_backward(&model.state.buffer, cursor)
            } else {
                word_forward(&model.state.buffer, cursor)
            };
            if target == cursor {
                return DispatchResult::clean();
            }
            apply_edit(model, env, OpKind::DeleteWord, |st| {
                st.buffer.remove_range(cursor, target);
                st.cursor = cursor.min(target);
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Harness, mk_model};
    use crate::{Action, EditKind};
    use core_state::Selection;
    use core_text::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn typing_inserts_and_marks_dirty() {
        let mut m = mk_model(&[""]);
        let mut h = Harness::new();
        for c in "héllo".chars() {
            h.run(&mut m, Action::Edit(EditKind::InsertChar(c)));
        }
        assert_eq!(m.state.buffer.lines(), &["héllo"]);
        assert_eq!(m.state.cursor, Position::new(0, 5));
        assert!(m.state.is_dirty());
    }

    #[test]
    fn newline_splits_and_backspace_joins() {
        let mut m = mk_model(&["abcd"]);
        let mut h = Harness::new();
        m.state.cursor = Position::new(0, 2);
        h.run(&mut m, Action::Edit(EditKind::Newline));
        assert_eq!(m.state.buffer.lines(), &["ab", "cd"]);
        assert_eq!(m.state.cursor, Position::new(1, 0));
        h.run(&mut m, Action::Edit(EditKind::Backspace));
        assert_eq!(m.state.buffer.lines(), &["abcd"]);
        assert_eq!(m.state.cursor, Position::new(0, 2));
        assert!(!m.state.is_dirty());
    }

    #[test]
    fn multi_line_selection_delete_splices_prefix_and_suffix() {
        let mut m = mk_model(&["zero", "one", "alpha", "beta", "gamma", "five"]);
        let mut h = Harness::new();
        m.state.selection = Some(Selection::range(Position::new(2, 3), Position::new(4, 2)));
        m.state.cursor = Position::new(4, 2);
        h.run(&mut m, Action::Edit(EditKind::Delete));
        assert_eq!(m.state.buffer.line_count(), 4);
        assert_eq!(m.state.buffer.lines(), &["zero", "one", "alpmma", "five"]);
        assert_eq!(m.state.cursor, Position::new(2, 3));
        assert_eq!(m.state.selection, None);
    }

    #[test]
    fn typing_replaces_selection() {
        let mut m = mk_model(&["hello world"]);
        let mut h = Harness::new();
        m.state.selection = Some(Selection::range(Position::new(0, 6), Position::new(0, 11)));
        h.run(&mut m, Action::Edit(EditKind::InsertChar('W')));
        assert_eq!(m.state.buffer.lines(), &["hello W"]);
    }

    #[test]
    fn word_deletes_share_classifier() {
        let mut m = mk_model(&["foo.bar  baz"]);
        let mut h = Harness::new();
        m.state.cursor = Position::new(0, 12);
        h.run(&mut m, Action::Edit(EditKind::DeleteWordBackward));
        assert_eq!(m.state.buffer.lines(), &["foo.bar  "]);
        h.run(&mut m, Action::Edit(EditKind::DeleteWordBackward));
        assert_eq!(m.state.buffer.lines(), &["foo."]);
        m.state.cursor = Position::origin();
        h.run(&mut m, Action::Edit(EditKind::DeleteWordForward));
        assert_eq!(m.state.buffer.lines(), &["."]);
    }

    #[test]
    fn tab_inserts_configured_spaces() {
        let mut m = mk_model(&["x"]);
        let mut h = Harness::new();
        h.config.tab_width = 2;
        h.run(&mut m, Action::Edit(EditKind::Tab));
        assert_eq!(m.state.buffer.lines(), &["  x"]);
    }

    #[test]
    fn bracketed_paste_normalizes_newlines() {
        let mut m = mk_model(&["ab"]);
        let mut h = Harness::new();
        m.state.cursor = Position::new(0, 1);
        h.run(&mut m, Action::Edit(EditKind::InsertText("1\r\n2\r3".into())));
        assert_eq!(m.state.buffer.lines(), &["a1", "2", "3b"]);
        assert_eq!(m.state.cursor, Position::new(2, 1));
    }

    #[test]
    fn no_op_edits_record_nothing() {
        let mut m = mk_model(&["a"]);
        let mut h = Harness::new();
        let r = h.run(&mut m, Action::Edit(EditKind::Backspace));
        assert!(!r.dirty);
        m.state.cursor = Position::new(0, 1);
        h.run(&mut m, Action::Edit(EditKind::Delete));
        assert_eq!(m.state.undo.undo_depth(), 0);
    }

    #[test]
    fn line_count_changes_keep_layout_in_step_with_buffer() {
        let lines: Vec<String> = (0..30)
            .map(|i| format!("line {i} ").repeat(i % 5 * 3 + 1))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut m = mk_model(&refs);
        let mut h = Harness::new();
        let assert_fresh = |m: &core_model::EditorModel| {
            let mut fresh = core_model::LayoutCache::new();
            fresh.ensure(&m.state.buffer, m.text_width());
            assert_eq!(m.layout.rows(), fresh.rows());
        };
        m.state.cursor = Position::new(12, 3);
        h.run(&mut m, Action::Edit(EditKind::Newline));
        assert!(m.layout.last_rewrapped() <= 4);
        assert_fresh(&m);
        h.run(&mut m, Action::Edit(EditKind::Backspace));
        assert!(m.layout.last_rewrapped() <= 4);
        assert_fresh(&m);
        m.state.cursor = Position::new(20, m.state.buffer.line_len(20));
        h.run(&mut m, Action::Edit(EditKind::Delete));
        assert_fresh(&m);
        m.state.cursor = Position::new(5, 2);
        h.run(&mut m, Action::Edit(EditKind::InsertText("x\ny\nz".into())));
        assert_fresh(&m);
        m.state.selection = Some(Selection::anchored(Position::new(3, 1)));
        m.state.cursor = Position::new(9, 4);
        m.state.update_selection();
        h.run(&mut m, Action::Edit(EditKind::Backspace));
        assert_eq!(m.state.cursor, Position::new(3, 1));
        assert_fresh(&m);
    }
}
