//! Incremental find mode.
//!
//! While `EditorState::find` is present, the current match is mirrored as the
//! document selection with the cursor on its end, so the viewport follows it.
//! A query with no matches puts the pre-find cursor and selection back.

use core_model::EditorModel;
use core_state::{FindState, SavedView, Selection, TextField};
use tracing::debug;

use super::DispatchResult;
use crate::{FieldEdit, FindAction};

/// Apply a footer-field edit. Shared with the save-as prompt.
pub(crate) fn apply_field_edit(field: &mut TextField, edit: FieldEdit) {
    match edit {
        FieldEdit::Insert(s) => field.insert_str(&s),
        FieldEdit::Backspace => field.backspace(),
        FieldEdit::Delete => field.delete(),
        FieldEdit::Left { extend } => field.left(extend),
        FieldEdit::Right { extend } => field.right(extend),
        FieldEdit::Home { extend } => field.home(extend),
        FieldEdit::End { extend } => field.end(extend),
        FieldEdit::SelectAll => field.select_all(),
    }
}

fn select_current(model: &mut EditorModel) {
    let st = &mut model.state;
    let Some(find) = &st.find else { return };
    match find.current_match() {
        Some(m) => {
            st.selection = Some(Selection::range(m.start(), m.end()));
            st.cursor = m.end();
        }
        None => {
            st.cursor = find.saved.cursor;
            st.selection = find.saved.selection;
        }
    }
    st.preferred_x = None;
    st.follow_cursor = true;
}

fn open(model: &mut EditorModel) {
    let st = &mut model.state;
    let seed = match st.selection_range() {
        Some((s, e)) if s.line == e.line => st.selected_text().unwrap_or_default(),
        _ => String::new(),
    };
    let saved = SavedView {
        cursor: st.cursor,
        selection: st.selection,
        scroll_top: st.scroll_top,
    };
    let mut find = FindState::new(saved, &seed);
    find.recompute(&st.buffer);
    debug!(target: "actions.find", seeded = !seed.is_empty(), matches = find.matches.len(), "find_open");
    st.find = Some(find);
    if !seed.is_empty() {
        select_current(model);
    }
}

pub(crate) fn handle_find(action: FindAction, model: &mut EditorModel) -> DispatchResult {
    if model.state.find.is_none() {
        if action != FindAction::Open {
            return DispatchResult::clean();
        }
        open(model);
        return DispatchResult::dirty();
    }
    match action {
        FindAction::Open | FindAction::Accept => {
            model.state.find = None;
            debug!(target: "actions.find", "find_accept");
        }
        FindAction::Cancel => {
            if let Some(find) = model.state.find.take() {
                let st = &mut model.state;
                st.cursor = find.saved.cursor;
                st.selection = find.saved.selection;
                st.scroll_top = find.saved.scroll_top;
                st.preferred_x = None;
            }
            debug!(target: "actions.find", "find_cancel");
        }
        FindAction::Edit(edit) => {
            let st = &mut model.state;
            if let Some(find) = &mut st.find {
                apply_field_edit(&mut find.field, edit);
                find.recompute(&st.buffer);
            }
            select_current(model);
        }
        FindAction::Next => {
            if let Some(find) = &mut model.state.find {
                find.next();
            }
            select_current(model);
        }
        FindAction::Prev => {
            if let Some(find) = &mut model.state.find {
                find.prev();
            }
            select_current(model);
        }
    }
    DispatchResult::dirty()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Harness, mk_model};
    use crate::{Action, FieldEdit, FindAction, Motion};
    use core_text::Position;
    use pretty_assertions::assert_eq;

    fn typed(h: &mut Harness, m: &mut core_model::EditorModel, s: &str) {
        h.run(m, Action::Find(FindAction::Edit(FieldEdit::Insert(s.to_string()))));
    }

    #[test]
    fn typing_selects_first_match_and_next_wraps() {
        let mut m = mk_model(&["concatenate", "cat", "scatter"]);
        let mut h = Harness::new();
        h.run(&mut m, Action::Find(FindAction::Open));
        typed(&mut h, &mut m, "cat");
        assert_eq!(
            m.state.selection_range(),
            Some((Position::new(0, 3), Position::new(0, 6)))
        );
        h.run(&mut m, Action::Find(FindAction::Next));
        assert_eq!(m.state.cursor, Position::new(1, 3));
        h.run(&mut m, Action::Find(FindAction::Next));
        h.run(&mut m, Action::Find(FindAction::Next));
        assert_eq!(m.state.cursor, Position::new(0, 6));
        h.run(&mut m, Action::Find(FindAction::Prev));
        assert_eq!(m.state.cursor, Position::new(2, 4));
        assert_eq!(m.state.find.as_ref().map(|f| f.summary()), Some("3/3".to_string()));
    }

    #[test]
    fn cancel_restores_pre_find_view() {
        let mut m = mk_model(&["alpha", "beta", "alpha"]);
        let mut h = Harness::new();
        m.state.cursor = Position::new(1, 2);
        h.run(&mut m, Action::Find(FindAction::Open));
        typed(&mut h, &mut m, "alp");
        assert_eq!(m.state.cursor, Position::new(2, 3));
        h.run(&mut m, Action::Find(FindAction::Cancel));
        assert!(m.state.find.is_none());
        assert_eq!(m.state.cursor, Position::new(1, 2));
        assert_eq!(m.state.selection, None);
    }

    #[test]
    fn accept_keeps_match_selected() {
        let mut m = mk_model(&["one two"]);
        let mut h = Harness::new();
        h.run(&mut m, Action::Find(FindAction::Open));
        typed(&mut h, &mut m, "two");
        h.run(&mut m, Action::Find(FindAction::Accept));
        assert!(m.state.find.is_none());
        assert_eq!(m.state.selected_text().as_deref(), Some("two"));
    }

    #[test]
    fn no_match_restores_cursor_and_backspace_recovers() {
        let mut m = mk_model(&["hello"]);
        let mut h = Harness::new();
        h.run(&mut m, Action::Find(FindAction::Open));
        typed(&mut h, &mut m, "lx");
        assert_eq!(m.state.cursor, Position::origin());
        assert_eq!(m.state.selection, None);
        assert_eq!(m.state.find.as_ref().map(|f| f.summary()), Some("no matches".to_string()));
        h.run(&mut m, Action::Find(FindAction::Edit(FieldEdit::Backspace)));
        assert_eq!(m.state.selected_text().as_deref(), Some("l"));
    }

    #[test]
    fn single_line_selection_seeds_query() {
        let mut m = mk_model(&["foo bar foo"]);
        let mut h = Harness::new();
        h.run(&mut m, Action::Move { motion: Motion::WordRight, extend: true });
        h.run(&mut m, Action::Find(FindAction::Open));
        assert_eq!(m.state.find.as_ref().map(|f| f.query().to_string()), Some("foo".into()));
        assert_eq!(m.state.find.as_ref().map(|f| f.matches.len()), Some(2));
    }

    #[test]
    fn regex_error_is_shown_and_non_fatal() {
        let mut m = mk_model(&["abc"]);
        let mut h = Harness::new();
        h.run(&mut m, Action::Find(FindAction::Open));
        typed(&mut h, &mut m, "/[/");
        let summary = m.state.find.as_ref().map(|f| f.summary()).unwrap_or_default();
        assert!(summary.starts_with("regex:"), "{summary}");
        h.run(&mut m, Action::Find(FindAction::Edit(FieldEdit::SelectAll)));
        typed(&mut h, &mut m, "/b/");
        assert_eq!(m.state.selected_text().as_deref(), Some("b"));
    }
}
