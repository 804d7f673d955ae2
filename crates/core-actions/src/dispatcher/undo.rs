//! Undo / Redo dispatch.

use core_model::EditorModel;
use core_state::MessageKind;

use super::{DispatchEnv, DispatchResult, notify};

pub(crate) fn handle_undo(model: &mut EditorModel, env: &DispatchEnv<'_>) -> DispatchResult {
    if model.state.undo() {
        tracing::trace!(target: "actions.dispatch", op = "undo", undo_depth = model.state.undo.undo_depth(), "undo");
        model.state.follow_cursor = true;
        model.buffer_changed(None);
        DispatchResult::dirty()
    } else {
        notify(model, env, MessageKind::Info, "Nothing to undo".into());
        DispatchResult::dirty()
    }
}

pub(crate) fn handle_redo(model: &mut EditorModel, env: &DispatchEnv<'_>) -> DispatchResult {
    if model.state.redo() {
        tracing::trace!(target: "actions.dispatch", op = "redo", redo_depth = model.state.undo.redo_depth(), "redo");
        model.state.follow_cursor = true;
        model.buffer_changed(None);
        DispatchResult::dirty()
    } else {
        notify(model, env, MessageKind::Info, "Nothing to redo".into());
        DispatchResult::dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Harness, mk_model};
    use crate::{Action, EditKind};
    use core_text::Position;
    use pretty_assertions::assert_eq;

    fn type_char(h: &mut Harness, m: &mut core_model::EditorModel, c: char) {
        h.run(m, Action::Edit(EditKind::InsertChar(c)));
    }

    #[test]
    fn fast_typing_undoes_as_one_step() {
        let mut m = mk_model(&[""]);
        let mut h = Harness::new();
        type_char(&mut h, &mut m, 'a');
        h.advance(100);
        type_char(&mut h, &mut m, 'b');
        h.advance(100);
        type_char(&mut h, &mut m, 'c');
        assert_eq!(m.state.buffer.lines(), &["abc"]);
        h.run(&mut m, Action::Undo);
        assert_eq!(m.state.buffer.lines(), &[""]);
        assert_eq!(m.state.cursor, Position::origin());
    }

    #[test]
    fn pause_splits_undo_steps() {
        let mut m = mk_model(&[""]);
        let mut h = Harness::new();
        type_char(&mut h, &mut m, 'a');
        h.advance(600);
        type_char(&mut h, &mut m, 'b');
        h.run(&mut m, Action::Undo);
        assert_eq!(m.state.buffer.lines(), &["a"]);
        h.run(&mut m, Action::Undo);
        assert_eq!(m.state.buffer.lines(), &[""]);
    }

    #[test]
    fn redo_reapplies_and_new_edit_clears_redo() {
        let mut m = mk_model(&["x"]);
        let mut h = Harness::new();
        m.state.cursor = Position::new(0, 1);
        h.run(&mut m, Action::Edit(EditKind::Newline));
        h.run(&mut m, Action::Undo);
        assert_eq!(m.state.buffer.lines(), &["x"]);
        assert!(!m.state.is_dirty());
        h.run(&mut m, Action::Redo);
        assert_eq!(m.state.buffer.lines(), &["x", ""]);
        h.run(&mut m, Action::Undo);
        type_char(&mut h, &mut m, 'y');
        h.run(&mut m, Action::Redo);
        assert_eq!(m.state.buffer.lines(), &["xy"]);
        assert!(m.state.ephemeral_status.is_some());
    }
}
