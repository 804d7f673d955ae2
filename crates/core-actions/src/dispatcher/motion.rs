//! Cursor movement.
//!
//! Horizontal motions work on logical columns; vertical motions move by
//! visual (wrapped) rows and keep a sticky display column in
//! `EditorState::preferred_x` until a non-vertical motion clears it.
//!
//! `extend` anchors a character selection at the pre-move cursor (when none is
//! active) and moves its live end with the cursor. A plain Left/Right on a
//! selection collapses it to the respective edge.
//!
//! Every motion closes the current typing run, so text typed after moving
//! undoes separately from text typed before.

use core_model::EditorModel;
use core_text::motion::{word_backward, word_forward};
use core_text::{Buffer, Position};
use tracing::trace;

use super::DispatchResult;
use crate::Motion;

fn left_of(buf: &Buffer, p: Position) -> Position {
    if p.column > 0 {
        Position::new(p.line, p.column - 1)
    } else if p.line > 0 {
        Position::new(p.line - 1, buf.line_len(p.line - 1))
    } else {
        p
    }
}

fn right_of(buf: &Buffer, p: Position) -> Position {
    if p.column < buf.line_len(p.line) {
        Position::new(p.line, p.column + 1)
    } else if p.line + 1 < buf.line_count() {
        Position::new(p.line + 1, 0)
    } else {
        p
    }
}

pub(crate) fn handle_motion(motion: Motion, extend: bool, model: &mut EditorModel) -> DispatchResult {
    let before = model.state.cursor;
    model.state.undo.break_run();
    if !extend
        && matches!(motion, Motion::Left | Motion::Right)
        && let Some((s, e)) = model.state.selection_range()
    {
        model.state.cursor = if motion == Motion::Left { s } else { e };
        model.state.selection = None;
        model.state.preferred_x = None;
        model.state.follow_cursor = true;
        return DispatchResult::dirty();
    }
    if extend && model.state.selection.is_none() {
        model.state.start_selection();
    }
    let vertical = matches!(
        motion,
        Motion::Up | Motion::Down | Motion::PageUp | Motion::PageDown
    );
    let page = model.body_rows().max(1) as isize;
    let buf = &model.state.buffer;
    let cursor = model.state.cursor;
    let target = match motion {
        Motion::Left => left_of(buf, cursor),
        Motion::Right => right_of(buf, cursor),
        Motion::LineStart => Position::new(cursor.line, 0),
        Motion::LineEnd => Position::new(cursor.line, buf.line_len(cursor.line)),
        Motion::WordLeft => word_backward(buf, cursor),
        Motion::WordRight => word_forward(buf, cursor),
        Motion::DocStart => Position::origin(),
        Motion::DocEnd => buf.end(),
        Motion::Up => model.vertical_target(-1),
        Motion::Down => model.vertical_target(1),
        Motion::PageUp => {
            model.scroll_by(-page);
            model.vertical_target(-page)
        }
        Motion::PageDown => {
            model.scroll_by(page);
            model.vertical_target(page)
        }
    };
    let st = &mut model.state;
    if !vertical {
        st.preferred_x = None;
    }
    st.cursor = st.buffer.clamp(target);
    if extend {
        st.update_selection();
    } else {
        st.selection = None;
    }
    st.follow_cursor = true;
    trace!(target: "actions.dispatch", ?motion, extend, from_line = before.line, from_col = before.column, to_line = st.cursor.line, to_col = st.cursor.column, "motion");
    DispatchResult::dirty()
}
