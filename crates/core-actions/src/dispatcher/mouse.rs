//! Pointer handling: click/drag selection, wheel, scrollbar.
//!
//! Presses in the header or footer are ignored. A press on the scrollbar
//! column hit-tests the track (page up, grab the handle, page down); anywhere
//! else in the body it starts a selection whose mode comes from the click count.

use core_model::{EditorModel, ScrollbarHit};
use core_state::{DragKind, Selection};
use tracing::trace;

use super::{DispatchEnv, DispatchResult};
use crate::MouseAction;

fn body_offset(model: &EditorModel, row: u16) -> usize {
    (row as isize - model.geometry.body_top() as isize).max(0) as usize
}

fn press(model: &mut EditorModel, env: &DispatchEnv<'_>, col: u16, row: u16, extend: bool) -> DispatchResult {
    if model.state.save_prompt.is_some() {
        return DispatchResult::clean();
    }
    let Some(body_row) = model.geometry.body_row_at(row) else {
        return DispatchResult::clean();
    };
    if col == model.geometry.scrollbar_col() {
        let sb = model.scrollbar();
        if let Some(hit) = sb.hit_test(body_row) {
            trace!(target: "actions.mouse", ?hit, body_row, "scrollbar_press");
            match hit {
                ScrollbarHit::Above => model.scroll_by(-(sb.page() as isize)),
                ScrollbarHit::Below => model.scroll_by(sb.page() as isize),
                ScrollbarHit::Handle => {
                    model.state.drag = Some(DragKind::Scrollbar {
                        grab: body_row - sb.thumb_top,
                    });
                }
            }
            return DispatchResult::dirty();
        }
    }
    let Some(pos) = model.position_at_cell(col, row) else {
        return DispatchResult::clean();
    };
    if model.state.find.take().is_some() {
        trace!(target: "actions.mouse", "find_accepted_by_click");
    }
    model.state.undo.break_run();
    let clicks = model
        .state
        .clicks
        .register_at((col, row), env.now, env.config.multi_click_window);
    let st = &mut model.state;
    if extend && clicks == 1 {
        let mut sel = st
            .selection
            .unwrap_or_else(|| Selection::anchored(st.cursor));
        sel.drag_to(&st.buffer, pos);
        st.selection = Some(sel);
        st.cursor = sel.end;
    } else {
        let sel = Selection::press(&st.buffer, pos, clicks);
        st.cursor = sel.end;
        st.selection = Some(sel);
    }
    st.drag = Some(DragKind::Text);
    st.preferred_x = None;
    st.follow_cursor = true;
    DispatchResult::dirty()
}

fn drag(model: &mut EditorModel, col: u16, row: u16) -> DispatchResult {
    match model.state.drag {
        Some(DragKind::Text) => {
            let pos = model.position_at_screen(col, row);
            let st = &mut model.state;
            if let Some(sel) = &mut st.selection {
                sel.drag_to(&st.buffer, pos);
                st.cursor = sel.end;
            }
            st.follow_cursor = true;
            DispatchResult::dirty()
        }
        Some(DragKind::Scrollbar { grab }) => {
            let sb = model.scrollbar();
            let top = body_offset(model, row).saturating_sub(grab);
            model.state.scroll_top = sb.offset_for_thumb_top(top);
            DispatchResult::dirty()
        }
        None => DispatchResult::clean(),
    }
}

fn release(model: &mut EditorModel, col: u16, row: u16) -> DispatchResult {
    match model.state.drag.take() {
        Some(DragKind::Text) => {
            let pos = model.position_at_screen(col, row);
            let st = &mut model.state;
            if let Some(mut sel) = st.selection.take() {
                sel.drag_to(&st.buffer, pos);
                st.cursor = sel.end;
                st.selection = sel.release();
            }
            DispatchResult::dirty()
        }
        Some(DragKind::Scrollbar { .. }) => DispatchResult::dirty(),
        None => DispatchResult::clean(),
    }
}

pub(crate) fn handle_mouse(
    action: MouseAction,
    model: &mut EditorModel,
    env: &DispatchEnv<'_>,
) -> DispatchResult {
    match action {
        MouseAction::Press { col, row, extend } => press(model, env, col, row, extend),
        MouseAction::Drag { col, row } => drag(model, col, row),
        MouseAction::Release { col, row } => release(model, col, row),
        MouseAction::Wheel(notches) => {
            let before = model.state.scroll_top;
            model.scroll_by(notches * env.config.wheel_rows as isize);
            if model.state.scroll_top == before {
                DispatchResult::clean()
            } else {
                DispatchResult::dirty()
            }
        }
    }
}
