//! Copy / cut / paste through the clipboard collaborator.
//!
//! Clipboard failures never interrupt editing: the error becomes a warning in
//! the footer and the in-session copy (`EditorState::session_clipboard`) keeps
//! copy and paste working inside this process.

use core_model::EditorModel;
use core_state::{ClipboardError, MessageKind, OpKind};
use core_text::Position;
use tracing::{trace, warn};

use super::edit::{apply_edit, delete_selection, insert_text};
use super::{DispatchEnv, DispatchResult, notify};

fn report(model: &mut EditorModel, env: &DispatchEnv<'_>, err: &ClipboardError) {
    warn!(target: "actions.clipboard", error = %err, "clipboard_failed");
    notify(model, env, MessageKind::Warning, format!("{err}; using session clipboard"));
}

/// Hand `text` to the clipboard, remembering it for the session either way.
fn store(model: &mut EditorModel, env: &mut DispatchEnv<'_>, text: String) -> bool {
    trace!(target: "actions.clipboard", len = text.len(), "copy");
    let res = env.clipboard.copy(&text);
    model.state.session_clipboard = Some(text);
    match res {
        Ok(()) => true,
        Err(e) => {
            report(model, env, &e);
            false
        }
    }
}

pub(crate) fn handle_copy(model: &mut EditorModel, env: &mut DispatchEnv<'_>) -> DispatchResult {
    let Some(text) = model.state.selected_text() else {
        return DispatchResult::clean();
    };
    let n = text.chars().count();
    if store(model, env, text) {
        notify(model, env, MessageKind::Info, format!("Copied {n} chars"));
    }
    DispatchResult::dirty()
}

pub(crate) fn handle_cut(model: &mut EditorModel, env: &mut DispatchEnv<'_>) -> DispatchResult {
    if let Some(text) = model.state.selected_text() {
        store(model, env, text);
        return apply_edit(model, env, OpKind::Cut, |st| {
            delete_selection(st);
        });
    }
    // Nothing selected: cut the cursor's whole line.
    let buf = &model.state.buffer;
    let line = model.state.cursor.line;
    let count = buf.line_count();
    let len = buf.line_len(line);
    if count == 1 && len == 0 {
        return DispatchResult::clean();
    }
    let text = format!("{}\n", buf.line(line).unwrap_or_default());
    let (start, end) = if line + 1 < count {
        (Position::new(line, 0), Position::new(line + 1, 0))
    } else if line > 0 {
        (Position::new(line - 1, buf.line_len(line - 1)), Position::new(line, len))
    } else {
        (Position::new(line, 0), Position::new(line, len))
    };
    store(model, env, text);
    apply_edit(model, env, OpKind::Cut, |st| {
        st.selection = None;
        st.buffer.remove_range(start, end);
        st.cursor = Position::new(start.line, 0);
    })
}

pub(crate) fn handle_paste(model: &mut EditorModel, env: &mut DispatchEnv<'_>) -> DispatchResult {
    let text = match env.clipboard.paste() {
        Ok(Some(t)) => Some(t),
        Ok(None) => model.state.session_clipboard.clone(),
        Err(e) => {
            report(model, env, &e);
            model.state.session_clipboard.clone()
        }
    };
    let Some(text) = text else {
        notify(model, env, MessageKind::Info, "Clipboard is empty".into());
        return DispatchResult::dirty();
    };
    trace!(target: "actions.clipboard", len = text.len(), "paste");
    insert_text(model, env, OpKind::Paste, &text)
}
