//! Save, the save-as footer prompt, and quit confirmation.

use std::path::{Path, PathBuf};

use core_model::EditorModel;
use core_state::{MESSAGE_TTL, MessageKind, TextField};
use tracing::{info, warn};

use super::find::apply_field_edit;
use super::{DispatchEnv, DispatchResult, notify};
use crate::PromptAction;
use crate::io_ops::save_atomic;

fn save_to(model: &mut EditorModel, env: &DispatchEnv<'_>, path: &Path) -> bool {
    match save_atomic(path, &model.state.buffer) {
        Ok(bytes) => {
            model.state.mark_saved();
            let lines = model.state.buffer.line_count();
            info!(target: "io", bytes, lines, "save_ok");
            notify(
                model,
                env,
                MessageKind::Info,
                format!("Wrote {lines} lines to {}", path.display()),
            );
            true
        }
        Err(e) => {
            warn!(target: "io", error = %e, "save_failed");
            notify(model, env, MessageKind::Error, format!("Save failed: {e}"));
            false
        }
    }
}

pub(crate) fn handle_save(model: &mut EditorModel, env: &DispatchEnv<'_>) -> DispatchResult {
    match model.state.file_path.clone() {
        Some(path) => {
            save_to(model, env, &path);
        }
        None => {
            model.state.save_prompt = Some(TextField::new());
        }
    }
    DispatchResult::dirty()
}

pub(crate) fn handle_prompt(
    action: PromptAction,
    model: &mut EditorModel,
    env: &DispatchEnv<'_>,
) -> DispatchResult {
    let Some(field) = &mut model.state.save_prompt else {
        return DispatchResult::clean();
    };
    match action {
        PromptAction::Edit(edit) => apply_field_edit(field, edit),
        PromptAction::Cancel => {
            model.state.save_prompt = None;
            notify(model, env, MessageKind::Info, "Save cancelled".into());
        }
        PromptAction::Submit => {
            let name = field.text().trim().to_string();
            if name.is_empty() {
                model.state.save_prompt = None;
                notify(model, env, MessageKind::Info, "Save cancelled".into());
                return DispatchResult::dirty();
            }
            let path = PathBuf::from(name);
            // A failed save keeps the prompt open so the name can be corrected.
            if save_to(model, env, &path) {
                model.state.file_path = Some(path);
                model.state.save_prompt = None;
            }
        }
    }
    DispatchResult::dirty()
}

pub(crate) fn handle_quit(model: &mut EditorModel, env: &DispatchEnv<'_>) -> DispatchResult {
    let st = &mut model.state;
    let confirmed = st.quit_armed_until.is_some_and(|t| env.now < t);
    if !st.is_dirty() || confirmed {
        info!(target: "actions.dispatch", dirty = st.is_dirty(), "quit");
        st.should_quit = true;
        return DispatchResult::quit();
    }
    st.quit_armed_until = Some(env.now + MESSAGE_TTL);
    notify(
        model,
        env,
        MessageKind::Warning,
        "Unsaved changes! Press Ctrl-Q again to quit".into(),
    );
    DispatchResult::dirty()
}
