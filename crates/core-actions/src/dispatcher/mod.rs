//! Dispatcher applying `Action` to the editor model.
//!
//! Sub-modules:
//! * `motion`    - cursor movement and shift-extension
//! * `edit`      - text mutation (insert/delete/newline/word delete/paste text)
//! * `clipboard` - copy, cut, paste through the clipboard collaborator
//! * `find`      - incremental find mode
//! * `prompt`    - save, save-as prompt, quit confirmation
//! * `mouse`     - click/drag selection, wheel, scrollbar
//! * `undo`      - undo / redo
//!
//! Mutation protocol (every buffer-changing action):
//! 1. record an undo snapshot tagged with an `OpKind` (coalescing aware),
//! 2. mutate buffer / cursor / selection,
//! 3. call `EditorModel::buffer_changed` with the touched line range, or
//!    `None` when the line count changed.
//!
//! Handlers never read the clock; `DispatchEnv::now` is the only time source
//! so tests can drive coalescing and multi-click timing deterministically.

use std::time::Instant;

use core_config::Config;
use core_model::EditorModel;
use core_state::{Clipboard, MessageKind};
use tracing::trace;

use crate::Action;

mod clipboard;
mod edit;
mod find;
mod motion;
mod mouse;
mod prompt;
mod undo;

/// Collaborators and inputs a dispatch needs besides the model.
pub struct DispatchEnv<'a> {
    pub clipboard: &'a mut dyn Clipboard,
    pub config: &'a Config,
    pub now: Instant,
}

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// Geometry changed; the renderer must drop its previous frame.
    pub full_repaint: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            full_repaint: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            full_repaint: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            full_repaint: false,
        }
    }
    pub fn full_repaint() -> Self {
        Self {
            dirty: true,
            quit: false,
            full_repaint: true,
        }
    }
}

/// Short name for tracing. Payloads (typed text, pastes) are never logged.
fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Move { .. } => "move",
        Action::Edit(_) => "edit",
        Action::SelectAll => "select_all",
        Action::ClearSelection => "clear_selection",
        Action::Copy => "copy",
        Action::Cut => "cut",
        Action::Paste => "paste",
        Action::Undo => "undo",
        Action::Redo => "redo",
        Action::Find(_) => "find",
        Action::Prompt(_) => "prompt",
        Action::Save => "save",
        Action::Quit => "quit",
        Action::Mouse(_) => "mouse",
        Action::Resize(..) => "resize",
    }
}

/// Apply an action. Returns whether a render is needed and whether to exit.
pub fn dispatch(
    action: Action,
    model: &mut EditorModel,
    env: &mut DispatchEnv<'_>,
) -> DispatchResult {
    trace!(target: "actions.dispatch", action = action_name(&action), "dispatch");
    if !matches!(action, Action::Quit) {
        model.state.quit_armed_until = None;
    }
    let result = match action {
        Action::Move { motion, extend } => motion::handle_motion(motion, extend, model),
        Action::Edit(kind) => edit::handle_edit(kind, model, env),
        Action::SelectAll => {
            let end = model.state.buffer.end();
            model.state.selection = Some(core_state::Selection::range(
                core_text::Position::origin(),
                end,
            ));
            model.state.cursor = end;
            model.state.follow_cursor = true;
            DispatchResult::dirty()
        }
        Action::ClearSelection => {
            if model.state.selection.take().is_some() {
                DispatchResult::dirty()
            } else {
                DispatchResult::clean()
            }
        }
        Action::Copy => clipboard::handle_copy(model, env),
        Action::Cut => clipboard::handle_cut(model, env),
        Action::Paste => clipboard::handle_paste(model, env),
        Action::Undo => undo::handle_undo(model, env),
        Action::Redo => undo::handle_redo(model, env),
        Action::Find(fa) => find::handle_find(fa, model),
        Action::Prompt(pa) => prompt::handle_prompt(pa, model, env),
        Action::Save => prompt::handle_save(model, env),
        Action::Quit => prompt::handle_quit(model, env),
        Action::Mouse(ma) => mouse::handle_mouse(ma, model, env),
        Action::Resize(cols, rows) => {
            model.resize(cols, rows);
            DispatchResult::full_repaint()
        }
    };
    model.sync();
    result
}

/// Put a status message in the footer.
pub(crate) fn notify(model: &mut EditorModel, env: &DispatchEnv<'_>, kind: MessageKind, text: String) {
    model.state.set_ephemeral_at(text, kind, env.now);
}
