//! Actions and their dispatch.
//!
//! Input flows `InputEvent` → [`translate`] → [`Action`] → [`dispatch`]. The
//! translator is pure: it only looks at the event and the current input
//! context (editing, find, save prompt). All mutation happens in the
//! dispatcher, against the single `EditorModel` passed by `&mut`.

mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use dispatcher::{DispatchEnv, DispatchResult, dispatch};
pub use io_ops::{SaveError, save_atomic};
pub use key_translator::{InputContext, context_of, translate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    WordLeft,
    WordRight,
    PageUp,
    PageDown,
    DocStart,
    DocEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    /// Bracketed paste payload from the terminal.
    InsertText(String),
    Newline,
    Tab,
    Backspace,
    Delete,
    DeleteWordBackward,
    DeleteWordForward,
}

/// Editing keys shared by the find query and the save-as prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Insert(String),
    Backspace,
    Delete,
    Left { extend: bool },
    Right { extend: bool },
    Home { extend: bool },
    End { extend: bool },
    SelectAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindAction {
    Open,
    Edit(FieldEdit),
    Next,
    Prev,
    Accept,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    Edit(FieldEdit),
    Submit,
    Cancel,
}

/// Pointer input in screen cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Press { col: u16, row: u16, extend: bool },
    Drag { col: u16, row: u16 },
    Release { col: u16, row: u16 },
    /// Wheel notches; negative scrolls up.
    Wheel(isize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move { motion: Motion, extend: bool },
    Edit(EditKind),
    SelectAll,
    ClearSelection,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    Find(FindAction),
    Prompt(PromptAction),
    Save,
    Quit,
    Mouse(MouseAction),
    Resize(u16, u16),
}
