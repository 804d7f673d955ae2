//! Stateless input → `Action` translation.
//!
//! The same key means different things depending on which surface owns the
//! keyboard: the document, the find query, or the save-as prompt. The context
//! is derived from state (`context_of`), never stored here, so translation is a
//! pure function of `(event, context)`.
//!
//! Global chords (Ctrl-S, Ctrl-Q, Ctrl-Z/Y) behave the same in every context
//! except the prompt, where only field editing, Enter and Esc apply.

use core_events::{
    InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use core_state::EditorState;

use crate::{Action, EditKind, FieldEdit, FindAction, Motion, MouseAction, PromptAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    Editing,
    Find,
    Prompt,
}

pub fn context_of(state: &EditorState) -> InputContext {
    if state.save_prompt.is_some() {
        InputContext::Prompt
    } else if state.find.is_some() {
        InputContext::Find
    } else {
        InputContext::Editing
    }
}

pub fn translate(event: &InputEvent, ctx: InputContext) -> Option<Action> {
    match event {
        InputEvent::Key(key) => match ctx {
            InputContext::Editing => editing_key(key),
            InputContext::Find => find_key(key),
            InputContext::Prompt => prompt_key(key),
        },
        InputEvent::Mouse(m) => mouse(m),
        InputEvent::Paste(text) => Some(match ctx {
            InputContext::Editing => Action::Edit(EditKind::InsertText(text.clone())),
            InputContext::Find => Action::Find(FindAction::Edit(FieldEdit::Insert(text.clone()))),
            InputContext::Prompt => {
                Action::Prompt(PromptAction::Edit(FieldEdit::Insert(text.clone())))
            }
        }),
        InputEvent::Resize(cols, rows) => Some(Action::Resize(*cols, *rows)),
    }
}

/// Chords shared by the editing and find contexts.
fn global_chord(key: &KeyEvent) -> Option<Action> {
    if !key.ctrl_held() {
        return None;
    }
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    // Legacy encodings fold Shift into Ctrl-letter (0x1a for Ctrl-Z and
    // Ctrl-Shift-Z alike), so redo lives on Ctrl-Y alone.
    Some(match c.to_ascii_lowercase() {
        's' => Action::Save,
        'q' => Action::Quit,
        'z' => Action::Undo,
        'y' => Action::Redo,
        _ => return None,
    })
}

fn motion_for(key: &KeyEvent) -> Option<Motion> {
    let word = key.ctrl_held() || key.alt();
    Some(match key.code {
        KeyCode::Left if word => Motion::WordLeft,
        KeyCode::Right if word => Motion::WordRight,
        KeyCode::Left => Motion::Left,
        KeyCode::Right => Motion::Right,
        KeyCode::Up => Motion::Up,
        KeyCode::Down => Motion::Down,
        KeyCode::Home if key.ctrl_held() => Motion::DocStart,
        KeyCode::End if key.ctrl_held() => Motion::DocEnd,
        KeyCode::Home => Motion::LineStart,
        KeyCode::End => Motion::LineEnd,
        KeyCode::PageUp => Motion::PageUp,
        KeyCode::PageDown => Motion::PageDown,
        _ => return None,
    })
}

fn editing_key(key: &KeyEvent) -> Option<Action> {
    if let Some(a) = global_chord(key) {
        return Some(a);
    }
    if let Some(motion) = motion_for(key) {
        return Some(Action::Move {
            motion,
            extend: key.shift(),
        });
    }
    let edit = |k| Some(Action::Edit(k));
    match key.code {
        KeyCode::Char(c) if key.ctrl_held() => match c.to_ascii_lowercase() {
            'c' => Some(Action::Copy),
            'x' => Some(Action::Cut),
            'v' => Some(Action::Paste),
            'a' => Some(Action::SelectAll),
            'f' => Some(Action::Find(FindAction::Open)),
            'w' => edit(EditKind::DeleteWordBackward),
            _ => None,
        },
        KeyCode::Char('d') if key.alt() => edit(EditKind::DeleteWordForward),
        KeyCode::Char(_) if key.alt() => None,
        KeyCode::Char(c) => edit(EditKind::InsertChar(c)),
        KeyCode::Enter => edit(EditKind::Newline),
        KeyCode::Tab => edit(EditKind::Tab),
        KeyCode::Backspace if key.alt() || key.ctrl_held() => edit(EditKind::DeleteWordBackward),
        KeyCode::Backspace => edit(EditKind::Backspace),
        KeyCode::Delete if key.alt() || key.ctrl_held() => edit(EditKind::DeleteWordForward),
        KeyCode::Delete => edit(EditKind::Delete),
        KeyCode::Esc => Some(Action::ClearSelection),
        _ => None,
    }
}

/// Keys editing a footer field (find query or prompt).
fn field_edit(key: &KeyEvent) -> Option<FieldEdit> {
    let extend = key.shift();
    Some(match key.code {
        KeyCode::Char('a') if key.ctrl_held() => FieldEdit::SelectAll,
        KeyCode::Char(_) if key.ctrl_held() || key.alt() => return None,
        KeyCode::Char(c) => FieldEdit::Insert(c.to_string()),
        KeyCode::Backspace => FieldEdit::Backspace,
        KeyCode::Delete => FieldEdit::Delete,
        KeyCode::Left => FieldEdit::Left { extend },
        KeyCode::Right => FieldEdit::Right { extend },
        KeyCode::Home => FieldEdit::Home { extend },
        KeyCode::End => FieldEdit::End { extend },
        _ => return None,
    })
}

fn find_key(key: &KeyEvent) -> Option<Action> {
    let find = |a| Some(Action::Find(a));
    match key.code {
        KeyCode::Char('g' | 'n') if key.ctrl_held() => return find(FindAction::Next),
        KeyCode::Char('p') if key.ctrl_held() => return find(FindAction::Prev),
        KeyCode::Char('f') if key.ctrl_held() => return find(FindAction::Accept),
        KeyCode::Down | KeyCode::Enter => return find(FindAction::Next),
        KeyCode::Up => return find(FindAction::Prev),
        KeyCode::Tab => return find(FindAction::Accept),
        KeyCode::Esc => return find(FindAction::Cancel),
        _ => {}
    }
    if let Some(a) = global_chord(key) {
        return Some(a);
    }
    field_edit(key).map(|e| Action::Find(FindAction::Edit(e)))
}

fn prompt_key(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::Prompt(PromptAction::Submit)),
        KeyCode::Esc => Some(Action::Prompt(PromptAction::Cancel)),
        _ => field_edit(key).map(|e| Action::Prompt(PromptAction::Edit(e))),
    }
}

fn mouse(m: &MouseEvent) -> Option<Action> {
    let (col, row) = (m.column, m.row);
    let action = match m.kind {
        MouseEventKind::Press(MouseButton::Left) => MouseAction::Press {
            col,
            row,
            extend: m.mods.contains(KeyModifiers::SHIFT),
        },
        MouseEventKind::Drag(MouseButton::Left) => MouseAction::Drag { col, row },
        MouseEventKind::Release(MouseButton::Left) => MouseAction::Release { col, row },
        MouseEventKind::ScrollUp => MouseAction::Wheel(-1),
        MouseEventKind::ScrollDown => MouseAction::Wheel(1),
        _ => return None,
    };
    Some(Action::Mouse(action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, mods))
    }
    fn plain(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::plain(code))
    }
    fn ctrl(c: char) -> InputEvent {
        InputEvent::Key(KeyEvent::ctrl(c))
    }

    #[test]
    fn editing_chords() {
        let ed = InputContext::Editing;
        assert_eq!(translate(&ctrl('c'), ed), Some(Action::Copy));
        assert_eq!(translate(&ctrl('x'), ed), Some(Action::Cut));
        assert_eq!(translate(&ctrl('v'), ed), Some(Action::Paste));
        assert_eq!(translate(&ctrl('z'), ed), Some(Action::Undo));
        assert_eq!(translate(&ctrl('y'), ed), Some(Action::Redo));
        assert_eq!(
            translate(&key(KeyCode::Char('z'), KeyModifiers::CTRL | KeyModifiers::SHIFT), ed),
            Some(Action::Undo)
        );
        assert_eq!(translate(&ctrl('s'), ed), Some(Action::Save));
        assert_eq!(translate(&ctrl('q'), ed), Some(Action::Quit));
        assert_eq!(translate(&ctrl('a'), ed), Some(Action::SelectAll));
        assert_eq!(translate(&ctrl('f'), ed), Some(Action::Find(FindAction::Open)));
        assert_eq!(translate(&ctrl('k'), ed), None);
    }

    #[test]
    fn editing_motions_and_word_deletes() {
        let ed = InputContext::Editing;
        assert_eq!(
            translate(&key(KeyCode::Right, KeyModifiers::SHIFT), ed),
            Some(Action::Move { motion: Motion::Right, extend: true })
        );
        assert_eq!(
            translate(&key(KeyCode::Left, KeyModifiers::ALT), ed),
            Some(Action::Move { motion: Motion::WordLeft, extend: false })
        );
        assert_eq!(
            translate(&key(KeyCode::End, KeyModifiers::CTRL | KeyModifiers::SHIFT), ed),
            Some(Action::Move { motion: Motion::DocEnd, extend: true })
        );
        assert_eq!(
            translate(&key(KeyCode::Backspace, KeyModifiers::ALT), ed),
            Some(Action::Edit(EditKind::DeleteWordBackward))
        );
        assert_eq!(translate(&ctrl('w'), ed), Some(Action::Edit(EditKind::DeleteWordBackward)));
        assert_eq!(
            translate(&key(KeyCode::Char('d'), KeyModifiers::ALT), ed),
            Some(Action::Edit(EditKind::DeleteWordForward))
        );
        assert_eq!(translate(&plain(KeyCode::Esc), ed), Some(Action::ClearSelection));
        assert_eq!(
            translate(&plain(KeyCode::Char('é')), ed),
            Some(Action::Edit(EditKind::InsertChar('é')))
        );
    }

    #[test]
    fn find_context_routes_navigation_and_query_edits() {
        let f = InputContext::Find;
        assert_eq!(translate(&plain(KeyCode::Enter), f), Some(Action::Find(FindAction::Next)));
        assert_eq!(translate(&ctrl('g'), f), Some(Action::Find(FindAction::Next)));
        assert_eq!(translate(&ctrl('p'), f), Some(Action::Find(FindAction::Prev)));
        assert_eq!(translate(&plain(KeyCode::Up), f), Some(Action::Find(FindAction::Prev)));
        assert_eq!(translate(&plain(KeyCode::Esc), f), Some(Action::Find(FindAction::Cancel)));
        assert_eq!(translate(&ctrl('f'), f), Some(Action::Find(FindAction::Accept)));
        assert_eq!(translate(&plain(KeyCode::Tab), f), Some(Action::Find(FindAction::Accept)));
        assert_eq!(
            translate(&plain(KeyCode::Char('x')), f),
            Some(Action::Find(FindAction::Edit(FieldEdit::Insert("x".into()))))
        );
        assert_eq!(
            translate(&key(KeyCode::Home, KeyModifiers::SHIFT), f),
            Some(Action::Find(FindAction::Edit(FieldEdit::Home { extend: true })))
        );
        assert_eq!(
            translate(&ctrl('a'), f),
            Some(Action::Find(FindAction::Edit(FieldEdit::SelectAll)))
        );
        assert_eq!(translate(&ctrl('s'), f), Some(Action::Save));
    }

    #[test]
    fn prompt_context_only_edits_submits_or_cancels() {
        let p = InputContext::Prompt;
        assert_eq!(translate(&plain(KeyCode::Enter), p), Some(Action::Prompt(PromptAction::Submit)));
        assert_eq!(translate(&plain(KeyCode::Esc), p), Some(Action::Prompt(PromptAction::Cancel)));
        assert_eq!(translate(&ctrl('q'), p), None);
        assert_eq!(
            translate(&InputEvent::Paste("a.txt".into()), p),
            Some(Action::Prompt(PromptAction::Edit(FieldEdit::Insert("a.txt".into()))))
        );
    }

    #[test]
    fn mouse_and_paste_and_resize() {
        let ed = InputContext::Editing;
        let press = InputEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Press(MouseButton::Left),
            column: 4,
            row: 2,
            mods: KeyModifiers::SHIFT,
        });
        assert_eq!(
            translate(&press, ed),
            Some(Action::Mouse(MouseAction::Press { col: 4, row: 2, extend: true }))
        );
        let wheel = InputEvent::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            mods: KeyModifiers::empty(),
        });
        assert_eq!(translate(&wheel, ed), Some(Action::Mouse(MouseAction::Wheel(-1))));
        let right = InputEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Press(MouseButton::Right),
            column: 0,
            row: 0,
            mods: KeyModifiers::empty(),
        });
        assert_eq!(translate(&right, ed), None);
        assert_eq!(
            translate(&InputEvent::Paste("x\ny".into()), ed),
            Some(Action::Edit(EditKind::InsertText("x\ny".into())))
        );
        assert_eq!(translate(&InputEvent::Resize(100, 40), ed), Some(Action::Resize(100, 40)));
    }
}
