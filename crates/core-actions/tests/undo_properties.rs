//! Undo/redo laws over random editing sessions driven through `dispatch`.

use std::time::{Duration, Instant};

use core_actions::{Action, DispatchEnv, EditKind, Motion, dispatch};
use core_config::Config;
use core_model::EditorModel;
use core_state::{EditorState, MemoryClipboard};
use core_text::Buffer;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn model(text: &str) -> EditorModel {
    EditorModel::new(EditorState::new(Buffer::from_text(text), None), 40, 12)
}

struct Session {
    clipboard: MemoryClipboard,
    config: Config,
    now: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            clipboard: MemoryClipboard::new(),
            config: Config::default(),
            now: Instant::now(),
        }
    }

    fn run(&mut self, m: &mut EditorModel, action: Action) {
        let mut env = DispatchEnv {
            clipboard: &mut self.clipboard,
            config: &self.config,
            now: self.now,
        };
        dispatch(action, m, &mut env);
    }

    fn undo_all(&mut self, m: &mut EditorModel) {
        while m.state.undo.undo_depth() > 0 {
            self.run(m, Action::Undo);
        }
    }

    fn redo_all(&mut self, m: &mut EditorModel) {
        while m.state.undo.redo_depth() > 0 {
            self.run(m, Action::Redo);
        }
    }
}

fn arb_action() -> impl Strategy<Value = Action> {
    let motion = prop_oneof![
        Just(Motion::Left),
        Just(Motion::Right),
        Just(Motion::Up),
        Just(Motion::Down),
        Just(Motion::WordLeft),
        Just(Motion::WordRight),
        Just(Motion::LineEnd),
    ];
    prop_oneof![
        4 => prop::sample::select(vec!['a', 'b', ' ', '.', '漢']).prop_map(|c| Action::Edit(EditKind::InsertChar(c))),
        1 => Just(Action::Edit(EditKind::Newline)),
        1 => Just(Action::Edit(EditKind::Backspace)),
        1 => Just(Action::Edit(EditKind::Delete)),
        1 => Just(Action::Edit(EditKind::DeleteWordBackward)),
        1 => Just(Action::Edit(EditKind::InsertText("x\r\ny".into()))),
        1 => Just(Action::Cut),
        1 => Just(Action::Paste),
        3 => (motion, any::<bool>()).prop_map(|(motion, extend)| Action::Move { motion, extend }),
    ]
}

proptest! {
    #[test]
    fn undo_everything_restores_original_and_redo_replays(
        steps in prop::collection::vec((arb_action(), 0u64..800), 1..60),
    ) {
        let original = "alpha beta\ngamma\n\ndelta";
        let mut m = model(original);
        let mut s = Session::new();
        for (action, pause) in steps {
            s.now += Duration::from_millis(pause);
            s.run(&mut m, action);
        }
        let edited = m.state.buffer.to_text();
        s.undo_all(&mut m);
        prop_assert_eq!(m.state.buffer.to_text(), original);
        prop_assert!(!m.state.is_dirty());
        s.redo_all(&mut m);
        prop_assert_eq!(m.state.buffer.to_text(), edited);
    }
}

#[test]
fn coalesced_typing_undoes_in_one_step() {
    let mut m = model("");
    let mut s = Session::new();
    for c in "abc".chars() {
        s.run(&mut m, Action::Edit(EditKind::InsertChar(c)));
        s.now += Duration::from_millis(100);
    }
    assert_eq!(m.state.undo.undo_depth(), 1);
    s.run(&mut m, Action::Undo);
    assert_eq!(m.state.buffer.to_text(), "");
}

#[test]
fn kind_change_breaks_coalescing() {
    let mut m = model("xy");
    let mut s = Session::new();
    m.state.cursor = core_text::Position::new(0, 2);
    s.run(&mut m, Action::Edit(EditKind::InsertChar('z')));
    s.run(&mut m, Action::Edit(EditKind::Backspace));
    s.run(&mut m, Action::Edit(EditKind::Backspace));
    assert_eq!(m.state.buffer.to_text(), "x");
    assert_eq!(m.state.undo.undo_depth(), 2);
    s.run(&mut m, Action::Undo);
    assert_eq!(m.state.buffer.to_text(), "xyz");
    s.run(&mut m, Action::Undo);
    assert_eq!(m.state.buffer.to_text(), "xy");
}

#[test]
fn history_is_bounded() {
    let mut m = model("");
    let mut s = Session::new();
    for _ in 0..150 {
        s.run(&mut m, Action::Edit(EditKind::Newline));
    }
    assert_eq!(m.state.undo.undo_depth(), core_state::UNDO_HISTORY_MAX);
    s.undo_all(&mut m);
    assert_eq!(m.state.buffer.line_count(), 51);
}
