//! Decoded input event types.
//!
//! These are the only values that cross from the input decoder into the action
//! layer. The decoder never looks at editor state and the dispatcher never looks
//! at raw bytes.

bitflags::bitflags! {
    /// Modifier set. Bit layout matches the xterm modifier parameter minus one
    /// (`1` shift, `2` alt, `4` ctrl) so CSI modifiers map directly.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

impl KeyModifiers {
    /// Decode an xterm modifier parameter (`1 + bits`). Values below 2 mean "none".
    pub fn from_xterm_param(param: u16) -> Self {
        if param < 2 {
            return Self::empty();
        }
        Self::from_bits_truncate(((param - 1) & 0b111) as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::empty(),
        }
    }

    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: KeyModifiers::CTRL,
        }
    }

    pub fn shift(&self) -> bool {
        self.mods.contains(KeyModifiers::SHIFT)
    }
    pub fn alt(&self) -> bool {
        self.mods.contains(KeyModifiers::ALT)
    }
    pub fn ctrl_held(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

/// Mouse report with 0-based cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
    pub mods: KeyModifiers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Bracketed paste payload, unnormalized.
    Paste(String),
    /// Terminal size changed (columns, rows). Produced by the runtime, not the decoder.
    Resize(u16, u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xterm_modifier_param_decodes_three_bits() {
        assert_eq!(KeyModifiers::from_xterm_param(0), KeyModifiers::empty());
        assert_eq!(KeyModifiers::from_xterm_param(1), KeyModifiers::empty());
        assert_eq!(KeyModifiers::from_xterm_param(2), KeyModifiers::SHIFT);
        assert_eq!(KeyModifiers::from_xterm_param(3), KeyModifiers::ALT);
        assert_eq!(
            KeyModifiers::from_xterm_param(6),
            KeyModifiers::SHIFT | KeyModifiers::CTRL
        );
        assert_eq!(KeyModifiers::from_xterm_param(8), KeyModifiers::all());
    }
}
