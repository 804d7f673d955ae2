//! Raw byte → `InputEvent` decoder.
//!
//! Reads one byte at a time from a [`ByteSource`] and keeps a small lookahead
//! queue for bytes that were consumed speculatively but belong to the next
//! event (bad UTF-8 continuation bytes, the tail of an unrecognised escape).
//! Pushed-back bytes are always re-read before the source.
//!
//! A sequence cut short because the source ran dry is never decoded early:
//! its prefix (including the `ESC` or UTF-8 lead byte) goes back on the
//! lookahead and the decoder reports idle. The next attempt first checks the
//! source for more bytes. Only if none arrived is the prefix decoded as-is, so
//! a truncated escape becomes a lone `Esc` and a truncated scalar is dropped
//! with a `debug!` record.
//!
//! Recognised sequences:
//! * UTF-8 text: lead byte high bits give the continuation count.
//! * C0 controls: Ctrl-letter, Enter (CR/LF), Tab, Backspace (DEL/BS).
//! * `ESC` alone: Escape. `ESC x`: Alt-x. `ESC f` / `ESC b`: word right/left
//!   (Alt-Right / Alt-Left). `ESC ESC …`: meta-prefixed variant of the rest.
//! * `ESC [ params final`: arrows, Home/End, `~` keys (1/7 Home, 2 Insert,
//!   3 Delete, 4/8 End, 5 PageUp, 6 PageDown), Shift-Tab, with the xterm
//!   modifier parameter decoded into shift/alt/ctrl bits.
//! * `ESC [ < b ; x ; y M|m`: SGR mouse.
//! * `ESC [ 200 ~ … ESC [ 201 ~`: bracketed paste, accumulated across polls.
//! * `ESC O A..D/H/F`: SS3 cursor keys.

use std::collections::VecDeque;

use core_events::{
    InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::{debug, trace};

use crate::source::{ByteSource, InputError};

const ESC: u8 = 0x1b;
const PASTE_END: &[u8] = b"\x1b[201~";

enum Step {
    Event(InputEvent),
    /// Bytes consumed, nothing to report (unknown sequence, invalid lead byte).
    Skip,
    /// Source is empty.
    Idle,
}

pub struct InputDecoder<S> {
    source: S,
    lookahead: VecDeque<u8>,
    paste: Option<Vec<u8>>,
    /// Bytes read since the current event started (outside pastes).
    consumed: Vec<u8>,
    /// The lookahead holds an incomplete sequence waiting for more input.
    stalled: bool,
    /// No more input came for a stalled sequence; decode what is there.
    flushing: bool,
}

impl<S: ByteSource> InputDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            lookahead: VecDeque::new(),
            paste: None,
            consumed: Vec::new(),
            stalled: false,
            flushing: false,
        }
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// True while a bracketed paste is being accumulated.
    pub fn in_paste(&self) -> bool {
        self.paste.is_some()
    }

    /// Next complete event, or `None` when no more input is available now.
    pub fn next_event(&mut self) -> Result<Option<InputEvent>, InputError> {
        loop {
            match self.step()? {
                Step::Event(ev) => return Ok(Some(ev)),
                Step::Skip => continue,
                Step::Idle => return Ok(None),
            }
        }
    }

    /// Drain every event currently available.
    pub fn drain(&mut self) -> Result<Vec<InputEvent>, InputError> {
        let mut out = Vec::new();
        while let Some(ev) = self.next_event()? {
            out.push(ev);
        }
        Ok(out)
    }

    /// True while an incomplete sequence is parked on the lookahead.
    pub fn has_pending(&self) -> bool {
        self.stalled
    }

    fn next_byte(&mut self) -> Result<Option<u8>, InputError> {
        let b = match self.lookahead.pop_front() {
            Some(b) => Some(b),
            None => self.source.poll_byte()?,
        };
        if let Some(b) = b
            && self.paste.is_none()
        {
            self.consumed.push(b);
        }
        Ok(b)
    }

    /// Input ran out mid-sequence. Park the consumed prefix and report true,
    /// or report false when this is the final attempt and the caller must
    /// decode the prefix as it stands.
    fn stall(&mut self) -> bool {
        if self.flushing {
            return false;
        }
        let prefix = std::mem::take(&mut self.consumed);
        trace!(target: "input.decode", len = prefix.len(), "sequence_stalled");
        self.push_back(&prefix);
        self.stalled = true;
        true
    }

    /// Return bytes to the front of the lookahead, preserving their order.
    fn push_back(&mut self, bytes: &[u8]) {
        for b in bytes.iter().rev() {
            self.lookahead.push_front(*b);
        }
    }

    fn step(&mut self) -> Result<Step, InputError> {
        if self.paste.is_some() {
            return self.continue_paste();
        }
        if self.stalled {
            self.stalled = false;
            match self.source.poll_byte()? {
                Some(b) => self.lookahead.push_back(b),
                None => self.flushing = true,
            }
        }
        self.consumed.clear();
        let step = self.decode_next();
        self.flushing = false;
        step
    }

    fn decode_next(&mut self) -> Result<Step, InputError> {
        let Some(b) = self.next_byte()? else {
            return Ok(Step::Idle);
        };
        let ev = match b {
            ESC => return self.decode_escape(),
            0x0d | 0x0a => key(KeyCode::Enter, KeyModifiers::empty()),
            0x09 => key(KeyCode::Tab, KeyModifiers::empty()),
            0x7f | 0x08 => key(KeyCode::Backspace, KeyModifiers::empty()),
            0x00 => key(KeyCode::Char(' '), KeyModifiers::CTRL),
            0x01..=0x1a => key(KeyCode::Char((b - 1 + b'a') as char), KeyModifiers::CTRL),
            0x1c..=0x1f => key(KeyCode::Char((b + 0x40) as char), KeyModifiers::CTRL),
            0x20..=0x7e => key(KeyCode::Char(b as char), KeyModifiers::empty()),
            _ => return self.decode_utf8(b),
        };
        Ok(Step::Event(ev))
    }

    fn decode_utf8(&mut self, lead: u8) -> Result<Step, InputError> {
        let need = match lead {
            0xc0..=0xdf => 1,
            0xe0..=0xef => 2,
            0xf0..=0xf7 => 3,
            _ => {
                debug!(target: "input.decode", lead, "invalid_utf8_lead");
                return Ok(Step::Skip);
            }
        };
        let mut seq = vec![lead];
        for _ in 0..need {
            match self.next_byte()? {
                Some(c) if (0x80..=0xbf).contains(&c) => seq.push(c),
                Some(other) => {
                    seq.push(other);
                    self.push_back(&seq[1..]);
                    debug!(target: "input.decode", lead, "invalid_utf8_continuation_pushed_back");
                    return Ok(Step::Skip);
                }
                None => {
                    if self.stall() {
                        return Ok(Step::Idle);
                    }
                    debug!(target: "input.decode", lead, "truncated_utf8_sequence_dropped");
                    return Ok(Step::Skip);
                }
            }
        }
        match std::str::from_utf8(&seq).ok().and_then(|s| s.chars().next()) {
            Some(c) => Ok(Step::Event(key(KeyCode::Char(c), KeyModifiers::empty()))),
            None => {
                debug!(target: "input.decode", lead, "malformed_utf8_sequence");
                Ok(Step::Skip)
            }
        }
    }

    fn decode_escape(&mut self) -> Result<Step, InputError> {
        let Some(b) = self.next_byte()? else {
            if self.stall() {
                return Ok(Step::Idle);
            }
            return Ok(Step::Event(key(KeyCode::Esc, KeyModifiers::empty())));
        };
        let alt = KeyModifiers::ALT;
        let ev = match b {
            b'[' => return self.decode_csi(),
            b'O' => return self.decode_ss3(),
            b'f' => key(KeyCode::Right, alt),
            b'b' => key(KeyCode::Left, alt),
            ESC => return self.decode_meta_escape(),
            0x7f | 0x08 => key(KeyCode::Backspace, alt),
            0x0d => key(KeyCode::Enter, alt),
            0x01..=0x1a if b != 0x09 => {
                key(KeyCode::Char((b - 1 + b'a') as char), alt | KeyModifiers::CTRL)
            }
            0x20..=0x7e => key(KeyCode::Char(b as char), alt),
            _ => {
                self.push_back(&[b]);
                key(KeyCode::Esc, KeyModifiers::empty())
            }
        };
        Ok(Step::Event(ev))
    }

    /// `ESC ESC …`: a meta prefix on whatever follows.
    fn decode_meta_escape(&mut self) -> Result<Step, InputError> {
        let Some(n) = self.next_byte()? else {
            if self.stall() {
                return Ok(Step::Idle);
            }
            return Ok(Step::Event(key(KeyCode::Esc, KeyModifiers::ALT)));
        };
        match n {
            b'f' => Ok(Step::Event(key(KeyCode::Right, KeyModifiers::ALT))),
            b'b' => Ok(Step::Event(key(KeyCode::Left, KeyModifiers::ALT))),
            b'[' | b'O' => {
                let step = if n == b'[' {
                    self.decode_csi()?
                } else {
                    self.decode_ss3()?
                };
                Ok(match step {
                    Step::Event(InputEvent::Key(mut k)) => {
                        k.mods |= KeyModifiers::ALT;
                        Step::Event(InputEvent::Key(k))
                    }
                    other => other,
                })
            }
            _ => {
                self.push_back(&[ESC, n]);
                Ok(Step::Event(key(KeyCode::Esc, KeyModifiers::empty())))
            }
        }
    }

    fn decode_ss3(&mut self) -> Result<Step, InputError> {
        let Some(b) = self.next_byte()? else {
            if self.stall() {
                return Ok(Step::Idle);
            }
            return Ok(Step::Event(key(KeyCode::Char('O'), KeyModifiers::ALT)));
        };
        let code = match b {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            _ => {
                trace!(target: "input.decode", byte = b, "ss3_unhandled");
                return Ok(Step::Skip);
            }
        };
        Ok(Step::Event(key(code, KeyModifiers::empty())))
    }

    fn decode_csi(&mut self) -> Result<Step, InputError> {
        let Some(first) = self.next_byte()? else {
            if self.stall() {
                return Ok(Step::Idle);
            }
            return Ok(Step::Event(key(KeyCode::Char('['), KeyModifiers::ALT)));
        };
        if first == b'<' {
            return self.decode_sgr_mouse();
        }
        let mut params: Vec<u16> = Vec::new();
        let mut cur: Option<u16> = None;
        let mut byte = Some(first);
        let fin = loop {
            let Some(b) = byte else {
                if self.stall() {
                    return Ok(Step::Idle);
                }
                debug!(target: "input.decode", "truncated_csi_as_escape");
                return Ok(Step::Event(key(KeyCode::Esc, KeyModifiers::empty())));
            };
            match b {
                b'0'..=b'9' => {
                    let d = (b - b'0') as u16;
                    cur = Some(cur.unwrap_or(0).saturating_mul(10).saturating_add(d));
                }
                b';' => params.push(cur.take().unwrap_or(0)),
                0x40..=0x7e => break b,
                _ => {}
            }
            byte = self.next_byte()?;
        };
        if let Some(c) = cur {
            params.push(c);
        }
        let mods = KeyModifiers::from_xterm_param(params.get(1).copied().unwrap_or(0));
        let code = match fin {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'Z' => KeyCode::BackTab,
            b'~' => match params.first().copied().unwrap_or(0) {
                1 | 7 => KeyCode::Home,
                2 => KeyCode::Insert,
                3 => KeyCode::Delete,
                4 | 8 => KeyCode::End,
                5 => KeyCode::PageUp,
                6 => KeyCode::PageDown,
                200 => {
                    trace!(target: "input.paste", "paste_start");
                    self.paste = Some(Vec::new());
                    return self.continue_paste();
                }
                other => {
                    trace!(target: "input.decode", param = other, "csi_tilde_unhandled");
                    return Ok(Step::Skip);
                }
            },
            other => {
                trace!(target: "input.decode", fin = other, "csi_unhandled");
                return Ok(Step::Skip);
            }
        };
        Ok(Step::Event(key(code, mods)))
    }

    fn continue_paste(&mut self) -> Result<Step, InputError> {
        loop {
            let Some(b) = self.next_byte()? else {
                return Ok(Step::Idle);
            };
            let Some(buf) = self.paste.as_mut() else {
                return Ok(Step::Skip);
            };
            buf.push(b);
            if buf.ends_with(PASTE_END) {
                let len = buf.len() - PASTE_END.len();
                buf.truncate(len);
                let bytes = self.paste.take().unwrap_or_default();
                let text = String::from_utf8_lossy(&bytes).into_owned();
                crate::log_paste_flush(text.len());
                return Ok(Step::Event(InputEvent::Paste(text)));
            }
        }
    }

    fn decode_sgr_mouse(&mut self) -> Result<Step, InputError> {
        let mut nums = [0u16; 3];
        let mut idx = 0usize;
        let fin = loop {
            let Some(b) = self.next_byte()? else {
                if self.stall() {
                    return Ok(Step::Idle);
                }
                debug!(target: "input.decode", "truncated_sgr_mouse_as_escape");
                return Ok(Step::Event(key(KeyCode::Esc, KeyModifiers::empty())));
            };
            match b {
                b'0'..=b'9' if idx < 3 => {
                    nums[idx] = nums[idx].saturating_mul(10).saturating_add((b - b'0') as u16);
                }
                b';' => idx += 1,
                b'M' | b'm' => break b,
                _ => {
                    debug!(target: "input.decode", byte = b, "sgr_mouse_unexpected_byte");
                    return Ok(Step::Skip);
                }
            }
        };
        let [cb, x, y] = nums;
        Ok(match decode_sgr(cb, x, y, fin == b'M') {
            Some(m) => Step::Event(InputEvent::Mouse(m)),
            None => Step::Skip,
        })
    }
}

fn key(code: KeyCode, mods: KeyModifiers) -> InputEvent {
    InputEvent::Key(KeyEvent::new(code, mods))
}

/// Decode an SGR mouse report. `x`/`y` are 1-based on the wire.
pub fn decode_sgr(cb: u16, x: u16, y: u16, pressed: bool) -> Option<MouseEvent> {
    let mut mods = KeyModifiers::empty();
    if cb & 4 != 0 {
        mods |= KeyModifiers::SHIFT;
    }
    if cb & 8 != 0 {
        mods |= KeyModifiers::ALT;
    }
    if cb & 16 != 0 {
        mods |= KeyModifiers::CTRL;
    }
    let base = cb & !(4 | 8 | 16);
    let low = base & 0b11;
    let kind = if base & 64 != 0 {
        match low {
            0 => MouseEventKind::ScrollUp,
            1 => MouseEventKind::ScrollDown,
            2 => MouseEventKind::ScrollLeft,
            _ => MouseEventKind::ScrollRight,
        }
    } else {
        let button = match low {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        };
        if base & 32 != 0 {
            MouseEventKind::Drag(button?)
        } else if pressed {
            MouseEventKind::Press(button?)
        } else {
            MouseEventKind::Release(button.unwrap_or(MouseButton::Left))
        }
    };
    Some(MouseEvent {
        kind,
        column: x.saturating_sub(1),
        row: y.saturating_sub(1),
        mods,
    })
}
