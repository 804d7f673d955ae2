//! The event loop.
//!
//! One thread, one owner. Each tick:
//! 1. act on pending signals (terminate, resize),
//! 2. advance the cursor blink timer and expire footer messages,
//! 3. render if anything is dirty,
//! 4. drain every available input event, dispatching each to completion,
//!
//! then sleep `idle_tick`. The sleep is the only suspension point.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use core_actions::{Action, DispatchEnv, context_of, dispatch, translate};
use core_config::Config;
use core_input::{ByteSource, InputDecoder};
use core_model::EditorModel;
use core_render::{Renderer, Writer};
use core_state::{Clipboard, EditorState, UndoEngine};
use core_terminal::{SignalFlags, TerminalBackend};
use core_text::Buffer;
use tracing::{debug, info, warn};

use crate::loader::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    Quit,
    Signal(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break(Shutdown),
}

/// Cursor blink phase. `None` interval keeps the cursor steady.
#[derive(Debug, Clone, Copy)]
pub struct Blink {
    interval: Option<Duration>,
    visible: bool,
    last_toggle: Instant,
}

impl Blink {
    pub fn new(interval: Option<Duration>, now: Instant) -> Self {
        Self {
            interval,
            visible: true,
            last_toggle: now,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Toggle when the interval has elapsed; true if the phase changed.
    pub fn update(&mut self, now: Instant) -> bool {
        match self.interval {
            Some(iv) if now.duration_since(self.last_toggle) >= iv => {
                self.visible = !self.visible;
                self.last_toggle = now;
                true
            }
            _ => false,
        }
    }

    /// Input makes the cursor visible and restarts the phase.
    pub fn reset(&mut self, now: Instant) -> bool {
        let changed = !self.visible;
        self.visible = true;
        self.last_toggle = now;
        changed
    }
}

/// Build the editor model for a loaded document.
pub fn seed_model(doc: Document, config: &Config, cols: u16, rows: u16) -> EditorModel {
    let buffer = Buffer::new(doc.lines);
    let mut state = EditorState::new(buffer, doc.path);
    state.undo = UndoEngine::new(config.undo_capacity, config.coalesce_window);
    if let Some(pos) = doc.cursor {
        state.cursor = state.buffer.clamp(pos);
        state.follow_cursor = true;
    }
    EditorModel::new(state, cols, rows)
}

pub struct Runtime<S: ByteSource> {
    model: EditorModel,
    config: Config,
    decoder: InputDecoder<S>,
    clipboard: Box<dyn Clipboard>,
    signals: SignalFlags,
    renderer: Renderer,
    writer: Writer,
    blink: Blink,
    needs_render: bool,
}

impl<S: ByteSource> Runtime<S> {
    pub fn new(
        model: EditorModel,
        config: Config,
        decoder: InputDecoder<S>,
        clipboard: Box<dyn Clipboard>,
        signals: SignalFlags,
    ) -> Self {
        let blink = Blink::new(config.blink_interval, Instant::now());
        Self {
            model,
            config,
            decoder,
            clipboard,
            signals,
            renderer: Renderer::new(),
            writer: Writer::new(),
            blink,
            needs_render: true,
        }
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    pub fn decoder_mut(&mut self) -> &mut InputDecoder<S> {
        &mut self.decoder
    }

    pub fn cursor_visible(&self) -> bool {
        self.blink.visible()
    }

    /// Run until quit or a termination signal.
    pub fn run(&mut self, backend: &mut dyn TerminalBackend) -> Result<Shutdown> {
        info!(target: "runtime", "loop_start");
        loop {
            match self.tick(backend, Instant::now())? {
                LoopControl::Continue => std::thread::sleep(self.config.idle_tick),
                LoopControl::Break(reason) => {
                    info!(target: "runtime", ?reason, "loop_exit");
                    return Ok(reason);
                }
            }
        }
    }

    /// One loop iteration at time `now`.
    pub fn tick(&mut self, backend: &mut dyn TerminalBackend, now: Instant) -> Result<LoopControl> {
        if let Some(sig) = self.signals.terminated() {
            return Ok(LoopControl::Break(Shutdown::Signal(sig)));
        }
        if self.signals.take_resize() {
            match backend.size() {
                Ok((cols, rows)) => {
                    debug!(target: "runtime", cols, rows, "resize");
                    self.apply(Action::Resize(cols, rows), now);
                }
                Err(e) => warn!(target: "runtime", error = %e, "resize_size_query_failed"),
            }
        }
        if self.blink.update(now) {
            self.needs_render = true;
        }
        if self.model.state.tick_ephemeral_at(now) {
            self.needs_render = true;
        }
        if self.needs_render {
            self.render(backend)?;
        }
        let events = self.decoder.drain().context("reading terminal input")?;
        for event in events {
            if self.blink.reset(now) {
                self.needs_render = true;
            }
            let ctx = context_of(&self.model.state);
            let Some(action) = translate(&event, ctx) else {
                continue;
            };
            if self.apply(action, now) {
                return Ok(LoopControl::Break(Shutdown::Quit));
            }
        }
        Ok(LoopControl::Continue)
    }

    /// Dispatch one action; true when it asks to quit.
    fn apply(&mut self, action: Action, now: Instant) -> bool {
        let mut env = DispatchEnv {
            clipboard: self.clipboard.as_mut(),
            config: &self.config,
            now,
        };
        let result = dispatch(action, &mut self.model, &mut env);
        if result.full_repaint {
            self.renderer.invalidate();
        }
        self.needs_render |= result.dirty;
        result.quit
    }

    fn render(&mut self, backend: &mut dyn TerminalBackend) -> Result<()> {
        self.renderer
            .render(&self.model, self.blink.visible(), &mut self.writer);
        let mut out = backend.output();
        self.writer
            .flush_to(&mut out)
            .context("writing frame to terminal")?;
        self.needs_render = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blink_toggles_each_interval() {
        let t0 = Instant::now();
        let mut b = Blink::new(Some(Duration::from_millis(500)), t0);
        assert!(!b.update(t0 + Duration::from_millis(100)));
        assert!(b.update(t0 + Duration::from_millis(500)));
        assert!(!b.visible());
        assert!(b.update(t0 + Duration::from_millis(1000)));
        assert!(b.visible());
    }

    #[test]
    fn input_resets_blink_phase() {
        let t0 = Instant::now();
        let mut b = Blink::new(Some(Duration::from_millis(500)), t0);
        b.update(t0 + Duration::from_millis(500));
        assert!(b.reset(t0 + Duration::from_millis(700)));
        assert!(b.visible());
        assert!(!b.update(t0 + Duration::from_millis(1100)));
        assert!(!b.reset(t0 + Duration::from_millis(1100)));
    }

    #[test]
    fn disabled_blink_stays_visible() {
        let t0 = Instant::now();
        let mut b = Blink::new(None, t0);
        assert!(!b.update(t0 + Duration::from_secs(10)));
        assert!(b.visible());
    }

    #[test]
    fn seed_model_clamps_cursor_hint_and_uses_config() {
        let doc = Document {
            lines: vec!["a".into(), "b".into()],
            path: None,
            cursor: Some(core_text::Position::new(40, 0)),
        };
        let m = seed_model(doc, &Config::default(), 80, 24);
        assert_eq!(m.state.cursor, core_text::Position::new(1, 0));
    }
}
