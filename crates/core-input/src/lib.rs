//! Terminal input: byte sources and the escape-sequence decoder.
//!
//! Nothing here blocks. `TtySource` polls the terminal with a zero timeout and
//! the decoder turns whatever bytes are available into complete events,
//! keeping partial state (pushed-back bytes, an open bracketed paste) for the
//! next drain.

mod decoder;
mod source;

pub use decoder::{InputDecoder, decode_sgr};
pub use source::{ByteSource, InputError, ScriptedSource, TtySource};

/// Paste payloads are never logged; only their length.
#[inline]
pub(crate) fn log_paste_flush(len: usize) {
    tracing::trace!(target: "input.paste", paste_len = len, "paste_flush");
}
