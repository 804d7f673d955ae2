//! Document persistence.
//!
//! Saves are atomic: the content goes to a temporary file in the target's
//! directory which is then renamed over the target, so a failed write never
//! truncates the existing file. The on-disk bytes are exactly
//! `Buffer::to_text()` (lines joined with `\n`, no trailing newline added).

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use core_text::Buffer;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("cannot create temporary file in {dir}: {source}")]
    TempFile { dir: PathBuf, source: io::Error },
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
    #[error("cannot replace {path}: {source}")]
    Persist { path: PathBuf, source: io::Error },
}

/// Write `buf` to `path` atomically. Returns the number of bytes written.
///
/// A symlinked `path` is resolved first so the link survives and its target
/// receives the new contents.
pub fn save_atomic(path: &Path, buf: &Buffer) -> Result<usize, SaveError> {
    let resolved = std::fs::canonicalize(path).ok();
    let path = resolved.as_deref().unwrap_or(path);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|source| SaveError::TempFile {
        dir: dir.clone(),
        source,
    })?;
    let text = buf.to_text();
    tmp.write_all(text.as_bytes()).map_err(SaveError::Write)?;
    tmp.as_file().sync_all().map_err(SaveError::Write)?;
    // Keep the mode bits of a file we are replacing.
    if let Ok(meta) = std::fs::metadata(path)
        && let Err(e) = std::fs::set_permissions(tmp.path(), meta.permissions())
    {
        debug!(target: "io", error = %e, "permissions_not_copied");
    }
    tmp.persist(path).map_err(|e| {
        error!(target: "io", error = %e.error, "persist_failed");
        SaveError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        }
    })?;
    debug!(target: "io", bytes = text.len(), lines = buf.line_count(), "saved");
    Ok(text.len())
}
