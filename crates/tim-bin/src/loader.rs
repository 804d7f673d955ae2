//! Document loading.
//!
//! Produces the triple the editor is seeded with: lines, the path saves go to,
//! and an optional initial cursor. Text must be UTF-8; a NUL byte in the first
//! 8 KiB marks the content as binary. Line endings (`\r\n`, `\r`) normalize to
//! `\n` before splitting. A file that does not exist yet opens as an empty
//! document bound to that path.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use core_text::{Position, normalize_newlines};
use thiserror::Error;
use tracing::info;

use crate::cli::DocumentSource;

/// Bytes inspected for a NUL when sniffing binary content.
pub const BINARY_SNIFF_LEN: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Usage(String),
    #[error("{}: binary file", .path.display())]
    Binary { path: PathBuf },
    #[error("{}: not valid UTF-8", .path.display())]
    InvalidUtf8 { path: PathBuf },
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read standard input")]
    Stdin(#[source] io::Error),
    #[error("cannot open {target}: {kind} documents need a network fetcher, which this build does not include")]
    Remote { kind: &'static str, target: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<String>,
    pub path: Option<PathBuf>,
    pub cursor: Option<Position>,
}

impl Document {
    pub fn scratch() -> Self {
        Self {
            lines: vec![String::new()],
            path: None,
            cursor: None,
        }
    }
}

/// Validate and split raw bytes into logical lines.
pub fn decode(bytes: &[u8], label: &Path) -> Result<Vec<String>, LoadError> {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(LoadError::Binary {
            path: label.to_path_buf(),
        });
    }
    let text = std::str::from_utf8(bytes).map_err(|_| LoadError::InvalidUtf8 {
        path: label.to_path_buf(),
    })?;
    Ok(normalize_newlines(text).split('\n').map(String::from).collect())
}

pub fn load(source: &DocumentSource) -> Result<Document, LoadError> {
    load_with_stdin(source, io::stdin().lock())
}

pub fn load_with_stdin<R: Read>(source: &DocumentSource, mut stdin: R) -> Result<Document, LoadError> {
    let cursor = |line: &Option<usize>| line.map(|l| Position::new(l, 0));
    match source {
        DocumentSource::Scratch => Ok(Document::scratch()),
        DocumentSource::Remote { kind, target } => Err(LoadError::Remote {
            kind: *kind,
            target: target.clone(),
        }),
        DocumentSource::Stdin { line } => {
            let mut bytes = Vec::new();
            stdin.read_to_end(&mut bytes).map_err(LoadError::Stdin)?;
            let lines = decode(&bytes, Path::new("<stdin>"))?;
            info!(target: "io", bytes = bytes.len(), lines = lines.len(), "stdin_loaded");
            Ok(Document {
                lines,
                path: None,
                cursor: cursor(line),
            })
        }
        DocumentSource::File { path, line } => {
            let lines = match fs::read(path) {
                Ok(bytes) => {
                    let lines = decode(&bytes, path)?;
                    info!(target: "io", path = %path.display(), bytes = bytes.len(), lines = lines.len(), "file_loaded");
                    lines
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    info!(target: "io", path = %path.display(), "new_file");
                    vec![String::new()]
                }
                Err(source) => {
                    return Err(LoadError::Read {
                        path: path.clone(),
                        source,
                    });
                }
            };
            Ok(Document {
                lines,
                path: Some(path.clone()),
                cursor: cursor(line),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn file_source(path: &Path, line: Option<usize>) -> DocumentSource {
        DocumentSource::File {
            path: path.to_path_buf(),
            line,
        }
    }

    #[test]
    fn line_endings_normalize() {
        let lines = decode(b"a\r\nb\rc\nd", Path::new("x")).unwrap();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
        assert_eq!(decode(b"", Path::new("x")).unwrap(), vec![""]);
    }

    #[test]
    fn nul_in_sniff_window_is_binary() {
        let mut bytes = b"text".to_vec();
        bytes.push(0);
        assert!(matches!(decode(&bytes, Path::new("x")), Err(LoadError::Binary { .. })));
        // A NUL past the window is accepted as text.
        let mut late = vec![b'a'; BINARY_SNIFF_LEN];
        late.push(0);
        assert!(decode(&late, Path::new("x")).is_ok());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = decode(&[0x66, 0xff, 0x6f], Path::new("bad.txt")).unwrap_err();
        assert_eq!(err.to_string(), "bad.txt: not valid UTF-8");
    }

    #[test]
    fn existing_file_loads_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "one\ntwo\n").unwrap();
        let doc = load(&file_source(&path, Some(1))).unwrap();
        assert_eq!(doc.lines, vec!["one", "two", ""]);
        assert_eq!(doc.path.as_deref(), Some(path.as_path()));
        assert_eq!(doc.cursor, Some(Position::new(1, 0)));
    }

    #[test]
    fn missing_file_is_empty_document_bound_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let doc = load(&file_source(&path, None)).unwrap();
        assert_eq!(doc.lines, vec![""]);
        assert_eq!(doc.path, Some(path));
    }

    #[test]
    fn stdin_document_has_no_path() {
        let doc = load_with_stdin(
            &DocumentSource::Stdin { line: None },
            Cursor::new(b"piped\r\ntext".to_vec()),
        )
        .unwrap();
        assert_eq!(doc.lines, vec!["piped", "text"]);
        assert_eq!(doc.path, None);
    }

    #[test]
    fn remote_sources_report_missing_fetcher() {
        let err = load(&DocumentSource::Remote {
            kind: "rss",
            target: "https://example.com/feed".into(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("https://example.com/feed"));
    }
}
