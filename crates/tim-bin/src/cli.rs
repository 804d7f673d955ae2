//! Command-line surface.
//!
//! ```text
//! tim                     scratch document
//! tim <file>              open (or create on save) a file
//! tim <file>:+<line>      ... and put the cursor on <line>
//! tim +<line> <file>      same, hint first
//! tim -                   read the document from standard input
//! tim -- <path>           path that would otherwise parse as an option
//! tim <url> | -w | -r | -b   remote sources
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::loader::LoadError;

#[derive(Parser, Debug, Default)]
#[command(name = "tim", version, about = "A small terminal text editor")]
pub struct Args {
    /// File to open (`-` reads standard input), optionally preceded by `+LINE`.
    #[arg(value_name = "FILE")]
    pub targets: Vec<String>,
    /// Open a Wikipedia article by title.
    #[arg(short = 'w', long = "wiki", value_name = "TITLE", conflicts_with_all = ["rss", "bsky"])]
    pub wiki: Option<String>,
    /// Open an RSS/Atom feed.
    #[arg(short = 'r', long = "rss", value_name = "URL", conflicts_with = "bsky")]
    pub rss: Option<String>,
    /// Open a Bluesky feed by handle.
    #[arg(short = 'b', long = "bsky", value_name = "HANDLE")]
    pub bsky: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Scratch,
    /// 0-based `line` hint.
    File { path: PathBuf, line: Option<usize> },
    Stdin { line: Option<usize> },
    Remote { kind: &'static str, target: String },
}

fn parse_hint(raw: &str) -> Result<usize, LoadError> {
    raw.parse::<usize>()
        .map(|n| n.saturating_sub(1))
        .map_err(|_| LoadError::Usage(format!("invalid line number: +{raw}")))
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn parse_target(target: &str, line: Option<usize>) -> Result<DocumentSource, LoadError> {
    if target == "-" {
        return Ok(DocumentSource::Stdin { line });
    }
    if is_url(target) {
        return Ok(DocumentSource::Remote {
            kind: "url",
            target: target.to_string(),
        });
    }
    if let Some((path, hint)) = target.rsplit_once(":+")
        && !path.is_empty()
        && !hint.is_empty()
        && hint.bytes().all(|b| b.is_ascii_digit())
    {
        return Ok(DocumentSource::File {
            path: PathBuf::from(path),
            line: Some(parse_hint(hint)?),
        });
    }
    Ok(DocumentSource::File {
        path: PathBuf::from(target),
        line,
    })
}

impl Args {
    pub fn source(&self) -> Result<DocumentSource, LoadError> {
        let remote = [("wikipedia", &self.wiki), ("rss", &self.rss), ("bluesky", &self.bsky)]
            .into_iter()
            .find_map(|(kind, v)| v.as_ref().map(|t| (kind, t.clone())));
        if let Some((kind, target)) = remote {
            if !self.targets.is_empty() {
                return Err(LoadError::Usage(format!(
                    "unexpected argument with --{kind}: {}",
                    self.targets[0]
                )));
            }
            return Ok(DocumentSource::Remote { kind, target });
        }
        match self.targets.as_slice() {
            [] => Ok(DocumentSource::Scratch),
            [hint] if hint.starts_with('+') && hint.len() > 1 => Err(LoadError::Usage(
                format!("line hint {hint} needs a file"),
            )),
            [target] => parse_target(target, None),
            [hint, target] if hint.len() > 1 && hint.starts_with('+') => {
                let line = parse_hint(&hint[1..])?;
                parse_target(target, Some(line))
            }
            [_, extra, ..] => Err(LoadError::Usage(format!("unexpected argument: {extra}"))),
        }
    }
}
