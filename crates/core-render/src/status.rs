//! Footer composition.
//!
//! The footer has two rows: key hints for the active context, then a status
//! row. Status content is built in two stages, like the header: `compose_status`
//! yields ordered segments, the painter (or `format_status` in tests) lays them
//! out left to right separated by two spaces.
//!
//! Status row precedence: save-as prompt, then find prompt, then an unexpired
//! ephemeral message, then the cursor/selection summary.

use core_state::{EditorState, EphemeralMessage, MessageKind, TextField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintContext {
    Editing,
    Find,
    Prompt,
}

pub fn hint_context(state: &EditorState) -> HintContext {
    if state.save_prompt.is_some() {
        HintContext::Prompt
    } else if state.find.is_some() {
        HintContext::Find
    } else {
        HintContext::Editing
    }
}

pub fn hints(ctx: HintContext) -> &'static str {
    match ctx {
        HintContext::Editing => {
            "^S Save  ^Q Quit  ^F Find  ^Z Undo  ^Y Redo  ^C Copy  ^X Cut  ^V Paste  ^A All"
        }
        HintContext::Find => "Enter/Down Next  Up Prev  Tab/^F Accept  Esc Cancel  /re/ Regex",
        HintContext::Prompt => "Enter Save  Esc Cancel",
    }
}

#[derive(Debug, Clone)]
pub enum StatusSegment<'a> {
    /// Prompt label, e.g. `Find:`.
    Label(&'static str),
    /// Editable footer field; the painter draws its selection and places the cursor.
    Field(&'a TextField),
    /// Find summary (`n/m`, `no matches`).
    Summary(String),
    /// Regex compile error.
    Error(String),
    Message(&'a EphemeralMessage),
    Position { line_1: usize, col_1: usize },
    Selected { chars: usize, lines: usize },
    Lines(usize),
}

pub fn compose_status(state: &EditorState) -> Vec<StatusSegment<'_>> {
    let mut out = Vec::with_capacity(4);
    if let Some(field) = &state.save_prompt {
        out.push(StatusSegment::Label("Save as:"));
        out.push(StatusSegment::Field(field));
        return out;
    }
    if let Some(find) = &state.find {
        out.push(StatusSegment::Label("Find:"));
        out.push(StatusSegment::Field(&find.field));
        let summary = find.summary();
        if find.error.is_some() {
            out.push(StatusSegment::Error(summary));
        } else if !summary.is_empty() {
            out.push(StatusSegment::Summary(summary));
        }
        return out;
    }
    if let Some(msg) = &state.ephemeral_status {
        out.push(StatusSegment::Message(msg));
        return out;
    }
    match state.selection_range() {
        Some((s, e)) => {
            let chars = state.selected_text().map(|t| t.chars().count()).unwrap_or(0);
            out.push(StatusSegment::Selected {
                chars,
                lines: e.line - s.line + 1,
            });
        }
        None => out.push(StatusSegment::Position {
            line_1: state.cursor.line + 1,
            col_1: state.cursor.column + 1,
        }),
    }
    out.push(StatusSegment::Lines(state.buffer.line_count()));
    out
}

/// Text of one segment. Fields render their full text.
pub fn segment_text(seg: &StatusSegment<'_>) -> String {
    match seg {
        StatusSegment::Label(l) => (*l).to_string(),
        StatusSegment::Field(f) => f.text().to_string(),
        StatusSegment::Summary(s) | StatusSegment::Error(s) => s.clone(),
        StatusSegment::Message(m) => m.text.clone(),
        StatusSegment::Position { line_1, col_1 } => format!("Ln {line_1}, Col {col_1}"),
        StatusSegment::Selected { chars, lines: 1 } => format!("{chars} selected"),
        StatusSegment::Selected { chars, lines } => format!("{chars} selected ({lines} lines)"),
        StatusSegment::Lines(1) => "1 line".to_string(),
        StatusSegment::Lines(n) => format!("{n} lines"),
    }
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let parts: Vec<String> = segments.iter().map(segment_text).collect();
    match segments.first() {
        // Label and field are separated by a single space.
        Some(StatusSegment::Label(_)) if parts.len() >= 2 => {
            let mut s = format!("{} {}", parts[0], parts[1]);
            for p in &parts[2..] {
                s.push_str("  ");
                s.push_str(p);
            }
            s
        }
        _ => parts.join("  "),
    }
}

pub fn message_flags(kind: MessageKind) -> crate::CellFlags {
    match kind {
        MessageKind::Info => crate::CellFlags::empty(),
        MessageKind::Warning => crate::CellFlags::WARNING | crate::CellFlags::BOLD,
        MessageKind::Error => crate::CellFlags::ERROR | crate::CellFlags::BOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{FindState, SavedView, Selection};
    use core_text::{Buffer, Position};
    use std::time::Instant;

    fn st(lines: &[&str]) -> EditorState {
        EditorState::new(Buffer::new(lines.iter().map(|s| s.to_string()).collect()), None)
    }

    #[test]
    fn position_and_line_count() {
        let mut s = st(&["abc", "def"]);
        s.cursor = Position::new(1, 2);
        assert_eq!(format_status(&compose_status(&s)), "Ln 2, Col 3  2 lines");
    }

    #[test]
    fn selection_summary_counts_scalars_and_lines() {
        let mut s = st(&["héllo", "wörld"]);
        s.selection = Some(Selection::range(Position::new(0, 3), Position::new(1, 2)));
        assert_eq!(format_status(&compose_status(&s)), "5 selected (2 lines)  2 lines");
    }

    #[test]
    fn find_prompt_shows_query_and_summary() {
        let mut s = st(&["cat cat"]);
        let mut f = FindState::new(
            SavedView {
                cursor: Position::origin(),
                selection: None,
                scroll_top: 0,
            },
            "cat",
        );
        f.recompute(&s.buffer);
        s.find = Some(f);
        assert_eq!(format_status(&compose_status(&s)), "Find: cat  1/2");
    }

    #[test]
    fn message_beats_position_and_prompt_beats_message() {
        let mut s = st(&[""]);
        s.set_ephemeral_at("Saved", MessageKind::Info, Instant::now());
        assert_eq!(format_status(&compose_status(&s)), "Saved");
        s.save_prompt = Some(TextField::with_text("out.txt"));
        assert_eq!(format_status(&compose_status(&s)), "Save as: out.txt");
    }

    #[test]
    fn hints_follow_context() {
        let mut s = st(&[""]);
        assert!(hints(hint_context(&s)).starts_with("^S Save"));
        s.save_prompt = Some(TextField::new());
        assert_eq!(hints(hint_context(&s)), "Enter Save  Esc Cancel");
    }
}
