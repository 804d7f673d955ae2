//! Paint the editor model into a `Frame`.
//!
//! Layout (see `core_model::ScreenGeometry`):
//! * row 0: header, file name centered, `●` when dirty;
//! * body rows: gutter (line number on a line's first visual row only), wrapped
//!   text, one scrollbar column at the right edge;
//! * footer: key hints, then the status row (or the find / save-as prompt).
//!
//! Highlight precedence inside the body: current find match, then selection,
//! then other find matches. A selected line break shows as one reversed cell
//! after the line's text.

use core_model::EditorModel;
use core_state::{EditorState, FindMatch};
use core_text::width::prefix_width;
use core_text::str_width;

use crate::status::{StatusSegment, compose_status, hint_context, hints, message_flags, segment_text};
use crate::{CellFlags, Frame};

pub const DIRTY_MARKER: &str = "●";
const THUMB: &str = "█";
const TRACK: &str = "│";

/// A composed frame plus the terminal cursor cell, if it should be shown.
#[derive(Debug, Clone)]
pub struct Composed {
    pub frame: Frame,
    pub cursor: Option<(u16, u16)>,
}

pub fn compose(model: &EditorModel) -> Composed {
    let g = model.geometry;
    let mut frame = Frame::new(g.cols, g.rows);
    if g.cols == 0 || g.rows == 0 {
        return Composed { frame, cursor: None };
    }
    paint_header(&mut frame, &model.state);
    paint_body(&mut frame, model);
    let field_cursor = paint_footer(&mut frame, model);
    let st = &model.state;
    let cursor = if st.save_prompt.is_some() || st.find.is_some() {
        field_cursor
    } else {
        model.cursor_screen()
    };
    Composed { frame, cursor }
}

fn paint_header(frame: &mut Frame, st: &EditorState) {
    frame.apply_flags_span(0, 0, frame.width, CellFlags::HEADER);
    let mut title = st.display_name();
    if st.is_dirty() {
        title.push(' ');
        title.push_str(DIRTY_MARKER);
    }
    let w = str_width(&title) as u16;
    let x = frame.width.saturating_sub(w) / 2;
    frame.put_str(x, 0, &title, CellFlags::HEADER, frame.width);
}

fn body_flags(
    st: &EditorState,
    current: Option<&FindMatch>,
    matches: &[&FindMatch],
    line: usize,
    col: usize,
) -> CellFlags {
    if current.is_some_and(|m| m.line == line && m.columns.contains(&col)) {
        CellFlags::CURRENT_MATCH
    } else if st.is_position_selected(line, col) {
        CellFlags::SELECTION
    } else if matches.iter().any(|m| m.columns.contains(&col)) {
        CellFlags::MATCH
    } else {
        CellFlags::empty()
    }
}

fn paint_body(frame: &mut Frame, model: &EditorModel) {
    let g = model.geometry;
    let st = &model.state;
    let gutter = g.gutter_width(st.buffer.line_count());
    let text_left = gutter as u16;
    let text_limit = g.scrollbar_col();
    let sb = model.scrollbar();
    let find = st.find.as_ref();
    let current = find.and_then(|f| f.current_match());
    let mut buf = [0u8; 4];
    for i in 0..g.body_rows() {
        let y = g.body_top() + i as u16;
        if let Some(row) = model.layout.row(st.scroll_top + i) {
            if row.is_first {
                let num = format!("{:>width$} ", row.line + 1, width = gutter.saturating_sub(1));
                let flags = if row.line == st.cursor.line {
                    CellFlags::BOLD
                } else {
                    CellFlags::GUTTER
                };
                frame.put_str(0, y, &num, flags, text_limit);
            }
            let line = st.buffer.line(row.line).unwrap_or_default();
            let matches: Vec<&FindMatch> = find
                .map(|f| f.matches.iter().filter(|m| m.line == row.line).collect())
                .unwrap_or_default();
            let mut x = text_left;
            let mut last: Option<u16> = None;
            for (col, c) in line.chars().enumerate().take(row.end).skip(row.start) {
                if c.is_control() {
                    continue;
                }
                let w = core_text::char_width(c) as u16;
                if w == 0 {
                    if let Some(lx) = last {
                        frame.append_to_cluster(lx, y, c);
                    }
                    continue;
                }
                if x + w > text_limit {
                    break;
                }
                let flags = body_flags(st, current, &matches, row.line, col);
                frame.set_cluster(x, y, c.encode_utf8(&mut buf), w, flags);
                last = Some(x);
                x += w;
            }
            if row.is_end_of_line
                && x < text_limit
                && st.is_position_selected(row.line, st.buffer.line_len(row.line))
            {
                frame.set_cluster(x, y, " ", 1, CellFlags::SELECTION);
            }
        }
        if sb.visible() && text_limit >= text_left {
            let on_thumb = i >= sb.thumb_top && i < sb.thumb_top + sb.thumb_height;
            let (glyph, flags) = if on_thumb {
                (THUMB, CellFlags::empty())
            } else {
                (TRACK, CellFlags::DIM)
            };
            frame.set_cluster(g.scrollbar_col(), y, glyph, 1, flags);
        }
    }
}

/// Paint hints and status rows. Returns the cursor cell inside a footer field.
fn paint_footer(frame: &mut Frame, model: &EditorModel) -> Option<(u16, u16)> {
    let g = model.geometry;
    let st = &model.state;
    let hint_row = g.footer_top();
    let status_row = hint_row + 1;
    if hint_row < frame.height {
        frame.put_str(0, hint_row, hints(hint_context(st)), CellFlags::DIM, frame.width);
    }
    if status_row >= frame.height {
        return None;
    }
    let width = frame.width;
    let mut x = 0u16;
    let mut cursor = None;
    let segments = compose_status(st);
    for (idx, seg) in segments.iter().enumerate() {
        if idx > 0 {
            let gap = if matches!(segments[idx - 1], StatusSegment::Label(_)) { 1 } else { 2 };
            x = x.saturating_add(gap).min(width);
        }
        match seg {
            StatusSegment::Field(field) => {
                let start = x;
                x = frame.put_str(x, status_row, field.text(), CellFlags::empty(), width);
                if let Some((s, e)) = field.selection() {
                    let sx = start + prefix_width(field.text(), s) as u16;
                    let span = (prefix_width(field.text(), e) - prefix_width(field.text(), s)) as u16;
                    frame.apply_flags_span(sx, status_row, span, CellFlags::SELECTION);
                }
                let cx = start as usize + prefix_width(field.text(), field.cursor());
                cursor = Some(((cx as u16).min(width.saturating_sub(1)), status_row));
            }
            other => {
                let flags = match other {
                    StatusSegment::Label(_) => CellFlags::BOLD,
                    StatusSegment::Error(_) => CellFlags::ERROR,
                    StatusSegment::Message(m) => message_flags(m.kind),
                    _ => CellFlags::empty(),
                };
                x = frame.put_str(x, status_row, &segment_text(other), flags, width);
            }
        }
    }
    cursor
}
