//! Editing primitives — inserts, deletes, and block operations.
//!
//! Every function here mutates a window/file pair and leaves the dirty
//! flags consistent: in-place edits mark the touched line, edits that add
//! or remove lines mark the whole file (everything below shifts on
//! screen). Rehighlighting happens immediately on the lines that changed.
//!
//! The delete-count rule scans the bytes left of the cursor once,
//! keeping a trailing-space run and a trailing-identifier run that each
//! reset to zero on a byte of any other class. A Ctrl-delete takes the
//! longer of the two runs (at least one byte, so a trailing punctuation
//! run is consumed one byte at a time); a plain delete takes one
//! indentation level when the whole prefix is spaces at a full stop,
//! else a single byte.

use crate::config::Config;
use crate::error::EditError;
use crate::file::File;
use crate::line::Line;
use crate::position::Pos;
use crate::window::{Mark, Window};

use slate_term::input::{Key, KeyCode};

#[inline]
fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

// ---------------------------------------------------------------------------
// Inserts
// ---------------------------------------------------------------------------

/// Insert one printable byte at the cursor.
pub fn insert_char(w: &mut Window, f: &mut File, b: u8) {
    let Pos { x, y } = w.cursor;
    f.lines[y].chars.insert(x, b);
    w.cursor.x += 1;
    w.cursor_ideal = w.cursor.x;
    f.touch_line(y);
}

/// Insert spaces up to the next indentation stop.
pub fn insert_tab(w: &mut Window, f: &mut File, cfg: &Config) {
    let n = cfg.spaces_per_tab - (w.cursor.x % cfg.spaces_per_tab);
    for _ in 0..n {
        insert_char(w, f, b' ');
    }
}

/// Split the current line at the cursor with smart indentation.
///
/// The new line starts with the pre-split line's leading spaces, plus one
/// extra level when the byte left of the cursor is `{`. When that `{` was
/// also the previous keypress — the user is typing an empty brace pair —
/// a closing `}` line at the original indent is inserted after the new
/// line, so `{` Enter yields a ready-to-fill body.
pub fn insert_newline(w: &mut Window, f: &mut File, cfg: &Config) {
    let Pos { x, y } = w.cursor;
    let lead = f.lines[y].leading_spaces();
    let after_brace = x > 0 && f.lines[y].chars[x - 1] == b'{';

    let mut indent = lead;
    if after_brace {
        indent += cfg.spaces_per_tab;
    }

    let tail = f.lines[y].chars.split_off(x);
    let mut new_chars = vec![b' '; indent];
    new_chars.extend(tail);
    f.lines.insert(y + 1, Line::from_bytes(new_chars));

    let typed_brace = w.previous_key == Some(Key::plain(KeyCode::Char(b'{')));
    if after_brace && typed_brace {
        let mut close = vec![b' '; lead];
        close.push(b'}');
        f.lines.insert(y + 2, Line::from_bytes(close));
        f.rehighlight(y + 2);
    }

    f.rehighlight(y);
    f.rehighlight(y + 1);
    f.touch_all();

    w.cursor = Pos::new(indent, y + 1);
    w.cursor_ideal = indent;
}

// ---------------------------------------------------------------------------
// Deletes
// ---------------------------------------------------------------------------

/// Delete the byte left of the cursor; at column 0, join with the line
/// above. At the file origin this is a no-op.
pub fn delete_char(w: &mut Window, f: &mut File) {
    let Pos { x, y } = w.cursor;

    if x > 0 {
        f.lines[y].chars.remove(x - 1);
        w.cursor.x -= 1;
        f.touch_line(y);
    } else if y > 0 {
        let removed = f.lines.remove(y);
        let prev_len = f.lines[y - 1].len();
        f.lines[y - 1].chars.extend(removed.chars);
        w.cursor = Pos::new(prev_len, y - 1);
        f.rehighlight(y - 1);
        f.touch_all();
    }

    w.cursor_ideal = w.cursor.x;
}

/// How many bytes a delete keypress removes, given the line content left
/// of position `x`.
///
/// One scan over the prefix tracks the trailing space run and the
/// trailing identifier run; either run resets to zero the moment a byte
/// of any other class appears, so at most one of them is nonzero at the
/// cursor. Ctrl-delete removes the longer run, and at least one byte.
#[must_use]
pub fn delete_count(line: &[u8], x: usize, ctrl: bool, spaces_per_tab: usize) -> usize {
    let mut space_run = 0usize;
    let mut ident_run = 0usize;
    let mut leading = true;

    for &b in &line[..x.min(line.len())] {
        if b == b' ' {
            space_run += 1;
        } else {
            leading = false;
            space_run = 0;
        }
        if is_ident(b) {
            ident_run += 1;
        } else {
            ident_run = 0;
        }
    }

    if ctrl {
        return space_run.max(ident_run).max(1);
    }

    if leading && x > 0 && x % spaces_per_tab == 0 {
        spaces_per_tab
    } else {
        1
    }
}

/// Delete a word or indentation unit leftward.
pub fn delete_unit(w: &mut Window, f: &mut File, ctrl: bool, cfg: &Config) {
    let count = delete_count(
        f.line(w.cursor.y),
        w.cursor.x,
        ctrl,
        cfg.spaces_per_tab,
    );
    for _ in 0..count {
        delete_char(w, f);
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Place the mark at the cursor.
pub fn set_mark(w: &mut Window) {
    w.mark = Mark {
        pos: w.cursor,
        valid: true,
    };
}

/// Order two positions into `(start, end)` in document order.
#[must_use]
pub fn block_normalize(a: Pos, b: Pos) -> (Pos, Pos) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Serialize the marked block to the clipboard.
///
/// A same-line block is the byte range `[start.x, end.x)`. Across lines:
/// the start line's tail, each intermediate whole line, and the end
/// line's head, joined by `\n`.
///
/// # Errors
///
/// [`EditError::NoMark`] without a valid mark.
pub fn copy(w: &Window, f: &File, clipboard: &mut Vec<u8>) -> Result<(), EditError> {
    if !w.mark.valid {
        return Err(EditError::NoMark);
    }
    let (start, end) = block_normalize(w.mark.pos, w.cursor);

    clipboard.clear();
    if start.y == end.y {
        let line = f.line(start.y);
        clipboard.extend_from_slice(&line[start.x.min(line.len())..end.x.min(line.len())]);
    } else {
        let first = f.line(start.y);
        clipboard.extend_from_slice(&first[start.x.min(first.len())..]);
        clipboard.push(b'\n');
        for y in start.y + 1..end.y {
            clipboard.extend_from_slice(f.line(y));
            clipboard.push(b'\n');
        }
        let last = f.line(end.y);
        clipboard.extend_from_slice(&last[..end.x.min(last.len())]);
    }
    Ok(())
}

/// Copy the block, then delete it: the start line keeps its head and
/// gains the end line's tail, everything between goes, and the cursor
/// lands on the start position.
///
/// # Errors
///
/// [`EditError::NoMark`] without a valid mark.
pub fn cut(w: &mut Window, f: &mut File, clipboard: &mut Vec<u8>) -> Result<(), EditError> {
    copy(w, f, clipboard)?;
    let (start, end) = block_normalize(w.mark.pos, w.cursor);

    if start.y == end.y {
        let line = &mut f.lines[start.y].chars;
        line.drain(start.x.min(line.len())..end.x.min(line.len()));
        f.touch_line(start.y);
    } else {
        let last = &f.lines[end.y].chars;
        let suffix = last[end.x.min(last.len())..].to_vec();
        let first = &mut f.lines[start.y].chars;
        first.truncate(start.x);
        first.extend(suffix);
        f.lines.drain(start.y + 1..=end.y);
        f.rehighlight(start.y);
        f.touch_all();
    }

    w.cursor = start;
    w.cursor_ideal = start.x;
    w.mark = Mark {
        pos: start,
        valid: true,
    };
    Ok(())
}

/// Insert the clipboard at the cursor.
///
/// Embedded `\n` bytes split the current line; the original line's tail
/// survives after the pasted text. The mark is set to the pre-paste
/// cursor, so the pasted block is immediately selectable.
///
/// # Errors
///
/// [`EditError::EmptyClipboard`] when there is nothing to paste.
pub fn paste(w: &mut Window, f: &mut File, clipboard: &[u8]) -> Result<(), EditError> {
    if clipboard.is_empty() {
        return Err(EditError::EmptyClipboard);
    }

    let Pos { x, y } = w.cursor;
    w.mark = Mark {
        pos: w.cursor,
        valid: true,
    };

    if !clipboard.contains(&b'\n') {
        f.lines[y].chars.splice(x..x, clipboard.iter().copied());
        w.cursor.x += clipboard.len();
        f.touch_line(y);
    } else {
        let tail = f.lines[y].chars.split_off(x);
        let mut segments = clipboard.split(|&b| b == b'\n');

        let first = segments.next().unwrap_or(&[]);
        f.lines[y].chars.extend_from_slice(first);

        let rest: Vec<&[u8]> = segments.collect();
        let count = rest.len();
        for (i, segment) in rest.into_iter().enumerate() {
            let mut chars = segment.to_vec();
            if i + 1 == count {
                w.cursor = Pos::new(chars.len(), y + i + 1);
                chars.extend(tail.iter().copied());
            }
            f.lines.insert(y + 1 + i, Line::from_bytes(chars));
        }

        for line in y..=y + count {
            f.rehighlight(line);
        }
        f.touch_all();
    }

    w.cursor_ideal = w.cursor.x;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
