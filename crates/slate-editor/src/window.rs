//! Windows — a view onto at most one file.
//!
//! A window carries everything view-local: cursor, ideal column, scroll
//! offset, mark, minibar state, error message, search state, and a cache
//! of per-file viewport snapshots so switching files and switching back
//! lands exactly where you left. The window does not own its file — files
//! are shared through the [`FileTable`](crate::file::FileTable) — and it
//! is itself owned by its leaf region in the layout tree.
//!
//! Cursor motions clamp to file bounds after every move. Horizontal
//! motions update the ideal column; vertical motions aim for it, so a
//! cursor that visits a short line springs back on the next long one.

use std::collections::HashMap;

use slate_term::input::Key;

use crate::error::EditError;
use crate::file::{File, FileId};
use crate::layout::RegionId;
use crate::minibar::Minibar;
use crate::position::Pos;
use crate::search::SearchState;

// ---------------------------------------------------------------------------
// Mark
// ---------------------------------------------------------------------------

/// A second cursor position delimiting a block for copy/cut.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mark {
    pub pos: Pos,
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Per-file snapshots
// ---------------------------------------------------------------------------

/// Viewport state remembered per file, restored by `change_file`.
#[derive(Debug, Clone, Copy)]
pub struct FileViewState {
    pub cursor: Pos,
    pub cursor_ideal: usize,
    pub offset: Pos,
    pub mark: Mark,
    pub previous_key: Option<Key>,
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A window: one file (or none), a viewport, and the per-window substates.
pub struct Window {
    /// The file shown, if any.
    pub file: Option<FileId>,
    /// The leaf region holding this window. Kept current by the layout
    /// engine's geometry pass.
    pub region: RegionId,

    pub cursor: Pos,
    /// Column that vertical motion aims for.
    pub cursor_ideal: usize,
    /// Scroll offset: the file position painted at the viewport origin.
    pub offset: Pos,
    pub mark: Mark,

    pub minibar: Minibar,
    /// Status-bar error message, cleared by Escape.
    pub error: Option<String>,
    pub search: SearchState,

    /// Saved viewport per previously-shown file.
    pub file_states: HashMap<FileId, FileViewState>,

    /// The whole window must be repainted.
    pub redraw: bool,
    /// Last dispatched key; smart indent reads this to detect `{` Enter.
    pub previous_key: Option<Key>,
}

impl Window {
    /// A fresh window with no file, viewing from the origin.
    #[must_use]
    pub fn new(region: RegionId) -> Self {
        Self {
            file: None,
            region,
            cursor: Pos::ZERO,
            cursor_ideal: 0,
            offset: Pos::ZERO,
            mark: Mark::default(),
            minibar: Minibar::default(),
            error: None,
            search: SearchState::default(),
            file_states: HashMap::new(),
            redraw: true,
            previous_key: None,
        }
    }

    // ── File switching ──────────────────────────────────────────────

    /// Show a different file.
    ///
    /// The current viewport is snapshotted under the current file, then
    /// either the target's snapshot is restored or the viewport resets to
    /// the origin. The window is marked dirty either way.
    pub fn change_file(&mut self, new: FileId) {
        if let Some(current) = self.file {
            self.file_states.insert(
                current,
                FileViewState {
                    cursor: self.cursor,
                    cursor_ideal: self.cursor_ideal,
                    offset: self.offset,
                    mark: self.mark,
                    previous_key: self.previous_key,
                },
            );
        }

        self.file = Some(new);
        if let Some(state) = self.file_states.get(&new) {
            self.cursor = state.cursor;
            self.cursor_ideal = state.cursor_ideal;
            self.offset = state.offset;
            self.mark = state.mark;
            self.previous_key = state.previous_key;
        } else {
            self.cursor = Pos::ZERO;
            self.cursor_ideal = 0;
            self.offset = Pos::ZERO;
            self.mark = Mark::default();
            self.previous_key = None;
        }
        self.redraw = true;
    }

    // ── Errors ──────────────────────────────────────────────────────

    /// Put an error message on the status bar.
    pub fn set_error(&mut self, err: &EditError) {
        self.error = Some(err.to_string());
        self.redraw = true;
    }

    /// Clear the status-bar error (Escape).
    pub fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.redraw = true;
        }
    }

    // ── Cursor motion ───────────────────────────────────────────────

    /// One cell left, wrapping to the end of the previous line.
    pub fn move_left(&mut self, file: &File) {
        if self.cursor.x > 0 {
            self.cursor.x -= 1;
        } else if self.cursor.y > 0 {
            self.cursor.y -= 1;
            self.cursor.x = file.line(self.cursor.y).len();
        }
        self.cursor_ideal = self.cursor.x;
    }

    /// One cell right, wrapping to the start of the next line.
    pub fn move_right(&mut self, file: &File) {
        if self.cursor.x < file.line(self.cursor.y).len() {
            self.cursor.x += 1;
        } else if self.cursor.y + 1 < file.line_count() {
            self.cursor.y += 1;
            self.cursor.x = 0;
        }
        self.cursor_ideal = self.cursor.x;
    }

    /// One line up, aiming for the ideal column.
    pub fn move_up(&mut self, file: &File) {
        if self.cursor.y > 0 {
            self.cursor.y -= 1;
        }
        self.cursor.x = self.cursor_ideal.min(file.line(self.cursor.y).len());
    }

    /// One line down, aiming for the ideal column.
    pub fn move_down(&mut self, file: &File) {
        if self.cursor.y + 1 < file.line_count() {
            self.cursor.y += 1;
        }
        self.cursor.x = self.cursor_ideal.min(file.line(self.cursor.y).len());
    }

    /// Home toggle: first press goes to the indentation, second to column 0.
    pub fn move_home(&mut self, file: &File) {
        let lead = file
            .lines
            .get(self.cursor.y)
            .map_or(0, crate::line::Line::leading_spaces);
        self.cursor.x = if self.cursor.x > lead { lead } else { 0 };
        self.cursor_ideal = self.cursor.x;
    }

    /// End of the current line.
    pub fn move_end(&mut self, file: &File) {
        self.cursor.x = file.line(self.cursor.y).len();
        self.cursor_ideal = self.cursor.x;
    }

    /// Half a viewport up: cursor and offset move together.
    pub fn page_up(&mut self, file: &File, half: usize) {
        self.cursor.y = self.cursor.y.saturating_sub(half);
        self.offset.y = self.offset.y.saturating_sub(half);
        self.cursor.x = self.cursor_ideal.min(file.line(self.cursor.y).len());
        self.redraw = true;
    }

    /// Half a viewport down: cursor and offset move together.
    pub fn page_down(&mut self, file: &File, half: usize) {
        let last = file.line_count() - 1;
        self.cursor.y = (self.cursor.y + half).min(last);
        self.offset.y = (self.offset.y + half).min(last);
        self.cursor.x = self.cursor_ideal.min(file.line(self.cursor.y).len());
        self.redraw = true;
    }

    /// Jump to the start of the file.
    pub fn move_file_start(&mut self) {
        self.cursor = Pos::ZERO;
        self.cursor_ideal = 0;
    }

    /// Jump to the end of the file.
    pub fn move_file_end(&mut self, file: &File) {
        self.cursor.y = file.line_count() - 1;
        self.cursor.x = file.line(self.cursor.y).len();
        self.cursor_ideal = self.cursor.x;
    }

    // ── Clamping and scrolling ──────────────────────────────────────

    /// Pull the cursor back inside the file after an edit elsewhere.
    pub fn clamp_cursor(&mut self, file: &File) {
        self.cursor.y = self.cursor.y.min(file.line_count() - 1);
        self.cursor.x = self.cursor.x.min(file.line(self.cursor.y).len());
        if self.mark.valid {
            self.mark.pos.y = self.mark.pos.y.min(file.line_count() - 1);
            self.mark.pos.x = self.mark.pos.x.min(file.line(self.mark.pos.y).len());
        }
    }

    /// Adjust `offset` so the cursor sits at least `margin` cells inside
    /// every edge of a `text_w` × `text_h` viewport. Tiny viewports shrink
    /// the effective margin instead of oscillating.
    pub fn scroll_to_cursor(&mut self, text_w: usize, text_h: usize, margin: usize) {
        if text_w == 0 || text_h == 0 {
            return;
        }
        let old = self.offset;
        let vm = margin.min(text_h.saturating_sub(1) / 2);
        let hm = margin.min(text_w.saturating_sub(1) / 2);

        if self.cursor.y < self.offset.y + vm {
            self.offset.y = self.cursor.y.saturating_sub(vm);
        }
        if self.cursor.y + vm + 1 > self.offset.y + text_h {
            self.offset.y = self.cursor.y + vm + 1 - text_h;
        }
        if self.cursor.x < self.offset.x + hm {
            self.offset.x = self.cursor.x.saturating_sub(hm);
        }
        if self.cursor.x + hm + 1 > self.offset.x + text_w {
            self.offset.x = self.cursor.x + hm + 1 - text_w;
        }

        if self.offset != old {
            self.redraw = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
