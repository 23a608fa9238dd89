//! The minibar — the single-row prompt at the bottom of a region.
//!
//! One minibar per window, driven as a small mode machine: inactive, or
//! one of the four active prompts (open, new, command, find). Every active
//! mode edits the same byte buffer with its own cursor and horizontal
//! scroll; Enter commits, Escape cancels. What a commit *does* is the
//! editor's business — this module owns the buffer, the modes, and the
//! command-string parser.

use crate::edit;
use crate::error::EditError;

// ---------------------------------------------------------------------------
// Mode machine
// ---------------------------------------------------------------------------

/// The minibar's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinibarMode {
    /// No prompt; keys go to the editor.
    #[default]
    Inactive,
    /// Prompting for a path to open.
    Open,
    /// Prompting for a path to create.
    New,
    /// Prompting for a command string.
    Command,
    /// Incremental search input.
    Find,
}

impl MinibarMode {
    /// The prompt text painted before the typed input.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Inactive => "",
            Self::Open => "open: ",
            Self::New => "new: ",
            Self::Command => "command: ",
            Self::Find => "find: ",
        }
    }
}

/// Per-window minibar state: mode, typed bytes, cursor, and scroll.
#[derive(Debug, Clone, Default)]
pub struct Minibar {
    pub mode: MinibarMode,
    /// The typed input.
    pub data: Vec<u8>,
    /// Cursor position within `data`.
    pub cursor: usize,
    /// First visible byte of `data` (horizontal scroll).
    pub offset: usize,
}

impl Minibar {
    /// Whether a prompt is active (keys route here instead of the editor).
    #[inline]
    #[must_use]
    pub fn active(&self) -> bool {
        self.mode != MinibarMode::Inactive
    }

    /// Enter a prompt mode with an empty buffer.
    pub fn activate(&mut self, mode: MinibarMode) {
        self.mode = mode;
        self.data.clear();
        self.cursor = 0;
        self.offset = 0;
    }

    /// Leave the prompt, discarding the buffer.
    pub fn deactivate(&mut self) {
        self.activate(MinibarMode::Inactive);
    }

    /// Insert a printable byte at the cursor.
    pub fn insert(&mut self, b: u8) {
        self.data.insert(self.cursor, b);
        self.cursor += 1;
    }

    /// Delete leftward using the editor's unit rule.
    ///
    /// Returns `true` when anything was removed.
    pub fn delete(&mut self, ctrl: bool, spaces_per_tab: usize) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let count = edit::delete_count(&self.data, self.cursor, ctrl, spaces_per_tab)
            .min(self.cursor);
        self.data.drain(self.cursor - count..self.cursor);
        self.cursor -= count;
        true
    }

    /// Cursor one byte left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Cursor one byte right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.data.len());
    }

    /// Cursor to the start of the input.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Cursor to the end of the input.
    pub fn move_end(&mut self) {
        self.cursor = self.data.len();
    }

    /// Pull `offset` so the cursor stays at least the given margins away
    /// from the visible span's edges. `width` is the cells available for
    /// the typed text on the status bar.
    pub fn scroll(&mut self, width: usize, left_margin: usize, right_margin: usize) {
        if width == 0 {
            self.offset = self.cursor;
            return;
        }
        let right_edge = width.saturating_sub(right_margin + 1);
        if self.cursor < self.offset + left_margin {
            self.offset = self.cursor.saturating_sub(left_margin);
        }
        if self.cursor > self.offset + right_edge {
            self.offset = self.cursor - right_edge;
        }
    }
}

// ---------------------------------------------------------------------------
// Command parsing
// ---------------------------------------------------------------------------

/// A parsed minibar command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `split -` — stacked split (horizontal divider).
    SplitStacked,
    /// `split |` — side-by-side split.
    SplitSide,
    /// `theme <name|index>` — switch the palette.
    Theme(String),
    /// `close` — remove the focused window.
    Close,
    /// `resize <n>` — grow (or shrink, negative) the focused window.
    Resize(i64),
    /// `swap` — exchange the focused window with its sibling.
    Swap,
}

/// Parse a command string.
///
/// Tokens are whitespace-separated. Identifiers are `[A-Za-z0-9_]+` (a
/// leading digit is accepted); numbers are base 10.
///
/// # Errors
///
/// [`EditError::SplitFailed`] for `split` without a direction,
/// [`EditError::UnknownCommand`] for everything unrecognized.
pub fn parse(input: &[u8]) -> Result<Command, EditError> {
    let text = String::from_utf8_lossy(input);
    let mut tokens = text.split_whitespace();

    let unknown = || EditError::UnknownCommand {
        name: text.trim().to_string(),
    };

    match tokens.next() {
        Some("split") => match tokens.next() {
            Some("-") => Ok(Command::SplitStacked),
            Some("|") => Ok(Command::SplitSide),
            _ => Err(EditError::SplitFailed),
        },
        Some("theme") => match tokens.next() {
            Some(arg) => Ok(Command::Theme(arg.to_string())),
            None => Err(unknown()),
        },
        Some("close") => Ok(Command::Close),
        Some("swap") => Ok(Command::Swap),
        Some("resize") => match tokens.next().and_then(|t| t.parse::<i64>().ok()) {
            Some(n) => Ok(Command::Resize(n)),
            None => Err(unknown()),
        },
        _ => Err(unknown()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ── Mode machine ─────────────────────────────────────────────────

    #[test]
    fn starts_inactive() {
        let bar = Minibar::default();
        assert!(!bar.active());
        assert_eq!(bar.mode, MinibarMode::Inactive);
    }

    #[test]
    fn activate_clears_previous_input() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Open);
        bar.insert(b'x');
        bar.activate(MinibarMode::Find);
        assert!(bar.data.is_empty());
        assert_eq!(bar.cursor, 0);
        assert!(bar.active());
    }

    #[test]
    fn deactivate_discards_buffer() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Command);
        bar.insert(b'q');
        bar.deactivate();
        assert!(!bar.active());
        assert!(bar.data.is_empty());
    }

    // ── Editing ──────────────────────────────────────────────────────

    #[test]
    fn insert_advances_cursor() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Open);
        for b in b"a.c" {
            bar.insert(*b);
        }
        assert_eq!(bar.data, b"a.c");
        assert_eq!(bar.cursor, 3);
    }

    #[test]
    fn insert_mid_buffer() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Open);
        bar.insert(b'a');
        bar.insert(b'c');
        bar.move_left();
        bar.insert(b'b');
        assert_eq!(bar.data, b"abc");
        assert_eq!(bar.cursor, 2);
    }

    #[test]
    fn delete_removes_one() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Open);
        bar.insert(b'a');
        bar.insert(b'b');
        assert!(bar.delete(false, 2));
        assert_eq!(bar.data, b"a");
        assert_eq!(bar.cursor, 1);
    }

    #[test]
    fn delete_at_start_is_noop() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Open);
        assert!(!bar.delete(false, 2));
    }

    #[test]
    fn ctrl_delete_removes_word() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Command);
        for b in b"theme paper" {
            bar.insert(*b);
        }
        assert!(bar.delete(true, 2));
        assert_eq!(bar.data, b"theme ");
    }

    #[test]
    fn cursor_motion_clamps() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Open);
        bar.move_left();
        assert_eq!(bar.cursor, 0);
        bar.insert(b'x');
        bar.move_right();
        assert_eq!(bar.cursor, 1);
        bar.move_home();
        assert_eq!(bar.cursor, 0);
        bar.move_end();
        assert_eq!(bar.cursor, 1);
    }

    // ── Scroll ───────────────────────────────────────────────────────

    #[test]
    fn scroll_keeps_cursor_inside_right_margin() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Find);
        for _ in 0..30 {
            bar.insert(b'x');
        }
        bar.scroll(20, 6, 6);
        // Cursor at 30, window width 20, right margin 6: offset pulls so
        // the cursor sits at the right-edge boundary.
        assert!(bar.cursor - bar.offset <= 13);
    }

    #[test]
    fn scroll_keeps_cursor_inside_left_margin() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Find);
        for _ in 0..30 {
            bar.insert(b'x');
        }
        bar.scroll(20, 6, 6);
        for _ in 0..25 {
            bar.move_left();
        }
        bar.scroll(20, 6, 6);
        assert!(bar.cursor >= bar.offset);
        assert!(bar.cursor - bar.offset >= 5.min(bar.cursor));
    }

    #[test]
    fn scroll_short_input_stays_at_zero() {
        let mut bar = Minibar::default();
        bar.activate(MinibarMode::Open);
        bar.insert(b'a');
        bar.scroll(40, 6, 6);
        assert_eq!(bar.offset, 0);
    }

    // ── Prompts ──────────────────────────────────────────────────────

    #[test]
    fn prompts_per_mode() {
        assert_eq!(MinibarMode::Open.prompt(), "open: ");
        assert_eq!(MinibarMode::New.prompt(), "new: ");
        assert_eq!(MinibarMode::Command.prompt(), "command: ");
        assert_eq!(MinibarMode::Find.prompt(), "find: ");
        assert_eq!(MinibarMode::Inactive.prompt(), "");
    }

    // ── Command parsing ──────────────────────────────────────────────

    #[test]
    fn parse_split_directions() {
        assert_eq!(parse(b"split -"), Ok(Command::SplitStacked));
        assert_eq!(parse(b"split |"), Ok(Command::SplitSide));
    }

    #[test]
    fn parse_split_without_direction_fails() {
        assert_eq!(parse(b"split"), Err(EditError::SplitFailed));
        assert_eq!(parse(b"split x"), Err(EditError::SplitFailed));
    }

    #[test]
    fn parse_theme_takes_name_or_index() {
        assert_eq!(parse(b"theme paper"), Ok(Command::Theme("paper".into())));
        assert_eq!(parse(b"theme 2"), Ok(Command::Theme("2".into())));
    }

    #[test]
    fn parse_close_swap_resize() {
        assert_eq!(parse(b"close"), Ok(Command::Close));
        assert_eq!(parse(b"swap"), Ok(Command::Swap));
        assert_eq!(parse(b"resize 3"), Ok(Command::Resize(3)));
        assert_eq!(parse(b"resize -2"), Ok(Command::Resize(-2)));
    }

    #[test]
    fn parse_unknown_surfaces_the_input() {
        let err = parse(b"frobnicate now").unwrap_err();
        assert_eq!(
            err,
            EditError::UnknownCommand {
                name: "frobnicate now".into()
            }
        );
    }

    #[test]
    fn parse_empty_is_unknown() {
        assert!(matches!(
            parse(b""),
            Err(EditError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn parse_extra_whitespace_tolerated() {
        assert_eq!(parse(b"  split   |  "), Ok(Command::SplitSide));
    }
}
