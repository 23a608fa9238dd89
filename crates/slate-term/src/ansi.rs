// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the `StyleWriter`'s job. This
// module just knows the byte-level encoding of every terminal command the
// renderer needs: cursor addressing, line/screen clearing, SGR colors and
// bold, cursor visibility, the OSC color-programming commands, and the
// alternate screen.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

use crate::color::Rgb;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Clear the line the cursor is on (EL 2).
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2K")
}

/// Switch to the alternate screen buffer.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Return to the primary screen buffer.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── SGR attributes ──────────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Enable bold (SGR 1).
#[inline]
pub fn bold(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[1m")
}

/// Set the foreground (text) color using 24-bit TrueColor.
#[inline]
pub fn fg(w: &mut impl Write, c: Rgb) -> io::Result<()> {
    write!(w, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b)
}

/// Set the background color using 24-bit TrueColor.
#[inline]
pub fn bg(w: &mut impl Write, c: Rgb) -> io::Result<()> {
    write!(w, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b)
}

// ─── OSC color programming ───────────────────────────────────────────────────

/// Set the terminal's cursor color (OSC 12).
///
/// The renderer uses this to distinguish the editor cursor from the
/// minibar prompt cursor.
#[inline]
pub fn cursor_color(w: &mut impl Write, c: Rgb) -> io::Result<()> {
    write!(w, "\x1b]12;rgb:{:02x}/{:02x}/{:02x}\x07", c.r, c.g, c.b)
}

/// Reset the terminal's cursor color to its default (OSC 112).
#[inline]
pub fn reset_cursor_color(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b]112\x07")
}

/// Program the terminal's default background color (OSC 11).
///
/// Applied on startup and on theme switches so the area outside painted
/// rows matches the editor background.
#[inline]
pub fn default_background(w: &mut impl Write, c: Rgb) -> io::Result<()> {
    write!(w, "\x1b]11;rgb:{:02x}/{:02x}/{:02x}\x07", c.r, c.g, c.b)
}

/// Reset the terminal's default background to its original value (OSC 111).
#[inline]
pub fn reset_default_background(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b]111\x07")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
