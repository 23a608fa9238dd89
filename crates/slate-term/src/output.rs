// SPDX-License-Identifier: MIT
//
// Output buffering and stateful style emission.
//
// Two components work together to minimize terminal I/O:
//
//   OutputBuffer — accumulates all ANSI bytes in memory so the entire frame
//   can be written in a single write() syscall. This eliminates per-escape
//   overhead and keeps the terminal's input parser happy.
//
//   StyleWriter — tracks the colors and bold state last emitted and skips
//   redundant SGR sequences. The renderer switches styles mid-row as search
//   matches enter and exit; without elision every cell would carry a full
//   fg+bg sequence.
//
// Together these reduce frame output from thousands of small writes with
// redundant escapes to a single write with minimal escapes.

use std::io::{self, Write};

use crate::ansi;
use crate::color::Rgb;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates ANSI output for a single `write()` syscall.
///
/// Instead of hundreds of small writes per frame (cursor moves, color
/// changes, characters), everything goes into this buffer first. A single
/// flush at frame end writes it all at once.
///
/// Default capacity: 16 KB — enough for most frames without reallocation.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&self.buf)?;
            stdout.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_stdout() / flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── StyleWriter ─────────────────────────────────────────────────────────────

/// Stateful style emitter that skips redundant SGR sequences.
///
/// Remembers the last foreground, background, and bold state written to the
/// buffer. Setting the same style twice emits nothing the second time.
/// Call [`invalidate`](Self::invalidate) after any raw SGR reset so the
/// tracked state doesn't go stale.
pub struct StyleWriter {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    bold: bool,
}

impl StyleWriter {
    /// Create a writer with unknown terminal state (everything emits once).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
        }
    }

    /// Set the foreground color, emitting only on change.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    pub fn set_fg(&mut self, w: &mut impl Write, c: Rgb) -> io::Result<()> {
        if self.fg != Some(c) {
            ansi::fg(w, c)?;
            self.fg = Some(c);
        }
        Ok(())
    }

    /// Set the background color, emitting only on change.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    pub fn set_bg(&mut self, w: &mut impl Write, c: Rgb) -> io::Result<()> {
        if self.bg != Some(c) {
            ansi::bg(w, c)?;
            self.bg = Some(c);
        }
        Ok(())
    }

    /// Set both colors at once.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    pub fn set_colors(&mut self, w: &mut impl Write, fg: Rgb, bg: Rgb) -> io::Result<()> {
        self.set_fg(w, fg)?;
        self.set_bg(w, bg)
    }

    /// Enable or disable bold.
    ///
    /// Disabling requires a full SGR reset (there is no reliable "bold off"
    /// across terminals), which also clears the tracked colors.
    ///
    /// # Errors
    ///
    /// Propagates writer errors.
    pub fn set_bold(&mut self, w: &mut impl Write, on: bool) -> io::Result<()> {
        if self.bold == on {
            return Ok(());
        }
        if on {
            ansi::bold(w)?;
            self.bold = true;
        } else {
            ansi::reset(w)?;
            self.invalidate();
        }
        Ok(())
    }

    /// Forget the tracked state (after a raw SGR reset or frame start).
    pub fn invalidate(&mut self) {
        self.fg = None;
        self.bg = None;
        self.bold = false;
    }
}

impl Default for StyleWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── OutputBuffer ─────────────────────────────────────────────────

    #[test]
    fn buffer_starts_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn buffer_accumulates_writes() {
        let mut buf = OutputBuffer::new();
        buf.write_all(b"hello").unwrap();
        buf.write_all(b" world").unwrap();
        assert_eq!(buf.as_bytes(), b"hello world");
    }

    #[test]
    fn buffer_flush_to_writes_everything_once() {
        let mut buf = OutputBuffer::new();
        buf.write_all(b"frame").unwrap();
        let mut out = Vec::new();
        buf.flush_to(&mut out).unwrap();
        assert_eq!(out, b"frame");
        assert!(buf.is_empty());
    }

    #[test]
    fn buffer_flush_empty_writes_nothing() {
        let mut buf = OutputBuffer::new();
        let mut out = Vec::new();
        buf.flush_to(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn buffer_clear_resets() {
        let mut buf = OutputBuffer::new();
        buf.write_all(b"junk").unwrap();
        buf.clear();
        assert!(buf.is_empty());
    }

    // ── StyleWriter ──────────────────────────────────────────────────

    #[test]
    fn style_emits_first_color() {
        let mut sw = StyleWriter::new();
        let mut out = Vec::new();
        sw.set_fg(&mut out, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(out, b"\x1b[38;2;1;2;3m");
    }

    #[test]
    fn style_skips_repeated_color() {
        let mut sw = StyleWriter::new();
        let mut out = Vec::new();
        let c = Rgb::new(1, 2, 3);
        sw.set_fg(&mut out, c).unwrap();
        let after_first = out.len();
        sw.set_fg(&mut out, c).unwrap();
        assert_eq!(out.len(), after_first, "second identical fg must emit nothing");
    }

    #[test]
    fn style_emits_changed_color() {
        let mut sw = StyleWriter::new();
        let mut out = Vec::new();
        sw.set_bg(&mut out, Rgb::new(0, 0, 0)).unwrap();
        let after_first = out.len();
        sw.set_bg(&mut out, Rgb::new(9, 9, 9)).unwrap();
        assert!(out.len() > after_first);
    }

    #[test]
    fn style_bold_off_resets_tracked_colors() {
        let mut sw = StyleWriter::new();
        let mut out = Vec::new();
        let c = Rgb::new(1, 2, 3);
        sw.set_fg(&mut out, c).unwrap();
        sw.set_bold(&mut out, true).unwrap();
        sw.set_bold(&mut out, false).unwrap();
        // After the reset, the same fg must be re-emitted.
        let before = out.len();
        sw.set_fg(&mut out, c).unwrap();
        assert!(out.len() > before);
    }

    #[test]
    fn style_invalidate_forces_reemission() {
        let mut sw = StyleWriter::new();
        let mut out = Vec::new();
        let c = Rgb::new(4, 5, 6);
        sw.set_fg(&mut out, c).unwrap();
        sw.invalidate();
        let before = out.len();
        sw.set_fg(&mut out, c).unwrap();
        assert!(out.len() > before);
    }
}
