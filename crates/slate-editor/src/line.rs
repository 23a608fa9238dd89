//! A single line of text — bytes, per-byte color classes, and a redraw flag.
//!
//! Lines are owned by their [`File`](crate::file::File) and mutated only
//! through it. The color vector is parallel to the byte vector: after any
//! rehighlight, `colors.len() == chars.len()`. A never-highlighted line has
//! an empty color vector, and the renderer only consults colors when the
//! owning file carries a highlighter.

use slate_theme::ColorClass;

/// One line of a file.
#[derive(Debug, Clone, Default)]
pub struct Line {
    /// The line's bytes, without any terminator.
    pub chars: Vec<u8>,
    /// One color class per byte; empty when never highlighted.
    pub colors: Vec<ColorClass>,
    /// The on-screen representation of this line is stale.
    pub redraw: bool,
}

impl Line {
    /// An empty line, marked for redraw.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chars: Vec::new(),
            colors: Vec::new(),
            redraw: true,
        }
    }

    /// A line holding the given bytes, marked for redraw.
    #[must_use]
    pub fn from_bytes(chars: Vec<u8>) -> Self {
        Self {
            chars,
            colors: Vec::new(),
            redraw: true,
        }
    }

    /// Line length in bytes (equal to cells — the core is single-byte).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the line holds no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of leading space bytes — the indentation depth used by smart
    /// indent and the Home toggle.
    #[must_use]
    pub fn leading_spaces(&self) -> usize {
        self.chars.iter().take_while(|&&b| b == b' ').count()
    }
}
