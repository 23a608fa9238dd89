//! The semantic color palette — the renderer's only view of a theme.
//!
//! The renderer never handles raw RGB choices; it addresses colors by the
//! semantic tokens below. A [`Palette`] is a complete assignment of RGB
//! values to those tokens. Switching themes swaps the whole assignment at
//! once, marks every window dirty, and reprograms the terminal background.

use slate_term::color::Rgb;

/// Color class attached to each byte of a highlighted line.
///
/// `Normal` is the editor foreground; the rest map to the syntax tokens of
/// the palette. Stored per byte so the renderer can switch colors exactly
/// where a token boundary falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorClass {
    #[default]
    Normal,
    Comment,
    Keyword,
    Str,
    Char,
    Number,
}

/// A complete assignment of RGB values to the semantic color tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Theme name, as matched by the `theme` command (case-sensitive).
    pub name: &'static str,

    // ── Editor surface ────────────────────────────────────────────
    /// Text foreground.
    pub editor_fg: Rgb,
    /// Editor background; also programmed as the terminal default.
    pub editor_bg: Rgb,

    // ── Status bar ────────────────────────────────────────────────
    pub status_fg: Rgb,
    pub status_bg: Rgb,

    // ── Cursor ────────────────────────────────────────────────────
    /// Hardware cursor color while editing.
    pub cursor: Rgb,
    /// Hardware cursor color while the minibar prompt is active.
    pub cursor_prompt: Rgb,

    // ── Search matches ────────────────────────────────────────────
    /// Unselected match overlay.
    pub match_fg: Rgb,
    pub match_bg: Rgb,
    /// The selected match.
    pub match_selected_fg: Rgb,
    pub match_selected_bg: Rgb,

    // ── Syntax classes ────────────────────────────────────────────
    pub comment: Rgb,
    pub keyword: Rgb,
    pub string: Rgb,
    pub char_literal: Rgb,
    pub number: Rgb,
}

impl Palette {
    /// Resolve a per-byte color class to its foreground color.
    #[inline]
    #[must_use]
    pub const fn class_fg(&self, class: ColorClass) -> Rgb {
        match class {
            ColorClass::Normal => self.editor_fg,
            ColorClass::Comment => self.comment,
            ColorClass::Keyword => self.keyword,
            ColorClass::Str => self.string,
            ColorClass::Char => self.char_literal,
            ColorClass::Number => self.number,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
