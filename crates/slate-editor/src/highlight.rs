//! Per-line syntax highlighting.
//!
//! Each supported language is a static [`Language`] profile: extension
//! matches, comment markers, feature flags, and keyword sets bucketed by
//! byte length so membership is one slice probe plus a handful of compares.
//! A line is highlighted in isolation — no state crosses line boundaries.
//! The profile reserves multi-line comment markers, but the scanner never
//! consults them; cross-line comment tracking is not part of this core.
//!
//! Scanning is a single left-to-right pass:
//!
//! - `"` opens a string that ends at the next `"` or the end of the line
//! - `'` opens a char literal, same termination rule
//! - a maximal digit run at a token start is a number
//! - an identifier is a maximal `[A-Za-z0-9_]` run starting with a letter;
//!   keyword membership colors the whole run
//! - the line-comment marker colors itself and the rest of the line
//! - everything else, including spaces, is the editor foreground

use slate_theme::ColorClass;

/// Longest keyword in any profile; the bucket table has one slot per
/// length up to and including this.
const MAX_KEYWORD_LEN: usize = 8;

/// A static language profile.
pub struct Language {
    pub name: &'static str,
    /// Path suffixes (including the dot) that select this language.
    pub extensions: &'static [&'static str],
    /// Marker that starts a comment running to end of line.
    pub line_comment: &'static [u8],
    /// Multi-line comment delimiters. Reserved: the per-line scanner does
    /// not track state across lines, so these are never consulted.
    pub block_comment: Option<(&'static [u8], &'static [u8])>,
    pub color_comments: bool,
    pub color_strings: bool,
    pub color_chars: bool,
    pub color_numbers: bool,
    /// Keywords bucketed by byte length: `keywords[len]` holds every
    /// keyword of exactly `len` bytes.
    keywords: [&'static [&'static [u8]]; MAX_KEYWORD_LEN + 1],
}

impl Language {
    /// Whether `word` is a keyword of this language.
    #[must_use]
    pub fn is_keyword(&self, word: &[u8]) -> bool {
        match self.keywords.get(word.len()) {
            Some(bucket) => bucket.iter().any(|kw| *kw == word),
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

static C_LANGUAGE: Language = Language {
    name: "c",
    extensions: &[".c", ".h"],
    line_comment: b"//",
    block_comment: Some((b"/*", b"*/")),
    color_comments: true,
    color_strings: true,
    color_chars: true,
    color_numbers: true,
    keywords: [
        &[],
        &[],
        &[b"do", b"if"],
        &[b"for", b"int"],
        &[b"auto", b"case", b"char", b"else", b"enum", b"goto", b"long", b"void"],
        &[b"break", b"const", b"float", b"short", b"union", b"while"],
        &[b"double", b"extern", b"return", b"signed", b"sizeof", b"static", b"struct", b"switch"],
        &[b"default", b"typedef"],
        &[b"continue", b"register", b"unsigned", b"volatile"],
    ],
};

static RUST_LANGUAGE: Language = Language {
    name: "rust",
    extensions: &[".rs"],
    line_comment: b"//",
    block_comment: Some((b"/*", b"*/")),
    color_comments: true,
    color_strings: true,
    color_chars: true,
    color_numbers: true,
    keywords: [
        &[],
        &[],
        &[b"as", b"fn", b"if", b"in"],
        &[b"dyn", b"for", b"let", b"mod", b"mut", b"pub", b"ref", b"use"],
        &[b"else", b"enum", b"impl", b"loop", b"move", b"self", b"Self", b"true", b"type"],
        &[b"async", b"await", b"break", b"const", b"crate", b"false", b"match", b"super", b"trait", b"where", b"while"],
        &[b"extern", b"return", b"static", b"struct", b"unsafe"],
        &[],
        &[b"continue"],
    ],
};

static LANGUAGES: [&Language; 2] = [&C_LANGUAGE, &RUST_LANGUAGE];

/// Select a language profile by path suffix.
///
/// Returns `None` for unrecognized paths; files without a profile are
/// rendered in the plain editor foreground.
#[must_use]
pub fn detect(path: &str) -> Option<&'static Language> {
    LANGUAGES
        .iter()
        .find(|lang| lang.extensions.iter().any(|ext| path.ends_with(ext)))
        .copied()
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

#[inline]
fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Highlight one line: produce a color class per byte.
///
/// The result is always exactly `chars.len()` long.
#[must_use]
pub fn highlight_line(chars: &[u8], lang: &Language) -> Vec<ColorClass> {
    let n = chars.len();
    let mut out = vec![ColorClass::Normal; n];
    let mut i = 0;

    while i < n {
        let b = chars[i];

        // Line comment: colors itself and the rest, then we're done.
        if lang.color_comments
            && !lang.line_comment.is_empty()
            && chars[i..].starts_with(lang.line_comment)
        {
            for slot in &mut out[i..] {
                *slot = ColorClass::Comment;
            }
            break;
        }

        // String literal: to the closing quote or end of line.
        if b == b'"' && lang.color_strings {
            let close = chars[i + 1..].iter().position(|&c| c == b'"');
            let end = close.map_or(n, |off| i + 1 + off + 1);
            for slot in &mut out[i..end] {
                *slot = ColorClass::Str;
            }
            i = end;
            continue;
        }

        // Char literal, same termination rule as strings.
        if b == b'\'' && lang.color_chars {
            let close = chars[i + 1..].iter().position(|&c| c == b'\'');
            let end = close.map_or(n, |off| i + 1 + off + 1);
            for slot in &mut out[i..end] {
                *slot = ColorClass::Char;
            }
            i = end;
            continue;
        }

        // Number: a maximal digit run beginning a token.
        if b.is_ascii_digit() && lang.color_numbers && (i == 0 || !is_ident(chars[i - 1])) {
            let mut end = i + 1;
            while end < n && chars[end].is_ascii_digit() {
                end += 1;
            }
            for slot in &mut out[i..end] {
                *slot = ColorClass::Number;
            }
            i = end;
            continue;
        }

        // Identifier: maximal [A-Za-z0-9_] run starting with a letter.
        if b.is_ascii_alphabetic() && (i == 0 || !is_ident(chars[i - 1])) {
            let mut end = i + 1;
            while end < n && is_ident(chars[end]) {
                end += 1;
            }
            if lang.is_keyword(&chars[i..end]) {
                for slot in &mut out[i..end] {
                    *slot = ColorClass::Keyword;
                }
            }
            i = end;
            continue;
        }

        i += 1;
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(src: &str) -> Vec<ColorClass> {
        highlight_line(src.as_bytes(), &C_LANGUAGE)
    }

    // ── Invariant ────────────────────────────────────────────────────

    #[test]
    fn output_length_equals_input_length() {
        for src in ["", "x", "int main() { return 0; }", "\"unterminated"] {
            assert_eq!(classes(src).len(), src.len());
        }
    }

    // ── Detection ────────────────────────────────────────────────────

    #[test]
    fn detect_by_suffix() {
        assert_eq!(detect("main.c").map(|l| l.name), Some("c"));
        assert_eq!(detect("array.h").map(|l| l.name), Some("c"));
        assert_eq!(detect("lib.rs").map(|l| l.name), Some("rust"));
        assert!(detect("notes.txt").is_none());
        assert!(detect("c").is_none());
    }

    // ── Keywords ─────────────────────────────────────────────────────

    #[test]
    fn keyword_run_is_fully_colored() {
        let out = classes("return x");
        assert!(out[..6].iter().all(|&c| c == ColorClass::Keyword));
        assert_eq!(out[6], ColorClass::Normal); // space
        assert_eq!(out[7], ColorClass::Normal); // x
    }

    #[test]
    fn keyword_prefix_of_identifier_is_not_keyword() {
        // "iffy" starts with "if" but is one identifier.
        let out = classes("iffy");
        assert!(out.iter().all(|&c| c == ColorClass::Normal));
    }

    #[test]
    fn keyword_lookup_dispatches_on_length() {
        assert!(C_LANGUAGE.is_keyword(b"if"));
        assert!(C_LANGUAGE.is_keyword(b"continue"));
        assert!(!C_LANGUAGE.is_keyword(b"fn"));
        assert!(!C_LANGUAGE.is_keyword(b"averyverylongword"));
        assert!(RUST_LANGUAGE.is_keyword(b"fn"));
    }

    // ── Strings and chars ────────────────────────────────────────────

    #[test]
    fn string_spans_to_closing_quote() {
        let out = classes("x \"ab\" y");
        assert_eq!(out[0], ColorClass::Normal);
        assert!(out[2..6].iter().all(|&c| c == ColorClass::Str));
        assert_eq!(out[7], ColorClass::Normal);
    }

    #[test]
    fn unterminated_string_runs_to_line_end() {
        let out = classes("a \"bc");
        assert!(out[2..].iter().all(|&c| c == ColorClass::Str));
    }

    #[test]
    fn keywords_inside_strings_stay_strings() {
        let out = classes("\"return\"");
        assert!(out.iter().all(|&c| c == ColorClass::Str));
    }

    #[test]
    fn char_literal() {
        let out = classes("'x' y");
        assert!(out[..3].iter().all(|&c| c == ColorClass::Char));
        assert_eq!(out[4], ColorClass::Normal);
    }

    // ── Numbers ──────────────────────────────────────────────────────

    #[test]
    fn number_run() {
        let out = classes("x = 1234;");
        assert!(out[4..8].iter().all(|&c| c == ColorClass::Number));
        assert_eq!(out[8], ColorClass::Normal);
    }

    #[test]
    fn digits_inside_identifier_are_not_numbers() {
        let out = classes("var42");
        assert!(out.iter().all(|&c| c == ColorClass::Normal));
    }

    // ── Comments ─────────────────────────────────────────────────────

    #[test]
    fn comment_colors_rest_of_line() {
        let out = classes("int x; // count");
        assert!(out[..5].iter().any(|&c| c == ColorClass::Keyword));
        assert!(out[7..].iter().all(|&c| c == ColorClass::Comment));
    }

    #[test]
    fn comment_marker_inside_string_is_string() {
        let out = classes("\"no // comment\"");
        assert!(out.iter().all(|&c| c == ColorClass::Str));
    }

    #[test]
    fn line_starting_with_comment() {
        let out = classes("// all of it");
        assert!(out.iter().all(|&c| c == ColorClass::Comment));
    }

    // ── Plain text ───────────────────────────────────────────────────

    #[test]
    fn spaces_and_punctuation_are_normal() {
        let out = classes("a + b");
        assert!(out.iter().all(|&c| c == ColorClass::Normal));
    }
}
