//! Editor configuration — the fixed knobs everything else reads.
//!
//! These values shape indentation, scroll behavior, layout minimums, and
//! the minibar. They are collected in one struct so the editing and render
//! paths never hard-code a number, and so tests can shrink margins when a
//! scenario needs a tiny viewport.

/// Editor-wide configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Spaces inserted per indentation level; also the unit for tab-aware
    /// deletion.
    pub spaces_per_tab: usize,

    /// Minimum cells kept between the cursor and every viewport edge.
    pub margin: usize,

    /// Minimum width of a window leaf. Splits that cannot honor it degrade
    /// to the minimum layout.
    pub min_width: u16,

    /// Minimum height of a window leaf.
    pub min_height: u16,

    /// Minimum cells kept between the minibar cursor and the bar's left
    /// edge while scrolling the typed text.
    pub bar_left_margin: usize,

    /// Same, for the right edge.
    pub bar_right_margin: usize,

    /// File paths longer than this are truncated on the status bar.
    pub minibar_max_path_width: usize,

    /// Blank cells between the line-number gutter and the text.
    pub line_number_margin: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spaces_per_tab: 2,
            margin: 6,
            min_width: 40,
            min_height: 10,
            bar_left_margin: 6,
            bar_right_margin: 6,
            minibar_max_path_width: 32,
            line_number_margin: 2,
        }
    }
}
