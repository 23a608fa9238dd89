//! Named preset themes — complete, ready-to-use palettes.
//!
//! Themes are indexed and named. The `theme` command accepts either form:
//! lookup is by case-sensitive name or by base-10 index into the order
//! returned by [`names`].

use slate_term::color::Rgb;

use crate::palette::Palette;

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}

/// The builtin theme table, in index order.
static THEMES: [Palette; 3] = [
    // 0: graphite — the default dark theme.
    Palette {
        name: "graphite",
        editor_fg: rgb(0xd4, 0xd4, 0xd4),
        editor_bg: rgb(0x1e, 0x1e, 0x1e),
        status_fg: rgb(0x1e, 0x1e, 0x1e),
        status_bg: rgb(0x8a, 0x8a, 0x8a),
        cursor: rgb(0xd4, 0xd4, 0xd4),
        cursor_prompt: rgb(0xe5, 0xc0, 0x7b),
        match_fg: rgb(0x1e, 0x1e, 0x1e),
        match_bg: rgb(0x5f, 0x87, 0x5f),
        match_selected_fg: rgb(0x1e, 0x1e, 0x1e),
        match_selected_bg: rgb(0xe5, 0xc0, 0x7b),
        comment: rgb(0x6a, 0x99, 0x55),
        keyword: rgb(0x56, 0x9c, 0xd6),
        string: rgb(0xce, 0x91, 0x78),
        char_literal: rgb(0xd7, 0xba, 0x7d),
        number: rgb(0xb5, 0xce, 0xa8),
    },
    // 1: paper — a light theme.
    Palette {
        name: "paper",
        editor_fg: rgb(0x2a, 0x2a, 0x2a),
        editor_bg: rgb(0xf5, 0xf0, 0xe6),
        status_fg: rgb(0xf5, 0xf0, 0xe6),
        status_bg: rgb(0x55, 0x50, 0x48),
        cursor: rgb(0x2a, 0x2a, 0x2a),
        cursor_prompt: rgb(0xa0, 0x52, 0x0d),
        match_fg: rgb(0xf5, 0xf0, 0xe6),
        match_bg: rgb(0x7a, 0x8f, 0x5a),
        match_selected_fg: rgb(0xf5, 0xf0, 0xe6),
        match_selected_bg: rgb(0xa0, 0x52, 0x0d),
        comment: rgb(0x8a, 0x85, 0x7a),
        keyword: rgb(0x1f, 0x55, 0x9e),
        string: rgb(0xa0, 0x52, 0x0d),
        char_literal: rgb(0xb5, 0x76, 0x14),
        number: rgb(0x44, 0x72, 0x43),
    },
    // 2: abyss — dark with a blue cast.
    Palette {
        name: "abyss",
        editor_fg: rgb(0xc0, 0xc9, 0xd4),
        editor_bg: rgb(0x10, 0x14, 0x1c),
        status_fg: rgb(0x10, 0x14, 0x1c),
        status_bg: rgb(0x5f, 0x74, 0x8f),
        cursor: rgb(0xc0, 0xc9, 0xd4),
        cursor_prompt: rgb(0xd8, 0xa6, 0x57),
        match_fg: rgb(0x10, 0x14, 0x1c),
        match_bg: rgb(0x4f, 0x7a, 0x6e),
        match_selected_fg: rgb(0x10, 0x14, 0x1c),
        match_selected_bg: rgb(0xd8, 0xa6, 0x57),
        comment: rgb(0x4e, 0x5e, 0x73),
        keyword: rgb(0x6c, 0xa0, 0xd8),
        string: rgb(0xc7, 0x95, 0x6f),
        char_literal: rgb(0xd8, 0xa6, 0x57),
        number: rgb(0x9a, 0xb8, 0x8c),
    },
];

/// The palette used before any `theme` command runs.
#[must_use]
pub fn default_palette() -> Palette {
    THEMES[0].clone()
}

/// Look up a builtin theme by case-sensitive name.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn by_name(name: &str) -> Option<Palette> {
    THEMES.iter().find(|p| p.name == name).cloned()
}

/// Look up a builtin theme by index.
#[must_use]
pub fn by_index(index: usize) -> Option<Palette> {
    THEMES.get(index).cloned()
}

/// All builtin theme names, in index order.
#[must_use]
pub fn names() -> Vec<&'static str> {
    THEMES.iter().map(|p| p.name).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_names_resolve() {
        for name in names() {
            assert!(by_name(name).is_some(), "theme {name} must resolve");
        }
    }

    #[test]
    fn name_and_index_agree() {
        for (i, name) in names().iter().enumerate() {
            assert_eq!(by_name(name), by_index(i));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(by_name("graphite").is_some());
        assert!(by_name("Graphite").is_none());
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(by_name("solarized").is_none());
    }

    #[test]
    fn out_of_range_index_is_none() {
        assert!(by_index(names().len()).is_none());
    }

    #[test]
    fn default_is_index_zero() {
        assert_eq!(default_palette(), by_index(0).unwrap());
    }

    #[test]
    fn themes_have_distinct_names() {
        let names = names();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
