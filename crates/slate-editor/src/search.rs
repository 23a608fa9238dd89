//! In-file substring search — Boyer–Moore with cooperative cancellation.
//!
//! The find minibar re-runs the search across the whole file on every
//! keystroke, so the scan has to be fast and abortable. Boyer–Moore gives
//! the speed: a bad-character table and a good-suffix table let the scan
//! skip ahead on mismatch instead of sliding one byte at a time. The
//! cancellation comes from a pending-input probe checked between line
//! batches — a queued keystroke means the pattern is already stale, so the
//! scan abandons its partial results and lets the next keystroke's run
//! start fresh.
//!
//! Matches are `(x, y)` positions in document order. Navigation state
//! (selected match, saved cursor for Escape-restore) lives in
//! [`SearchState`], one per window.

use crate::file::File;
use crate::position::Pos;

/// Lines scanned between pending-input probes.
const ABORT_CHECK_INTERVAL: usize = 64;

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// Precomputed Boyer–Moore shift tables for one pattern.
pub struct FindLookup {
    pattern: Vec<u8>,
    /// Bad-character shifts: distance from the last pattern position to the
    /// byte's last occurrence, defaulted to the pattern length.
    bad: [usize; 256],
    /// Good-suffix shifts indexed by matched suffix length; entry 0 unused.
    good: Vec<usize>,
}

impl FindLookup {
    /// Build the tables for `pattern`.
    #[must_use]
    pub fn new(pattern: &[u8]) -> Self {
        let m = pattern.len();

        let mut bad = [m; 256];
        for (i, &b) in pattern.iter().enumerate() {
            bad[usize::from(b)] = m - i - 1;
        }

        // good[k]: the smallest positive shift that aligns an earlier
        // occurrence of the length-k suffix, or 1 if none exists.
        let mut good = vec![1usize; m.max(1)];
        for k in 1..m {
            let suffix = &pattern[m - k..];
            for s in 1..=(m - k) {
                if &pattern[m - k - s..m - s] == suffix {
                    good[k] = s;
                    break;
                }
            }
        }

        Self {
            pattern: pattern.to_vec(),
            bad,
            good,
        }
    }

    /// Pattern length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// Whether the pattern is empty (nothing to search for).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Scan one line, appending every occurrence to `out`.
    ///
    /// Right-to-left comparison from each alignment; on mismatch the
    /// window jumps by the good-suffix shift when part of the pattern
    /// matched, otherwise by the bad-character shift of the mismatching
    /// byte. The shift is clamped to at least 1 so the scan always makes
    /// forward progress (the bad-character entry for the pattern's last
    /// byte is 0).
    pub fn scan_line(&self, text: &[u8], y: usize, out: &mut Vec<Pos>) {
        let m = self.pattern.len();
        let n = text.len();
        if m == 0 || n < m {
            return;
        }

        #[allow(clippy::cast_possible_wrap)]
        let mut i = (m - 1) as isize;

        while (i as usize) < n && i >= 0 {
            #[allow(clippy::cast_possible_wrap)]
            let mut j = (m - 1) as isize;
            let mut matched = 0usize;

            #[allow(clippy::cast_sign_loss)]
            while j >= 0 && self.pattern[j as usize] == text[i as usize] {
                i -= 1;
                j -= 1;
                matched += 1;
            }

            if j < 0 {
                #[allow(clippy::cast_sign_loss)]
                out.push(Pos::new((i + 1) as usize, y));
                #[allow(clippy::cast_possible_wrap)]
                {
                    i += (m + 1) as isize;
                }
            } else {
                #[allow(clippy::cast_sign_loss)]
                let shift = if matched > 0 {
                    self.good[matched]
                } else {
                    self.bad[usize::from(text[i as usize])]
                };
                #[allow(clippy::cast_possible_wrap)]
                {
                    i += (matched + shift.max(1)) as isize;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Whole-file runs
// ---------------------------------------------------------------------------

/// Scan every line of `file` for the lookup's pattern.
///
/// Returns `None` when the pending-input probe fires mid-scan: the partial
/// match set is discarded so the next keystroke's search runs against the
/// newer pattern. Returns all matches in document order otherwise.
pub fn run(
    file: &File,
    lookup: &FindLookup,
    pending: &mut dyn FnMut() -> bool,
) -> Option<Vec<Pos>> {
    if lookup.is_empty() {
        return Some(Vec::new());
    }

    let mut matches = Vec::new();
    for (y, line) in file.lines.iter().enumerate() {
        if y % ABORT_CHECK_INTERVAL == 0 && pending() {
            tracing::trace!(scanned = y, "search aborted by pending input");
            return None;
        }
        lookup.scan_line(&line.chars, y, &mut matches);
    }
    Some(matches)
}

// ---------------------------------------------------------------------------
// Per-window search state
// ---------------------------------------------------------------------------

/// A window's search substate: the match set and the selection within it.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// All matches, in document order.
    pub matches: Vec<Pos>,
    /// Index of the selected match. Meaningless when `matches` is empty.
    pub index: usize,
    /// Byte length of the pattern the matches were found with.
    pub match_len: usize,
    /// Cursor position when find mode was entered, for Escape-restore.
    pub saved_cursor: Pos,
}

impl SearchState {
    /// Whether any matches are held.
    #[inline]
    #[must_use]
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// The selected match, if any.
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<Pos> {
        self.matches.get(self.index).copied()
    }

    /// Install a fresh match set: selection starts at the first match at
    /// or after the saved cursor, wrapping to the first match when every
    /// match precedes it.
    pub fn install(&mut self, matches: Vec<Pos>, match_len: usize) {
        self.matches = matches;
        self.match_len = match_len;
        self.index = self
            .matches
            .iter()
            .position(|&m| m >= self.saved_cursor)
            .unwrap_or(0);
    }

    /// Drop all matches.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.match_len = 0;
        self.index = 0;
    }

    /// Select the next match (wraps).
    pub fn next(&mut self) {
        if !self.matches.is_empty() {
            self.index = (self.index + 1) % self.matches.len();
        }
    }

    /// Select the previous match (wraps).
    pub fn previous(&mut self) {
        if !self.matches.is_empty() {
            self.index = (self.index + self.matches.len() - 1) % self.matches.len();
        }
    }

    /// Jump several matches forward or back: the stride is `1 + total/50`,
    /// so skimming a large result set takes a bounded number of presses.
    pub fn jump(&mut self, forward: bool) {
        let total = self.matches.len();
        if total == 0 {
            return;
        }
        let stride = 1 + total / 50;
        if forward {
            self.index = (self.index + stride) % total;
        } else {
            self.index = (self.index + total - stride % total) % total;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_in(text: &str, pattern: &str) -> Vec<usize> {
        let lookup = FindLookup::new(pattern.as_bytes());
        let mut out = Vec::new();
        lookup.scan_line(text.as_bytes(), 0, &mut out);
        out.iter().map(|p| p.x).collect()
    }

    // ── Tables ───────────────────────────────────────────────────────

    #[test]
    fn bad_table_defaults_to_pattern_length() {
        let l = FindLookup::new(b"abc");
        assert_eq!(l.bad[usize::from(b'z')], 3);
    }

    #[test]
    fn bad_table_distance_from_last_position() {
        let l = FindLookup::new(b"abc");
        assert_eq!(l.bad[usize::from(b'a')], 2);
        assert_eq!(l.bad[usize::from(b'b')], 1);
        assert_eq!(l.bad[usize::from(b'c')], 0); // clamped to 1 at scan time
    }

    #[test]
    fn bad_table_keeps_last_occurrence() {
        let l = FindLookup::new(b"aba");
        assert_eq!(l.bad[usize::from(b'a')], 0);
        assert_eq!(l.bad[usize::from(b'b')], 1);
    }

    #[test]
    fn good_table_aligns_earlier_suffix_occurrence() {
        // "foo": the length-1 suffix "o" also occurs one position earlier.
        let l = FindLookup::new(b"foo");
        assert_eq!(l.good[1], 1);
        // Length-2 suffix "oo" has no earlier occurrence: default 1.
        assert_eq!(l.good[2], 1);
    }

    #[test]
    fn good_table_finds_distant_occurrence() {
        // "abcab": suffix "ab" occurs 3 earlier.
        let l = FindLookup::new(b"abcab");
        assert_eq!(l.good[2], 3);
        assert_eq!(l.good[1], 3); // "b" occurs 3 earlier
    }

    // ── Scanning ─────────────────────────────────────────────────────

    #[test]
    fn finds_single_match() {
        assert_eq!(matches_in("hello world", "world"), vec![6]);
    }

    #[test]
    fn finds_match_at_start_and_end() {
        assert_eq!(matches_in("abXab", "ab"), vec![0, 3]);
    }

    #[test]
    fn finds_all_occurrences_in_document_order() {
        assert_eq!(matches_in("foo bar foo baz foo", "foo"), vec![0, 8, 16]);
    }

    #[test]
    fn single_byte_pattern_finds_every_cell() {
        assert_eq!(matches_in("aaa", "a"), vec![0, 1, 2]);
    }

    #[test]
    fn no_match_in_short_text() {
        assert!(matches_in("ab", "abc").is_empty());
    }

    #[test]
    fn no_match_at_all() {
        assert!(matches_in("hello world", "xyz").is_empty());
    }

    #[test]
    fn empty_pattern_matches_nothing() {
        assert!(matches_in("hello", "").is_empty());
    }

    #[test]
    fn pattern_equal_to_text() {
        assert_eq!(matches_in("exact", "exact"), vec![0]);
    }

    #[test]
    fn mismatch_on_last_pattern_byte_still_progresses() {
        // Text byte matches the pattern's last byte (bad shift would be 0)
        // but the full window doesn't match — the clamp keeps us moving.
        assert_eq!(matches_in("xcabc", "abc"), vec![2]);
    }

    #[test]
    fn search_is_case_sensitive() {
        assert!(matches_in("Hello", "hello").is_empty());
    }

    // ── Whole-file runs ──────────────────────────────────────────────

    fn file_from_lines(lines: &[&str]) -> crate::file::FileTable {
        let mut table = crate::file::FileTable::new();
        let id = table.create("scan.txt");
        let file = table.get_mut(id);
        file.lines = lines
            .iter()
            .map(|l| crate::line::Line::from_bytes(l.as_bytes().to_vec()))
            .collect();
        table
    }

    #[test]
    fn run_collects_matches_across_lines() {
        let table = file_from_lines(&["foo", "bar foo", "baz"]);
        let file = table.get(crate::file::FileId(0));
        let lookup = FindLookup::new(b"foo");
        let found = run(file, &lookup, &mut || false).unwrap();
        assert_eq!(found, vec![Pos::new(0, 0), Pos::new(4, 1)]);
    }

    #[test]
    fn run_aborts_when_input_pending() {
        let table = file_from_lines(&["foo"]);
        let file = table.get(crate::file::FileId(0));
        let lookup = FindLookup::new(b"foo");
        assert!(run(file, &lookup, &mut || true).is_none());
    }

    #[test]
    fn run_with_empty_pattern_is_empty_not_aborted() {
        let table = file_from_lines(&["anything"]);
        let file = table.get(crate::file::FileId(0));
        let lookup = FindLookup::new(b"");
        assert_eq!(run(file, &lookup, &mut || false), Some(Vec::new()));
    }

    // ── SearchState ──────────────────────────────────────────────────

    #[test]
    fn install_selects_first_match_at_or_after_saved_cursor() {
        let mut s = SearchState {
            saved_cursor: Pos::new(5, 0),
            ..Default::default()
        };
        s.install(vec![Pos::new(0, 0), Pos::new(8, 0), Pos::new(16, 0)], 3);
        assert_eq!(s.index, 1);
        assert_eq!(s.selected(), Some(Pos::new(8, 0)));
    }

    #[test]
    fn install_wraps_to_first_when_all_matches_precede_cursor() {
        let mut s = SearchState {
            saved_cursor: Pos::new(0, 9),
            ..Default::default()
        };
        s.install(vec![Pos::new(0, 0), Pos::new(0, 1)], 2);
        assert_eq!(s.index, 0);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut s = SearchState::default();
        s.install(vec![Pos::new(0, 0), Pos::new(8, 0), Pos::new(16, 0)], 3);
        s.next();
        s.next();
        assert_eq!(s.index, 2);
        s.next();
        assert_eq!(s.index, 0);
        s.previous();
        assert_eq!(s.index, 2);
    }

    #[test]
    fn jump_stride_is_one_plus_total_over_fifty() {
        let matches: Vec<Pos> = (0..120).map(|i| Pos::new(0, i)).collect();
        let mut s = SearchState::default();
        s.install(matches, 1);
        s.jump(true);
        assert_eq!(s.index, 3); // 1 + 120/50 = 3
        s.jump(false);
        assert_eq!(s.index, 0);
    }

    #[test]
    fn jump_on_empty_is_noop() {
        let mut s = SearchState::default();
        s.jump(true);
        assert_eq!(s.index, 0);
    }

    #[test]
    fn clear_drops_everything() {
        let mut s = SearchState::default();
        s.install(vec![Pos::new(1, 1)], 1);
        s.clear();
        assert!(!s.has_matches());
        assert_eq!(s.match_len, 0);
    }
}
