//! The incremental renderer — minimal writes per frame.
//!
//! A frame is reconciled, not repainted: per-terminal-row dirty flags are
//! aggregated from window, file, and line redraw state, only flagged rows
//! are cleared and repainted, and the whole frame leaves in a single
//! `write()`. Status-bar rows repaint every frame (they carry the cursor
//! percentage and match counter, which change without any line edit);
//! text rows repaint only when something actually touched them.
//!
//! Flag clearing is deferred to a second pass after every window has been
//! scanned — files are shared, and two windows viewing the same file must
//! both see a changed line before its flag drops.
//!
//! Row anatomy (left to right): for non-leftmost windows a 2-cell border
//! (one status-colored, one editor-background), the right-aligned line
//! number gutter, then the content sliced by the horizontal scroll.
//! Search matches overlay the content by switching colors as each match
//! enters and exits, with the selected match in its own pair.

use std::io::{self, Write};

use slate_term::ansi;
use slate_term::output::{OutputBuffer, StyleWriter};
use slate_term::terminal::Size;
use slate_theme::Palette;

use crate::config::Config;
use crate::file::FileTable;
use crate::layout::{Layout, Region, WindowId};

/// Gutter width for a file: digits of the largest line number plus the
/// configured margin.
#[must_use]
pub fn gutter_width(line_count: usize, margin: usize) -> usize {
    let digits = line_count.max(1).ilog10() as usize + 1;
    digits + margin
}

/// Frame renderer. Owns the output buffer and the SGR state tracker;
/// both persist across frames so steady-state rendering allocates
/// nothing.
pub struct Renderer {
    out: OutputBuffer,
    style: StyleWriter,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: OutputBuffer::new(),
            style: StyleWriter::new(),
        }
    }

    /// Render one frame into `sink`.
    ///
    /// `repaint_background` reprograms the terminal's default background
    /// first (startup and theme switches).
    ///
    /// # Errors
    ///
    /// Returns an error when the final flush to `sink` fails; building
    /// the frame itself writes only to memory.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        layout: &mut Layout,
        files: &mut FileTable,
        palette: &Palette,
        cfg: &Config,
        focused: WindowId,
        size: Size,
        repaint_background: bool,
        sink: &mut impl Write,
    ) -> io::Result<()> {
        self.style.invalidate();
        ansi::cursor_hide(&mut self.out)?;
        if repaint_background {
            ansi::default_background(&mut self.out, palette.editor_bg)?;
        }

        let leaves = layout.leaves();
        let rows = self.aggregate_dirty(layout, files, &leaves, size);
        self.clear_rows(&rows, palette)?;

        for &win in &leaves {
            self.paint_window(layout, files, palette, cfg, win, &rows)?;
        }

        // Deferred flag clearing: every window has been scanned, so shared
        // files can drop their flags now.
        for &win in &leaves {
            let w = layout.window(win);
            let visible = w.file.map(|fid| {
                let region = layout.region(w.region);
                let from = w.offset.y;
                let count = usize::from(region.height.saturating_sub(1));
                (fid, from, count)
            });
            layout.window_mut(win).redraw = false;
            if let Some((fid, from, count)) = visible {
                let file = files.get_mut(fid);
                for line in file.lines.iter_mut().skip(from).take(count) {
                    line.redraw = false;
                }
            }
        }
        for file in files.iter_mut() {
            file.redraw = false;
        }

        self.place_cursor(layout, files, palette, cfg, focused)?;
        self.out.flush_to(sink)
    }

    // ── Dirty aggregation ───────────────────────────────────────────

    fn aggregate_dirty(
        &self,
        layout: &Layout,
        files: &FileTable,
        leaves: &[WindowId],
        size: Size,
    ) -> Vec<bool> {
        let mut rows = vec![false; usize::from(size.rows)];

        for &win in leaves {
            let w = layout.window(win);
            let region = layout.region(w.region);
            let top = usize::from(region.y);
            let height = usize::from(region.height);
            if height == 0 {
                continue;
            }

            let file_dirty = w.file.is_some_and(|fid| files.get(fid).redraw);
            if w.redraw || file_dirty {
                for row in rows.iter_mut().skip(top).take(height) {
                    *row = true;
                }
            } else if let Some(fid) = w.file {
                let file = files.get(fid);
                for j in 0..height - 1 {
                    if file
                        .lines
                        .get(w.offset.y + j)
                        .is_some_and(|line| line.redraw)
                    {
                        if let Some(row) = rows.get_mut(top + j) {
                            *row = true;
                        }
                    }
                }
            }

            // The status bar repaints every frame.
            if let Some(row) = rows.get_mut(top + height - 1) {
                *row = true;
            }
        }

        rows
    }

    fn clear_rows(&mut self, rows: &[bool], palette: &Palette) -> io::Result<()> {
        self.style.set_bg(&mut self.out, palette.editor_bg)?;
        for (y, dirty) in rows.iter().enumerate() {
            if *dirty {
                #[allow(clippy::cast_possible_truncation)]
                ansi::cursor_to(&mut self.out, 0, y as u16)?;
                ansi::clear_line(&mut self.out)?;
            }
        }
        Ok(())
    }

    // ── Window painting ─────────────────────────────────────────────

    fn paint_window(
        &mut self,
        layout: &mut Layout,
        files: &FileTable,
        palette: &Palette,
        cfg: &Config,
        win: WindowId,
        rows: &[bool],
    ) -> io::Result<()> {
        let region = layout.region(layout.region_of(win)).clone();
        if region.height == 0 || region.width == 0 {
            return Ok(());
        }

        let w = layout.window(win);
        let file = w.file.map(|fid| files.get(fid));
        let gutter = file.map_or(0, |f| gutter_width(f.line_count(), cfg.line_number_margin));
        let border = usize::from(region.x > 0) * 2;
        let text_w = usize::from(region.width).saturating_sub(border + gutter);
        let text_h = usize::from(region.height) - 1;

        // Matches visible on a line, resolved per row below.
        let matches = &w.search.matches;
        let match_len = w.search.match_len;
        let selected = w.search.selected();
        let offset = w.offset;

        for j in 0..text_h {
            let abs_y = usize::from(region.y) + j;
            if !rows.get(abs_y).copied().unwrap_or(false) {
                continue;
            }
            let Some(file) = file else { continue };
            let line_idx = offset.y + j;
            let Some(line) = file.lines.get(line_idx) else {
                continue;
            };

            #[allow(clippy::cast_possible_truncation)]
            ansi::cursor_to(&mut self.out, region.x, abs_y as u16)?;

            if border > 0 {
                self.style.set_bg(&mut self.out, palette.status_bg)?;
                self.out.write_all(b" ")?;
                self.style.set_bg(&mut self.out, palette.editor_bg)?;
                self.out.write_all(b" ")?;
            }

            // Gutter: right-aligned 1-based line number.
            if gutter > 0 {
                self.style
                    .set_colors(&mut self.out, palette.comment, palette.editor_bg)?;
                let digits = gutter - cfg.line_number_margin;
                write!(self.out, "{:>digits$}", line_idx + 1)?;
                for _ in 0..cfg.line_number_margin {
                    self.out.write_all(b" ")?;
                }
            }

            // Content, sliced by the horizontal scroll.
            let colored = file.language.is_some() && line.colors.len() == line.chars.len();
            let end = (offset.x + text_w).min(line.chars.len());
            for x in offset.x..end {
                let in_selected = selected
                    .is_some_and(|s| s.y == line_idx && x >= s.x && x < s.x + match_len);
                let in_match = !in_selected
                    && matches
                        .iter()
                        .any(|m| m.y == line_idx && x >= m.x && x < m.x + match_len);

                let (fg, bg) = if in_selected {
                    (palette.match_selected_fg, palette.match_selected_bg)
                } else if in_match {
                    (palette.match_fg, palette.match_bg)
                } else {
                    let class = if colored {
                        line.colors[x]
                    } else {
                        slate_theme::ColorClass::Normal
                    };
                    (palette.class_fg(class), palette.editor_bg)
                };
                self.style.set_colors(&mut self.out, fg, bg)?;
                self.out.write_all(&line.chars[x..=x])?;
            }
        }

        self.paint_status(layout, files, palette, cfg, win, &region)
    }

    // ── Status bar ──────────────────────────────────────────────────

    fn paint_status(
        &mut self,
        layout: &mut Layout,
        files: &FileTable,
        palette: &Palette,
        cfg: &Config,
        win: WindowId,
        region: &Region,
    ) -> io::Result<()> {
        let width = usize::from(region.width);
        let bar_y = region.y + region.height - 1;

        // Scroll the minibar before reading its visible slice.
        {
            let prompt_len = layout.window(win).minibar.mode.prompt().len();
            let bar_width = width.saturating_sub(prompt_len);
            let w = layout.window_mut(win);
            if w.minibar.active() {
                w.minibar
                    .scroll(bar_width, cfg.bar_left_margin, cfg.bar_right_margin);
            }
        }

        let w = layout.window(win);
        let mut text = String::new();

        if let Some(error) = &w.error {
            text.push_str(error);
        } else if w.minibar.active() {
            text.push_str(w.minibar.mode.prompt());
            let visible = &w.minibar.data[w.minibar.offset.min(w.minibar.data.len())..];
            text.push_str(&String::from_utf8_lossy(visible));
        }

        if w.search.has_matches() {
            text.push_str(&format!(
                " {}/{}",
                w.search.index + 1,
                w.search.matches.len()
            ));
        }
        if w.mark.valid {
            text.push_str(" [] ");
        }

        match w.file.map(|fid| files.get(fid)) {
            Some(file) => {
                let path = file.path();
                text.push(' ');
                if path.len() > cfg.minibar_max_path_width {
                    text.push_str(&path[path.len() - cfg.minibar_max_path_width..]);
                } else {
                    text.push_str(path);
                }
                if !file.saved {
                    text.push('*');
                }
                let percent = (w.cursor.y * 100) / file.line_count();
                text.push_str(&format!(" {percent}%"));
            }
            None => {
                if !w.minibar.active() && w.error.is_none() {
                    text.push_str("no file");
                }
            }
        }

        ansi::cursor_to(&mut self.out, region.x, bar_y)?;
        self.style
            .set_colors(&mut self.out, palette.status_fg, palette.status_bg)?;
        let mut bytes: Vec<u8> = text.into_bytes();
        bytes.truncate(width);
        bytes.resize(width, b' ');
        self.out.write_all(&bytes)?;
        Ok(())
    }

    // ── Cursor epilogue ─────────────────────────────────────────────

    fn place_cursor(
        &mut self,
        layout: &Layout,
        files: &FileTable,
        palette: &Palette,
        cfg: &Config,
        focused: WindowId,
    ) -> io::Result<()> {
        let w = layout.window(focused);
        let region = layout.region(w.region);

        let (x, y, color) = if w.minibar.active() {
            let prompt = w.minibar.mode.prompt().len();
            let col = prompt + w.minibar.cursor - w.minibar.offset.min(w.minibar.cursor);
            (
                usize::from(region.x) + col.min(usize::from(region.width).saturating_sub(1)),
                usize::from(region.y + region.height - 1),
                palette.cursor_prompt,
            )
        } else {
            let gutter = w.file.map_or(0, |fid| {
                gutter_width(files.get(fid).line_count(), cfg.line_number_margin)
            });
            let border = usize::from(region.x > 0) * 2;
            let col = border + gutter + w.cursor.x.saturating_sub(w.offset.x);
            let row = w.cursor.y.saturating_sub(w.offset.y);
            (
                usize::from(region.x) + col.min(usize::from(region.width).saturating_sub(1)),
                usize::from(region.y) + row.min(usize::from(region.height).saturating_sub(1)),
                palette.cursor,
            )
        };

        ansi::cursor_color(&mut self.out, color)?;
        #[allow(clippy::cast_possible_truncation)]
        ansi::cursor_to(&mut self.out, x as u16, y as u16)?;
        ansi::cursor_show(&mut self.out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Line;
    use slate_theme::builtin;

    fn fixture(lines: &[&str]) -> (Layout, FileTable, WindowId) {
        let mut layout = Layout::new(80, 24, 40, 10);
        let mut files = FileTable::new();
        let id = files.create("r.txt");
        files.get_mut(id).lines = lines
            .iter()
            .map(|l| Line::from_bytes(l.as_bytes().to_vec()))
            .collect();
        let win = layout.leaves()[0];
        layout.window_mut(win).change_file(id);
        (layout, files, win)
    }

    fn render_once(
        renderer: &mut Renderer,
        layout: &mut Layout,
        files: &mut FileTable,
        win: WindowId,
    ) -> String {
        let palette = builtin::default_palette();
        let cfg = Config::default();
        let mut sink = Vec::new();
        renderer
            .render(
                layout,
                files,
                &palette,
                &cfg,
                win,
                Size { cols: 80, rows: 24 },
                false,
                &mut sink,
            )
            .unwrap();
        String::from_utf8_lossy(&sink).into_owned()
    }

    fn count_clears(frame: &str) -> usize {
        frame.matches("\x1b[2K").count()
    }

    // ── Full and quiet frames ────────────────────────────────────────

    #[test]
    fn first_frame_clears_every_region_row() {
        let (mut layout, mut files, win) = fixture(&["hello"]);
        let mut r = Renderer::new();
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        assert_eq!(count_clears(&frame), 24);
    }

    #[test]
    fn quiet_second_frame_clears_only_status_rows() {
        let (mut layout, mut files, win) = fixture(&["hello"]);
        let mut r = Renderer::new();
        render_once(&mut r, &mut layout, &mut files, win);
        let second = render_once(&mut r, &mut layout, &mut files, win);
        // Idempotent clear: one window, so exactly its status row.
        assert_eq!(count_clears(&second), 1);
    }

    #[test]
    fn touched_line_repaints_exactly_one_text_row() {
        let (mut layout, mut files, win) = fixture(&["aaa", "bbb", "ccc"]);
        let mut r = Renderer::new();
        render_once(&mut r, &mut layout, &mut files, win);

        let fid = layout.window(win).file.unwrap();
        files.get_mut(fid).touch_line(1);
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        // The touched text row plus the always-dirty status row.
        assert_eq!(count_clears(&frame), 2);
    }

    #[test]
    fn file_redraw_repaints_whole_region() {
        let (mut layout, mut files, win) = fixture(&["x"]);
        let mut r = Renderer::new();
        render_once(&mut r, &mut layout, &mut files, win);

        let fid = layout.window(win).file.unwrap();
        files.get_mut(fid).redraw = true;
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        assert_eq!(count_clears(&frame), 24);
    }

    #[test]
    fn shared_file_repaints_in_both_windows() {
        let (mut layout, mut files, win) = fixture(&["shared line"]);
        let fid = layout.window(win).file.unwrap();
        let second = layout.split(win, true);
        layout.window_mut(second).change_file(fid);

        let mut r = Renderer::new();
        render_once(&mut r, &mut layout, &mut files, win);

        files.get_mut(fid).touch_line(0);
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        // One text row per window plus two status rows.
        assert_eq!(count_clears(&frame), 4);
        // Deferred clearing: the flag dropped only after both windows saw it.
        assert!(!files.get(fid).lines[0].redraw);
    }

    // ── Content ──────────────────────────────────────────────────────

    #[test]
    fn frame_contains_content_and_gutter() {
        let (mut layout, mut files, win) = fixture(&["hello world"]);
        let mut r = Renderer::new();
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        assert!(frame.contains("hello world"));
        assert!(frame.contains('1'), "gutter shows line number");
    }

    #[test]
    fn status_bar_shows_path_and_unsaved_marker() {
        let (mut layout, mut files, win) = fixture(&["x"]);
        let mut r = Renderer::new();
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        assert!(frame.contains("r.txt*"));
        assert!(frame.contains("0%"));
    }

    #[test]
    fn windowless_file_reads_no_file() {
        let mut layout = Layout::new(80, 24, 40, 10);
        let mut files = FileTable::new();
        let win = layout.leaves()[0];
        let mut r = Renderer::new();
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        assert!(frame.contains("no file"));
    }

    #[test]
    fn error_message_appears_on_status_bar() {
        let (mut layout, mut files, win) = fixture(&["x"]);
        layout
            .window_mut(win)
            .set_error(&crate::error::EditError::NoMark);
        let mut r = Renderer::new();
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        assert!(frame.contains("no mark set"));
    }

    #[test]
    fn match_counter_appears_when_searching() {
        let (mut layout, mut files, win) = fixture(&["foo foo"]);
        layout.window_mut(win).search.install(
            vec![crate::position::Pos::new(0, 0), crate::position::Pos::new(4, 0)],
            3,
        );
        let mut r = Renderer::new();
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        assert!(frame.contains("1/2"));
    }

    #[test]
    fn frame_ends_with_cursor_show() {
        let (mut layout, mut files, win) = fixture(&["x"]);
        let mut r = Renderer::new();
        let frame = render_once(&mut r, &mut layout, &mut files, win);
        assert!(frame.ends_with("\x1b[?25h"));
    }

    #[test]
    fn flags_cleared_after_frame() {
        let (mut layout, mut files, win) = fixture(&["abc"]);
        let mut r = Renderer::new();
        render_once(&mut r, &mut layout, &mut files, win);
        let fid = layout.window(win).file.unwrap();
        assert!(!layout.window(win).redraw);
        assert!(!files.get(fid).redraw);
        assert!(files.get(fid).lines.iter().all(|l| !l.redraw));
    }

    // ── gutter_width ─────────────────────────────────────────────────

    #[test]
    fn gutter_grows_with_line_count() {
        assert_eq!(gutter_width(1, 2), 3);
        assert_eq!(gutter_width(9, 2), 3);
        assert_eq!(gutter_width(10, 2), 4);
        assert_eq!(gutter_width(100, 2), 5);
        assert_eq!(gutter_width(0, 2), 3, "empty file still one line wide");
    }
}
