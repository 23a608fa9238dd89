//! The editor — process-wide state and the key dispatcher.
//!
//! One `Editor` owns the file table, the layout tree (which owns the
//! windows), the clipboard, the active palette, and the focus. Each
//! keypress is routed here: Ctrl-Q quits unconditionally; a window with
//! an active minibar gets the minibar handler; everything else goes to
//! the editor handler. After dispatch the focused window records the key,
//! which is how smart indent knows the previous press was `{`.
//!
//! Bindings (editor handler):
//!
//! | Key          | Action            | Key          | Action        |
//! |--------------|-------------------|--------------|---------------|
//! | Shift-Right  | focus next        | Ctrl-G       | open prompt   |
//! | Shift-Left   | focus previous    | Ctrl-N       | new prompt    |
//! | Shift-Up     | page up           | Ctrl-R       | command       |
//! | Shift-Down   | page down         | Ctrl-F       | find          |
//! | Shift-Home   | file start        | Ctrl-S       | save          |
//! | Shift-End    | file end          | Ctrl-B       | mark          |
//! | Ctrl-Q       | quit (global)     | Ctrl-C / X / V | copy/cut/paste |

use std::io::{self, Write};

use slate_term::input::{Key, KeyCode, Mods};
use slate_term::terminal::Size;
use slate_theme::{builtin, Palette};

use crate::config::Config;
use crate::edit;
use crate::error::EditError;
use crate::file::FileTable;
use crate::layout::{Layout, WindowId};
use crate::minibar::{self, Command, MinibarMode};
use crate::render::{gutter_width, Renderer};
use crate::search::{self, FindLookup};

/// The whole editor.
pub struct Editor {
    pub config: Config,
    pub files: FileTable,
    pub layout: Layout,
    pub focused: WindowId,
    pub clipboard: Vec<u8>,
    pub palette: Palette,
    pub size: Size,
    /// The next frame must reprogram the terminal default background
    /// (startup, theme switch).
    repaint_background: bool,
    running: bool,
}

impl Editor {
    /// An editor with one empty window filling the terminal.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let config = Config::default();
        let layout = Layout::new(size.cols, size.rows, config.min_width, config.min_height);
        let focused = layout.leaves()[0];
        Self {
            config,
            files: FileTable::new(),
            layout,
            focused,
            clipboard: Vec::new(),
            palette: builtin::default_palette(),
            size,
            repaint_background: true,
            running: true,
        }
    }

    /// Whether the main loop should keep going.
    #[inline]
    #[must_use]
    pub const fn running(&self) -> bool {
        self.running
    }

    /// Open a startup path into the focused window; failures land on the
    /// status bar like any other open.
    pub fn open_initial(&mut self, path: &str) {
        match self.files.open(path) {
            Ok(fid) => self.layout.window_mut(self.focused).change_file(fid),
            Err(err) => self.layout.window_mut(self.focused).set_error(&err),
        }
    }

    /// Adopt a new terminal size (after SIGWINCH).
    pub fn resize_terminal(&mut self, size: Size) {
        self.size = size;
        self.layout.resize_root(size.cols, size.rows);
    }

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Propagates the flush error from the sink.
    pub fn render(&mut self, renderer: &mut Renderer, sink: &mut impl Write) -> io::Result<()> {
        let repaint = std::mem::take(&mut self.repaint_background);
        renderer.render(
            &mut self.layout,
            &mut self.files,
            &self.palette,
            &self.config,
            self.focused,
            self.size,
            repaint,
            sink,
        )
    }

    // ── Dispatch ────────────────────────────────────────────────────

    /// Route one key. `pending` is the terminal's has-input probe, used
    /// by the incremental search to abandon stale scans.
    pub fn dispatch(&mut self, key: Key, pending: &mut dyn FnMut() -> bool) {
        if key == Key::ctrl(KeyCode::Char(b'q')) {
            self.running = false;
            return;
        }

        if self.layout.window(self.focused).minibar.active() {
            self.minibar_key(key, pending);
        } else {
            self.editor_key(key);
        }

        self.layout.window_mut(self.focused).previous_key = Some(key);
    }

    // ── Editor handler ──────────────────────────────────────────────

    fn editor_key(&mut self, key: Key) {
        let win = self.focused;
        let shift = key.mods.contains(Mods::SHIFT);
        let ctrl = key.mods.contains(Mods::CTRL);

        // Focus, paging, and prompts work with or without a file.
        match key.code {
            KeyCode::Right if shift => {
                self.focused = self.layout.focus_next(win);
                return;
            }
            KeyCode::Left if shift => {
                self.focused = self.layout.focus_previous(win);
                return;
            }
            KeyCode::Escape => {
                self.layout.window_mut(win).clear_error();
                return;
            }
            KeyCode::Char(b'g') if ctrl => {
                self.layout.window_mut(win).minibar.activate(MinibarMode::Open);
                return;
            }
            KeyCode::Char(b'n') if ctrl => {
                self.layout.window_mut(win).minibar.activate(MinibarMode::New);
                return;
            }
            KeyCode::Char(b'r') if ctrl => {
                self.layout
                    .window_mut(win)
                    .minibar
                    .activate(MinibarMode::Command);
                return;
            }
            KeyCode::Char(b'f') if ctrl => {
                let w = self.layout.window_mut(win);
                w.search.clear();
                w.search.saved_cursor = w.cursor;
                w.minibar.activate(MinibarMode::Find);
                return;
            }
            KeyCode::Char(b's') if ctrl => {
                self.save_focused();
                return;
            }
            _ => {}
        }

        let Some(fid) = self.layout.window(win).file else {
            return;
        };

        match key.code {
            // ── Block operations ────────────────────────────────
            KeyCode::Char(b'b') if ctrl => {
                edit::set_mark(self.layout.window_mut(win));
            }
            KeyCode::Char(b'c') if ctrl => {
                let result = edit::copy(
                    self.layout.window(win),
                    self.files.get(fid),
                    &mut self.clipboard,
                );
                self.surface(result);
            }
            KeyCode::Char(b'x') if ctrl => {
                let result = edit::cut(
                    self.layout.window_mut(win),
                    self.files.get_mut(fid),
                    &mut self.clipboard,
                );
                self.surface(result);
            }
            KeyCode::Char(b'v') if ctrl => {
                let result = edit::paste(
                    self.layout.window_mut(win),
                    self.files.get_mut(fid),
                    &self.clipboard,
                );
                self.surface(result);
            }

            // ── Inserts ─────────────────────────────────────────
            KeyCode::Char(b) if !ctrl => {
                edit::insert_char(self.layout.window_mut(win), self.files.get_mut(fid), b);
            }
            KeyCode::Tab => {
                edit::insert_tab(
                    self.layout.window_mut(win),
                    self.files.get_mut(fid),
                    &self.config,
                );
            }
            KeyCode::Enter => {
                edit::insert_newline(
                    self.layout.window_mut(win),
                    self.files.get_mut(fid),
                    &self.config,
                );
            }

            // ── Deletes ─────────────────────────────────────────
            KeyCode::Delete => {
                edit::delete_unit(
                    self.layout.window_mut(win),
                    self.files.get_mut(fid),
                    ctrl,
                    &self.config,
                );
            }

            // ── Motion ──────────────────────────────────────────
            KeyCode::Up if shift => {
                let half = self.layout.half_page(win);
                let (layout, files) = (&mut self.layout, &self.files);
                layout.window_mut(win).page_up(files.get(fid), half);
            }
            KeyCode::Down if shift => {
                let half = self.layout.half_page(win);
                let (layout, files) = (&mut self.layout, &self.files);
                layout.window_mut(win).page_down(files.get(fid), half);
            }
            KeyCode::Left => self.layout.window_mut(win).move_left(self.files.get(fid)),
            KeyCode::Right => self.layout.window_mut(win).move_right(self.files.get(fid)),
            KeyCode::Up => self.layout.window_mut(win).move_up(self.files.get(fid)),
            KeyCode::Down => self.layout.window_mut(win).move_down(self.files.get(fid)),
            KeyCode::Home if shift => self.layout.window_mut(win).move_file_start(),
            KeyCode::End if shift => {
                self.layout.window_mut(win).move_file_end(self.files.get(fid));
            }
            KeyCode::Home => self.layout.window_mut(win).move_home(self.files.get(fid)),
            KeyCode::End => self.layout.window_mut(win).move_end(self.files.get(fid)),

            _ => {}
        }

        self.follow_cursor(win);
    }

    // ── Minibar handler ─────────────────────────────────────────────

    fn minibar_key(&mut self, key: Key, pending: &mut dyn FnMut() -> bool) {
        let win = self.focused;
        let mode = self.layout.window(win).minibar.mode;
        let ctrl = key.mods.contains(Mods::CTRL);
        let finding = mode == MinibarMode::Find;

        match key.code {
            KeyCode::Escape => {
                let w = self.layout.window_mut(win);
                if finding {
                    w.cursor = w.search.saved_cursor;
                    w.cursor_ideal = w.cursor.x;
                    w.search.clear();
                }
                w.minibar.deactivate();
                w.clear_error();
                w.redraw = true;
                self.follow_cursor(win);
            }
            KeyCode::Enter => self.commit_minibar(mode),
            KeyCode::Char(b) if !ctrl => {
                self.layout.window_mut(win).minibar.insert(b);
                if finding {
                    self.run_search(pending);
                }
            }
            KeyCode::Delete => {
                let spt = self.config.spaces_per_tab;
                let changed = self.layout.window_mut(win).minibar.delete(ctrl, spt);
                if finding && changed {
                    self.run_search(pending);
                }
            }
            KeyCode::Up if finding => {
                if ctrl {
                    self.layout.window_mut(win).search.jump(false);
                } else {
                    self.layout.window_mut(win).search.previous();
                }
                self.goto_selected_match(win);
            }
            KeyCode::Down if finding => {
                if ctrl {
                    self.layout.window_mut(win).search.jump(true);
                } else {
                    self.layout.window_mut(win).search.next();
                }
                self.goto_selected_match(win);
            }
            KeyCode::Left => self.layout.window_mut(win).minibar.move_left(),
            KeyCode::Right => self.layout.window_mut(win).minibar.move_right(),
            KeyCode::Home => self.layout.window_mut(win).minibar.move_home(),
            KeyCode::End => self.layout.window_mut(win).minibar.move_end(),
            _ => {}
        }
    }

    fn commit_minibar(&mut self, mode: MinibarMode) {
        let win = self.focused;
        let data = {
            let w = self.layout.window_mut(win);
            let data = w.minibar.data.clone();
            w.minibar.deactivate();
            w.redraw = true;
            data
        };

        match mode {
            MinibarMode::Inactive => {}
            MinibarMode::Open => {
                let path = String::from_utf8_lossy(&data).into_owned();
                match self.files.open(&path) {
                    Ok(fid) => {
                        self.layout.window_mut(win).change_file(fid);
                    }
                    Err(err) => {
                        // Both failure kinds read as an open failure on
                        // the status bar.
                        let shown = match err {
                            EditError::InvalidLineEnding { path } => {
                                EditError::FileOpenFailed { path }
                            }
                            other => other,
                        };
                        self.layout.window_mut(win).set_error(&shown);
                    }
                }
            }
            MinibarMode::New => {
                let path = String::from_utf8_lossy(&data).into_owned();
                let fid = self.files.create(&path);
                self.layout.window_mut(win).change_file(fid);
            }
            MinibarMode::Command => match minibar::parse(&data) {
                Ok(cmd) => self.execute(cmd),
                Err(err) => self.layout.window_mut(win).set_error(&err),
            },
            MinibarMode::Find => {
                // The cursor already sits on the committed match.
                let w = self.layout.window_mut(win);
                w.search.clear();
                w.redraw = true;
            }
        }
        self.follow_cursor(self.focused);
    }

    fn execute(&mut self, cmd: Command) {
        match cmd {
            Command::SplitStacked => {
                self.focused = self.layout.split(self.focused, true);
            }
            Command::SplitSide => {
                self.focused = self.layout.split(self.focused, false);
            }
            Command::Close => {
                // Removing the root window is a silent no-op.
                if let Some(next) = self.layout.remove(self.focused) {
                    self.focused = next;
                }
            }
            Command::Swap => self.layout.swap(self.focused),
            Command::Resize(n) => {
                #[allow(clippy::cast_possible_truncation)]
                self.layout.resize(self.focused, n as i32);
            }
            Command::Theme(arg) => self.switch_theme(&arg),
        }
    }

    fn switch_theme(&mut self, arg: &str) {
        let found = builtin::by_name(arg)
            .or_else(|| arg.parse::<usize>().ok().and_then(builtin::by_index));
        match found {
            Some(palette) => {
                tracing::debug!(theme = palette.name, "theme switched");
                self.palette = palette;
                self.repaint_background = true;
                for win in self.layout.leaves() {
                    self.layout.window_mut(win).redraw = true;
                }
            }
            None => {
                let err = EditError::UnknownCommand {
                    name: format!("theme {arg}"),
                };
                self.layout.window_mut(self.focused).set_error(&err);
            }
        }
    }

    // ── Search plumbing ─────────────────────────────────────────────

    fn run_search(&mut self, pending: &mut dyn FnMut() -> bool) {
        let win = self.focused;
        let Some(fid) = self.layout.window(win).file else {
            return;
        };

        let pattern = self.layout.window(win).minibar.data.clone();
        let w = self.layout.window_mut(win);
        if pattern.is_empty() {
            w.search.clear();
            w.redraw = true;
            return;
        }

        let lookup = FindLookup::new(&pattern);
        match search::run(self.files.get(fid), &lookup, pending) {
            Some(matches) => {
                let w = self.layout.window_mut(win);
                w.search.install(matches, lookup.len());
                w.redraw = true;
                self.goto_selected_match(win);
            }
            None => {
                // Aborted: drop the stale partial set; the window stays
                // dirty so the next completed run repaints cleanly.
                let w = self.layout.window_mut(win);
                w.search.clear();
                w.redraw = true;
            }
        }
    }

    fn goto_selected_match(&mut self, win: WindowId) {
        if let Some(sel) = self.layout.window(win).search.selected() {
            let w = self.layout.window_mut(win);
            w.cursor = sel;
            w.cursor_ideal = sel.x;
            w.redraw = true;
            self.follow_cursor(win);
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────

    fn save_focused(&mut self) {
        let win = self.focused;
        let Some(fid) = self.layout.window(win).file else {
            return;
        };
        if let Err(err) = self.files.save(fid) {
            self.layout.window_mut(win).set_error(&err);
        }
    }

    fn surface(&mut self, result: Result<(), EditError>) {
        if let Err(err) = result {
            self.layout.window_mut(self.focused).set_error(&err);
        }
    }

    /// Clamp the cursor and pull the scroll offset so it stays inside the
    /// margins. Called after anything that may have moved the cursor or
    /// changed the file under it.
    fn follow_cursor(&mut self, win: WindowId) {
        let Some(fid) = self.layout.window(win).file else {
            return;
        };
        let gutter = gutter_width(
            self.files.get(fid).line_count(),
            self.config.line_number_margin,
        );
        let (text_w, text_h) = self.layout.text_area(win, gutter);
        let margin = self.config.margin;
        let file = self.files.get(fid);
        let w = self.layout.window_mut(win);
        w.clamp_cursor(file);
        w.scroll_to_cursor(text_w, text_h, margin);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
