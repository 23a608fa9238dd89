//! The layout engine — a binary partition of the terminal into windows.
//!
//! Every region is either a leaf holding a window or an internal node
//! splitting its rectangle in two, stacked (horizontal divider) or
//! side-by-side (vertical divider, which costs one screen column). The
//! region ↔ window back-references and the parent pointers make this a
//! cyclic graph, so both live in arenas and all links are indices; a
//! remove frees its region-and-window pair together and no ownership
//! cycle ever exists.
//!
//! ```text
//! side-by-side                      stacked
//! ┌──────────┬─┬──────────┐        ┌─────────────────────┐
//! │          │ │          │        │        top           │
//! │   left   │││   right  │        ├─────────────────────┤
//! │          │ │          │        │       bottom         │
//! └──────────┴─┴──────────┘        └─────────────────────┘
//!      divider column               no divider row — the top
//!                                   window's status bar is the
//!                                   visual boundary
//! ```
//!
//! Geometry is recomputed top-down after every mutation. The first child's
//! extent on the split axis is `extent × split` clamped so both children
//! honor the minimum window size (minimum wins when the parent is too
//! small to fit two), and `split` is rewritten to the realized ratio so
//! subsequent resizes operate on what the user actually sees.

use crate::window::Window;

/// Handle to a region in the layout arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(pub(crate) usize);

/// Handle to a window in the layout arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub(crate) usize);

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A node in the partition tree.
///
/// Exactly one of `window` / `children` is set: a leaf has a window and no
/// children, an internal node has two children and no window.
#[derive(Debug, Clone)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Fraction of the split axis given to child 0, in `[0, 1]`.
    pub split: f32,
    /// `true`: children stack vertically (horizontal divider line).
    /// `false`: children sit side by side with a one-column divider.
    pub stacked: bool,
    pub parent: Option<RegionId>,
    pub children: Option<[RegionId; 2]>,
    pub window: Option<WindowId>,
}

impl Region {
    /// Whether this region is a leaf.
    #[inline]
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.window.is_some()
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// The region tree plus the windows its leaves own.
pub struct Layout {
    regions: Vec<Option<Region>>,
    region_free: Vec<usize>,
    windows: Vec<Option<Window>>,
    window_free: Vec<usize>,
    root: RegionId,
    min_width: u16,
    min_height: u16,
}

impl Layout {
    /// A single root window filling the given terminal size.
    #[must_use]
    pub fn new(width: u16, height: u16, min_width: u16, min_height: u16) -> Self {
        let root = RegionId(0);
        let root_window = WindowId(0);
        Self {
            regions: vec![Some(Region {
                x: 0,
                y: 0,
                width,
                height,
                split: 0.5,
                stacked: false,
                parent: None,
                children: None,
                window: Some(root_window),
            })],
            region_free: Vec::new(),
            windows: vec![Some(Window::new(root))],
            window_free: Vec::new(),
            root,
            min_width,
            min_height,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// The root region (never removable).
    #[inline]
    #[must_use]
    pub const fn root(&self) -> RegionId {
        self.root
    }

    /// A region by id.
    ///
    /// # Panics
    ///
    /// Panics on a freed id; ids only dangle across a `remove`.
    #[inline]
    #[must_use]
    pub fn region(&self, id: RegionId) -> &Region {
        self.regions[id.0].as_ref().expect("dangling region id")
    }

    fn region_mut(&mut self, id: RegionId) -> &mut Region {
        self.regions[id.0].as_mut().expect("dangling region id")
    }

    /// A window by id.
    ///
    /// # Panics
    ///
    /// Panics on a freed id; ids only dangle across a `remove`.
    #[inline]
    #[must_use]
    pub fn window(&self, id: WindowId) -> &Window {
        self.windows[id.0].as_ref().expect("dangling window id")
    }

    /// Mutable window access.
    #[inline]
    pub fn window_mut(&mut self, id: WindowId) -> &mut Window {
        self.windows[id.0].as_mut().expect("dangling window id")
    }

    /// The leaf region currently holding a window.
    #[inline]
    #[must_use]
    pub fn region_of(&self, win: WindowId) -> RegionId {
        self.window(win).region
    }

    /// All live windows, in tree (leaf) order.
    #[must_use]
    pub fn leaves(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, id: RegionId, out: &mut Vec<WindowId>) {
        let region = self.region(id);
        if let Some(win) = region.window {
            out.push(win);
        } else if let Some([a, b]) = region.children {
            self.collect_leaves(a, out);
            self.collect_leaves(b, out);
        }
    }

    /// Number of live windows.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.windows.iter().filter(|w| w.is_some()).count()
    }

    // ── Arena plumbing ──────────────────────────────────────────────

    fn alloc_region(&mut self, region: Region) -> RegionId {
        if let Some(slot) = self.region_free.pop() {
            self.regions[slot] = Some(region);
            RegionId(slot)
        } else {
            self.regions.push(Some(region));
            RegionId(self.regions.len() - 1)
        }
    }

    fn free_region(&mut self, id: RegionId) {
        self.regions[id.0] = None;
        self.region_free.push(id.0);
    }

    fn alloc_window(&mut self, window: Window) -> WindowId {
        if let Some(slot) = self.window_free.pop() {
            self.windows[slot] = Some(window);
            WindowId(slot)
        } else {
            self.windows.push(Some(window));
            WindowId(self.windows.len() - 1)
        }
    }

    fn free_window(&mut self, id: WindowId) {
        self.windows[id.0] = None;
        self.window_free.push(id.0);
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Split a window's leaf in two.
    ///
    /// The leaf becomes an internal node at ratio 0.5; the existing window
    /// stays as child 0 and a fresh empty window becomes child 1. A leaf
    /// too small for two minimum-sized children still splits — clamping
    /// degrades to the minimum layout.
    ///
    /// Returns the new window.
    pub fn split(&mut self, win: WindowId, stacked: bool) -> WindowId {
        let node = self.region_of(win);
        let new_win = self.alloc_window(Window::new(node));

        let child0 = self.alloc_region(Region {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            split: 0.5,
            stacked: false,
            parent: Some(node),
            children: None,
            window: Some(win),
        });
        let child1 = self.alloc_region(Region {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            split: 0.5,
            stacked: false,
            parent: Some(node),
            children: None,
            window: Some(new_win),
        });

        let region = self.region_mut(node);
        region.window = None;
        region.children = Some([child0, child1]);
        region.split = 0.5;
        region.stacked = stacked;

        self.layout_subtree(node);
        tracing::debug!(?win, ?new_win, stacked, "window split");
        new_win
    }

    /// Remove a window and its leaf region.
    ///
    /// Focus is handed to the next leaf in traversal order, the sibling is
    /// promoted into the parent's slot, and the region pair plus the
    /// window are freed. Removing the root window is a silent no-op:
    /// returns `None`.
    pub fn remove(&mut self, win: WindowId) -> Option<WindowId> {
        let leaf = self.region_of(win);
        let parent = self.region(leaf).parent?;

        let next = self.focus_next(win);

        let [c0, c1] = self.region(parent).children.expect("parent must be internal");
        let sibling = if c0 == leaf { c1 } else { c0 };

        // Promote the sibling's content into the parent slot. The parent
        // keeps its own rectangle and outer parent link.
        let promoted = self.regions[sibling.0].take().expect("dangling sibling");
        self.region_free.push(sibling.0);

        let slot = self.region_mut(parent);
        slot.split = promoted.split;
        slot.stacked = promoted.stacked;
        slot.children = promoted.children;
        slot.window = promoted.window;

        if let Some([a, b]) = promoted.children {
            self.region_mut(a).parent = Some(parent);
            self.region_mut(b).parent = Some(parent);
        }

        self.free_region(leaf);
        self.free_window(win);

        self.layout_subtree(parent);
        tracing::debug!(?win, "window removed");
        Some(next)
    }

    /// Swap a window's sibling pair under their parent. No-op at the root.
    pub fn swap(&mut self, win: WindowId) {
        let leaf = self.region_of(win);
        let Some(parent) = self.region(leaf).parent else {
            return;
        };
        if let Some(children) = &mut self.region_mut(parent).children {
            children.swap(0, 1);
        }
        self.layout_subtree(parent);
    }

    /// Nudge the split ratio of the window's parent by `amount` cells.
    ///
    /// Side-by-side parents double the amount so a step feels the same in
    /// both orientations (cells are roughly twice as tall as they are
    /// wide). The ratio is clamped so both sides keep the minimum size,
    /// then the geometry pass re-clamps and rewrites the realized ratio.
    pub fn resize(&mut self, win: WindowId, amount: i32) {
        let leaf = self.region_of(win);
        let Some(parent) = self.region(leaf).parent else {
            return;
        };

        let region = self.region(parent);
        let (extent, min) = if region.stacked {
            (region.height, self.min_height)
        } else {
            (region.width, self.min_width)
        };
        if extent == 0 {
            return;
        }

        let cells = if region.stacked { amount } else { amount * 2 };
        #[allow(clippy::cast_precision_loss)]
        let delta = cells as f32 / f32::from(extent);

        let lo = f32::from(min) / f32::from(extent);
        let hi = 1.0 - lo;
        let split = (region.split + delta).clamp(lo.min(hi), hi.max(lo));

        self.region_mut(parent).split = split;
        self.layout_subtree(parent);
    }

    // ── Focus traversal ─────────────────────────────────────────────

    /// The next window in leaf order, wrapping at the end.
    #[must_use]
    pub fn focus_next(&self, win: WindowId) -> WindowId {
        let leaves = self.leaves();
        let pos = leaves.iter().position(|&w| w == win).unwrap_or(0);
        leaves[(pos + 1) % leaves.len()]
    }

    /// The previous window in leaf order, wrapping at the start.
    #[must_use]
    pub fn focus_previous(&self, win: WindowId) -> WindowId {
        let leaves = self.leaves();
        let pos = leaves.iter().position(|&w| w == win).unwrap_or(0);
        leaves[(pos + leaves.len() - 1) % leaves.len()]
    }

    // ── Geometry ────────────────────────────────────────────────────

    /// Give the root a new rectangle (terminal resize) and re-lay out
    /// everything.
    pub fn resize_root(&mut self, width: u16, height: u16) {
        let root = self.root;
        let region = self.region_mut(root);
        region.width = width;
        region.height = height;
        self.layout_subtree(root);
    }

    /// Recompute the rectangles below `id`.
    ///
    /// Leaves update their window's back-reference and mark it dirty.
    /// Internal nodes hand child 0 the clamped share of the split axis and
    /// child 1 the remainder (minus the divider column when side by side),
    /// then rewrite `split` to the realized ratio.
    pub fn layout_subtree(&mut self, id: RegionId) {
        let region = self.region(id).clone();

        let Some([a, b]) = region.children else {
            let win = region.window.expect("leaf without window");
            let w = self.window_mut(win);
            w.region = id;
            w.redraw = true;
            return;
        };

        if region.stacked {
            let top = clamp_extent(
                f32::from(region.height) * region.split,
                self.min_height,
                i32::from(region.height) - i32::from(self.min_height),
            );
            if region.height > 0 {
                self.region_mut(id).split = f32::from(top) / f32::from(region.height);
            }
            let bottom = region.height.saturating_sub(top);

            self.set_rect(a, region.x, region.y, region.width, top);
            self.set_rect(b, region.x, region.y + top, region.width, bottom);
        } else {
            let left = clamp_extent(
                f32::from(region.width) * region.split,
                self.min_width,
                i32::from(region.width) - i32::from(self.min_width) - 1,
            );
            if region.width > 0 {
                self.region_mut(id).split = f32::from(left) / f32::from(region.width);
            }
            let right = region.width.saturating_sub(left + 1);

            self.set_rect(a, region.x, region.y, left, region.height);
            self.set_rect(b, region.x + left + 1, region.y, right, region.height);
        }

        self.layout_subtree(a);
        self.layout_subtree(b);
    }

    fn set_rect(&mut self, id: RegionId, x: u16, y: u16, width: u16, height: u16) {
        let region = self.region_mut(id);
        region.x = x;
        region.y = y;
        region.width = width;
        region.height = height;
    }

    // ── Viewport helpers ────────────────────────────────────────────

    /// The text-area size of a window: region minus status bar, gutter,
    /// and the left border of non-leftmost windows. `gutter` is the full
    /// gutter width (digits + margin).
    #[must_use]
    pub fn text_area(&self, win: WindowId, gutter: usize) -> (usize, usize) {
        let region = self.region(self.region_of(win));
        let border = if region.x > 0 { 2 } else { 0 };
        let w = usize::from(region.width).saturating_sub(gutter + border);
        let h = usize::from(region.height).saturating_sub(1);
        (w, h)
    }

    /// Half the text height of a window's region — the page-motion stride.
    #[must_use]
    pub fn half_page(&self, win: WindowId) -> usize {
        let region = self.region(self.region_of(win));
        (usize::from(region.height).saturating_sub(1) / 2).max(1)
    }
}

/// Clamp a computed extent: truncate, cap at `hi`, then floor at `lo`.
/// The floor is applied last so the minimum wins when `hi < lo` (a parent
/// too small for two minimum children degrades to the minimum layout).
fn clamp_extent(ideal: f32, lo: u16, hi: i32) -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let v = ideal as i32;
    let v = v.min(hi.max(0));
    let v = v.max(i32::from(lo));
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    {
        v as u16
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::new(80, 24, 40, 10)
    }

    fn rect(l: &Layout, win: WindowId) -> (u16, u16, u16, u16) {
        let r = l.region(l.region_of(win));
        (r.x, r.y, r.width, r.height)
    }

    /// Walk the tree checking the structural invariants.
    fn check_invariants(l: &Layout) {
        check_region(l, l.root());
        // The leaf set equals the live window set.
        let mut leaves = l.leaves();
        leaves.sort_by_key(|w| w.0);
        let live: Vec<WindowId> = (0..l.windows.len())
            .filter(|&i| l.windows[i].is_some())
            .map(WindowId)
            .collect();
        assert_eq!(leaves, live);
    }

    fn check_region(l: &Layout, id: RegionId) {
        let r = l.region(id);
        match (r.window, r.children) {
            (Some(win), None) => {
                assert_eq!(l.window(win).region, id, "window back-reference");
            }
            (None, Some([a, b])) => {
                let (ra, rb) = (l.region(a), l.region(b));
                assert_eq!(ra.parent, Some(id));
                assert_eq!(rb.parent, Some(id));
                if r.stacked {
                    assert_eq!(ra.height + rb.height, r.height, "stacked heights sum");
                    assert_eq!(ra.width, r.width);
                    assert_eq!(rb.width, r.width);
                } else {
                    assert_eq!(
                        ra.width + rb.width + 1,
                        r.width,
                        "side-by-side widths sum to parent minus divider"
                    );
                    assert_eq!(ra.height, r.height);
                    assert_eq!(rb.height, r.height);
                }
                check_region(l, a);
                check_region(l, b);
            }
            _ => panic!("region is neither leaf nor internal"),
        }
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn root_fills_terminal() {
        let l = layout();
        let root_win = l.leaves()[0];
        assert_eq!(rect(&l, root_win), (0, 0, 80, 24));
        check_invariants(&l);
    }

    // ── Split geometry ───────────────────────────────────────────────

    #[test]
    fn side_split_spends_one_column_on_divider() {
        let mut l = layout();
        let first = l.leaves()[0];
        let second = l.split(first, false);
        assert_eq!(rect(&l, first), (0, 0, 40, 24));
        assert_eq!(rect(&l, second), (41, 0, 39, 24));
        check_invariants(&l);
    }

    #[test]
    fn stacked_split_halves_height() {
        let mut l = layout();
        let first = l.leaves()[0];
        let second = l.split(first, true);
        assert_eq!(rect(&l, first), (0, 0, 80, 12));
        assert_eq!(rect(&l, second), (0, 12, 80, 12));
        check_invariants(&l);
    }

    #[test]
    fn split_rewrites_realized_ratio() {
        let mut l = layout();
        let first = l.leaves()[0];
        l.split(first, false);
        let node = l.root();
        // 40/80 exactly.
        assert!((l.region(node).split - 0.5).abs() < 1e-6);
    }

    #[test]
    fn split_below_minimum_degrades_to_minimum_layout() {
        let mut l = Layout::new(50, 24, 40, 10);
        let first = l.leaves()[0];
        let second = l.split(first, false);
        // min 40 wins over the 50-cell parent: the first child takes the
        // minimum and the rest goes to the second.
        let (_, _, w0, _) = rect(&l, first);
        let (_, _, w1, _) = rect(&l, second);
        assert_eq!(w0, 40);
        assert_eq!(w1, 9);
    }

    #[test]
    fn nested_splits_tile_perfectly() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        let c = l.split(b, true);
        assert_eq!(l.leaves(), vec![a, b, c]);
        check_invariants(&l);
        let (_, _, _, hb) = rect(&l, b);
        let (_, _, _, hc) = rect(&l, c);
        assert_eq!(hb + hc, 24);
    }

    // ── Remove ───────────────────────────────────────────────────────

    #[test]
    fn split_then_remove_restores_single_window() {
        let mut l = layout();
        let first = l.leaves()[0];
        let second = l.split(first, false);
        assert_eq!(rect(&l, first), (0, 0, 40, 24));

        let next = l.remove(second).unwrap();
        assert_eq!(next, first);
        assert_eq!(l.window_count(), 1);
        assert_eq!(rect(&l, first), (0, 0, 80, 24));
        assert!(l.region(l.region_of(first)).parent.is_none());
        check_invariants(&l);
    }

    #[test]
    fn remove_root_is_silent_noop() {
        let mut l = layout();
        let only = l.leaves()[0];
        assert!(l.remove(only).is_none());
        assert_eq!(l.window_count(), 1);
    }

    #[test]
    fn remove_promotes_internal_sibling() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        let c = l.split(b, true);
        // Remove a: the right subtree (b over c) fills the terminal.
        let next = l.remove(a).unwrap();
        assert_eq!(next, b);
        assert_eq!(l.leaves(), vec![b, c]);
        assert_eq!(rect(&l, b), (0, 0, 80, 12));
        assert_eq!(rect(&l, c), (0, 12, 80, 12));
        check_invariants(&l);
    }

    #[test]
    fn remove_transfers_focus_to_next_leaf() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        let c = l.split(b, true);
        let next = l.remove(b).unwrap();
        assert_eq!(next, c);
        check_invariants(&l);
    }

    #[test]
    fn arena_slots_are_reused() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        let regions_high_water = l.regions.len();
        l.remove(b);
        let c = l.split(a, true);
        let _ = c;
        assert_eq!(l.regions.len(), regions_high_water, "freed slots reused");
    }

    // ── Swap ─────────────────────────────────────────────────────────

    #[test]
    fn swap_exchanges_sibling_rectangles() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        l.swap(a);
        assert_eq!(rect(&l, b), (0, 0, 40, 24));
        assert_eq!(rect(&l, a), (41, 0, 39, 24));
        assert_eq!(l.leaves(), vec![b, a]);
        check_invariants(&l);
    }

    #[test]
    fn swap_at_root_is_noop() {
        let mut l = layout();
        let a = l.leaves()[0];
        l.swap(a);
        assert_eq!(rect(&l, a), (0, 0, 80, 24));
    }

    // ── Resize ───────────────────────────────────────────────────────

    #[test]
    fn resize_moves_the_divider() {
        let mut l = Layout::new(120, 40, 40, 10);
        let a = l.leaves()[0];
        let b = l.split(a, true);
        let (_, _, _, h_before) = rect(&l, a);
        l.resize(a, 3);
        let (_, _, _, h_after) = rect(&l, a);
        assert_eq!(h_after, h_before + 3);
        check_invariants(&l);
        let _ = b;
    }

    #[test]
    fn resize_doubles_amount_for_side_by_side() {
        let mut l = Layout::new(120, 40, 40, 10);
        let a = l.leaves()[0];
        l.split(a, false);
        let (_, _, w_before, _) = rect(&l, a);
        l.resize(a, 3);
        let (_, _, w_after, _) = rect(&l, a);
        assert_eq!(w_after, w_before + 6);
        check_invariants(&l);
    }

    #[test]
    fn resize_clamps_at_minimum() {
        let mut l = Layout::new(120, 40, 40, 10);
        let a = l.leaves()[0];
        let b = l.split(a, false);
        l.resize(a, -1000);
        let (_, _, w_a, _) = rect(&l, a);
        assert_eq!(w_a, 40, "shrinking stops at the minimum width");
        l.resize(a, 1000);
        let (_, _, w_b, _) = rect(&l, b);
        assert_eq!(w_b, 40, "growing stops at the sibling's minimum");
        check_invariants(&l);
    }

    #[test]
    fn resize_root_window_is_noop() {
        let mut l = layout();
        let a = l.leaves()[0];
        l.resize(a, 5);
        assert_eq!(rect(&l, a), (0, 0, 80, 24));
    }

    // ── Focus traversal ──────────────────────────────────────────────

    #[test]
    fn focus_cycles_in_leaf_order() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        let c = l.split(b, true);
        assert_eq!(l.focus_next(a), b);
        assert_eq!(l.focus_next(b), c);
        assert_eq!(l.focus_next(c), a, "wraps");
        assert_eq!(l.focus_previous(a), c, "wraps backward");
    }

    #[test]
    fn focus_next_then_previous_is_identity() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        let c = l.split(b, true);
        for win in [a, b, c] {
            assert_eq!(l.focus_previous(l.focus_next(win)), win);
            assert_eq!(l.focus_next(l.focus_previous(win)), win);
        }
    }

    #[test]
    fn focus_single_window_cycles_to_itself() {
        let l = layout();
        let a = l.leaves()[0];
        assert_eq!(l.focus_next(a), a);
        assert_eq!(l.focus_previous(a), a);
    }

    // ── Terminal resize ──────────────────────────────────────────────

    #[test]
    fn resize_root_relayouts_whole_tree() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        l.resize_root(120, 40);
        let (_, _, wa, ha) = rect(&l, a);
        let (_, _, wb, hb) = rect(&l, b);
        assert_eq!(wa + wb + 1, 120);
        assert_eq!(ha, 40);
        assert_eq!(hb, 40);
        check_invariants(&l);
    }

    #[test]
    fn geometry_pass_marks_windows_dirty() {
        let mut l = layout();
        let a = l.leaves()[0];
        l.window_mut(a).redraw = false;
        l.resize_root(100, 30);
        assert!(l.window(a).redraw);
    }

    // ── Viewport helpers ─────────────────────────────────────────────

    #[test]
    fn text_area_subtracts_status_bar_and_gutter() {
        let l = layout();
        let a = l.leaves()[0];
        let (w, h) = l.text_area(a, 4);
        assert_eq!(w, 76);
        assert_eq!(h, 23);
    }

    #[test]
    fn text_area_subtracts_border_for_non_leftmost() {
        let mut l = layout();
        let a = l.leaves()[0];
        let b = l.split(a, false);
        // b starts at x=41: 2-cell border applies.
        let (w, _) = l.text_area(b, 4);
        assert_eq!(w, 39 - 4 - 2);
    }

    #[test]
    fn half_page_is_half_text_height() {
        let l = layout();
        let a = l.leaves()[0];
        assert_eq!(l.half_page(a), 11); // (24 - 1) / 2
    }
}
