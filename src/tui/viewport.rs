// selection + scroll offset over a list of logical rows

/// Rows of the row view that never hold data: title, column header and the
/// status line. The footer is accounted for separately.
pub const CHROME_ROWS: usize = 3;

/// Data rows that fit on a terminal `height` rows tall.
pub fn visible_rows(height: u16) -> usize {
    (height as usize).saturating_sub(CHROME_ROWS + 1).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    selected: usize,
    offset: usize,
    wrap: bool,
}

impl Viewport {
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Back to the first row; the wrap policy survives.
    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn down(&mut self, len: usize, visible: usize) {
        self.select(self.selected.saturating_add(1), len, visible);
    }

    pub fn up(&mut self, len: usize, visible: usize) {
        self.select(self.selected.saturating_sub(1), len, visible);
    }

    pub fn page_down(&mut self, len: usize, visible: usize) {
        self.select(self.selected.saturating_add(visible.max(1)), len, visible);
    }

    pub fn page_up(&mut self, len: usize, visible: usize) {
        self.select(self.selected.saturating_sub(visible.max(1)), len, visible);
    }

    pub fn first(&mut self, len: usize, visible: usize) {
        self.select(0, len, visible);
    }

    pub fn last(&mut self, len: usize, visible: usize) {
        self.select(len.saturating_sub(1), len, visible);
    }

    pub fn toggle_wrap(&mut self, len: usize, visible: usize) {
        self.wrap = !self.wrap;
        self.follow(len, visible);
    }

    fn select(&mut self, index: usize, len: usize, visible: usize) {
        self.selected = index.min(len.saturating_sub(1));
        self.follow(len, visible);
    }

    /// Re-derives the offset from the selection. Also used after a resize or a
    /// shrink of the underlying list.
    pub fn follow(&mut self, len: usize, visible: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));

        if self.wrap {
            // variable-height rows: pin the selection to the top
            self.offset = self.selected;
            return;
        }

        let visible = visible.max(1);
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible {
            self.offset = self.selected + 1 - visible;
        }
    }
}

/// Scroll position of a read-only pad (no selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadScroll {
    pos: usize,
}

impl PadScroll {
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Moves by `delta` lines, keeping at least one line of a `len` line pad
    /// on screen.
    pub fn scroll(&mut self, delta: isize, len: usize) {
        let max = len.saturating_sub(1);
        self.pos = self.pos.saturating_add_signed(delta).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_window(v: &Viewport, visible: usize) -> bool {
        v.offset() <= v.selected() && v.selected() < v.offset() + visible
    }

    #[test]
    fn visible_rows_leaves_chrome() {
        assert_eq!(visible_rows(24), 20);
        assert_eq!(visible_rows(5), 1);
        assert_eq!(visible_rows(3), 1);
        assert_eq!(visible_rows(0), 1);
    }

    #[test]
    fn down_clamps_to_last() {
        let mut v = Viewport::default();
        for _ in 0..10 {
            v.down(3, 5);
        }
        assert_eq!(v.selected(), 2);
        assert_eq!(v.offset(), 0);
    }

    #[test]
    fn empty_list_stays_at_zero() {
        let mut v = Viewport::default();
        v.down(0, 5);
        v.up(0, 5);
        v.last(0, 5);
        assert_eq!((v.selected(), v.offset()), (0, 0));
    }

    #[test]
    fn scrolls_minimally() {
        let mut v = Viewport::default();
        for _ in 0..5 {
            v.down(100, 5);
        }
        // selection just past the window drags it by one
        assert_eq!((v.selected(), v.offset()), (5, 1));

        for _ in 0..3 {
            v.up(100, 5);
        }
        // still inside the window, nothing moves
        assert_eq!((v.selected(), v.offset()), (2, 1));

        v.up(100, 5);
        v.up(100, 5);
        assert_eq!((v.selected(), v.offset()), (0, 0));
    }

    #[test]
    fn selection_always_in_window() {
        // sweep sizes and a fixed pseudo-random move sequence
        for h in 3u16..30 {
            let visible = visible_rows(h);
            for len in 0..40usize {
                let mut v = Viewport::default();
                let mut seed = (h as usize) * 31 + len;
                for _ in 0..200 {
                    seed = seed.wrapping_mul(1103515245).wrapping_add(12345) % (1 << 31);
                    match seed % 6 {
                        0 | 1 => v.down(len, visible),
                        2 => v.up(len, visible),
                        3 => v.page_down(len, visible),
                        4 => v.page_up(len, visible),
                        _ => v.last(len, visible),
                    }
                    if len > 0 {
                        assert!(in_window(&v, visible), "h={h} len={len} {v:?}");
                        assert!(v.selected() < len);
                    }
                }
            }
        }
    }

    #[test]
    fn wrap_pins_selection_to_top() {
        let mut v = Viewport::default();
        v.down(10, 5);
        v.down(10, 5);
        v.toggle_wrap(10, 5);
        assert!(v.wrap());
        assert_eq!((v.selected(), v.offset()), (2, 2));

        v.up(10, 5);
        assert_eq!((v.selected(), v.offset()), (1, 1));
    }

    #[test]
    fn unwrap_recomputes_offset() {
        let mut v = Viewport::default();
        v.toggle_wrap(50, 5);
        for _ in 0..8 {
            v.down(50, 5);
        }
        assert_eq!(v.offset(), 8);

        v.toggle_wrap(50, 5);
        assert!(!v.wrap());
        assert_eq!(v.selected(), 8);
        // offset <= selected already holds, so the window keeps its top
        assert!(in_window(&v, 5));
    }

    #[test]
    fn follow_handles_shrinking_window() {
        let mut v = Viewport::default();
        for _ in 0..15 {
            v.down(30, 20);
        }
        assert_eq!(v.offset(), 0);
        v.follow(30, 4);
        assert_eq!(v.offset(), 12);
        assert!(in_window(&v, 4));
    }

    #[test]
    fn reset_keeps_wrap() {
        let mut v = Viewport::default();
        v.toggle_wrap(10, 5);
        v.last(10, 5);
        v.reset();
        assert_eq!((v.selected(), v.offset(), v.wrap()), (0, 0, true));
    }

    #[test]
    fn pad_scroll_clamps() {
        let mut p = PadScroll::default();
        p.scroll(-3, 10);
        assert_eq!(p.pos(), 0);
        p.scroll(25, 10);
        assert_eq!(p.pos(), 9);
        p.scroll(-4, 10);
        assert_eq!(p.pos(), 5);
        p.scroll(1, 0);
        assert_eq!(p.pos(), 0);
    }
}
