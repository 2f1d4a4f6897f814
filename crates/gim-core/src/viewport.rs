//! Viewport — the sliding window of rows currently on screen.
//!
//! A `Viewport` is a half-open row range `[start, end)` over a document,
//! at most `height` rows long. It never owns the document: the line count is
//! passed into each operation, the same way the cursor receives line lengths.
//!
//! # Scroll policy
//!
//! The window keeps an **anchor** row, by default halfway down
//! (`height / 2`). When the cursor's window-relative row goes below the
//! anchor the window scrolls down, one row per step of cursor movement,
//! holding the cursor on the anchor. Going above the anchor scrolls up the
//! same way. Scrolling stops at the edges: `start` never drops below 0 and
//! `end` never passes the line count. At the edges the cursor simply moves
//! within the window.
//!
//! ```text
//!   document        window (height 5, anchor 2)
//!   ┌────────┐
//!   │ 0      │
//!   │ 1      │      ┌────────┐ start = 1
//!   │ 2      │      │ 2      │
//!   │ 3 ◀────┼──────┤ 3  ◀── │ anchor (cursor held here)
//!   │ 4      │      │ 4      │
//!   │ 5      │      │ 5      │ end = 6
//!   │ 6      │      └────────┘
//!   └────────┘
//! ```
//!
//! The policy is arithmetic, not iterative: following a jump of `n` rows
//! ends in the same window as `n` single-row steps.

use tracing::trace;

use crate::document::{Document, Lines};
use crate::error::{Error, Result};

/// A window of contiguous document rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    start: usize,

    /// One past the last visible row.
    end: usize,

    /// Maximum number of rows the window can show.
    height: usize,

    /// Preferred window-relative cursor row. `None` means `height / 2`.
    anchor: Option<usize>,
}

impl Viewport {
    /// Create a window at the top of a document with `line_count` lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeight`] if `height` is zero.
    pub fn new(height: usize, line_count: usize) -> Result<Self> {
        if height == 0 {
            return Err(Error::InvalidHeight);
        }
        Ok(Self {
            start: 0,
            end: height.min(line_count.max(1)),
            height,
            anchor: None,
        })
    }

    /// Use `anchor` as the preferred cursor row instead of the midpoint.
    #[must_use]
    pub const fn with_anchor(mut self, anchor: usize) -> Self {
        self.anchor = Some(anchor);
        self
    }

    // -- Accessors ----------------------------------------------------------

    /// First visible row.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// One past the last visible row.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Maximum number of visible rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of rows actually visible (`end - start`).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the window shows nothing. Never the case for a live buffer.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `row` lies in `[start, end)`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, row: usize) -> bool {
        self.start <= row && row < self.end
    }

    /// Convert a document row to a window-relative row, if visible.
    #[inline]
    #[must_use]
    pub const fn relative_row(&self, row: usize) -> Option<usize> {
        if self.contains(row) {
            Some(row - self.start)
        } else {
            None
        }
    }

    /// The window-relative row the cursor is held at while scrolling.
    #[must_use]
    pub fn anchor(&self) -> usize {
        let preferred = self.anchor.unwrap_or(self.height / 2);
        preferred.min(self.len().saturating_sub(1))
    }

    /// The visible lines, lazily. Always matches `[start, end)`.
    #[must_use]
    pub fn window<'a>(&self, doc: &'a Document) -> Lines<'a> {
        doc.lines(self.start..self.end)
    }

    // -- Scrolling ----------------------------------------------------------

    /// Move the whole window by `by` rows, saturating at both ends.
    ///
    /// Returns the number of rows actually scrolled (negative is up).
    pub fn scroll(&mut self, by: isize, line_count: usize) -> isize {
        self.refit(line_count);
        let before = self.start;
        let max_start = line_count.max(1) - self.len();
        self.start = self.start.saturating_add_signed(by).min(max_start);
        self.end = self.start + self.len_for(line_count);

        let moved = signed(self.start) - signed(before);
        if moved != 0 {
            trace!(by, moved, start = self.start, end = self.end, "viewport scrolled");
        }
        moved
    }

    /// Apply the scroll policy so `row` is visible.
    ///
    /// Call after every vertical cursor move.
    pub fn follow(&mut self, row: usize, line_count: usize) {
        self.refit(line_count);
        let anchor = self.anchor();
        let offset = signed(row) - signed(self.start) - signed(anchor);
        if offset != 0 {
            self.scroll(offset, line_count);
        }
        self.reveal(row, line_count);
    }

    /// Change the window height, keeping `row` visible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeight`] if `height` is zero; the viewport is
    /// left unchanged.
    pub fn resize(&mut self, height: usize, row: usize, line_count: usize) -> Result<()> {
        if height == 0 {
            return Err(Error::InvalidHeight);
        }
        self.height = height;
        self.refit(line_count);
        self.follow(row, line_count);
        Ok(())
    }

    // -- Internals ----------------------------------------------------------

    /// Visible length for a document of `line_count` lines.
    const fn len_for(&self, line_count: usize) -> usize {
        let lines = if line_count == 0 { 1 } else { line_count };
        if self.height < lines { self.height } else { lines }
    }

    /// Re-establish `end - start == min(height, line_count)` inside the
    /// document, keeping `start` when possible.
    fn refit(&mut self, line_count: usize) {
        let len = self.len_for(line_count);
        let max_start = line_count.max(1) - len;
        self.start = self.start.min(max_start);
        self.end = self.start + len;
    }

    /// Minimal shift that brings `row` into the window.
    fn reveal(&mut self, row: usize, line_count: usize) {
        let row = row.min(line_count.saturating_sub(1));
        let len = self.len();
        if row < self.start {
            self.start = row;
        } else if row >= self.end {
            self.start = row + 1 - len;
        }
        self.end = self.start + len;
    }
}

/// Row counts never come near `isize::MAX`; saturate rather than wrap.
fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
