//! Cursor — a clamped 2D position.
//!
//! The `Cursor` holds a `column` and a document-absolute `row`. The column is
//! measured from the left edge of the text area **including** the line-number
//! gutter: the first editable column is `gutter`, and the column just past the
//! last character of a line is `gutter + line_len`.
//!
//! # Clamping
//!
//! Every move saturates. Asking for a column left of the gutter pins to the
//! gutter, asking for a row past the last line pins to the last line. Nothing
//! wraps and nothing errors.
//!
//! The column's upper bound depends on the length of the *current* line, so
//! the cursor does not own it: callers pass the bound into each move. After a
//! row change the caller re-clamps with [`clamp_column`](Cursor::clamp_column)
//! against the new line.
//!
//! Like the rest of the core, the cursor never references the document. It
//! is a plain value type.

/// A cursor in a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Column including the gutter. Always `>= gutter`.
    column: usize,

    /// Document-absolute row.
    row: usize,

    /// Width of the reserved left margin.
    gutter: usize,
}

impl Cursor {
    /// A cursor at the first editable column of row 0.
    #[must_use]
    pub const fn new(gutter: usize) -> Self {
        Self {
            column: gutter,
            row: 0,
            gutter,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Column including the gutter.
    #[inline]
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Document-absolute row.
    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Width of the gutter this cursor reserves.
    #[inline]
    #[must_use]
    pub const fn gutter(&self) -> usize {
        self.gutter
    }

    /// Char offset into the current line (`column - gutter`).
    #[inline]
    #[must_use]
    pub const fn text_col(&self) -> usize {
        self.column - self.gutter
    }

    // -- Movement -----------------------------------------------------------

    /// Shift the column by `delta`, clamped to `[gutter, gutter + line_len]`.
    ///
    /// Returns the new column.
    pub const fn move_column(&mut self, delta: isize, line_len: usize) -> usize {
        let target = self.column.saturating_add_signed(delta);
        self.column = clamp(target, self.gutter, self.gutter + line_len);
        self.column
    }

    /// Shift the row by `delta`, clamped to `[0, line_count - 1]`.
    ///
    /// Returns the new row. The column is left alone; re-clamp it against the
    /// new line with [`clamp_column`](Self::clamp_column).
    pub const fn move_row(&mut self, delta: isize, line_count: usize) -> usize {
        let target = self.row.saturating_add_signed(delta);
        self.row = clamp(target, 0, line_count.saturating_sub(1));
        self.row
    }

    /// Pull the column back inside `[gutter, gutter + line_len]`.
    pub const fn clamp_column(&mut self, line_len: usize) {
        self.column = clamp(self.column, self.gutter, self.gutter + line_len);
    }

    /// Change the gutter width, keeping the same text offset.
    pub const fn set_gutter(&mut self, gutter: usize) {
        let text_col = self.text_col();
        self.gutter = gutter;
        self.column = gutter + text_col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Saturating clamp of `value` into `[lo, hi]`. `hi` wins if `lo > hi`.
const fn clamp(value: usize, lo: usize, hi: usize) -> usize {
    if value > hi {
        hi
    } else if value < lo {
        lo
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
