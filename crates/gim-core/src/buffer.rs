//! Text buffer — a document plus the cursor and window looking at it.
//!
//! `TextBuffer` owns one [`Document`], one [`Cursor`] and one [`Viewport`]
//! and is the only thing allowed to change them, so the three can never
//! disagree:
//!
//! - [`update_row`](TextBuffer::update_row) is the single entry point for
//!   vertical movement. It moves the cursor, re-clamps the column against the
//!   new line, then lets the viewport follow.
//! - [`move_column`](TextBuffer::move_column) adjusts the column only. The
//!   window never scrolls horizontally.
//! - [`insert`](TextBuffer::insert) and [`remove_rune`](TextBuffer::remove_rune)
//!   touch the current line and the column, never the window.
//!
//! The cursor row is document-absolute everywhere. Conversion to a
//! window-relative row happens once, in
//! [`cursor_render_position`](TextBuffer::cursor_render_position).
//!
//! # Limitations
//!
//! Edits stay inside one line. Backspace at the start of a line does nothing
//! rather than joining with the previous line, and line breaks can't be
//! inserted.

use std::fmt;

use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::document::{Document, Line, Lines};
use crate::error::{Error, Result};
use crate::input::Motion;
use crate::options::Options;
use crate::render::gutter_width;
use crate::viewport::Viewport;

/// A document being edited, with its cursor and visible window.
pub struct TextBuffer {
    doc: Document,
    cursor: Cursor,
    viewport: Viewport,
    /// Terminal width at creation (or last resize).
    width: usize,
    /// Display name, usually the file path.
    name: Option<String>,
}

impl TextBuffer {
    // -- Construction -------------------------------------------------------

    /// Wrap `doc` in a buffer sized for a `width` × `height` terminal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is zero.
    pub fn new(doc: Document, width: usize, height: usize, options: &Options) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let line_count = doc.line_count();
        let mut viewport = Viewport::new(height, line_count)?;
        if let Some(anchor) = options.scroll_anchor {
            viewport = viewport.with_anchor(anchor);
        }
        let cursor = Cursor::new(gutter_width(line_count, options.line_numbers));

        Ok(Self {
            doc,
            cursor,
            viewport,
            width,
            name: None,
        })
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // -- Accessors ----------------------------------------------------------

    /// The text.
    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// The cursor. Its row is document-absolute.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The visible window.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Width of the line-number gutter, separator included.
    #[inline]
    #[must_use]
    pub const fn gutter_width(&self) -> usize {
        self.cursor.gutter()
    }

    /// Terminal width this buffer was sized for.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Display name, if any.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The line under the cursor. `Some` for every live buffer.
    #[must_use]
    pub fn current_line(&self) -> Option<Line<'_>> {
        self.doc.line(self.cursor.row())
    }

    /// The visible lines, lazily.
    #[must_use]
    pub fn window(&self) -> Lines<'_> {
        self.viewport.window(&self.doc)
    }

    /// Cursor position for painting: `(column, row - window_start)`.
    #[must_use]
    pub const fn cursor_render_position(&self) -> (usize, usize) {
        (
            self.cursor.column(),
            self.cursor.row() - self.viewport.start(),
        )
    }

    // -- Navigation ---------------------------------------------------------

    /// Move the cursor `by` rows and scroll to keep it visible.
    ///
    /// The row clamps to the document, the column clamps to the new line.
    pub fn update_row(&mut self, by: isize) {
        let line_count = self.doc.line_count();
        let row = self.cursor.move_row(by, line_count);
        self.cursor.clamp_column(self.line_len(row));
        self.viewport.follow(row, line_count);
        trace!(
            row,
            column = self.cursor.column(),
            start = self.viewport.start(),
            end = self.viewport.end(),
            "row updated"
        );
    }

    /// Move the cursor `by` columns along the current line.
    pub fn move_column(&mut self, by: isize) {
        let len = self.line_len(self.cursor.row());
        self.cursor.move_column(by, len);
    }

    /// Apply a one-step motion.
    pub fn apply(&mut self, motion: Motion) {
        match motion.delta() {
            (0, rows) => self.update_row(rows),
            (cols, _) => self.move_column(cols),
        }
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` before the cursor and advance the column.
    ///
    /// Returns `false` without changing anything when `ch` is a line break.
    pub fn insert(&mut self, ch: char) -> bool {
        let row = self.cursor.row();
        let col = self.cursor.text_col();
        if !self.doc.insert_char(row, col, ch) {
            debug!(row, col, ?ch, "insert ignored");
            return false;
        }
        self.cursor.move_column(1, self.line_len(row));
        trace!(row, col, ?ch, "inserted");
        true
    }

    /// Delete the character before the cursor (backspace).
    ///
    /// A no-op at the first editable column; returns the removed char.
    pub fn remove_rune(&mut self) -> Option<char> {
        let row = self.cursor.row();
        let col = self.cursor.text_col();
        if col == 0 {
            return None;
        }
        let removed = self.doc.remove_char(row, col - 1)?;
        self.cursor.move_column(-1, self.line_len(row));
        trace!(row, col = col - 1, ?removed, "removed");
        Some(removed)
    }

    // -- Terminal changes ---------------------------------------------------

    /// Re-size for a new terminal, keeping the cursor visible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is zero; the
    /// buffer is left unchanged.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        self.viewport
            .resize(height, self.cursor.row(), self.doc.line_count())?;
        self.width = width;
        debug!(width, height, "buffer resized");
        Ok(())
    }

    fn line_len(&self, row: usize) -> usize {
        self.doc.line_len(row).unwrap_or(0)
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("cursor", &self.cursor)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(lines: &[&str], height: usize) -> TextBuffer {
        TextBuffer::new(
            Document::from_lines(lines.iter().copied()),
            80,
            height,
            &Options::default(),
        )
        .unwrap()
    }

    fn window_rows(buf: &TextBuffer) -> Vec<String> {
        buf.window().map(|l| l.to_string()).collect()
    }

    fn line(buf: &TextBuffer, row: usize) -> String {
        buf.document().line(row).unwrap().to_string()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_rejects_zero_dimensions() {
        let opts = Options::default();
        let err = TextBuffer::new(Document::new(), 0, 10, &opts).unwrap_err();
        assert_eq!(err, Error::InvalidDimensions { width: 0, height: 10 });
        assert!(TextBuffer::new(Document::new(), 80, 0, &opts).is_err());
    }

    #[test]
    fn new_places_cursor_after_gutter() {
        let buf = buffer(&["hello"], 10);
        assert_eq!(buf.gutter_width(), 2);
        assert_eq!(buf.cursor().column(), 2);
        assert_eq!(buf.cursor().row(), 0);
    }

    #[test]
    fn gutter_grows_with_line_count() {
        let lines: Vec<String> = (0..120).map(|i| i.to_string()).collect();
        let buf = TextBuffer::new(
            Document::from_lines(&lines),
            80,
            10,
            &Options::default(),
        )
        .unwrap();
        assert_eq!(buf.gutter_width(), 4);
    }

    #[test]
    fn no_gutter_without_line_numbers() {
        let opts = Options {
            line_numbers: false,
            ..Options::default()
        };
        let buf = TextBuffer::new(Document::from_lines(["x"]), 80, 5, &opts).unwrap();
        assert_eq!(buf.gutter_width(), 0);
        assert_eq!(buf.cursor().column(), 0);
    }

    #[test]
    fn scroll_anchor_option_is_used() {
        let opts = Options {
            scroll_anchor: Some(1),
            ..Options::default()
        };
        let lines: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let mut buf = TextBuffer::new(Document::from_lines(&lines), 80, 6, &opts).unwrap();
        buf.update_row(2);
        assert_eq!(buf.viewport().start(), 1);
    }

    // -- Navigation ---------------------------------------------------------

    #[test]
    fn three_line_document_scenario() {
        let mut buf = buffer(&["ab", "c", ""], 2);
        assert_eq!((buf.viewport().start(), buf.viewport().end()), (0, 2));

        buf.update_row(1);
        buf.update_row(1);

        assert_eq!((buf.viewport().start(), buf.viewport().end()), (1, 3));
        assert_eq!(buf.cursor().row(), 2);
        assert_eq!(buf.cursor().column(), buf.gutter_width());
        assert_eq!(window_rows(&buf), vec!["c", ""]);
    }

    #[test]
    fn column_reclamps_on_shorter_line() {
        let mut buf = buffer(&["abcdef", "xy"], 10);
        buf.move_column(5);
        assert_eq!(buf.cursor().text_col(), 5);
        buf.update_row(1);
        assert_eq!(buf.cursor().text_col(), 2);
    }

    #[test]
    fn horizontal_moves_do_not_scroll() {
        let lines: Vec<String> = (0..50).map(|i| format!("line {i}")).collect();
        let mut buf =
            TextBuffer::new(Document::from_lines(&lines), 80, 5, &Options::default()).unwrap();
        buf.update_row(10);
        let before = *buf.viewport();
        buf.move_column(3);
        buf.move_column(-1);
        assert_eq!(*buf.viewport(), before);
    }

    #[test]
    fn apply_routes_motions() {
        let mut buf = buffer(&["abc", "def"], 10);
        buf.apply(Motion::Right);
        buf.apply(Motion::Down);
        assert_eq!((buf.cursor().text_col(), buf.cursor().row()), (1, 1));
        buf.apply(Motion::Left);
        buf.apply(Motion::Up);
        assert_eq!((buf.cursor().text_col(), buf.cursor().row()), (0, 0));
    }

    #[test]
    fn render_position_is_window_relative() {
        let lines: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        let mut buf =
            TextBuffer::new(Document::from_lines(&lines), 80, 4, &Options::default()).unwrap();
        buf.update_row(10);
        let (col, row) = buf.cursor_render_position();
        assert_eq!(col, buf.gutter_width());
        assert_eq!(row, buf.cursor().row() - buf.viewport().start());
        assert_eq!(row, 2);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_between_chars() {
        let mut buf = buffer(&["ac"], 10);
        buf.move_column(1);
        let before = buf.cursor().column();
        assert!(buf.insert('b'));
        assert_eq!(line(&buf, 0), "abc");
        assert_eq!(buf.cursor().column(), before + 1);
    }

    #[test]
    fn insert_multibyte_advances_one_column() {
        let mut buf = buffer(&["caf"], 10);
        buf.move_column(3);
        buf.insert('é');
        buf.insert('!');
        assert_eq!(line(&buf, 0), "café!");
        assert_eq!(buf.cursor().text_col(), 5);
    }

    #[test]
    fn insert_on_empty_document() {
        let mut buf = buffer(&[], 10);
        buf.insert('x');
        assert_eq!(line(&buf, 0), "x");
    }

    #[test]
    fn insert_line_break_is_ignored() {
        let mut buf = buffer(&["ab"], 10);
        assert!(!buf.insert('\n'));
        assert_eq!(buf.document().line_count(), 1);
        assert_eq!(buf.cursor().text_col(), 0);
    }

    #[test]
    fn insert_uses_absolute_row() {
        let lines: Vec<String> = (0..40).map(|_| String::new()).collect();
        let mut buf =
            TextBuffer::new(Document::from_lines(&lines), 80, 6, &Options::default()).unwrap();
        buf.update_row(25);
        assert!(buf.viewport().start() > 0);
        buf.insert('z');
        assert_eq!(line(&buf, 25), "z");
        assert_eq!(line(&buf, 25 - buf.viewport().start()), "");
    }

    #[test]
    fn backspace_at_line_start_is_noop() {
        let mut buf = buffer(&["abc"], 10);
        assert_eq!(buf.remove_rune(), None);
        assert_eq!(line(&buf, 0), "abc");
        assert_eq!(buf.cursor().column(), buf.gutter_width());
        assert!(!buf.document().is_modified());
    }

    #[test]
    fn backspace_never_joins_lines() {
        let mut buf = buffer(&["ab", "cd"], 10);
        buf.update_row(1);
        assert_eq!(buf.remove_rune(), None);
        assert_eq!(buf.document().line_count(), 2);
    }

    #[test]
    fn backspace_removes_previous_char() {
        let mut buf = buffer(&["abc"], 10);
        buf.move_column(2);
        assert_eq!(buf.remove_rune(), Some('b'));
        assert_eq!(line(&buf, 0), "ac");
        assert_eq!(buf.cursor().text_col(), 1);
    }

    #[test]
    fn insert_then_backspace_restores() {
        let mut buf = buffer(&["hello"], 10);
        buf.move_column(2);
        let column = buf.cursor().column();
        buf.insert('X');
        buf.remove_rune();
        assert_eq!(line(&buf, 0), "hello");
        assert_eq!(buf.cursor().column(), column);
    }

    #[test]
    fn editing_does_not_scroll() {
        let lines: Vec<String> = (0..40).map(|i| i.to_string()).collect();
        let mut buf =
            TextBuffer::new(Document::from_lines(&lines), 80, 6, &Options::default()).unwrap();
        buf.update_row(20);
        let before = *buf.viewport();
        buf.insert('a');
        buf.remove_rune();
        assert_eq!(*buf.viewport(), before);
    }

    // -- Resize -------------------------------------------------------------

    #[test]
    fn resize_keeps_cursor_visible() {
        let lines: Vec<String> = (0..40).map(|i| i.to_string()).collect();
        let mut buf =
            TextBuffer::new(Document::from_lines(&lines), 80, 20, &Options::default()).unwrap();
        buf.update_row(18);
        buf.resize(100, 3).unwrap();
        assert!(buf.viewport().contains(buf.cursor().row()));
        assert_eq!(buf.width(), 100);
    }

    #[test]
    fn resize_rejects_zero() {
        let mut buf = buffer(&["a"], 10);
        assert!(buf.resize(0, 5).is_err());
        assert_eq!(buf.width(), 80);
    }

    #[test]
    fn named_buffer() {
        let buf = buffer(&["a"], 10).with_name("notes.txt");
        assert_eq!(buf.name(), Some("notes.txt"));
    }
}
