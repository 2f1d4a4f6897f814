//! Document — the full text being edited.
//!
//! A `Document` wraps a [`ropey::Rope`] holding every line joined by `\n`.
//! Lines are handed out as [`Line`] slices with their terminator removed,
//! so callers never see line breaks.
//!
//! # Design choices
//!
//! - **ropey** gives char-indexed access to every line, so a multi-byte
//!   character occupies exactly one column. Byte offsets never leak into
//!   the public API.
//!
//! - **Only `\n` separates lines.** The rope is built without ropey's
//!   `unicode_lines`/`cr_lines` features, so a stray `\r` or U+2028 inside a
//!   line is just a character. Line splitting of raw file text happens once,
//!   in [`Document::from_text`].
//!
//! - **Never empty.** A document always has at least one line. An empty
//!   input yields a single empty line, which keeps cursor arithmetic free of
//!   special cases.
//!
//! - **Single-line edits only.** The core inserts and removes characters
//!   inside a line; it never creates or joins lines.

use std::fmt;
use std::ops::Range;

use ropey::{Rope, RopeSlice};

/// One line of a document, without its terminator. Indexed by char.
pub type Line<'a> = RopeSlice<'a>;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An ordered sequence of lines backed by a rope.
///
/// Owned by exactly one [`TextBuffer`](crate::buffer::TextBuffer).
pub struct Document {
    rope: Rope,
    modified: bool,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// Create a document holding a single empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            modified: false,
        }
    }

    /// Build a document from lines that have already been split.
    ///
    /// Zero lines produce a document with one empty line. A line that still
    /// contains `\n` is split there.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(line.as_ref());
        }
        Self {
            rope: Rope::from_str(&text),
            modified: false,
        }
    }

    /// Build a document from raw decoded text.
    ///
    /// Splits on `\n`, `\r\n` and lone `\r`. A trailing line break yields a
    /// trailing empty line, the same as splitting on the separator.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_breaks(text)),
            modified: false,
        }
    }

    // -- Line access --------------------------------------------------------

    /// Number of lines. Always at least 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// The line at `row`, without its terminator. `None` past the end.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<Line<'_>> {
        let len = self.line_len(row)?;
        Some(self.rope.line(row).slice(..len))
    }

    /// Number of chars on `row`, excluding the terminator.
    #[must_use]
    pub fn line_len(&self, row: usize) -> Option<usize> {
        if row >= self.rope.len_lines() {
            return None;
        }
        let total = self.rope.line(row).len_chars();
        // Every line but the last carries exactly one `\n`.
        if row + 1 < self.rope.len_lines() {
            Some(total - 1)
        } else {
            Some(total)
        }
    }

    /// The char at `(row, col)`, if it exists.
    #[must_use]
    pub fn char_at(&self, row: usize, col: usize) -> Option<char> {
        let line = self.line(row)?;
        (col < line.len_chars()).then(|| line.char(col))
    }

    /// Lazily iterate the lines in `rows`, clipped to the document.
    #[must_use]
    pub fn lines(&self, rows: Range<usize>) -> Lines<'_> {
        let end = rows.end.min(self.line_count());
        let start = rows.start.min(end);
        Lines {
            doc: self,
            rows: start..end,
        }
    }

    /// Every line as an owned `String`.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        self.lines(0..self.line_count())
            .map(|line| line.to_string())
            .collect()
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` at char offset `col` of `row`.
    ///
    /// Returns `false` and leaves the document untouched when the position
    /// is outside `[0, line_len]` or `ch` is a line break.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) -> bool {
        if is_line_break(ch) {
            return false;
        }
        let Some(len) = self.line_len(row) else {
            return false;
        };
        if col > len {
            return false;
        }
        let idx = self.rope.line_to_char(row) + col;
        self.rope.insert_char(idx, ch);
        self.modified = true;
        true
    }

    /// Remove the char at offset `col` of `row` and return it.
    ///
    /// Never removes a line terminator; returns `None` when `col` is not a
    /// character of the line.
    pub fn remove_char(&mut self, row: usize, col: usize) -> Option<char> {
        let ch = self.char_at(row, col)?;
        let idx = self.rope.line_to_char(row) + col;
        self.rope.remove(idx..=idx);
        self.modified = true;
        Some(ch)
    }

    // -- Metadata -----------------------------------------------------------

    /// True once any edit has been applied.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.line_count())
            .field("chars", &self.rope.len_chars())
            .field("modified", &self.modified)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Lines iterator
// ---------------------------------------------------------------------------

/// Lazy iterator over a contiguous run of document lines.
///
/// Cheap to clone, so a caller can walk the same window more than once.
#[derive(Clone)]
pub struct Lines<'a> {
    doc: &'a Document,
    rows: Range<usize>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        self.doc.line(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl DoubleEndedIterator for Lines<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let row = self.rows.next_back()?;
        self.doc.line(row)
    }
}

impl ExactSizeIterator for Lines<'_> {}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// True for the characters a file splitter treats as line separators.
#[inline]
#[must_use]
pub const fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r')
}

/// Rewrite `\r\n` and lone `\r` as `\n`.
fn normalize_line_breaks(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\r' {
            result.push('\n');
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line_string(doc: &Document, row: usize) -> String {
        doc.line(row).unwrap().to_string()
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_document_has_one_empty_line() {
        let doc = Document::new();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.line_len(0), Some(0));
        assert!(!doc.is_modified());
    }

    #[test]
    fn from_no_lines_is_one_empty_line() {
        let doc = Document::from_lines(Vec::<String>::new());
        assert_eq!(doc.line_count(), 1);
        assert_eq!(line_string(&doc, 0), "");
    }

    #[test]
    fn from_lines_keeps_each_line() {
        let doc = Document::from_lines(["ab", "c", ""]);
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.to_lines(), vec!["ab", "c", ""]);
    }

    #[test]
    fn from_text_splits_every_break_style() {
        let doc = Document::from_text("one\r\ntwo\rthree\nfour");
        assert_eq!(doc.to_lines(), vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn from_text_trailing_newline_yields_empty_line() {
        let doc = Document::from_text("ab\nc\n");
        assert_eq!(doc.to_lines(), vec!["ab", "c", ""]);
    }

    #[test]
    fn from_empty_text_is_one_empty_line() {
        let doc = Document::from_text("");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.line_len(0), Some(0));
    }

    // -- Line access --------------------------------------------------------

    #[test]
    fn line_excludes_terminator() {
        let doc = Document::from_lines(["hello", "world"]);
        assert_eq!(line_string(&doc, 0), "hello");
        assert_eq!(doc.line_len(0), Some(5));
        assert_eq!(doc.line_len(1), Some(5));
    }

    #[test]
    fn line_out_of_bounds() {
        let doc = Document::from_lines(["x"]);
        assert!(doc.line(1).is_none());
        assert_eq!(doc.line_len(7), None);
    }

    #[test]
    fn multibyte_chars_take_one_column() {
        let doc = Document::from_lines(["café", "你好", "👋🌍"]);
        assert_eq!(doc.line_len(0), Some(4));
        assert_eq!(doc.line_len(1), Some(2));
        assert_eq!(doc.line_len(2), Some(2));
        assert_eq!(doc.char_at(0, 3), Some('é'));
        assert_eq!(doc.char_at(2, 1), Some('🌍'));
    }

    #[test]
    fn carriage_return_inside_line_is_a_char() {
        let doc = Document::from_lines(["a\rb"]);
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.line_len(0), Some(3));
    }

    #[test]
    fn lines_iterator_is_restartable() {
        let doc = Document::from_lines(["a", "b", "c", "d"]);
        let window = doc.lines(1..3);
        let first: Vec<String> = window.clone().map(|l| l.to_string()).collect();
        let second: Vec<String> = window.map(|l| l.to_string()).collect();
        assert_eq!(first, vec!["b", "c"]);
        assert_eq!(first, second);
    }

    #[test]
    fn lines_iterator_clips_to_document() {
        let doc = Document::from_lines(["a", "b"]);
        assert_eq!(doc.lines(1..10).len(), 1);
        assert_eq!(doc.lines(5..10).count(), 0);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_char_in_middle() {
        let mut doc = Document::from_lines(["ac"]);
        assert!(doc.insert_char(0, 1, 'b'));
        assert_eq!(line_string(&doc, 0), "abc");
        assert!(doc.is_modified());
    }

    #[test]
    fn insert_char_at_line_end() {
        let mut doc = Document::from_lines(["ab", "cd"]);
        assert!(doc.insert_char(0, 2, '!'));
        assert_eq!(doc.to_lines(), vec!["ab!", "cd"]);
    }

    #[test]
    fn insert_char_past_end_is_rejected() {
        let mut doc = Document::from_lines(["ab"]);
        assert!(!doc.insert_char(0, 3, 'x'));
        assert!(!doc.insert_char(1, 0, 'x'));
        assert!(!doc.is_modified());
    }

    #[test]
    fn insert_line_break_is_rejected() {
        let mut doc = Document::from_lines(["ab"]);
        assert!(!doc.insert_char(0, 1, '\n'));
        assert!(!doc.insert_char(0, 1, '\r'));
        assert_eq!(doc.line_count(), 1);
    }

    #[test]
    fn insert_multibyte_on_second_line() {
        let mut doc = Document::from_lines(["x", "caf"]);
        assert!(doc.insert_char(1, 3, 'é'));
        assert_eq!(line_string(&doc, 1), "café");
    }

    #[test]
    fn remove_char_returns_removed() {
        let mut doc = Document::from_lines(["abc", "d"]);
        assert_eq!(doc.remove_char(0, 1), Some('b'));
        assert_eq!(doc.to_lines(), vec!["ac", "d"]);
    }

    #[test]
    fn remove_char_never_joins_lines() {
        let mut doc = Document::from_lines(["ab", "cd"]);
        assert_eq!(doc.remove_char(0, 2), None);
        assert_eq!(doc.line_count(), 2);
        assert!(!doc.is_modified());
    }

    // -- Debug format -------------------------------------------------------

    #[test]
    fn debug_format() {
        let doc = Document::from_lines(["hello", "world"]);
        let debug = format!("{doc:?}");
        assert!(debug.contains("lines: 2"));
        assert!(debug.contains("chars: 11"));
    }
}
