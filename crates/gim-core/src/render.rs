//! Render model — what the screen should show, independent of any terminal.
//!
//! [`Frame::build`] turns a [`TextBuffer`] into rows of [`Glyph`]s plus a
//! right-aligned line-number label per row, and computes where the terminal
//! cursor goes. The binary paints a frame with gim-term; tests inspect it
//! directly.
//!
//! ```text
//!  TextBuffer          Frame
//! ┌──────────┐     ┌──────────────┐
//! │ window   │──▶  │  9 fn main() │  label + glyphs
//! │ cursor   │     │ 10   ▏       │  cursor (col, row)
//! │ gutter   │     │ 11 }         │
//! └──────────┘     └──────────────┘
//! ```
//!
//! Cursor columns are char offsets in the core. On screen a wide character
//! (CJK, most emoji) takes two cells, so the frame's cursor column is the
//! gutter plus the *display* width of the characters before the cursor.

use unicode_width::UnicodeWidthChar;

use crate::buffer::TextBuffer;
use crate::document::Line;
use crate::mode::{CursorShape, Mode};
use crate::options::Options;

/// Shown in place of a space when `list` is set.
pub const SPACE_GLYPH: char = '·';

/// Shown in place of a tab when `list` is set.
pub const TAB_GLYPH: char = '→';

/// Shown in place of a control character.
pub const CONTROL_GLYPH: char = '?';

// ---------------------------------------------------------------------------
// Gutter helpers
// ---------------------------------------------------------------------------

/// Number of decimal digits in `n` (`digit_count(0) == 1`).
#[must_use]
pub const fn digit_count(n: usize) -> usize {
    match n.checked_ilog10() {
        Some(log) => log as usize + 1,
        None => 1,
    }
}

/// Width of the line-number labels for a document of `line_count` lines.
#[must_use]
pub const fn number_width(line_count: usize) -> usize {
    digit_count(if line_count == 0 { 1 } else { line_count })
}

/// Total gutter width: the labels plus one separator column.
///
/// | Lines   | Digits | Gutter |
/// |---------|--------|--------|
/// | 1–9     | 1      | 2      |
/// | 10–99   | 2      | 3      |
/// | 100–999 | 3      | 4      |
///
/// Returns 0 when `line_numbers` is false.
#[must_use]
pub const fn gutter_width(line_count: usize, line_numbers: bool) -> usize {
    if line_numbers {
        number_width(line_count) + 1
    } else {
        0
    }
}

/// The 1-based label for window row `row_index`, right-aligned to `width`.
#[must_use]
pub fn line_label(row_index: usize, window_start: usize, width: usize) -> String {
    format!("{:>width$}", row_index + window_start + 1)
}

// ---------------------------------------------------------------------------
// Glyphs
// ---------------------------------------------------------------------------

/// One painted character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    /// Paint dimmed (whitespace markers).
    pub dim: bool,
}

impl Glyph {
    const fn plain(ch: char) -> Self {
        Self { ch, dim: false }
    }

    /// Terminal cells this glyph occupies. Combining marks take none.
    #[must_use]
    pub fn width(self) -> usize {
        self.ch.width().unwrap_or(1)
    }
}

/// Map one source char to what gets painted.
#[must_use]
pub fn glyph_for(ch: char, show_whitespace: bool) -> Glyph {
    match ch {
        ' ' if show_whitespace => Glyph {
            ch: SPACE_GLYPH,
            dim: true,
        },
        '\t' if show_whitespace => Glyph {
            ch: TAB_GLYPH,
            dim: true,
        },
        '\t' => Glyph::plain(' '),
        c if c.is_control() => Glyph::plain(CONTROL_GLYPH),
        c => Glyph::plain(c),
    }
}

/// Display width of the first `upto` chars of `line`.
#[must_use]
pub fn display_width(line: Line<'_>, upto: usize, show_whitespace: bool) -> usize {
    line.chars()
        .take(upto)
        .map(|ch| glyph_for(ch, show_whitespace).width())
        .sum()
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One screen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRow {
    /// Right-aligned line number; empty when the gutter is off.
    pub label: String,
    pub glyphs: Vec<Glyph>,
}

impl FrameRow {
    /// The glyph chars as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }
}

/// Everything needed to paint one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub gutter_width: usize,
    pub rows: Vec<FrameRow>,
    /// `(column, row)` in screen cells, row relative to the window.
    pub cursor: (usize, usize),
    pub cursor_shape: CursorShape,
    pub mode: Mode,
}

impl Frame {
    /// Build the frame for `buf` in `mode`.
    ///
    /// Rows are clipped to the buffer's width; there is no horizontal
    /// scrolling.
    #[must_use]
    pub fn build(buf: &TextBuffer, mode: Mode, options: &Options) -> Self {
        let gutter = buf.gutter_width();
        let number_width = gutter.saturating_sub(1);
        let text_width = buf.width().saturating_sub(gutter);
        let start = buf.viewport().start();
        let list = options.show_whitespace;

        let rows = buf
            .window()
            .enumerate()
            .map(|(i, line)| FrameRow {
                label: if gutter == 0 {
                    String::new()
                } else {
                    line_label(i, start, number_width)
                },
                glyphs: clip(line.chars().map(|ch| glyph_for(ch, list)), text_width),
            })
            .collect();

        let (_, cursor_row) = buf.cursor_render_position();
        let cursor_col = gutter
            + buf
                .current_line()
                .map_or(0, |line| display_width(line, buf.cursor().text_col(), list));

        Self {
            gutter_width: gutter,
            rows,
            cursor: (cursor_col, cursor_row),
            cursor_shape: mode.cursor_shape(),
            mode,
        }
    }
}

/// Collect glyphs until they'd overflow `width` cells.
fn clip(glyphs: impl Iterator<Item = Glyph>, width: usize) -> Vec<Glyph> {
    let mut used = 0;
    glyphs
        .take_while(|g| {
            used += g.width();
            used <= width
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
