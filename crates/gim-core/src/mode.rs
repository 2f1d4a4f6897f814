//! Modal editing.
//!
//! The session is always in exactly one [`Mode`]:
//!
//! | Mode   | Cursor shape | Keys mean                      |
//! |--------|--------------|--------------------------------|
//! | Normal | Block        | navigation, `i` enters Insert  |
//! | Insert | Bar          | text entry, Esc returns        |
//!
//! Program exit is not a mode. It is a separate control signal handled by
//! the session before mode dispatch.

use std::fmt;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
///
/// Pure data: which keys do what lives in
/// [`EditorSession::handle`](crate::session::EditorSession::handle).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Default mode. Keys navigate, they never change text.
    #[default]
    Normal,
    /// Text entry mode. Character keys are inserted into the buffer.
    Insert,
}

impl Mode {
    /// Human-readable name for a status display.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
        }
    }

    /// The terminal cursor shape this mode asks the renderer for.
    ///
    /// A rendering hint only; it is not buffer state.
    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Normal => CursorShape::SteadyBlock,
            Self::Insert => CursorShape::SteadyBar,
        }
    }

    /// True if character keys edit text in this mode.
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Insert)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// CursorShape
// ---------------------------------------------------------------------------

/// Cursor shape for terminal display.
///
/// Kept here so gim-core doesn't depend on gim-term. The binary maps this to
/// the terminal's own escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShape {
    /// `█` — solid block cursor.
    SteadyBlock,
    /// `▏` — thin vertical bar.
    SteadyBar,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display_names() {
        assert_eq!(Mode::Normal.display_name(), "NORMAL");
        assert_eq!(Mode::Insert.display_name(), "INSERT");
        assert_eq!(format!("{}", Mode::Insert), "INSERT");
    }

    #[test]
    fn cursor_shapes() {
        assert_eq!(Mode::Normal.cursor_shape(), CursorShape::SteadyBlock);
        assert_eq!(Mode::Insert.cursor_shape(), CursorShape::SteadyBar);
    }

    #[test]
    fn only_insert_takes_input() {
        assert!(Mode::Insert.is_input());
        assert!(!Mode::Normal.is_input());
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }
}
