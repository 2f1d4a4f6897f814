//! Decoded input events.
//!
//! The terminal collaborator turns raw bytes into [`Input`] values, one per
//! keypress. The core never sees escape sequences.
//!
//! Navigation has two encodings, the arrow keys and the `h j k l`
//! mnemonics. Both resolve to the same [`Motion`], so there is exactly one
//! code path per direction.

use std::fmt;

/// A named (non-character) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Backspace,
    Escape,
    Enter,
    /// Ctrl-C. Ends the program from any mode.
    Interrupt,
}

impl Key {
    /// The key's lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Backspace => "backspace",
            Self::Escape => "escape",
            Self::Enter => "enter",
            Self::Interrupt => "interrupt",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    /// A raw character, exactly as typed.
    Char(char),
    /// A named key.
    Key(Key),
    /// The terminal changed size.
    Resize { width: usize, height: usize },
}

impl From<Key> for Input {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<char> for Input {
    fn from(ch: char) -> Self {
        Self::Char(ch)
    }
}

/// A one-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
}

impl Motion {
    /// The motion an arrow key stands for.
    #[must_use]
    pub const fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Up => Some(Self::Up),
            Key::Down => Some(Self::Down),
            Key::Left => Some(Self::Left),
            Key::Right => Some(Self::Right),
            _ => None,
        }
    }

    /// The motion a Normal-mode mnemonic stands for (`h j k l`).
    #[must_use]
    pub const fn from_mnemonic(ch: char) -> Option<Self> {
        match ch {
            'k' => Some(Self::Up),
            'j' => Some(Self::Down),
            'h' => Some(Self::Left),
            'l' => Some(Self::Right),
            _ => None,
        }
    }

    /// `(column delta, row delta)` for this motion.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_mnemonics_agree() {
        let pairs = [
            (Key::Up, 'k'),
            (Key::Down, 'j'),
            (Key::Left, 'h'),
            (Key::Right, 'l'),
        ];
        for (key, ch) in pairs {
            assert_eq!(Motion::from_key(key), Motion::from_mnemonic(ch), "{key} vs {ch}");
            assert!(Motion::from_key(key).is_some());
        }
    }

    #[test]
    fn non_motion_keys() {
        assert_eq!(Motion::from_key(Key::Backspace), None);
        assert_eq!(Motion::from_key(Key::Interrupt), None);
        assert_eq!(Motion::from_mnemonic('x'), None);
        assert_eq!(Motion::from_mnemonic('K'), None);
    }

    #[test]
    fn key_display_names() {
        assert_eq!(Key::Backspace.to_string(), "backspace");
        assert_eq!(Key::Interrupt.to_string(), "interrupt");
    }

    #[test]
    fn deltas() {
        assert_eq!(Motion::Up.delta(), (0, -1));
        assert_eq!(Motion::Right.delta(), (1, 0));
    }
}
