//! Editor session — the mode machine and the open buffers.
//!
//! An `EditorSession` owns every [`TextBuffer`] and the current [`Mode`]. The
//! terminal loop feeds it one [`Input`] at a time through
//! [`handle`](EditorSession::handle) and stops when it answers
//! [`Outcome::Quit`].
//!
//! # Dispatch
//!
//! | Mode   | Input                    | Effect                       |
//! |--------|--------------------------|------------------------------|
//! | any    | Ctrl-C                   | quit                         |
//! | any    | resize                   | resize every buffer          |
//! | Normal | arrows, `h j k l`        | move                         |
//! | Normal | `i`                      | enter Insert                 |
//! | Normal | `Z Q`                    | quit                         |
//! | Insert | printable char or tab    | insert before cursor         |
//! | Insert | Backspace                | delete before cursor         |
//! | Insert | arrows                   | move                         |
//! | Insert | Esc                      | back to Normal               |
//!
//! Anything else is ignored. The mode only changes on `i` and Esc.
//!
//! # Diagnostics
//!
//! The session logs through a [`tracing::Dispatch`] handed to it with
//! [`with_diagnostics`](EditorSession::with_diagnostics). Without one it
//! logs nowhere. Nothing is installed globally, so two sessions (or two
//! tests) never share a sink.

use tracing::{debug, info, Dispatch};

use crate::buffer::TextBuffer;
use crate::error::Result;
use crate::input::{Input, Key, Motion};
use crate::mode::Mode;

/// What the session did with an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The input changed something or was consumed.
    Handled,
    /// The input means nothing in the current mode.
    Ignored,
    /// The program should exit.
    Quit,
}

/// The editor's top-level state.
pub struct EditorSession {
    buffers: Vec<TextBuffer>,
    focused: usize,
    mode: Mode,
    /// `Z` typed in Normal mode, waiting for `Q`.
    pending_z: bool,
    diagnostics: Dispatch,
}

impl EditorSession {
    /// Start a session editing `buffer`, in Normal mode.
    #[must_use]
    pub fn new(buffer: TextBuffer) -> Self {
        Self {
            buffers: vec![buffer],
            focused: 0,
            mode: Mode::Normal,
            pending_z: false,
            diagnostics: Dispatch::none(),
        }
    }

    /// Send diagnostics to `dispatch`.
    #[must_use]
    pub fn with_diagnostics(mut self, dispatch: Dispatch) -> Self {
        self.diagnostics = dispatch;
        self
    }

    // -- Accessors ----------------------------------------------------------

    /// Current mode.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The buffer receiving input.
    #[must_use]
    pub fn focused(&self) -> &TextBuffer {
        &self.buffers[self.focused]
    }

    /// The buffer receiving input, mutably.
    #[must_use]
    pub fn focused_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffers[self.focused]
    }

    /// Index of the focused buffer.
    #[inline]
    #[must_use]
    pub const fn focused_index(&self) -> usize {
        self.focused
    }

    /// All open buffers, in opening order.
    #[must_use]
    pub fn buffers(&self) -> &[TextBuffer] {
        &self.buffers
    }

    // -- Buffer list --------------------------------------------------------

    /// Add a buffer and focus it. Returns its index.
    pub fn open(&mut self, buffer: TextBuffer) -> usize {
        self.buffers.push(buffer);
        self.focused = self.buffers.len() - 1;
        self.log(|| debug!(index = self.focused, "buffer opened"));
        self.focused
    }

    /// Focus buffer `index`. Returns `false` if there is no such buffer.
    pub fn focus(&mut self, index: usize) -> bool {
        if index >= self.buffers.len() {
            return false;
        }
        self.focused = index;
        true
    }

    /// Focus the next buffer, wrapping around.
    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.buffers.len();
    }

    /// Focus the previous buffer, wrapping around.
    pub fn focus_prev(&mut self) {
        self.focused = self
            .focused
            .checked_sub(1)
            .unwrap_or(self.buffers.len() - 1);
    }

    /// Close the focused buffer. The last buffer can't be closed; returns
    /// `false` in that case.
    pub fn close_focused(&mut self) -> bool {
        if self.buffers.len() == 1 {
            return false;
        }
        self.buffers.remove(self.focused);
        if self.focused == self.buffers.len() {
            self.focused -= 1;
        }
        self.log(|| debug!(focused = self.focused, "buffer closed"));
        true
    }

    // -- Input --------------------------------------------------------------

    /// Apply one input.
    ///
    /// Everything the input touches (buffer edits, scrolling) logs to this
    /// session's dispatcher.
    pub fn handle(&mut self, input: Input) -> Outcome {
        let diagnostics = self.diagnostics.clone();
        tracing::dispatcher::with_default(&diagnostics, || self.dispatch(input))
    }

    fn dispatch(&mut self, input: Input) -> Outcome {
        let pending_z = std::mem::take(&mut self.pending_z);

        match (self.mode, input) {
            (_, Input::Key(Key::Interrupt)) => {
                info!("interrupted");
                Outcome::Quit
            }
            (_, Input::Resize { width, height }) => match self.resize(width, height) {
                Ok(()) => Outcome::Handled,
                Err(err) => {
                    debug!(%err, "resize ignored");
                    Outcome::Ignored
                }
            },

            // Normal
            (Mode::Normal, Input::Char('Q')) if pending_z => {
                info!("quit");
                Outcome::Quit
            }
            (Mode::Normal, Input::Char('Z')) => {
                self.pending_z = true;
                Outcome::Handled
            }
            (Mode::Normal, Input::Char('i')) => self.set_mode(Mode::Insert),
            (Mode::Normal, Input::Char(ch)) => match Motion::from_mnemonic(ch) {
                Some(motion) => self.motion(motion),
                None => Outcome::Ignored,
            },

            // Insert
            (Mode::Insert, Input::Key(Key::Escape)) => self.set_mode(Mode::Normal),
            (Mode::Insert, Input::Key(Key::Backspace)) => {
                self.focused_mut().remove_rune();
                Outcome::Handled
            }
            (Mode::Insert, Input::Char(ch)) if is_text(ch) => {
                if self.focused_mut().insert(ch) {
                    Outcome::Handled
                } else {
                    Outcome::Ignored
                }
            }

            // Arrows work in both modes.
            (_, Input::Key(key)) => match Motion::from_key(key) {
                Some(motion) => self.motion(motion),
                None => {
                    debug!(%key, mode = %self.mode, "key ignored");
                    Outcome::Ignored
                }
            },
            (Mode::Insert, Input::Char(_)) => Outcome::Ignored,
        }
    }

    fn motion(&mut self, motion: Motion) -> Outcome {
        self.focused_mut().apply(motion);
        Outcome::Handled
    }

    fn set_mode(&mut self, mode: Mode) -> Outcome {
        debug!(from = %self.mode, to = %mode, "mode change");
        self.mode = mode;
        Outcome::Handled
    }

    /// Resize every buffer. Stops at the first failure, which can only be a
    /// zero dimension and so fails for the first buffer.
    fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        for buf in &mut self.buffers {
            buf.resize(width, height)?;
        }
        Ok(())
    }

    /// Run `f` with this session's dispatcher as the default.
    fn log(&self, f: impl FnOnce()) {
        tracing::dispatcher::with_default(&self.diagnostics, f);
    }
}

/// Characters Insert mode puts into the document: anything printable, and tab.
fn is_text(ch: char) -> bool {
    ch == '\t' || !ch.is_control()
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("mode", &self.mode)
            .field("focused", &self.focused)
            .field("buffers", &self.buffers.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
