// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — stdin bytes in, frames out.
//
// Bytes flow in from the background reader, the parser turns them into key
// events, the application handles each one, and when anything changed the
// application paints a full frame into an `OutputBuffer` that reaches the
// terminal in one write inside a synchronized-output bracket.
//
// # Timing
//
// The loop blocks on the reader channel with a short timeout. Keys are
// handled the moment they arrive; when nothing arrives the thread sleeps.
// The timeout doubles as the escape-sequence timeout: if a lone ESC is still
// pending when it fires, the parser flushes it as the Escape key.
//
// # SIGWINCH
//
// A signal handler sets an `AtomicBool`. The loop checks it every iteration,
// re-queries the size and tells the application before repainting.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::ansi::{self, CursorShape};
use crate::input::{Event, Parser};
use crate::output::OutputBuffer;
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler, cleared by the loop.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install a SIGWINCH handler that only stores to an atomic, which is
/// async-signal-safe.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the loop after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the loop and restore the terminal.
    Quit,
}

/// An application driven by [`EventLoop`].
///
/// Per iteration the loop calls [`on_event`](App::on_event) for each parsed
/// event, [`on_resize`](App::on_resize) if the terminal changed size, then
/// [`paint`](App::paint) and [`cursor`](App::cursor) if anything happened.
pub trait App {
    /// Handle one input event. Return [`Action::Quit`] to exit.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal is now `size`.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint a full frame into `out`.
    ///
    /// The screen is not cleared first; every row should be painted or
    /// cleared by the application.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    fn paint(&mut self, out: &mut OutputBuffer, size: Size) -> io::Result<()>;

    /// Where to show the hardware cursor after painting, or `None` to hide it.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// How long to wait for input before flushing a pending ESC
    /// (microseconds). Default: 8333 μs.
    pub escape_timeout_us: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            escape_timeout_us: 8333,
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal, the parser and the output buffer.
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use gim_term::event_loop::{Action, App, EventLoop};
/// use gim_term::input::Event;
/// use gim_term::output::OutputBuffer;
/// use gim_term::terminal::Size;
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_event(&mut self, event: &Event) -> Action {
///         let Event::Key(key) = event;
///         if key.is_interrupt() { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, out: &mut OutputBuffer, _size: Size) -> io::Result<()> {
///         out.push_str("press Ctrl-C");
///         Ok(())
///     }
/// }
///
/// EventLoop::new().run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    out: OutputBuffer,
    config: LoopConfig,
}

impl EventLoop {
    /// Create an event loop with default timing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    /// Create an event loop with custom timing.
    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            out: OutputBuffer::new(),
            config,
        }
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the application returns [`Action::Quit`] or stdin closes.
    ///
    /// Enters raw mode and the alternate screen first, and restores the
    /// terminal on the way out even if the loop failed.
    ///
    /// # Errors
    ///
    /// Returns an error if entering or leaving the terminal, spawning the
    /// reader, or writing a frame fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = match StdinReader::spawn() {
            Ok((mut reader, rx)) => {
                let result = self.run_inner(app, &rx);
                reader.stop();
                result
            }
            Err(err) => Err(err),
        };

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let timeout = Duration::from_micros(self.config.escape_timeout_us);
        let mut dirty = true;

        loop {
            // ── Input ────────────────────────────────────────────
            let events = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => {
                    self.parser.flush()
                }
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            };
            for event in &events {
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
            }
            dirty |= !events.is_empty();

            // ── Resize ───────────────────────────────────────────
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                app.on_resize(self.terminal.refresh_size());
                dirty = true;
            }

            // ── Paint ────────────────────────────────────────────
            if dirty {
                self.paint(app)?;
                dirty = false;
            }
        }
    }

    fn paint(&mut self, app: &mut impl App) -> io::Result<()> {
        let out = &mut self.out;
        out.clear();
        ansi::begin_sync(out)?;
        ansi::cursor_hide(out)?;
        app.paint(out, self.terminal.size())?;
        if let Some((x, y, shape)) = app.cursor() {
            ansi::cursor_to(out, x, y)?;
            ansi::set_cursor_shape(out, shape)?;
            ansi::cursor_show(out)?;
        }
        ansi::end_sync(out)?;
        out.flush_stdout()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
