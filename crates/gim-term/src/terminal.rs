// SPDX-License-Identifier: MIT
//
// Terminal setup for gim: raw stdin, the alternate screen, and a restore
// that runs on every way out.
#![allow(unsafe_code)]
//
// `Terminal::enter` takes a `RawMode` guard and switches screens. `leave`
// (or drop) writes `write_restore` and lets the guard put termios back.
//
// A panic hook writes the same restore bytes straight to fd 1, since the
// panic may have fired while the stdout lock was held, then reapplies the
// saved termios before the previous hook prints the message.

use std::io::{self, Write};
use std::sync::Once;

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when the OS can't tell us (pipes, tests).
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// Terminal size from `TIOCGWINSZ`, or `None` when stdout isn't a terminal.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } == 0;
    (ok && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// Termios of the live `RawMode`, for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: std::sync::Mutex<Option<libc::termios>> = std::sync::Mutex::new(None);

#[cfg(unix)]
fn saved_termios() -> std::sync::MutexGuard<'static, Option<libc::termios>> {
    SAVED_TERMIOS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(unix)]
fn set_termios(termios: &libc::termios, action: libc::c_int) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, action, termios) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Stdin is raw while this lives.
#[cfg(unix)]
struct RawMode {
    original: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// `None` when stdin isn't a terminal; there is nothing to switch.
    fn enable() -> io::Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }

        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let original = termios;

        // Clears ISIG too: Ctrl-C reaches the parser as a byte.
        unsafe { libc::cfmakeraw(&raw mut termios) };
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        set_termios(&termios, libc::TCSAFLUSH)?;

        *saved_termios() = Some(original);
        Ok(Some(Self { original }))
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = set_termios(&self.original, libc::TCSAFLUSH);
        *saved_termios() = None;
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    fn enable() -> io::Result<Option<Self>> {
        Ok(Some(Self))
    }
}

// ─── Restore ────────────────────────────────────────────────────────────────

/// Undo everything `enter` and painting may have left on screen. The
/// alternate screen exit goes last so the shell comes back clean.
fn write_restore(w: &mut impl Write) -> io::Result<()> {
    ansi::end_sync(w)?;
    ansi::reset(w)?;
    ansi::set_cursor_shape(w, ansi::CursorShape::Default)?;
    ansi::cursor_show(w)?;
    ansi::exit_alt_screen(w)
}

fn install_panic_hook() {
    static INSTALLED: Once = Once::new();

    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let mut bytes = Vec::with_capacity(32);
            let _ = write_restore(&mut bytes);
            write_stdout_fd(&bytes);
            restore_saved_termios();
            previous(info);
        }));
    });
}

/// Write to fd 1 without taking the stdout lock.
#[cfg(unix)]
fn write_stdout_fd(bytes: &[u8]) {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            bytes.as_ptr().cast::<libc::c_void>(),
            bytes.len(),
        );
    }
}

#[cfg(not(unix))]
fn write_stdout_fd(bytes: &[u8]) {
    let _ = io::stdout().write_all(bytes);
    let _ = io::stdout().flush();
}

#[cfg(unix)]
fn restore_saved_termios() {
    let saved = *saved_termios();
    if let Some(original) = saved {
        let _ = set_termios(&original, libc::TCSANOW);
    }
}

#[cfg(not(unix))]
fn restore_saved_termios() {}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// The editor's hold on the terminal.
///
/// ```no_run
/// use gim_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... paint frames, read keys ...
/// // Restored on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    size: Size,
    /// Set between `enter` and `leave`; `None` inside when stdin isn't a tty.
    raw: Option<Option<RawMode>>,
}

impl Terminal {
    /// Query the size, falling back to 80×24. Leaves the terminal alone.
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: get_size().unwrap_or(Size::FALLBACK),
            raw: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size after SIGWINCH. Keeps the old size if the query
    /// fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.raw.is_some()
    }

    /// Raw mode, alternate screen, hidden cursor, cleared screen. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or terminal output fails. Raw mode is
    /// undone again when the screen setup fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.is_active() {
            return Ok(());
        }
        install_panic_hook();
        let raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        out.flush()?;

        self.raw = Some(raw);
        Ok(())
    }

    /// Put the screen and termios back. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output fails; termios is restored
    /// regardless.
    pub fn leave(&mut self) -> io::Result<()> {
        let Some(raw) = self.raw.take() else {
            return Ok(());
        };
        let mut out = io::stdout().lock();
        let written = write_restore(&mut out).and_then(|()| out.flush());
        drop(out);
        drop(raw);
        written
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
