// SPDX-License-Identifier: MIT
//
// Output buffering and attribute-aware text output.
//
//   OutputBuffer collects a whole frame of ANSI bytes in memory so it reaches
//   the terminal in a single write() syscall.
//
//   StyledWriter remembers the SGR attributes currently active on the
//   terminal and only emits escapes when they change. A row of plain text
//   costs no escapes at all; a dimmed whitespace marker costs one on and one
//   off.

use std::io::{self, Write};

use crate::ansi::{self, Attr};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates one frame of terminal output.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append `ch` as UTF-8.
    pub fn push_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf
            .extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    /// Append a string verbatim.
    pub fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to stdout and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.flush_to(&mut stdout)
    }

    /// Write accumulated output to `w` and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing goes through flush_stdout() / flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── StyledWriter ────────────────────────────────────────────────────────────

/// Writes characters with attributes, skipping redundant SGR sequences.
#[derive(Debug, Default)]
pub struct StyledWriter {
    current: Attr,
}

impl StyledWriter {
    /// A writer that assumes the terminal has no attributes active.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Attr::empty(),
        }
    }

    /// Write `ch` with `attr`, switching attributes only if they differ.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn put(&mut self, out: &mut OutputBuffer, ch: char, attr: Attr) -> io::Result<()> {
        self.set(out, attr)?;
        out.push_char(ch);
        Ok(())
    }

    /// Write `s` with `attr`.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn put_str(&mut self, out: &mut OutputBuffer, s: &str, attr: Attr) -> io::Result<()> {
        self.set(out, attr)?;
        out.push_str(s);
        Ok(())
    }

    /// Return the terminal to plain text.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn finish(&mut self, out: &mut OutputBuffer) -> io::Result<()> {
        self.set(out, Attr::empty())
    }

    fn set(&mut self, out: &mut OutputBuffer, attr: Attr) -> io::Result<()> {
        if attr == self.current {
            return Ok(());
        }
        // Attributes are only ever switched off by a full reset.
        if !self.current.is_empty() {
            ansi::reset(out)?;
        }
        ansi::attrs(out, attr)?;
        self.current = attr;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
