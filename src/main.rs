// SPDX-License-Identifier: MIT
//
// gim — a small modal terminal text editor.
//
// This binary wires the two crates together:
//
//   gim-term → raw mode, key parsing, escape output, event loop
//   gim-core → document, cursor, viewport, modes, render model
//
// `Editor` implements gim-term's `App` trait. Each keypress flows through:
//
//   stdin → parser → on_event → to_inputs → EditorSession::handle
//   paint → Frame::build → escape sequences → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ gutter │ text                │  ← rows - 1
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← 1 row
//   └──────────────────────────────┘

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use gim_core::render::FrameRow;
use gim_core::{Document, EditorSession, Frame, Input, Key, Options, Outcome, TextBuffer};
use gim_term::ansi::{self, Attr, CursorShape};
use gim_term::event_loop::{Action, App, EventLoop};
use gim_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use gim_term::output::{OutputBuffer, StyledWriter};
use gim_term::terminal::{self, Size};
use thiserror::Error;
use tracing::{debug, info, Dispatch};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Log file used when `--log` isn't given.
const DEFAULT_LOG: &str = "debug.log";

/// Filter used when `GIM_LOG` isn't set.
const DEFAULT_FILTER: &str = "gim=info,gim_core=info";

const USAGE: &str = "\
usage: gim [--set ARG]... [--show-whitespace] [--no-numbers]
           [--log PATH | --no-log] [--] FILE...

  --set ARG          apply a set directive: number, nonumber, list,
                     nolist, number!, scrollanchor=N
  --show-whitespace  same as --set list
  --no-numbers       same as --set nonumber
  --log PATH         write diagnostics to PATH (default debug.log)
  --no-log           write no diagnostics

keys: i insert, Esc normal, h j k l / arrows move, ZQ or Ctrl-C quit";

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open log file {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: InitError,
    },

    #[error(transparent)]
    Core(#[from] gim_core::Error),

    #[error("terminal: {0}")]
    Terminal(#[from] io::Error),
}

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    File(PathBuf),
    Off,
}

#[derive(Debug)]
struct Args {
    options: Options,
    log: LogTarget,
    files: Vec<PathBuf>,
    help: bool,
}

/// Parse the command line (without the program name).
fn parse_args<I>(args: I) -> Result<Args, AppError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args {
        options: Options::default(),
        log: LogTarget::File(PathBuf::from(DEFAULT_LOG)),
        files: Vec::new(),
        help: false,
    };
    let mut args = args.into_iter();
    let mut only_files = false;

    while let Some(arg) = args.next() {
        if only_files {
            parsed.files.push(PathBuf::from(arg));
            continue;
        }
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--" => only_files = true,
            "--set" => {
                let value = args
                    .next()
                    .ok_or_else(|| AppError::Usage("--set needs an argument".into()))?;
                parsed.options.set(&value)?;
            }
            "--show-whitespace" => parsed.options.show_whitespace = true,
            "--no-numbers" => parsed.options.line_numbers = false,
            "--log" => {
                let path = args
                    .next()
                    .ok_or_else(|| AppError::Usage("--log needs a path".into()))?;
                parsed.log = LogTarget::File(PathBuf::from(path));
            }
            "--no-log" => parsed.log = LogTarget::Off,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(AppError::Usage(format!("unknown flag: {flag}")));
            }
            _ => parsed.files.push(PathBuf::from(arg)),
        }
    }

    Ok(parsed)
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Build the diagnostics dispatcher. The guard must outlive the session;
/// dropping it flushes the log.
fn init_logging(target: &LogTarget) -> Result<(Dispatch, Option<WorkerGuard>), AppError> {
    let LogTarget::File(path) = target else {
        return Ok((Dispatch::none(), None));
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path.file_name().map_or_else(
        || DEFAULT_LOG.into(),
        |n| n.to_string_lossy().into_owned(),
    );

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|source| AppError::Log {
            path: path.clone(),
            source,
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env("GIM_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    Ok((Dispatch::new(subscriber), Some(guard)))
}

// ─── File loading ───────────────────────────────────────────────────────────

/// Read `path` into a document. A missing file is an empty document, so
/// `gim new.txt` works; invalid UTF-8 is replaced rather than rejected.
fn load_document(path: &Path) -> Result<Document, AppError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Document::from_text(&String::from_utf8_lossy(&bytes))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Document::new()),
        Err(source) => Err(AppError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Rows available for text: everything but the status line.
fn text_rows(rows: u16) -> usize {
    usize::from(rows.saturating_sub(1).max(1))
}

/// Open one buffer per path, or a single empty buffer.
fn open_session(args: &Args, size: Size) -> Result<EditorSession, AppError> {
    let width = usize::from(size.cols);
    let height = text_rows(size.rows);

    let mut buffers = Vec::with_capacity(args.files.len().max(1));
    for path in &args.files {
        let doc = load_document(path)?;
        buffers.push(
            TextBuffer::new(doc, width, height, &args.options)?
                .with_name(path.display().to_string()),
        );
    }

    let mut buffers = buffers.into_iter();
    let first = match buffers.next() {
        Some(buf) => buf,
        None => TextBuffer::new(Document::new(), width, height, &args.options)?,
    };
    let mut session = EditorSession::new(first);
    for buf in buffers {
        session.open(buf);
    }
    session.focus(0);
    Ok(session)
}

// ─── Key mapping ────────────────────────────────────────────────────────────

/// Translate a terminal key into the core's input vocabulary.
///
/// Keys the core has no use for (function keys, Alt/Ctrl chords other than
/// Ctrl-C) map to `None`.
fn to_input(key: &KeyEvent) -> Option<Input> {
    if key.is_interrupt() {
        return Some(Key::Interrupt.into());
    }
    if key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) {
        return None;
    }
    let input = match key.code {
        KeyCode::Char(ch) => Input::Char(ch),
        KeyCode::Tab => Input::Char('\t'),
        KeyCode::Up => Key::Up.into(),
        KeyCode::Down => Key::Down.into(),
        KeyCode::Left => Key::Left.into(),
        KeyCode::Right => Key::Right.into(),
        KeyCode::Backspace => Key::Backspace.into(),
        KeyCode::Escape => Key::Escape.into(),
        KeyCode::Enter => Key::Enter.into(),
        KeyCode::Delete | KeyCode::Home | KeyCode::End | KeyCode::PageUp | KeyCode::PageDown => {
            return None;
        }
    };
    Some(input)
}

/// Like [`to_input`], but an Alt chord becomes Escape followed by the key.
///
/// ESC and the next key in one read parse as an Alt chord. gim binds nothing
/// to Alt, so that is the user leaving Insert and typing on.
fn to_inputs(key: &KeyEvent) -> Vec<Input> {
    if key.modifiers == Modifiers::ALT {
        let plain = KeyEvent::plain(key.code);
        return std::iter::once(Key::Escape.into())
            .chain(to_input(&plain))
            .collect();
    }
    to_input(key).into_iter().collect()
}

const fn term_shape(shape: gim_core::CursorShape) -> CursorShape {
    match shape {
        gim_core::CursorShape::SteadyBlock => CursorShape::SteadyBlock,
        gim_core::CursorShape::SteadyBar => CursorShape::SteadyBar,
    }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ─── Editor ─────────────────────────────────────────────────────────────────

struct Editor {
    session: EditorSession,
    options: Options,
    diagnostics: Dispatch,
    /// Where the hardware cursor goes, computed during paint.
    cursor_screen: Option<(u16, u16, CursorShape)>,
}

impl Editor {
    fn new(session: EditorSession, options: Options, diagnostics: Dispatch) -> Self {
        Self {
            session: session.with_diagnostics(diagnostics.clone()),
            options,
            diagnostics,
            cursor_screen: None,
        }
    }

    fn paint_row(out: &mut OutputBuffer, row: &FrameRow, gutter: usize) -> io::Result<()> {
        let mut w = StyledWriter::new();
        if gutter > 0 {
            w.put_str(out, &row.label, Attr::DIM)?;
            w.put(out, ' ', Attr::empty())?;
        }
        for glyph in &row.glyphs {
            let attr = if glyph.dim { Attr::DIM } else { Attr::empty() };
            w.put(out, glyph.ch, attr)?;
        }
        w.finish(out)
    }

    fn paint_status(&self, out: &mut OutputBuffer, width: usize) -> io::Result<()> {
        let buf = self.session.focused();
        let mut status = format!(" {} ", self.session.mode());
        status.push_str(buf.name().unwrap_or("[No Name]"));
        if buf.document().is_modified() {
            status.push_str(" [+]");
        }
        let count = self.session.buffers().len();
        if count > 1 {
            let _ = write!(status, " ({}/{count})", self.session.focused_index() + 1);
        }
        let position = format!(
            "{}:{} ",
            buf.cursor().row() + 1,
            buf.cursor().text_col() + 1
        );
        let fill = width.saturating_sub(status.chars().count() + position.chars().count());
        let line: String = format!("{status}{}{position}", " ".repeat(fill))
            .chars()
            .take(width)
            .collect();

        let mut w = StyledWriter::new();
        w.put_str(out, &line, Attr::INVERSE)?;
        w.finish(out)
    }
}

impl App for Editor {
    fn on_event(&mut self, event: &Event) -> Action {
        let Event::Key(key) = event;
        let inputs = to_inputs(key);
        if inputs.is_empty() {
            tracing::dispatcher::with_default(&self.diagnostics, || {
                debug!(?key, "unmapped key");
            });
        }

        for input in inputs {
            if self.session.handle(input) == Outcome::Quit {
                return Action::Quit;
            }
        }
        Action::Continue
    }

    fn on_resize(&mut self, size: Size) {
        self.session.handle(Input::Resize {
            width: usize::from(size.cols),
            height: text_rows(size.rows),
        });
    }

    fn paint(&mut self, out: &mut OutputBuffer, size: Size) -> io::Result<()> {
        let frame = Frame::build(self.session.focused(), self.session.mode(), &self.options);
        let text_height = text_rows(size.rows);

        for y in 0..text_height {
            ansi::cursor_to(out, 0, to_u16(y))?;
            match frame.rows.get(y) {
                Some(row) => Self::paint_row(out, row, frame.gutter_width)?,
                None => out.push_char('~'),
            }
            ansi::clear_line(out)?;
        }

        if size.rows > 1 {
            ansi::cursor_to(out, 0, size.rows - 1)?;
            self.paint_status(out, usize::from(size.cols))?;
            ansi::clear_line(out)?;
        }

        let (x, y) = frame.cursor;
        self.cursor_screen = Some((to_u16(x), to_u16(y), term_shape(frame.cursor_shape)));
        Ok(())
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        self.cursor_screen
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run() -> Result<(), AppError> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let (dispatch, _guard) = init_logging(&args.log)?;
    let size = terminal::get_size().unwrap_or(Size::FALLBACK);
    let session = open_session(&args, size)?;

    tracing::dispatcher::with_default(&dispatch, || {
        info!(
            files = args.files.len(),
            cols = size.cols,
            rows = size.rows,
            "starting"
        );
    });

    let mut editor = Editor::new(session, args.options, dispatch.clone());
    let result = EventLoop::new().run(&mut editor);

    tracing::dispatcher::with_default(&dispatch, || match &result {
        Ok(()) => info!("exited"),
        Err(err) => info!(%err, "exited with error"),
    });

    result.map_err(AppError::from)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("gim: {err}");
        if matches!(err, AppError::Usage(_)) {
            eprintln!("\n{USAGE}");
        }
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gim_core::Mode;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Result<Args, AppError> {
        parse_args(list.iter().map(|s| (*s).to_string()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn editor(lines: &[&str], size: Size) -> Editor {
        let options = Options::default();
        let buf = TextBuffer::new(
            Document::from_lines(lines.iter().copied()),
            usize::from(size.cols),
            text_rows(size.rows),
            &options,
        )
        .unwrap();
        Editor::new(EditorSession::new(buf), options, Dispatch::none())
    }

    fn press(e: &mut Editor, code: KeyCode) -> Action {
        e.on_event(&Event::Key(key(code)))
    }

    // ── Command line ──────────────────────────────────────────────────────

    #[test]
    fn no_args_is_one_empty_buffer() {
        let a = args(&[]).unwrap();
        assert!(a.files.is_empty());
        assert_eq!(a.log, LogTarget::File(PathBuf::from("debug.log")));
        assert_eq!(a.options, Options::default());

        let s = open_session(&a, Size::FALLBACK).unwrap();
        assert_eq!(s.buffers().len(), 1);
        assert_eq!(s.focused().name(), None);
    }

    #[test]
    fn set_flags_change_options() {
        let a = args(&["--set", "list", "--no-numbers", "--set", "sa=2", "a.txt"]).unwrap();
        assert!(a.options.show_whitespace);
        assert!(!a.options.line_numbers);
        assert_eq!(a.options.scroll_anchor, Some(2));
        assert_eq!(a.files, vec![PathBuf::from("a.txt")]);
    }

    #[test]
    fn log_flags() {
        assert_eq!(args(&["--no-log"]).unwrap().log, LogTarget::Off);
        assert_eq!(
            args(&["--log", "/tmp/x.log"]).unwrap().log,
            LogTarget::File(PathBuf::from("/tmp/x.log"))
        );
    }

    #[test]
    fn bad_arguments() {
        assert!(matches!(args(&["--set"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["--log"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["--frobnicate"]), Err(AppError::Usage(_))));
        assert!(matches!(
            args(&["--set", "wrap"]),
            Err(AppError::Core(gim_core::Error::UnknownOption(_)))
        ));
    }

    #[test]
    fn double_dash_ends_flags() {
        let a = args(&["--", "--no-log", "-"]).unwrap();
        assert_eq!(a.files, vec![PathBuf::from("--no-log"), PathBuf::from("-")]);
        assert_ne!(a.log, LogTarget::Off);
    }

    #[test]
    fn help_flag() {
        assert!(args(&["-h"]).unwrap().help);
        assert!(args(&["--help"]).unwrap().help);
    }

    // ── File loading ──────────────────────────────────────────────────────

    #[test]
    fn missing_file_is_empty_document() {
        let doc = load_document(Path::new("/nonexistent/gim/test/file.txt")).unwrap();
        assert_eq!(doc.to_lines(), vec![""]);
    }

    #[test]
    fn load_splits_lines() {
        let path = std::env::temp_dir().join(format!("gim-load-{}.txt", process::id()));
        fs::write(&path, "ab\r\nc\n").unwrap();
        let doc = load_document(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(doc.to_lines(), vec!["ab", "c", ""]);
    }

    #[test]
    fn each_file_gets_a_buffer() {
        let a = args(&["/nonexistent/one", "/nonexistent/two"]).unwrap();
        let s = open_session(&a, Size { cols: 40, rows: 10 }).unwrap();
        assert_eq!(s.buffers().len(), 2);
        assert_eq!(s.focused_index(), 0);
        assert_eq!(s.focused().name(), Some("/nonexistent/one"));
        assert_eq!(s.focused().viewport().height(), 9);
    }

    // ── Key mapping ───────────────────────────────────────────────────────

    #[test]
    fn keys_map_to_core_inputs() {
        assert_eq!(to_input(&key(KeyCode::Char('x'))), Some(Input::Char('x')));
        assert_eq!(to_input(&key(KeyCode::Up)), Some(Key::Up.into()));
        assert_eq!(to_input(&key(KeyCode::Backspace)), Some(Key::Backspace.into()));
        assert_eq!(to_input(&key(KeyCode::Escape)), Some(Key::Escape.into()));
        assert_eq!(to_input(&key(KeyCode::Tab)), Some(Input::Char('\t')));
        assert_eq!(to_input(&key(KeyCode::PageDown)), None);
    }

    #[test]
    fn ctrl_c_is_interrupt_other_chords_ignored() {
        let ctrl = |ch| KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        };
        assert_eq!(to_input(&ctrl('c')), Some(Key::Interrupt.into()));
        assert_eq!(to_input(&ctrl('a')), None);
        let alt = KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: Modifiers::ALT,
        };
        assert_eq!(to_input(&alt), None);
    }

    #[test]
    fn alt_chord_is_escape_then_key() {
        let alt = |code| KeyEvent {
            code,
            modifiers: Modifiers::ALT,
        };
        assert_eq!(
            to_inputs(&alt(KeyCode::Char('j'))),
            vec![Key::Escape.into(), Input::Char('j')]
        );
        assert_eq!(
            to_inputs(&alt(KeyCode::Enter)),
            vec![Key::Escape.into(), Key::Enter.into()]
        );
        assert_eq!(to_inputs(&key(KeyCode::Char('j'))), vec![Input::Char('j')]);
        assert!(to_inputs(&key(KeyCode::Home)).is_empty());
    }

    #[test]
    fn fast_escape_then_motion_leaves_insert() {
        let mut e = editor(&["a", "b"], Size::FALLBACK);
        press(&mut e, KeyCode::Char('i'));
        let chord = Event::Key(KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: Modifiers::ALT,
        });
        assert_eq!(e.on_event(&chord), Action::Continue);
        assert_eq!(e.session.mode(), Mode::Normal);
        assert_eq!(e.session.focused().cursor().row(), 1);
        assert_eq!(e.session.focused().document().to_lines(), vec!["a", "b"]);
    }

    // ── Editor ────────────────────────────────────────────────────────────

    #[test]
    fn editor_quits_on_zq_and_ctrl_c() {
        let mut e = editor(&["x"], Size::FALLBACK);
        assert_eq!(press(&mut e, KeyCode::Char('Z')), Action::Continue);
        assert_eq!(press(&mut e, KeyCode::Char('Q')), Action::Quit);

        let mut e = editor(&["x"], Size::FALLBACK);
        let ctrl_c = Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: Modifiers::CTRL,
        });
        assert_eq!(e.on_event(&ctrl_c), Action::Quit);
    }

    #[test]
    fn editor_types_text() {
        let mut e = editor(&["ac"], Size::FALLBACK);
        press(&mut e, KeyCode::Right);
        press(&mut e, KeyCode::Char('i'));
        press(&mut e, KeyCode::Char('b'));
        assert_eq!(e.session.mode(), Mode::Insert);
        assert_eq!(e.session.focused().document().to_lines(), vec!["abc"]);
    }

    #[test]
    fn paint_places_cursor_and_status() {
        let mut e = editor(&["hello", "world"], Size { cols: 30, rows: 5 });
        press(&mut e, KeyCode::Down);
        press(&mut e, KeyCode::Char('i'));

        let mut out = OutputBuffer::new();
        e.paint(&mut out, Size { cols: 30, rows: 5 }).unwrap();
        let text = String::from_utf8_lossy(out.as_bytes()).into_owned();

        assert!(text.contains("hello"));
        assert!(text.contains("world"));
        assert!(text.contains('~'));
        assert!(text.contains("INSERT"));
        assert_eq!(e.cursor(), Some((2, 1, CursorShape::SteadyBar)));
    }

    #[test]
    fn resize_reaches_session() {
        let mut e = editor(&["a"], Size::FALLBACK);
        e.on_resize(Size { cols: 50, rows: 7 });
        assert_eq!(e.session.focused().width(), 50);
        assert_eq!(e.session.focused().viewport().height(), 6);
    }

    #[test]
    fn app_error_messages() {
        let err = AppError::from(gim_core::Error::InvalidDimensions { width: 0, height: 3 });
        assert_eq!(err.to_string(), "invalid initial dimensions: 0x3");
        assert!(AppError::Usage("bad".into()).to_string().starts_with("bad"));
    }

    #[test]
    fn logging_off_needs_no_guard() {
        let (_, guard) = init_logging(&LogTarget::Off).unwrap();
        assert!(guard.is_none());
    }
}
