//! Editor options — the `set` system.
//!
//! [`Options`] holds the display settings the core consults when building a
//! frame or sizing a viewport. They are changed with Vim-style `set`
//! directives, which the binary accepts on the command line
//! (`gim --set list --set nonumber file.txt`).
//!
//! # Supported syntax
//!
//! | Syntax          | Effect                    |
//! |-----------------|---------------------------|
//! | `option`        | Enable boolean            |
//! | `nooption`      | Disable boolean           |
//! | `option!`       | Toggle boolean            |
//! | `option=N`      | Assign numeric value      |
//!
//! # Option names
//!
//! | Full name      | Abbrev | Type    | Default      |
//! |----------------|--------|---------|--------------|
//! | `number`       | `nu`   | bool    | true         |
//! | `list`         | —      | bool    | false        |
//! | `scrollanchor` | `sa`   | integer | height / 2   |

use crate::error::{Error, Result};

/// Display and scrolling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Show the line-number gutter.
    pub line_numbers: bool,

    /// Paint spaces and tabs as dimmed visible glyphs (Vim's `list`).
    pub show_whitespace: bool,

    /// Window-relative row the cursor is held at while scrolling.
    /// `None` uses the midpoint of the window.
    pub scroll_anchor: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            line_numbers: true,
            show_whitespace: false,
            scroll_anchor: None,
        }
    }
}

impl Options {
    /// Apply one `set` argument, e.g. `"list"`, `"nonu"`, `"sa=3"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOption`] for names not in the table above and
    /// [`Error::InvalidOptionValue`] for a bad assignment or for toggling a
    /// numeric option.
    pub fn set(&mut self, arg: &str) -> Result<()> {
        self.apply(parse_set_arg(arg))
    }

    /// Apply a parsed directive.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn apply(&mut self, directive: SetDirective) -> Result<()> {
        match directive {
            SetDirective::On(name) => *self.bool_option(&name)? = true,
            SetDirective::Off(name) => *self.bool_option(&name)? = false,
            SetDirective::Toggle(name) => {
                let flag = self.bool_option(&name)?;
                *flag = !*flag;
            }
            SetDirective::Assign(name, value) => self.assign(&name, &value)?,
        }
        Ok(())
    }

    fn bool_option(&mut self, name: &str) -> Result<&mut bool> {
        match name {
            "number" | "nu" => Ok(&mut self.line_numbers),
            "list" => Ok(&mut self.show_whitespace),
            _ if is_numeric_option(name) => Err(Error::InvalidOptionValue {
                name: name.to_string(),
                value: String::new(),
            }),
            _ => Err(Error::UnknownOption(name.to_string())),
        }
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "scrollanchor" | "sa" => {
                let n = value.parse().map_err(|_| Error::InvalidOptionValue {
                    name: name.to_string(),
                    value: value.to_string(),
                })?;
                self.scroll_anchor = Some(n);
                Ok(())
            }
            _ if is_bool_option(name) => Err(Error::InvalidOptionValue {
                name: name.to_string(),
                value: value.to_string(),
            }),
            _ => Err(Error::UnknownOption(name.to_string())),
        }
    }
}

/// A parsed `set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option` — enable a boolean option.
    On(String),
    /// `nooption` — disable a boolean option.
    Off(String),
    /// `option!` — toggle a boolean option.
    Toggle(String),
    /// `option=value` — assign a value.
    Assign(String, String),
}

/// Returns `true` if `name` is a known boolean option.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "number" | "nu" | "list")
}

/// Returns `true` if `name` is a known numeric option.
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(name, "scrollanchor" | "sa")
}

/// Parse a single `set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // `nonumber` → Off("number"), but only for known booleans, so a future
    // option whose name starts with "no" isn't mis-parsed.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    SetDirective::On(arg.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
