//! # gim-core — Editor core for gim
//!
//! Everything the editor does that isn't talking to a terminal:
//!
//! - **[`document`]** — `Document`, a rope of lines with char-indexed edits
//! - **[`cursor`]** — `Cursor`, a clamped position that includes the gutter
//! - **[`viewport`]** — `Viewport`, the window of visible rows and its scroll
//!   policy
//! - **[`buffer`]** — `TextBuffer`, which keeps the three above consistent
//! - **[`mode`]** / **[`input`]** — Normal/Insert and decoded keys
//! - **[`session`]** — `EditorSession`, the mode machine over open buffers
//! - **[`render`]** — `Frame`, the terminal-independent screen model
//! - **[`options`]** — display options set with `set`-style directives
//!
//! The terminal loop lives in the `gim` binary and talks to the core only
//! through [`Input`] in and [`Frame`] out.

pub mod buffer;
pub mod cursor;
pub mod document;
pub mod error;
pub mod input;
pub mod mode;
pub mod options;
pub mod render;
pub mod session;
pub mod viewport;

pub use buffer::TextBuffer;
pub use document::Document;
pub use error::{Error, Result};
pub use input::{Input, Key};
pub use mode::{CursorShape, Mode};
pub use options::Options;
pub use render::Frame;
pub use session::{EditorSession, Outcome};
