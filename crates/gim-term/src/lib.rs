// SPDX-License-Identifier: MIT
//
// gim-term — Terminal collaborator for gim.
//
// Raw mode and the alternate screen with guaranteed restore, a background
// stdin reader, an incremental key parser, ANSI escape output, and the event
// loop that ties them together. Direct termios and escape sequences; no TUI
// framework in between.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
