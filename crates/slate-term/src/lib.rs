// SPDX-License-Identifier: MIT
//
// slate-term — terminal control for slate.
//
// Raw-mode terminal access via termios, ANSI escape emission, a
// single-flush output buffer, and a byte-chunk input parser. The editor
// core consumes this crate through a small surface: enter/leave, size,
// blocking reads, a pending-input probe, and escape-sequence helpers.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape
// sequences and raw termios. Every byte sent to the terminal is
// accounted for, and the whole frame leaves in one write().

#[allow(clippy::missing_errors_doc)] // ANSI functions all just forward io::Write errors.
pub mod ansi;
pub mod color;
pub mod input;
pub mod output;
pub mod terminal;
