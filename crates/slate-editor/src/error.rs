//! The editor's error taxonomy.
//!
//! Every user-level failure is recoverable: the offending action is
//! skipped, the window's error state takes the message, and the next
//! render paints it on the status bar. Escape clears it. Nothing here
//! ever aborts the process.

use thiserror::Error;

/// A recoverable, user-visible editor error.
///
/// The `Display` strings are exactly what the status bar shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The path does not exist or is unreadable.
    #[error("can not open file {path}")]
    FileOpenFailed { path: String },

    /// A `\r` not followed by `\n` was encountered on load.
    #[error("invalid line ending in {path}")]
    InvalidLineEnding { path: String },

    /// The underlying write refused.
    #[error("can not save file {path}")]
    FileSaveFailed { path: String },

    /// Copy or cut invoked without a valid mark.
    #[error("no mark set")]
    NoMark,

    /// Paste invoked with nothing on the clipboard.
    #[error("clipboard is empty")]
    EmptyClipboard,

    /// The minibar command string did not match a known verb.
    #[error("unknown command {name}")]
    UnknownCommand { name: String },

    /// `split` without a direction token.
    #[error("split needs a direction: - or |")]
    SplitFailed,
}
