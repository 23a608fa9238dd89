//! Files — ordered lines with a path, dirty flags, and disk I/O.
//!
//! Open files live in a process-wide [`FileTable`] keyed by byte-exact
//! path, so two windows showing the same path share one [`File`]. Windows
//! hold [`FileId`] handles and never free files; files outlive every
//! window that views them.
//!
//! Line-ending policy: loads accept `\n` and `\r\n`; a `\r` not followed
//! by `\n` rejects the whole file and leaves the table untouched. Saves
//! join lines with `\r\n` and write no trailing terminator, so the
//! persisted form always carries exactly `lines − 1` separators and a
//! save/load/save cycle is byte-stable.

use std::fs;

use crate::error::EditError;
use crate::highlight::{self, Language};
use crate::line::Line;

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// Handle to a file in the [`FileTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub(crate) usize);

/// An open file: path, lines, and render/save state.
pub struct File {
    path: String,
    /// The file's lines. Never empty: deleting the last byte of a one-line
    /// file leaves one empty line.
    pub lines: Vec<Line>,
    /// All lines are persisted to disk.
    pub saved: bool,
    /// The entire file must be redrawn in every window viewing it.
    pub redraw: bool,
    /// Highlighter profile selected by path suffix, if any.
    pub language: Option<&'static Language>,
}

impl File {
    fn new(path: String, lines: Vec<Line>, saved: bool) -> Self {
        let language = highlight::detect(&path);
        let mut file = Self {
            path,
            lines,
            saved,
            redraw: true,
            language,
        };
        for y in 0..file.lines.len() {
            file.rehighlight(y);
        }
        file
    }

    /// The file's path as typed into the minibar.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of lines. Always at least 1.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// A line's bytes, or an empty slice out of range.
    #[must_use]
    pub fn line(&self, y: usize) -> &[u8] {
        self.lines.get(y).map_or(&[], |l| l.chars.as_slice())
    }

    /// Recompute a line's color classes from the language profile.
    ///
    /// Files without a profile keep empty color vectors; the renderer
    /// never reads them in that case.
    pub fn rehighlight(&mut self, y: usize) {
        if let Some(lang) = self.language {
            if let Some(line) = self.lines.get_mut(y) {
                line.colors = highlight::highlight_line(&line.chars, lang);
            }
        }
    }

    /// Mark a single line stale and rehighlight it. For in-place edits.
    pub fn touch_line(&mut self, y: usize) {
        self.rehighlight(y);
        if let Some(line) = self.lines.get_mut(y) {
            line.redraw = true;
        }
        self.saved = false;
    }

    /// Mark the whole file stale. For edits that add or remove lines and
    /// shift everything below.
    pub fn touch_all(&mut self) {
        self.redraw = true;
        self.saved = false;
    }

    /// The persisted representation: lines joined by `\r\n`, no trailing
    /// terminator.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(b"\r\n");
            }
            out.extend_from_slice(&line.chars);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Split file bytes into lines.
///
/// `\n` and `\r\n` both terminate a line. A `\r` anywhere else fails the
/// load. The trailing unterminated text (possibly empty) becomes the last
/// line, so the result is never empty.
fn parse_lines(bytes: &[u8], path: &str) -> Result<Vec<Line>, EditError> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(Line::from_bytes(std::mem::take(&mut current)));
                i += 1;
            }
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    lines.push(Line::from_bytes(std::mem::take(&mut current)));
                    i += 2;
                } else {
                    return Err(EditError::InvalidLineEnding { path: path.into() });
                }
            }
            b => {
                current.push(b);
                i += 1;
            }
        }
    }

    lines.push(Line::from_bytes(current));
    Ok(lines)
}

// ---------------------------------------------------------------------------
// FileTable
// ---------------------------------------------------------------------------

/// The process-wide set of open files.
///
/// Files are appended and never removed, so a plain `Vec` is the arena.
#[derive(Default)]
pub struct FileTable {
    files: Vec<File>,
}

impl FileTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open files.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are open.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Shared access to a file.
    ///
    /// # Panics
    ///
    /// Panics on a dangling id — ids are never freed, so one can only come
    /// from a different table.
    #[inline]
    #[must_use]
    pub fn get(&self, id: FileId) -> &File {
        &self.files[id.0]
    }

    /// Mutable access to a file.
    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, id: FileId) -> &mut File {
        &mut self.files[id.0]
    }

    /// Iterate all open files mutably (renderer flag-clearing pass).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut File> {
        self.files.iter_mut()
    }

    /// Look up an already-open file by byte-exact path.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<FileId> {
        self.files.iter().position(|f| f.path == path).map(FileId)
    }

    /// Open a file, deduplicating by path.
    ///
    /// A path matching an existing entry returns that entry untouched.
    /// Otherwise the file is read and parsed; on any failure no entry is
    /// added.
    ///
    /// # Errors
    ///
    /// [`EditError::FileOpenFailed`] when the path cannot be read,
    /// [`EditError::InvalidLineEnding`] when a bare `\r` is encountered.
    pub fn open(&mut self, path: &str) -> Result<FileId, EditError> {
        if let Some(id) = self.find(path) {
            return Ok(id);
        }

        let bytes = fs::read(path).map_err(|_| EditError::FileOpenFailed {
            path: path.to_string(),
        })?;
        let lines = parse_lines(&bytes, path)?;

        tracing::debug!(path, lines = lines.len(), "file opened");
        self.files.push(File::new(path.to_string(), lines, true));
        Ok(FileId(self.files.len() - 1))
    }

    /// Create a fresh unsaved file with one empty line.
    pub fn create(&mut self, path: &str) -> FileId {
        tracing::debug!(path, "file created");
        self.files
            .push(File::new(path.to_string(), vec![Line::new()], false));
        FileId(self.files.len() - 1)
    }

    /// Write a file to disk, truncating the target.
    ///
    /// # Errors
    ///
    /// [`EditError::FileSaveFailed`] when the underlying write refuses.
    pub fn save(&mut self, id: FileId) -> Result<(), EditError> {
        let file = &mut self.files[id.0];
        let bytes = file.serialize();
        fs::write(&file.path, &bytes).map_err(|_| EditError::FileSaveFailed {
            path: file.path.clone(),
        })?;
        file.saved = true;
        tracing::debug!(path = %file.path, bytes = bytes.len(), "file saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
