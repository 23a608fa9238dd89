//! # slate-theme — color themes for slate
//!
//! A theme is a complete assignment of RGB values to the editor's semantic
//! color tokens: editor surface, status bar, cursor, search matches, and
//! the syntax classes. The renderer addresses colors only through these
//! tokens — the palette is its single coupling to theming.
//!
//! - **[`palette`]** — the `Palette` token struct and per-byte `ColorClass`
//! - **[`builtin`]** — the named, indexed preset table

pub mod builtin;
pub mod palette;

pub use palette::{ColorClass, Palette};
