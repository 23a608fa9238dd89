// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into structured keys. One blocking read gathers a
// chunk of up to 64 bytes; this module walks the chunk and yields every
// key it contains. Handles:
//
// - Control bytes (Ctrl-A..Ctrl-Z, Tab, Enter, Delete)
// - Printable ASCII
// - CSI sequences for arrows, Home/End and their Shift/Ctrl variants
// - The lone-ESC vs escape-sequence ambiguity: an ESC with nothing after
//   it in the chunk is the Escape key; an ESC starting a sequence we do
//   not recognize is absorbed without producing a key
//
// # Design
//
// Parsing is done by pure functions that read from a byte slice and report
// what they found plus how many bytes to consume. The chunk model means no
// state survives between reads — a keystroke's bytes arrive together, and
// anything that looks like a truncated sequence is deliberately absorbed
// rather than buffered.

use bitflags::bitflags;

// ─── Key types ───────────────────────────────────────────────────────────────

/// Identity of a key.
///
/// Named keys have dedicated variants; printable bytes use
/// [`Char`](KeyCode::Char). The core is single-byte: `Char` carries the
/// raw ASCII byte, never a decoded codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable ASCII byte (0x20..=0x7E).
    Char(u8),
    Enter,
    Tab,
    /// Deletes leftward (the 0x7F / 0x08 pair).
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding (`param = 1 + bitmask`):
    /// Shift is bit 0, Ctrl is bit 2.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Mods: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL  = 0b0000_0100;
    }
}

/// A parsed keypress: key identity plus active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub mods: Mods,
}

impl Key {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: Mods::empty(),
        }
    }

    /// A key with Ctrl held.
    #[inline]
    #[must_use]
    pub const fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            mods: Mods::CTRL,
        }
    }

    /// A key with Shift held.
    #[inline]
    #[must_use]
    pub const fn shift(code: KeyCode) -> Self {
        Self {
            code,
            mods: Mods::SHIFT,
        }
    }

    /// The printable byte this key inserts, if it is an unmodified
    /// printable key.
    #[inline]
    #[must_use]
    pub fn printable(self) -> Option<u8> {
        match self.code {
            KeyCode::Char(b) if self.mods.is_empty() => Some(b),
            _ => None,
        }
    }
}

// ─── Chunk parsing ───────────────────────────────────────────────────────────

/// Result of trying to parse one key from the chunk.
enum Parsed {
    /// A key, consuming `usize` bytes.
    Key(Key, usize),
    /// No key (unknown sequence absorbed), consuming `usize` bytes.
    Absorb(usize),
}

/// Parse a full read chunk into keys.
///
/// Every byte is consumed: recognized sequences become keys, unrecognized
/// escape sequences and stray bytes are absorbed.
#[must_use]
pub fn parse_chunk(chunk: &[u8]) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut pos = 0;

    while pos < chunk.len() {
        match parse_one(&chunk[pos..]) {
            Parsed::Key(key, n) => {
                keys.push(key);
                pos += n;
            }
            Parsed::Absorb(n) => pos += n.max(1),
        }
    }

    keys
}

/// Parse a single key starting at `buf[0]`. `buf` is non-empty.
fn parse_one(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x09 => Parsed::Key(Key::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(Key::plain(KeyCode::Enter), 1),
        0x7F => Parsed::Key(Key::plain(KeyCode::Delete), 1),
        0x08 => Parsed::Key(Key::ctrl(KeyCode::Delete), 1),
        b @ 0x01..=0x1A => Parsed::Key(Key::ctrl(KeyCode::Char(b - 1 + b'a')), 1),
        b @ 0x20..=0x7E => Parsed::Key(Key::plain(KeyCode::Char(b)), 1),
        _ => Parsed::Absorb(1),
    }
}

/// Parse an escape-initiated sequence.
///
/// A lone ESC (nothing after it in the chunk) is the Escape key. A CSI
/// sequence is decoded against the known table; anything else is absorbed.
fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return Parsed::Key(Key::plain(KeyCode::Escape), 1);
    }
    if buf[1] != b'[' {
        // ESC + one unknown byte — absorbed.
        return Parsed::Absorb(2);
    }
    if buf.len() < 3 {
        return Parsed::Absorb(2);
    }

    match buf[2] {
        b'A' => Parsed::Key(Key::plain(KeyCode::Up), 3),
        b'B' => Parsed::Key(Key::plain(KeyCode::Down), 3),
        b'C' => Parsed::Key(Key::plain(KeyCode::Right), 3),
        b'D' => Parsed::Key(Key::plain(KeyCode::Left), 3),
        b'H' => Parsed::Key(Key::plain(KeyCode::Home), 3),
        b'K' => Parsed::Key(Key::shift(KeyCode::End), 3),
        b'4' if buf.get(3) == Some(&b'~') => Parsed::Key(Key::plain(KeyCode::End), 4),
        b'2' if buf.get(3) == Some(&b'J') => Parsed::Key(Key::shift(KeyCode::Home), 4),
        b'1' => parse_modified_arrow(buf),
        _ => absorb_csi(buf),
    }
}

/// Parse `ESC [ 1 ; <mod> <A-D>`: Shift (2) and Ctrl (5) arrow variants.
fn parse_modified_arrow(buf: &[u8]) -> Parsed {
    // buf = ESC [ 1 ; m X
    if buf.len() < 6 || buf[3] != b';' {
        return absorb_csi(buf);
    }
    let mods = match buf[4] {
        b'2' => Mods::SHIFT,
        b'5' => Mods::CTRL,
        _ => return absorb_csi(buf),
    };
    let code = match buf[5] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        _ => return absorb_csi(buf),
    };
    Parsed::Key(Key { code, mods }, 6)
}

/// Absorb a CSI sequence: `ESC [` plus parameter/intermediate bytes up to
/// and including the final byte (0x40..=0x7E).
fn absorb_csi(buf: &[u8]) -> Parsed {
    let mut n = 2;
    while n < buf.len() {
        let b = buf[n];
        n += 1;
        if (0x40..=0x7E).contains(&b) {
            break;
        }
    }
    Parsed::Absorb(n)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
