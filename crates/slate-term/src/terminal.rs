// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, alternate screen, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), poll, sigaction, isatty, and raw fd
// reads/writes. These are the standard POSIX interfaces for terminal
// control — there is no safe alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. It enters raw mode via termios,
// switches to the alternate screen, and guarantees cleanup on drop — even if
// the editor panics mid-frame.
//
// The panic hook bypasses Rust's stdout lock entirely, writing a pre-built
// restore sequence directly to fd 1. This prevents deadlock if the panic
// happened while holding the stdout lock (common during frame rendering).
// One raw write, everything restored, then the original panic handler prints
// its message to a working terminal.
//
// Resize handling is two-step: the SIGWINCH handler only stores a flag in an
// AtomicBool, and the main loop consumes it with `take_resize()`. The handler
// is installed without SA_RESTART so a blocking `read_chunk()` returns EINTR
// and the loop notices the resize without waiting for a keypress.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

/// A keypress chunk is at most this many bytes per read.
pub const READ_CHUNK: usize = 64;

// ─── Terminal queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails; callers
/// fall back to the cursor-report query.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── SIGWINCH ───────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler, consumed by the main loop.
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// Handler installation guard — at most once per process.
static SIGWINCH_INSTALLED: Once = Once::new();

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

/// Install the SIGWINCH handler.
///
/// The handler only stores a flag — layout and rendering happen on the main
/// loop's next iteration. SA_RESTART is deliberately omitted: the signal
/// must interrupt the blocking stdin read so the resize is observed
/// promptly.
#[cfg(unix)]
fn install_sigwinch_handler() {
    SIGWINCH_INSTALLED.call_once(|| unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    });
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

/// Consume the pending-resize flag.
///
/// Returns `true` at most once per delivered SIGWINCH.
#[must_use]
pub fn take_resize() -> bool {
    RESIZE_PENDING.swap(false, Ordering::Relaxed)
}

// ─── Panic-safe terminal restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This global backup — behind a [`Mutex`], not `static mut` —
/// lets the hook restore raw mode without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Complete terminal restore sequence for emergency use.
///
/// Concatenation of: reset SGR attributes, reset cursor color, reset the
/// programmed default background, show cursor, exit alternate screen.
/// Alternate screen exit is last so the restored shell content appears
/// with no editor artifacts.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[0m\
    \x1b]112\x07\
    \x1b]111\x07\
    \x1b[?25h\
    \x1b[?1049l";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the complete restore sequence directly to stdout's file descriptor.
///
/// Bypasses Rust's `io::stdout()` lock to avoid deadlocking if the panic
/// occurred while the lock was held (e.g., mid-frame flush).
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Call [`enter`](Self::enter) to switch to editor mode (raw mode, alternate
/// screen). The terminal is automatically restored when the handle is
/// dropped — even on panic.
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Current terminal size (cached, refresh with [`refresh_size`](Self::refresh_size)).
    size: Size,

    /// Whether we're in editor mode (raw + alt screen).
    active: bool,
}

impl Terminal {
    /// Create a terminal handle and query the current size.
    ///
    /// Does **not** enter editor mode — call [`enter`](Self::enter) for
    /// that. Falls back to 80×24 if the terminal size cannot be determined
    /// (e.g., in tests or piped environments).
    ///
    /// # Errors
    ///
    /// Currently infallible, but returns `Result` for forward compatibility.
    pub fn new() -> io::Result<Self> {
        let size = get_size().unwrap_or(Size { cols: 80, rows: 24 });

        Ok(Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        })
    }

    /// Current terminal size (columns, rows).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the terminal size from the OS.
    ///
    /// Call this after [`take_resize`] reports a pending SIGWINCH. Prefers
    /// the ioctl; when that fails (some serial consoles), falls back to the
    /// cursor-report query. Returns the updated size and caches it.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        } else if let Some(s) = self.query_size_by_cursor() {
            self.size = s;
        }
        self.size
    }

    /// Whether we're currently in editor mode.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter editor mode.
    ///
    /// Enables raw mode (via termios), switches to the alternate screen,
    /// hides the cursor, and clears the screen. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        install_sigwinch_handler();

        self.enable_raw_mode()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::enter_alt_screen(&mut lock)?;
        ansi::cursor_hide(&mut lock)?;
        ansi::clear_screen(&mut lock)?;
        lock.flush()?;

        self.active = true;

        // Raw mode is required for the cursor-report fallback, so the
        // ioctl-failed case is retried here.
        if get_size().is_none() {
            if let Some(s) = self.query_size_by_cursor() {
                self.size = s;
            }
        }

        Ok(())
    }

    /// Leave editor mode and restore the terminal.
    ///
    /// Resets the programmed colors, restores the original screen content,
    /// and exits raw mode. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::reset(&mut lock)?;
        ansi::reset_cursor_color(&mut lock)?;
        ansi::reset_default_background(&mut lock)?;
        ansi::cursor_show(&mut lock)?;
        ansi::exit_alt_screen(&mut lock)?;
        lock.flush()?;
        drop(lock);

        self.disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    // ── Input ───────────────────────────────────────────────────────

    /// Block until input arrives and return one chunk of raw bytes.
    ///
    /// Reads up to [`READ_CHUNK`] bytes in a single `read()`. A read
    /// interrupted by a signal (SIGWINCH) returns `Some` empty chunk so
    /// the caller can consume the pending resize. `None` means stdin hit
    /// EOF — the terminal is gone and the caller should shut down.
    ///
    /// # Errors
    ///
    /// Returns an error for genuine read failures (not EINTR).
    #[cfg(unix)]
    pub fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut buf = [0u8; READ_CHUNK];
        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(Some(Vec::new()));
            }
            return Err(err);
        }
        if n == 0 {
            return Ok(None);
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 guaranteed above.
        Ok(Some(buf[..n as usize].to_vec()))
    }

    #[cfg(not(unix))]
    pub fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        use std::io::Read;
        let mut buf = [0u8; READ_CHUNK];
        let n = io::stdin().lock().read(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf[..n].to_vec()))
    }

    /// Whether unread input is waiting on stdin right now.
    ///
    /// Zero-timeout `poll` — never blocks. Used by the search engine as its
    /// cooperative cancellation probe: a pending keystroke aborts a stale
    /// scan.
    #[cfg(unix)]
    #[must_use]
    pub fn input_pending(&self) -> bool {
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, 0) };
        ready > 0 && (pfd.revents & libc::POLLIN) != 0
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn input_pending(&self) -> bool {
        false
    }

    // ── Size fallback ───────────────────────────────────────────────

    /// Determine the terminal size by parking the cursor at a huge
    /// coordinate and reading the cursor-position report back.
    ///
    /// The terminal clamps the move to its bottom-right corner, so the
    /// reported position is the size. Requires raw mode; returns `None`
    /// when inactive or when the report doesn't arrive.
    #[cfg(unix)]
    fn query_size_by_cursor(&mut self) -> Option<Size> {
        if !self.active || !is_tty() {
            return None;
        }

        {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            // CUP to (999,999) then DSR 6 (report cursor position).
            lock.write_all(b"\x1b[999;999H\x1b[6n").ok()?;
            lock.flush().ok()?;
        }

        // Response: ESC [ rows ; cols R
        let mut report = Vec::with_capacity(16);
        loop {
            let mut byte = [0u8; 1];
            let n = unsafe {
                libc::read(libc::STDIN_FILENO, byte.as_mut_ptr().cast(), 1)
            };
            if n != 1 {
                return None;
            }
            if byte[0] == b'R' {
                break;
            }
            report.push(byte[0]);
            if report.len() > 16 {
                return None;
            }
        }

        let text = std::str::from_utf8(&report).ok()?;
        let body = text.strip_prefix("\x1b[")?;
        let (rows, cols) = body.split_once(';')?;
        Some(Size {
            cols: cols.parse().ok()?,
            rows: rows.parse().ok()?,
        })
    }

    #[cfg(not(unix))]
    fn query_size_by_cursor(&mut self) -> Option<Size> {
        None
    }

    // ── Raw mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            // Save original for restore.
            self.original_termios = Some(termios);

            // Also save to global backup for the panic hook.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // cfmakeraw equivalent: disable all line processing.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            // Clear the global backup — we've restored successfully.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Queries ──────────────────────────────────────────────────────

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    #[test]
    fn take_resize_consumes_flag() {
        RESIZE_PENDING.store(true, Ordering::Relaxed);
        assert!(take_resize());
        assert!(!take_resize());
    }

    // ── Emergency restore sequence ──────────────────────────────────

    #[test]
    fn emergency_restore_is_valid_utf8() {
        std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
    }

    #[test]
    fn emergency_restore_exits_alt_screen_last() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn emergency_restore_contains_all_sequences() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.contains("\x1b[0m"), "must reset SGR attributes");
        assert!(s.contains("\x1b]112\x07"), "must reset cursor color");
        assert!(s.contains("\x1b]111\x07"), "must reset background");
        assert!(s.contains("\x1b[?25h"), "must show cursor");
    }

    // ── Terminal struct ─────────────────────────────────────────────

    #[test]
    fn terminal_new_succeeds() {
        let term = Terminal::new().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn terminal_has_reasonable_default_size() {
        let term = Terminal::new().unwrap();
        let s = term.size();
        assert!(s.cols > 0);
        assert!(s.rows > 0);
    }

    #[test]
    fn terminal_leave_without_enter() {
        let mut term = Terminal::new().unwrap();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn terminal_drop_without_enter() {
        let term = Terminal::new().unwrap();
        drop(term);
    }

    #[test]
    fn input_pending_does_not_block() {
        let term = Terminal::new().unwrap();
        // Nothing should be queued in the test environment; the call must
        // return immediately either way.
        let _ = term.input_pending();
    }
}
