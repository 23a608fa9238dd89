// SPDX-License-Identifier: MIT
//
// slate — a modal terminal text editor with tiled windows.
//
// This binary wires the crates together:
//
//   slate-term   → raw mode, size queries, input chunks, single-flush output
//   slate-theme  → palettes
//   slate-editor → files, windows, layout, editing, search, rendering
//
// The main loop is deliberately simple and strictly single-threaded:
//
//   render → blocking read → dispatch
//
// Every edit is observable in the very next render. The only interruption
// is SIGWINCH, whose handler just sets a flag; the loop consumes it at the
// top of the next iteration (the signal also interrupts the blocking read,
// so a resize never waits for a keypress).

use std::env;
use std::io;
use std::process;

use slate_editor::{Editor, Renderer};
use slate_term::input::parse_chunk;
use slate_term::terminal::{self, Terminal};

/// Set up file logging when `SLATE_LOG` asks for it.
///
/// The TUI owns stdout, so log output goes to `slate.log` in the working
/// directory. Filtering uses the standard env-filter syntax from the
/// `SLATE_LOG` value itself (e.g. `SLATE_LOG=debug`).
fn init_logging() {
    let Ok(filter) = env::var("SLATE_LOG") else {
        return;
    };
    let Ok(log_file) = std::fs::File::create("slate.log") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
    tracing::info!("startup");
}

fn run(term: &mut Terminal, editor: &mut Editor) -> io::Result<()> {
    let mut renderer = Renderer::new();
    let mut stdout = io::stdout();

    loop {
        if terminal::take_resize() {
            let size = term.refresh_size();
            editor.resize_terminal(size);
        }

        editor.render(&mut renderer, &mut stdout)?;

        if !editor.running() {
            return Ok(());
        }

        // EOF means the terminal went away; shut down cleanly.
        let Some(chunk) = term.read_chunk()? else {
            return Ok(());
        };
        for key in parse_chunk(&chunk) {
            editor.dispatch(key, &mut || term.input_pending());
            if !editor.running() {
                break;
            }
        }
    }
}

fn main() {
    init_logging();

    let mut term = Terminal::new().unwrap_or_else(|e| {
        eprintln!("slate: failed to initialize terminal: {e}");
        process::exit(1);
    });
    if let Err(e) = term.enter() {
        eprintln!("slate: failed to enter raw mode: {e}");
        process::exit(1);
    }

    let mut editor = Editor::new(term.size());
    if let Some(path) = env::args().nth(1) {
        editor.open_initial(&path);
    }

    let result = run(&mut term, &mut editor);

    // Restore before reporting anything, so the message lands on a sane
    // terminal.
    let _ = term.leave();

    if let Err(e) = result {
        eprintln!("slate: {e}");
        process::exit(1);
    }
}
