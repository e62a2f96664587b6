//! Blotto -- a robust Colonel Blotto allocation engine.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through the logger.

use std::io::{self, BufRead, Write};

use log::LevelFilter;

use blotto::engine::Engine;
use blotto::logging;
use blotto::protocol::parser::{parse_command, Command};

/// Runs the main protocol loop, reading commands from stdin and writing
/// responses to stdout.
fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = line?;

        let cmd = match parse_command(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("{}", e);
                writeln!(out, "error {}", e)?;
                out.flush()?;
                continue;
            }
        };

        match cmd {
            Command::Blotto => engine.handle_blotto(&mut out)?,
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::SetOption { name, value } => engine.set_option(name, value),
            Command::NewGame { troops, fields } => engine.handle_newgame(troops, fields, &mut out)?,
            Command::Solve(params) => engine.handle_solve(&params, &mut out)?,
            Command::Quit => break,
        }
    }
    out.flush()
}

fn main() {
    if let Err(e) = logging::init(logging::level_from_env(LevelFilter::Warn)) {
        eprintln!("failed to initialize logger: {}", e);
    }
    if let Err(e) = run() {
        log::error!("i/o failure: {}", e);
        std::process::exit(1);
    }
}
