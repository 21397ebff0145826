//! Thin demonstration consumer of the library's external entry points:
//! reads a FEN from the command line (or stdin, or the standard start
//! position if neither is given), runs `search_timed`, and prints the
//! chosen move. This does not claim UCI protocol compliance.

use std::env;
use std::io::{self, IsTerminal, Read};

use vantage_core::{Engine, EngineConfig, Position};

#[cfg(feature = "cli")]
fn init_logging() {
    vantage_core::logger::init_logging("logs/vantage-core-cli.log", "info");
}

#[cfg(not(feature = "cli"))]
fn init_logging() {}

fn read_fen() -> Option<String> {
    let mut args = env::args().skip(1);
    if let Some(fen) = args.next() {
        return Some(fen);
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return None;
    }
    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf).ok()?;
    let trimmed = buf.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn main() {
    init_logging();

    let seed = env::var("VANTAGE_ZOBRIST_SEED").ok().and_then(|s| s.parse::<u64>().ok());
    // Built before parsing the FEN: under the `deterministic_zobrist`
    // feature the engine's actual keys may not be the ones `seed` requested,
    // so the position must be hashed with `engine.keys()`, not a
    // separately constructed `ZobristKeys`.
    let engine = Engine::new(EngineConfig::default(), seed);
    let keys = engine.keys();

    let fen = read_fen();
    let pos = match fen {
        Some(ref fen) => match Position::from_fen(keys, fen) {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("error: invalid FEN: {err}");
                std::process::exit(1);
            }
        },
        None => Position::startpos(keys),
    };

    let budget_ms = engine.config().default_time_budget_ms;

    match engine.search_timed(&pos, budget_ms) {
        Some(mv) => println!("{}", mv.to_uci()),
        None => {
            eprintln!("no legal move (checkmate or stalemate)");
            std::process::exit(1);
        }
    }
}
