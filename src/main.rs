//! Headless demo: drop a ball, print the pick.
//!
//! Loads a watchlist JSON (the backend response shape) or falls back to a
//! built-in sample, shuffles, then runs the fixed-timestep loop until a drop
//! resolves.
//!
//! Usage: plinko-picker [WATCHLIST.json] [--seed N] [--width W] [--height H]

use std::fs;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use plinko_picker::{EngineEvent, Item, PlinkoEngine, Viewport, Watchlist};

/// Give up on a drop after this much simulated time (seconds)
const DROP_TIMEOUT_SECS: f32 = 60.0;
/// Voided drops are retried this many times before giving up
const MAX_RETRIES: u32 = 3;

struct Args {
    watchlist: Option<String>,
    seed: u64,
    viewport: Viewport,
}

fn parse_args() -> Result<Args, String> {
    let mut watchlist = None;
    let mut seed = None;
    let mut width = 800.0;
    let mut height = 600.0;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "--seed" => seed = Some(value("--seed")?.parse().map_err(|e| format!("{e}"))?),
            "--width" => width = value("--width")?.parse().map_err(|e| format!("{e}"))?,
            "--height" => height = value("--height")?.parse().map_err(|e| format!("{e}"))?,
            other if !other.starts_with("--") => watchlist = Some(other.to_string()),
            other => return Err(format!("unknown flag {other}")),
        }
    }

    let seed = match seed {
        Some(seed) => seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    };
    Ok(Args {
        watchlist,
        seed,
        viewport: Viewport::new(width, height),
    })
}

fn load_items(path: Option<&str>) -> Result<Vec<Item>, String> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
            let list: Watchlist =
                serde_json::from_str(&json).map_err(|e| format!("parsing {path}: {e}"))?;
            info!(
                "loaded {} of {} titles from {}'s watchlist",
                list.movies.len(),
                list.count,
                list.username
            );
            Ok(list.movies)
        }
        None => Ok([
            ("Brazil", 1985),
            ("Paris, Texas", 1984),
            ("The Thing", 1982),
            ("After Hours", 1985),
            ("Repo Man", 1984),
        ]
        .into_iter()
        .map(|(title, year)| {
            let mut item = Item::new(title);
            item.year = Some(year);
            item
        })
        .collect()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let items = match load_items(args.watchlist.as_deref()) {
        Ok(items) => items,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut engine = match PlinkoEngine::new(args.viewport, items, args.seed) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "board: {} bins, {} peg rows, {} Hz, seed {}",
        engine.candidates().len(),
        engine.config().peg_rows,
        engine.config().tick_hz,
        args.seed
    );

    engine.request_shuffle();

    let max_ticks = (DROP_TIMEOUT_SECS * engine.config().tick_hz) as u64;
    for attempt in 0..=MAX_RETRIES {
        if !engine.request_drop() {
            break;
        }
        let mut resolved = false;
        for _ in 0..max_ticks {
            for event in engine.advance() {
                match event {
                    EngineEvent::Selected { index, item } => {
                        let year = item
                            .year
                            .map(|y| format!(" ({y})"))
                            .unwrap_or_default();
                        println!("bin {index}: {}{year}", item.title);
                        resolved = true;
                    }
                    EngineEvent::Voided => {
                        warn!("drop voided on attempt {}", attempt + 1);
                    }
                    _ => {}
                }
            }
            if resolved || engine.phase() == plinko_picker::DropPhase::Idle {
                break;
            }
        }
        if resolved {
            engine.take_selection();
            return ExitCode::SUCCESS;
        }
    }

    eprintln!("error: no drop resolved");
    ExitCode::FAILURE
}
