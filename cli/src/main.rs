use std::io::{self, BufRead, Write};

use chrono::Utc;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sweeper_core::{CellCount, Coord};

use command::Command;
use session::{Flow, GameSession};
use settings::BoardParams;

mod command;
mod render;
mod session;
mod settings;

/// Minesweeper in the terminal, one command per line: dig X Y, flag X Y, hover X Y, click PX PY [left|right],
/// move PX PY, new [W H B], restart, quit.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Board width in tiles (1-100)
    #[arg(allow_negative_numbers = true)]
    width: Option<Coord>,

    /// Board height in tiles (1-100)
    #[arg(allow_negative_numbers = true)]
    height: Option<Coord>,

    /// Number of mines, less than width * height
    #[arg(allow_negative_numbers = true)]
    bombs: Option<CellCount>,

    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print every frame as a JSON object instead of a text grid
    #[arg(long)]
    json: bool,
}

fn draw(out: &mut impl Write, session: &GameSession, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    if json {
        writeln!(out, "{}", render::render_json(session, now)?)?;
    } else {
        writeln!(out, "{}", render::render_text(session, now))?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("seed: {:?}", args.seed);

    let params = BoardParams::from_args(args.width, args.height, args.bombs);
    let mut session = GameSession::new(params, args.seed, Utc::now())?;

    let mut stdout = io::stdout().lock();
    draw(&mut stdout, &session, args.json)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        };

        if session.apply(command, Utc::now())? == Flow::Quit {
            log::debug!("Quit during {}", session.params());
            break;
        }
        draw(&mut stdout, &session, args.json)?;
    }

    Ok(())
}
