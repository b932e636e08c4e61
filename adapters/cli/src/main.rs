#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a word grid level in the terminal.

mod input;
mod terminal;

use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, KeyEventKind};
use wordgrid_core::{Command, Event};
use wordgrid_rendering::SpriteSheet;
use wordgrid_system_session::Session;
use wordgrid_world::{query, SettleConfig, World};

use crate::terminal::{LineView, RawTerminal, TerminalView};

/// Play a puzzle whose rules are the sentences spelled out on the grid.
#[derive(Parser, Debug)]
#[command(name = "wordgrid", version, about, long_about = None)]
struct Args {
    /// Level file to play
    level: PathBuf,

    /// Directory receiving saved grids
    #[arg(long, default_value = "saves")]
    saves_dir: PathBuf,

    /// TOML manifest overriding the console sprites
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Read one command per stdin line instead of raw key presses
    #[arg(long)]
    line_mode: bool,

    /// Maximum passes per fixed point (derived from the grid by default)
    #[arg(long)]
    pass_limit: Option<usize>,
}

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Won,
    Quit,
    InputClosed,
}

/// Entry point for the word grid command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let grid = wordgrid_level::load(&args.level)
        .with_context(|| format!("failed to load level {}", args.level.display()))?;
    let sheet = match &args.sprites {
        Some(path) => SpriteSheet::from_manifest_path(path)?,
        None => SpriteSheet::console(),
    };
    let config = SettleConfig {
        pass_limit: args.pass_limit,
    };
    let mut session = Session::new(World::with_config(grid, config));

    let outcome = if args.line_mode {
        session.register(LineView::new(sheet));
        let mut lines = io::stdin().lock().lines();
        play(&mut session, &args.saves_dir, || {
            lines
                .next()
                .transpose()
                .map(|line| line.map(|line| input::command_for_line(&line)))
                .context("failed to read command from stdin")
        })?
    } else {
        let _terminal = RawTerminal::enter().context("failed to prepare the terminal")?;
        session.register(TerminalView::new(sheet));
        play(&mut session, &args.saves_dir, next_key)?
    };

    match outcome {
        Outcome::Won => println!("Congratulations, you won!"),
        Outcome::Quit => println!("Bye."),
        Outcome::InputClosed => log::info!("input closed before the game ended"),
    }
    Ok(())
}

/// Runs turns until the game ends or `next_command` runs dry.
fn play<F>(session: &mut Session, saves_dir: &Path, mut next_command: F) -> Result<Outcome>
where
    F: FnMut() -> Result<Option<Command>>,
{
    let events = session.start().context("level failed to settle")?;
    if events.contains(&Event::GameWon) {
        return Ok(Outcome::Won);
    }

    while !session.is_game_over() {
        let Some(command) = next_command()? else {
            return Ok(Outcome::InputClosed);
        };
        let events = session
            .manage_input(command)
            .with_context(|| format!("turn after {command:?} failed to settle"))?;
        for event in &events {
            match event {
                Event::SaveRequested => {
                    let path = wordgrid_level::save(query::grid(session.world()), saves_dir)?;
                    log::info!("saved to {}", path.display());
                }
                Event::GameWon => return Ok(Outcome::Won),
                _ => {}
            }
        }
    }
    Ok(Outcome::Quit)
}

fn next_key() -> Result<Option<Command>> {
    loop {
        if let event::Event::Key(key) = event::read().context("failed to read key press")? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(input::command_for_key(key)));
            }
        }
    }
}
