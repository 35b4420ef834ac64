#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Creepydom in the terminal.

mod config;
mod input;
mod render;
mod store;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use creepydom_core::{Command, Event, ProgressStore};
use creepydom_system_progress::{MemoryStore, Progress};
use creepydom_world::{self as world, query, World};
use input::Action;
use store::JsonFileStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Eat smaller creatures, grow, and reach the target rank before time runs out.
#[derive(Debug, Parser)]
#[command(name = "creepydom", version)]
struct Args {
    /// Level to start on; capped at the highest unlocked level.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Seed for level generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with `[[ranks]]` and `[[levels]]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file that keeps unlocked levels between runs.
    #[arg(long)]
    progress: Option<PathBuf>,
}

/// Entry point for the Creepydom command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let (ranks, catalog) = config::load(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, levels = catalog.level_count(), "starting creepydom");
    let world = World::new(ranks, catalog, seed);

    let stdin = io::stdin();
    let stdout = io::stdout();
    match args.progress {
        Some(path) => {
            let store = JsonFileStore::open(path).context("failed to open progress file")?;
            info!(
                path = %store.path().display(),
                unlocked = store.get(),
                "loaded progress"
            );
            Game::new(world, Progress::new(store)).run(args.level, stdin.lock(), stdout.lock())
        }
        None => Game::new(world, Progress::new(MemoryStore::new())).run(
            args.level,
            stdin.lock(),
            stdout.lock(),
        ),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

struct Game<S> {
    world: World,
    progress: Progress<S>,
    level: u32,
    events: Vec<Event>,
}

impl<S: ProgressStore> Game<S> {
    fn new(world: World, progress: Progress<S>) -> Self {
        Self {
            world,
            progress,
            level: 1,
            events: Vec::new(),
        }
    }

    fn run(mut self, requested: u32, reader: impl BufRead, mut out: impl Write) -> Result<()> {
        let level = self.playable(requested);
        self.apply(Command::StartLevel { level });
        writeln!(out, "{}", render::HELP)?;
        self.flush(&mut out)?;

        let mut last = Instant::now();
        for line in reader.lines() {
            let line = line.context("failed to read player input")?;
            let now = Instant::now();
            self.apply(Command::Tick {
                dt: now.duration_since(last),
            });
            last = now;

            match input::parse(&line) {
                Some(Action::Quit) => break,
                Some(Action::Move(intent)) => {
                    self.apply(Command::SubmitIntent { intent });
                    self.apply(Command::ReleaseMoveLock);
                }
                Some(Action::Undo) => self.apply(Command::UndoMove),
                Some(Action::Retry) => self.apply(Command::StartLevel { level: self.level }),
                Some(Action::Next) => {
                    let next = self.level.saturating_add(1);
                    if next <= query::catalog(&self.world).level_count()
                        && self.progress.is_unlocked(next)
                    {
                        self.apply(Command::StartLevel { level: next });
                    } else {
                        writeln!(out, "Level {next} is locked.")?;
                    }
                }
                Some(Action::Help) => writeln!(out, "{}", render::HELP)?,
                Some(Action::Wait) => {}
                None => writeln!(out, "Unknown command {:?}; type ? for help.", line.trim())?,
            }
            self.flush(&mut out)?;
        }

        let total = query::catalog(&self.world).level_count();
        writeln!(
            out,
            "Completed {} of {total} levels.",
            self.progress.completed_levels(total)
        )?;
        Ok(())
    }

    fn playable(&self, requested: u32) -> u32 {
        let last = query::catalog(&self.world).level_count().max(1);
        let level = requested.clamp(1, last);
        if self.progress.is_unlocked(level) {
            return level;
        }
        let unlocked = self.progress.unlocked().min(last);
        warn!(requested, unlocked, "level is locked; starting the highest unlocked level");
        unlocked
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    /// Records progress and prints pending events followed by the board.
    fn flush(&mut self, out: &mut impl Write) -> Result<()> {
        self.progress
            .handle(&self.events)
            .context("failed to save progress")?;

        let mut redraw = false;
        for event in self.events.drain(..) {
            if let Event::LevelStarted { level, .. } = event {
                self.level = level;
            }
            redraw |= !matches!(event, Event::ClockTicked { .. });
            if let Some(line) = render::describe(&event, query::ranks(&self.world)) {
                writeln!(out, "{line}")?;
            }
        }
        if redraw {
            write!(out, "{}", render::board(&self.world))?;
        }
        out.flush()?;
        Ok(())
    }
}
