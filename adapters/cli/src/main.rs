#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for the Pop Defence simulation.
//!
//! Runs a session at a fixed frame cadence, optionally placing a scripted set
//! of towers first and starting waves as soon as the previous one clears.

mod build_order;

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pop_defence_core::{
    Command, Content, Difficulty, GameMode, GameOutcome, MapId, SessionSettings,
};
use pop_defence_world::{self as world, query, SimulationState, World};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::build_order::BuildOrder;

/// Command-line arguments accepted by the driver.
#[derive(Debug, Parser)]
#[command(name = "pop-defence", version, about)]
struct Cli {
    /// Difficulty row used for starting money, health and prices.
    #[arg(long, value_enum, default_value_t = DifficultyArg::Medium)]
    difficulty: DifficultyArg,
    /// Whether the session ends after the authored waves.
    #[arg(long, value_enum, default_value_t = ModeArg::Fixed)]
    mode: ModeArg,
    /// Map to play on.
    #[arg(long, default_value = pop_defence_content::STOCK_MAP)]
    map: String,
    /// TOML content pack to use instead of the built-in tables.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Stop after this many simulated seconds.
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,
    /// Tower to place before the first wave, as `kind@x,y`. Repeatable.
    #[arg(long = "build")]
    builds: Vec<BuildOrder>,
    /// Start each wave as soon as the previous one has cleared.
    #[arg(long)]
    auto_start: bool,
    /// Write the final simulation state as JSON to this path.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
    UltraNightmare,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
            DifficultyArg::UltraNightmare => Self::UltraNightmare,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Fixed,
    Infinity,
}

impl From<ModeArg> for GameMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Fixed => Self::Fixed,
            ModeArg::Infinity => Self::Infinity,
        }
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    settings: &'a SessionSettings,
    outcome: GameOutcome,
    state: &'a SimulationState,
}

/// Entry point for the Pop Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let content = load_content(&cli)?;
    let settings = SessionSettings::new(
        cli.difficulty.into(),
        cli.mode.into(),
        MapId::new(cli.map.clone()),
    );
    let mut world = World::new(content, settings).context("failed to start session")?;

    for order in &cli.builds {
        place(&mut world, order)?;
    }

    let outcome = run(&mut world, &cli)?;
    info!(
        ?outcome,
        wave = query::wave(&world),
        money = query::money(&world),
        health = query::health(&world),
        clock_ms = query::clock(&world).as_millis(),
        "session finished"
    );

    if let Some(path) = &cli.snapshot {
        write_snapshot(&world, path)?;
    }
    Ok(())
}

fn load_content(cli: &Cli) -> Result<Content> {
    match &cli.content {
        Some(path) => pop_defence_content::from_toml_path(path)
            .with_context(|| format!("failed to load content from {}", path.display())),
        None => Ok(pop_defence_content::stock()),
    }
}

fn place(world: &mut World, order: &BuildOrder) -> Result<()> {
    let before = query::towers(world).len();
    world::apply(
        world,
        Command::PlaceTower {
            kind: order.kind.clone(),
            position: order.position,
        },
    )
    .with_context(|| format!("failed to place {}", order.kind))?;

    if query::towers(world).len() == before {
        warn!(kind = %order.kind, position = ?order.position, "build order refused");
    }
    Ok(())
}

fn run(world: &mut World, cli: &Cli) -> Result<GameOutcome> {
    let frame = Duration::from_millis(cli.frame_ms.max(1));
    let limit = Duration::from_secs(cli.max_seconds);
    let mut reported_wave = query::wave(world);

    while !query::outcome(world).is_terminal() && query::clock(world) < limit {
        if cli.auto_start && idle(world) {
            world::apply(world, Command::StartWave).context("failed to start wave")?;
        }
        world::apply(world, Command::Tick { dt: frame }).context("simulation step failed")?;

        let wave = query::wave(world);
        if wave != reported_wave {
            reported_wave = wave;
            info!(
                wave,
                money = query::money(world),
                health = query::health(world),
                towers = query::towers(world).len(),
                "progress"
            );
        }
    }

    Ok(query::outcome(world))
}

fn idle(world: &World) -> bool {
    !query::wave_spawning(world)
        && query::balloons(world).is_empty()
        && query::time_to_next_wave(world).is_zero()
}

fn write_snapshot(world: &World, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create snapshot {}", path.display()))?;
    let snapshot = Snapshot {
        settings: query::settings(world),
        outcome: query::outcome(world),
        state: query::state(world),
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &snapshot)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;
    info!(path = %path.display(), "snapshot written");
    Ok(())
}
