#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Lane Defence level headlessly.

mod layout;

use std::{cell::RefCell, fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lane_defence_core::{Command, DifficultyLevel, Event, GameConfig, GamePhase};
use lane_defence_world::{query, Simulation};
use serde::Serialize;
use tracing::{info, warn};

use crate::layout::TowerPlan;

/// Runs a level without a renderer and prints a summary of the outcome.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", author, version, about)]
struct Cli {
    /// Configuration file in TOML, or JSON when the extension is `.json`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Difficulty applied before the first wave.
    #[arg(long)]
    difficulty: Option<DifficultyLevel>,
    /// Tower to buy before the first wave, as `kind@column,row`. Repeatable.
    #[arg(long = "tower")]
    towers: Vec<TowerPlan>,
    /// Length of one simulated frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Simulated time after which the run stops.
    #[arg(long, default_value_t = 900.0)]
    max_seconds: f64,
    /// Start every wave as soon as the previous one clears.
    ///
    /// Without this flag only the first wave is played.
    #[arg(long)]
    auto_waves: bool,
    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

/// Event counters collected from the simulation bus.
#[derive(Debug, Default)]
struct Tally {
    spawned: u32,
    killed: u32,
    leaked: u32,
    shots: u32,
    hits: u32,
    waves_cleared: u32,
}

impl Tally {
    fn record(&mut self, event: &Event) {
        match event {
            Event::EnemySpawned { .. } => self.spawned += 1,
            Event::EnemyKilled { .. } => self.killed += 1,
            Event::EnemyLeaked { .. } => self.leaked += 1,
            Event::ProjectileFired { .. } => self.shots += 1,
            Event::ProjectileHit { .. } => self.hits += 1,
            Event::WaveCleared { wave } => {
                self.waves_cleared += 1;
                info!(wave, "wave cleared");
            }
            Event::Victory => info!("victory"),
            Event::GameOver => warn!("game over"),
            _ => {}
        }
    }
}

/// Outcome printed once the run stops.
#[derive(Debug, Serialize)]
struct Summary {
    outcome: &'static str,
    difficulty: DifficultyLevel,
    waves_started: u32,
    waves_total: u32,
    waves_cleared: u32,
    gold: u32,
    lives: u32,
    towers: usize,
    enemies_spawned: u32,
    enemies_killed: u32,
    enemies_leaked: u32,
    shots_fired: u32,
    hits: u32,
    simulated_seconds: f64,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let config = if is_json {
        GameConfig::from_json_str(&contents)
    } else {
        GameConfig::from_toml_str(&contents)
    };
    config.with_context(|| format!("invalid configuration {}", path.display()))
}

fn phase_label(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::NotStarted => "not_started",
        GamePhase::WaveInProgress => "wave_in_progress",
        GamePhase::WaveCleared => "wave_cleared",
        GamePhase::Victory => "victory",
        GamePhase::GameOver => "game_over",
    }
}

fn prepare(simulation: &mut Simulation<'_>, cli: &Cli) -> Result<()> {
    if let Some(difficulty) = cli.difficulty {
        let events = simulation.submit(Command::SetDifficulty { difficulty });
        if let Some(Event::DifficultyChangeRejected { reason, .. }) = events.first() {
            bail!("difficulty {difficulty} rejected: {reason}");
        }
    }

    for plan in &cli.towers {
        let center = query::tile_grid(simulation.world()).tile_center(plan.tile);
        let _ = simulation.submit(Command::SelectTowerKind {
            kind: Some(plan.kind),
        });
        let events = simulation.submit(Command::PlaceTowerAt { position: center });
        match events.first() {
            Some(Event::TowerPlaced { tower, cost, .. }) => {
                info!(tower = tower.get(), kind = %plan.kind, cost, "tower bought");
            }
            Some(Event::TowerPlacementRejected { reason, .. }) => {
                warn!(
                    kind = %plan.kind,
                    column = plan.tile.column(),
                    row = plan.tile.row(),
                    %reason,
                    "tower skipped"
                );
            }
            _ => {}
        }
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<Summary> {
    if cli.frame_ms == 0 {
        bail!("--frame-ms must be positive");
    }
    let max_time = Duration::try_from_secs_f64(cli.max_seconds)
        .context("--max-seconds must be a non-negative number")?;
    let frame = Duration::from_millis(cli.frame_ms);

    let config = load_config(cli.config.as_ref())?;
    let tally = RefCell::new(Tally::default());
    let mut simulation = Simulation::new(config).context("failed to build world")?;
    let _ = simulation.subscribe(|event| tally.borrow_mut().record(event));

    prepare(&mut simulation, cli)?;
    let _ = simulation.submit(Command::StartNextWave);

    while simulation.is_running() && query::simulated_time(simulation.world()) < max_time {
        let progress = query::wave_progress(simulation.world());
        if cli.auto_waves && !progress.in_progress && progress.started < progress.total {
            let _ = simulation.submit(Command::StartNextWave);
        } else if !cli.auto_waves && !progress.in_progress {
            break;
        }
        let _ = simulation.advance(frame);
    }

    let world = simulation.world();
    let progress = query::wave_progress(world);
    let tally = tally.borrow();
    Ok(Summary {
        outcome: phase_label(query::phase(world)),
        difficulty: query::difficulty(world),
        waves_started: progress.started,
        waves_total: progress.total,
        waves_cleared: tally.waves_cleared,
        gold: query::gold(world),
        lives: query::lives(world),
        towers: query::tower_view(world).len(),
        enemies_spawned: tally.spawned,
        enemies_killed: tally.killed,
        enemies_leaked: tally.leaked,
        shots_fired: tally.shots,
        hits: tally.hits,
        simulated_seconds: query::simulated_time(world).as_secs_f64(),
    })
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let summary = run(&cli)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} on {}: waves {}/{} cleared, lives {}, gold {}, killed {}, leaked {}, {:.1}s simulated",
            summary.outcome,
            summary.difficulty,
            summary.waves_cleared,
            summary.waves_total,
            summary.lives,
            summary.gold,
            summary.enemies_killed,
            summary.enemies_leaked,
            summary.simulated_seconds,
        );
    }
    Ok(())
}
