//! Dodge Arena entry point
//!
//! Headless driver for the simulation plus the score, calculator and plot
//! tools.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use glam::Vec2;

use dodge_arena::calculator::{Operation, calculate};
use dodge_arena::consts::*;
use dodge_arena::graph::{Plot, PlotRange, parabola};
use dodge_arena::highscores::format_date;
use dodge_arena::persistence::{DirRemote, Job, Offline, Persister, RemoteStore, ScoreService};
use dodge_arena::sim::{GameEvent, GameState, TickInput, tick};
use dodge_arena::{GameStats, Settings, format_duration, now_millis};

#[derive(Parser)]
#[command(author, version, about = "Dodge the bouncing swarm", long_about = None)]
struct Cli {
    /// Settings file (defaults to settings.json in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the data directory from the settings file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run one game with the autopilot at the controls
    Play {
        /// Save the result under this name instead of the configured one
        #[arg(long)]
        name: Option<String>,
        /// Seed for this run (overrides the settings file)
        #[arg(long)]
        seed: Option<u64>,
        /// Give up after this many seconds of game time
        #[arg(long, default_value_t = 600)]
        max_seconds: u32,
        /// Pace ticks at the nominal frame interval
        #[arg(long)]
        realtime: bool,
    },
    /// Show the leaderboard
    Scores {
        /// List every saved result for one player instead
        #[arg(long)]
        player: Option<String>,
        /// List the best saved results across all players
        #[arg(long)]
        all: bool,
        /// Delete all saved results (the top-10 table is kept)
        #[arg(long)]
        clear: bool,
    },
    /// Show lifetime counters
    Stats,
    /// Evaluate `<a> <op> <b>`
    Calc {
        #[arg(allow_hyphen_values = true)]
        a: String,
        op: String,
        #[arg(allow_hyphen_values = true)]
        b: String,
    },
    /// Print samples of y = 1 - x²
    Plot {
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        min: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        max: String,
        /// Number of points to print
        #[arg(long, default_value_t = 11)]
        samples: usize,
        /// Print canvas coordinates for a canvas this wide
        #[arg(long, requires = "height")]
        width: Option<f32>,
        /// Canvas height (with --width)
        #[arg(long, requires = "width")]
        height: Option<f32>,
    },
}

fn load_settings(cli: &Cli) -> Settings {
    let path = match (&cli.config, &cli.data_dir) {
        (Some(path), _) => path.clone(),
        (None, Some(dir)) => dir.join(Settings::FILE_NAME),
        (None, None) => Settings::default_path(),
    };
    let mut settings = Settings::load(&path);
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    settings
}

fn open_service(settings: &Settings) -> ScoreService {
    let remote: Box<dyn RemoteStore> = match &settings.remote_dir {
        Some(dir) => Box::new(DirRemote::new(dir)),
        None => Box::new(Offline),
    };
    ScoreService::open(&settings.data_dir, remote)
}

/// Push away from the closest enemy, with a weak pull toward the middle
fn autopilot(state: &GameState) -> Vec2 {
    let player = state.player.pos;
    let center = state.field.size() * 0.5;
    let to_center = (center - player).normalize_or_zero();

    let threat = state
        .enemies
        .iter()
        .map(|e| (e.pos, player.distance(e.pos) - e.radius - state.player.radius))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match threat {
        Some((pos, gap)) if gap < 120.0 => {
            let away = (player - pos).normalize_or_zero();
            away * 6.0 + to_center
        }
        _ => to_center,
    }
}

fn play(
    settings: &Settings,
    name: Option<String>,
    seed: Option<u64>,
    max_seconds: u32,
    realtime: bool,
) -> Result<()> {
    let seed = seed.or(settings.seed).unwrap_or_else(rand::random);
    let mut state = GameState::new(seed, settings.field());
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );
    println!("Seed {seed}, field {}x{}", state.field.width, state.field.height);

    let max_ticks = u64::from(max_seconds) * u64::from(TICK_RATE);
    let realtime = realtime || settings.realtime;
    let mut result: Option<GameStats> = None;

    while state.is_playing() {
        let input = TickInput {
            drag: Some(autopilot(&state)),
            quit: state.score_ticks >= max_ticks,
            ..Default::default()
        };
        for event in tick(&mut state, &input) {
            match event {
                GameEvent::LevelUp { level } => println!("Level {level}"),
                GameEvent::GameEnded(run) => result = Some(run),
                GameEvent::Abandoned => {
                    println!("Stopped after {} without a hit", format_duration(max_seconds))
                }
                GameEvent::Started | GameEvent::EnemySpawned => {}
            }
        }
        if realtime {
            thread::sleep(Duration::from_millis(FRAME_MS));
        }
    }

    let Some(run) = result else {
        return Ok(());
    };
    println!(
        "Game over: {} pts, level {}, {}",
        run.score,
        run.level,
        format_duration(run.time_seconds)
    );

    let service = Arc::new(open_service(settings));
    if let Some(rank) = service.local_rank(run.score) {
        println!("New local high score: #{rank}");
    }

    let persister = Persister::spawn(service).context("starting persistence worker")?;
    persister.submit(Job::RecordRun(run.clone()));
    persister.submit(Job::SaveScore {
        player_name: settings.score_name(name),
        run,
    });
    persister.shutdown();
    Ok(())
}

fn scores(settings: &Settings, player: Option<String>, all: bool, clear: bool) -> Result<()> {
    let service = open_service(settings);

    if clear {
        service.clear_records().context("clearing saved results")?;
        println!("Saved results cleared");
        return Ok(());
    }

    if let Some(name) = player {
        let rows = service.player_records(&name);
        if rows.is_empty() {
            println!("No results for {name}");
        }
        for row in rows {
            println!(
                "#{:<4} {:>6} pts  level {:<3} {}",
                row.id,
                row.score,
                row.level,
                format_duration(row.time_seconds)
            );
        }
        return Ok(());
    }

    let now = now_millis();
    if all {
        let best = service.top_records(10);
        if best.is_empty() {
            println!("No saved results");
        }
        for (rank, entry) in best.iter().enumerate() {
            println!("{:>2}. {}  ({})", rank + 1, entry.summary(), format_date(entry.date, now));
        }
        return Ok(());
    }

    let board = service.high_scores();
    if board.is_empty() {
        println!("No high scores yet");
    }
    for (rank, entry) in board.iter().enumerate() {
        println!("{:>2}. {}  ({})", rank + 1, entry.summary(), format_date(entry.date, now));
    }

    if let (Some(best), Some(mean)) = service.score_summary() {
        println!("All results: best {best}, average {mean:.1}");
    }
    Ok(())
}

fn stats(settings: &Settings) -> Result<()> {
    let totals = open_service(settings).totals();
    println!("Games played: {}", totals.total_games);
    println!("Time played:  {}", format_duration(totals.total_time_seconds));
    println!("Best level:   {}", totals.best_level);
    println!("Best score:   {}", totals.best_score);
    Ok(())
}

fn plot(min: &str, max: &str, samples: usize, canvas: Option<(f32, f32)>) -> Result<()> {
    if samples < 2 {
        bail!("need at least 2 samples, got {samples}");
    }
    let range = PlotRange::parse(min, max);
    let plot = Plot::sample_n(range, samples - 1, parabola);
    println!(
        "y = 1 - x² on [{}, {}], y in [{:.3}, {:.3}]",
        range.x_min, range.x_max, plot.y_min, plot.y_max
    );
    match canvas {
        Some((width, height)) => {
            for (p, c) in plot.points.iter().zip(plot.to_canvas(width, height)) {
                println!("{:>10.4} {:>10.4}  -> {:>8.1} {:>8.1}", p.x, p.y, c.x, c.y);
            }
        }
        None => {
            for p in &plot.points {
                println!("{:>10.4} {:>10.4}", p.x, p.y);
            }
        }
    }

    let fmt_ticks = |ticks: Vec<f32>| {
        ticks
            .iter()
            .map(|t| format!("{t:.2}"))
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!("x ticks: {}", fmt_ticks(plot.x_ticks()));
    println!("y ticks: {}", fmt_ticks(plot.y_ticks()));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let settings = load_settings(&cli);
    log::debug!("Data directory: {}", settings.data_dir.display());

    match cli.cmd {
        Cmd::Play {
            name,
            seed,
            max_seconds,
            realtime,
        } => play(&settings, name, seed, max_seconds, realtime),
        Cmd::Scores { player, all, clear } => scores(&settings, player, all, clear),
        Cmd::Stats => stats(&settings),
        Cmd::Calc { a, op, b } => {
            let operation = op.parse::<Operation>().with_context(|| {
                let symbols: Vec<&str> = Operation::ALL.iter().map(|o| o.symbol()).collect();
                format!("expected one of {}", symbols.join(" "))
            })?;
            let calc = calculate(&a, &b, operation)?;
            println!("{calc}");
            Ok(())
        }
        Cmd::Plot {
            min,
            max,
            samples,
            width,
            height,
        } => plot(&min, &max, samples, width.zip(height)),
    }
}
