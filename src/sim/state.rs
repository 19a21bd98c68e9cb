//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Field};
use super::level::{LevelConfig, level_config};
use super::spawn::initial_enemies;
use crate::consts::*;
use crate::stats::GameStats;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu, nothing simulated
    Waiting,
    /// Active gameplay; the only phase in which ticks advance the world
    Playing,
    /// Result screen after a collision (or reviewing the last result)
    Stats,
    /// Run abandoned without a result
    GameOver,
    /// Leaderboard view
    HighScores,
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new run began
    Started,
    /// Score crossed a level boundary
    LevelUp { level: u32 },
    /// An enemy entered the field
    EnemySpawned,
    /// The player was hit; the run is over
    GameEnded(GameStats),
    /// The player quit mid-run
    Abandoned,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn randomness
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Play field
    pub field: Field,
    /// Player body
    pub player: Body,
    /// Live enemies
    pub enemies: Vec<Body>,
    /// Current level (1-based)
    pub level: u32,
    /// Frames processed this run; drives spawn timing
    pub frame: u64,
    /// Ticks survived this run; drives score and level-ups
    pub score_ticks: u64,
    /// Result of the most recent finished run
    pub last_result: Option<GameStats>,
}

impl GameState {
    /// Create a new game state waiting at the menu
    pub fn new(seed: u64, field: Field) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Waiting,
            field,
            player: Body::player(),
            enemies: Vec::new(),
            level: 1,
            frame: 0,
            score_ticks: 0,
            last_result: None,
        }
    }

    /// Difficulty for the current level
    pub fn config(&self) -> LevelConfig {
        level_config(self.level)
    }

    /// Reset the run and enter `Playing`
    pub fn start(&mut self) {
        let config = level_config(1);
        let enemies = initial_enemies(self.field, &config, &mut self.rng);
        *self = Self {
            seed: self.seed,
            rng: self.rng.clone(),
            phase: GamePhase::Playing,
            field: self.field,
            player: Body::player(),
            enemies,
            level: 1,
            frame: 0,
            score_ticks: 0,
            last_result: self.last_result.clone(),
        };
        log::info!(
            "Run started: field {}x{}, {} enemies",
            self.field.width,
            self.field.height,
            self.enemies.len()
        );
    }

    /// Whole seconds survived, as shown to the player
    pub fn score(&self) -> u32 {
        (self.score_ticks / TICK_RATE as u64) as u32
    }

    /// Seconds of game time elapsed this run
    pub fn elapsed_seconds(&self) -> u32 {
        self.score()
    }

    /// Fraction of the way to the next level, in [0, 1)
    pub fn level_progress(&self) -> f32 {
        (self.score_ticks % LEVEL_UP_TICKS) as f32 / LEVEL_UP_TICKS as f32
    }

    /// Snapshot of the current run as a result record
    pub fn result(&self) -> GameStats {
        GameStats::new(self.score(), self.level, self.elapsed_seconds())
    }

    /// Whether ticks still advance the world
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}
