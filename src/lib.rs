//! Dodge Arena - steer around a growing swarm of bouncing enemies
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, reflection, spawning, levels)
//! - `stats`: Per-game results and global counters
//! - `highscores`: Leaderboard records and merging
//! - `persistence`: Local/remote score storage with best-effort sync
//! - `settings`: User configuration
//! - `calculator`, `graph`: Small companion tools

pub mod calculator;
pub mod graph;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod stats;

pub use highscores::{HighScore, HighScores};
pub use settings::Settings;
pub use stats::{GameStats, TotalStats};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (ticks per second of game time)
    pub const TICK_RATE: u32 = 60;
    /// Nominal frame interval for real-time drivers (ms)
    pub const FRAME_MS: u64 = 16;

    /// Default play field, used until a real field size is known
    pub const DEFAULT_FIELD_WIDTH: f32 = 400.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 200.0;
    pub const PLAYER_START_Y: f32 = 200.0;
    pub const PLAYER_START_VEL: f32 = 3.0;
    pub const PLAYER_RADIUS: f32 = 40.0;

    /// Drag-to-velocity gain
    pub const STEER_SENSITIVITY: f32 = 0.3;
    /// Player speed band after steering
    pub const PLAYER_MIN_SPEED: f32 = 2.0;
    pub const PLAYER_MAX_SPEED: f32 = 8.0;

    /// Score ticks per level (30 s at 60 Hz)
    pub const LEVEL_UP_TICKS: u64 = 1800;
    /// Max enemies added in one burst on level-up
    pub const LEVEL_UP_BURST: usize = 5;
    /// Size of the first enemy wave
    pub const INITIAL_ENEMIES: usize = 5;

    /// Enemies further than this outside the field are dropped
    pub const DESPAWN_MARGIN: f32 = 150.0;
    /// Edge spawns appear this far outside the field
    pub const EDGE_SPAWN_OFFSET: f32 = 30.0;
    /// Interior spawns keep this distance from the edges
    pub const INTERIOR_SPAWN_MARGIN: f32 = 40.0;

    /// Enemy radius range before the level size multiplier
    pub const ENEMY_MIN_RADIUS: f32 = 20.0;
    pub const ENEMY_MAX_RADIUS: f32 = 35.0;
    /// Enemy speed jitter around the level base speed
    pub const ENEMY_SPEED_JITTER: f32 = 0.75;
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Milliseconds since the Unix epoch (0 if the clock is before it)
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Format a duration in whole seconds as "Mm Ss"
pub fn format_duration(seconds: u32) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}
