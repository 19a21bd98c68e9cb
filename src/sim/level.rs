//! Difficulty table
//!
//! Difficulty ramps in three bands (levels 1-5, 6-10, 11+). Within a band
//! every parameter moves linearly; spawn interval is floored per band.

use serde::{Deserialize, Serialize};

/// Difficulty parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: u32,
    /// Target number of enemies alive at once
    pub enemy_count: usize,
    /// Enemy speed before per-enemy jitter (units per tick)
    pub base_enemy_speed: f32,
    /// Scales the randomized enemy radius
    pub enemy_size_multiplier: f32,
    /// Ticks between spawn attempts
    pub spawn_rate: u32,
}

/// Derive the difficulty parameters for a level. Level 0 is read as level 1.
pub fn level_config(level: u32) -> LevelConfig {
    let level = level.max(1);
    let l = level as i64;
    let lf = level as f32;

    let (enemy_count, base_enemy_speed, enemy_size_multiplier, spawn_rate) = if level <= 5 {
        (
            8 + (l - 1) * 3,
            2.0 + lf * 0.4,
            1.0,
            (60 - l * 8).max(20),
        )
    } else if level <= 10 {
        (
            20 + (l - 5) * 5,
            4.0 + (lf - 5.0) * 0.5,
            0.8,
            (40 - (l - 5) * 5).max(15),
        )
    } else {
        (
            45 + (l - 10) * 4,
            6.5 + (lf - 10.0) * 0.3,
            0.6,
            (20 - (l - 10)).max(10),
        )
    };

    LevelConfig {
        level,
        enemy_count: enemy_count as usize,
        base_enemy_speed,
        enemy_size_multiplier,
        spawn_rate: spawn_rate as u32,
    }
}
