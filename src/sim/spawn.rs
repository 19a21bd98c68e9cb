//! Enemy factory
//!
//! Enemies enter from just beyond one of the four edges or appear somewhere
//! inside the field. All randomness comes from the caller's `Rng` so a seeded
//! generator replays the same spawns.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::body::{Body, Field};
use super::level::LevelConfig;
use crate::consts::*;
use crate::direction;

/// Where a new enemy is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Just outside the left or right edge, random height
    SideEdge,
    /// Just outside the top or bottom edge, random width
    TopBottomEdge,
    /// Anywhere inside, away from the walls
    Interior,
}

impl SpawnMode {
    fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..3) {
            0 => SpawnMode::SideEdge,
            1 => SpawnMode::TopBottomEdge,
            _ => SpawnMode::Interior,
        }
    }
}

fn spawn_position<R: Rng + ?Sized>(mode: SpawnMode, field: Field, rng: &mut R) -> Vec2 {
    match mode {
        SpawnMode::SideEdge => {
            let y = rng.random::<f32>() * field.height;
            if rng.random_bool(0.5) {
                Vec2::new(-EDGE_SPAWN_OFFSET, y)
            } else {
                Vec2::new(field.width + EDGE_SPAWN_OFFSET, y)
            }
        }
        SpawnMode::TopBottomEdge => {
            let x = rng.random::<f32>() * field.width;
            if rng.random_bool(0.5) {
                Vec2::new(x, -EDGE_SPAWN_OFFSET)
            } else {
                Vec2::new(x, field.height + EDGE_SPAWN_OFFSET)
            }
        }
        SpawnMode::Interior => {
            let span = field.size() - Vec2::splat(2.0 * INTERIOR_SPAWN_MARGIN);
            Vec2::new(
                rng.random::<f32>() * span.x + INTERIOR_SPAWN_MARGIN,
                rng.random::<f32>() * span.y + INTERIOR_SPAWN_MARGIN,
            )
        }
    }
}

/// Create one enemy for the given level
pub fn spawn_enemy<R: Rng + ?Sized>(field: Field, config: &LevelConfig, rng: &mut R) -> Body {
    let angle = rng.random_range(0.0..TAU);
    let jitter = rng.random_range(-ENEMY_SPEED_JITTER..ENEMY_SPEED_JITTER);
    let speed = config.base_enemy_speed + jitter;

    let mode = SpawnMode::pick(rng);
    let pos = spawn_position(mode, field, rng);

    let radius =
        rng.random_range(ENEMY_MIN_RADIUS..ENEMY_MAX_RADIUS) * config.enemy_size_multiplier;

    Body::new(pos, direction(angle) * speed, radius)
}

/// The opening wave: up to five enemies, never more than the level target
pub fn initial_enemies<R: Rng + ?Sized>(
    field: Field,
    config: &LevelConfig,
    rng: &mut R,
) -> Vec<Body> {
    let count = INITIAL_ENEMIES.min(config.enemy_count);
    (0..count).map(|_| spawn_enemy(field, config, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::level_config;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_same_seed_same_enemy() {
        let field = Field::new(400.0, 800.0);
        let cfg = level_config(3);
        let a = spawn_enemy(field, &cfg, &mut Pcg32::seed_from_u64(7));
        let b = spawn_enemy(field, &cfg, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_enemy_ranges() {
        let field = Field::new(400.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(42);
        for level in [1, 6, 12] {
            let cfg = level_config(level);
            for _ in 0..500 {
                let e = spawn_enemy(field, &cfg, &mut rng);

                let min_r = ENEMY_MIN_RADIUS * cfg.enemy_size_multiplier;
                let max_r = ENEMY_MAX_RADIUS * cfg.enemy_size_multiplier;
                assert!(e.radius >= min_r && e.radius <= max_r);

                let speed = e.speed();
                assert!(speed >= cfg.base_enemy_speed - ENEMY_SPEED_JITTER - 1e-4);
                assert!(speed <= cfg.base_enemy_speed + ENEMY_SPEED_JITTER + 1e-4);

                assert!(field.contains_with_margin(e.pos, EDGE_SPAWN_OFFSET));
            }
        }
    }

    #[test]
    fn test_all_modes_show_up() {
        let field = Field::new(400.0, 800.0);
        let cfg = level_config(1);
        let mut rng = Pcg32::seed_from_u64(1);
        let (mut outside_x, mut outside_y, mut inside) = (0, 0, 0);
        for _ in 0..300 {
            let e = spawn_enemy(field, &cfg, &mut rng);
            if e.pos.x < 0.0 || e.pos.x > field.width {
                outside_x += 1;
            } else if e.pos.y < 0.0 || e.pos.y > field.height {
                outside_y += 1;
            } else {
                assert!(e.pos.x >= INTERIOR_SPAWN_MARGIN && e.pos.x <= field.width - INTERIOR_SPAWN_MARGIN);
                assert!(e.pos.y >= INTERIOR_SPAWN_MARGIN && e.pos.y <= field.height - INTERIOR_SPAWN_MARGIN);
                inside += 1;
            }
        }
        assert!(outside_x > 0 && outside_y > 0 && inside > 0);
    }

    #[test]
    fn test_initial_wave_size() {
        let field = Field::default();
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(initial_enemies(field, &level_config(1), &mut rng).len(), 5);

        let tiny = LevelConfig {
            enemy_count: 2,
            ..level_config(1)
        };
        assert_eq!(initial_enemies(field, &tiny, &mut rng).len(), 2);
    }
}
