//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Whole-list replacement of bodies each tick
//! - No rendering, platform, or storage dependencies

pub mod body;
pub mod collision;
pub mod level;
pub mod spawn;
pub mod state;
pub mod tick;

pub use body::{Body, Field};
pub use collision::{any_collision, collides, reflect_in_field};
pub use level::{LevelConfig, level_config};
pub use spawn::{SpawnMode, initial_enemies, spawn_enemy};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{StepOutcome, TickInput, despawn_escaped, steer, step, tick};
