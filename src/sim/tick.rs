//! Fixed timestep simulation tick
//!
//! `step` is the pure physics core. `tick` wraps it with the per-frame
//! policy: level-ups, spawning, despawning, and ending the run on contact.

use glam::Vec2;

use super::body::{Body, Field};
use super::collision::{any_collision, reflect_in_field};
use super::level::level_config;
use super::spawn::spawn_enemy;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drag delta since the last tick
    pub drag: Option<Vec2>,
    /// Start a new run (menu / result screen)
    pub start: bool,
    /// Leave the current run without recording it
    pub quit: bool,
    /// Return to the menu from any non-playing screen
    pub back: bool,
    /// Open the leaderboard from the menu
    pub show_high_scores: bool,
    /// Open the last result from the menu
    pub show_stats: bool,
}

/// Bodies after one step, and whether the player was hit
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub player: Body,
    pub enemies: Vec<Body>,
    pub hit: bool,
}

/// Advance bodies by one tick: integrate, bounce off the walls, test contact
pub fn step(player: &Body, enemies: &[Body], field: Field) -> StepOutcome {
    let player = reflect_in_field(&player.integrated(), field);
    let enemies: Vec<Body> = enemies
        .iter()
        .map(|e| reflect_in_field(&e.integrated(), field))
        .collect();
    let hit = any_collision(&player, &enemies);
    StepOutcome {
        player,
        enemies,
        hit,
    }
}

/// Apply a drag gesture to the player's velocity.
///
/// The result is held inside the speed band; a zero velocity stays zero.
pub fn steer(vel: Vec2, drag: Vec2) -> Vec2 {
    let vel = vel + drag * STEER_SENSITIVITY;
    let speed = vel.length();
    if speed > PLAYER_MAX_SPEED {
        vel * (PLAYER_MAX_SPEED / speed)
    } else if speed > 0.0 && speed < PLAYER_MIN_SPEED {
        vel * (PLAYER_MIN_SPEED / speed)
    } else {
        vel
    }
}

/// Drop enemies whose center has drifted past the despawn margin.
/// Bodies on or near the walls are kept.
pub fn despawn_escaped(mut enemies: Vec<Body>, field: Field) -> Vec<Body> {
    enemies.retain(|e| field.contains_with_margin(e.pos, DESPAWN_MARGIN));
    enemies
}

/// Advance the game state by one tick. Returns what happened.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::Waiting => {
            if input.start {
                state.start();
                events.push(GameEvent::Started);
            } else if input.show_high_scores {
                state.phase = GamePhase::HighScores;
            } else if input.show_stats {
                state.phase = GamePhase::Stats;
            }
        }
        GamePhase::Stats | GamePhase::GameOver | GamePhase::HighScores => {
            if input.back {
                state.phase = GamePhase::Waiting;
            }
        }
        GamePhase::Playing => {
            if input.quit {
                state.enemies.clear();
                state.phase = GamePhase::GameOver;
                events.push(GameEvent::Abandoned);
                log::info!("Run abandoned at level {}", state.level);
            } else {
                advance(state, input, &mut events);
            }
        }
    }

    events
}

fn advance(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let field = state.field;

    if let Some(drag) = input.drag {
        state.player.vel = steer(state.player.vel, drag);
    }

    state.frame += 1;
    let outcome = step(&state.player, &state.enemies, field);
    let mut enemies = outcome.enemies;
    let mut spawned = Vec::new();

    // Level-up with a catch-up burst toward the new population target
    if state.score_ticks > 0 && state.score_ticks % LEVEL_UP_TICKS == 0 {
        state.level += 1;
        let config = level_config(state.level);
        let missing = config.enemy_count.saturating_sub(enemies.len());
        for _ in 0..missing.min(LEVEL_UP_BURST) {
            spawned.push(spawn_enemy(field, &config, &mut state.rng));
        }
        events.push(GameEvent::LevelUp { level: state.level });
        log::info!("Level up: {} (target {} enemies)", state.level, config.enemy_count);
    }

    let config = state.config();
    if state.frame % config.spawn_rate as u64 == 0
        && enemies.len() + spawned.len() < config.enemy_count
    {
        spawned.push(spawn_enemy(field, &config, &mut state.rng));
        events.push(GameEvent::EnemySpawned);
        log::debug!("Spawned enemy #{}", enemies.len() + spawned.len());
    }

    // Fresh spawns have not moved yet but can still land on the player
    let hit = outcome.hit || any_collision(&outcome.player, &spawned);

    enemies.extend(spawned);

    state.player = outcome.player;
    state.enemies = despawn_escaped(enemies, field);

    if hit {
        let result = state.result();
        log::info!(
            "Run ended: score {}, level {}, {}s",
            result.score,
            result.level,
            result.time_seconds
        );
        state.enemies.clear();
        state.last_result = Some(result.clone());
        state.phase = GamePhase::Stats;
        events.push(GameEvent::GameEnded(result));
        return;
    }

    state.score_ticks += 1;
}
