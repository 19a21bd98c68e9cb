//! Kinematic bodies and the rectangular play field
//!
//! Player and enemies share one representation: a circle with a position
//! and a per-tick velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned play field spanning `[0, width] × [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Field dimensions as a vector
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether a point lies within the field grown by `margin` on every side
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        (-margin..=self.width + margin).contains(&point.x)
            && (-margin..=self.height + margin).contains(&point.y)
    }
}

/// A circular body moving at constant velocity between reflections
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// The player as it appears at the start of every game
    pub fn player() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: Vec2::splat(PLAYER_START_VEL),
            radius: PLAYER_RADIUS,
        }
    }

    /// Position after one tick of free flight
    #[inline]
    pub fn integrated(&self) -> Self {
        Self {
            pos: self.pos + self.vel,
            ..*self
        }
    }

    /// Current speed (units per tick)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
