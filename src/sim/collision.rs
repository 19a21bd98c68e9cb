//! Boundary reflection and circle overlap
//!
//! Walls are the four edges of the field. A body whose edge crosses a wall
//! is clamped back onto it and the matching velocity component flips sign.
//! Each axis is handled on its own, so a corner hit flips both.

use glam::Vec2;

use super::body::{Body, Field};

/// Reflect one axis. Returns the (position, velocity) pair after the bounce.
///
/// The low wall is tested first; the high wall is only considered when the
/// low one was not crossed.
#[inline]
fn reflect_axis(pos: f32, vel: f32, radius: f32, extent: f32) -> (f32, f32) {
    if pos - radius < 0.0 {
        (radius, -vel)
    } else if pos + radius > extent {
        (extent - radius, -vel)
    } else {
        (pos, vel)
    }
}

/// Bounce a body off the field walls
pub fn reflect_in_field(body: &Body, field: Field) -> Body {
    let (x, vx) = reflect_axis(body.pos.x, body.vel.x, body.radius, field.width);
    let (y, vy) = reflect_axis(body.pos.y, body.vel.y, body.radius, field.height);
    Body {
        pos: Vec2::new(x, y),
        vel: Vec2::new(vx, vy),
        radius: body.radius,
    }
}

/// Circle-circle overlap (touching does not count)
#[inline]
pub fn collides(a: &Body, b: &Body) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Whether the player overlaps any enemy. Stops at the first hit.
pub fn any_collision(player: &Body, enemies: &[Body]) -> bool {
    enemies.iter().any(|enemy| collides(player, enemy))
}
