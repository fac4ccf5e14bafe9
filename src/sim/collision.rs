//! Collision detection and response for the rally
//!
//! Paddle-ball contact is a sphere-vs-box overlap with inclusive bounds: a
//! ball center exactly on the boundary counts as a hit, so grazing contacts
//! at low frame rates cannot tunnel through. Every outgoing direction is
//! clamped into a bounded cone around the horizontal axis, which keeps the
//! direction unit length with a non-zero X component at all times.

use glam::Vec3;
use rand::Rng;

use super::{Ball, Paddle, Side};
use crate::consts::*;

/// Sphere-vs-box overlap test (inclusive on ties)
pub fn ball_hits_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    let closest = ball
        .position()
        .clamp(paddle.min_corner(), paddle.max_corner());
    (ball.position() - closest).length_squared() <= ball.radius() * ball.radius()
}

/// Pseudo-randomized serve: a unit vector in the table plane within the
/// serve cone, aimed at the given side. The horizontal component can never
/// vanish, so a serve cannot degenerate into a perpetual lateral bounce.
pub fn serve_direction(rng: &mut impl Rng, toward: Side) -> Vec3 {
    let cone = SERVE_CONE_DEG.to_radians();
    let offset = rng.random_range(-cone..=cone);
    direction_in_cone(offset, toward)
}

/// Paddle bounce: reflect the X component, perturb the lateral angle by a
/// bounded random offset, and renormalize by reconstructing from the angle.
/// `struck` names the paddle that was hit; the ball departs toward the
/// opposite side.
pub fn deflect_off_paddle(direction: Vec3, struck: Side, rng: &mut impl Rng) -> Vec3 {
    let departing = struck.opposite();
    let reflected = Vec3::new(-direction.x, direction.y, 0.0);
    let theta = reflected.y.atan2(reflected.x);
    let jitter = rng.random_range(-BOUNCE_JITTER_RAD..=BOUNCE_JITTER_RAD);
    let offset = angle_from_axis(theta + jitter, departing);
    direction_in_cone(offset, departing)
}

/// Reflect the lateral component if the ball touches a side wall
/// (inclusive) while moving outward. Corrects the position back onto the
/// wall so repeated frames cannot re-trigger the bounce.
pub fn resolve_wall_contact(ball: &mut Ball) -> bool {
    let limit = TABLE_HALF_WIDTH - ball.radius();
    let position = ball.position();
    let direction = ball.direction();

    if position.y >= limit && direction.y > 0.0 {
        ball.set_position(Vec3::new(position.x, limit, position.z));
        ball.set_direction(Vec3::new(direction.x, -direction.y, direction.z));
        return true;
    }
    if position.y <= -limit && direction.y < 0.0 {
        ball.set_position(Vec3::new(position.x, -limit, position.z));
        ball.set_direction(Vec3::new(direction.x, -direction.y, direction.z));
        return true;
    }
    false
}

/// Angle of `theta` measured from the departing axis, wrapped to [-pi, pi)
fn angle_from_axis(theta: f32, toward: Side) -> f32 {
    use std::f32::consts::{PI, TAU};
    let axis = match toward {
        Side::Right => 0.0,
        Side::Left => PI,
    };
    let mut rel = theta - axis;
    while rel >= PI {
        rel -= TAU;
    }
    while rel < -PI {
        rel += TAU;
    }
    rel
}

/// Unit direction at `offset` radians from the departing axis, clamped
/// into the serve cone. The offset convention matches `angle_from_axis`,
/// so clamp(reconstruct(angle)) round-trips.
fn direction_in_cone(offset: f32, toward: Side) -> Vec3 {
    use std::f32::consts::PI;
    let cone = SERVE_CONE_DEG.to_radians();
    let offset = offset.clamp(-cone, cone);
    let theta = match toward {
        Side::Right => offset,
        Side::Left => PI + offset,
    };
    Vec3::new(theta.cos(), theta.sin(), 0.0)
}
