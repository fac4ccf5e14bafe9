//! Entity physics module
//!
//! Free-standing ball/paddle entities plus collision resolution. This
//! module is pure simulation: no rendering, no platform dependencies, and
//! all randomness comes from a seeded RNG owned by the caller.

pub mod ball;
pub mod collision;
pub mod paddle;
pub mod scene;

pub use ball::Ball;
pub use collision::{ball_hits_paddle, deflect_off_paddle, resolve_wall_contact, serve_direction};
pub use paddle::Paddle;
pub use scene::{Scene, Table};

/// Which end of the table a paddle (or player) occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}
