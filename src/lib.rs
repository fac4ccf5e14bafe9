//! Teapong - a 3D Pong-style arcade game
//!
//! Core modules:
//! - `sim`: Ball/paddle physics and the shared scene context
//! - `states`: Finite state machine driving menu/play/pause/win
//! - `renderer`: wgpu multisample render pipeline (MSAA target -> resolve -> composite)
//! - `platform`: Windowing-agnostic input snapshot and window control surface
//! - `settings`: Runtime-tunable settings with JSON persistence

pub mod audio;
pub mod camera;
pub mod capture;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod states;

pub use game::Game;
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
///
/// The world is Z-up: the table lies in the XY plane, paddles face each
/// other along X and slide along Y, and a lost ball free-falls along -Z.
pub mod consts {
    /// Table half-extent along X (the paddle-to-paddle axis)
    pub const TABLE_HALF_LENGTH: f32 = 30.0;
    /// Table half-extent along Y (the side walls the ball bounces off)
    pub const TABLE_HALF_WIDTH: f32 = 15.0;
    /// Visual thickness of the table slab
    pub const TABLE_THICKNESS: f32 = 1.5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 1.0;
    pub const BALL_SPEED: f32 = 22.0;
    /// Serve directions stay within this half-angle of the X axis
    pub const SERVE_CONE_DEG: f32 = 60.0;
    /// Maximum lateral perturbation added on a paddle bounce (radians)
    pub const BOUNCE_JITTER_RAD: f32 = 0.35;

    /// Paddle defaults - each paddle slides along Y at a fixed X offset
    pub const PADDLE_X_OFFSET: f32 = 28.0;
    pub const PADDLE_HALF_EXTENTS: [f32; 3] = [0.75, 3.5, 1.5];
    pub const PADDLE_SPEED: f32 = 25.0;

    /// Points needed to win a session
    pub const POINTS_TO_WIN: u32 = 3;

    /// Downward acceleration once the ball leaves the table (units/s^2)
    pub const FREE_FALL_ACCELERATION: f32 = 45.0;
    /// Below this Z the fall ends and the point is awarded
    pub const FLOOR_Z: f32 = -45.0;

    /// Win-sequence tuning
    pub const WIN_BALL_RADIUS: f32 = 7.5;
    pub const EXPLOSION_DELAY_SECS: f32 = 3.0;
    pub const EXPLOSION_START_SPEED: f32 = 2.0;
    /// Fragment speed growth in units/s^2. The original build added a fixed
    /// 0.025 per rendered frame; this is the same growth at 60 Hz, scaled
    /// by delta time so the animation is frame-rate independent.
    pub const EXPLOSION_ACCELERATION: f32 = 1.5;
    /// Fragment travel distance that ends the win sequence
    pub const EXPLOSION_END_DISTANCE: f32 = 120.0;
    /// Showcase camera orbit speed (degrees/s, negative = clockwise from above)
    pub const ORBIT_ANGULAR_VELOCITY_DEG: f32 = -50.0;

    /// Sample counts the render targets can be configured with
    pub const SUPPORTED_SAMPLE_COUNTS: [u32; 4] = [1, 2, 4, 8];
    pub const DEFAULT_SAMPLE_COUNT: u32 = 4;
}

/// Reflect a vector off a surface with the given normal: v' = v - 2(v.n)n
#[inline]
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - 2.0 * v.dot(normal) * normal
}

/// Rotate a point around the +Z axis by an angle in degrees
#[inline]
pub fn orbit_about_z(point: Vec3, angle_deg: f32) -> Vec3 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Vec3::new(
        point.x * cos - point.y * sin,
        point.x * sin + point.y * cos,
        point.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_head_on() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        let n = Vec3::new(-1.0, 0.0, 0.0);
        let r = reflect(v, n);
        assert!((r.x - (-1.0)).abs() < 1e-6);
        assert!(r.y.abs() < 1e-6);
    }

    #[test]
    fn test_reflect_preserves_length() {
        let v = Vec3::new(0.6, -0.8, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = reflect(v, n);
        assert!((r.length() - v.length()).abs() < 1e-6);
        assert!((r.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_about_z_quarter_turn() {
        let p = orbit_about_z(Vec3::new(1.0, 0.0, 5.0), 90.0);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
        assert!((p.z - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_about_z_full_turn() {
        let start = Vec3::new(0.0, -30.0, 10.0);
        let p = orbit_about_z(start, 360.0);
        assert!((p - start).length() < 1e-4);
    }
}
