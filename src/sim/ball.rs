//! Ball entity
//!
//! During a rally the ball travels in the table plane (XY) along a unit
//! direction vector at constant speed. Once it leaves the horizontal range
//! it free-falls under constant downward acceleration until the floor
//! threshold, where the point is awarded.

use glam::Vec3;

use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Ball {
    position: Vec3,
    direction: Vec3,
    speed: f32,
    radius: f32,
    fall_velocity: f32,
    spin_angle: f32,
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

impl Ball {
    pub fn new() -> Self {
        Self {
            position: Self::start_position(),
            direction: Vec3::ZERO,
            speed: BALL_SPEED,
            radius: BALL_RADIUS,
            fall_velocity: 0.0,
            spin_angle: 0.0,
        }
    }

    /// Centered on the table, resting on the surface
    pub fn start_position() -> Vec3 {
        Vec3::new(0.0, 0.0, BALL_RADIUS)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Current travel direction. Unit length while a rally is running,
    /// zero after a reset until the next serve.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Displayed size relative to the base ball: radius and scale factor
    /// move together so `displayed size = base size * scale factor` holds.
    pub fn scaling_factor(&self) -> f32 {
        self.radius / BALL_RADIUS
    }

    /// Resize the ball (win sequence blows it up to celebration size)
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    pub fn fall_velocity(&self) -> f32 {
        self.fall_velocity
    }

    /// Visual spin accumulated while rolling (radians)
    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    /// Axis the ball visually spins around, perpendicular to its travel
    pub fn spin_axis(&self) -> Vec3 {
        let axis = Vec3::Z.cross(self.direction);
        if axis.length_squared() > 1e-8 {
            axis.normalize()
        } else {
            Vec3::Y
        }
    }

    /// Constant-speed motion along the direction vector (rally phase)
    pub fn advance(&mut self, delta_time: f32) {
        self.position += self.direction * self.speed * delta_time;
        self.spin_angle += (self.speed / self.radius) * delta_time;
    }

    /// Horizontal drift plus gravity (falling phase and win-sequence drop)
    pub fn move_in_free_fall(&mut self, delta_time: f32) {
        self.position += self.direction * self.speed * delta_time;
        self.fall_velocity += FREE_FALL_ACCELERATION * delta_time;
        self.position.z -= self.fall_velocity * delta_time;
    }

    pub fn is_below(&self, floor_z: f32) -> bool {
        self.position.z < floor_z
    }

    /// Back to the serve pose: centered, no direction, no carry-over motion
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_along_direction() {
        let mut ball = Ball::new();
        ball.set_direction(Vec3::X);
        ball.advance(0.5);
        let expected = Ball::start_position() + Vec3::X * BALL_SPEED * 0.5;
        assert!((ball.position() - expected).length() < 1e-5);
    }

    #[test]
    fn test_free_fall_accelerates_downward() {
        let mut ball = Ball::new();
        ball.set_direction(Vec3::X);

        let z0 = ball.position().z;
        ball.move_in_free_fall(0.1);
        let drop_first = z0 - ball.position().z;

        let z1 = ball.position().z;
        ball.move_in_free_fall(0.1);
        let drop_second = z1 - ball.position().z;

        assert!(drop_second > drop_first);
        // Horizontal motion continues while falling.
        assert!(ball.position().x > 0.0);
    }

    #[test]
    fn test_scaling_factor_tracks_radius() {
        let mut ball = Ball::new();
        assert!((ball.scaling_factor() - 1.0).abs() < 1e-6);

        ball.set_radius(WIN_BALL_RADIUS);
        assert!((ball.scaling_factor() - WIN_BALL_RADIUS / BALL_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn test_reset_round_trip() {
        let mut ball = Ball::new();
        ball.set_direction(Vec3::new(0.8, 0.6, 0.0));
        ball.advance(1.0);
        ball.move_in_free_fall(1.0);
        ball.set_radius(WIN_BALL_RADIUS);

        ball.reset();
        assert_eq!(ball.position(), Ball::start_position());
        assert_eq!(ball.direction(), Vec3::ZERO);
        assert_eq!(ball.fall_velocity(), 0.0);
        assert_eq!(ball.spin_angle(), 0.0);
        assert!((ball.radius() - BALL_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn test_spin_axis_is_perpendicular_to_travel() {
        let mut ball = Ball::new();
        ball.set_direction(Vec3::new(0.6, 0.8, 0.0));
        let axis = ball.spin_axis();
        assert!(axis.dot(ball.direction()).abs() < 1e-6);
        assert!((axis.length() - 1.0).abs() < 1e-6);
    }
}
