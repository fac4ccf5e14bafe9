//! Paddle entity
//!
//! Paddles sit at a fixed X offset and translate along Y only. Movement is
//! clamped so the whole paddle stays inside the table's playable width.

use glam::Vec3;

use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Paddle {
    position: Vec3,
    half_extents: Vec3,
    speed: f32,
}

impl Paddle {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            half_extents: Vec3::from_array(PADDLE_HALF_EXTENTS),
            speed: PADDLE_SPEED,
        }
    }

    /// Left paddle start pose (negative X side)
    pub fn left_start() -> Vec3 {
        Vec3::new(-PADDLE_X_OFFSET, 0.0, PADDLE_HALF_EXTENTS[2])
    }

    /// Right paddle start pose (positive X side)
    pub fn right_start() -> Vec3 {
        Vec3::new(PADDLE_X_OFFSET, 0.0, PADDLE_HALF_EXTENTS[2])
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Slide along Y. `axis` is -1.0, 0.0 or +1.0 from input; the result is
    /// clamped so the paddle never leaves the table.
    pub fn translate_lateral(&mut self, axis: f32, delta_time: f32) {
        let limit = TABLE_HALF_WIDTH - self.half_extents.y;
        self.position.y = (self.position.y + axis * self.speed * delta_time).clamp(-limit, limit);
    }

    /// Collision box minimum corner
    pub fn min_corner(&self) -> Vec3 {
        self.position - self.half_extents
    }

    /// Collision box maximum corner
    pub fn max_corner(&self) -> Vec3 {
        self.position + self.half_extents
    }

    pub fn reset(&mut self, position: Vec3) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_translate_moves_and_clamps() {
        let mut paddle = Paddle::new(Paddle::left_start());
        paddle.translate_lateral(1.0, 0.1);
        assert!(paddle.position().y > 0.0);

        // A huge step pins the paddle to the wall, never past it.
        paddle.translate_lateral(1.0, 100.0);
        let limit = TABLE_HALF_WIDTH - paddle.half_extents().y;
        assert!((paddle.position().y - limit).abs() < 1e-6);
    }

    #[test]
    fn test_corners_bracket_position() {
        let paddle = Paddle::new(Paddle::right_start());
        assert!(paddle.min_corner().cmplt(paddle.position()).all());
        assert!(paddle.max_corner().cmpgt(paddle.position()).all());
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_inside_table(
            steps in proptest::collection::vec((-1i8..=1, 0.0f32..0.25), 0..64)
        ) {
            let mut paddle = Paddle::new(Paddle::left_start());
            let limit = TABLE_HALF_WIDTH - paddle.half_extents().y;
            for (axis, dt) in steps {
                paddle.translate_lateral(axis as f32, dt);
                prop_assert!(paddle.position().y >= -limit - 1e-5);
                prop_assert!(paddle.position().y <= limit + 1e-5);
            }
        }
    }
}
