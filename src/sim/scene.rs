//! Shared scene context
//!
//! One `Scene` is owned by the game loop and lent mutably to whichever
//! state is active. Every state sees the same live entities; the state
//! machine's single-current-state invariant is what makes the aliasing
//! safe without any locking.

use glam::Vec3;

use super::{Ball, Paddle};
use crate::camera::Camera;
use crate::consts::*;

/// The table slab the rally happens on
#[derive(Debug, Clone)]
pub struct Table {
    pub half_length: f32,
    pub half_width: f32,
    pub thickness: f32,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            half_length: TABLE_HALF_LENGTH,
            half_width: TABLE_HALF_WIDTH,
            thickness: TABLE_THICKNESS,
        }
    }
}

impl Table {
    /// Center of the slab (top surface sits at z = 0)
    pub fn center(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, -self.thickness / 2.0)
    }
}

pub struct Scene {
    pub table: Table,
    pub left_paddle: Paddle,
    pub right_paddle: Paddle,
    pub ball: Ball,
    pub camera: Camera,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            table: Table::default(),
            left_paddle: Paddle::new(Paddle::left_start()),
            right_paddle: Paddle::new(Paddle::right_start()),
            ball: Ball::new(),
            camera: Camera::play_camera(),
        }
    }

    /// Restore ball and paddles to their serve poses. The camera is left
    /// alone; states manage their own camera poses.
    pub fn reset_entities(&mut self) {
        self.ball.reset();
        self.left_paddle.reset(Paddle::left_start());
        self.right_paddle.reset(Paddle::right_start());
    }

    /// Restore the camera to the standard play pose
    pub fn reset_camera(&mut self) {
        self.camera.reposition(
            crate::camera::PLAY_POSITION,
            crate::camera::PLAY_YAW_DEG,
            crate::camera::PLAY_PITCH_DEG,
            crate::camera::PLAY_FOVY_DEG,
        );
        self.camera.set_free(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_restores_start_positions() {
        let mut scene = Scene::new();

        scene.ball.set_direction(Vec3::X);
        scene.ball.advance(1.0);
        scene.left_paddle.translate_lateral(1.0, 0.5);
        scene.right_paddle.translate_lateral(-1.0, 0.5);

        scene.reset_entities();

        assert_eq!(scene.ball.position(), Ball::start_position());
        assert_eq!(scene.ball.direction(), Vec3::ZERO);
        assert_eq!(scene.left_paddle.position(), Paddle::left_start());
        assert_eq!(scene.right_paddle.position(), Paddle::right_start());
    }

    #[test]
    fn test_table_surface_at_origin_plane() {
        let table = Table::default();
        // Slab center is half a thickness below the playing surface.
        assert!((table.center().z + table.thickness / 2.0).abs() < 1e-6);
    }
}
