//! Frame description produced by states
//!
//! States never touch GPU handles; each frame they return a `SceneFrame`
//! describing what to draw and from where, and the game loop hands it to
//! the renderer. This keeps every state runnable in tests without a
//! device, and keeps GPU objects exclusively owned by the renderer.

use glam::{Mat4, Quat, Vec3};

use super::mesh::MeshKind;
use super::vertex::colors;
use crate::sim::{Ball, Paddle, Table};

/// One draw call: a mesh, its model transform, a flat color, and how far
/// its faces have been blown apart (0 = intact)
#[derive(Debug, Clone)]
pub struct DrawInstance {
    pub mesh: MeshKind,
    pub model: Mat4,
    pub color: [f32; 4],
    pub explode_distance: f32,
}

impl DrawInstance {
    pub fn table(table: &Table) -> Self {
        Self {
            mesh: MeshKind::Cube,
            model: Mat4::from_scale_rotation_translation(
                Vec3::new(table.half_length * 2.0, table.half_width * 2.0, table.thickness),
                Quat::IDENTITY,
                table.center(),
            ),
            color: colors::TABLE,
            explode_distance: 0.0,
        }
    }

    pub fn paddle(paddle: &Paddle, color: [f32; 4]) -> Self {
        Self {
            mesh: MeshKind::Cube,
            model: Mat4::from_scale_rotation_translation(
                paddle.half_extents() * 2.0,
                Quat::IDENTITY,
                paddle.position(),
            ),
            color,
            explode_distance: 0.0,
        }
    }

    pub fn ball(ball: &Ball, explode_distance: f32) -> Self {
        Self {
            mesh: MeshKind::Ball,
            model: Mat4::from_scale_rotation_translation(
                Vec3::splat(ball.radius() * 2.0),
                Quat::from_axis_angle(ball.spin_axis(), ball.spin_angle()),
                ball.position(),
            ),
            color: colors::BALL,
            explode_distance,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub clear_color: [f32; 4],
    pub instances: Vec<DrawInstance>,
    /// Set by states that want this frame read back into the recorder
    pub capture_requested: bool,
}

impl SceneFrame {
    pub fn new(view: Mat4, projection: Mat4, camera_position: Vec3) -> Self {
        Self {
            view,
            projection,
            camera_position,
            clear_color: colors::BACKGROUND,
            instances: Vec::new(),
            capture_requested: false,
        }
    }

    /// A frame that draws nothing (unregistered-state fallback)
    pub fn empty() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO)
    }

    pub fn push(&mut self, instance: DrawInstance) {
        self.instances.push(instance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_ball_instance_scale_tracks_radius() {
        let mut ball = Ball::new();
        ball.set_radius(WIN_BALL_RADIUS);
        let instance = DrawInstance::ball(&ball, 0.0);

        // The unit-diameter sphere scaled by 2r spans the ball's diameter.
        let x_axis = instance.model.transform_vector3(Vec3::X);
        assert!((x_axis.length() - WIN_BALL_RADIUS * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_table_instance_centered_below_surface() {
        let table = Table::default();
        let instance = DrawInstance::table(&table);
        let center = instance.model.transform_point3(Vec3::ZERO);
        assert!(center.z < 0.0);
        assert!(center.x.abs() < 1e-6);
    }

    #[test]
    fn test_paddle_instance_at_paddle_position() {
        let paddle = Paddle::new(Paddle::right_start());
        let instance = DrawInstance::paddle(&paddle, colors::RIGHT_PADDLE);
        let center = instance.model.transform_point3(Vec3::ZERO);
        assert!((center - paddle.position()).length() < 1e-5);
    }
}
