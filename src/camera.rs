//! Perspective camera for a Z-up world
//!
//! One camera instance lives in the shared scene. Play renders from a fixed
//! pose behind the table; Pause can unlock it into a free-fly camera driven
//! by WASD + mouse look. Menu and Win build their own orbit view matrices
//! and leave this camera untouched.

use glam::{Mat4, Vec3};

/// Directions for free-fly keyboard movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    Forward,
    Backward,
    Left,
    Right,
}

pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw_deg: f32,
    pitch_deg: f32,
    fovy_deg: f32,
    near: f32,
    far: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    free: bool,
}

/// Default pose used while playing: behind the table on -Y, slightly above,
/// looking down at the playfield center.
pub const PLAY_POSITION: Vec3 = Vec3::new(0.0, -30.0, 10.0);
pub const PLAY_YAW_DEG: f32 = 0.0;
pub const PLAY_PITCH_DEG: f32 = -9.5;
pub const PLAY_FOVY_DEG: f32 = 45.0;

impl Camera {
    pub fn new(
        position: Vec3,
        world_up: Vec3,
        yaw_deg: f32,
        pitch_deg: f32,
        fovy_deg: f32,
        movement_speed: f32,
        mouse_sensitivity: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::ZERO,
            up: Vec3::ZERO,
            right: Vec3::ZERO,
            world_up,
            yaw_deg,
            pitch_deg,
            fovy_deg,
            near: 0.1,
            far: 250.0,
            movement_speed,
            mouse_sensitivity,
            free: false,
        };
        camera.update_coordinate_frame();
        camera
    }

    /// Camera at the standard play pose
    pub fn play_camera() -> Self {
        Self::new(
            PLAY_POSITION,
            Vec3::Z,
            PLAY_YAW_DEG,
            PLAY_PITCH_DEG,
            PLAY_FOVY_DEG,
            12.5,
            0.1,
        )
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy_deg.to_radians(), aspect_ratio, self.near, self.far)
    }

    /// Reset to an absolute pose (used when a state re-enters)
    pub fn reposition(&mut self, position: Vec3, yaw_deg: f32, pitch_deg: f32, fovy_deg: f32) {
        self.position = position;
        self.yaw_deg = yaw_deg;
        self.pitch_deg = pitch_deg;
        self.fovy_deg = fovy_deg;
        self.update_coordinate_frame();
    }

    pub fn process_keyboard_input(&mut self, direction: MovementDirection, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            MovementDirection::Forward => self.position += self.front * velocity,
            MovementDirection::Backward => self.position -= self.front * velocity,
            MovementDirection::Left => self.position -= self.right * velocity,
            MovementDirection::Right => self.position += self.right * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw_deg += x_offset * self.mouse_sensitivity;
        self.pitch_deg += y_offset * self.mouse_sensitivity;

        // Keep the screen from flipping when looking straight up or down
        self.pitch_deg = self.pitch_deg.clamp(-89.0, 89.0);

        self.update_coordinate_frame();
    }

    /// Scroll zoom: shrinking the FOV magnifies the scene
    pub fn process_scroll_wheel_movement(&mut self, y_offset: f32) {
        self.fovy_deg = (self.fovy_deg - y_offset).clamp(1.0, 45.0);
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    pub fn set_free(&mut self, free: bool) {
        self.free = free;
    }

    fn update_coordinate_frame(&mut self) {
        // Z-up frame: yaw 0 looks along +Y, positive yaw turns toward +X
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        self.front = Vec3::new(
            yaw.sin() * pitch.cos(),
            yaw.cos() * pitch.cos(),
            pitch.sin(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}
