//! Pause state
//!
//! Freezes all physics. Entities are bit-identical between pause and
//! resume because nothing here touches them; only the camera may move, and
//! its pose is restored when the state exits. C unlocks a free-fly camera
//! for spectating the frozen scene.

use super::{State, StateContext, StateId};
use crate::camera::MovementDirection;
use crate::platform::Key;
use crate::renderer::{DrawInstance, SceneFrame, colors};

pub struct PauseState {
    camera_is_free: bool,
}

impl Default for PauseState {
    fn default() -> Self {
        Self::new()
    }
}

impl PauseState {
    pub fn new() -> Self {
        Self {
            camera_is_free: false,
        }
    }

    pub fn camera_is_free(&self) -> bool {
        self.camera_is_free
    }

    fn process_input(&mut self, ctx: &mut StateContext, delta_time: f32) {
        if ctx.input.key_is_pressed(Key::Escape) {
            ctx.window.set_should_close(true);
        }

        if ctx.input.take_key_press(Key::F) {
            let fullscreen = !ctx.window.is_full_screen();
            ctx.window.set_full_screen(fullscreen);
        }

        if ctx.input.take_key_press(Key::P) {
            ctx.request_transition(StateId::Play);
        }

        if ctx.input.take_key_press(Key::C) {
            self.camera_is_free = !self.camera_is_free;
            ctx.scene.camera.set_free(self.camera_is_free);
            // The cursor belongs to mouse-look while the camera is free
            ctx.window.enable_cursor(!self.camera_is_free);
        }

        if ctx.input.take_key_press(Key::R) {
            ctx.scene.reset_camera();
            ctx.scene.camera.set_free(self.camera_is_free);
        }

        if self.camera_is_free {
            self.fly_camera(ctx, delta_time);
        }
    }

    fn fly_camera(&mut self, ctx: &mut StateContext, delta_time: f32) {
        let camera = &mut ctx.scene.camera;

        if ctx.input.key_is_pressed(Key::W) {
            camera.process_keyboard_input(MovementDirection::Forward, delta_time);
        }
        if ctx.input.key_is_pressed(Key::S) {
            camera.process_keyboard_input(MovementDirection::Backward, delta_time);
        }
        if ctx.input.key_is_pressed(Key::A) {
            camera.process_keyboard_input(MovementDirection::Left, delta_time);
        }
        if ctx.input.key_is_pressed(Key::D) {
            camera.process_keyboard_input(MovementDirection::Right, delta_time);
        }

        if ctx.input.mouse_moved() {
            camera.process_mouse_movement(
                ctx.input.cursor_x_offset(),
                ctx.input.cursor_y_offset(),
            );
            ctx.input.reset_mouse_moved();
        }

        if ctx.input.scroll_wheel_moved() {
            camera.process_scroll_wheel_movement(ctx.input.scroll_y_offset());
            ctx.input.reset_scroll_wheel_moved();
        }
    }

    fn render(&self, ctx: &StateContext) -> SceneFrame {
        let camera = &ctx.scene.camera;
        let view = camera.view_matrix();
        let projection = camera.projection_matrix(ctx.window.aspect_ratio());

        let mut frame = SceneFrame::new(view, projection, camera.position());
        frame.push(DrawInstance::table(&ctx.scene.table));
        frame.push(DrawInstance::paddle(
            &ctx.scene.left_paddle,
            colors::LEFT_PADDLE,
        ));
        frame.push(DrawInstance::paddle(
            &ctx.scene.right_paddle,
            colors::RIGHT_PADDLE,
        ));
        frame.push(DrawInstance::ball(&ctx.scene.ball, 0.0));
        frame
    }
}

impl State for PauseState {
    fn enter(&mut self, ctx: &mut StateContext) {
        self.camera_is_free = false;
        ctx.window.enable_cursor(true);
        ctx.window.set_title("Teapong - paused");
    }

    fn execute(&mut self, ctx: &mut StateContext, delta_time: f32) -> SceneFrame {
        // No physics while paused: input and rendering only.
        self.process_input(ctx, delta_time);
        self.render(ctx)
    }

    fn exit(&mut self, ctx: &mut StateContext) {
        // Play expects its own camera pose back
        ctx.scene.reset_camera();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::testutil::Harness;
    use glam::Vec3;

    #[test]
    fn test_entities_untouched_across_pause() {
        let mut harness = Harness::new();
        harness.scene.ball.set_direction(Vec3::new(0.6, 0.8, 0.0));
        harness.scene.ball.set_position(Vec3::new(2.0, -3.0, 1.0));
        harness.scene.left_paddle.translate_lateral(1.0, 0.2);

        let ball_pos = harness.scene.ball.position();
        let ball_dir = harness.scene.ball.direction();
        let paddle_pos = harness.scene.left_paddle.position();

        let mut pause = PauseState::new();
        harness.enter(&mut pause);
        // Varying delta times; nothing may accrue.
        for dt in [0.016, 0.2, 0.0005, 1.5] {
            harness.step(&mut pause, dt);
        }

        assert_eq!(harness.scene.ball.position(), ball_pos);
        assert_eq!(harness.scene.ball.direction(), ball_dir);
        assert_eq!(harness.scene.left_paddle.position(), paddle_pos);
    }

    #[test]
    fn test_unpause_requests_play() {
        let mut harness = Harness::new();
        let mut pause = PauseState::new();
        harness.enter(&mut pause);

        harness.press(Key::P);
        let (_, transition) = harness.step(&mut pause, 0.016);
        assert_eq!(transition, Some(StateId::Play));
    }

    #[test]
    fn test_free_camera_toggle() {
        let mut harness = Harness::new();
        let mut pause = PauseState::new();
        harness.enter(&mut pause);
        assert!(!pause.camera_is_free());

        harness.press(Key::C);
        harness.step(&mut pause, 0.016);
        assert!(pause.camera_is_free());
        assert!(harness.scene.camera.is_free());
        assert!(!harness.window.cursor_is_enabled());

        harness.release(Key::C);
        harness.press(Key::C);
        harness.step(&mut pause, 0.016);
        assert!(!pause.camera_is_free());
        assert!(harness.window.cursor_is_enabled());
    }

    #[test]
    fn test_free_camera_moves_without_touching_entities() {
        let mut harness = Harness::new();
        let mut pause = PauseState::new();
        harness.enter(&mut pause);

        harness.press(Key::C);
        harness.step(&mut pause, 0.016);
        harness.release(Key::C);

        let ball_pos = harness.scene.ball.position();
        let camera_before = harness.scene.camera.position();

        harness.press(Key::W);
        harness.input.set_cursor_offsets(10.0, 5.0);
        harness.step(&mut pause, 0.1);

        assert_ne!(harness.scene.camera.position(), camera_before);
        assert_eq!(harness.scene.ball.position(), ball_pos);
    }

    #[test]
    fn test_exit_restores_play_camera() {
        let mut harness = Harness::new();
        let mut pause = PauseState::new();
        harness.enter(&mut pause);

        harness.press(Key::C);
        harness.step(&mut pause, 0.016);
        harness.press(Key::W);
        harness.step(&mut pause, 0.5);

        let mut ctx = harness.ctx();
        pause.exit(&mut ctx);

        let reference = crate::camera::Camera::play_camera();
        assert!((harness.scene.camera.position() - reference.position()).length() < 1e-4);
    }
}
