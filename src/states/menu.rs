//! Menu state
//!
//! Shows the idle table with a slowly orbiting camera. Confirm starts a
//! play session; quit closes the window. Holds no gameplay data of its
//! own.

use glam::{Mat4, Vec3};

use super::{State, StateContext, StateId};
use crate::consts::ORBIT_ANGULAR_VELOCITY_DEG;
use crate::orbit_about_z;
use crate::platform::Key;
use crate::renderer::{DrawInstance, SceneFrame, colors};

const CAMERA_START: Vec3 = Vec3::new(0.0, -45.0, 16.0);
const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 0.0, 2.0);

pub struct MenuState {
    camera_position: Vec3,
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            camera_position: CAMERA_START,
        }
    }

    fn process_input(&mut self, ctx: &mut StateContext) {
        if ctx.input.key_is_pressed(Key::Escape) {
            ctx.window.set_should_close(true);
        }

        if ctx.input.take_key_press(Key::F) {
            let fullscreen = !ctx.window.is_full_screen();
            ctx.window.set_full_screen(fullscreen);
            ctx.window.enable_cursor(true);
        }

        if ctx.input.take_key_press(Key::Space) || ctx.input.take_key_press(Key::Enter) {
            ctx.request_transition(StateId::Play);
        }
    }

    fn update(&mut self, delta_time: f32) {
        self.camera_position =
            orbit_about_z(self.camera_position, ORBIT_ANGULAR_VELOCITY_DEG * delta_time);
    }

    fn render(&self, ctx: &StateContext) -> SceneFrame {
        let view = Mat4::look_at_rh(self.camera_position, CAMERA_TARGET, Vec3::Z);
        let projection = Mat4::perspective_rh(
            45.0_f32.to_radians(),
            ctx.window.aspect_ratio(),
            0.1,
            250.0,
        );

        let mut frame = SceneFrame::new(view, projection, self.camera_position);
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

impl State for MenuState {
    fn enter(&mut self, ctx: &mut StateContext) {
        ctx.window.enable_cursor(true);
        ctx.window.set_title("Teapong - press Space to play");
        self.camera_position = CAMERA_START;
        // A finished session's result is stale once we are back here.
        *ctx.outcome = None;
    }

    fn execute(&mut self, ctx: &mut StateContext, delta_time: f32) -> SceneFrame {
        self.process_input(ctx);
        self.update(delta_time);
        self.render(ctx)
    }

    fn exit(&mut self, _ctx: &mut StateContext) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::testutil::Harness;
    use crate::states::MatchOutcome;
    use crate::sim::Side;

    #[test]
    fn test_confirm_requests_play() {
        let mut harness = Harness::new();
        let mut menu = MenuState::new();
        harness.enter(&mut menu);

        harness.press(Key::Space);
        let (_, transition) = harness.step(&mut menu, 0.016);
        assert_eq!(transition, Some(StateId::Play));
    }

    #[test]
    fn test_quit_closes_window() {
        let mut harness = Harness::new();
        let mut menu = MenuState::new();
        harness.enter(&mut menu);

        harness.press(Key::Escape);
        harness.step(&mut menu, 0.016);
        assert!(harness.window.should_close());
    }

    #[test]
    fn test_enter_clears_stale_outcome() {
        let mut harness = Harness::new();
        harness.outcome = Some(MatchOutcome {
            winner: Side::Left,
            left_points: 3,
            right_points: 1,
        });

        let mut menu = MenuState::new();
        harness.enter(&mut menu);
        assert!(harness.outcome.is_none());
    }

    #[test]
    fn test_camera_orbits_at_constant_radius_and_height() {
        let mut harness = Harness::new();
        let mut menu = MenuState::new();
        harness.enter(&mut menu);

        let start = menu.camera_position;
        for _ in 0..30 {
            harness.step(&mut menu, 0.05);
        }
        let end = menu.camera_position;

        assert!((end.length() - start.length()).abs() < 1e-3);
        assert!((end.z - start.z).abs() < 1e-4);
        assert!((end - start).length() > 1.0); // it actually moved
    }

    #[test]
    fn test_frame_draws_whole_scene() {
        let mut harness = Harness::new();
        let mut menu = MenuState::new();
        harness.enter(&mut menu);
        let (frame, _) = harness.step(&mut menu, 0.016);
        assert_eq!(frame.instances.len(), 4);
        assert!(!frame.capture_requested);
    }
}
