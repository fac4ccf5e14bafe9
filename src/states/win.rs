//! Win state
//!
//! The celebration sequence after a side reaches the win threshold. Three
//! phases: a fixed delay with the blown-up ball resting on the table, an
//! explosion whose fragments accelerate outward, and the terminal check
//! that returns to the menu once the fragments have travelled far enough.
//! A camera orbit runs through the whole sequence, independent of the
//! explosion phase.
//!
//! The original build grew the fragment speed by a fixed amount per
//! rendered frame, which tied the animation to the frame rate. Here the
//! growth is scaled by delta time; `test_explosion_timeline_is_frame_rate_
//! independent` pins that choice.
//!
//! Every frame of the sequence requests a capture; the game loop only
//! performs the readback when a recorder is actually active.

use glam::{Mat4, Vec3};

use super::{State, StateContext, StateId};
use crate::consts::*;
use crate::orbit_about_z;
use crate::platform::Key;
use crate::renderer::{DrawInstance, SceneFrame};
use crate::sim::Side;

const CAMERA_START: Vec3 = Vec3::new(0.0, -30.0, 10.0);
const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 0.0, 5.0);

pub struct WinState {
    camera_position: Vec3,
    camera_target: Vec3,
    idle_orbital_angular_velocity_deg: f32,
    time_until_explosion: f32,
    explode: bool,
    fragment_speed: f32,
    fragment_distance: f32,
}

impl Default for WinState {
    fn default() -> Self {
        Self::new()
    }
}

impl WinState {
    pub fn new() -> Self {
        Self {
            camera_position: CAMERA_START,
            camera_target: CAMERA_TARGET,
            idle_orbital_angular_velocity_deg: ORBIT_ANGULAR_VELOCITY_DEG,
            time_until_explosion: EXPLOSION_DELAY_SECS,
            explode: false,
            fragment_speed: EXPLOSION_START_SPEED,
            fragment_distance: 0.0,
        }
    }

    pub fn is_exploding(&self) -> bool {
        self.explode
    }

    fn process_input(&mut self, ctx: &mut StateContext) {
        if ctx.input.key_is_pressed(Key::Escape) {
            ctx.window.set_should_close(true);
        }

        if ctx.input.take_key_press(Key::F) {
            let fullscreen = !ctx.window.is_full_screen();
            ctx.window.set_full_screen(fullscreen);
            ctx.window.enable_cursor(!fullscreen);
        }
    }

    fn update(&mut self, ctx: &mut StateContext, delta_time: f32) {
        if self.fragment_distance > EXPLOSION_END_DISTANCE {
            ctx.request_transition(StateId::Menu);
        }

        if !self.explode {
            self.time_until_explosion -= delta_time;
            if self.time_until_explosion <= 0.0 {
                self.explode = true;
            }
        }

        if self.explode {
            self.fragment_speed += EXPLOSION_ACCELERATION * delta_time;
            self.fragment_distance += self.fragment_speed * delta_time;
        } else {
            // The oversized ball settles on the table while we wait
            ctx.scene.ball.move_in_free_fall(delta_time);
            ctx.scene
                .ball
                .set_position(Vec3::new(0.0, 0.0, ctx.scene.ball.radius()));
        }

        // The showcase orbit never stops, whatever the explosion is doing
        self.camera_position = orbit_about_z(
            self.camera_position,
            self.idle_orbital_angular_velocity_deg * delta_time,
        );
    }

    fn render(&self, ctx: &StateContext) -> SceneFrame {
        let view = Mat4::look_at_rh(self.camera_position, self.camera_target, Vec3::Z);
        let projection = Mat4::perspective_rh(
            45.0_f32.to_radians(),
            ctx.window.aspect_ratio(),
            0.1,
            250.0,
        );

        let explode_distance = if self.explode {
            self.fragment_distance
        } else {
            0.0
        };

        let mut frame = SceneFrame::new(view, projection, self.camera_position);
        frame.push(DrawInstance::ball(&ctx.scene.ball, explode_distance));
        frame.capture_requested = true;
        frame
    }
}

impl State for WinState {
    fn enter(&mut self, ctx: &mut StateContext) {
        // Cursor is hidden in fullscreen, visible when windowed
        ctx.window.enable_cursor(!ctx.window.is_full_screen());

        match *ctx.outcome {
            Some(outcome) => {
                let side = match outcome.winner {
                    Side::Left => "Left",
                    Side::Right => "Right",
                };
                ctx.window.set_title(format!(
                    "Teapong - {side} side wins {} : {}",
                    outcome.left_points, outcome.right_points
                ));
            }
            None => ctx.window.set_title("Teapong - game over"),
        }

        // Blow the ball up to celebration size, centered on the table
        ctx.scene.ball.set_direction(Vec3::ZERO);
        ctx.scene.ball.set_radius(WIN_BALL_RADIUS);
        ctx.scene
            .ball
            .set_position(Vec3::new(0.0, 0.0, WIN_BALL_RADIUS));

        self.camera_position = CAMERA_START;
        self.camera_target = CAMERA_TARGET;
        self.time_until_explosion = EXPLOSION_DELAY_SECS;
        self.explode = false;
        self.fragment_speed = EXPLOSION_START_SPEED;
        self.fragment_distance = 0.0;
    }

    fn execute(&mut self, ctx: &mut StateContext, delta_time: f32) -> SceneFrame {
        self.process_input(ctx);
        self.update(ctx, delta_time);
        self.render(ctx)
    }

    fn exit(&mut self, _ctx: &mut StateContext) {}
}
