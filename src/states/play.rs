//! Play state
//!
//! The rally itself. Three sub-phases per point, tracked by two flags:
//! serving (`!ball_is_in_play`, ball centered waiting for the serve key),
//! rally (ball travels at constant speed, bouncing off paddles and side
//! walls), and falling (`ball_is_falling`, the ball left the horizontal
//! range and drops until the floor threshold awards the point).
//!
//! First side to the win threshold publishes a `MatchOutcome` and hands
//! off to the win state. Entering from the pause state resumes the session
//! exactly where it stopped; entering from anywhere else starts fresh.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{MatchOutcome, State, StateContext, StateId};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::platform::Key;
use crate::renderer::{DrawInstance, SceneFrame, colors};
use crate::sim::{Side, ball_hits_paddle, deflect_off_paddle, resolve_wall_contact, serve_direction};

pub struct PlayState {
    ball_is_in_play: bool,
    ball_is_falling: bool,
    points_left: u32,
    points_right: u32,
    /// Side the next serve travels toward (the side that conceded last)
    serve_toward: Side,
    rng: Pcg32,
}

impl PlayState {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let serve_toward = if rng.random::<bool>() {
            Side::Left
        } else {
            Side::Right
        };
        Self {
            ball_is_in_play: false,
            ball_is_falling: false,
            points_left: 0,
            points_right: 0,
            serve_toward,
            rng,
        }
    }

    pub fn points_scored_by_left_paddle(&self) -> u32 {
        self.points_left
    }

    pub fn points_scored_by_right_paddle(&self) -> u32 {
        self.points_right
    }

    pub fn ball_is_in_play(&self) -> bool {
        self.ball_is_in_play
    }

    pub fn ball_is_falling(&self) -> bool {
        self.ball_is_falling
    }

    fn start_session(&mut self, ctx: &mut StateContext) {
        self.points_left = 0;
        self.points_right = 0;
        self.ball_is_in_play = false;
        self.ball_is_falling = false;
        self.serve_toward = if self.rng.random::<bool>() {
            Side::Left
        } else {
            Side::Right
        };
        ctx.scene.reset_entities();
        ctx.scene.reset_camera();
    }

    fn update_title(&self, ctx: &mut StateContext) {
        ctx.window.set_title(format!(
            "Teapong   {} : {}",
            self.points_left, self.points_right
        ));
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
            ctx.request_transition(StateId::Pause);
        }

        for (key, samples) in [
            (Key::Digit1, 1),
            (Key::Digit2, 2),
            (Key::Digit4, 4),
            (Key::Digit8, 8),
        ] {
            if ctx.input.take_key_press(key) {
                *ctx.requested_sample_count = Some(samples);
            }
        }

        let left_axis = axis(
            ctx.input.key_is_pressed(Key::W),
            ctx.input.key_is_pressed(Key::S),
        );
        if left_axis != 0.0 {
            ctx.scene.left_paddle.translate_lateral(left_axis, delta_time);
        }

        let right_axis = axis(
            ctx.input.key_is_pressed(Key::ArrowUp),
            ctx.input.key_is_pressed(Key::ArrowDown),
        );
        if right_axis != 0.0 {
            ctx.scene
                .right_paddle
                .translate_lateral(right_axis, delta_time);
        }

        if !self.ball_is_in_play && ctx.input.take_key_press(Key::Space) {
            self.serve(ctx);
        }
    }

    fn serve(&mut self, ctx: &mut StateContext) {
        let direction = serve_direction(&mut self.rng, self.serve_toward);
        ctx.scene.ball.set_direction(direction);
        self.ball_is_in_play = true;
        ctx.audio.play(SoundEffect::Serve);
    }

    fn update(&mut self, ctx: &mut StateContext, delta_time: f32) {
        if self.ball_is_falling {
            ctx.scene.ball.move_in_free_fall(delta_time);
            if ctx.scene.ball.is_below(FLOOR_Z) {
                self.update_score(ctx);
            }
            return;
        }

        if !self.ball_is_in_play {
            return;
        }

        ctx.scene.ball.advance(delta_time);

        if resolve_wall_contact(&mut ctx.scene.ball) {
            ctx.audio.play(SoundEffect::WallHit);
        }

        self.check_paddle_collisions(ctx);

        if ball_is_outside_of_horizontal_range(ctx) {
            self.ball_is_falling = true;
        }
    }

    fn check_paddle_collisions(&mut self, ctx: &mut StateContext) {
        let scene = &mut *ctx.scene;

        // Only test the paddle the ball is travelling toward; the deflection
        // always sends it back the other way, so one hit per approach.
        if scene.ball.direction().x < 0.0 && ball_hits_paddle(&scene.ball, &scene.left_paddle) {
            let direction = deflect_off_paddle(scene.ball.direction(), Side::Left, &mut self.rng);
            scene.ball.set_direction(direction);

            let mut position = scene.ball.position();
            position.x = position
                .x
                .max(scene.left_paddle.max_corner().x + scene.ball.radius());
            scene.ball.set_position(position);
            ctx.audio.play(SoundEffect::PaddleHit);
        } else if scene.ball.direction().x > 0.0
            && ball_hits_paddle(&scene.ball, &scene.right_paddle)
        {
            let direction = deflect_off_paddle(scene.ball.direction(), Side::Right, &mut self.rng);
            scene.ball.set_direction(direction);

            let mut position = scene.ball.position();
            position.x = position
                .x
                .min(scene.right_paddle.min_corner().x - scene.ball.radius());
            scene.ball.set_position(position);
            ctx.audio.play(SoundEffect::PaddleHit);
        }
    }

    fn update_score(&mut self, ctx: &mut StateContext) {
        // The ball fell past an end of the table; the other side scores and
        // the conceding side receives the next serve.
        if ctx.scene.ball.position().x > 0.0 {
            self.points_left += 1;
            self.serve_toward = Side::Right;
        } else {
            self.points_right += 1;
            self.serve_toward = Side::Left;
        }
        ctx.audio.play(SoundEffect::Score);
        self.update_title(ctx);

        self.ball_is_in_play = false;
        self.ball_is_falling = false;

        let winner = if self.points_left >= POINTS_TO_WIN {
            Some(Side::Left)
        } else if self.points_right >= POINTS_TO_WIN {
            Some(Side::Right)
        } else {
            None
        };

        match winner {
            Some(winner) => {
                *ctx.outcome = Some(MatchOutcome {
                    winner,
                    left_points: self.points_left,
                    right_points: self.points_right,
                });
                ctx.audio.play(SoundEffect::Win);
                ctx.request_transition(StateId::Win);
            }
            None => ctx.scene.reset_entities(),
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

impl State for PlayState {
    fn enter(&mut self, ctx: &mut StateContext) {
        ctx.window.enable_cursor(false);
        // Resuming from pause keeps every entity and counter untouched;
        // any other way in starts a fresh session.
        if ctx.previous_state() != Some(StateId::Pause) {
            self.start_session(ctx);
        }
        self.update_title(ctx);
    }

    fn execute(&mut self, ctx: &mut StateContext, delta_time: f32) -> SceneFrame {
        self.process_input(ctx, delta_time);
        self.update(ctx, delta_time);
        self.render(ctx)
    }

    fn exit(&mut self, _ctx: &mut StateContext) {}
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}

fn ball_is_outside_of_horizontal_range(ctx: &StateContext) -> bool {
    ctx.scene.ball.position().x.abs() > TABLE_HALF_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Ball, Paddle};
    use crate::states::testutil::Harness;
    use glam::Vec3;

    fn fresh_play(harness: &mut Harness) -> PlayState {
        let mut play = PlayState::new(42);
        harness.enter(&mut play);
        play
    }

    #[test]
    fn test_serve_launches_unit_direction() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);
        assert!(!play.ball_is_in_play());

        harness.press(Key::Space);
        harness.step(&mut play, 0.016);

        assert!(play.ball_is_in_play());
        let dir = harness.scene.ball.direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.x.abs() > 0.0);
        assert!(harness.audio.cues.contains(&SoundEffect::Serve));
    }

    #[test]
    fn test_direction_stays_unit_through_rally() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);
        harness.press(Key::Space);
        harness.step(&mut play, 0.016);
        harness.release(Key::Space);

        for _ in 0..600 {
            if play.ball_is_falling() || !play.ball_is_in_play() {
                break;
            }
            harness.step(&mut play, 0.016);
            let dir = harness.scene.ball.direction();
            assert!((dir.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_paddle_bounce_reverses_travel_and_cues_audio() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);

        // Rally toward the right paddle, dead center.
        play.ball_is_in_play = true;
        harness.scene.ball.set_direction(Vec3::X);
        harness
            .scene
            .ball
            .set_position(Vec3::new(PADDLE_X_OFFSET - 3.0, 0.0, BALL_RADIUS));

        for _ in 0..60 {
            harness.step(&mut play, 0.016);
            if harness.scene.ball.direction().x < 0.0 {
                break;
            }
        }

        assert!(harness.scene.ball.direction().x < 0.0);
        assert!((harness.scene.ball.direction().length() - 1.0).abs() < 1e-4);
        assert!(harness.audio.cues.contains(&SoundEffect::PaddleHit));
    }

    #[test]
    fn test_serve_and_score_scenario() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);

        // Move the right paddle out of the way, then send the ball straight
        // past it toward the right end.
        harness.scene.right_paddle.translate_lateral(1.0, 1.0);
        play.ball_is_in_play = true;
        harness.scene.ball.set_direction(Vec3::X);

        let mut steps = 0;
        while !play.ball_is_falling() && steps < 1000 {
            harness.step(&mut play, 0.016);
            steps += 1;
        }
        assert!(play.ball_is_falling(), "ball never left the table");

        while play.ball_is_falling() && steps < 2000 {
            harness.step(&mut play, 0.016);
            steps += 1;
        }

        assert_eq!(play.points_scored_by_left_paddle(), 1);
        assert_eq!(play.points_scored_by_right_paddle(), 0);
        assert!(harness.audio.cues.contains(&SoundEffect::Score));

        // Scene reset back to the serve pose.
        assert!(!play.ball_is_in_play());
        assert_eq!(harness.scene.ball.position(), Ball::start_position());
        assert_eq!(harness.scene.ball.direction(), Vec3::ZERO);
        assert_eq!(harness.scene.left_paddle.position(), Paddle::left_start());
    }

    #[test]
    fn test_win_transition_publishes_outcome_once() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);

        play.points_left = POINTS_TO_WIN - 1;
        play.ball_is_in_play = true;
        play.ball_is_falling = true;
        harness
            .scene
            .ball
            .set_position(Vec3::new(TABLE_HALF_LENGTH + 5.0, 0.0, FLOOR_Z - 1.0));

        let (_, transition) = harness.step(&mut play, 0.016);
        assert_eq!(transition, Some(StateId::Win));

        let outcome = harness.outcome.expect("outcome published");
        assert_eq!(outcome.winner, Side::Left);
        assert_eq!(outcome.left_points, POINTS_TO_WIN);
        assert_eq!(outcome.right_points, 0);

        // The finished rally does not reset the scene; the win state owns
        // the ball from here.
        assert!(harness.scene.ball.position().z < FLOOR_Z);
    }

    #[test]
    fn test_score_sum_never_decreases() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);

        let mut last_sum = 0;
        for side_x in [1.0f32, -1.0, 1.0] {
            play.ball_is_in_play = true;
            play.ball_is_falling = true;
            harness
                .scene
                .ball
                .set_position(Vec3::new(side_x * (TABLE_HALF_LENGTH + 5.0), 0.0, FLOOR_Z - 1.0));
            harness.step(&mut play, 0.016);

            let sum = play.points_scored_by_left_paddle() + play.points_scored_by_right_paddle();
            assert!(sum >= last_sum);
            assert_eq!(sum, last_sum + 1);
            last_sum = sum;
        }
    }

    #[test]
    fn test_enter_from_pause_preserves_session() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);

        play.points_left = 2;
        play.ball_is_in_play = true;
        harness.scene.ball.set_direction(Vec3::X);
        harness.scene.ball.set_position(Vec3::new(3.0, 4.0, BALL_RADIUS));

        harness.previous = Some(StateId::Pause);
        harness.enter(&mut play);

        assert_eq!(play.points_scored_by_left_paddle(), 2);
        assert!(play.ball_is_in_play());
        assert_eq!(harness.scene.ball.position(), Vec3::new(3.0, 4.0, BALL_RADIUS));
    }

    #[test]
    fn test_enter_from_menu_starts_fresh_session() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);

        play.points_left = 2;
        play.points_right = 1;
        harness.scene.ball.set_position(Vec3::new(9.0, 9.0, 9.0));

        harness.previous = Some(StateId::Menu);
        harness.enter(&mut play);

        assert_eq!(play.points_scored_by_left_paddle(), 0);
        assert_eq!(play.points_scored_by_right_paddle(), 0);
        assert_eq!(harness.scene.ball.position(), Ball::start_position());
    }

    #[test]
    fn test_sample_count_keys_request_reconfigure() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);

        harness.press(Key::Digit8);
        harness.step(&mut play, 0.016);
        assert_eq!(harness.sample_request, Some(8));
    }

    #[test]
    fn test_pause_key_requests_pause() {
        let mut harness = Harness::new();
        let mut play = fresh_play(&mut harness);

        harness.press(Key::P);
        let (_, transition) = harness.step(&mut play, 0.016);
        assert_eq!(transition, Some(StateId::Pause));
    }
}
