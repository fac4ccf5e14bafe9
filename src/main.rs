//! Teapong entry point
//!
//! Thin winit shell: creates the window, translates events into the
//! platform input snapshot, and drives one game frame per redraw.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use teapong::platform::Key;
use teapong::{Game, Settings};

struct App {
    game: Option<Game>,
    last_frame: Option<Instant>,
    last_cursor: Option<(f64, f64)>,
    init_failed: bool,
}

impl App {
    fn new() -> Self {
        Self {
            game: None,
            last_frame: None,
            last_cursor: None,
            init_failed: false,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.game.is_some() {
            return;
        }

        let settings = Settings::load();
        let attrs = winit::window::WindowAttributes::default()
            .with_title("Teapong")
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create the window: {err}");
                self.init_failed = true;
                event_loop.exit();
                return;
            }
        };

        match Game::initialize(window, settings) {
            Ok(mut game) => {
                game.apply_window_requests();
                game.request_redraw();
                self.game = Some(game);
            }
            Err(err) => {
                log::error!("Failed to initialize the game: {err}");
                self.init_failed = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(game) = &mut self.game else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                game.on_framebuffer_resized(size.width, size.height);
            }

            WindowEvent::Focused(false) => {
                // Keys must not stick across focus loss
                game.input_mut().reset();
            }

            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                // OS key repeat would re-arm the processed latch mid-hold
                if !repeat {
                    if let Some(key) = map_key(code) {
                        game.input_mut()
                            .set_key_pressed(key, state == ElementState::Pressed);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some((last_x, last_y)) = self.last_cursor {
                    // Y reversed: screen coordinates grow downward
                    game.input_mut().set_cursor_offsets(
                        (position.x - last_x) as f32,
                        (last_y - position.y) as f32,
                    );
                }
                self.last_cursor = Some((position.x, position.y));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let y_offset = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                game.input_mut().set_scroll_y_offset(y_offset);
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = self
                    .last_frame
                    .map(|last| (now - last).as_secs_f32())
                    .unwrap_or(1.0 / 60.0)
                    .min(0.1);
                self.last_frame = Some(now);

                game.frame(delta_time);
                game.apply_window_requests();

                if game.should_close() {
                    event_loop.exit();
                } else {
                    game.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyF => Some(Key::F),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::KeyC => Some(Key::C),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::ArrowUp => Some(Key::ArrowUp),
        KeyCode::ArrowDown => Some(Key::ArrowDown),
        KeyCode::ArrowLeft => Some(Key::ArrowLeft),
        KeyCode::ArrowRight => Some(Key::ArrowRight),
        KeyCode::Digit1 => Some(Key::Digit1),
        KeyCode::Digit2 => Some(Key::Digit2),
        KeyCode::Digit4 => Some(Key::Digit4),
        KeyCode::Digit8 => Some(Key::Digit8),
        _ => None,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Teapong starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create the event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        return ExitCode::FAILURE;
    }

    if app.init_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
