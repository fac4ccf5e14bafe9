//! Game wiring
//!
//! `Game` owns everything with a lifetime: the window handle, the
//! renderer, the shared scene, the state machine, and the injected audio
//! and capture services. The winit shell feeds it input events and calls
//! [`Game::frame`] once per redraw.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use winit::window::Window;

use crate::audio::{AudioSink, NullAudio};
use crate::capture::{FrameRecorder, NullRecorder};
use crate::error::InitError;
use crate::platform::{InputSnapshot, WindowControl};
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::sim::Scene;
use crate::states::{
    MatchOutcome, MenuState, PauseState, PlayState, StateContext, StateId, StateMachine, WinState,
};

pub struct Game {
    window: Arc<Window>,
    renderer: Renderer,
    scene: Scene,
    machine: StateMachine,
    input: InputSnapshot,
    window_control: WindowControl,
    audio: Box<dyn AudioSink>,
    recorder: Box<dyn FrameRecorder>,
    outcome: Option<MatchOutcome>,
}

impl Game {
    /// Build the renderer, register the four states, and enter the menu.
    /// Any failure here is fatal to startup.
    pub fn initialize(window: Arc<Window>, settings: Settings) -> Result<Self, InitError> {
        let size = window.inner_size();
        let renderer = Renderer::new(Arc::clone(&window), size.width, size.height, &settings)?;

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x7ea9_0460);

        let mut machine = StateMachine::new(StateId::Menu);
        machine.register_state(StateId::Menu, Box::new(MenuState::new()));
        machine.register_state(StateId::Play, Box::new(PlayState::new(seed)));
        machine.register_state(StateId::Pause, Box::new(PauseState::new()));
        machine.register_state(StateId::Win, Box::new(WinState::new()));

        let mut window_control = WindowControl::new(size.width.max(1), size.height.max(1));
        window_control.set_full_screen(settings.fullscreen);

        let mut game = Self {
            window,
            renderer,
            scene: Scene::new(),
            machine,
            input: InputSnapshot::new(),
            window_control,
            audio: Box::new(NullAudio),
            recorder: Box::new(NullRecorder),
            outcome: None,
        };

        {
            let mut sample_request = None;
            let mut ctx = StateContext::new(
                &mut game.input,
                &mut game.window_control,
                &mut game.scene,
                game.audio.as_mut(),
                &mut game.outcome,
                &mut sample_request,
            );
            game.machine.start(&mut ctx);
        }

        Ok(game)
    }

    /// Replace the cue sink (defaults to a no-op)
    pub fn set_audio_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.audio = sink;
    }

    /// Replace the debug frame recorder (defaults to a no-op)
    pub fn set_frame_recorder(&mut self, recorder: Box<dyn FrameRecorder>) {
        self.recorder = recorder;
    }

    pub fn input_mut(&mut self) -> &mut InputSnapshot {
        &mut self.input
    }

    pub fn should_close(&self) -> bool {
        self.window_control.should_close()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// One full frame: state update -> deferred transition -> render ->
    /// optional capture
    pub fn frame(&mut self, delta_time: f32) {
        let mut sample_request = None;
        let scene_frame = {
            let mut ctx = StateContext::new(
                &mut self.input,
                &mut self.window_control,
                &mut self.scene,
                self.audio.as_mut(),
                &mut self.outcome,
                &mut sample_request,
            );
            self.machine.frame(&mut ctx, delta_time)
        };

        if let Some(samples) = sample_request {
            if let Err(err) = self.renderer.set_sample_count(samples) {
                log::warn!("Keeping previous sample count: {err}");
            }
        }

        match self.renderer.render(&scene_frame) {
            Ok(()) => {
                if scene_frame.capture_requested && self.recorder.is_active() {
                    self.capture_frame();
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let width = self.window_control.width_of_framebuffer_in_pix();
                let height = self.window_control.height_of_framebuffer_in_pix();
                self.renderer.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, shutting down");
                self.window_control.set_should_close(true);
            }
            Err(err) => log::warn!("Render error: {err:?}"),
        }
    }

    fn capture_frame(&mut self) {
        match self.renderer.read_back_frame() {
            Ok(frame) => {
                if let Err(err) = self.recorder.record(&frame) {
                    log::warn!("Frame recorder failed: {err}");
                }
            }
            Err(err) => log::warn!("Frame readback failed: {err}"),
        }
    }

    /// Resize callback from the shell; must run before the next render
    pub fn on_framebuffer_resized(&mut self, width: u32, height: u32) {
        self.window_control.set_framebuffer_size(width, height);
        self.renderer.resize(width, height);
    }

    /// Apply queued window requests (fullscreen, cursor, title) to the OS
    /// window after the frame
    pub fn apply_window_requests(&mut self) {
        if let Some(fullscreen) = self.window_control.take_fullscreen_request() {
            self.window.set_fullscreen(
                fullscreen.then(|| winit::window::Fullscreen::Borderless(None)),
            );
        }
        if let Some(enable) = self.window_control.take_cursor_request() {
            self.window.set_cursor_visible(enable);
            let grab = if enable {
                winit::window::CursorGrabMode::None
            } else {
                winit::window::CursorGrabMode::Confined
            };
            if let Err(err) = self.window.set_cursor_grab(grab) {
                log::debug!("Cursor grab not available: {err}");
            }
        }
        if let Some(title) = self.window_control.take_title_request() {
            self.window.set_title(&title);
        }
    }
}
