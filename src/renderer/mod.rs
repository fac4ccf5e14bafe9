//! wgpu renderer
//!
//! The renderer owns every GPU object. States describe what to draw via
//! [`SceneFrame`]; the game loop calls [`Renderer::render`] once per frame,
//! which runs the scene pass into the multisample target, resolves it, and
//! composites the resolved image onto the swapchain.

pub mod context;
pub mod frame;
pub mod mesh;
pub mod pipeline;
pub mod targets;
pub mod vertex;

pub use frame::{DrawInstance, SceneFrame};
pub use mesh::MeshKind;
pub use vertex::colors;

use std::sync::Arc;

use winit::window::Window;

use crate::capture::CapturedFrame;
use crate::error::{InitError, RenderTargetError};
use crate::settings::Settings;
use context::GpuContext;
use mesh::MeshLibrary;
use pipeline::ScenePipeline;
use targets::RenderTargets;

pub struct Renderer {
    context: GpuContext,
    targets: RenderTargets,
    scene_pipeline: ScenePipeline,
    meshes: MeshLibrary,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        settings: &Settings,
    ) -> Result<Self, InitError> {
        let context = GpuContext::new(window, width, height, settings.vsync)?;
        let targets = RenderTargets::new(
            &context.device,
            context.format(),
            width.max(1),
            height.max(1),
            settings.sample_count,
        )?;
        let scene_pipeline =
            ScenePipeline::new(&context.device, context.format(), settings.sample_count);
        let meshes = MeshLibrary::upload(&context.device);

        log::info!(
            "Renderer ready: {}x{} at {}x MSAA",
            width,
            height,
            settings.sample_count
        );

        Ok(Self {
            context,
            targets,
            scene_pipeline,
            meshes,
        })
    }

    pub fn sample_count(&self) -> u32 {
        self.targets.sample_count()
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.context.dimensions();
        w as f32 / h.max(1) as f32
    }

    /// Reconfigure for a new framebuffer size. A failed target reallocation
    /// is logged and the previous targets stay in service for this frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        if let Err(err) = self.targets.resize(&self.context.device, width, height) {
            log::warn!("Skipping render target resize to {width}x{height}: {err}");
        }
    }

    /// Switch the MSAA sample count at runtime. The new pipeline and
    /// targets are built first and swapped in only on success.
    pub fn set_sample_count(&mut self, sample_count: u32) -> Result<(), RenderTargetError> {
        if sample_count == self.targets.sample_count() {
            return Ok(());
        }
        let new_pipeline =
            ScenePipeline::new(&self.context.device, self.context.format(), sample_count);
        self.targets
            .set_sample_count(&self.context.device, sample_count)?;
        self.scene_pipeline = new_pipeline;
        log::info!("MSAA sample count set to {sample_count}");
        Ok(())
    }

    /// Draw one frame: scene pass -> resolve -> composite -> present
    pub fn render(&mut self, scene_frame: &SceneFrame) -> Result<(), wgpu::SurfaceError> {
        let output = self.context.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame_encoder"),
                });

        self.scene_pipeline.render(
            &self.context.queue,
            &mut encoder,
            &self.targets,
            &self.meshes,
            scene_frame,
        );
        self.targets.composite(&mut encoder, &surface_view);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Read the resolved frame back for the debug recorder
    pub fn read_back_frame(&self) -> Result<CapturedFrame, RenderTargetError> {
        self.targets
            .read_back(&self.context.device, &self.context.queue)
    }
}
