//! Lit scene pipeline
//!
//! One pipeline draws every instance in a frame. Per-draw data (model
//! matrix, color, explode distance) lives in a single uniform buffer read
//! through dynamic offsets, so a frame writes its instances once and the
//! pass just rebinds offsets between draws.
//!
//! The pipeline's multisample state must match the render targets, so a
//! sample-count change rebuilds this pipeline alongside the targets.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::frame::SceneFrame;
use super::mesh::MeshLibrary;
use super::targets::RenderTargets;
use super::vertex::Vertex;

/// Maximum draw instances per frame (the scene uses four; headroom is cheap)
pub const MAX_DRAWS: usize = 16;
/// Dynamic uniform offsets must be aligned to 256 bytes
const DRAW_STRIDE: u64 = 256;

/// Light direction for the whole scene (pointing from the light, Z-up world)
const LIGHT_DIR: Vec3 = Vec3::new(0.35, 0.3, -0.9);

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GlobalUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_dir: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

pub struct ScenePipeline {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
}

impl ScenePipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_globals"),
            size: std::mem::size_of::<GlobalUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_draws"),
            size: DRAW_STRIDE * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_draw_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_draw_bind_group"),
            layout: &draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // Exploding faces flip toward the camera; draw both sides
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            draw_buffer,
            draw_bind_group,
        }
    }

    /// Record the scene pass for one frame into the multisample target
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        meshes: &MeshLibrary,
        frame: &SceneFrame,
    ) {
        let globals = GlobalUniforms {
            view_proj: (frame.projection * frame.view).to_cols_array_2d(),
            camera_pos: frame.camera_position.extend(1.0).to_array(),
            light_dir: LIGHT_DIR.extend(0.0).to_array(),
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        if frame.instances.len() > MAX_DRAWS {
            log::warn!(
                "Frame has {} instances, drawing the first {}",
                frame.instances.len(),
                MAX_DRAWS
            );
        }
        let instances = &frame.instances[..frame.instances.len().min(MAX_DRAWS)];

        for (i, instance) in instances.iter().enumerate() {
            let draw = DrawUniforms {
                model: instance.model.to_cols_array_2d(),
                color: instance.color,
                params: [instance.explode_distance, 0.0, 0.0, 0.0],
            };
            queue.write_buffer(
                &self.draw_buffer,
                i as u64 * DRAW_STRIDE,
                bytemuck::bytes_of(&draw),
            );
        }

        let clear = wgpu::Color {
            r: frame.clear_color[0] as f64,
            g: frame.clear_color[1] as f64,
            b: frame.clear_color[2] as f64,
            a: frame.clear_color[3] as f64,
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(targets.color_attachment(clear))],
            depth_stencil_attachment: Some(targets.depth_attachment()),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.globals_bind_group, &[]);

        for (i, instance) in instances.iter().enumerate() {
            let mesh = meshes.get(instance.mesh);
            pass.set_bind_group(1, &self.draw_bind_group, &[(i as u64 * DRAW_STRIDE) as u32]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
