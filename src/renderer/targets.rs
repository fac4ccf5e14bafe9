//! Render target manager
//!
//! Owns the offscreen multisample color+depth attachments, the
//! single-sample resolve texture, and the fullscreen composite pass that
//! puts the resolved image on the swapchain. Multisample storage cannot be
//! sampled by a shader, so every frame goes multisample target -> resolve
//! -> composite quad.
//!
//! All (re)allocation runs inside a validation error scope: a validation
//! failure here is the wgpu analogue of an incomplete framebuffer, and the
//! caller decides whether it is fatal (initialization) or logged-and-
//! skipped with the previous targets kept in service (runtime resize or
//! sample-count change). Reallocation goes through temporaries and swaps
//! on success, so a failure never leaves the manager half-configured.

use wgpu::util::DeviceExt;

use super::vertex::{FULLSCREEN_QUAD, QuadVertex};
use crate::capture::CapturedFrame;
use crate::consts::SUPPORTED_SAMPLE_COUNTS;
use crate::error::RenderTargetError;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// The multisample attachments that change with the sample count
struct MultisampleAttachments {
    /// Absent when sample count is 1 (the scene renders straight into the
    /// resolve texture)
    msaa_view: Option<wgpu::TextureView>,
    depth_view: wgpu::TextureView,
}

pub struct RenderTargets {
    width: u32,
    height: u32,
    sample_count: u32,
    format: wgpu::TextureFormat,

    attachments: MultisampleAttachments,
    resolve_texture: wgpu::Texture,
    resolve_view: wgpu::TextureView,

    sampler: wgpu::Sampler,
    quad_vertex_buffer: wgpu::Buffer,
    composite_layout: wgpu::BindGroupLayout,
    composite_pipeline: wgpu::RenderPipeline,
    composite_bind_group: wgpu::BindGroup,
}

impl RenderTargets {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Result<Self, RenderTargetError> {
        validate_sample_count(sample_count)?;

        let (attachments, resolve_texture, resolve_view) =
            with_validation_scope(device, || {
                let attachments =
                    allocate_multisample_attachments(device, format, width, height, sample_count);
                let (texture, view) = allocate_resolve_texture(device, format, width, height);
                (attachments, texture, view)
            })?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("composite_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fullscreen_quad"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("composite_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("composite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("composite.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("composite_pipeline_layout"),
            bind_group_layouts: &[&composite_layout],
            immediate_size: 0,
        });

        let composite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("composite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let composite_bind_group =
            make_composite_bind_group(device, &composite_layout, &resolve_view, &sampler);

        Ok(Self {
            width,
            height,
            sample_count,
            format,
            attachments,
            resolve_texture,
            resolve_view,
            sampler,
            quad_vertex_buffer,
            composite_layout,
            composite_pipeline,
            composite_bind_group,
        })
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The scene pass color attachment: multisample view resolving into
    /// the single-sample texture, or the resolve view directly when the
    /// sample count is 1.
    pub fn color_attachment(&self, clear: wgpu::Color) -> wgpu::RenderPassColorAttachment<'_> {
        match &self.attachments.msaa_view {
            Some(msaa_view) => wgpu::RenderPassColorAttachment {
                view: msaa_view,
                resolve_target: Some(&self.resolve_view),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    // Only the resolved image is needed after this pass
                    store: wgpu::StoreOp::Discard,
                },
                depth_slice: None,
            },
            None => wgpu::RenderPassColorAttachment {
                view: &self.resolve_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            },
        }
    }

    pub fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.attachments.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        }
    }

    /// Draw the resolved texture onto the swapchain image
    pub fn composite(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("composite_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        pass.set_pipeline(&self.composite_pipeline);
        pass.set_bind_group(0, &self.composite_bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
        pass.draw(0..FULLSCREEN_QUAD.len() as u32, 0..1);
    }

    /// Reallocate every attachment at a new size, preserving the sample
    /// count. On failure the previous targets stay in service.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> Result<(), RenderTargetError> {
        let (attachments, resolve_texture, resolve_view) = with_validation_scope(device, || {
            let attachments = allocate_multisample_attachments(
                device,
                self.format,
                width,
                height,
                self.sample_count,
            );
            let (texture, view) = allocate_resolve_texture(device, self.format, width, height);
            (attachments, texture, view)
        })?;

        self.attachments = attachments;
        self.resolve_texture = resolve_texture;
        self.resolve_view = resolve_view;
        self.composite_bind_group = make_composite_bind_group(
            device,
            &self.composite_layout,
            &self.resolve_view,
            &self.sampler,
        );
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Reallocate the multisample attachments at a new sample count. The
    /// resolve target is untouched; on failure nothing changes.
    pub fn set_sample_count(
        &mut self,
        device: &wgpu::Device,
        sample_count: u32,
    ) -> Result<(), RenderTargetError> {
        validate_sample_count(sample_count)?;
        if sample_count == self.sample_count {
            return Ok(());
        }

        let attachments = with_validation_scope(device, || {
            allocate_multisample_attachments(
                device,
                self.format,
                self.width,
                self.height,
                sample_count,
            )
        })?;

        self.attachments = attachments;
        self.sample_count = sample_count;
        Ok(())
    }

    /// Copy the resolved frame into host memory as tightly packed RGBA8
    pub fn read_back(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<CapturedFrame, RenderTargetError> {
        let bytes_per_pixel = 4u32;
        let unpadded_bytes_per_row = self.width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback_buffer"),
            size: (padded_bytes_per_row * self.height) as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            self.resolve_texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderTargetError::Readback(e.to_string()))?;
        rx.recv()
            .map_err(|e| RenderTargetError::Readback(e.to_string()))?
            .map_err(|e| RenderTargetError::Readback(e.to_string()))?;

        let swap_bgra = matches!(
            self.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        );

        let data = slice.get_mapped_range();
        let mut rgba = Vec::with_capacity((unpadded_bytes_per_row * self.height) as usize);
        for row in data.chunks_exact(padded_bytes_per_row as usize) {
            let row = &row[..unpadded_bytes_per_row as usize];
            if swap_bgra {
                for px in row.chunks_exact(4) {
                    rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            } else {
                rgba.extend_from_slice(row);
            }
        }
        drop(data);
        buffer.unmap();

        Ok(CapturedFrame {
            width: self.width,
            height: self.height,
            rgba,
        })
    }
}

fn validate_sample_count(sample_count: u32) -> Result<(), RenderTargetError> {
    if SUPPORTED_SAMPLE_COUNTS.contains(&sample_count) {
        Ok(())
    } else {
        Err(RenderTargetError::UnsupportedSampleCount(sample_count))
    }
}

/// Run `f` inside a validation error scope; any validation error becomes an
/// incomplete-target failure.
fn with_validation_scope<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
) -> Result<T, RenderTargetError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    match pollster::block_on(scope.pop()) {
        None => Ok(value),
        Some(err) => Err(RenderTargetError::Incomplete(err.to_string())),
    }
}

fn allocate_multisample_attachments(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
) -> MultisampleAttachments {
    let size = wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    };

    let msaa_view = (sample_count > 1).then(|| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("msaa_color"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    });

    let depth_view = device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa_depth"),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default());

    MultisampleAttachments {
        msaa_view,
        depth_view,
    }
}

fn allocate_resolve_texture(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("resolve_color"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn make_composite_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    resolve_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("composite_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(resolve_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
