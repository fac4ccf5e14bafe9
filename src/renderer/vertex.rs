//! Vertex types for the scene and composite passes

use bytemuck::{Pod, Zeroable};

/// Lit 3D vertex with position and normal
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Screen-space vertex for the fullscreen composite quad
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            tex_coords: [u, v],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// A quad that fills the entire screen in normalized device coordinates
pub const FULLSCREEN_QUAD: [QuadVertex; 6] = [
    QuadVertex::new(-1.0, 1.0, 0.0, 1.0),
    QuadVertex::new(-1.0, -1.0, 0.0, 0.0),
    QuadVertex::new(1.0, -1.0, 1.0, 0.0),
    QuadVertex::new(-1.0, 1.0, 0.0, 1.0),
    QuadVertex::new(1.0, -1.0, 1.0, 0.0),
    QuadVertex::new(1.0, 1.0, 1.0, 1.0),
];

/// Colors for game elements
pub mod colors {
    pub const TABLE: [f32; 4] = [0.12, 0.35, 0.55, 1.0];
    pub const LEFT_PADDLE: [f32; 4] = [0.85, 0.3, 0.25, 1.0];
    pub const RIGHT_PADDLE: [f32; 4] = [0.25, 0.75, 0.4, 1.0];
    pub const BALL: [f32; 4] = [0.92, 0.92, 0.88, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
