//! Procedural meshes
//!
//! The whole scene is built from two shapes generated at startup: a unit
//! cube (table slab, paddles) and a unit-diameter UV sphere (ball). No
//! model files are loaded. The ball mesh is faceted - vertices duplicated
//! per triangle with face normals - so the explosion shader can push whole
//! faces apart instead of just inflating the sphere.

use glam::Vec3;
use wgpu::util::DeviceExt;

use super::vertex::Vertex;

/// CPU-side mesh data before upload
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Rebuild with one vertex per triangle corner and flat face normals
    pub fn faceted(&self) -> MeshData {
        let mut vertices = Vec::with_capacity(self.indices.len());
        let mut indices = Vec::with_capacity(self.indices.len());

        for tri in self.indices.chunks_exact(3) {
            let a = Vec3::from_array(self.vertices[tri[0] as usize].position);
            let b = Vec3::from_array(self.vertices[tri[1] as usize].position);
            let c = Vec3::from_array(self.vertices[tri[2] as usize].position);
            let normal = (b - a).cross(c - a).normalize_or_zero().to_array();

            for corner in [a, b, c] {
                indices.push(vertices.len() as u32);
                vertices.push(Vertex::new(corner.to_array(), normal));
            }
        }

        MeshData { vertices, indices }
    }
}

/// Axis-aligned unit cube centered at the origin, flat normals
pub fn unit_cube() -> MeshData {
    // One face per entry: (normal, four corners CCW when viewed from outside)
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        (
            Vec3::X,
            [
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(0.5, 0.5, -0.5),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(0.5, -0.5, 0.5),
            ],
        ),
        (
            Vec3::NEG_X,
            [
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::new(-0.5, -0.5, 0.5),
                Vec3::new(-0.5, 0.5, 0.5),
            ],
        ),
        (
            Vec3::Y,
            [
                Vec3::new(0.5, 0.5, -0.5),
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::new(-0.5, 0.5, 0.5),
                Vec3::new(0.5, 0.5, 0.5),
            ],
        ),
        (
            Vec3::NEG_Y,
            [
                Vec3::new(-0.5, -0.5, -0.5),
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(0.5, -0.5, 0.5),
                Vec3::new(-0.5, -0.5, 0.5),
            ],
        ),
        (
            Vec3::Z,
            [
                Vec3::new(-0.5, -0.5, 0.5),
                Vec3::new(0.5, -0.5, 0.5),
                Vec3::new(0.5, 0.5, 0.5),
                Vec3::new(-0.5, 0.5, 0.5),
            ],
        ),
        (
            Vec3::NEG_Z,
            [
                Vec3::new(-0.5, 0.5, -0.5),
                Vec3::new(0.5, 0.5, -0.5),
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(-0.5, -0.5, -0.5),
            ],
        ),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for corner in corners {
            vertices.push(Vertex::new(corner.to_array(), normal.to_array()));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

/// UV sphere of radius 0.5 centered at the origin, smooth normals
pub fn uv_sphere(stacks: u32, slices: u32) -> MeshData {
    use std::f32::consts::PI;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for stack in 0..=stacks {
        // phi from +Z pole (0) to -Z pole (pi)
        let phi = PI * stack as f32 / stacks as f32;
        for slice in 0..=slices {
            let theta = 2.0 * PI * slice as f32 / slices as f32;
            let normal = Vec3::new(
                phi.sin() * theta.cos(),
                phi.sin() * theta.sin(),
                phi.cos(),
            );
            vertices.push(Vertex::new((normal * 0.5).to_array(), normal.to_array()));
        }
    }

    let ring = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let i0 = stack * ring + slice;
            let i1 = i0 + ring;
            indices.extend_from_slice(&[i0, i1, i0 + 1, i0 + 1, i1, i1 + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// A mesh uploaded to the GPU
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, data: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertices")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_indices")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// The fixed set of meshes drawable in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    /// Unit cube (table slab and paddles)
    Cube,
    /// Faceted unit-diameter sphere (ball)
    Ball,
}

/// All GPU meshes, uploaded once at startup
pub struct MeshLibrary {
    cube: GpuMesh,
    ball: GpuMesh,
}

impl MeshLibrary {
    pub fn upload(device: &wgpu::Device) -> Self {
        Self {
            cube: GpuMesh::upload(device, &unit_cube(), "cube"),
            ball: GpuMesh::upload(device, &uv_sphere(24, 32).faceted(), "ball"),
        }
    }

    pub fn get(&self, kind: MeshKind) -> &GpuMesh {
        match kind {
            MeshKind::Cube => &self.cube,
            MeshKind::Ball => &self.ball,
        }
    }
}
