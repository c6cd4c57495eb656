//! Mesh tessellation for the three primitive shapes the scenes draw.
//!
//! All generators emit positions with unit normals and 16-bit indices;
//! the shapes are small enough that 16 bits always suffice.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::buffer::{IndexData, VertexPositionNormal};

/// Major radius of a ring.
pub const RING_RADIUS: f32 = 2.0;
/// Cross-section radius of a ring.
pub const RING_TUBE_RADIUS: f32 = 0.3;
const RING_CROSS_SEGMENTS: usize = 16;
const RING_AROUND_SEGMENTS: usize = 100;

/// Radius of a light tube. Tubes are unit height and scaled per
/// instance to their drawn length.
pub const TUBE_RADIUS: f32 = 0.5;
const TUBE_SEGMENTS: usize = 8;

/// Radius of a leading sphere.
pub const SPHERE_RADIUS: f32 = 0.1;
const SPHERE_SEGMENTS: usize = 32;

/// Tessellated mesh ready for upload.
pub struct MeshData {
    pub vertices: Vec<VertexPositionNormal>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn into_index_data(self) -> (Vec<VertexPositionNormal>, IndexData) {
        (self.vertices, IndexData::U16(self.indices))
    }
}

/// The ring shape: a torus lying in the XY plane with its axis along +Z.
pub fn ring() -> MeshData {
    torus(
        RING_RADIUS,
        RING_TUBE_RADIUS,
        RING_CROSS_SEGMENTS,
        RING_AROUND_SEGMENTS,
    )
}

/// The tube shape: a closed unit-height cylinder along +Y.
pub fn tube() -> MeshData {
    cylinder(TUBE_RADIUS, 1.0, TUBE_SEGMENTS)
}

/// The leading-sphere shape.
pub fn sphere() -> MeshData {
    uv_sphere(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS)
}

/// Torus in the XY plane, axis along +Z. `cross_segments` divide the
/// tube cross-section, `around_segments` the sweep around the axis.
pub fn torus(
    major_radius: f32,
    tube_radius: f32,
    cross_segments: usize,
    around_segments: usize,
) -> MeshData {
    let ring_stride = around_segments + 1;
    let mut vertices = Vec::with_capacity((cross_segments + 1) * ring_stride);

    for j in 0..=cross_segments {
        let v = j as f32 / cross_segments as f32 * TAU;
        for i in 0..=around_segments {
            let u = i as f32 / around_segments as f32 * TAU;
            let center = Vec3::new(major_radius * u.cos(), major_radius * u.sin(), 0.0);
            let position = Vec3::new(
                (major_radius + tube_radius * v.cos()) * u.cos(),
                (major_radius + tube_radius * v.cos()) * u.sin(),
                tube_radius * v.sin(),
            );
            vertices.push(VertexPositionNormal::new(
                position,
                (position - center).normalize(),
            ));
        }
    }

    let mut indices = Vec::with_capacity(cross_segments * around_segments * 6);
    for j in 1..=cross_segments {
        for i in 1..=around_segments {
            let a = (ring_stride * j + i - 1) as u16;
            let b = (ring_stride * (j - 1) + i - 1) as u16;
            let c = (ring_stride * (j - 1) + i) as u16;
            let d = (ring_stride * j + i) as u16;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}

/// Closed cylinder centered at the origin, running along Y.
pub fn cylinder(radius: f32, height: f32, segments: usize) -> MeshData {
    let half = height / 2.0;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side wall: one ring at the top, one at the bottom, radial normals.
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let normal = Vec3::new(theta.cos(), 0.0, theta.sin());
        let radial = normal * radius;
        vertices.push(VertexPositionNormal::new(
            radial + Vec3::Y * half,
            normal,
        ));
        vertices.push(VertexPositionNormal::new(
            radial - Vec3::Y * half,
            normal,
        ));
    }
    for i in 0..segments {
        let top = (2 * i) as u16;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;
        indices.extend_from_slice(&[top, bottom, next_top, bottom, next_bottom, next_top]);
    }

    // Caps: a center vertex fanned out to a rim with an axial normal.
    for &(y, normal) in &[(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
        let center = vertices.len() as u16;
        vertices.push(VertexPositionNormal::new(Vec3::Y * y, normal));
        for i in 0..=segments {
            let theta = i as f32 / segments as f32 * TAU;
            vertices.push(VertexPositionNormal::new(
                Vec3::new(theta.cos() * radius, y, theta.sin() * radius),
                normal,
            ));
        }
        for i in 0..segments {
            let rim = center + 1 + i as u16;
            indices.extend_from_slice(&[center, rim, rim + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// Latitude-longitude sphere centered at the origin.
pub fn uv_sphere(radius: f32, around_segments: usize, vertical_segments: usize) -> MeshData {
    let ring_stride = around_segments + 1;
    let mut vertices = Vec::with_capacity((vertical_segments + 1) * ring_stride);

    for iy in 0..=vertical_segments {
        let phi = iy as f32 / vertical_segments as f32 * PI;
        for ix in 0..=around_segments {
            let theta = ix as f32 / around_segments as f32 * TAU;
            let normal = Vec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            vertices.push(VertexPositionNormal::new(normal * radius, normal));
        }
    }

    let mut indices = Vec::with_capacity(vertical_segments * around_segments * 6);
    for iy in 0..vertical_segments {
        for ix in 0..around_segments {
            let a = (iy * ring_stride + ix) as u16;
            let b = a + ring_stride as u16;
            // Pole rows collapse one triangle of each quad.
            if iy != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if iy != vertical_segments - 1 {
                indices.extend_from_slice(&[b, b + 1, a + 1]);
            }
        }
    }

    MeshData { vertices, indices }
}
