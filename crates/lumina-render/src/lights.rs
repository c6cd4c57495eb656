//! Point light upload: packs the frame's lights into the storage buffer
//! layout the scene shader indexes.

use bytemuck::{Pod, Zeroable};
use lumina_scene::LightSpec;
use static_assertions::const_assert_eq;

/// Maximum number of point lights sent to the GPU per frame.
pub const MAX_LIGHTS: usize = 16;

/// Per-light GPU data, 48 bytes, std430-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuLight {
    /// xyz = position (world space), w = radius.
    pub position_radius: [f32; 4],
    /// xyz = color (linear RGB), w = intensity.
    pub color_intensity: [f32; 4],
    /// Padding to maintain 48-byte stride.
    pub _padding: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<GpuLight>(), 48);

/// Header at the start of the light storage buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightHeader {
    /// Number of active lights in the buffer.
    pub count: u32,
    /// Padding to align to 16 bytes.
    pub _pad: [u32; 3],
}

const_assert_eq!(std::mem::size_of::<LightHeader>(), 16);

impl From<&LightSpec> for GpuLight {
    fn from(spec: &LightSpec) -> Self {
        Self {
            position_radius: [
                spec.position.x,
                spec.position.y,
                spec.position.z,
                spec.radius,
            ],
            color_intensity: [spec.color.x, spec.color.y, spec.color.z, spec.intensity],
            _padding: [0.0; 4],
        }
    }
}

/// The storage buffer holding this frame's point lights.
pub struct LightsBuffer {
    buffer: wgpu::Buffer,
}

impl LightsBuffer {
    /// Size in bytes of the GPU storage buffer (header + max lights).
    pub const SIZE: u64 = std::mem::size_of::<LightHeader>() as u64
        + (MAX_LIGHTS as u64 * std::mem::size_of::<GpuLight>() as u64);

    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point-lights"),
            size: Self::SIZE,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer }
    }

    /// Write the frame's lights. Lights beyond [`MAX_LIGHTS`] are dropped.
    pub fn upload(&self, queue: &wgpu::Queue, lights: &[LightSpec]) {
        let packed = pack_lights(lights);
        let header = LightHeader {
            count: packed.len() as u32,
            _pad: [0; 3],
        };
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[header]));
        if !packed.is_empty() {
            queue.write_buffer(
                &self.buffer,
                std::mem::size_of::<LightHeader>() as u64,
                bytemuck::cast_slice(&packed),
            );
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

fn pack_lights(lights: &[LightSpec]) -> Vec<GpuLight> {
    if lights.len() > MAX_LIGHTS {
        log::warn!("dropping {} lights over the cap", lights.len() - MAX_LIGHTS);
    }
    lights.iter().take(MAX_LIGHTS).map(GpuLight::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn light_at(x: f32) -> LightSpec {
        LightSpec {
            position: Vec3::new(x, 0.0, 0.0),
            color: Vec3::new(1.0, 0.9, 0.7),
            intensity: 2.0,
            radius: 30.0,
        }
    }

    #[test]
    fn test_packing_preserves_fields() {
        let packed = pack_lights(&[light_at(5.0)]);
        assert_eq!(packed.len(), 1);
        assert_eq!(packed[0].position_radius, [5.0, 0.0, 0.0, 30.0]);
        assert_eq!(packed[0].color_intensity, [1.0, 0.9, 0.7, 2.0]);
    }

    #[test]
    fn test_light_cap_enforced() {
        let lights: Vec<LightSpec> = (0..MAX_LIGHTS + 4).map(|i| light_at(i as f32)).collect();
        let packed = pack_lights(&lights);
        assert_eq!(packed.len(), MAX_LIGHTS);
    }

    #[test]
    fn test_buffer_size_matches_shader_layout() {
        assert_eq!(LightsBuffer::SIZE, 16 + 16 * 48);
    }
}
