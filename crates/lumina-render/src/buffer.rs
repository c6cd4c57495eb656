//! GPU buffer management: vertex layouts, mesh buffers, and the
//! per-frame instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use lumina_scene::MeshInstance;
use static_assertions::const_assert_eq;
use wgpu::util::DeviceExt;

/// Vertex with position and normal, for lit untextured meshes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct VertexPositionNormal {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

const_assert_eq!(std::mem::size_of::<VertexPositionNormal>(), 24);

impl VertexPositionNormal {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Per-instance data: model matrix columns plus linear RGB color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RawInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<RawInstance>(), 80);

impl From<&MeshInstance> for RawInstance {
    fn from(instance: &MeshInstance) -> Self {
        Self {
            model: instance.transform.to_cols_array_2d(),
            color: [instance.color.x, instance.color.y, instance.color.z, 1.0],
        }
    }
}

impl RawInstance {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Index data in either 16-bit or 32-bit form.
pub enum IndexData {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexData {
    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            IndexData::U16(_) => wgpu::IndexFormat::Uint16,
            IndexData::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            IndexData::U16(indices) => indices.len() as u32,
            IndexData::U32(indices) => indices.len() as u32,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U16(indices) => bytemuck::cast_slice(indices),
            IndexData::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

/// A mesh uploaded to the GPU: vertex buffer, index buffer, and draw metadata.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
}

impl MeshBuffer {
    /// Bind vertex and index buffers to slot 0 of the render pass.
    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), self.index_format);
    }

    /// Draw `instance_count` copies of the full mesh.
    pub fn draw_instanced(&self, render_pass: &mut wgpu::RenderPass<'_>, instance_count: u32) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..instance_count);
    }
}

/// Creates GPU buffers from mesh data.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload vertices and indices, returning a ready-to-draw [`MeshBuffer`].
    pub fn create_mesh(
        &self,
        label: &str,
        vertices: &[VertexPositionNormal],
        indices: IndexData,
    ) -> MeshBuffer {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-vertices")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}-indices")),
                contents: indices.as_bytes(),
                usage: wgpu::BufferUsages::INDEX,
            });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: indices.count(),
            index_format: indices.format(),
        }
    }
}

/// Instance buffer rewritten each frame, regrown when a frame needs more
/// slots than the current allocation.
pub struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
}

impl InstanceBuffer {
    pub fn new(device: &wgpu::Device, label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            buffer: Self::allocate(device, label, capacity),
            capacity: capacity.max(1),
            len: 0,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity.max(1) * std::mem::size_of::<RawInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write this frame's instances, reallocating at double the demand
    /// when the current buffer is too small.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[MeshInstance],
    ) {
        if instances.len() > self.capacity {
            self.capacity = instances.len() * 2;
            self.buffer = Self::allocate(device, self.label, self.capacity);
            log::debug!("instance buffer {} regrown to {}", self.label, self.capacity);
        }
        let raw: Vec<RawInstance> = instances.iter().map(RawInstance::from).collect();
        if !raw.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&raw));
        }
        self.len = raw.len() as u32;
    }

    /// Bind to vertex slot 1, alongside the mesh in slot 0.
    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(1, self.buffer.slice(..));
    }

    /// Number of instances written by the last upload.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn test_vertex_layout_matches_shader_locations() {
        let layout = VertexPositionNormal::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(layout.attributes[1].shader_location, 1);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn test_instance_layout_spans_five_vec4_slots() {
        let layout = RawInstance::layout();
        assert_eq!(layout.array_stride, 80);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes.len(), 5);
        for (i, attribute) in layout.attributes.iter().enumerate() {
            assert_eq!(attribute.shader_location, 2 + i as u32);
            assert_eq!(attribute.offset, 16 * i as u64);
            assert_eq!(attribute.format, wgpu::VertexFormat::Float32x4);
        }
    }

    #[test]
    fn test_raw_instance_carries_transform_and_color() {
        let instance = MeshInstance {
            transform: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            color: Vec3::new(0.25, 0.5, 0.75),
        };
        let raw = RawInstance::from(&instance);
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(raw.color, [0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_index_data_reports_format_and_count() {
        let small = IndexData::U16(vec![0, 1, 2]);
        assert_eq!(small.format(), wgpu::IndexFormat::Uint16);
        assert_eq!(small.count(), 3);
        assert_eq!(small.as_bytes().len(), 6);

        let large = IndexData::U32(vec![0, 1, 2, 3]);
        assert_eq!(large.format(), wgpu::IndexFormat::Uint32);
        assert_eq!(large.count(), 4);
        assert_eq!(large.as_bytes().len(), 16);
    }
}
