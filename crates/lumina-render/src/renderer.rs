//! Frame graph execution: uploads the frame's camera, ambience, lights,
//! and instances, draws the scene into the HDR target, and finishes
//! through the bloom chain onto the swapchain.

use lumina_scene::FrameGraph;

use crate::bloom::{BloomConfig, BloomPipeline};
use crate::buffer::{BufferAllocator, InstanceBuffer, MeshBuffer};
use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;
use crate::geometry;
use crate::gpu::{RenderContext, SurfaceError};
use crate::lights::LightsBuffer;
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::scene_pipeline::{AmbienceUniform, ScenePipeline, SCENE_SHADER_SOURCE, draw_instanced};

/// Intermediate scene target format. Bloom needs headroom above 1.0.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Starting slot count per instance buffer; regrown on demand.
const INITIAL_INSTANCE_CAPACITY: usize = 256;

/// Owns every GPU resource needed to draw a [`FrameGraph`].
pub struct Renderer {
    scene_pipeline: ScenePipeline,
    bloom: BloomPipeline,
    depth: DepthBuffer,
    camera_buffer: wgpu::Buffer,
    ambience_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    lights: LightsBuffer,
    light_bind_group: wgpu::BindGroup,
    torus_mesh: MeshBuffer,
    tube_mesh: MeshBuffer,
    sphere_mesh: MeshBuffer,
    torus_instances: InstanceBuffer,
    tube_instances: InstanceBuffer,
    sphere_instances: InstanceBuffer,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene-shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER_SOURCE.into()),
        });
        let scene_pipeline =
            ScenePipeline::new(device, &shader, HDR_FORMAT, Some(DepthBuffer::FORMAT));
        let bloom = BloomPipeline::new(
            device,
            HDR_FORMAT,
            surface_format,
            width,
            height,
            BloomConfig::default(),
        );
        let depth = DepthBuffer::new(device, width, height);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-camera"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let ambience_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-ambience"),
            size: std::mem::size_of::<AmbienceUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene-frame-bg"),
            layout: &scene_pipeline.frame_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: ambience_buffer.as_entire_binding(),
                },
            ],
        });

        let lights = LightsBuffer::new(device);
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene-light-bg"),
            layout: &scene_pipeline.light_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: lights.buffer().as_entire_binding(),
            }],
        });

        let allocator = BufferAllocator::new(device);
        let (vertices, indices) = geometry::ring().into_index_data();
        let torus_mesh = allocator.create_mesh("ring", &vertices, indices);
        let (vertices, indices) = geometry::tube().into_index_data();
        let tube_mesh = allocator.create_mesh("tube", &vertices, indices);
        let (vertices, indices) = geometry::sphere().into_index_data();
        let sphere_mesh = allocator.create_mesh("sphere", &vertices, indices);

        Self {
            scene_pipeline,
            bloom,
            depth,
            camera_buffer,
            ambience_buffer,
            frame_bind_group,
            lights,
            light_bind_group,
            torus_mesh,
            tube_mesh,
            sphere_mesh,
            torus_instances: InstanceBuffer::new(device, "ring-instances", INITIAL_INSTANCE_CAPACITY),
            tube_instances: InstanceBuffer::new(device, "tube-instances", INITIAL_INSTANCE_CAPACITY),
            sphere_instances: InstanceBuffer::new(
                device,
                "sphere-instances",
                INITIAL_INSTANCE_CAPACITY,
            ),
        }
    }

    /// Recreate the size-dependent targets after a window resize.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        self.bloom.resize(device, width, height);
    }

    /// Replace the bloom settings.
    pub fn set_bloom(&mut self, queue: &wgpu::Queue, config: BloomConfig) {
        self.bloom.update_config(queue, config);
    }

    /// Upload everything the frame graph describes.
    fn upload_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        aspect_ratio: f32,
        graph: &FrameGraph,
    ) {
        let camera = CameraUniform::from_spec(&graph.camera, aspect_ratio);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera]));

        let ambience = AmbienceUniform::from(&graph.ambience);
        queue.write_buffer(&self.ambience_buffer, 0, bytemuck::cast_slice(&[ambience]));

        self.lights.upload(queue, &graph.lights);
        self.torus_instances.upload(device, queue, &graph.toruses);
        self.tube_instances.upload(device, queue, &graph.tubes);
        self.sphere_instances.upload(device, queue, &graph.spheres);
    }

    /// Render one frame graph and present it.
    pub fn render(
        &mut self,
        context: &RenderContext,
        graph: &FrameGraph,
    ) -> Result<(), SurfaceError> {
        self.upload_frame(
            &context.device,
            &context.queue,
            context.aspect_ratio(),
            graph,
        );

        let surface_texture = context.get_current_texture()?;
        let mut frame = FrameEncoder::new(&context.device, &context.queue, surface_texture);

        let background = graph.ambience.background;
        let (encoder, surface_view) = frame.pass_targets();
        {
            let builder = RenderPassBuilder::new()
                .clear_color(wgpu::Color {
                    r: background.x as f64,
                    g: background.y as f64,
                    b: background.z as f64,
                    a: 1.0,
                })
                .depth(&self.depth.view)
                .label("scene-pass");
            let mut pass = builder.begin(encoder, self.bloom.hdr_view());
            draw_instanced(
                &mut pass,
                &self.scene_pipeline,
                &self.frame_bind_group,
                &self.light_bind_group,
                &self.torus_mesh,
                &self.torus_instances,
            );
            draw_instanced(
                &mut pass,
                &self.scene_pipeline,
                &self.frame_bind_group,
                &self.light_bind_group,
                &self.tube_mesh,
                &self.tube_instances,
            );
            draw_instanced(
                &mut pass,
                &self.scene_pipeline,
                &self.frame_bind_group,
                &self.light_bind_group,
                &self.sphere_mesh,
                &self.sphere_instances,
            );
        }

        self.bloom.execute(encoder, surface_view);
        frame.submit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use lumina_scene::{LightSpec, MeshInstance};

    /// Request a headless device; skip the test when no adapter exists.
    fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok()?;
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                    experimental_features: wgpu::ExperimentalFeatures::default(),
                    trace: wgpu::Trace::Off,
                })
                .await
                .ok()
        })
    }

    fn tiny_graph() -> FrameGraph {
        let mut graph = FrameGraph::new();
        graph.lights.push(LightSpec {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            intensity: 1.0,
            radius: 30.0,
        });
        graph.toruses.push(MeshInstance {
            transform: Mat4::IDENTITY,
            color: Vec3::new(0.2, 0.9, 0.9),
        });
        graph.tubes.push(MeshInstance {
            transform: Mat4::from_scale(Vec3::new(1.0, 12.0, 1.0)),
            color: Vec3::new(1.0, 0.5, 0.0),
        });
        graph
    }

    #[test]
    fn test_renderer_creation_succeeds() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let _renderer = Renderer::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, 640, 480);
    }

    #[test]
    fn test_upload_accepts_a_populated_graph() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut renderer = Renderer::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, 640, 480);
        renderer.upload_frame(&device, &queue, 640.0 / 480.0, &tiny_graph());
        assert_eq!(renderer.torus_instances.len(), 1);
        assert_eq!(renderer.tube_instances.len(), 1);
        assert_eq!(renderer.sphere_instances.len(), 0);
    }

    #[test]
    fn test_instance_buffers_regrow_for_large_frames() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let mut renderer = Renderer::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, 640, 480);
        let mut graph = FrameGraph::new();
        for i in 0..INITIAL_INSTANCE_CAPACITY + 10 {
            graph.tubes.push(MeshInstance {
                transform: Mat4::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
                color: Vec3::ONE,
            });
        }
        renderer.upload_frame(&device, &queue, 1.0, &graph);
        assert_eq!(
            renderer.tube_instances.len(),
            (INITIAL_INSTANCE_CAPACITY + 10) as u32
        );
    }

    #[test]
    fn test_resize_recreates_depth_to_match() {
        let Some((device, _queue)) = create_test_device() else {
            return;
        };
        let mut renderer = Renderer::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, 640, 480);
        renderer.resize(&device, 1920, 1080);
        assert_eq!(renderer.depth.size(), (1920, 1080));
    }
}
