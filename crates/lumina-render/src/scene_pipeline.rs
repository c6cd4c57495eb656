//! The instanced lit pipeline every scene draws through.
//!
//! One pipeline covers all three shapes: meshes carry position and
//! normal, instances carry a model matrix and color, and the fragment
//! stage applies ambient plus point-light diffuse shading before
//! blending toward the fog color with view distance.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use lumina_scene::Ambience;
use static_assertions::const_assert_eq;

use crate::buffer::{InstanceBuffer, MeshBuffer, RawInstance, VertexPositionNormal};
use crate::camera::CameraUniform;
use crate::depth::DepthBuffer;
use crate::lights::LightsBuffer;

/// Fog and ambient term as laid out for the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AmbienceUniform {
    /// xyz = fog color (linear RGB), w = ambient intensity.
    pub fog_color_ambient: [f32; 4],
    /// x = fog near distance, y = fog far distance, zw unused.
    pub fog_range: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<AmbienceUniform>(), 32);

impl From<&Ambience> for AmbienceUniform {
    fn from(ambience: &Ambience) -> Self {
        Self {
            fog_color_ambient: [
                ambience.background.x,
                ambience.background.y,
                ambience.background.z,
                ambience.ambient,
            ],
            fog_range: [ambience.fog_near, ambience.fog_far, 0.0, 0.0],
        }
    }
}

fn buffer_binding(
    binding: u32,
    visibility: wgpu::ShaderStages,
    ty: wgpu::BufferBindingType,
    min_size: u64,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(min_size),
        },
        count: None,
    }
}

/// Pipeline and bind group layouts for instanced lit geometry.
pub struct ScenePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    pub light_bind_group_layout: wgpu::BindGroupLayout,
}

impl ScenePipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        target_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let uniform = wgpu::BufferBindingType::Uniform;
        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scene-frame-bgl"),
                entries: &[
                    buffer_binding(
                        0,
                        wgpu::ShaderStages::VERTEX_FRAGMENT,
                        uniform,
                        std::mem::size_of::<CameraUniform>() as u64,
                    ),
                    buffer_binding(
                        1,
                        wgpu::ShaderStages::FRAGMENT,
                        uniform,
                        std::mem::size_of::<AmbienceUniform>() as u64,
                    ),
                ],
            });

        let light_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scene-light-bgl"),
                entries: &[buffer_binding(
                    0,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::BufferBindingType::Storage { read_only: true },
                    LightsBuffer::SIZE,
                )],
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &light_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormal::layout(), RawInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // The camera flies through open rings and past thin tubes;
                // both faces of every shell are visible.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(target_format.into())],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            frame_bind_group_layout,
            light_bind_group_layout,
        }
    }
}

/// Draw one mesh with its instance buffer under the scene pipeline.
pub fn draw_instanced<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &ScenePipeline,
    frame_bind_group: &'a wgpu::BindGroup,
    light_bind_group: &'a wgpu::BindGroup,
    mesh: &'a MeshBuffer,
    instances: &'a InstanceBuffer,
) {
    if instances.is_empty() {
        return;
    }
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, frame_bind_group, &[]);
    render_pass.set_bind_group(1, light_bind_group, &[]);
    mesh.bind(render_pass);
    instances.bind(render_pass);
    mesh.draw_instanced(render_pass, instances.len());
}

/// The WGSL source code for the scene shader.
pub const SCENE_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

struct AmbienceUniform {
    fog_color_ambient: vec4<f32>,
    fog_range: vec4<f32>,
};

struct Light {
    pos_radius: vec4<f32>,
    tint_power: vec4<f32>,
    reserved: vec4<f32>,
};

struct LightList {
    len: u32,
    reserved0: u32,
    reserved1: u32,
    reserved2: u32,
    entries: array<Light>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;
@group(0) @binding(1)
var<uniform> ambience: AmbienceUniform;
@group(1) @binding(0)
var<storage, read> lights: LightList;

struct VertexInput {
    @location(0) pos: vec3<f32>,
    @location(1) norm: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) tint: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_norm: vec3<f32>,
    @location(2) tint: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world = model * vec4<f32>(vertex.pos, 1.0);
    let rot = mat3x3<f32>(
        instance.model_0.xyz,
        instance.model_1.xyz,
        instance.model_2.xyz,
    );

    var out: VertexOutput;
    out.clip = camera.view_proj * world;
    out.world_pos = world.xyz;
    out.world_norm = normalize(rot * vertex.norm);
    out.tint = instance.tint.rgb;
    return out;
}

fn falloff(d: f32, radius: f32) -> f32 {
    if (d >= radius) {
        return 0.0;
    }
    let inv_square = 1.0 / (d * d + 1.0);
    let edge = d / radius;
    let window = max(1.0 - edge * edge, 0.0);
    return inv_square * window * window;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var normal = normalize(in.world_norm);
    let to_eye = camera.eye.xyz - in.world_pos;
    // Both faces of every shell shade as front faces.
    if (dot(normal, to_eye) < 0.0) {
        normal = -normal;
    }

    var diffuse = vec3<f32>(0.0);
    for (var i = 0u; i < lights.len; i = i + 1u) {
        let l = lights.entries[i];
        let offset = l.pos_radius.xyz - in.world_pos;
        let d = length(offset);
        let lambert = max(dot(normal, offset / max(d, 0.0001)), 0.0);
        diffuse += l.tint_power.rgb * l.tint_power.w * falloff(d, l.pos_radius.w) * lambert;
    }

    let lit = in.tint * (ambience.fog_color_ambient.w + diffuse);

    let depth = length(to_eye);
    let fog = smoothstep(ambience.fog_range.x, ambience.fog_range.y, depth);
    let fogged = mix(lit, ambience.fog_color_ambient.rgb, fog);
    return vec4<f32>(fogged, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_ambience_uniform_packs_fog_band() {
        let ambience = Ambience {
            background: Vec3::new(0.1, 0.2, 0.3),
            fog_near: 20.0,
            fog_far: 40.0,
            ambient: 0.6,
        };
        let uniform = AmbienceUniform::from(&ambience);
        assert_eq!(uniform.fog_color_ambient, [0.1, 0.2, 0.3, 0.6]);
        assert_eq!(uniform.fog_range[0], 20.0);
        assert_eq!(uniform.fog_range[1], 40.0);
    }

    #[test]
    fn test_shader_declares_expected_entry_points() {
        assert!(SCENE_SHADER_SOURCE.contains("fn vs_main"));
        assert!(SCENE_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_shader_light_struct_matches_gpu_layout() {
        // 48-byte stride on the Rust side requires the trailing reserved
        // vec4 in the WGSL struct.
        assert!(SCENE_SHADER_SOURCE.contains("reserved: vec4<f32>"));
        assert!(SCENE_SHADER_SOURCE.contains("var<storage, read> lights"));
    }
}
