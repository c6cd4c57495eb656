//! Multi-pass bloom post-processing for the HDR scene output.
//!
//! Bright pixels are masked above a soft luminance threshold, blurred
//! through a half-resolution chain of render targets, then laid
//! additively over the tonemapped frame. The glow around the light
//! tubes and rings comes entirely from this pass.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use wgpu::util::DeviceExt;

/// Configuration for the bloom effect.
#[derive(Clone, Debug)]
pub struct BloomConfig {
    /// When false the blur chain is skipped and the HDR scene reaches
    /// the surface through the tonemap pass alone.
    pub enabled: bool,
    /// Luminance threshold. Only pixels brighter than this contribute.
    pub threshold: f32,
    /// Soft knee for the threshold curve, in `[0, 1]`. Widens the
    /// transition band so the cutoff never shows as a hard edge.
    pub soft_knee: f32,
    /// Overall bloom intensity multiplier.
    pub intensity: f32,
    /// Number of downscale iterations. Each halves resolution and
    /// doubles the blur radius. Range `[1, 8]`.
    pub iterations: u32,
    /// Blur tap offset multiplier.
    pub radius: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.2,
            soft_knee: 1.0,
            intensity: 2.0,
            iterations: 5,
            radius: 1.0,
        }
    }
}

/// Uniform block mirrored by `BlurSettings` in the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct BlurSettings {
    threshold: f32,
    knee: f32,
    intensity: f32,
    radius: f32,
}

const_assert_eq!(std::mem::size_of::<BlurSettings>(), 16);

impl From<&BloomConfig> for BlurSettings {
    fn from(config: &BloomConfig) -> Self {
        Self {
            threshold: config.threshold,
            knee: config.soft_knee,
            intensity: config.intensity,
            radius: config.radius,
        }
    }
}

/// Offscreen color target plus the bind group that samples it back.
struct SampledTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

fn sampled_target(
    device: &wgpu::Device,
    sampled_bgl: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    format: wgpu::TextureFormat,
    (width, height): (u32, u32),
    label: &str,
) -> SampledTarget {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: sampled_bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    SampledTarget {
        _texture: texture,
        view,
        bind_group,
    }
}

/// Half-resolution target sizes for the blur chain.
fn chain_sizes(width: u32, height: u32, iterations: u32) -> Vec<(u32, u32)> {
    let mut sizes = Vec::with_capacity(iterations as usize);
    let (mut w, mut h) = (width / 2, height / 2);
    for _ in 0..iterations {
        sizes.push((w.max(1), h.max(1)));
        w /= 2;
        h /= 2;
    }
    sizes
}

/// Bloom post chain. Owns the HDR scene target and the blur targets,
/// all recreated together on resize.
pub struct BloomPipeline {
    config: BloomConfig,
    sampled_bgl: wgpu::BindGroupLayout,
    mask: wgpu::RenderPipeline,
    halve: wgpu::RenderPipeline,
    accumulate: wgpu::RenderPipeline,
    resolve: wgpu::RenderPipeline,
    overlay: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    settings_buffer: wgpu::Buffer,
    settings_bind_group: wgpu::BindGroup,
    hdr_format: wgpu::TextureFormat,
    scene: SampledTarget,
    chain: Vec<SampledTarget>,
}

impl BloomPipeline {
    /// `hdr_format` is the format of the intermediate scene target
    /// (typically `Rgba16Float`); `surface_format` the swapchain format.
    pub fn new(
        device: &wgpu::Device,
        hdr_format: wgpu::TextureFormat,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: BloomConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("bloom-shader"),
            source: wgpu::ShaderSource::Wgsl(BLOOM_SHADER.into()),
        });

        let settings_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bloom-settings-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<BlurSettings>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let sampled_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bloom-sampled-bgl"),
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

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("bloom-layout"),
            bind_group_layouts: &[&settings_bgl, &sampled_bgl],
            immediate_size: 0,
        });

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };

        let stage = |entry: &str, format: wgpu::TextureFormat, blend: Option<wgpu::BlendState>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(entry),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_screen_triangle"),
                    buffers: &[],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let mask = stage("fs_mask", hdr_format, None);
        let halve = stage("fs_halve", hdr_format, None);
        let accumulate = stage("fs_accumulate", hdr_format, Some(additive));
        let resolve = stage("fs_resolve", surface_format, None);
        let overlay = stage("fs_overlay", surface_format, Some(additive));

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("bloom-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let settings_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("bloom-settings"),
            contents: bytemuck::cast_slice(&[BlurSettings::from(&config)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let settings_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bloom-settings-bg"),
            layout: &settings_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: settings_buffer.as_entire_binding(),
            }],
        });

        let scene = sampled_target(
            device,
            &sampled_bgl,
            &sampler,
            hdr_format,
            (width, height),
            "bloom-scene",
        );
        let chain = chain_sizes(width, height, config.iterations)
            .into_iter()
            .map(|size| sampled_target(device, &sampled_bgl, &sampler, hdr_format, size, "bloom-blur"))
            .collect();

        Self {
            config,
            sampled_bgl,
            mask,
            halve,
            accumulate,
            resolve,
            overlay,
            sampler,
            settings_buffer,
            settings_bind_group,
            hdr_format,
            scene,
            chain,
        }
    }

    /// The HDR view the scene pass renders into.
    pub fn hdr_view(&self) -> &wgpu::TextureView {
        &self.scene.view
    }

    pub fn hdr_format(&self) -> wgpu::TextureFormat {
        self.hdr_format
    }

    /// Recreate the HDR target and blur chain for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.scene = sampled_target(
            device,
            &self.sampled_bgl,
            &self.sampler,
            self.hdr_format,
            (width, height),
            "bloom-scene",
        );
        self.chain = chain_sizes(width, height, self.config.iterations)
            .into_iter()
            .map(|size| {
                sampled_target(
                    device,
                    &self.sampled_bgl,
                    &self.sampler,
                    self.hdr_format,
                    size,
                    "bloom-blur",
                )
            })
            .collect();
    }

    /// Update bloom parameters.
    pub fn update_config(&mut self, queue: &wgpu::Queue, config: BloomConfig) {
        queue.write_buffer(
            &self.settings_buffer,
            0,
            bytemuck::cast_slice(&[BlurSettings::from(&config)]),
        );
        self.config = config;
    }

    /// Run mask, blur, tonemap, and overlay, leaving the finished frame
    /// in `surface_view`.
    pub fn execute(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        let steps = (self.config.iterations as usize).min(self.chain.len());
        if !self.config.enabled || steps == 0 {
            self.blit(encoder, &self.resolve, &self.scene.bind_group, surface_view, true);
            return;
        }

        // Bright pixels: HDR scene target into the widest blur target.
        self.blit(encoder, &self.mask, &self.scene.bind_group, &self.chain[0].view, true);

        // Down the chain, halving resolution each step.
        for i in 1..steps {
            self.blit(
                encoder,
                &self.halve,
                &self.chain[i - 1].bind_group,
                &self.chain[i].view,
                true,
            );
        }

        // Back up, accumulating additively.
        for i in (0..steps - 1).rev() {
            self.blit(
                encoder,
                &self.accumulate,
                &self.chain[i + 1].bind_group,
                &self.chain[i].view,
                false,
            );
        }

        // Tonemapped scene first, then the accumulated glow on top.
        self.blit(encoder, &self.resolve, &self.scene.bind_group, surface_view, true);
        self.blit(encoder, &self.overlay, &self.chain[0].bind_group, surface_view, false);
    }

    fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipeline: &wgpu::RenderPipeline,
        source: &wgpu::BindGroup,
        target: &wgpu::TextureView,
        clear: bool,
    ) {
        let load = if clear {
            wgpu::LoadOp::Clear(wgpu::Color::BLACK)
        } else {
            wgpu::LoadOp::Load
        };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("bloom-blit"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.settings_bind_group, &[]);
        pass.set_bind_group(1, source, &[]);
        pass.draw(0..3, 0..1);
    }
}

/// WGSL source for all bloom stages.
const BLOOM_SHADER: &str = r#"
struct BlurSettings {
    threshold: f32,
    knee: f32,
    intensity: f32,
    radius: f32,
};

struct ScreenVertex {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@group(0) @binding(0) var<uniform> settings: BlurSettings;
@group(1) @binding(0) var src_texture: texture_2d<f32>;
@group(1) @binding(1) var src_sampler: sampler;

@vertex
fn vs_screen_triangle(@builtin(vertex_index) index: u32) -> ScreenVertex {
    var vertex: ScreenVertex;
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    vertex.position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    vertex.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return vertex;
}

fn brightness_mask(color: vec3<f32>) -> vec3<f32> {
    let luma = dot(color, vec3<f32>(0.2126, 0.7152, 0.0722));
    let band = clamp(luma - settings.threshold + settings.knee, 0.0, 2.0 * settings.knee);
    let curve = band * band / (4.0 * settings.knee + 0.0001);
    let keep = max(luma - settings.threshold, curve) / max(luma, 0.0001);
    return color * max(keep, 0.0);
}

@fragment
fn fs_mask(vertex: ScreenVertex) -> @location(0) vec4<f32> {
    let color = textureSample(src_texture, src_sampler, vertex.uv).rgb;
    return vec4<f32>(brightness_mask(color), 1.0);
}

@fragment
fn fs_halve(vertex: ScreenVertex) -> @location(0) vec4<f32> {
    let texel = settings.radius / vec2<f32>(textureDimensions(src_texture));
    var sum = vec3<f32>(0.0);
    sum += textureSample(src_texture, src_sampler, vertex.uv + vec2(-texel.x, -texel.y)).rgb;
    sum += textureSample(src_texture, src_sampler, vertex.uv + vec2( texel.x, -texel.y)).rgb;
    sum += textureSample(src_texture, src_sampler, vertex.uv + vec2(-texel.x,  texel.y)).rgb;
    sum += textureSample(src_texture, src_sampler, vertex.uv + vec2( texel.x,  texel.y)).rgb;
    return vec4<f32>(sum * 0.25, 1.0);
}

@fragment
fn fs_accumulate(vertex: ScreenVertex) -> @location(0) vec4<f32> {
    let color = textureSample(src_texture, src_sampler, vertex.uv).rgb;
    return vec4<f32>(color * settings.intensity, 1.0);
}

fn aces(x: vec3<f32>) -> vec3<f32> {
    let mapped = (x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14);
    return clamp(mapped, vec3<f32>(0.0), vec3<f32>(1.0));
}

@fragment
fn fs_resolve(vertex: ScreenVertex) -> @location(0) vec4<f32> {
    let hdr = textureSample(src_texture, src_sampler, vertex.uv).rgb;
    return vec4<f32>(aces(hdr), 1.0);
}

@fragment
fn fs_overlay(vertex: ScreenVertex) -> @location(0) vec4<f32> {
    let glow = textureSample(src_texture, src_sampler, vertex.uv).rgb;
    return vec4<f32>(glow, 1.0);
}
"#;
