//! wgpu rendering: surface management, the instanced lit scene pass into
//! an HDR target, and the bloom chain that finishes onto the swapchain.

pub mod bloom;
pub mod buffer;
pub mod camera;
pub mod depth;
pub mod geometry;
pub mod gpu;
pub mod lights;
pub mod pass;
pub mod renderer;
pub mod scene_pipeline;

pub use bloom::{BloomConfig, BloomPipeline};
pub use buffer::{BufferAllocator, IndexData, InstanceBuffer, MeshBuffer, VertexPositionNormal};
pub use camera::CameraUniform;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use lights::{LightsBuffer, MAX_LIGHTS};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use renderer::{HDR_FORMAT, Renderer};
pub use scene_pipeline::{AmbienceUniform, SCENE_SHADER_SOURCE, ScenePipeline, draw_instanced};
