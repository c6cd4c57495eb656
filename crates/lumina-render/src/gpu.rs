//! GPU bring-up and swapchain ownership.
//!
//! [`RenderContext`] holds the wgpu instance, adapter, device, queue, and
//! the configured window surface. Initialization failures surface as
//! [`RenderContextError`]; per-frame acquisition failures as [`SurfaceError`].

use std::sync::Arc;

use winit::window::Window;

/// Why the GPU could not be brought up.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    /// No adapter on this machine can drive the surface.
    #[error("no usable GPU adapter")]
    NoAdapter,

    /// The adapter refused the device request.
    #[error("GPU device request rejected: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// The window handle could not back a surface.
    #[error("surface creation failed: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
}

/// Why this frame's surface texture could not be acquired.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Surface stayed lost after a reconfigure attempt.
    #[error("surface lost and not recoverable")]
    Lost,

    /// The GPU has no memory left for the swapchain.
    #[error("surface out of memory")]
    OutOfMemory,

    /// Acquisition timed out; the frame can simply be skipped.
    #[error("surface acquire timed out")]
    Timeout,
}

/// Owns the GPU stack for one window.
pub struct RenderContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
}

impl RenderContext {
    /// Bring up instance, adapter, device, and a configured surface for
    /// `window`. `vsync` picks the present mode.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!(
            "Rendering on {} via {:?} ({:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumina-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&caps.formats);
        let surface_config = build_surface_config(
            surface_format,
            caps.alpha_modes[0],
            size.width,
            size.height,
            vsync,
        );
        surface.configure(&device, &surface_config);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            surface_format,
        })
    }

    /// Reconfigure the surface for a new window size, clamping zero
    /// dimensions to 1 so the swapchain stays valid while minimized.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Aspect ratio of the current surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height as f32
    }

    /// Acquire this frame's surface texture.
    ///
    /// Lost and outdated surfaces get one reconfigure-and-retry before
    /// the error reaches the caller.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::OutOfMemory) => Err(SurfaceError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => Err(SurfaceError::Timeout),
            Err(cause) => {
                log::warn!("Surface unavailable ({cause}), reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface
                    .get_current_texture()
                    .map_err(|_| SurfaceError::Lost)
            }
        }
    }
}

/// [`RenderContext::new`] driven to completion on the calling thread.
pub fn init_render_context_blocking(
    window: Arc<Window>,
    vsync: bool,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, vsync))
}

fn build_surface_config(
    format: wgpu::TextureFormat,
    alpha_mode: wgpu::CompositeAlphaMode,
    width: u32,
    height: u32,
    vsync: bool,
) -> wgpu::SurfaceConfiguration {
    // Fifo is always available; AutoNoVsync falls back when the platform
    // offers nothing faster.
    let present_mode = if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    };
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

/// Pick the surface format, preferring the common sRGB swapchain formats.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    let preferred = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    preferred
        .into_iter()
        .find(|f| formats.contains(f))
        .or_else(|| formats.iter().copied().find(|f| f.is_srgb()))
        .unwrap_or(formats[0])
}
