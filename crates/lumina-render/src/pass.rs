//! Render pass configuration and per-frame command encoding lifecycle.

use crate::depth::DepthBuffer;

fn clear_to(color: wgpu::Color) -> wgpu::Operations<wgpu::Color> {
    wgpu::Operations {
        load: wgpu::LoadOp::Clear(color),
        store: wgpu::StoreOp::Store,
    }
}

/// Builder for render pass descriptors targeting an arbitrary color view.
#[derive(Debug, Default)]
pub struct RenderPassBuilder<'a> {
    clear: wgpu::Color,
    depth: Option<&'a wgpu::TextureView>,
    name: Option<&'static str>,
}

impl<'a> RenderPassBuilder<'a> {
    /// A pass that clears to black with no depth attachment.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear = color;
        self
    }

    /// Attach a reverse-Z depth buffer, cleared to the far plane.
    pub fn depth(mut self, view: &'a wgpu::TextureView) -> Self {
        self.depth = Some(view);
        self
    }

    pub fn label(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Begin the pass on `encoder`, rendering into `color_view`.
    pub fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.name,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: clear_to(self.clear),
                depth_slice: None,
            })],
            depth_stencil_attachment: self.depth.map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's command encoder paired with the surface texture it will
/// present. Submission consumes the pair; dropping without submitting
/// logs and submits anyway so the swapchain never stalls.
pub struct FrameEncoder<'a> {
    commands: Option<wgpu::CommandEncoder>,
    frame: Option<wgpu::SurfaceTexture>,
    view: wgpu::TextureView,
    queue: &'a wgpu::Queue,
}

impl<'a> FrameEncoder<'a> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'a wgpu::Queue,
        frame: wgpu::SurfaceTexture,
    ) -> Self {
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let commands = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        Self {
            commands: Some(commands),
            frame: Some(frame),
            view,
            queue,
        }
    }

    /// The encoder and swapchain view together, for passes that write
    /// the presented frame.
    pub fn pass_targets(&mut self) -> (&mut wgpu::CommandEncoder, &wgpu::TextureView) {
        let commands = self
            .commands
            .as_mut()
            .expect("FrameEncoder already submitted");
        (commands, &self.view)
    }

    /// Submit the command buffer and present the surface texture.
    /// Consumes self to prevent double-submission.
    pub fn submit(mut self) {
        self.flush();
    }

    fn flush(&mut self) {
        let Some(commands) = self.commands.take() else {
            return;
        };
        let Some(frame) = self.frame.take() else {
            return;
        };
        self.queue.submit([commands.finish()]);
        frame.present();
    }
}

impl Drop for FrameEncoder<'_> {
    fn drop(&mut self) {
        if self.commands.is_some() {
            log::warn!("FrameEncoder dropped without submit(), presenting anyway");
            self.flush();
        }
    }
}
