//! Window creation and event handling via winit.
//!
//! Provides [`SceneHost`] which implements winit's [`ApplicationHandler`]
//! trait, and a [`run`] function to start the event loop.

use std::sync::Arc;

use lumina_config::Config;
use lumina_input::{GestureRouter, KeyboardState, SceneCommand, SceneIndex};
use lumina_render::{
    BloomConfig, RenderContext, RenderContextError, Renderer, SurfaceError,
    init_render_context_blocking,
};
use lumina_scene::{FrameGraph, RingsScene, Scene, TubesScene};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::clock::FrameClock;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    attrs
}

/// Owns the window, GPU context, and scene list, and drives one scene
/// at a time from the winit event loop.
pub struct SceneHost {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<Renderer>,
    clock: FrameClock,
    keyboard: KeyboardState,
    gestures: GestureRouter,
    scenes: Vec<Box<dyn Scene>>,
    scene_index: SceneIndex,
    rng: Xoshiro256StarStar,
    graph: FrameGraph,
    init_error: Option<RenderContextError>,
}

impl SceneHost {
    /// Host over the built-in scene list, starting at `initial_scene`
    /// (wrapped into range).
    pub fn new(config: Config, initial_scene: usize) -> Self {
        let scenes: Vec<Box<dyn Scene>> =
            vec![Box::new(RingsScene::new()), Box::new(TubesScene::new())];
        let scene_index = SceneIndex::starting_at(scenes.len(), initial_scene);
        let gestures = GestureRouter::with_threshold(config.input.touch_threshold_px);
        Self {
            config,
            window: None,
            gpu: None,
            renderer: None,
            clock: FrameClock::new(),
            keyboard: KeyboardState::new(),
            gestures,
            scenes,
            scene_index,
            rng: Xoshiro256StarStar::from_entropy(),
            graph: FrameGraph::new(),
            init_error: None,
        }
    }

    fn bloom_config(&self) -> BloomConfig {
        BloomConfig {
            enabled: self.config.render.bloom,
            threshold: self.config.render.bloom_threshold,
            intensity: self.config.render.bloom_intensity,
            ..BloomConfig::default()
        }
    }

    /// Rewinds the clock and hands the scene a fresh visit.
    fn enter_current_scene(&mut self) {
        self.clock.reset();
        let scene = self.scenes[self.scene_index.current()].as_mut();
        scene.enter(&mut self.rng);
        info!(scene = scene.name(), "entered scene");
    }

    fn switch_scene(&mut self, command: SceneCommand) {
        self.scenes[self.scene_index.current()].exit();
        self.scene_index.apply(command);
        self.enter_current_scene();
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(&gpu.device, width, height);
            }
            info!("Window resized to {}x{}", width, height);
        }
    }

    /// One frame: arrow-key navigation, scene update, render, present.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if self
            .keyboard
            .just_pressed(PhysicalKey::Code(KeyCode::ArrowRight))
        {
            self.switch_scene(SceneCommand::Next);
        } else if self
            .keyboard
            .just_pressed(PhysicalKey::Code(KeyCode::ArrowLeft))
        {
            self.switch_scene(SceneCommand::Previous);
        }

        let timing = self.clock.tick();
        self.graph.clear();
        let index = self.scene_index.current();
        self.scenes[index].update(timing.elapsed, timing.delta, &mut self.rng, &mut self.graph);

        if let (Some(gpu), Some(renderer)) = (&self.gpu, &mut self.renderer) {
            match renderer.render(gpu, &self.graph) {
                Ok(()) => {}
                Err(SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory, shutting down");
                    event_loop.exit();
                    return;
                }
                Err(e) => {
                    warn!("Skipping frame: {e}");
                }
            }
        }

        self.keyboard.clear_transients();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for SceneHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = window_attributes_from_config(&self.config);
            let window = event_loop
                .create_window(attrs)
                .expect("Failed to create window");
            let window = Arc::new(window);

            match init_render_context_blocking(window.clone(), self.config.window.vsync) {
                Ok(gpu) => {
                    let size = window.inner_size();
                    let mut renderer = Renderer::new(
                        &gpu.device,
                        gpu.surface_format,
                        size.width.max(1),
                        size.height.max(1),
                    );
                    renderer.set_bloom(&gpu.queue, self.bloom_config());
                    self.renderer = Some(renderer);
                    self.gpu = Some(gpu);
                }
                Err(e) => {
                    self.init_error = Some(e);
                    event_loop.exit();
                    return;
                }
            }

            self.window = Some(window);
            self.enter_current_scene();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                // The new physical size arrives via the window, not the event.
                if let Some(window) = &self.window {
                    let new_inner = window.inner_size();
                    self.resize(new_inner.width, new_inner.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::Touch(touch) => {
                if let Some(command) = self.gestures.handle_touch(&touch) {
                    self.switch_scene(command);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the visualization with the given
/// config, starting at `initial_scene`.
///
/// Blocks until the window is closed. Returns the initialization error
/// when the GPU could not be brought up, so the binary can exit nonzero.
pub fn run(config: Config, initial_scene: usize) -> Result<(), RenderContextError> {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut host = SceneHost::new(config, initial_scene);
    event_loop.run_app(&mut host).expect("Event loop failed");
    match host.init_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_host() -> SceneHost {
        let mut host = SceneHost::new(Config::default(), 0);
        host.rng = Xoshiro256StarStar::seed_from_u64(7);
        host
    }

    #[test]
    fn test_host_starts_on_requested_scene() {
        let host = SceneHost::new(Config::default(), 1);
        assert_eq!(host.scene_index.current(), 1);
        // Out-of-range indices wrap instead of panicking.
        let wrapped = SceneHost::new(Config::default(), 5);
        assert_eq!(wrapped.scene_index.current(), 1);
    }

    #[test]
    fn test_switch_scene_wraps_both_ways() {
        let mut host = seeded_host();
        host.enter_current_scene();
        host.switch_scene(SceneCommand::Next);
        assert_eq!(host.scene_index.current(), 1);
        host.switch_scene(SceneCommand::Next);
        assert_eq!(host.scene_index.current(), 0);
        host.switch_scene(SceneCommand::Previous);
        assert_eq!(host.scene_index.current(), 1);
    }

    #[test]
    fn test_update_populates_the_frame_graph() {
        let mut host = seeded_host();
        host.enter_current_scene();
        let timing = host.clock.tick();
        host.graph.clear();
        let index = host.scene_index.current();
        host.scenes[index].update(
            timing.elapsed,
            timing.delta,
            &mut host.rng,
            &mut host.graph,
        );
        assert!(
            !host.graph.toruses.is_empty(),
            "rings scene produced no rings"
        );
        assert!(!host.graph.lights.is_empty(), "rings scene produced no lights");
    }

    #[test]
    fn test_bloom_config_follows_render_settings() {
        let mut config = Config::default();
        config.render.bloom = false;
        config.render.bloom_intensity = 3.5;
        let host = SceneHost::new(config, 0);
        let bloom = host.bloom_config();
        assert!(!bloom.enabled);
        assert_eq!(bloom.intensity, 3.5);
        assert_eq!(bloom.iterations, BloomConfig::default().iterations);
    }

    #[test]
    fn test_window_attributes_honor_fullscreen() {
        let mut config = Config::default();
        assert!(window_attributes_from_config(&config).fullscreen.is_none());
        config.window.fullscreen = true;
        assert!(window_attributes_from_config(&config).fullscreen.is_some());
    }
}
