//! Scene composition: procedural placement, object recycling, and the
//! per-frame scene description handed to the renderer.
//!
//! Two scenes are provided. [`RingsScene`] flies a closed loop through a
//! chain of colored rings; [`TubesScene`] flies an endless corridor of
//! recycled light tubes. Both write their output into a [`FrameGraph`]
//! each frame rather than talking to the GPU directly.

pub mod graph;
pub mod palette;
pub mod placement;
pub mod recycle;
pub mod rings;
pub mod tubes;

pub use graph::{Ambience, CameraSpec, FrameGraph, LightSpec, MeshInstance};
pub use recycle::Recycler;
pub use rings::RingsScene;
pub use tubes::TubesScene;

use rand::RngCore;

/// A self-contained scene driven by the host.
///
/// The host calls [`enter`](Scene::enter) when the scene becomes
/// current (with the frame clock rewound to zero), then
/// [`update`](Scene::update) once per frame, then
/// [`exit`](Scene::exit) before switching away. A scene may be entered
/// again later and must reset any per-visit state in `enter`.
pub trait Scene {
    fn name(&self) -> &'static str;

    /// Called on becoming the current scene. `rng` seeds any
    /// procedural placement for this visit.
    fn enter(&mut self, rng: &mut dyn RngCore);

    /// Writes this frame's world into `graph`. `t` is seconds since
    /// `enter`, `dt` seconds since the previous frame. `rng` feeds any
    /// per-frame procedural decisions such as respawn placement.
    fn update(&mut self, t: f32, dt: f32, rng: &mut dyn RngCore, graph: &mut FrameGraph);

    /// Called before switching to another scene.
    fn exit(&mut self) {}
}
