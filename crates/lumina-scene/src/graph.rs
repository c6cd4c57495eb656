//! Per-frame scene description.
//!
//! Scenes fill a [`FrameGraph`] every frame; the renderer reads it and
//! nothing else. Instance lists are reused across frames to avoid
//! reallocating at 60 Hz.

use glam::{Mat4, Vec3};
use lumina_camera::CameraPose;

/// Camera placement plus projection parameters for one frame.
#[derive(Clone, Copy, Debug)]
pub struct CameraSpec {
    pub pose: CameraPose,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            pose: CameraPose {
                position: Vec3::new(0.0, 0.0, 10.0),
                target: Vec3::ZERO,
            },
            fov_y: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Background, fog, and ambient lighting for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Ambience {
    /// Clear color, also the fog color.
    pub background: Vec3,
    /// Distance where fog starts.
    pub fog_near: f32,
    /// Distance where fog fully swallows geometry.
    pub fog_far: f32,
    /// Ambient light intensity applied to every surface.
    pub ambient: f32,
}

impl Default for Ambience {
    fn default() -> Self {
        Self {
            background: Vec3::ZERO,
            fog_near: 20.0,
            fog_far: 40.0,
            ambient: 0.6,
        }
    }
}

/// A point light with a finite range.
#[derive(Clone, Copy, Debug)]
pub struct LightSpec {
    pub position: Vec3,
    /// Linear RGB color.
    pub color: Vec3,
    pub intensity: f32,
    /// Distance beyond which the light contributes nothing.
    pub radius: f32,
}

/// One instance of a shared mesh.
#[derive(Clone, Copy, Debug)]
pub struct MeshInstance {
    pub transform: Mat4,
    /// Linear RGB surface color.
    pub color: Vec3,
}

/// Everything the renderer needs to draw one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameGraph {
    pub camera: CameraSpec,
    pub ambience: Ambience,
    pub lights: Vec<LightSpec>,
    /// Instances of the shared torus mesh.
    pub toruses: Vec<MeshInstance>,
    /// Instances of the shared unit-height cylinder mesh, scaled along
    /// Y per instance.
    pub tubes: Vec<MeshInstance>,
    /// Instances of the shared small sphere mesh.
    pub spheres: Vec<MeshInstance>,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every list while keeping their allocations. Call at the
    /// start of each frame before the scene writes into the graph.
    pub fn clear(&mut self) {
        self.lights.clear();
        self.toruses.clear();
        self.tubes.clear();
        self.spheres.clear();
    }
}
