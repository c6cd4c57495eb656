//! Endless corridor of recycled light tubes.

use glam::{Mat4, Quat, Vec3};
use lumina_camera::SmoothedCamera;
use lumina_track::CorridorTrack;
use rand::{Rng, RngCore};
use tracing::info;

use crate::graph::{Ambience, CameraSpec, FrameGraph, LightSpec, MeshInstance};
use crate::palette;
use crate::placement::{self, Midpoint};
use crate::recycle::Recycler;
use crate::Scene;

const TUBE_COUNT: usize = 80;
const MIN_TUBE_LENGTH: f32 = 4.0;
const MAX_TUBE_LENGTH: f32 = 50.0;
/// Farthest ahead of the camera a tube may respawn.
const MAX_Z_REGEN_DISTANCE: f32 = 60.0;
/// Distance fog band.
const FOG_NEAR: f32 = 20.0;
const FOG_FAR: f32 = 40.0;
const AMBIENT: f32 = 0.6;
/// Seconds the leading light runs ahead of the camera.
const LIGHT_LEAD_S: f32 = 0.5;
const LIGHT_INTENSITY: f32 = 1.0;
const LIGHT_RADIUS: f32 = 30.0;

// Derived: tubes may trail the camera until they leave the fog, and the
// placement window covers trail plus regen distance.
const Z_LOOKBEHIND: f32 = MAX_Z_REGEN_DISTANCE - 1.0 - FOG_FAR;
const PLACEMENT_RANGE: f32 = MAX_Z_REGEN_DISTANCE + Z_LOOKBEHIND;

struct TubeSlot {
    position: Vec3,
    roll: f32,
    length: f32,
    color: Vec3,
    z_offset: f32,
}

/// The tubes scene: a fixed pool of glowing cylinders scattered around
/// the winding corridor, recycled ahead of the camera as it passes
/// them.
pub struct TubesScene {
    track: CorridorTrack,
    camera: SmoothedCamera,
    recycler: Recycler,
    slots: Vec<TubeSlot>,
}

impl Default for TubesScene {
    fn default() -> Self {
        Self::new()
    }
}

impl TubesScene {
    pub fn new() -> Self {
        let track = CorridorTrack::default();
        Self {
            track,
            camera: SmoothedCamera::new(track),
            recycler: Recycler::new(Z_LOOKBEHIND, PLACEMENT_RANGE),
            slots: Vec::with_capacity(TUBE_COUNT),
        }
    }

    fn spawn_slot(&self, rng: &mut dyn RngCore) -> TubeSlot {
        let z_offset = self.recycler.spawn_offset(rng);
        let z = self.recycler.initial_z(z_offset);
        let Midpoint { position, roll } =
            placement::safe_midpoint(rng, CorridorTrack::xy_from_z(z));
        TubeSlot {
            position: Vec3::new(position.x, position.y, z),
            roll,
            length: rng.gen_range(MIN_TUBE_LENGTH..MAX_TUBE_LENGTH),
            color: palette::linear_rgb(
                palette::TUBES[rng.gen_range(0..palette::TUBES.len())],
            ),
            z_offset,
        }
    }

    fn recycle_passed_tubes(&mut self, camera_z: f32, rng: &mut dyn RngCore) {
        for slot in &mut self.slots {
            if !self.recycler.is_behind(slot.position.z, camera_z) {
                continue;
            }
            let z = self.recycler.respawn_z(camera_z, slot.z_offset);
            let Midpoint { position, roll } =
                placement::safe_midpoint(rng, CorridorTrack::xy_from_z(z));
            slot.position = Vec3::new(position.x, position.y, z);
            slot.roll = roll;
        }
    }

    fn advance(&mut self, t: f32, dt: f32, rng: &mut dyn RngCore, graph: &mut FrameGraph) {
        let pose = self.camera.advance(t, dt);
        self.recycle_passed_tubes(pose.position.z, rng);

        graph.camera = CameraSpec {
            pose,
            fov_y: 75.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
        };
        graph.ambience = Ambience {
            background: palette::linear_rgb(palette::BACKGROUND),
            fog_near: FOG_NEAR,
            fog_far: FOG_FAR,
            ambient: AMBIENT,
        };
        graph.lights.push(LightSpec {
            position: self.track.position_at(t + LIGHT_LEAD_S),
            color: palette::linear_rgb(palette::LIGHT),
            intensity: LIGHT_INTENSITY,
            radius: LIGHT_RADIUS,
        });
        for slot in &self.slots {
            graph.tubes.push(MeshInstance {
                transform: Mat4::from_scale_rotation_translation(
                    Vec3::new(1.0, slot.length, 1.0),
                    Quat::from_rotation_z(slot.roll),
                    slot.position,
                ),
                color: slot.color,
            });
        }
    }
}

impl Scene for TubesScene {
    fn name(&self) -> &'static str {
        "tubes"
    }

    fn enter(&mut self, rng: &mut dyn RngCore) {
        self.camera = SmoothedCamera::new(self.track);
        self.slots.clear();
        for _ in 0..TUBE_COUNT {
            let slot = self.spawn_slot(rng);
            self.slots.push(slot);
        }
        info!(scene = self.name(), tubes = self.slots.len(), "enter");
    }

    fn update(&mut self, t: f32, dt: f32, rng: &mut dyn RngCore, graph: &mut FrameGraph) {
        self.advance(t, dt, rng, graph);
    }

    fn exit(&mut self) {
        info!(scene = self.name(), "exit");
    }
}
