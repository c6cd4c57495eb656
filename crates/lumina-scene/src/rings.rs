//! Closed-loop flythrough through a chain of colored rings.

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec3};
use lumina_camera::LookaheadCamera;
use lumina_track::LoopTrack;
use rand::RngCore;
use tracing::info;

use crate::graph::{Ambience, CameraSpec, FrameGraph, LightSpec, MeshInstance};
use crate::palette;
use crate::Scene;

/// Rings distributed evenly around the loop.
const RING_COUNT: usize = 180;
/// Distance fog band.
const FOG_NEAR: f32 = 20.0;
const FOG_FAR: f32 = 40.0;
const AMBIENT: f32 = 0.6;
/// Seconds the leading light runs ahead of the camera.
const LIGHT_LEAD_S: f32 = 0.5;
const LIGHT_INTENSITY: f32 = 0.03;
const LIGHT_RADIUS: f32 = 30.0;
/// Spheres drifting ahead of the camera.
const SPHERE_COUNT: usize = 8;
/// Seconds between one sphere overtaking the camera and the next.
const SPHERE_PASSING_PERIOD_S: f32 = 8.0;
/// Seconds of track separating adjacent spheres.
const SPHERE_SPACING_S: f32 = 0.5;
/// Radius of the corkscrew the spheres trace around the track.
const SPHERE_ORBIT_RADIUS: f32 = 0.25;

/// The rings scene: a fixed chain of rings around the loop, a warm
/// light ahead of the camera, and a procession of small spheres
/// corkscrewing down the track toward the viewer.
pub struct RingsScene {
    track: LoopTrack,
    camera: LookaheadCamera,
    rings: Vec<MeshInstance>,
}

impl Default for RingsScene {
    fn default() -> Self {
        Self::new()
    }
}

impl RingsScene {
    pub fn new() -> Self {
        let track = LoopTrack::default();
        Self {
            track,
            camera: LookaheadCamera::new(track, 0.1),
            rings: build_rings(&track, RING_COUNT),
        }
    }

    fn push_leading_spheres(&self, t: f32, graph: &mut FrameGraph) {
        let color = palette::linear_rgb(palette::LIGHT);
        let spheres_passed = (t / SPHERE_PASSING_PERIOD_S).floor() as usize;
        // Fraction of the way to the next sphere overtaking the camera.
        let passing_phase = t.rem_euclid(SPHERE_PASSING_PERIOD_S) / SPHERE_PASSING_PERIOD_S;

        for i in 0..SPHERE_COUNT {
            // Stable identity per sphere: as one falls behind and is
            // promoted to the front of the procession, its orbit phase
            // follows it.
            let n = (i + spheres_passed) % SPHERE_COUNT;
            let future_t = t + SPHERE_SPACING_S * i as f32 - passing_phase * SPHERE_SPACING_S;
            let on_track = self.track.position_at(future_t);

            let orbit = TAU * (passing_phase + n as f32 / SPHERE_COUNT as f32);
            let offset = Vec3::new(
                orbit.cos() * SPHERE_ORBIT_RADIUS,
                orbit.sin() * SPHERE_ORBIT_RADIUS,
                0.0,
            );
            graph.spheres.push(MeshInstance {
                transform: Mat4::from_translation(on_track + offset),
                color,
            });
        }
    }
}

/// Positions one ring per loop fraction, oriented to face along the
/// track by aiming each ring's axis at the displacement from its
/// predecessor.
fn build_rings(track: &LoopTrack, count: usize) -> Vec<MeshInstance> {
    let positions: Vec<Vec3> = (0..count)
        .map(|i| track.position_at_progress(i as f32 / count as f32))
        .collect();

    (0..count)
        .map(|i| {
            let position = positions[i];
            let previous = positions[(i + count - 1) % count];
            let direction = (position - previous).normalize();
            let orientation = Quat::from_rotation_arc(Vec3::Z, direction);
            MeshInstance {
                transform: Mat4::from_rotation_translation(orientation, position),
                color: palette::linear_rgb(palette::RINGS[i % palette::RINGS.len()]),
            }
        })
        .collect()
}

impl Scene for RingsScene {
    fn name(&self) -> &'static str {
        "rings"
    }

    fn enter(&mut self, _rng: &mut dyn RngCore) {
        // Ring geometry is deterministic; nothing to reseed.
        info!(scene = self.name(), "enter");
    }

    fn update(&mut self, t: f32, _dt: f32, _rng: &mut dyn RngCore, graph: &mut FrameGraph) {
        graph.camera = CameraSpec {
            pose: self.camera.pose_at(t),
            fov_y: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
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
        graph.toruses.extend_from_slice(&self.rings);
        self.push_leading_spheres(t, graph);
    }

    fn exit(&mut self) {
        info!(scene = self.name(), "exit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn update_at(scene: &mut RingsScene, t: f32) -> FrameGraph {
        let mut graph = FrameGraph::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        scene.update(t, 1.0 / 60.0, &mut rng, &mut graph);
        graph
    }

    #[test]
    fn test_populates_all_instance_counts() {
        let mut scene = RingsScene::new();
        let graph = update_at(&mut scene, 1.0);
        assert_eq!(graph.toruses.len(), RING_COUNT);
        assert_eq!(graph.spheres.len(), SPHERE_COUNT);
        assert_eq!(graph.lights.len(), 1);
    }

    #[test]
    fn test_rings_sit_on_the_track() {
        let scene = RingsScene::new();
        for (i, ring) in scene.rings.iter().enumerate() {
            let expected = scene
                .track
                .position_at_progress(i as f32 / RING_COUNT as f32);
            let actual = ring.transform.w_axis.truncate();
            assert!(
                (actual - expected).length() < 1e-3,
                "ring {i} off the track"
            );
        }
    }

    #[test]
    fn test_ring_axes_follow_the_track() {
        let scene = RingsScene::new();
        for i in 1..RING_COUNT {
            let here = scene.rings[i].transform.w_axis.truncate();
            let prev = scene.rings[i - 1].transform.w_axis.truncate();
            let expected = (here - prev).normalize();
            let axis = scene.rings[i].transform.transform_vector3(Vec3::Z);
            assert!(
                axis.dot(expected) > 0.999,
                "ring {i} axis does not face along the track"
            );
        }
    }

    #[test]
    fn test_ring_colors_cycle_through_the_palette() {
        let scene = RingsScene::new();
        let stride = palette::RINGS.len();
        assert_eq!(scene.rings[0].color, scene.rings[stride].color);
        assert_ne!(scene.rings[0].color, scene.rings[1].color);
    }

    #[test]
    fn test_camera_aims_slightly_ahead() {
        let mut scene = RingsScene::new();
        let graph = update_at(&mut scene, 10.0);
        assert_eq!(graph.camera.pose.position, scene.track.position_at(10.0));
        assert_eq!(graph.camera.pose.target, scene.track.position_at(10.1));
    }

    #[test]
    fn test_light_leads_the_camera() {
        let mut scene = RingsScene::new();
        let graph = update_at(&mut scene, 10.0);
        assert_eq!(graph.lights[0].position, scene.track.position_at(10.5));
    }

    #[test]
    fn test_spheres_hug_the_track_ahead() {
        let mut scene = RingsScene::new();
        let t = 3.0;
        let graph = update_at(&mut scene, t);
        for (i, sphere) in graph.spheres.iter().enumerate() {
            let center = sphere.transform.w_axis.truncate();
            let future_t = t + SPHERE_SPACING_S * i as f32
                - (t.rem_euclid(SPHERE_PASSING_PERIOD_S) / SPHERE_PASSING_PERIOD_S)
                    * SPHERE_SPACING_S;
            let on_track = scene.track.position_at(future_t);
            let distance = (center - on_track).length();
            assert!(
                (distance - SPHERE_ORBIT_RADIUS).abs() < 1e-4,
                "sphere {i} strayed from its orbit"
            );
        }
    }

    #[test]
    fn test_reenter_is_stable() {
        let mut scene = RingsScene::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let before = update_at(&mut scene, 2.0);
        scene.exit();
        scene.enter(&mut rng);
        let after = update_at(&mut scene, 2.0);
        assert_eq!(before.toruses.len(), after.toruses.len());
        assert_eq!(before.toruses[0].color, after.toruses[0].color);
    }
}
