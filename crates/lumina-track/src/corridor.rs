use std::f32::consts::FRAC_PI_4;

use glam::{Vec2, Vec3};

use crate::TrackSample;

/// Step used for the central-difference tangent, in seconds.
const TANGENT_EPSILON: f32 = 1e-3;

/// Lateral swing amplitude of the corridor, in world units.
const SWAY_AMPLITUDE: f32 = 40.0;

/// An unbounded winding corridor. Depth advances at constant
/// [`speed`](CorridorTrack::speed) along -Z while the XY offset sways
/// on two near-equal sinusoid frequencies, producing a slow drifting
/// weave that never repeats over any practical session length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorridorTrack {
    /// World units travelled along -Z per second.
    pub speed: f32,
}

impl Default for CorridorTrack {
    fn default() -> Self {
        Self { speed: 10.0 }
    }
}

impl CorridorTrack {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Lateral offset of the corridor centerline at depth `z`.
    ///
    /// The two divisors are deliberately close (31 and 30): the phases
    /// beat against each other so the weave precesses instead of
    /// tracing a fixed figure.
    pub fn xy_from_z(z: f32) -> Vec2 {
        Vec2::new(
            (z / 31.0 - FRAC_PI_4).sin() * SWAY_AMPLITUDE,
            (z / 30.0 - FRAC_PI_4).sin() * SWAY_AMPLITUDE,
        )
    }

    /// Depth reached at time `t`. Monotonically decreasing.
    pub fn depth_at(&self, t: f32) -> f32 {
        -t * self.speed
    }

    /// Position on the corridor centerline at time `t`.
    pub fn position_at(&self, t: f32) -> Vec3 {
        let z = self.depth_at(t);
        let xy = Self::xy_from_z(z);
        Vec3::new(xy.x, xy.y, z)
    }

    /// Unit tangent at time `t`, via central difference. The depth
    /// component always moves, so the difference never degenerates.
    pub fn forward_at(&self, t: f32) -> Vec3 {
        let ahead = self.position_at(t + TANGENT_EPSILON);
        let behind = self.position_at(t - TANGENT_EPSILON);
        (ahead - behind).normalize()
    }

    /// Position and heading at time `t`.
    pub fn sample(&self, t: f32) -> TrackSample {
        TrackSample {
            position: self.position_at(t),
            forward: self.forward_at(t),
        }
    }
}
