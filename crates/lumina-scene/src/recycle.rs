//! Look-behind object recycling for the endless corridor.
//!
//! Each object carries a fixed depth offset drawn at spawn. When the
//! camera passes an object by more than the look-behind margin, the
//! object jumps forward to the current placement window at the same
//! offset, so the population density along the corridor stays constant
//! without ever allocating.

use rand::Rng;

/// Relocation rule for objects the camera has passed.
#[derive(Clone, Copy, Debug)]
pub struct Recycler {
    /// How far behind the camera (toward +Z) an object may trail
    /// before it is respawned ahead.
    pub lookbehind: f32,
    /// Depth of the placement window objects are distributed over.
    pub range: f32,
}

impl Recycler {
    pub fn new(lookbehind: f32, range: f32) -> Self {
        Self { lookbehind, range }
    }

    /// Draws the per-object depth offset used for both the initial
    /// spawn and every respawn. Offsets near `-lookbehind` start
    /// slightly behind the camera; offsets near `range - lookbehind`
    /// start deep ahead.
    pub fn spawn_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.gen_range(-self.lookbehind..self.range - self.lookbehind)
    }

    /// Initial depth for an object with the given offset. The camera
    /// starts at z = 0 and advances toward -Z.
    pub fn initial_z(&self, z_offset: f32) -> f32 {
        -z_offset
    }

    /// Whether the object has fallen far enough behind the camera to
    /// be respawned.
    pub fn is_behind(&self, object_z: f32, camera_z: f32) -> bool {
        object_z > camera_z + self.lookbehind
    }

    /// New depth for a respawned object: the start of the placement
    /// window the camera is currently in, minus the object's offset.
    /// Quantizing to window starts keeps respawn depths stable while
    /// the camera crosses a window.
    pub fn respawn_z(&self, camera_z: f32, z_offset: f32) -> f32 {
        (camera_z / self.range).floor() * self.range - z_offset
    }
}
