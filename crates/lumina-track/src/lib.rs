//! Parametric track curves: pure functions mapping time to positions along
//! the camera's flight path.
//!
//! Two curve families are provided: [`LoopTrack`], a closed Lissajous-like
//! 3D loop with a fixed period, and [`CorridorTrack`], an unbounded winding
//! corridor advancing at constant speed along -Z.

pub mod corridor;
pub mod loop_track;

pub use corridor::CorridorTrack;
pub use loop_track::LoopTrack;

use glam::Vec3;

/// A single sample of a track at some time: where the track is and which
/// way it is heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackSample {
    /// Position on the track.
    pub position: Vec3,
    /// Unit-length forward direction (tangent).
    pub forward: Vec3,
}
