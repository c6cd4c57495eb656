//! Procedural tube placement that never intersects the camera path.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::Rng;

/// Closest a tube midpoint may sit to the camera path, in the XY plane.
pub const MIN_XY_DISTANCE: f32 = 2.0;
/// Farthest a tube midpoint may sit from the camera path.
pub const MAX_XY_DISTANCE: f32 = 20.0;
/// Minimum angle between a tube and the perpendicular from the camera
/// path to its midpoint. A tube perpendicular to that spoke would sweep
/// across the path itself.
pub const PATH_AVOIDANCE_ANGLE: f32 = PI / 8.0;

/// A generated tube midpoint: XY position plus roll about the Z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Midpoint {
    pub position: Vec2,
    /// Rotation about Z applied to the Y-aligned cylinder.
    pub roll: f32,
}

/// Places a midpoint at a random angle and distance from the camera
/// path, then picks the tube's own angle at least
/// [`PATH_AVOIDANCE_ANGLE`] away from the spoke on either side so the
/// tube cannot cross the path.
pub fn safe_midpoint<R: Rng + ?Sized>(rng: &mut R, path_xy: Vec2) -> Midpoint {
    let distance = rng.gen_range(MIN_XY_DISTANCE..MAX_XY_DISTANCE);
    let spoke_angle = rng.gen_range(0.0..TAU);
    let tube_angle = spoke_angle + rng.gen_range(PATH_AVOIDANCE_ANGLE..PI - PATH_AVOIDANCE_ANGLE);

    let position = path_xy + Vec2::new(spoke_angle.cos(), spoke_angle.sin()) * distance;
    // The cylinder mesh runs along +Y; subtract a quarter turn so a
    // tube angle of zero lies along +X.
    Midpoint {
        position,
        roll: tube_angle - FRAC_PI_2,
    }
}
