use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec3;

use crate::TrackSample;

/// Step used for the central-difference tangent, in seconds.
const TANGENT_EPSILON: f32 = 1e-3;

/// A closed Lissajous-like loop in 3D. The curve wraps exactly once per
/// [`period`](LoopTrack::period) seconds, so `position_at(t)` is periodic
/// in `t` for all real `t`, including negative times.
///
/// Each axis is a sinusoid at a different fraction of the loop angle,
/// which keeps the path inside a cube of half-extent
/// [`radius`](LoopTrack::radius) while never self-intersecting at
/// shallow angles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopTrack {
    /// Seconds for one full traversal of the loop.
    pub period: f32,
    /// Half-extent of the bounding cube containing the curve.
    pub radius: f32,
}

impl Default for LoopTrack {
    fn default() -> Self {
        Self {
            period: 120.0,
            radius: 400.0,
        }
    }
}

impl LoopTrack {
    pub fn new(period: f32, radius: f32) -> Self {
        Self { period, radius }
    }

    /// Fraction of the loop completed at time `t`, in `[0, 1)`.
    ///
    /// `rem_euclid` keeps the result non-negative for negative `t`,
    /// so the curve is total over all of time.
    pub fn progress_at(&self, t: f32) -> f32 {
        t.rem_euclid(self.period) / self.period
    }

    /// Position at a loop fraction in `[0, 1)`. Fractions outside that
    /// range are accepted; the sinusoids extend them periodically.
    pub fn position_at_progress(&self, progress: f32) -> Vec3 {
        let d = progress * TAU;
        Vec3::new(
            (d / 2.0 - FRAC_PI_4).sin() * self.radius,
            (d / 3.0 + FRAC_PI_4).sin() * self.radius,
            (d / 5.0).cos() * self.radius,
        )
    }

    /// Position on the loop at time `t`.
    pub fn position_at(&self, t: f32) -> Vec3 {
        self.position_at_progress(self.progress_at(t))
    }

    /// Unit tangent at time `t`, via central difference. The curve has
    /// no stationary points, so the difference never degenerates.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3, epsilon: f32) -> bool {
        (a - b).length() < epsilon
    }

    #[test]
    fn test_position_is_periodic() {
        let track = LoopTrack::default();
        for &t in &[0.0, 13.7, 59.99, 100.25] {
            let here = track.position_at(t);
            let next_lap = track.position_at(t + track.period);
            assert!(
                approx_eq(here, next_lap, 1e-2),
                "position at t={t} diverged after one period: {here:?} vs {next_lap:?}"
            );
        }
    }

    #[test]
    fn test_negative_time_matches_wrapped_time() {
        let track = LoopTrack::default();
        let wrapped = track.position_at(-30.0 + track.period);
        let negative = track.position_at(-30.0);
        assert!(approx_eq(wrapped, negative, 1e-2));
    }

    #[test]
    fn test_progress_stays_in_unit_interval() {
        let track = LoopTrack::default();
        for &t in &[-500.0, -0.001, 0.0, 60.0, 119.999, 120.0, 1e6] {
            let p = track.progress_at(t);
            assert!((0.0..1.0).contains(&p), "progress {p} out of range at t={t}");
        }
    }

    #[test]
    fn test_position_at_zero_progress() {
        let track = LoopTrack::default();
        let pos = track.position_at_progress(0.0);
        // sin(-pi/4)*400, sin(pi/4)*400, cos(0)*400
        let expected = Vec3::new(
            -std::f32::consts::FRAC_1_SQRT_2 * 400.0,
            std::f32::consts::FRAC_1_SQRT_2 * 400.0,
            400.0,
        );
        assert!(approx_eq(pos, expected, 1e-3), "{pos:?} vs {expected:?}");
    }

    #[test]
    fn test_position_stays_inside_bounding_cube() {
        let track = LoopTrack::default();
        for i in 0..=1000 {
            let t = i as f32 * 0.12;
            let pos = track.position_at(t);
            assert!(pos.x.abs() <= track.radius + 1e-3);
            assert!(pos.y.abs() <= track.radius + 1e-3);
            assert!(pos.z.abs() <= track.radius + 1e-3);
        }
    }

    #[test]
    fn test_forward_is_unit_length() {
        let track = LoopTrack::default();
        for i in 0..=240 {
            let t = i as f32 * 0.5;
            let forward = track.forward_at(t);
            assert!(
                (forward.length() - 1.0).abs() < 1e-4,
                "tangent not unit at t={t}: {forward:?}"
            );
            assert!(forward.is_finite(), "tangent not finite at t={t}");
        }
    }

    #[test]
    fn test_forward_points_toward_future_position() {
        let track = LoopTrack::default();
        let t = 42.0;
        let forward = track.forward_at(t);
        let toward_future = (track.position_at(t + 0.1) - track.position_at(t)).normalize();
        assert!(
            forward.dot(toward_future) > 0.99,
            "tangent disagrees with short-horizon displacement"
        );
    }

    #[test]
    fn test_sample_combines_position_and_forward() {
        let track = LoopTrack::default();
        let sample = track.sample(7.5);
        assert_eq!(sample.position, track.position_at(7.5));
        assert_eq!(sample.forward, track.forward_at(7.5));
    }
}
