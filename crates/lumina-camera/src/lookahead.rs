use lumina_track::LoopTrack;

use crate::CameraPose;

/// Camera that sits on the loop and looks at a point slightly further
/// along the same loop. Orientation comes straight from the curve, so
/// the view banks through every turn without any filtering.
#[derive(Clone, Copy, Debug)]
pub struct LookaheadCamera {
    /// Curve the camera rides.
    pub track: LoopTrack,
    /// Seconds ahead on the curve to aim at.
    pub lookahead: f32,
}

impl Default for LookaheadCamera {
    fn default() -> Self {
        Self {
            track: LoopTrack::default(),
            lookahead: 0.1,
        }
    }
}

impl LookaheadCamera {
    pub fn new(track: LoopTrack, lookahead: f32) -> Self {
        Self { track, lookahead }
    }

    /// Pose at time `t`: eye on the curve, target ahead of it.
    pub fn pose_at(&self, t: f32) -> CameraPose {
        CameraPose {
            position: self.track.position_at(t),
            target: self.track.position_at(t + self.lookahead),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_sits_on_the_track() {
        let camera = LookaheadCamera::default();
        let pose = camera.pose_at(12.0);
        assert_eq!(pose.position, camera.track.position_at(12.0));
    }

    #[test]
    fn test_target_is_the_future_track_position() {
        let camera = LookaheadCamera::default();
        let pose = camera.pose_at(12.0);
        assert_eq!(pose.target, camera.track.position_at(12.1));
    }

    #[test]
    fn test_forward_roughly_matches_track_tangent() {
        let camera = LookaheadCamera::default();
        for &t in &[0.0, 30.0, 77.5, 119.0] {
            let pose = camera.pose_at(t);
            let tangent = camera.track.forward_at(t);
            assert!(
                pose.forward().dot(tangent) > 0.99,
                "view direction drifted from the tangent at t={t}"
            );
        }
    }

    #[test]
    fn test_pose_wraps_with_the_loop() {
        let camera = LookaheadCamera::default();
        let a = camera.pose_at(5.0);
        let b = camera.pose_at(5.0 + camera.track.period);
        assert!((a.position - b.position).length() < 1e-2);
        assert!((a.target - b.target).length() < 1e-2);
    }
}
