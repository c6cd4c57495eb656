use glam::Vec3;
use lumina_track::CorridorTrack;

use crate::CameraPose;

/// Number of past positions kept for heading smoothing.
pub const HISTORY_LEN: usize = 20;

/// Frame delta (seconds) above which the controller treats the frame as
/// a stall: the clock jumped while the window was not being drawn, and
/// aiming along the resulting huge displacement would whiplash the view.
const STALL_THRESHOLD: f32 = 2.0;

/// Camera that rides the corridor and aims along the displacement from
/// its position [`HISTORY_LEN`] frames ago. The ring buffer gives the
/// heading about a third of a second of inertia, which hides the
/// per-frame jitter of the sway curve.
#[derive(Clone, Debug)]
pub struct SmoothedCamera {
    /// Curve the camera rides.
    pub track: CorridorTrack,
    history: [Vec3; HISTORY_LEN],
    frame: usize,
    position: Vec3,
    direction: Vec3,
}

impl Default for SmoothedCamera {
    fn default() -> Self {
        Self::new(CorridorTrack::default())
    }
}

impl SmoothedCamera {
    pub fn new(track: CorridorTrack) -> Self {
        let start = track.position_at(0.0);
        Self {
            track,
            history: [start; HISTORY_LEN],
            frame: 0,
            position: start,
            // Looking into the screen until the history says otherwise.
            direction: Vec3::NEG_Z,
        }
    }

    /// Advance one frame. `t` is seconds since the scene was entered,
    /// `dt` seconds since the previous frame.
    ///
    /// A stalled frame (`dt` above the threshold) freezes the camera:
    /// the history is reseeded with the current position and the
    /// previous pose is returned unchanged, so the next normal frame
    /// starts smoothing from here instead of across the gap.
    pub fn advance(&mut self, t: f32, dt: f32) -> CameraPose {
        if dt > STALL_THRESHOLD {
            self.history = [self.position; HISTORY_LEN];
            return self.pose();
        }

        let slot = self.frame % HISTORY_LEN;
        let prev = self.history[slot];
        self.position = self.track.position_at(t);
        self.direction = (self.position - prev)
            .try_normalize()
            .unwrap_or(self.direction);
        self.history[slot] = self.position;
        self.frame = self.frame.wrapping_add(1);
        self.pose()
    }

    /// Pose from the current position and smoothed heading.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.position + self.direction,
        }
    }
}
