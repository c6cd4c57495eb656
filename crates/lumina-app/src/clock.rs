//! Per-scene frame clock.

use std::time::Instant;

/// Timing for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTiming {
    /// Seconds since the current scene was entered.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

/// Wall-clock time source for scene updates.
///
/// Scenes are parametric in elapsed time, so the clock rewinds to zero
/// on every scene switch. The per-frame delta is reported raw; the
/// smoothed camera watches it for stalls.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    scene_entered: Instant,
    last_frame: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            scene_entered: now,
            last_frame: now,
        }
    }

    /// Rewind both references to now. Called when a scene is entered.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.scene_entered = now;
        self.last_frame = now;
    }

    /// Timing for the frame starting now.
    pub fn tick(&mut self) -> FrameTiming {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTiming {
        let timing = FrameTiming {
            elapsed: now.duration_since(self.scene_entered).as_secs_f32(),
            delta: now.duration_since(self.last_frame).as_secs_f32(),
        };
        self.last_frame = now;
        timing
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_accumulates_across_frames() {
        let mut clock = FrameClock::new();
        let start = clock.scene_entered;
        let first = clock.tick_at(start + Duration::from_millis(16));
        let second = clock.tick_at(start + Duration::from_millis(32));
        assert!((first.elapsed - 0.016).abs() < 1e-4);
        assert!((second.elapsed - 0.032).abs() < 1e-4);
    }

    #[test]
    fn test_delta_measures_frame_to_frame() {
        let mut clock = FrameClock::new();
        let start = clock.scene_entered;
        clock.tick_at(start + Duration::from_millis(10));
        let timing = clock.tick_at(start + Duration::from_millis(35));
        assert!((timing.delta - 0.025).abs() < 1e-4);
    }

    #[test]
    fn test_reset_rewinds_elapsed_to_zero() {
        let mut clock = FrameClock::new();
        let start = clock.scene_entered;
        clock.tick_at(start + Duration::from_secs(5));
        clock.reset();
        let timing = clock.tick();
        assert!(timing.elapsed < 0.5);
        assert!(timing.delta < 0.5);
    }

    #[test]
    fn test_stall_arrives_as_one_large_delta() {
        // A long gap between frames shows up in the delta while elapsed
        // keeps counting from scene entry.
        let mut clock = FrameClock::new();
        let start = clock.scene_entered;
        clock.tick_at(start + Duration::from_millis(16));
        let timing = clock.tick_at(start + Duration::from_secs(3));
        assert!(timing.delta > 2.0);
        assert!((timing.elapsed - 3.0).abs() < 1e-3);
    }
}
