//! Routes touch drags into scene navigation commands.

use tracing::debug;
use winit::event::{Touch, TouchPhase};

use crate::touch::{Axis, TouchTracker};

/// A request to move through the scene list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneCommand {
    Next,
    Previous,
}

/// Turns horizontal swipes into [`SceneCommand`]s.
///
/// One swipe yields exactly one command: the first horizontal update
/// from a locked contact decides the direction and consumes the
/// contact, so however far the finger keeps dragging, nothing more
/// happens until it lifts and touches again. Vertical locks produce no
/// commands at all.
#[derive(Clone, Debug, Default)]
pub struct GestureRouter {
    tracker: TouchTracker,
}

impl GestureRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with a custom swipe threshold in pixels.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            tracker: TouchTracker::new(threshold),
        }
    }

    /// Feeds a winit touch event through the tracker.
    pub fn handle_touch(&mut self, touch: &Touch) -> Option<SceneCommand> {
        let (x, y) = (touch.location.x, touch.location.y);
        match touch.phase {
            TouchPhase::Started => {
                self.tracker.touch_started(touch.id, x, y);
                None
            }
            TouchPhase::Moved => self.touch_moved(touch.id, x, y),
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.tracker.touch_ended(touch.id);
                None
            }
        }
    }

    pub fn touch_started(&mut self, id: u64, x: f64, y: f64) {
        self.tracker.touch_started(id, x, y);
    }

    /// Dragging left (negative delta) advances to the next scene, the
    /// way content follows a finger pushing it off-screen.
    pub fn touch_moved(&mut self, id: u64, x: f64, y: f64) -> Option<SceneCommand> {
        let swipe = self.tracker.touch_moved(id, x, y)?;
        if swipe.axis != Axis::X {
            return None;
        }
        self.tracker.consume(swipe.id);
        let command = if swipe.delta < 0.0 {
            SceneCommand::Next
        } else {
            SceneCommand::Previous
        };
        debug!(?command, delta = swipe.delta, "swipe");
        Some(command)
    }

    pub fn touch_ended(&mut self, id: u64) {
        self.tracker.touch_ended(id);
    }
}

/// Position in a fixed list of scenes, wrapping at both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneIndex {
    current: usize,
    count: usize,
}

impl SceneIndex {
    /// `count` must be at least 1.
    pub fn new(count: usize) -> Self {
        assert!(count >= 1, "scene list cannot be empty");
        Self { current: 0, count }
    }

    /// Index starting at `start`, wrapped into range.
    pub fn starting_at(count: usize, start: usize) -> Self {
        let mut index = Self::new(count);
        index.current = start % count;
        index
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.count;
        self.current
    }

    pub fn previous(&mut self) -> usize {
        self.current = (self.current + self.count - 1) % self.count;
        self.current
    }

    pub fn apply(&mut self, command: SceneCommand) -> usize {
        match command {
            SceneCommand::Next => self.next(),
            SceneCommand::Previous => self.previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_swipe_one_command() {
        let mut router = GestureRouter::new();
        router.touch_started(1, 200.0, 100.0);
        // Locked and consumed on the first over-threshold update.
        assert_eq!(
            router.touch_moved(1, 150.0, 100.0),
            Some(SceneCommand::Next)
        );
        // The finger keeps dragging; no further commands.
        assert_eq!(router.touch_moved(1, 100.0, 100.0), None);
        assert_eq!(router.touch_moved(1, 20.0, 100.0), None);
    }

    #[test]
    fn test_swipe_right_goes_to_previous() {
        let mut router = GestureRouter::new();
        router.touch_started(1, 100.0, 100.0);
        assert_eq!(
            router.touch_moved(1, 160.0, 100.0),
            Some(SceneCommand::Previous)
        );
    }

    #[test]
    fn test_vertical_swipe_changes_nothing() {
        let mut router = GestureRouter::new();
        router.touch_started(1, 100.0, 100.0);
        // Mostly vertical: locks to Y, so even the large X component
        // later cannot switch scenes.
        assert_eq!(router.touch_moved(1, 108.0, 180.0), None);
        assert_eq!(router.touch_moved(1, 200.0, 260.0), None);
    }

    #[test]
    fn test_lift_and_retouch_allows_another_swipe() {
        let mut router = GestureRouter::new();
        router.touch_started(1, 200.0, 100.0);
        assert!(router.touch_moved(1, 150.0, 100.0).is_some());
        router.touch_ended(1);

        router.touch_started(2, 200.0, 100.0);
        assert_eq!(
            router.touch_moved(2, 150.0, 100.0),
            Some(SceneCommand::Next)
        );
    }

    #[test]
    fn test_index_wraps_backward_from_zero() {
        let mut index = SceneIndex::new(3);
        assert_eq!(index.current(), 0);
        assert_eq!(index.apply(SceneCommand::Previous), 2);
    }

    #[test]
    fn test_index_wraps_forward_from_last() {
        let mut index = SceneIndex::new(3);
        index.next();
        index.next();
        assert_eq!(index.current(), 2);
        assert_eq!(index.apply(SceneCommand::Next), 0);
    }

    #[test]
    fn test_index_starting_at_wraps() {
        let index = SceneIndex::starting_at(2, 5);
        assert_eq!(index.current(), 1);
    }

    #[test]
    fn test_index_round_trip() {
        let mut index = SceneIndex::new(2);
        assert_eq!(index.apply(SceneCommand::Next), 1);
        assert_eq!(index.apply(SceneCommand::Next), 0);
        assert_eq!(index.apply(SceneCommand::Previous), 1);
    }
}
