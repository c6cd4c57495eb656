//! Application shell: window lifecycle, the per-scene frame clock, and
//! the event loop that drives scene updates into the renderer.

pub mod clock;
pub mod host;

pub use clock::{FrameClock, FrameTiming};
pub use host::{SceneHost, run, window_attributes_from_config};
