//! Input abstraction: keyboard edges and touch swipes routed into scene
//! navigation commands.

pub mod gesture;
pub mod keyboard;
pub mod touch;

pub use gesture::{GestureRouter, SceneCommand, SceneIndex};
pub use keyboard::KeyboardState;
pub use touch::{Axis, Swipe, TouchTracker};
