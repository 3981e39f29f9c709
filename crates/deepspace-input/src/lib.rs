//! Input bridge for the deep space backdrop.
//!
//! Translates winit pointer and wheel events into scene updates.

pub mod bridge;
pub mod mouse;

pub use bridge::{InputBridge, InputSink};
pub use mouse::{PIXELS_PER_LINE, PointerState, to_ndc, wheel_delta_y};
