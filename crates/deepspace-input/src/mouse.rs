//! Pointer tracking and wheel translation.
//!
//! [`PointerState`] follows `CursorMoved` events and keeps the position both
//! in physical pixels and in normalized device coordinates. Wheel events are
//! converted to browser-style `deltaY` values by [`wheel_delta_y`].

use glam::Vec2;
use winit::event::MouseScrollDelta;

/// Pixels of `deltaY` per wheel notch.
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Convert a winit scroll delta to a browser-style `deltaY`: positive when
/// scrolling down, measured in pixels.
///
/// winit reports upward scrolling as positive `y`, so both variants flip sign.
pub fn wheel_delta_y(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_x, y) => -y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

/// Last known pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Vec2,
    ndc: Vec2,
    in_window: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            ndc: Vec2::ZERO,
            in_window: false,
        }
    }

    /// Process a `CursorMoved` event for a viewport of `viewport` pixels.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64, viewport: (u32, u32)) {
        self.position = Vec2::new(x as f32, y as f32);
        self.ndc = to_ndc(self.position, viewport);
        self.in_window = true;
    }

    pub fn on_cursor_left(&mut self) {
        self.in_window = false;
    }

    /// Cursor position in physical pixels, origin top-left.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Cursor position in [-1, 1] with +y up.
    #[must_use]
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    #[must_use]
    pub fn in_window(&self) -> bool {
        self.in_window
    }
}

/// Map a pixel position to [-1, 1] with +y up. Degenerate viewports map to 0.
pub fn to_ndc(position: Vec2, viewport: (u32, u32)) -> Vec2 {
    let (width, height) = viewport;
    if width == 0 || height == 0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        position.x / width as f32 * 2.0 - 1.0,
        -(position.y / height as f32 * 2.0 - 1.0),
    )
}
