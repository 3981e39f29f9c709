//! Routes window events to the scene.
//!
//! The bridge stands in for the pointer, wheel and resize listeners of the
//! mounted backdrop. While detached it ignores everything, so the host can
//! keep forwarding events after teardown.

use deepspace_scene::{Simulation, SimulationState};
use glam::Vec2;
use tracing::debug;
use winit::event::{MouseScrollDelta, WindowEvent};

use crate::mouse::{PointerState, wheel_delta_y};

/// Receiver of wheel `deltaY` values.
pub trait InputSink {
    fn apply_wheel(&mut self, delta_y: f32);
}

impl InputSink for SimulationState {
    fn apply_wheel(&mut self, delta_y: f32) {
        SimulationState::apply_wheel(self, delta_y);
    }
}

impl InputSink for Simulation {
    fn apply_wheel(&mut self, delta_y: f32) {
        Simulation::apply_wheel(self, delta_y);
    }
}

/// Listener attachment state plus the last pointer sample.
#[derive(Debug, Clone)]
pub struct InputBridge {
    pointer: PointerState,
    attached: bool,
    viewport: (u32, u32),
}

impl InputBridge {
    /// A detached bridge for a viewport of `viewport` physical pixels.
    pub fn new(viewport: (u32, u32)) -> Self {
        Self {
            pointer: PointerState::new(),
            attached: false,
            viewport,
        }
    }

    /// Start forwarding events. Attaching twice is a no-op.
    pub fn attach(&mut self) {
        if !self.attached {
            self.attached = true;
            debug!("Input listeners attached");
        }
    }

    /// Stop forwarding events. Detaching twice is a no-op.
    pub fn detach(&mut self) {
        if self.attached {
            self.attached = false;
            debug!("Input listeners detached");
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Pointer position in [-1, 1], y up. Retained only; nothing draws from it.
    #[must_use]
    pub fn pointer_ndc(&self) -> Vec2 {
        self.pointer.ndc()
    }

    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Returns `true` when the wheel event reached `sink`.
    pub fn on_wheel(&mut self, delta: MouseScrollDelta, sink: &mut impl InputSink) -> bool {
        if !self.attached {
            return false;
        }
        sink.apply_wheel(wheel_delta_y(delta));
        true
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> bool {
        if !self.attached {
            return false;
        }
        self.pointer.on_cursor_moved(x, y, self.viewport);
        true
    }

    pub fn on_cursor_left(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.pointer.on_cursor_left();
        true
    }

    /// Track the new viewport so later pointer samples normalize against it.
    pub fn on_resized(&mut self, width: u32, height: u32) -> bool {
        if !self.attached {
            return false;
        }
        self.viewport = (width, height);
        true
    }

    /// Dispatch a winit window event. Returns `true` if the bridge consumed it.
    pub fn handle_event(&mut self, event: &WindowEvent, sink: &mut impl InputSink) -> bool {
        match event {
            WindowEvent::MouseWheel { delta, .. } => self.on_wheel(*delta, sink),
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x, position.y)
            }
            WindowEvent::CursorLeft { .. } => self.on_cursor_left(),
            WindowEvent::Resized(size) => self.on_resized(size.width, size.height),
            _ => false,
        }
    }
}
