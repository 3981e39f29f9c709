//! Scalars shared by every part of the scene: the clock, the global speed
//! multiplier and the wheel-driven sparkle pulse.

/// Slowest the scene may drift.
pub const MIN_SPEED: f32 = 0.2;
/// Fastest the scene may drift.
pub const MAX_SPEED: f32 = 3.0;
/// Speed change per unit of wheel `deltaY`.
pub const WHEEL_SENSITIVITY: f32 = 0.001;
/// Per-frame sparkle decay factor.
pub const SPARKLE_DECAY: f32 = 0.92;
/// Sparkle below this snaps to zero.
pub const SPARKLE_CUTOFF: f32 = 0.01;

/// Mutable state threaded through every update step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// Accumulated simulation seconds.
    pub time: f32,
    /// Global drift multiplier, always within [`MIN_SPEED`, `MAX_SPEED`].
    pub speed_multiplier: f32,
    /// Overlay brightness pulse in [0, 1].
    pub sparkle: f32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            time: 0.0,
            speed_multiplier: 1.0,
            sparkle: 0.0,
        }
    }
}

impl SimulationState {
    /// Apply one wheel notification. `delta_y` uses browser sign conventions:
    /// negative scrolls up and speeds the scene up.
    pub fn apply_wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        self.speed_multiplier =
            (self.speed_multiplier - delta_y * WHEEL_SENSITIVITY).clamp(MIN_SPEED, MAX_SPEED);
        self.sparkle = 1.0;
    }

    /// Multiply sparkle by [`SPARKLE_DECAY`], snapping to exactly 0 below the cutoff.
    pub fn decay_sparkle(&mut self) {
        self.sparkle *= SPARKLE_DECAY;
        if self.sparkle < SPARKLE_CUTOFF {
            self.sparkle = 0.0;
        }
    }
}
