//! Real-time frame delta measurement.
//!
//! The scene steps once per redraw with the measured delta. Long stalls
//! (minimized windows, debugger pauses) are clamped so entities do not jump.

use std::time::Instant;
use tracing::warn;

/// Longest delta handed to the simulation, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Clamp a measured delta to `[0, MAX_FRAME_DELTA]`. Non-finite input maps to 0.
pub fn clamp_delta(seconds: f32) -> f32 {
    if !seconds.is_finite() {
        return 0.0;
    }
    seconds.clamp(0.0, MAX_FRAME_DELTA)
}

/// Measures the time between consecutive redraws.
pub struct FrameClock {
    previous: Instant,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous: Instant::now(),
            frame_count: 0,
        }
    }

    /// Seconds since the previous tick, clamped.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.previous).as_secs_f32();
        self.previous = now;
        self.frame_count += 1;

        if elapsed > MAX_FRAME_DELTA {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                elapsed * 1000.0,
                MAX_FRAME_DELTA * 1000.0
            );
        }
        clamp_delta(elapsed)
    }

    /// Restart timing from now, so the next tick does not include a pause.
    pub fn reset(&mut self) {
        self.previous = Instant::now();
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clamp_delta_bounds() {
        assert_eq!(clamp_delta(0.016), 0.016);
        assert_eq!(clamp_delta(3.0), MAX_FRAME_DELTA);
        assert_eq!(clamp_delta(-0.5), 0.0);
        assert_eq!(clamp_delta(f32::NAN), 0.0);
        assert_eq!(clamp_delta(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_tick_measures_elapsed_time() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(5));
        let dt = clock.tick();
        assert!(dt >= 0.004, "dt {dt} should cover the sleep");
        assert!(dt <= MAX_FRAME_DELTA);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        clock.previous = Instant::now() - Duration::from_secs(2);
        assert_eq!(clock.tick(), MAX_FRAME_DELTA);
    }

    #[test]
    fn test_reset_drops_pending_time() {
        let mut clock = FrameClock::new();
        clock.previous = Instant::now() - Duration::from_secs(2);
        clock.reset();
        assert!(clock.tick() < 0.1);
    }
}
