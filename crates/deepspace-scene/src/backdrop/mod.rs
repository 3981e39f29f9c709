//! The wavy far backdrop: one huge plane displaced by three traveling waves.
//!
//! It has no state of its own; everything is a function of position and the
//! simulation clock.

pub mod renderer;

use glam::{Vec2, Vec3};

use crate::palette::{DARK_VIOLET, DEEP_BLUE, DEEP_PURPLE};

pub const BACKDROP_SIZE: f32 = 15_000.0;
pub const BACKDROP_SEGMENTS: u32 = 128;
pub const BACKDROP_DEPTH: f32 = -4000.0;

/// Displacement along the view axis at plane-local `(x, y)`.
pub fn wave_elevation(position: Vec2, time: f32) -> f32 {
    let Vec2 { x, y } = position;
    let wave1 = (x * 0.001 + time * 0.3).sin() * (y * 0.001 + time * 0.2).cos() * 80.0;
    let wave2 = (x * 0.002 - time * 0.15).sin() * (y * 0.002 + time * 0.25).sin() * 60.0;
    let wave3 = (x * 0.0015 + time * 0.1).cos() * (y * 0.0015 - time * 0.2).cos() * 40.0;
    wave1 + wave2 + wave3
}

/// Surface color for an elevation and texture coordinate `u`.
pub fn wave_color(elevation: f32, u: f32, time: f32) -> Vec3 {
    let color = DEEP_PURPLE.lerp(DARK_VIOLET, (elevation + 150.0) / 300.0);
    let color = color.lerp(DEEP_BLUE, (u * 3.0 + time * 0.2).sin() * 0.5 + 0.5);
    color * 0.6
}
