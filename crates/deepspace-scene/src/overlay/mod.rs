//! Full-screen nebula haze.
//!
//! Three fbm layers drift against each other while a slow cycle clock shifts
//! their offsets, recoloring the haze over roughly a minute and a half. The
//! wheel-driven sparkle adds a flat boost to the alpha.

pub mod renderer;

use glam::{Vec2, Vec3};

use deepspace_noise::fbm;

use crate::palette::{BLUE_GREEN, DARK_TEAL, RICH_PURPLE, TEAL_BLUE};

/// Alpha contributed by a full sparkle pulse.
pub const SPARKLE_BOOST: f32 = 0.15;

/// The three noise layers at screen coordinate `uv` in [0, 1]².
pub fn overlay_layers(uv: Vec2, time: f32) -> [f32; 3] {
    let p = uv * 3.0;
    let cycle = (time * 0.08).sin() * 0.5 + 0.5;
    let n1 = fbm(p + Vec2::splat(time * 0.05) + Vec2::new(cycle * 2.0, 0.0));
    let n2 = fbm(p * 1.5 - Vec2::splat(time * 0.03) + Vec2::new(0.0, cycle * 1.5));
    let n3 = fbm(p * 2.0 + Vec2::splat(time * 0.04) + Vec2::new(cycle, -cycle));
    [n1, n2, n3]
}

pub fn overlay_color(layers: [f32; 3]) -> Vec3 {
    let [n1, n2, n3] = layers;
    RICH_PURPLE
        .lerp(TEAL_BLUE, n1)
        .lerp(DARK_TEAL, n2)
        .lerp(BLUE_GREEN, n3)
}

/// Haze alpha with the sparkle boost and the radial vignette applied.
pub fn overlay_alpha(uv: Vec2, layers: [f32; 3], sparkle: f32) -> f32 {
    let [n1, n2, n3] = layers;
    let alpha = (n1 * 0.5 + n2 * 0.3 + n3 * 0.2) * 0.35 + sparkle * SPARKLE_BOOST;
    let vignette = 1.0 - (uv - Vec2::splat(0.5)).length() * 0.8;
    alpha * vignette
}
