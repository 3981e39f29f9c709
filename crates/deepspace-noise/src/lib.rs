//! Procedural noise shared by the shading programs.
//!
//! The WGSL in [`NOISE_WGSL`] is prepended to every shader that samples noise.
//! The Rust functions below evaluate the same formulas on the CPU so the
//! shapes produced by the shaders can be checked in tests and tooling.

use glam::Vec2;

/// Octave count used by [`fbm`] and by `fbm` in [`NOISE_WGSL`].
pub const FBM_OCTAVES: u32 = 6;

const HASH_DOT: Vec2 = Vec2::new(127.1, 311.7);
const HASH_SCALE: f32 = 43_758.547;

/// GLSL-style `fract`: always in `[0, 1)`, also for negative input.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL-style Hermite `smoothstep`. Reversed edges invert the ramp.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pseudo-random value in `[0, 1)` for a lattice point.
#[inline]
pub fn hash(p: Vec2) -> f32 {
    fract(p.dot(HASH_DOT).sin() * HASH_SCALE)
}

/// Smoothly interpolated value noise in `[0, 1]`.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let f = f * f * (Vec2::splat(3.0) - 2.0 * f);

    let a = hash(i);
    let b = hash(i + Vec2::X);
    let c = hash(i + Vec2::Y);
    let d = hash(i + Vec2::ONE);

    let bottom = a + (b - a) * f.x;
    let top = c + (d - c) * f.x;
    bottom + (top - bottom) * f.y
}

/// Fractal sum of `octaves` layers of [`value_noise`]; amplitude halves and
/// frequency doubles per octave starting from 0.5 and 1.0.
pub fn fbm_octaves(p: Vec2, octaves: u32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..octaves {
        value += amplitude * value_noise(p * frequency);
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    value
}

/// Six-octave fractal Brownian motion, as sampled by the nebula overlay.
pub fn fbm(p: Vec2) -> f32 {
    fbm_octaves(p, FBM_OCTAVES)
}

/// WGSL definitions of `hash`, `value_noise` and `fbm`.
pub const NOISE_WGSL: &str = r#"
fn hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(127.1, 311.7))) * 43758.5453);
}

fn value_noise(p: vec2<f32>) -> f32 {
    let i = floor(p);
    var f = fract(p);
    f = f * f * (3.0 - 2.0 * f);

    let a = hash(i);
    let b = hash(i + vec2<f32>(1.0, 0.0));
    let c = hash(i + vec2<f32>(0.0, 1.0));
    let d = hash(i + vec2<f32>(1.0, 1.0));

    return mix(mix(a, b, f.x), mix(c, d, f.x), f.y);
}

fn fbm(p: vec2<f32>) -> f32 {
    var value = 0.0;
    var amplitude = 0.5;
    var frequency = 1.0;
    for (var i = 0; i < 6; i = i + 1) {
        value = value + amplitude * value_noise(p * frequency);
        frequency = frequency * 2.0;
        amplitude = amplitude * 0.5;
    }
    return value;
}
"#;
