//! Optional ringed planet: a banded sphere and a rainbow ring disc sharing one
//! slowly spinning group transform.
//!
//! The shading itself runs on the GPU; the functions here mirror it so the
//! band and ring math can be checked without a device.

pub mod renderer;

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

use deepspace_noise::{fract, smoothstep};

pub const PLANET_RADIUS: f32 = 35.0;
pub const PLANET_SEGMENTS: u32 = 64;
pub const RING_INNER: f32 = 40.0;
pub const RING_OUTER: f32 = 70.0;
pub const RING_SEGMENTS: u32 = 128;
/// Ring tilt about the group's X axis.
pub const RING_TILT: f32 = PI / 2.5;
pub const GROUP_POSITION: Vec3 = Vec3::new(0.0, 0.0, -50.0);
/// Radians per second about Y.
pub const SPIN_RATE: f32 = 0.15;

/// Spin state of the planet group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanetState {
    pub rotation_y: f32,
}

impl PlanetState {
    pub fn advance(&mut self, dt: f32) {
        self.rotation_y += dt * SPIN_RATE;
    }

    /// World transform of the group (and of the sphere).
    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_translation(GROUP_POSITION) * Mat4::from_rotation_y(self.rotation_y)
    }

    /// World transform of the ring disc.
    pub fn ring_matrix(&self) -> Mat4 {
        self.group_matrix() * Mat4::from_rotation_x(RING_TILT)
    }
}

const DEEP_BLUE: Vec3 = Vec3::new(0.2, 0.4, 0.8);
const MINT_GREEN: Vec3 = Vec3::new(0.4, 0.9, 0.7);
const LIGHT_BLUE: Vec3 = Vec3::new(0.5, 0.7, 0.9);
const PURPLE: Vec3 = Vec3::new(0.6, 0.4, 0.8);

/// Unlit band color at sphere texture coordinate `(u, v)`; `v` is latitude.
pub fn band_color(u: f32, v: f32, time: f32) -> Vec3 {
    let band1 = (v * 25.0 + time * 0.1).sin() * 0.5 + 0.5;
    let band2 = (v * 15.0 + time * 0.08).sin() * 0.5 + 0.5;
    let noise1 = (u * 50.0 + time * 0.05).sin() * 0.5 + 0.5;
    let noise2 = (v * 30.0 + u * 20.0).sin() * 0.5 + 0.5;
    let combined = noise1 * 0.3 + noise2 * 0.3;

    let color = DEEP_BLUE.lerp(MINT_GREEN, band1);
    let color = color.lerp(LIGHT_BLUE, band2 * 0.5);
    let color = color.lerp(PURPLE, noise2 * 0.15);
    color + Vec3::splat(combined * 0.1)
}

/// Ambient plus Lambert term for a world-space normal.
pub fn sphere_lighting(normal: Vec3) -> f32 {
    let light = Vec3::ONE.normalize();
    0.3 + normal.dot(light).max(0.0) * 0.7
}

/// Fully saturated hue in [0, 1) to RGB, six linear sectors.
pub fn rainbow(hue: f32) -> Vec3 {
    let h = hue * 6.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    match h {
        h if h < 1.0 => Vec3::new(1.0, x, 0.0),
        h if h < 2.0 => Vec3::new(x, 1.0, 0.0),
        h if h < 3.0 => Vec3::new(0.0, 1.0, x),
        h if h < 4.0 => Vec3::new(0.0, x, 1.0),
        h if h < 5.0 => Vec3::new(x, 0.0, 1.0),
        _ => Vec3::new(1.0, 0.0, x),
    }
}

/// Hue at ring radius `dist`, cycling outward over time.
pub fn ring_hue(dist: f32, time: f32) -> f32 {
    fract((dist - RING_INNER) / (RING_OUTER - RING_INNER) + time * 0.05)
}

fn ring_pattern(dist: f32) -> f32 {
    (dist * 0.8).sin() * 0.5 + 0.5 + (dist * 2.5).sin() * 0.3
}

/// 0 inside the gap between radii 53 and 56, 1 elsewhere.
pub fn ring_gap(dist: f32) -> f32 {
    1.0 - smoothstep(53.0, 54.0, dist) * smoothstep(56.0, 55.0, dist)
}

/// Ring opacity: banding, the gap, and fades at both edges.
pub fn ring_alpha(dist: f32) -> f32 {
    let alpha = 0.7 + ring_pattern(dist) * 0.3;
    alpha
        * ring_gap(dist)
        * smoothstep(RING_INNER, RING_INNER + 2.0, dist)
        * smoothstep(RING_OUTER, RING_OUTER - 2.0, dist)
}

/// Ring color including shimmer.
pub fn ring_color(dist: f32, time: f32) -> Vec3 {
    let shimmer = (dist * 10.0 + time).sin() * 0.1 + 0.9;
    rainbow(ring_hue(dist, time)) * (0.7 + ring_pattern(dist) * 0.3) * shimmer
}
