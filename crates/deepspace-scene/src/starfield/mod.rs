//! Drifting star field.
//!
//! Every star lives on a spherical shell around the view axis and drifts
//! toward the camera along +Z. A star that passes the camera is recycled in
//! place: new shell position, new depth far ahead, everything else kept. The
//! buffer is allocated once and never grows or shrinks.

pub mod renderer;

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::palette::{STAR_COLORS, star_color_index};

/// Stars past this depth have flown behind the camera and are recycled.
pub const STAR_RECYCLE_Z: f32 = 200.0;

/// Probability that a star is placed on the outer shell.
pub const OUTER_SHELL_CHANCE: f32 = 0.9;

/// How a star's brightness varies over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum AnimMode {
    /// Fast squared-sine flicker.
    Twinkle = 0,
    /// Slow smoothstepped swell.
    Pulse = 1,
    /// Barely perceptible breathing.
    Drift = 2,
}

impl AnimMode {
    /// 40% twinkle, 30% pulse, 30% drift.
    pub fn from_roll(u: f32) -> Self {
        if u < 0.4 {
            AnimMode::Twinkle
        } else if u < 0.7 {
            AnimMode::Pulse
        } else {
            AnimMode::Drift
        }
    }

    /// Brightness factor at `time` for a star with the given `phase`.
    pub fn intensity(self, time: f32, phase: f32) -> f32 {
        match self {
            AnimMode::Twinkle => {
                let twinkle = (time * 3.0 + phase).sin() * 0.5 + 0.5;
                0.6 + twinkle * twinkle * 0.4
            }
            AnimMode::Pulse => {
                let pulse = (time * 0.8 + phase).sin() * 0.5 + 0.5;
                0.7 + deepspace_noise::smoothstep(0.0, 1.0, pulse) * 0.3
            }
            AnimMode::Drift => 0.85 + (time * 0.2 + phase).sin() * 0.05,
        }
    }
}

/// Polar coordinates drawn for a star's placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellSample {
    pub radius: f32,
    /// Azimuth in [0, 2pi).
    pub theta: f32,
    /// Polar angle, uniform on the sphere.
    pub phi: f32,
}

impl ShellSample {
    /// Draw radius, azimuth and polar angle, in that order.
    ///
    /// The radius is in [800, 2600) with probability 0.9, else in [0, 600).
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let radius = if rng.random::<f32>() < OUTER_SHELL_CHANCE {
            800.0 + rng.random::<f32>() * 1800.0
        } else {
            rng.random::<f32>() * 600.0
        };
        let theta = rng.random::<f32>() * TAU;
        let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
        Self { radius, theta, phi }
    }

    /// `radius * (sin(phi) cos(theta), sin(phi) sin(theta))`.
    pub fn xy(&self) -> Vec2 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.radius * self.phi.sin() * Vec2::new(cos_theta, sin_theta)
    }
}

/// Depth of a freshly generated star: `-(u * 3000 + 500)`.
pub fn spawn_depth<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    -(rng.random::<f32>() * 3000.0 + 500.0)
}

/// Depth of a recycled star: `-(3000 + u * 500)`.
pub fn recycle_depth<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    -(3000.0 + rng.random::<f32>() * 500.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub color: Vec3,
    /// Base point size in pixels before perspective scaling.
    pub size: f32,
    /// World units per second toward the camera at speed multiplier 1.
    pub drift_speed: f32,
    pub phase: f32,
    /// Number of rays in the sparkle shape: 4, 5 or 6.
    pub spike_count: u32,
    pub anim_mode: AnimMode,
}

impl Star {
    /// Generate a star. Draw order: shell sample, depth, color, size, drift
    /// speed, phase, spike count, animation mode.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let shell = ShellSample::sample(rng);
        let position = shell.xy().extend(spawn_depth(rng));
        let color = STAR_COLORS[star_color_index(rng.random())];
        let size = rng.random::<f32>().sqrt() * 3.0 + 0.8;
        let drift_speed = 50.0 + rng.random::<f32>() * 100.0;
        let phase = rng.random::<f32>() * TAU;
        let spike_count = 4 + rng.random_range(0..3u32);
        let anim_mode = AnimMode::from_roll(rng.random());

        Self {
            position,
            color,
            size,
            drift_speed,
            phase,
            spike_count,
            anim_mode,
        }
    }

    /// Move the star back to the far end of the field on a fresh shell position.
    pub fn recycle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let shell = ShellSample::sample(rng);
        self.position = shell.xy().extend(recycle_depth(rng));
    }

    /// Apply one frame of drift, recycling if the star passed the camera.
    /// Returns `true` when the star was recycled.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        speed_multiplier: f32,
        rng: &mut R,
    ) -> bool {
        self.position.z += self.drift_speed * dt * speed_multiplier;
        if self.position.z > STAR_RECYCLE_Z {
            self.recycle(rng);
            true
        } else {
            false
        }
    }
}

/// Fixed-size buffer of stars.
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let stars = (0..count).map(|_| Star::generate(rng)).collect();
        Self { stars }
    }

    /// Drift every star; returns how many were recycled this frame.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        speed_multiplier: f32,
        rng: &mut R,
    ) -> usize {
        let mut recycled = 0;
        for star in &mut self.stars {
            if star.advance(dt, speed_multiplier, rng) {
                recycled += 1;
            }
        }
        recycled
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

/// On-screen diameter in pixels of a star of base `size` at view `depth`.
///
/// Perspective scaling is capped at 3x so stars near the camera do not
/// swamp the frame; the animation intensity shrinks dim phases too.
pub fn point_size(size: f32, depth: f32, intensity: f32) -> f32 {
    (size * (1200.0 / depth)).min(size * 3.0) * intensity
}

/// Sparkle shape at sprite-local coordinate `uv` in [-0.5, 0.5]^2.
///
/// Sum of a tight core, `spikes` angular rays, an axis-aligned cross flare
/// and a soft glow. Fragments below 0.01 are discarded by the shader.
pub fn star_shape(uv: Vec2, spikes: f32) -> f32 {
    let angle = uv.y.atan2(uv.x);
    let radius = uv.length();

    let spike = (angle * spikes * 0.5).cos().abs().powi(2);
    let core = (-radius * 15.0).exp();
    let rays = (-radius * 6.0).exp() * spike;
    let cross = f32::max(
        (-uv.x.abs() * 25.0).exp() * (-uv.y.abs() * 4.0).exp(),
        (-uv.y.abs() * 25.0).exp() * (-uv.x.abs() * 4.0).exp(),
    );
    let glow = (-radius * 3.5).exp() * 0.4;

    core + rays * 0.8 + cross * 0.5 + glow
}
