//! Nebula cloud billboards.
//!
//! A handful of large, soft, noise-displaced planes placed around a ring and
//! drifting toward the camera. Unlike stars, a cloud that passes the camera
//! only has its depth reset; its ring position stays put.

pub mod renderer;

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::palette::NebulaPalette;

/// Clouds past this depth wrap back to [`CLOUD_RESET_Z`].
pub const CLOUD_WRAP_Z: f32 = 500.0;
pub const CLOUD_RESET_Z: f32 = -3000.0;
/// Radians per second of in-plane rotation.
pub const CLOUD_SPIN_RATE: f32 = 0.01;
/// World units per second toward the camera at speed multiplier 1.
pub const CLOUD_DRIFT_RATE: f32 = 20.0;
/// Peak vertex displacement along the cloud normal.
pub const CLOUD_DISPLACEMENT: f32 = 100.0;
/// Grid resolution of each billboard.
pub const CLOUD_SEGMENTS: u32 = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NebulaCloud {
    pub position: Vec3,
    pub rotation_z: f32,
    /// Edge length of the square billboard.
    pub size: f32,
    pub base_color: Vec3,
    /// Shifts the noise field so clouds do not roil in lockstep.
    pub noise_offset: f32,
}

/// Placement ranges for [`NebulaCloud::generate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudLayout {
    /// Radius range (min, max) of the placement circle.
    pub ring: (f32, f32),
    /// Edge length range (min, max).
    pub size: (f32, f32),
}

fn lerp_range(range: (f32, f32), u: f32) -> f32 {
    range.0 + (range.1 - range.0) * u
}

impl NebulaCloud {
    /// Cloud `index` of `count`, spaced evenly around the placement circle.
    pub fn generate<R: Rng + ?Sized>(
        index: usize,
        count: usize,
        layout: &CloudLayout,
        palette: &NebulaPalette,
        rng: &mut R,
    ) -> Self {
        let size = lerp_range(layout.size, rng.random());
        let base_color = palette.pick(rng);
        let noise_offset = rng.random::<f32>() * 100.0;

        let angle = index as f32 / count.max(1) as f32 * TAU;
        let radius = lerp_range(layout.ring, rng.random());
        let depth = -1000.0 - rng.random::<f32>() * 2000.0;
        let rotation_z = rng.random::<f32>() * TAU;

        Self {
            position: Vec3::new(angle.cos() * radius, angle.sin() * radius, depth),
            rotation_z,
            size,
            base_color,
            noise_offset,
        }
    }

    /// Spin and drift one frame. Returns `true` if the cloud wrapped.
    pub fn advance(&mut self, dt: f32, speed_multiplier: f32) -> bool {
        self.rotation_z += dt * CLOUD_SPIN_RATE;
        self.position.z += dt * speed_multiplier * CLOUD_DRIFT_RATE;
        if self.position.z > CLOUD_WRAP_Z {
            self.position.z = CLOUD_RESET_Z;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct NebulaClouds {
    clouds: Vec<NebulaCloud>,
}

impl NebulaClouds {
    pub fn generate<R: Rng + ?Sized>(
        count: usize,
        layout: &CloudLayout,
        palette: &NebulaPalette,
        rng: &mut R,
    ) -> Self {
        let clouds = (0..count)
            .map(|i| NebulaCloud::generate(i, count, layout, palette, rng))
            .collect();
        Self { clouds }
    }

    pub fn advance(&mut self, dt: f32, speed_multiplier: f32) {
        for cloud in &mut self.clouds {
            if cloud.advance(dt, speed_multiplier) {
                log::trace!("Cloud wrapped to z = {CLOUD_RESET_Z}");
            }
        }
    }

    pub fn clouds(&self) -> &[NebulaCloud] {
        &self.clouds
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}

/// Noise value in [0, 1] driving both displacement and opacity at `uv`.
pub fn cloud_noise(uv: Vec2, time: f32, noise_offset: f32) -> f32 {
    deepspace_noise::value_noise(uv * 2.0 + Vec2::splat(time * 0.1 + noise_offset))
}

/// Opacity at `uv`: radial falloff from the center scaled by the noise value.
pub fn cloud_alpha(uv: Vec2, noise: f32) -> f32 {
    let dist = (uv - Vec2::splat(0.5)).length();
    (1.0 - deepspace_noise::smoothstep(0.0, 0.5, dist)) * 0.4 * noise
}
