//! Shooting stars flying at the viewer.
//!
//! A fixed pool of value structs toggled between [`ShootingState::Inactive`]
//! and [`ShootingState::Active`]. Nothing is allocated after construction;
//! triggering flips a flag and rewrites fields in place.

pub mod renderer;
pub mod trail;

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::palette::NebulaPalette;
pub use trail::TrailBuffer;

/// Life lost per second.
pub const LIFE_DECAY: f32 = 0.3;
/// Movement is normalized to 60 steps per second.
pub const STEP_RATE: f32 = 60.0;
/// Closer than this to the camera deactivates a star.
pub const CAMERA_CUTOFF: f32 = 150.0;
/// Past this depth a star is behind the viewer.
pub const BEHIND_VIEWER_Z: f32 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ShootingState {
    #[default]
    Inactive,
    Active,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub state: ShootingState,
    pub position: Vec3,
    /// Unit vector.
    pub direction: Vec3,
    pub speed: f32,
    pub life: f32,
    pub color: Vec3,
    pub trail: TrailBuffer,
}

impl ShootingStar {
    pub fn new(trail_length: usize) -> Self {
        Self {
            state: ShootingState::Inactive,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            speed: 0.0,
            life: 0.0,
            color: Vec3::ONE,
            trail: TrailBuffer::new(trail_length),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == ShootingState::Active
    }

    /// Opacity shared by the head and the trail.
    pub fn opacity(&self) -> f32 {
        self.life.max(0.0)
    }

    /// Launch from the far shell toward a point jittered around the camera.
    pub fn trigger<R: Rng + ?Sized>(
        &mut self,
        camera_position: Vec3,
        palette: &NebulaPalette,
        rng: &mut R,
    ) {
        let angle = rng.random::<f32>() * TAU;
        let distance = 800.0 + rng.random::<f32>() * 400.0;
        let depth = -1000.0 - rng.random::<f32>() * 500.0;
        let start = Vec3::new(angle.cos() * distance, angle.sin() * distance, depth);

        let target = Vec3::new(
            (rng.random::<f32>() - 0.5) * 300.0,
            (rng.random::<f32>() - 0.5) * 300.0,
            camera_position.z + (rng.random::<f32>() - 0.5) * 200.0,
        );

        self.state = ShootingState::Active;
        self.position = start;
        self.direction = (target - start).normalize_or(Vec3::Z);
        self.speed = 18.0 + rng.random::<f32>() * 14.0;
        self.color = palette.pick(rng);
        self.life = 1.0;
        self.trail.reset(start);
    }

    /// Advance one frame. Returns `true` if the star deactivated this frame.
    pub fn update(&mut self, dt: f32, camera_position: Vec3) -> bool {
        if !self.is_active() {
            return false;
        }

        self.position += self.direction * self.speed * dt * STEP_RATE;
        self.trail.push(self.position);
        self.life -= dt * LIFE_DECAY;

        let expired = self.life <= 0.0
            || self.position.distance(camera_position) < CAMERA_CUTOFF
            || self.position.z > BEHIND_VIEWER_Z;
        if expired {
            self.state = ShootingState::Inactive;
        }
        expired
    }
}

/// Fixed set of shooting stars plus the trigger timer.
#[derive(Debug, Clone)]
pub struct ShootingStarPool {
    stars: Vec<ShootingStar>,
    timer: f32,
    interval: f32,
    chance: f32,
}

impl ShootingStarPool {
    pub fn new(size: usize, trail_length: usize, interval: f32, chance: f32) -> Self {
        Self {
            stars: (0..size).map(|_| ShootingStar::new(trail_length)).collect(),
            timer: 0.0,
            interval,
            chance,
        }
    }

    /// Activate the first inactive star. Returns its index, or `None` when
    /// the whole pool is in flight.
    pub fn trigger<R: Rng + ?Sized>(
        &mut self,
        camera_position: Vec3,
        palette: &NebulaPalette,
        rng: &mut R,
    ) -> Option<usize> {
        let index = self.stars.iter().position(|s| !s.is_active())?;
        self.stars[index].trigger(camera_position, palette, rng);
        log::debug!("Shooting star {index} triggered");
        Some(index)
    }

    /// Accumulate `dt` on the timer and, once past the interval, roll for a
    /// launch. The timer only resets when a star actually launches.
    pub fn maybe_trigger<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        camera_position: Vec3,
        palette: &NebulaPalette,
        rng: &mut R,
    ) -> Option<usize> {
        self.timer += dt;
        if self.timer > self.interval && rng.random::<f32>() < self.chance {
            let launched = self.trigger(camera_position, palette, rng);
            if launched.is_some() {
                self.timer = 0.0;
            }
            return launched;
        }
        None
    }

    /// Advance every active star.
    pub fn update(&mut self, dt: f32, camera_position: Vec3) {
        for star in &mut self.stars {
            star.update(dt, camera_position);
        }
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    pub fn star(&self, index: usize) -> Option<&ShootingStar> {
        self.stars.get(index)
    }

    pub fn active_count(&self) -> usize {
        self.stars.iter().filter(|s| s.is_active()).count()
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
