//! The per-frame stepping function.
//!
//! [`Simulation::advance`] is the whole update of one tick: it owns every
//! mutable buffer of the scene and is deterministic for a fixed seed and a
//! fixed sequence of deltas and wheel events.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use deepspace_config::SceneConfig;
use deepspace_render::Camera;

use crate::clouds::{CloudLayout, NebulaClouds};
use crate::palette::NebulaPalette;
use crate::planet::PlanetState;
use crate::shooting::ShootingStarPool;
use crate::starfield::StarField;
use crate::state::SimulationState;

/// Values the renderer needs from one [`Simulation::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    /// Simulation clock after the step.
    pub time: f32,
    /// Sparkle as it stood before this frame's decay, which is what the
    /// overlay shows for this frame.
    pub sparkle: f32,
}

pub struct Simulation {
    state: SimulationState,
    stars: StarField,
    clouds: NebulaClouds,
    planet: Option<PlanetState>,
    shooting: ShootingStarPool,
    palette: NebulaPalette,
    camera_position: Vec3,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Build every entity buffer from `config`. A missing seed draws one from
    /// the OS.
    pub fn new(config: &SceneConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &SceneConfig, mut rng: ChaCha8Rng) -> Self {
        let palette = NebulaPalette::new(config.extended_palette);
        let stars = StarField::generate(config.star_count as usize, &mut rng);
        let layout = CloudLayout {
            ring: config.cloud_ring,
            size: config.cloud_size,
        };
        let clouds =
            NebulaClouds::generate(config.nebula_count as usize, &layout, &palette, &mut rng);
        let shooting = ShootingStarPool::new(
            config.shooting_star_pool as usize,
            config.trail_length as usize,
            config.trigger_interval,
            config.trigger_chance,
        );

        log::info!(
            "Scene generated: {} stars, {} clouds, {} shooting stars, planet {}",
            stars.len(),
            clouds.len(),
            shooting.len(),
            if config.include_planet { "on" } else { "off" }
        );

        Self {
            state: SimulationState::default(),
            stars,
            clouds,
            planet: config.include_planet.then(PlanetState::default),
            shooting,
            palette,
            camera_position: Camera::DEFAULT_POSITION,
            rng,
        }
    }

    /// Advance every subsystem by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> FrameSample {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.state.time += dt;
        let sample = FrameSample {
            time: self.state.time,
            sparkle: self.state.sparkle,
        };
        self.state.decay_sparkle();

        let speed = self.state.speed_multiplier;
        let recycled = self.stars.advance(dt, speed, &mut self.rng);
        if recycled > 0 {
            log::trace!("Recycled {recycled} stars");
        }
        self.clouds.advance(dt, speed);
        if let Some(planet) = &mut self.planet {
            planet.advance(dt);
        }

        self.shooting
            .maybe_trigger(dt, self.camera_position, &self.palette, &mut self.rng);
        self.shooting.update(dt, self.camera_position);

        sample
    }

    /// Forward a wheel `deltaY` to the shared state.
    pub fn apply_wheel(&mut self, delta_y: f32) {
        self.state.apply_wheel(delta_y);
    }

    /// Launch a shooting star immediately, bypassing the timer.
    pub fn trigger_shooting_star(&mut self) -> Option<usize> {
        self.shooting
            .trigger(self.camera_position, &self.palette, &mut self.rng)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn clouds(&self) -> &NebulaClouds {
        &self.clouds
    }

    pub fn planet(&self) -> Option<&PlanetState> {
        self.planet.as_ref()
    }

    pub fn shooting_stars(&self) -> &ShootingStarPool {
        &self.shooting
    }

    pub fn palette(&self) -> &NebulaPalette {
        &self.palette
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shooting::renderer::collect_instances;
    use crate::starfield::{ShellSample, Star};

    fn seeded(config: SceneConfig, seed: u64) -> Simulation {
        Simulation::new(&SceneConfig {
            seed: Some(seed),
            ..config
        })
    }

    #[test]
    fn test_five_star_replay_matches_closed_form() {
        let config = SceneConfig {
            star_count: 5,
            seed: Some(99),
            ..SceneConfig::backdrop()
        };
        let sim = Simulation::new(&config);
        assert_eq!(sim.stars().len(), 5);

        // Replay the generator's draws with the same seed.
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for star in sim.stars().stars() {
            let shell = ShellSample::sample(&mut rng.clone());
            let replay = Star::generate(&mut rng);
            assert_eq!(*star, replay);

            let x = shell.radius * shell.phi.sin() * shell.theta.cos();
            let y = shell.radius * shell.phi.sin() * shell.theta.sin();
            assert!((star.position.x - x).abs() < 1e-2, "x {} vs {x}", star.position.x);
            assert!((star.position.y - y).abs() < 1e-2, "y {} vs {y}", star.position.y);
            assert!((-3500.0..=-500.0).contains(&star.position.z));
        }
    }

    #[test]
    fn test_triggered_star_expires_after_life_over_decay() {
        let config = SceneConfig {
            star_count: 10,
            trigger_chance: 0.0,
            ..SceneConfig::backdrop()
        };
        let mut sim = seeded(config, 7);
        let index = sim.trigger_shooting_star().expect("pool has room");
        assert!(sim.shooting_stars().stars()[index].is_active());

        let (mut trails, mut heads) = (Vec::new(), Vec::new());
        collect_instances(sim.shooting_stars(), 2.0, &mut trails, &mut heads);
        assert_eq!(heads.len(), 1);

        let dt = 1.0 / 60.0;
        let steps = (1.0 / crate::shooting::LIFE_DECAY / dt).ceil() as usize + 1;
        for _ in 0..steps {
            sim.advance(dt);
        }
        let star = &sim.shooting_stars().stars()[index];
        assert!(!star.is_active());
        assert_eq!(sim.shooting_stars().active_count(), 0);

        collect_instances(sim.shooting_stars(), 2.0, &mut trails, &mut heads);
        assert!(trails.is_empty(), "expired star left {} trail points", trails.len());
        assert!(heads.is_empty(), "expired star left {} heads", heads.len());
    }

    #[test]
    fn test_wheel_event_raises_speed_and_sparkle() {
        let mut sim = seeded(
            SceneConfig {
                star_count: 1,
                ..SceneConfig::backdrop()
            },
            1,
        );
        sim.apply_wheel(-100.0);
        assert!((sim.state().speed_multiplier - 1.1).abs() < 1e-6);
        assert_eq!(sim.state().sparkle, 1.0);

        let sample = sim.advance(1.0 / 60.0);
        assert_eq!(sample.sparkle, 1.0);
        assert!((sim.state().sparkle - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_same_seed_same_frames() {
        let config = SceneConfig {
            star_count: 200,
            trigger_interval: 0.0,
            trigger_chance: 0.5,
            ..SceneConfig::planet()
        };
        let mut a = seeded(config.clone(), 31);
        let mut b = seeded(config, 31);
        for frame in 0..240 {
            if frame == 30 {
                a.apply_wheel(-400.0);
                b.apply_wheel(-400.0);
            }
            assert_eq!(a.advance(1.0 / 60.0), b.advance(1.0 / 60.0));
        }
        assert_eq!(a.stars().stars(), b.stars().stars());
        assert_eq!(a.shooting_stars().stars(), b.shooting_stars().stars());
        assert_eq!(a.planet(), b.planet());
    }

    #[test]
    fn test_planet_only_when_enabled() {
        let backdrop = seeded(
            SceneConfig {
                star_count: 1,
                ..SceneConfig::backdrop()
            },
            0,
        );
        assert!(backdrop.planet().is_none());
        let mut sim = seeded(
            SceneConfig {
                star_count: 1,
                ..SceneConfig::planet()
            },
            0,
        );
        sim.advance(2.0);
        let planet = sim.planet().expect("planet variant");
        assert!((planet.rotation_y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_bad_delta_does_not_move_clock() {
        let mut sim = seeded(
            SceneConfig {
                star_count: 3,
                ..SceneConfig::backdrop()
            },
            4,
        );
        sim.advance(f32::NAN);
        sim.advance(-1.0);
        assert_eq!(sim.state().time, 0.0);
    }

    #[test]
    fn test_pool_never_exceeds_size() {
        let config = SceneConfig {
            star_count: 10,
            shooting_star_pool: 3,
            trigger_interval: 0.0,
            trigger_chance: 1.0,
            ..SceneConfig::backdrop()
        };
        let mut sim = seeded(config, 12);
        for _ in 0..500 {
            sim.advance(1.0 / 60.0);
            assert!(sim.shooting_stars().active_count() <= 3);
        }
    }
}
