//! The deep space animation engine core.
//!
//! Entity buffers (stars, clouds, shooting stars, the optional planet) are
//! generated once from a [`deepspace_config::SceneConfig`] and mutated in
//! place by [`Simulation::advance`]. [`SceneRenderer`] uploads them and draws
//! every layer in a single pass.

pub mod backdrop;
pub mod clouds;
pub mod overlay;
pub mod palette;
pub mod planet;
pub mod renderer;
pub mod shooting;
pub mod simulation;
pub mod starfield;
pub mod state;

pub use clouds::{CloudLayout, NebulaCloud, NebulaClouds};
pub use palette::NebulaPalette;
pub use planet::PlanetState;
pub use renderer::{LayerContext, LayerShader, SceneRenderer};
pub use shooting::{ShootingStar, ShootingStarPool, ShootingState, TrailBuffer};
pub use simulation::{FrameSample, Simulation};
pub use starfield::{AnimMode, Star, StarField};
pub use state::{MAX_SPEED, MIN_SPEED, SimulationState};
