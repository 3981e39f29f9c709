//! Configuration for the deep space backdrop.
//!
//! Settings persist to disk as RON and are fixed once the engine is mounted.
//! CLI flags (via clap) override whatever was loaded from `config.ron`.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, ScenePreset};
pub use config::{Config, DebugConfig, SceneConfig, WindowConfig};
pub use error::ConfigError;
