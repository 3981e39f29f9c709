//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{Config, SceneConfig};

/// Named scene presets selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScenePreset {
    /// Stars, clouds and a busy shooting-star pool.
    Backdrop,
    /// Adds the ringed planet with a calmer shooting-star pool.
    Planet,
}

impl ScenePreset {
    /// The scene parameters this preset stands for.
    pub fn scene(self) -> SceneConfig {
        match self {
            ScenePreset::Backdrop => SceneConfig::backdrop(),
            ScenePreset::Planet => SceneConfig::planet(),
        }
    }
}

/// Deep space backdrop command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "deepspace", about = "Animated deep space backdrop")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Replace the scene section with a preset before other overrides apply.
    #[arg(long, value_enum)]
    pub preset: Option<ScenePreset>,

    /// Toggle the ringed planet.
    #[arg(long)]
    pub planet: Option<bool>,

    /// Number of drifting stars.
    #[arg(long)]
    pub stars: Option<u32>,

    /// Fixed RNG seed for reproducible scenes.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(preset) = args.preset {
            let seed = self.scene.seed;
            self.scene = preset.scene();
            self.scene.seed = seed;
        }
        if let Some(planet) = args.planet {
            self.scene.include_planet = planet;
        }
        if let Some(stars) = args.stars {
            self.scene.star_count = stars;
        }
        if let Some(seed) = args.seed {
            self.scene.seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            stars: Some(3000),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.scene.star_count, 3000);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.scene.shooting_star_pool, 45);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_preset_applies_before_individual_overrides() {
        let mut config = Config::default();
        let args = CliArgs {
            preset: Some(ScenePreset::Planet),
            planet: Some(false),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.scene.shooting_star_pool, 20);
        assert_eq!(config.scene.trail_length, 50);
        assert!(!config.scene.include_planet);
    }

    #[test]
    fn test_preset_keeps_configured_seed() {
        let mut config = Config::default();
        config.scene.seed = Some(99);
        let args = CliArgs {
            preset: Some(ScenePreset::Planet),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.scene.seed, Some(99));
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::try_parse_from([
            "deepspace",
            "--preset",
            "planet",
            "--seed",
            "5",
            "--planet",
            "true",
        ])
        .unwrap();
        assert_eq!(args.preset, Some(ScenePreset::Planet));
        assert_eq!(args.seed, Some(5));
        assert_eq!(args.planet, Some(true));
    }
}
