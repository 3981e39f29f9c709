//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level backdrop configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Scene generation parameters. Read once when the engine mounts.
    pub scene: SceneConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Generation parameters for the animated scene.
///
/// The two presets, [`SceneConfig::backdrop`] and [`SceneConfig::planet`],
/// reproduce the plain backdrop and the ringed-planet variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Render the ringed planet in front of the clouds.
    pub include_planet: bool,
    /// Number of drifting stars.
    pub star_count: u32,
    /// Number of nebula cloud billboards.
    pub nebula_count: u32,
    /// Fixed size of the shooting-star pool.
    pub shooting_star_pool: u32,
    /// Number of positions kept in each shooting-star trail.
    pub trail_length: u32,
    /// Seconds that must elapse before another shooting star may launch.
    pub trigger_interval: f32,
    /// Per-frame launch probability once the interval has elapsed.
    pub trigger_chance: f32,
    /// World-space radius of a shooting star's glowing head.
    pub head_radius: f32,
    /// Include the pink, yellow and navy accent colors in the nebula palette.
    pub extended_palette: bool,
    /// Radius range (min, max) of the circle the clouds are placed on.
    pub cloud_ring: (f32, f32),
    /// Edge length range (min, max) of a cloud billboard.
    pub cloud_size: (f32, f32),
    /// Fixed RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Deep Space".to_string(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::backdrop()
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl SceneConfig {
    /// Plain backdrop: busy shooting-star pool and the extended palette.
    pub fn backdrop() -> Self {
        Self {
            include_planet: false,
            star_count: 12_000,
            nebula_count: 8,
            shooting_star_pool: 45,
            trail_length: 40,
            trigger_interval: 1.0,
            trigger_chance: 0.06,
            head_radius: 3.0,
            extended_palette: true,
            cloud_ring: (1500.0, 2500.0),
            cloud_size: (800.0, 2000.0),
            seed: None,
        }
    }

    /// Ringed-planet variant: calmer shooting stars with longer trails.
    pub fn planet() -> Self {
        Self {
            include_planet: true,
            star_count: 12_000,
            nebula_count: 8,
            shooting_star_pool: 20,
            trail_length: 50,
            trigger_interval: 1.5,
            trigger_chance: 0.03,
            head_radius: 2.0,
            extended_palette: false,
            cloud_ring: (500.0, 1300.0),
            cloud_size: (400.0, 1000.0),
            seed: None,
        }
    }

    /// Reject parameter combinations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trail_length == 0 {
            return Err(ConfigError::InvalidScene {
                field: "trail_length",
                reason: "must hold at least one position".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.trigger_chance) {
            return Err(ConfigError::InvalidScene {
                field: "trigger_chance",
                reason: format!("{} is not a probability", self.trigger_chance),
            });
        }
        if self.trigger_interval.is_nan() || self.trigger_interval < 0.0 {
            return Err(ConfigError::InvalidScene {
                field: "trigger_interval",
                reason: format!("{} must be non-negative", self.trigger_interval),
            });
        }
        if self.head_radius.is_nan() || self.head_radius <= 0.0 {
            return Err(ConfigError::InvalidScene {
                field: "head_radius",
                reason: format!("{} must be positive", self.head_radius),
            });
        }
        let ranges = [
            ("cloud_ring", self.cloud_ring),
            ("cloud_size", self.cloud_size),
        ];
        for (field, (min, max)) in ranges {
            if min.is_nan() || max.is_nan() || min < 0.0 || max < min {
                return Err(ConfigError::InvalidScene {
                    field,
                    reason: format!("range ({min}, {max}) is empty or negative"),
                });
            }
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })
    }

    /// Re-read `config.ron`: returns `Some(new_config)` if it differs, `None` otherwise.
    ///
    /// Scene settings only take effect on the next mount.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(ConfigError::Parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("star_count: 12000"));
        assert!(ron_str.contains("include_planet: false"));
    }

    #[test]
    fn test_default_scene_is_backdrop_preset() {
        assert_eq!(SceneConfig::default(), SceneConfig::backdrop());
    }

    #[test]
    fn test_presets_match_observed_variants() {
        let backdrop = SceneConfig::backdrop();
        let planet = SceneConfig::planet();

        assert!(!backdrop.include_planet);
        assert!(planet.include_planet);
        assert_eq!(backdrop.shooting_star_pool, 45);
        assert_eq!(planet.shooting_star_pool, 20);
        assert_eq!(backdrop.trail_length, 40);
        assert_eq!(planet.trail_length, 50);
        assert_eq!(backdrop.star_count, planet.star_count);
        assert_eq!(backdrop.nebula_count, 8);
        assert_eq!(planet.nebula_count, 8);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.scene.seed = Some(7);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.scene, SceneConfig::default());
    }

    #[test]
    fn test_partial_scene_keeps_other_defaults() {
        let ron_str = "(scene: (include_planet: true, star_count: 500))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert!(config.scene.include_planet);
        assert_eq!(config.scene.star_count, 500);
        assert_eq!(config.scene.shooting_star_pool, 45);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.scene = SceneConfig::planet();
        config.scene.seed = Some(42);

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.scene.star_count = 2000;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.scene.star_count), Some(2000));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_presets_validate() {
        assert!(SceneConfig::backdrop().validate().is_ok());
        assert!(SceneConfig::planet().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_trail() {
        let scene = SceneConfig {
            trail_length: 0,
            ..SceneConfig::backdrop()
        };
        assert!(matches!(
            scene.validate(),
            Err(ConfigError::InvalidScene {
                field: "trail_length",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_probability_and_ranges() {
        let scene = SceneConfig {
            trigger_chance: 1.5,
            ..SceneConfig::backdrop()
        };
        assert!(scene.validate().is_err());

        let scene = SceneConfig {
            cloud_size: (900.0, 100.0),
            ..SceneConfig::backdrop()
        };
        assert!(scene.validate().is_err());

        let scene = SceneConfig {
            trigger_interval: f32::NAN,
            ..SceneConfig::backdrop()
        };
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_empty_pool_and_starfield_are_valid() {
        let scene = SceneConfig {
            star_count: 0,
            shooting_star_pool: 0,
            nebula_count: 0,
            ..SceneConfig::backdrop()
        };
        assert!(scene.validate().is_ok());
    }
}
