//! The binary entry point for the deep space backdrop.

use clap::Parser;
use deepspace_app::platform::{APP_NAME, PlatformDirs};
use deepspace_app::window::run_with_config;
use deepspace_config::{CliArgs, Config};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let dirs = match args.config.as_deref() {
        Some(dir) => PlatformDirs::under(dir),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("{e}, using ./{APP_NAME}");
                PlatformDirs::under(std::path::Path::new(APP_NAME))
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create {}: {e}", dirs.config_dir.display());
    }

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    deepspace_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!("Config directory: {}", dirs.config_dir.display());

    if let Err(e) = run_with_config(config) {
        error!("{e}");
        std::process::exit(1);
    }
}
