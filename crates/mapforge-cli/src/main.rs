//! `mapforge`: generate a tile map with terrain and placed assets.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p mapforge-cli -- --width 128 --height 96 --seed 7 --preview`.

mod error;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use mapforge_config::{AssetPack, CliArgs, Config};
use mapforge_terrain::{GeneratedMap, generate_map, generate_map_with_rng, generate_terrain};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};

use crate::error::CliError;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    mapforge_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(written) => {
            for path in written {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("mapforge"))
        .unwrap_or_else(|| PathBuf::from(".mapforge"))
}

fn run(config: &Config) -> Result<Vec<PathBuf>, CliError> {
    let map = generate(config)?;
    info!(
        width = map.terrain.params.width,
        height = map.terrain.params.height,
        seed = map.terrain.params.seed,
        assets = map.assets.len(),
        "map generated"
    );
    output::write_outputs(&map, &config.output)
}

/// Run the generation pipeline the config describes.
fn generate(config: &Config) -> Result<GeneratedMap, CliError> {
    let params = config.generation_params();

    if !config.placement.enabled {
        let terrain = generate_terrain(&params)?;
        return Ok(GeneratedMap {
            terrain,
            assets: Vec::new(),
        });
    }

    let pack_path = config.placement.asset_pack.as_deref();
    let pack = AssetPack::load_or_builtin(pack_path)?;
    let (catalog, rules) = pack.into_catalog(pack_path.unwrap_or(Path::new("<builtin>")))?;

    let map = match config.placement.seed {
        Some(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            generate_map_with_rng(&params, &[], &catalog, &rules, &mut rng)?
        }
        None => generate_map(&params, &[], &catalog, &rules)?,
    };
    Ok(map)
}
