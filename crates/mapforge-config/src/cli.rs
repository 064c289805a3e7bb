//! Command-line argument parsing for the Mapforge generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Mapforge command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "mapforge", about = "Procedural terrain and asset generator for tile maps")]
pub struct CliArgs {
    /// Map width in cells.
    #[arg(long)]
    pub width: Option<u32>,

    /// Map height in cells.
    #[arg(long)]
    pub height: Option<u32>,

    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Water level threshold in [0, 1].
    #[arg(long)]
    pub water_level: Option<f64>,

    /// Skip asset placement.
    #[arg(long)]
    pub no_assets: bool,

    /// RON asset pack to place from.
    #[arg(long)]
    pub asset_pack: Option<PathBuf>,

    /// Output directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Write a PNG preview of the biome map.
    #[arg(long)]
    pub preview: bool,

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
            self.generation.width = Some(w);
        }
        if let Some(h) = args.height {
            self.generation.height = Some(h);
        }
        if let Some(seed) = args.seed {
            self.generation.seed = Some(seed);
        }
        if let Some(level) = args.water_level {
            self.generation.thresholds.water_level = Some(level);
        }
        if args.no_assets {
            self.placement.enabled = false;
        }
        if let Some(ref pack) = args.asset_pack {
            self.placement.asset_pack = Some(pack.clone());
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
        if args.preview {
            self.output.write_preview = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
