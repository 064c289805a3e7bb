//! Configuration system for the Mapforge generator.
//!
//! Provides generator settings that persist to disk as RON files, asset pack
//! loading, and CLI overrides via clap.

mod asset_pack;
mod cli;
mod config;
mod error;

pub use asset_pack::AssetPack;
pub use cli::CliArgs;
pub use config::{Config, DebugConfig, OutputConfig, PlacementConfig};
pub use error::ConfigError;
