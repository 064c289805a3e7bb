//! Errors surfaced by the command-line driver.

use mapforge_config::ConfigError;
use mapforge_terrain::TerrainError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("generation failed: {0}")]
    Terrain(#[from] TerrainError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode preview PNG: {0}")]
    Png(#[from] png::EncodingError),
}
