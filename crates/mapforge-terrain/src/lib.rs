//! Procedural terrain and asset generation for tile maps: multi-octave noise
//! fields, biome classification, tile projection and rule-driven asset placement.

mod error;
mod grid;
mod heightmap;
mod noise_field;
mod params;
mod tiles;

pub mod asset;
pub mod biome;
pub mod pipeline;
pub mod placement;
pub mod preview;
pub mod seed;

pub use asset::{
    AssetCatalog, AssetDefinition, AssetInstance, PlacementConstraints, default_asset_catalog,
    default_asset_definitions,
};
pub use biome::{Biome, BiomeMap, assign_biomes, classify_cell};
pub use error::TerrainError;
pub use grid::{CellKey, ScalarGrid};
pub use heightmap::{fbm, generate_field, generate_heightmap, generate_moisture_map};
pub use noise_field::{MOISTURE_SEED_OFFSET, NoiseField};
pub use params::{
    BiomeThresholds, FieldOverrides, FieldParams, GenerationOverrides, GenerationParams,
    ThresholdOverrides,
};
pub use pipeline::{
    GeneratedMap, GeneratedTerrain, generate_map, generate_map_with_rng, generate_terrain,
};
pub use placement::{
    AssetPlacer, ClusterParams, PlacementInput, PlacementRule, default_placement_rules,
    place_assets,
};
pub use tiles::{LayerKind, TileLayers, TileType, biome_tile, project_tiles};
