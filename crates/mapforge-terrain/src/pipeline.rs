//! End-to-end map generation: fields, biomes, tiles, then asset placement.
//!
//! Every stage runs synchronously; the returned map is complete, including
//! placed assets, when the call returns.

use std::time::Instant;

use rand::Rng;
use tracing::{info, info_span};

use crate::asset::{AssetCatalog, AssetInstance};
use crate::biome::{Biome, BiomeMap, assign_biomes};
use crate::error::TerrainError;
use crate::grid::ScalarGrid;
use crate::heightmap::{generate_heightmap, generate_moisture_map};
use crate::params::GenerationParams;
use crate::placement::{AssetPlacer, PlacementInput, PlacementRule};
use crate::seed::placement_rng;
use crate::tiles::{TileLayers, project_tiles};

/// Terrain produced for one set of parameters.
#[derive(Clone, Debug)]
pub struct GeneratedTerrain {
    pub params: GenerationParams,
    pub heightmap: ScalarGrid,
    pub moisture: ScalarGrid,
    pub biomes: BiomeMap,
    pub tiles: TileLayers,
}

impl GeneratedTerrain {
    /// Input for the placement engine with both gating grids attached.
    pub fn placement_input(&self) -> PlacementInput<'_> {
        PlacementInput {
            biomes: &self.biomes,
            height: Some(&self.heightmap),
            moisture: Some(&self.moisture),
        }
    }

    /// Cell count per biome, omitting biomes with no cells.
    pub fn biome_histogram(&self) -> Vec<(Biome, usize)> {
        Biome::ALL
            .into_iter()
            .zip(self.biomes.histogram())
            .filter(|&(_, n)| n > 0)
            .collect()
    }
}

/// Terrain plus every asset instance on the map.
#[derive(Clone, Debug)]
pub struct GeneratedMap {
    pub terrain: GeneratedTerrain,
    /// Pre-existing instances followed by newly placed ones.
    pub assets: Vec<AssetInstance>,
}

/// Generate heightmap, moisture map, biomes and tile layers.
///
/// # Errors
///
/// Propagates [`TerrainError::DimensionMismatch`] from biome assignment.
pub fn generate_terrain(params: &GenerationParams) -> Result<GeneratedTerrain, TerrainError> {
    let _span = info_span!(
        "generate_terrain",
        width = params.width,
        height = params.height,
        seed = params.seed
    )
    .entered();
    let start = Instant::now();

    let heightmap = generate_heightmap(params);
    let moisture = generate_moisture_map(params);
    let biomes = assign_biomes(&heightmap, &moisture, &params.thresholds)?;
    let tiles = project_tiles(&biomes);

    info!(elapsed_ms = start.elapsed().as_millis() as u64, "terrain generated");
    Ok(GeneratedTerrain {
        params: params.clone(),
        heightmap,
        moisture,
        biomes,
        tiles,
    })
}

/// Generate terrain and place assets, with a placement RNG derived from the seed.
///
/// The same parameters, existing instances, catalog and rules always produce
/// the same map.
///
/// # Errors
///
/// Propagates errors from [`generate_terrain`].
pub fn generate_map(
    params: &GenerationParams,
    existing: &[AssetInstance],
    catalog: &AssetCatalog,
    rules: &[PlacementRule],
) -> Result<GeneratedMap, TerrainError> {
    let mut rng = placement_rng(params.seed);
    generate_map_with_rng(params, existing, catalog, rules, &mut rng)
}

/// [`generate_map`] with a caller-supplied placement RNG.
///
/// # Errors
///
/// Propagates errors from [`generate_terrain`].
pub fn generate_map_with_rng<R: Rng + ?Sized>(
    params: &GenerationParams,
    existing: &[AssetInstance],
    catalog: &AssetCatalog,
    rules: &[PlacementRule],
    rng: &mut R,
) -> Result<GeneratedMap, TerrainError> {
    let terrain = generate_terrain(params)?;

    let _span = info_span!("place_assets", rules = rules.len()).entered();
    let start = Instant::now();
    let assets = AssetPlacer::new(catalog, rules).place(existing, terrain.placement_input(), rng);
    info!(
        placed = assets.len() - existing.len(),
        total = assets.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "assets placed"
    );

    Ok(GeneratedMap { terrain, assets })
}
