//! Biome classification from height and moisture.
//!
//! Classification is an ordered decision tree: water and beach bands first,
//! then extreme elevations, then moisture-driven mid-elevation biomes.

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::grid::ScalarGrid;
use crate::params::BiomeThresholds;

/// Fraction of the water level below which water counts as deep.
const DEEP_WATER_FRACTION: f64 = 0.7;

/// Height above which mountain cells become snow.
const SNOW_LINE: f64 = 0.9;

/// The fixed set of terrain categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Biome {
    DeepWater,
    ShallowWater,
    Beach,
    Desert,
    Grassland,
    Forest,
    Hills,
    Mountain,
    Snow,
}

impl Biome {
    /// Every biome, in declaration order.
    pub const ALL: [Biome; 9] = [
        Biome::DeepWater,
        Biome::ShallowWater,
        Biome::Beach,
        Biome::Desert,
        Biome::Grassland,
        Biome::Forest,
        Biome::Hills,
        Biome::Mountain,
        Biome::Snow,
    ];

    /// Returns `true` for deep and shallow water.
    pub fn is_water(self) -> bool {
        matches!(self, Biome::DeepWater | Biome::ShallowWater)
    }

    /// Lowercase identifier, e.g. `"shallow_water"`.
    pub fn name(self) -> &'static str {
        match self {
            Biome::DeepWater => "deep_water",
            Biome::ShallowWater => "shallow_water",
            Biome::Beach => "beach",
            Biome::Desert => "desert",
            Biome::Grassland => "grassland",
            Biome::Forest => "forest",
            Biome::Hills => "hills",
            Biome::Mountain => "mountain",
            Biome::Snow => "snow",
        }
    }
}

/// Classify a single cell. First matching rule wins.
pub fn classify_cell(height: f64, moisture: f64, t: &BiomeThresholds) -> Biome {
    if height < t.water_level {
        if height < t.water_level * DEEP_WATER_FRACTION {
            Biome::DeepWater
        } else {
            Biome::ShallowWater
        }
    } else if height < t.beach_level {
        Biome::Beach
    } else if height > t.mountain_level {
        if height > SNOW_LINE {
            Biome::Snow
        } else {
            Biome::Mountain
        }
    } else if height > t.hill_level {
        Biome::Hills
    } else if moisture < t.dry_threshold {
        Biome::Desert
    } else if moisture > t.wet_threshold {
        Biome::Forest
    } else {
        Biome::Grassland
    }
}

/// A row-major grid of biomes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BiomeMap {
    width: u32,
    height: u32,
    cells: Vec<Biome>,
}

impl BiomeMap {
    /// A map where every cell is `biome`.
    pub fn filled(width: u32, height: u32, biome: Biome) -> Self {
        Self {
            width,
            height,
            cells: vec![biome; width as usize * height as usize],
        }
    }

    /// Build a map by evaluating `f(x, y)` for every cell in raster order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Biome) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Biome at `(x, y)`, or [`Biome::Grassland`] outside the map.
    pub fn get(&self, x: i32, y: i32) -> Biome {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width as usize + x as usize]
        } else {
            Biome::Grassland
        }
    }

    /// All biomes in row-major order.
    pub fn cells(&self) -> &[Biome] {
        &self.cells
    }

    /// Iterate `(x, y, biome)` in raster order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Biome)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &b)| (i as u32 % width, i as u32 / width, b))
    }

    /// Returns `true` if any in-bounds 8-neighbour of `(x, y)` has a different biome.
    ///
    /// Neighbours are read only inside the map. Sampling them through
    /// [`BiomeMap::get`] would compare border cells against the Grassland
    /// fallback, turning every border of a non-grassland map into an edge.
    pub fn is_edge(&self, x: i32, y: i32) -> bool {
        let center = self.get(x, y);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if self.in_bounds(nx, ny) && self.get(nx, ny) != center {
                    return true;
                }
            }
        }
        false
    }

    /// Number of cells per biome, indexed like [`Biome::ALL`].
    pub fn histogram(&self) -> [usize; 9] {
        let mut counts = [0; 9];
        for &b in &self.cells {
            counts[b as usize] += 1;
        }
        counts
    }
}

/// Classify every cell of a height/moisture pair.
///
/// # Errors
///
/// Returns [`TerrainError::DimensionMismatch`] if the grids differ in size.
pub fn assign_biomes(
    height: &ScalarGrid,
    moisture: &ScalarGrid,
    thresholds: &BiomeThresholds,
) -> Result<BiomeMap, TerrainError> {
    if height.dimensions() != moisture.dimensions() {
        return Err(TerrainError::DimensionMismatch {
            height: height.dimensions(),
            moisture: moisture.dimensions(),
        });
    }

    let (width, rows) = height.dimensions();
    Ok(BiomeMap::from_fn(width, rows, |x, y| {
        let (x, y) = (x as i32, y as i32);
        classify_cell(height.get(x, y), moisture.get(x, y), thresholds)
    }))
}
