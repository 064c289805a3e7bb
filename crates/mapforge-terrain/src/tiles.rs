//! Projection of a biome map onto the host map's tile layers.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::biome::{Biome, BiomeMap};
use crate::grid::CellKey;

/// Layers of the host map format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Floor,
    Walls,
    Objects,
    Assets,
    Fog,
}

impl LayerKind {
    /// Every layer, bottom to top.
    pub const ALL: [LayerKind; 5] = [
        LayerKind::Floor,
        LayerKind::Walls,
        LayerKind::Objects,
        LayerKind::Assets,
        LayerKind::Fog,
    ];

    /// Layer name in the host map format.
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Floor => "floor",
            LayerKind::Walls => "walls",
            LayerKind::Objects => "objects",
            LayerKind::Assets => "assets",
            LayerKind::Fog => "fog",
        }
    }
}

/// Tile tokens produced from terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    DeepWater,
    Water,
    Sand,
    Desert,
    Grass,
    Stone,
    Tree,
    Hill,
    Mountain,
    Snow,
}

impl TileType {
    /// Tile token in the host map format.
    pub fn token(self) -> &'static str {
        match self {
            TileType::DeepWater => "deep_water",
            TileType::Water => "water",
            TileType::Sand => "sand",
            TileType::Desert => "desert",
            TileType::Grass => "grass",
            TileType::Stone => "stone",
            TileType::Tree => "tree",
            TileType::Hill => "hill",
            TileType::Mountain => "mountain",
            TileType::Snow => "snow",
        }
    }
}

/// Tile and layer a biome projects to, plus the floor drawn beneath
/// non-floor tiles.
pub fn biome_tile(biome: Biome) -> (LayerKind, TileType, Option<TileType>) {
    match biome {
        Biome::DeepWater => (LayerKind::Floor, TileType::DeepWater, None),
        Biome::ShallowWater => (LayerKind::Floor, TileType::Water, None),
        Biome::Beach => (LayerKind::Floor, TileType::Sand, None),
        Biome::Desert => (LayerKind::Floor, TileType::Desert, None),
        Biome::Grassland => (LayerKind::Floor, TileType::Grass, None),
        Biome::Forest => (LayerKind::Objects, TileType::Tree, Some(TileType::Grass)),
        Biome::Hills => (LayerKind::Walls, TileType::Hill, Some(TileType::Grass)),
        Biome::Mountain => (LayerKind::Walls, TileType::Mountain, Some(TileType::Stone)),
        Biome::Snow => (LayerKind::Walls, TileType::Snow, Some(TileType::Stone)),
    }
}

/// Sparse tile assignments per layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileLayers {
    layers: HashMap<LayerKind, HashMap<CellKey, TileType>>,
}

impl TileLayers {
    /// An empty set of layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `tile` to `(x, y)` on `layer`, replacing any previous tile.
    pub fn set(&mut self, layer: LayerKind, x: i32, y: i32, tile: TileType) {
        self.layers
            .entry(layer)
            .or_default()
            .insert(CellKey::new(x, y), tile);
    }

    /// Tile at `(x, y)` on `layer`, if any.
    pub fn get(&self, layer: LayerKind, x: i32, y: i32) -> Option<TileType> {
        self.layers
            .get(&layer)
            .and_then(|cells| cells.get(&CellKey::new(x, y)).copied())
    }

    /// Number of tiles on `layer`.
    pub fn count(&self, layer: LayerKind) -> usize {
        self.layers.get(&layer).map_or(0, HashMap::len)
    }

    /// Iterate `(cell, tile)` pairs on `layer` in unspecified order.
    pub fn iter_layer(&self, layer: LayerKind) -> impl Iterator<Item = (CellKey, TileType)> + '_ {
        self.layers
            .get(&layer)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(&k, &t)| (k, t)))
    }

    /// Convert to the host format: layer name → `"x,y"` → tile token.
    ///
    /// All five layers are present, even when empty.
    pub fn to_host_layers(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        LayerKind::ALL
            .iter()
            .map(|&layer| {
                let cells = self
                    .iter_layer(layer)
                    .map(|(key, tile)| (key.to_host_key(), tile.token().to_string()))
                    .collect();
                (layer.name().to_string(), cells)
            })
            .collect()
    }
}

/// Project every biome cell onto tile layers.
///
/// Non-floor tiles get a floor underlay, so the floor layer covers the whole map.
pub fn project_tiles(biomes: &BiomeMap) -> TileLayers {
    let mut layers = TileLayers::new();
    for (x, y, biome) in biomes.iter() {
        let (x, y) = (x as i32, y as i32);
        let (layer, tile, underlay) = biome_tile(biome);
        layers.set(layer, x, y, tile);
        if let Some(floor) = underlay {
            layers.set(LayerKind::Floor, x, y, floor);
        }
    }
    layers
}
