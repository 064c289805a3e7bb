//! Asset catalog entries and placed asset instances.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Constraints an asset imposes on where it may be auto-placed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConstraints {
    /// Minimum Euclidean distance, in cells, between two instances of this asset.
    pub min_spacing: Option<f64>,
    /// Maximum instances of this asset per 10 000 cells, measured in a 50-cell radius.
    pub max_density: Option<f64>,
    /// Never place on deep or shallow water.
    pub avoid_water: bool,
    /// Strongly prefer cells on a biome boundary.
    pub prefer_edges: bool,
}

/// A static catalog entry describing a placeable asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetDefinition {
    /// Unique catalog id (e.g. `"tree"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Sprite reference resolved by the host renderer.
    pub sprite: String,
    /// Sprite width in pixels.
    pub width: u32,
    /// Sprite height in pixels.
    pub height: u32,
    /// Footprint width in grid cells.
    #[serde(default = "one")]
    pub grid_width: u32,
    /// Footprint height in grid cells.
    #[serde(default = "one")]
    pub grid_height: u32,
    #[serde(default)]
    pub constraints: PlacementConstraints,
}

fn one() -> u32 {
    1
}

impl AssetDefinition {
    /// A single-cell 32x32 asset with no placement constraints.
    pub fn new(id: impl Into<String>, name: impl Into<String>, sprite: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sprite: sprite.into(),
            width: 32,
            height: 32,
            grid_width: 1,
            grid_height: 1,
            constraints: PlacementConstraints::default(),
        }
    }

    /// Builder-style setter for the placement constraints.
    pub fn with_constraints(mut self, constraints: PlacementConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Instantiate this asset at cell `(x, y)`.
    pub fn instantiate(&self, id: String, x: i32, y: i32) -> AssetInstance {
        AssetInstance {
            id,
            asset_id: self.id.clone(),
            x,
            y,
            width: self.width,
            height: self.height,
            rotation: 0.0,
            grid_width: self.grid_width,
            grid_height: self.grid_height,
            selected: false,
        }
    }
}

/// A concrete asset placed on the map.
///
/// Serialized in the host map's camelCase format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssetInstance {
    /// Unique instance id.
    pub id: String,
    /// Id of the [`AssetDefinition`] this instance was created from.
    pub asset_id: String,
    /// Cell column.
    pub x: i32,
    /// Cell row.
    pub y: i32,
    /// Sprite width in pixels.
    pub width: u32,
    /// Sprite height in pixels.
    pub height: u32,
    /// Rotation in degrees. Generated instances are never rotated.
    pub rotation: f64,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Editor selection state. Generated instances are never selected.
    #[serde(default)]
    pub selected: bool,
}

/// Stores asset definitions with O(1) lookup by id.
#[derive(Clone, Debug, Default)]
pub struct AssetCatalog {
    assets: Vec<AssetDefinition>,
    index: HashMap<String, usize>,
}

impl AssetCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of definitions.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::DuplicateAsset`] if two definitions share an id.
    pub fn from_definitions(
        defs: impl IntoIterator<Item = AssetDefinition>,
    ) -> Result<Self, TerrainError> {
        let mut catalog = Self::new();
        for def in defs {
            catalog.register(def)?;
        }
        Ok(catalog)
    }

    /// Registers a new definition.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::DuplicateAsset`] if the id is already registered.
    pub fn register(&mut self, def: AssetDefinition) -> Result<(), TerrainError> {
        if self.index.contains_key(&def.id) {
            return Err(TerrainError::DuplicateAsset(def.id));
        }
        self.index.insert(def.id.clone(), self.assets.len());
        self.assets.push(def);
        Ok(())
    }

    /// Looks up a definition by id.
    pub fn get(&self, id: &str) -> Option<&AssetDefinition> {
        self.index.get(id).map(|&i| &self.assets[i])
    }

    /// All definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetDefinition> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// The stock outdoor asset set shipped with the editor.
pub fn default_asset_definitions() -> Vec<AssetDefinition> {
    vec![
        AssetDefinition::new("tree", "Oak Tree", "assets/nature/tree.png").with_constraints(
            PlacementConstraints {
                min_spacing: Some(1.5),
                max_density: Some(2500.0),
                avoid_water: true,
                prefer_edges: false,
            },
        ),
        AssetDefinition::new("pine", "Pine Tree", "assets/nature/pine.png").with_constraints(
            PlacementConstraints {
                min_spacing: Some(2.0),
                max_density: Some(1500.0),
                avoid_water: true,
                prefer_edges: false,
            },
        ),
        AssetDefinition::new("rock", "Rock", "assets/nature/rock.png").with_constraints(
            PlacementConstraints {
                min_spacing: Some(4.0),
                max_density: Some(300.0),
                avoid_water: true,
                prefer_edges: false,
            },
        ),
        AssetDefinition::new("cactus", "Cactus", "assets/nature/cactus.png").with_constraints(
            PlacementConstraints {
                min_spacing: Some(5.0),
                max_density: Some(200.0),
                avoid_water: true,
                prefer_edges: false,
            },
        ),
        AssetDefinition::new("reeds", "Reeds", "assets/nature/reeds.png").with_constraints(
            PlacementConstraints {
                min_spacing: Some(2.0),
                max_density: None,
                avoid_water: false,
                prefer_edges: true,
            },
        ),
        AssetDefinition {
            width: 64,
            height: 64,
            grid_width: 2,
            grid_height: 2,
            ..AssetDefinition::new("boulder", "Boulder", "assets/nature/boulder.png")
        }
        .with_constraints(PlacementConstraints {
            min_spacing: Some(8.0),
            max_density: Some(100.0),
            avoid_water: true,
            prefer_edges: false,
        }),
        AssetDefinition::new("snow_rock", "Snowy Rock", "assets/nature/snow_rock.png")
            .with_constraints(PlacementConstraints {
                min_spacing: Some(6.0),
                max_density: None,
                avoid_water: true,
                prefer_edges: false,
            }),
    ]
}

/// [`default_asset_definitions`] as a catalog.
pub fn default_asset_catalog() -> AssetCatalog {
    let assets = default_asset_definitions();
    let index = assets
        .iter()
        .enumerate()
        .map(|(i, def)| (def.id.clone(), i))
        .collect();
    AssetCatalog { assets, index }
}
