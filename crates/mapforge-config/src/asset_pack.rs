//! Asset packs: a catalog of asset definitions plus the rules that place them.

use std::path::Path;

use mapforge_terrain::{
    AssetCatalog, AssetDefinition, PlacementRule, default_asset_definitions,
    default_placement_rules,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A RON-persisted set of asset definitions and placement rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetPack {
    pub assets: Vec<AssetDefinition>,
    #[serde(default)]
    pub rules: Vec<PlacementRule>,
}

impl AssetPack {
    /// The stock outdoor pack.
    pub fn builtin() -> Self {
        Self {
            assets: default_asset_definitions(),
            rules: default_placement_rules(),
        }
    }

    /// Load a pack from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let pack: AssetPack = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        log::info!(
            "Loaded asset pack from {} ({} assets, {} rules)",
            path.display(),
            pack.assets.len(),
            pack.rules.len()
        );
        Ok(pack)
    }

    /// Load the pack at `path`, or the built-in pack when `path` is `None`.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Build the catalog, consuming the pack. Rules are returned unchanged.
    pub fn into_catalog(
        self,
        origin: &Path,
    ) -> Result<(AssetCatalog, Vec<PlacementRule>), ConfigError> {
        let catalog = AssetCatalog::from_definitions(self.assets).map_err(|source| {
            ConfigError::InvalidAssetPack {
                path: origin.to_path_buf(),
                source,
            }
        })?;
        Ok((catalog, self.rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapforge_terrain::Biome;

    const PACK: &str = r#"(
        assets: [
            (id: "tree", name: "Tree", sprite: "tree.png", width: 32, height: 32,
             constraints: (min_spacing: Some(2.0), avoid_water: true)),
            (id: "hut", name: "Hut", sprite: "hut.png", width: 64, height: 64,
             grid_width: 2, grid_height: 2),
        ],
        rules: [
            (asset_id: "tree", biomes: [FOREST], probability: 0.2),
        ],
    )"#;

    #[test]
    fn test_builtin_pack_is_valid() {
        let (catalog, rules) = AssetPack::builtin().into_catalog(Path::new("builtin")).unwrap();
        assert!(!catalog.is_empty());
        for rule in &rules {
            assert!(
                catalog.get(&rule.asset_id).is_some(),
                "builtin rule references missing asset {}",
                rule.asset_id
            );
        }
    }

    #[test]
    fn test_load_pack_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.ron");
        std::fs::write(&path, PACK).unwrap();

        let pack = AssetPack::load(&path).unwrap();
        assert_eq!(pack.assets.len(), 2);
        assert_eq!(pack.assets[1].grid_width, 2);
        assert_eq!(pack.rules[0].biomes, vec![Biome::Forest]);

        let (catalog, _) = pack.into_catalog(&path).unwrap();
        assert_eq!(catalog.get("tree").unwrap().constraints.min_spacing, Some(2.0));
    }

    #[test]
    fn test_load_or_builtin_without_path() {
        assert_eq!(AssetPack::load_or_builtin(None).unwrap(), AssetPack::builtin());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = AssetPack::load(Path::new("/nonexistent/pack.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_duplicate_asset_ids_rejected() {
        let pack = AssetPack {
            assets: vec![
                AssetDefinition::new("a", "A", "a.png"),
                AssetDefinition::new("a", "B", "b.png"),
            ],
            rules: Vec::new(),
        };
        let err = pack.into_catalog(Path::new("dup.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAssetPack { .. }));
    }
}
