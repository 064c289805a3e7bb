//! Rule-driven asset placement over a biome map.
//!
//! Each [`PlacementRule`] scans the map in raster order. A cell must pass a
//! fixed sequence of checks (occupancy, biome, water, height, moisture,
//! spacing, density, edge preference) and a final probability draw. Accepted
//! placements may spawn a cluster of extra instances nearby.
//!
//! All randomness comes from the caller-supplied RNG, so a seeded RNG gives
//! reproducible placement.

use std::f64::consts::{PI, TAU};

use hashbrown::{HashMap, HashSet};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace, warn};

use crate::asset::{AssetCatalog, AssetDefinition, AssetInstance};
use crate::biome::{Biome, BiomeMap};
use crate::grid::{CellKey, ScalarGrid};

/// Radius, in cells, of the neighbourhood used for density limits.
pub const DENSITY_RADIUS: f64 = 50.0;

/// Chance that a non-edge cell is rejected for an edge-preferring asset.
pub const EDGE_REJECTION_CHANCE: f64 = 0.9;

/// Multiplier applied to the rule probability for cluster members.
pub const CLUSTER_PROBABILITY_SCALE: f64 = 0.6;

/// Cluster attempts made per requested cluster member.
pub const CLUSTER_ATTEMPTS_PER_MEMBER: u32 = 3;

/// Secondary burst of placements around an accepted instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterParams {
    /// Chance that an accepted placement triggers a cluster.
    pub probability: f64,
    /// Maximum distance, in cells, of cluster members from the anchor.
    pub radius: f64,
    /// Maximum number of extra instances per cluster.
    pub size: u32,
}

/// Declarative rule binding an asset to the cells it may be placed on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementRule {
    /// Id of the [`AssetDefinition`] to place.
    pub asset_id: String,
    /// Biomes the asset may be placed on.
    pub biomes: Vec<Biome>,
    /// Chance that an otherwise eligible cell receives the asset.
    pub probability: f64,
    #[serde(default)]
    pub min_height: Option<f64>,
    #[serde(default)]
    pub max_height: Option<f64>,
    #[serde(default)]
    pub min_moisture: Option<f64>,
    #[serde(default)]
    pub max_moisture: Option<f64>,
    #[serde(default)]
    pub cluster: Option<ClusterParams>,
}

impl PlacementRule {
    /// A rule with no gating bounds and no clustering.
    pub fn new(asset_id: impl Into<String>, biomes: Vec<Biome>, probability: f64) -> Self {
        Self {
            asset_id: asset_id.into(),
            biomes,
            probability,
            min_height: None,
            max_height: None,
            min_moisture: None,
            max_moisture: None,
            cluster: None,
        }
    }

    /// Builder-style setter for clustering.
    pub fn with_cluster(mut self, probability: f64, radius: f64, size: u32) -> Self {
        self.cluster = Some(ClusterParams {
            probability,
            radius,
            size,
        });
        self
    }
}

/// Rules matching [`crate::asset::default_asset_definitions`].
pub fn default_placement_rules() -> Vec<PlacementRule> {
    vec![
        PlacementRule::new("tree", vec![Biome::Forest, Biome::Grassland], 0.08)
            .with_cluster(0.3, 3.0, 4),
        PlacementRule {
            min_height: Some(0.5),
            ..PlacementRule::new("pine", vec![Biome::Forest, Biome::Hills], 0.1)
        }
        .with_cluster(0.4, 4.0, 5),
        PlacementRule::new(
            "rock",
            vec![Biome::Grassland, Biome::Hills, Biome::Mountain],
            0.02,
        ),
        PlacementRule {
            max_moisture: Some(0.25),
            ..PlacementRule::new("cactus", vec![Biome::Desert], 0.03)
        },
        PlacementRule::new("reeds", vec![Biome::Beach, Biome::ShallowWater], 0.15)
            .with_cluster(0.5, 2.0, 3),
        PlacementRule {
            min_height: Some(0.65),
            ..PlacementRule::new("boulder", vec![Biome::Hills, Biome::Mountain], 0.02)
        },
        PlacementRule::new("snow_rock", vec![Biome::Snow], 0.05),
    ]
}

/// Terrain data consulted during placement. Only the biome map is required.
#[derive(Clone, Copy, Debug)]
pub struct PlacementInput<'a> {
    pub biomes: &'a BiomeMap,
    pub height: Option<&'a ScalarGrid>,
    pub moisture: Option<&'a ScalarGrid>,
}

impl<'a> PlacementInput<'a> {
    /// Input with only a biome map; height and moisture gates are skipped.
    pub fn new(biomes: &'a BiomeMap) -> Self {
        Self {
            biomes,
            height: None,
            moisture: None,
        }
    }
}

/// Mutable bookkeeping for one placement run.
struct PlacementState {
    occupied: HashSet<CellKey>,
    positions: HashMap<String, Vec<(i32, i32)>>,
    instances: Vec<AssetInstance>,
    serial: u64,
}

impl PlacementState {
    fn seeded(existing: &[AssetInstance]) -> Self {
        let mut state = Self {
            occupied: HashSet::with_capacity(existing.len()),
            positions: HashMap::new(),
            instances: existing.to_vec(),
            serial: 0,
        };
        for inst in existing {
            state.record(&inst.asset_id, inst.x, inst.y);
        }
        state
    }

    fn record(&mut self, asset_id: &str, x: i32, y: i32) {
        self.occupied.insert(CellKey::new(x, y));
        self.positions
            .entry_ref(asset_id)
            .or_default()
            .push((x, y));
    }

    fn place(&mut self, def: &AssetDefinition, x: i32, y: i32) {
        self.serial += 1;
        let id = format!("{}_{}_{}_{}", def.id, x, y, self.serial);
        self.instances.push(def.instantiate(id, x, y));
        self.record(&def.id, x, y);
    }

    fn same_asset(&self, asset_id: &str) -> &[(i32, i32)] {
        self.positions
            .get(asset_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Same-asset instance count within [`DENSITY_RADIUS`] that a candidate cell
/// may not exceed, for a density expressed per 10 000 cells.
pub fn density_limit(max_density: f64) -> usize {
    let area = PI * DENSITY_RADIUS * DENSITY_RADIUS;
    (max_density / 10_000.0 * area).round().max(0.0) as usize
}

/// Places assets from a catalog according to a list of rules.
pub struct AssetPlacer<'a> {
    catalog: &'a AssetCatalog,
    rules: &'a [PlacementRule],
}

impl<'a> AssetPlacer<'a> {
    pub fn new(catalog: &'a AssetCatalog, rules: &'a [PlacementRule]) -> Self {
        Self { catalog, rules }
    }

    /// Run every rule and return `existing` followed by the new instances.
    ///
    /// Existing instances are preserved in order and count toward occupancy,
    /// spacing and density. Rules naming an unknown asset are skipped.
    pub fn place<R: Rng + ?Sized>(
        &self,
        existing: &[AssetInstance],
        input: PlacementInput<'_>,
        rng: &mut R,
    ) -> Vec<AssetInstance> {
        let mut state = PlacementState::seeded(existing);

        for rule in self.rules {
            let Some(def) = self.catalog.get(&rule.asset_id) else {
                warn!(asset_id = %rule.asset_id, "placement rule references unknown asset, skipping");
                continue;
            };

            let _span = debug_span!("placement_rule", asset_id = %rule.asset_id).entered();
            let before = state.instances.len();
            Self::apply_rule(&mut state, def, rule, input, rng);
            debug!(placed = state.instances.len() - before, "rule complete");
        }

        state.instances
    }

    fn apply_rule<R: Rng + ?Sized>(
        state: &mut PlacementState,
        def: &AssetDefinition,
        rule: &PlacementRule,
        input: PlacementInput<'_>,
        rng: &mut R,
    ) {
        let (width, height) = input.biomes.dimensions();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                if !is_eligible(state, def, rule, input, x, y, rng) {
                    continue;
                }
                if rng.random::<f64>() >= rule.probability {
                    continue;
                }

                state.place(def, x, y);

                if let Some(cluster) = rule.cluster
                    && rng.random::<f64>() < cluster.probability
                {
                    let outcome = grow_cluster(state, def, rule, &cluster, input, x, y, rng);
                    trace!(x, y, attempts = outcome.attempts, members = outcome.members, "cluster grown");
                }
            }
        }
    }
}

/// Checks 1–8 of the placement pipeline, in order. Only the edge check draws
/// from `rng`.
#[allow(clippy::too_many_arguments)]
fn is_eligible<R: Rng + ?Sized>(
    state: &PlacementState,
    def: &AssetDefinition,
    rule: &PlacementRule,
    input: PlacementInput<'_>,
    x: i32,
    y: i32,
    rng: &mut R,
) -> bool {
    if state.occupied.contains(&CellKey::new(x, y)) {
        return false;
    }

    let biome = input.biomes.get(x, y);
    if !rule.biomes.contains(&biome) {
        return false;
    }

    let constraints = &def.constraints;
    if constraints.avoid_water && biome.is_water() {
        return false;
    }

    if let Some(grid) = input.height
        && !within(grid.get(x, y), rule.min_height, rule.max_height)
    {
        return false;
    }

    if let Some(grid) = input.moisture
        && !within(grid.get(x, y), rule.min_moisture, rule.max_moisture)
    {
        return false;
    }

    let others = state.same_asset(&def.id);

    if let Some(min_spacing) = constraints.min_spacing
        && others
            .iter()
            .any(|&(ox, oy)| distance(x, y, ox, oy) < min_spacing)
    {
        return false;
    }

    if let Some(max_density) = constraints.max_density {
        let nearby = others
            .iter()
            .filter(|&&(ox, oy)| distance(x, y, ox, oy) <= DENSITY_RADIUS)
            .count();
        if nearby > density_limit(max_density) {
            return false;
        }
    }

    if constraints.prefer_edges
        && !input.biomes.is_edge(x, y)
        && rng.random::<f64>() < EDGE_REJECTION_CHANCE
    {
        return false;
    }

    true
}

/// Counters for one cluster expansion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ClusterOutcome {
    /// Candidate offsets drawn, including those that fell off the map.
    attempts: u32,
    /// Candidates that passed checks 1–8 and reached the probability gate.
    eligible: u32,
    /// Instances placed.
    members: u32,
}

/// Try to place up to `cluster.size` extra instances around `(x, y)`.
#[allow(clippy::too_many_arguments)]
fn grow_cluster<R: Rng + ?Sized>(
    state: &mut PlacementState,
    def: &AssetDefinition,
    rule: &PlacementRule,
    cluster: &ClusterParams,
    input: PlacementInput<'_>,
    x: i32,
    y: i32,
    rng: &mut R,
) -> ClusterOutcome {
    let radius = cluster.radius.max(0.0);
    let probability = rule.probability * CLUSTER_PROBABILITY_SCALE;
    let mut outcome = ClusterOutcome::default();

    for _ in 0..cluster.size.saturating_mul(CLUSTER_ATTEMPTS_PER_MEMBER) {
        if outcome.members >= cluster.size {
            break;
        }
        outcome.attempts += 1;

        let angle = rng.random_range(0.0..TAU);
        let dist = rng.random::<f64>() * radius;
        let cx = libm::round(x as f64 + libm::cos(angle) * dist) as i32;
        let cy = libm::round(y as f64 + libm::sin(angle) * dist) as i32;
        if !input.biomes.in_bounds(cx, cy) {
            continue;
        }

        if !is_eligible(state, def, rule, input, cx, cy, rng) {
            continue;
        }
        outcome.eligible += 1;
        if rng.random::<f64>() < probability {
            state.place(def, cx, cy);
            outcome.members += 1;
        }
    }

    outcome
}

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|m| value >= m) && max.is_none_or(|m| value <= m)
}

fn distance(ax: i32, ay: i32, bx: i32, by: i32) -> f64 {
    let dx = (ax - bx) as f64;
    let dy = (ay - by) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Place assets onto a map.
///
/// Returns `existing` (unchanged, in order) followed by newly placed
/// instances. Inputs are not mutated.
pub fn place_assets<R: Rng + ?Sized>(
    existing: &[AssetInstance],
    catalog: &AssetCatalog,
    rules: &[PlacementRule],
    biomes: &BiomeMap,
    height: Option<&ScalarGrid>,
    moisture: Option<&ScalarGrid>,
    rng: &mut R,
) -> Vec<AssetInstance> {
    let input = PlacementInput {
        biomes,
        height,
        moisture,
    };
    AssetPlacer::new(catalog, rules).place(existing, input, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::PlacementConstraints;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn catalog_with(def: AssetDefinition) -> AssetCatalog {
        AssetCatalog::from_definitions([def]).unwrap()
    }

    fn tree() -> AssetDefinition {
        AssetDefinition::new("tree", "Tree", "tree.png")
    }

    fn spaced_tree(min_spacing: f64) -> AssetDefinition {
        tree().with_constraints(PlacementConstraints {
            min_spacing: Some(min_spacing),
            ..Default::default()
        })
    }

    fn assert_no_shared_cells(instances: &[AssetInstance]) {
        let mut seen = HashSet::new();
        for inst in instances {
            assert!(
                seen.insert((inst.x, inst.y)),
                "two instances share cell ({}, {})",
                inst.x,
                inst.y
            );
        }
    }

    #[test]
    fn test_empty_rules_is_noop() {
        let existing = vec![
            tree().instantiate("a".into(), 1, 1),
            tree().instantiate("b".into(), 3, 2),
        ];
        let biomes = BiomeMap::filled(5, 5, Biome::Grassland);
        let out = place_assets(
            &existing,
            &catalog_with(tree()),
            &[],
            &biomes,
            None,
            None,
            &mut rng(),
        );
        assert_eq!(out, existing);
    }

    #[test]
    fn test_probability_one_fills_every_cell() {
        let biomes = BiomeMap::filled(10, 10, Biome::Grassland);
        let rules = [PlacementRule::new("tree", vec![Biome::Grassland], 1.0)];
        let out = place_assets(
            &[],
            &catalog_with(tree()),
            &rules,
            &biomes,
            None,
            None,
            &mut rng(),
        );
        assert_eq!(out.len(), 100);
        assert!(out.iter().all(|i| i.asset_id == "tree"));
        assert_no_shared_cells(&out);
        // Raster order: row by row.
        assert_eq!((out[0].x, out[0].y), (0, 0));
        assert_eq!((out[11].x, out[11].y), (1, 1));
    }

    #[test]
    fn test_probability_zero_places_nothing() {
        let biomes = BiomeMap::filled(10, 10, Biome::Grassland);
        let rules = [PlacementRule::new("tree", vec![Biome::Grassland], 0.0)];
        let out = place_assets(&[], &catalog_with(tree()), &rules, &biomes, None, None, &mut rng());
        assert!(out.is_empty());
    }

    #[test]
    fn test_ids_unique() {
        let biomes = BiomeMap::filled(12, 12, Biome::Grassland);
        let rules = [PlacementRule::new("tree", vec![Biome::Grassland], 1.0)];
        let out = place_assets(&[], &catalog_with(tree()), &rules, &biomes, None, None, &mut rng());
        let ids: HashSet<_> = out.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), out.len());
    }

    #[test]
    fn test_existing_instances_preserved_and_occupied() {
        let existing = vec![tree().instantiate("keep".into(), 2, 2)];
        let biomes = BiomeMap::filled(4, 4, Biome::Grassland);
        let rules = [PlacementRule::new("tree", vec![Biome::Grassland], 1.0)];
        let out = place_assets(
            &existing,
            &catalog_with(tree()),
            &rules,
            &biomes,
            None,
            None,
            &mut rng(),
        );
        assert_eq!(out[0], existing[0]);
        assert_eq!(out.len(), 16);
        assert_no_shared_cells(&out);
    }

    #[test]
    fn test_biome_filter() {
        let biomes = BiomeMap::from_fn(6, 6, |x, _| {
            if x < 3 { Biome::Desert } else { Biome::Forest }
        });
        let rules = [PlacementRule::new("tree", vec![Biome::Forest], 1.0)];
        let out = place_assets(&[], &catalog_with(tree()), &rules, &biomes, None, None, &mut rng());
        assert_eq!(out.len(), 18);
        assert!(out.iter().all(|i| i.x >= 3));
    }

    #[test]
    fn test_avoid_water() {
        let def = AssetDefinition::new("reed", "Reed", "reed.png").with_constraints(
            PlacementConstraints {
                avoid_water: true,
                ..Default::default()
            },
        );
        let biomes = BiomeMap::from_fn(4, 4, |_, y| {
            if y == 0 { Biome::ShallowWater } else { Biome::Beach }
        });
        let rules = [PlacementRule::new(
            "reed",
            vec![Biome::ShallowWater, Biome::Beach],
            1.0,
        )];
        let out = place_assets(&[], &catalog_with(def), &rules, &biomes, None, None, &mut rng());
        assert_eq!(out.len(), 12);
        assert!(out.iter().all(|i| i.y > 0), "placed on water despite avoid_water");
    }

    #[test]
    fn test_height_and_moisture_gates() {
        let biomes = BiomeMap::filled(10, 1, Biome::Grassland);
        let height = ScalarGrid::from_fn(10, 1, |x, _| x as f64 / 10.0);
        let moisture = ScalarGrid::from_fn(10, 1, |x, _| if x % 2 == 0 { 0.2 } else { 0.8 });
        let rules = [PlacementRule {
            min_height: Some(0.3),
            max_height: Some(0.7),
            max_moisture: Some(0.5),
            ..PlacementRule::new("tree", vec![Biome::Grassland], 1.0)
        }];

        let out = place_assets(
            &[],
            &catalog_with(tree()),
            &rules,
            &biomes,
            Some(&height),
            Some(&moisture),
            &mut rng(),
        );
        let xs: Vec<_> = out.iter().map(|i| i.x).collect();
        assert_eq!(xs, vec![4, 6]);

        // Without grids the gates do not apply.
        let ungated = place_assets(&[], &catalog_with(tree()), &rules, &biomes, None, None, &mut rng());
        assert_eq!(ungated.len(), 10);
    }

    #[test]
    fn test_min_spacing_respected_including_existing() {
        let min_spacing = 3.0;
        let existing = vec![spaced_tree(min_spacing).instantiate("old".into(), 10, 10)];
        let biomes = BiomeMap::filled(30, 30, Biome::Forest);
        let rules = [PlacementRule::new("tree", vec![Biome::Forest], 0.7).with_cluster(1.0, 4.0, 5)];
        let out = place_assets(
            &existing,
            &catalog_with(spaced_tree(min_spacing)),
            &rules,
            &biomes,
            None,
            None,
            &mut rng(),
        );
        assert!(out.len() > 1);
        for (i, a) in out.iter().enumerate() {
            for b in &out[i + 1..] {
                let d = distance(a.x, a.y, b.x, b.y);
                assert!(
                    d >= min_spacing,
                    "{} and {} are {d} apart, min {min_spacing}",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn test_spacing_ignores_other_assets() {
        let rock = AssetDefinition::new("rock", "Rock", "rock.png");
        let existing = vec![rock.instantiate("r".into(), 0, 0)];
        let catalog = AssetCatalog::from_definitions([spaced_tree(5.0), rock]).unwrap();
        let biomes = BiomeMap::filled(2, 1, Biome::Grassland);
        let rules = [PlacementRule::new("tree", vec![Biome::Grassland], 1.0)];
        let out = place_assets(&existing, &catalog, &rules, &biomes, None, None, &mut rng());
        assert_eq!(out.len(), 2);
        assert_eq!((out[1].x, out[1].y), (1, 0));
    }

    #[test]
    fn test_occupancy_shared_across_assets() {
        let rock = AssetDefinition::new("rock", "Rock", "rock.png");
        let catalog = AssetCatalog::from_definitions([spaced_tree(5.0), rock]).unwrap();
        let biomes = BiomeMap::filled(3, 3, Biome::Grassland);
        let rules = [
            PlacementRule::new("rock", vec![Biome::Grassland], 1.0),
            PlacementRule::new("tree", vec![Biome::Grassland], 1.0),
        ];
        let out = place_assets(&[], &catalog, &rules, &biomes, None, None, &mut rng());
        // Rocks fill the map; trees find no free cell.
        assert_eq!(out.len(), 9);
        assert!(out.iter().all(|i| i.asset_id == "rock"));
    }

    fn dense_tree(max_density: f64) -> AssetDefinition {
        tree().with_constraints(PlacementConstraints {
            max_density: Some(max_density),
            ..Default::default()
        })
    }

    #[test]
    fn test_density_limit() {
        assert_eq!(density_limit(0.0), 0);
        let three = 3.0 * 10_000.0 / (PI * DENSITY_RADIUS * DENSITY_RADIUS);
        assert_eq!(density_limit(three), 3);

        let biomes = BiomeMap::filled(10, 10, Biome::Grassland);
        let rules = [PlacementRule::new("tree", vec![Biome::Grassland], 1.0)];
        let out = place_assets(&[], &catalog_with(dense_tree(three)), &rules, &biomes, None, None, &mut rng());
        // Rejection starts once the nearby count exceeds the limit.
        assert_eq!(out.len(), 4, "limit 3 should stop placement at 4");
    }

    #[test]
    fn test_zero_density_limit_still_places_one() {
        assert_eq!(density_limit(0.5), 0);
        let biomes = BiomeMap::filled(10, 10, Biome::Grassland);
        let rules = [PlacementRule::new("tree", vec![Biome::Grassland], 1.0)];
        let out = place_assets(&[], &catalog_with(dense_tree(0.5)), &rules, &biomes, None, None, &mut rng());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_density_radius_excludes_distant_instances() {
        let existing = vec![dense_tree(0.5).instantiate("far".into(), 0, 0)];
        let biomes = BiomeMap::filled(52, 1, Biome::Grassland);
        let rules = [PlacementRule::new("tree", vec![Biome::Grassland], 1.0)];
        let out = place_assets(
            &existing,
            &catalog_with(dense_tree(0.5)),
            &rules,
            &biomes,
            None,
            None,
            &mut rng(),
        );
        // x = 1..=50 sees the existing tree within the radius; x = 51 does not.
        assert_eq!(out.len(), 2);
        assert_eq!((out[1].x, out[1].y), (51, 0));
    }

    #[test]
    fn test_cluster_attempts_capped_when_all_rejected() {
        let biomes = BiomeMap::filled(20, 20, Biome::Grassland);
        let def = tree();
        let rule = PlacementRule::new("tree", vec![Biome::Forest], 1.0);
        let cluster = ClusterParams {
            probability: 1.0,
            radius: 3.0,
            size: 4,
        };
        let mut state = PlacementState::seeded(&[]);
        state.place(&def, 10, 10);
        let outcome = grow_cluster(
            &mut state,
            &def,
            &rule,
            &cluster,
            PlacementInput::new(&biomes),
            10,
            10,
            &mut rng(),
        );
        assert_eq!(
            outcome,
            ClusterOutcome {
                attempts: 4 * CLUSTER_ATTEMPTS_PER_MEMBER,
                eligible: 0,
                members: 0,
            }
        );
        assert_eq!(state.instances.len(), 1);
    }

    #[test]
    fn test_cluster_member_gate_scaled() {
        let biomes = BiomeMap::filled(101, 101, Biome::Grassland);
        let def = tree();
        let rule = PlacementRule::new("tree", vec![Biome::Grassland], 1.0);
        let cluster = ClusterParams {
            probability: 1.0,
            radius: 40.0,
            size: 5000,
        };
        let mut state = PlacementState::seeded(&[]);
        state.place(&def, 50, 50);
        let outcome = grow_cluster(
            &mut state,
            &def,
            &rule,
            &cluster,
            PlacementInput::new(&biomes),
            50,
            50,
            &mut rng(),
        );

        assert!(outcome.eligible > 1000, "only {} eligible candidates", outcome.eligible);
        let ratio = outcome.members as f64 / outcome.eligible as f64;
        assert!(
            (ratio - CLUSTER_PROBABILITY_SCALE).abs() < 0.05,
            "member acceptance {ratio} should be near {CLUSTER_PROBABILITY_SCALE}"
        );
    }

    #[test]
    fn test_edge_preference_favours_boundaries() {
        let def = tree().with_constraints(PlacementConstraints {
            prefer_edges: true,
            ..Default::default()
        });
        let biomes = BiomeMap::from_fn(40, 40, |x, _| {
            if x < 20 { Biome::Grassland } else { Biome::Forest }
        });
        let rules = [PlacementRule::new(
            "tree",
            vec![Biome::Grassland, Biome::Forest],
            1.0,
        )];
        let out = place_assets(&[], &catalog_with(def), &rules, &biomes, None, None, &mut rng());

        let edge = out.iter().filter(|i| i.x == 19 || i.x == 20).count();
        assert_eq!(edge, 80, "every boundary cell should be accepted");

        let interior = out.len() - edge;
        let interior_cells = 40 * 38;
        let ratio = interior as f64 / interior_cells as f64;
        assert!(
            (0.05..0.15).contains(&ratio),
            "interior acceptance {ratio} should be near 10%"
        );
    }

    #[test]
    fn test_unknown_asset_rule_skipped() {
        let biomes = BiomeMap::filled(3, 3, Biome::Grassland);
        let rules = [
            PlacementRule::new("dragon", vec![Biome::Grassland], 1.0),
            PlacementRule::new("tree", vec![Biome::Grassland], 1.0),
        ];
        let out = place_assets(&[], &catalog_with(tree()), &rules, &biomes, None, None, &mut rng());
        assert_eq!(out.len(), 9);
        assert!(out.iter().all(|i| i.asset_id == "tree"));
    }

    #[test]
    fn test_same_rng_seed_same_output() {
        let biomes = BiomeMap::from_fn(30, 30, |x, y| {
            if (x / 5 + y / 7) % 2 == 0 { Biome::Forest } else { Biome::Grassland }
        });
        let catalog = crate::asset::default_asset_catalog();
        let rules = default_placement_rules();
        let a = place_assets(&[], &catalog, &rules, &biomes, None, None, &mut rng());
        let b = place_assets(&[], &catalog, &rules, &biomes, None, None, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_cluster_members_near_anchor() {
        let biomes = BiomeMap::filled(20, 20, Biome::Grassland);
        let def = tree();
        let rule = PlacementRule::new("tree", vec![Biome::Grassland], 1.0);
        let cluster = ClusterParams {
            probability: 1.0,
            radius: 3.0,
            size: 4,
        };
        let input = PlacementInput::new(&biomes);
        let mut rng = rng();

        for _ in 0..20 {
            let mut state = PlacementState::seeded(&[]);
            state.place(&def, 10, 10);
            let outcome = grow_cluster(&mut state, &def, &rule, &cluster, input, 10, 10, &mut rng);

            assert!(outcome.members <= cluster.size);
            assert!(outcome.attempts <= cluster.size * CLUSTER_ATTEMPTS_PER_MEMBER);
            assert_eq!(state.instances.len() as u32, outcome.members + 1);
            for inst in &state.instances[1..] {
                let d = distance(inst.x, inst.y, 10, 10);
                // Rounding to a cell can push a member up to sqrt(0.5) further out.
                assert!(d <= cluster.radius + 0.75, "member at distance {d}");
            }
            assert_no_shared_cells(&state.instances);
        }
    }

    #[test]
    fn test_cluster_at_corner_stays_in_bounds() {
        let biomes = BiomeMap::filled(3, 3, Biome::Grassland);
        let def = tree();
        let rule = PlacementRule::new("tree", vec![Biome::Grassland], 1.0);
        let cluster = ClusterParams {
            probability: 1.0,
            radius: 10.0,
            size: 50,
        };
        let mut state = PlacementState::seeded(&[]);
        state.place(&def, 0, 0);
        grow_cluster(&mut state, &def, &rule, &cluster, PlacementInput::new(&biomes), 0, 0, &mut rng());
        assert!(state.instances.len() <= 9);
        for inst in &state.instances {
            assert!(biomes.in_bounds(inst.x, inst.y));
        }
    }

    #[test]
    fn test_rule_rejects_unknown_fields() {
        let ron_str = r#"(asset_id: "tree", biomes: [FOREST], probability: 0.5, weight: 2)"#;
        let result: Result<PlacementRule, _> = ron::from_str(ron_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_rule_from_ron() {
        let ron_str = r#"(
            asset_id: "tree",
            biomes: [FOREST, GRASSLAND],
            probability: 0.5,
            min_height: Some(0.4),
            cluster: Some((probability: 0.3, radius: 3.0, size: 4)),
        )"#;
        let rule: PlacementRule = ron::from_str(ron_str).unwrap();
        assert_eq!(rule.biomes, vec![Biome::Forest, Biome::Grassland]);
        assert_eq!(rule.min_height, Some(0.4));
        assert_eq!(rule.max_height, None);
        assert_eq!(rule.cluster.unwrap().size, 4);
    }
}
