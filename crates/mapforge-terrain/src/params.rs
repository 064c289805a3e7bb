//! Generation parameters with documented defaults and partial overrides.

use serde::{Deserialize, Serialize};

/// Octave composition settings for one noise-derived scalar field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldParams {
    /// Number of noise layers summed per cell. Zero yields a flat 0.5 field.
    pub octaves: u32,
    /// Frequency of the first octave, in cycles per cell. Doubles every octave.
    pub frequency: f64,
    /// Amplitude of the first octave.
    pub amplitude: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
}

impl FieldParams {
    /// Default settings for the heightmap field.
    pub const HEIGHT: Self = Self {
        octaves: 4,
        frequency: 0.05,
        amplitude: 1.0,
        persistence: 0.5,
    };

    /// Default settings for the moisture field.
    pub const MOISTURE: Self = Self {
        octaves: 3,
        frequency: 0.08,
        amplitude: 1.0,
        persistence: 0.5,
    };
}

/// Named thresholds driving biome classification. All values are in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BiomeThresholds {
    /// Heights below this are water.
    pub water_level: f64,
    /// Heights below this (and at or above `water_level`) are beach.
    pub beach_level: f64,
    /// Heights above this are hills.
    pub hill_level: f64,
    /// Heights above this are mountains (or snow above 0.9).
    pub mountain_level: f64,
    /// Mid-elevation moisture below this is desert.
    pub dry_threshold: f64,
    /// Mid-elevation moisture above this is forest.
    pub wet_threshold: f64,
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self {
            water_level: 0.3,
            beach_level: 0.35,
            hill_level: 0.6,
            mountain_level: 0.8,
            dry_threshold: 0.3,
            wet_threshold: 0.6,
        }
    }
}

/// Complete, immutable configuration for one generation call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationParams {
    /// Map width in cells.
    pub width: u32,
    /// Map height in cells.
    pub height: u32,
    /// Seed for the noise fields and the placement RNG.
    pub seed: u64,
    /// Heightmap octave settings.
    pub height_field: FieldParams,
    /// Moisture map octave settings.
    pub moisture_field: FieldParams,
    /// Biome classification thresholds.
    pub thresholds: BiomeThresholds,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            seed: 42,
            height_field: FieldParams::HEIGHT,
            moisture_field: FieldParams::MOISTURE,
            thresholds: BiomeThresholds::default(),
        }
    }
}

impl GenerationParams {
    /// Defaults with the given dimensions and seed.
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            ..Default::default()
        }
    }

    /// Return a copy of `self` with every `Some` field of `overrides` applied.
    pub fn with_overrides(&self, overrides: &GenerationOverrides) -> Self {
        let mut params = self.clone();
        if let Some(w) = overrides.width {
            params.width = w;
        }
        if let Some(h) = overrides.height {
            params.height = h;
        }
        if let Some(seed) = overrides.seed {
            params.seed = seed;
        }
        overrides.height_field.apply(&mut params.height_field);
        overrides.moisture_field.apply(&mut params.moisture_field);

        let t = &overrides.thresholds;
        let out = &mut params.thresholds;
        merge(&mut out.water_level, t.water_level);
        merge(&mut out.beach_level, t.beach_level);
        merge(&mut out.hill_level, t.hill_level);
        merge(&mut out.mountain_level, t.mountain_level);
        merge(&mut out.dry_threshold, t.dry_threshold);
        merge(&mut out.wet_threshold, t.wet_threshold);
        params
    }

    /// Number of cells in the map.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

fn merge<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Partial [`FieldParams`]; `None` keeps the base value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOverrides {
    pub octaves: Option<u32>,
    pub frequency: Option<f64>,
    pub amplitude: Option<f64>,
    pub persistence: Option<f64>,
}

impl FieldOverrides {
    fn apply(&self, field: &mut FieldParams) {
        merge(&mut field.octaves, self.octaves);
        merge(&mut field.frequency, self.frequency);
        merge(&mut field.amplitude, self.amplitude);
        merge(&mut field.persistence, self.persistence);
    }
}

/// Partial [`BiomeThresholds`]; `None` keeps the base value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub water_level: Option<f64>,
    pub beach_level: Option<f64>,
    pub hill_level: Option<f64>,
    pub mountain_level: Option<f64>,
    pub dry_threshold: Option<f64>,
    pub wet_threshold: Option<f64>,
}

/// Partial [`GenerationParams`] as supplied by callers and config files.
///
/// Every field is optional; unknown fields are rejected on deserialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<u64>,
    pub height_field: FieldOverrides,
    pub moisture_field: FieldOverrides,
    pub thresholds: ThresholdOverrides,
}

impl GenerationOverrides {
    /// Merge onto [`GenerationParams::default`].
    pub fn resolve(&self) -> GenerationParams {
        GenerationParams::default().with_overrides(self)
    }
}
