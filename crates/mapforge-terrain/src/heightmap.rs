//! Multi-octave heightmap and moisture map generation.
//!
//! Each cell sums several octaves of a [`NoiseField`], doubling the frequency
//! and scaling the amplitude by `persistence` per octave, then maps the raw
//! sum from `[-1, 1]` to `[0, 1]`.

use crate::grid::ScalarGrid;
use crate::noise_field::NoiseField;
use crate::params::{FieldParams, GenerationParams};

/// Sum `params.octaves` layers of `field` at cell `(x, y)`.
///
/// The result is the raw fBm sum and is not normalized.
pub fn fbm(field: &NoiseField, params: &FieldParams, x: f64, y: f64) -> f64 {
    let mut total = 0.0;
    let mut frequency = params.frequency;
    let mut amplitude = params.amplitude;

    for _ in 0..params.octaves {
        total += field.sample(x * frequency, y * frequency) * amplitude;
        frequency *= 2.0;
        amplitude *= params.persistence;
    }

    total
}

/// Build a `width x height` grid from `field`, normalized into `[0, 1]`.
pub fn generate_field(field: &NoiseField, params: &FieldParams, width: u32, height: u32) -> ScalarGrid {
    ScalarGrid::from_fn(width, height, |x, y| {
        let raw = fbm(field, params, x as f64, y as f64);
        // `from_fn` clamps, so sums beyond [-1, 1] saturate at the ends.
        (raw + 1.0) * 0.5
    })
}

/// Generate the elevation grid for `params`.
pub fn generate_heightmap(params: &GenerationParams) -> ScalarGrid {
    let field = NoiseField::height(params.seed);
    generate_field(&field, &params.height_field, params.width, params.height)
}

/// Generate the moisture grid for `params`, using the offset moisture seed.
pub fn generate_moisture_map(params: &GenerationParams) -> ScalarGrid {
    let field = NoiseField::moisture(params.seed);
    generate_field(&field, &params.moisture_field, params.width, params.height)
}
