//! Seeded coherent noise field.

use noise::{NoiseFn, Simplex};

/// Seed offset applied to the moisture field so it does not correlate with height.
pub const MOISTURE_SEED_OFFSET: u64 = 1000;

/// A deterministic, continuous 2D scalar field backed by simplex noise.
///
/// Sampling has no side effects: the same seed and coordinate always return
/// the same value. Each generation call builds its own field.
#[derive(Clone, Debug)]
pub struct NoiseField {
    noise: Simplex,
    seed: u64,
}

impl NoiseField {
    /// Create a field for `seed`. Only the low 32 bits select the permutation table.
    pub fn new(seed: u64) -> Self {
        Self {
            noise: Simplex::new(seed as u32),
            seed,
        }
    }

    /// The field used for heightmaps generated with `seed`.
    pub fn height(seed: u64) -> Self {
        Self::new(seed)
    }

    /// The field used for moisture maps generated with `seed`.
    pub fn moisture(seed: u64) -> Self {
        Self::new(seed.wrapping_add(MOISTURE_SEED_OFFSET))
    }

    /// Sample the field. The result lies approximately in `[-1.0, 1.0]`.
    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x, y])
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        for i in 0..100 {
            let (x, y) = (i as f64 * 0.37, i as f64 * 0.11);
            assert_eq!(a.sample(x, y), b.sample(x, y), "mismatch at ({x}, {y})");
        }
    }

    #[test]
    fn test_samples_bounded() {
        let field = NoiseField::new(3);
        for i in 0..50 {
            for j in 0..50 {
                let v = field.sample(i as f64 * 0.13, j as f64 * 0.17);
                assert!(v.abs() <= 1.1, "sample {v} far outside [-1, 1]");
            }
        }
    }

    #[test]
    fn test_nearby_points_correlated() {
        let field = NoiseField::new(11);
        for i in 0..200 {
            let x = i as f64 * 0.05;
            let delta = (field.sample(x, 0.3) - field.sample(x + 0.001, 0.3)).abs();
            assert!(delta < 0.05, "discontinuity at x={x}: delta={delta}");
        }
    }

    #[test]
    fn test_moisture_field_uses_offset_seed() {
        let height = NoiseField::height(42);
        let moisture = NoiseField::moisture(42);
        assert_eq!(moisture.seed(), 42 + MOISTURE_SEED_OFFSET);

        let differing = (0..100)
            .map(|i| (i as f64 * 0.21 + 0.5, i as f64 * 0.07 + 0.5))
            .filter(|&(x, y)| (height.sample(x, y) - moisture.sample(x, y)).abs() > 1e-9)
            .count();
        assert!(differing > 90, "height and moisture fields look identical");
    }
}
