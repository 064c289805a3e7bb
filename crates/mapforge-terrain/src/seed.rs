//! Deterministic seed derivation for independent random streams.
//!
//! Noise fields consume the world seed directly; every other random stream
//! (asset placement, previews) derives its own seed so the streams stay
//! decorrelated while remaining reproducible.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Stream name used for the asset placement RNG.
pub const PLACEMENT_STREAM: &str = "asset-placement";

/// Derive a u64 seed for a named stream from the world seed.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine the world seed with
/// the stream name into a well-distributed u64.
pub fn derive_seed(world_seed: u64, stream: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    stream.hash(&mut hasher);
    hasher.finish()
}

/// The RNG used for asset placement on a map generated from `world_seed`.
pub fn placement_rng(world_seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_seed(world_seed, PLACEMENT_STREAM))
}
