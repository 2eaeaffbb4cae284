//! Random number generation utilities for environments.

use rand::SeedableRng;
pub use rand_xoshiro::Xoshiro256StarStar;

/// Stream index of environment state sampling (the plain seeded stream).
pub const ENV_STREAM: u32 = 0;
/// Stream index of patient parameter draws.
pub const PATIENT_STREAM: u32 = 1;
/// Stream index of exploration noise.
pub const NOISE_STREAM: u32 = 2;
/// Stream index of stochastic controllers.
pub const POLICY_STREAM: u32 = 3;

/// Seeded generator advanced by `stream` long jumps (2^192 steps each).
///
/// Consumers sharing one seed but using different stream indices draw from
/// non-overlapping subsequences.
pub fn rng_stream(seed: u64, stream: u32) -> Xoshiro256StarStar {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    for _ in 0..stream {
        rng.long_jump();
    }
    rng
}

/// Generate a random float in the range [low, high).
#[inline]
pub fn random_uniform(rng: &mut Xoshiro256StarStar, low: f32, high: f32) -> f32 {
    use rand::Rng;
    rng.gen::<f32>() * (high - low) + low
}
