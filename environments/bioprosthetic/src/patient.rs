//! Per-episode perturbation of the patient's physical parameters.

use prosthetic_envs::shared::rng::{
    random_uniform, rng_stream, Xoshiro256StarStar, PATIENT_STREAM,
};

use crate::config::PATIENT_PARAM_RANGE;

pub use prosthetic_core::{PatientParams, PhysicalParams};

/// Draws mass and length independently from `U[low, high)`.
#[derive(Clone, Debug)]
pub struct PatientRandomizer {
    low: f32,
    high: f32,
    rng: Xoshiro256StarStar,
}

impl PatientRandomizer {
    /// Create a randomizer over `[low, high)` with a fixed seed.
    ///
    /// Draws come from the patient stream of `seed`, so an environment
    /// seeded with the same value samples its initial state independently.
    pub fn new(low: f32, high: f32, seed: u64) -> Self {
        Self {
            low,
            high,
            rng: rng_stream(seed, PATIENT_STREAM),
        }
    }

    /// Randomizer over the default ±20% range.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(PATIENT_PARAM_RANGE.0, PATIENT_PARAM_RANGE.1, seed)
    }

    /// Randomizer seeded from a fresh entropy draw.
    pub fn from_entropy(low: f32, high: f32) -> Self {
        Self::new(low, high, fastrand::u64(..))
    }

    /// Draw range as `(low, high)`.
    pub fn range(&self) -> (f32, f32) {
        (self.low, self.high)
    }

    /// Draw a new set of parameters.
    pub fn sample(&mut self) -> PatientParams {
        let mass = random_uniform(&mut self.rng, self.low, self.high);
        let length = random_uniform(&mut self.rng, self.low, self.high);
        PatientParams::new(mass, length)
    }
}
