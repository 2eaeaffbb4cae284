//! Gaussian exploration noise added to controller actions.
//!
//! Samples use the Box-Muller transform on a seeded Xoshiro256** stream.

use prosthetic_core::{EnvError, Result};
use prosthetic_envs::shared::rng::{rng_stream, Xoshiro256StarStar, NOISE_STREAM};
use rand::Rng;

/// Independent `N(mean_i, sigma_i²)` noise per action component.
#[derive(Clone, Debug)]
pub struct NormalActionNoise {
    mean: Vec<f32>,
    sigma: Vec<f32>,
    seed: u64,
    rng: Xoshiro256StarStar,
    spare: Option<f32>,
}

impl NormalActionNoise {
    /// Create noise with per-component mean and standard deviation.
    pub fn new(mean: Vec<f32>, sigma: Vec<f32>, seed: u64) -> Result<Self> {
        if mean.len() != sigma.len() {
            return Err(EnvError::invalid_config(
                "sigma",
                format!("expected {} components, got {}", mean.len(), sigma.len()),
            ));
        }
        if let Some(bad) = sigma.iter().find(|s| !(s.is_finite() && **s >= 0.0)) {
            return Err(EnvError::invalid_config(
                "sigma",
                format!("must be non-negative and finite, got {}", bad),
            ));
        }

        Ok(Self {
            mean,
            sigma,
            seed,
            rng: rng_stream(seed, NOISE_STREAM),
            spare: None,
        })
    }

    /// Zero-mean noise with the same sigma on every component.
    pub fn isotropic(dim: usize, sigma: f32, seed: u64) -> Result<Self> {
        Self::new(vec![0.0; dim], vec![sigma; dim], seed)
    }

    /// Number of action components.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Per-component standard deviation.
    pub fn sigma(&self) -> &[f32] {
        &self.sigma
    }

    /// Draw one noise vector.
    pub fn sample(&mut self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.mean.len());
        for i in 0..self.mean.len() {
            let z = self.next_gaussian();
            out.push(self.mean[i] + self.sigma[i] * z);
        }
        out
    }

    /// Restart the noise stream from its seed.
    pub fn reset(&mut self) {
        self.rng = rng_stream(self.seed, NOISE_STREAM);
        self.spare = None;
    }

    fn next_gaussian(&mut self) -> f32 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        let u1 = self.rng.gen::<f32>().max(1e-10); // Avoid log(0)
        let u2 = self.rng.gen::<f32>();

        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f32::consts::PI * u2;

        self.spare = Some(r * theta.sin());
        r * theta.cos()
    }
}
