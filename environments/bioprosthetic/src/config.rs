//! Configuration types and builders for the bio-prosthetic environment.
//!
//! Provides builder-pattern configuration for:
//! - The reward-shaping wrapper (jerk weight, patient randomization)
//! - The full environment stack built by [`crate::factory`]

use prosthetic_core::{EnvError, Result};
use prosthetic_envs::PendulumConfig;
use serde::{Deserialize, Serialize};

/// Jerk weight used by the smoothness-constrained runs.
pub const DEFAULT_JERK_WEIGHT: f32 = 0.1;

/// Range for patient parameters relative to nominal (±20%).
pub const PATIENT_PARAM_RANGE: (f32, f32) = (0.8, 1.2);

/// Only simulator the factory knows how to build.
pub const PENDULUM_ENV_ID: &str = "Pendulum-v1";

// ============================================================================
// Wrapper Configuration
// ============================================================================

/// Configuration for [`crate::BioProstheticWrapper`].
///
/// # Example
/// ```ignore
/// let config = WrapperConfig::new(0.1)
///     .with_randomization(true)
///     .with_seed(7);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    /// Weight of the jerk penalty subtracted from the raw reward
    pub jerk_weight: f32,
    /// Redraw mass and length on every reset
    pub randomize_patient: bool,
    /// Lower bound of the mass/length draw
    pub param_low: f32,
    /// Upper bound of the mass/length draw
    pub param_high: f32,
    /// Seed for the randomization RNG (None = fresh seed per wrapper)
    pub seed: Option<u64>,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            jerk_weight: DEFAULT_JERK_WEIGHT,
            randomize_patient: false,
            param_low: PATIENT_PARAM_RANGE.0,
            param_high: PATIENT_PARAM_RANGE.1,
            seed: None,
        }
    }
}

impl WrapperConfig {
    /// Create a config with the given jerk weight and no randomization.
    pub fn new(jerk_weight: f32) -> Self {
        Self {
            jerk_weight,
            ..Self::default()
        }
    }

    /// Enable or disable patient randomization.
    pub fn with_randomization(mut self, enabled: bool) -> Self {
        self.randomize_patient = enabled;
        self
    }

    /// Set the mass/length draw range.
    pub fn with_param_range(mut self, low: f32, high: f32) -> Self {
        self.param_low = low;
        self.param_high = high;
        self
    }

    /// Seed the randomization RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.jerk_weight.is_finite() && self.jerk_weight >= 0.0) {
            return Err(EnvError::invalid_config(
                "jerk_weight",
                format!("must be a non-negative finite number, got {}", self.jerk_weight),
            ));
        }

        let range_ok = self.param_low > 0.0
            && self.param_low < self.param_high
            && self.param_high.is_finite();
        if !range_ok {
            return Err(EnvError::invalid_config(
                "param_range",
                format!(
                    "need 0 < low < high, got [{}, {}]",
                    self.param_low, self.param_high
                ),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Environment Configuration
// ============================================================================

/// Configuration for the full wrapped environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Simulator identifier
    pub env_id: String,
    /// Underlying simulator parameters
    pub pendulum: PendulumConfig,
    /// Reward-shaping wrapper parameters
    pub wrapper: WrapperConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            env_id: PENDULUM_ENV_ID.to_string(),
            pendulum: PendulumConfig::default(),
            wrapper: WrapperConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Create the default configuration (`Pendulum-v1`, jerk weight 0.1).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the jerk weight.
    pub fn with_jerk_weight(mut self, jerk_weight: f32) -> Self {
        self.wrapper.jerk_weight = jerk_weight;
        self
    }

    /// Enable or disable patient randomization.
    pub fn with_randomization(mut self, enabled: bool) -> Self {
        self.wrapper.randomize_patient = enabled;
        self
    }

    /// Seed both the simulator and the randomization RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.pendulum.seed = seed;
        self.wrapper.seed = Some(seed);
        self
    }

    /// Replace the simulator configuration.
    pub fn with_pendulum(mut self, pendulum: PendulumConfig) -> Self {
        self.pendulum = pendulum;
        self
    }

    /// Replace the wrapper configuration.
    pub fn with_wrapper(mut self, wrapper: WrapperConfig) -> Self {
        self.wrapper = wrapper;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.env_id != PENDULUM_ENV_ID {
            return Err(EnvError::invalid_config(
                "env_id",
                format!("unknown environment '{}', expected '{}'", self.env_id, PENDULUM_ENV_ID),
            ));
        }
        self.pendulum.validate()?;
        self.wrapper.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_training_runs() {
        let config = EnvConfig::default();
        assert_eq!(config.env_id, "Pendulum-v1");
        assert_eq!(config.wrapper.jerk_weight, 0.1);
        assert!(!config.wrapper.randomize_patient);
        assert_eq!((config.wrapper.param_low, config.wrapper.param_high), (0.8, 1.2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        assert!(WrapperConfig::new(-0.1).validate().is_err());
        assert!(WrapperConfig::new(f32::NAN).validate().is_err());
        assert!(WrapperConfig::new(0.0).validate().is_ok());
    }

    #[test]
    fn test_bad_param_range_rejected() {
        assert!(WrapperConfig::new(0.1).with_param_range(1.2, 0.8).validate().is_err());
        assert!(WrapperConfig::new(0.1).with_param_range(0.0, 1.0).validate().is_err());
        assert!(WrapperConfig::new(0.1).with_param_range(0.5, 2.0).validate().is_ok());
    }

    #[test]
    fn test_unknown_env_id_rejected() {
        let mut config = EnvConfig::new();
        config.env_id = "CartPole-v1".to_string();
        assert!(matches!(config.validate(), Err(EnvError::InvalidConfig { .. })));
    }

    #[test]
    fn test_with_seed_seeds_both_layers() {
        let config = EnvConfig::new().with_seed(9);
        assert_eq!(config.pendulum.seed, 9);
        assert_eq!(config.wrapper.seed, Some(9));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let json = r#"{"wrapper": {"jerk_weight": 0.0, "randomize_patient": true}}"#;
        let config: EnvConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.wrapper.jerk_weight, 0.0);
        assert!(config.wrapper.randomize_patient);
        assert_eq!(config.wrapper.param_high, 1.2);
        assert_eq!(config.pendulum.max_steps, 200);
    }
}
