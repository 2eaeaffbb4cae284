//! Pendulum environment (Gymnasium `Pendulum-v1`).
//!
//! Classic continuous control environment where the goal is to swing up and
//! balance an inverted pendulum. Features a continuous action space and no
//! terminal state (only truncation at the time limit).
//!
//! Mass and length are regular fields rather than constants so they can be
//! rewritten between episodes to model patient variability.

use prosthetic_core::{
    Env, EnvError, Info, PatientParams, PhysicalParams, ResetOptions, Result, Space, Transition,
};
use serde::{Deserialize, Serialize};

use crate::shared::rng::{random_uniform, rng_stream, Xoshiro256StarStar, ENV_STREAM};

pub const MAX_SPEED: f32 = 8.0;
pub const MAX_TORQUE: f32 = 2.0;
pub const DT: f32 = 0.05;
pub const G: f32 = 10.0;
pub const MAX_STEPS: u32 = 200;

/// Observation dims: [cos θ, sin θ, θ̇]
pub const OBS_SIZE: usize = 3;
/// Action dims: [torque]
pub const ACTION_DIM: usize = 1;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for [`Pendulum`] using builder pattern.
///
/// # Example
/// ```ignore
/// let config = PendulumConfig::new()
///     .with_gravity(9.81)
///     .with_max_steps(500);
/// let env = Pendulum::from_config(config)?;
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumConfig {
    /// Gravitational acceleration (m/s²)
    pub gravity: f32,
    /// Episode length before truncation
    pub max_steps: u32,
    /// Range for random initial angle (±range)
    pub init_theta_range: f32,
    /// Range for random initial angular velocity (±range)
    pub init_theta_dot_range: f32,
    /// Point mass at construction (kg)
    pub mass: f32,
    /// Rod length at construction (m)
    pub length: f32,
    /// Seed for the initial-state RNG until a reset provides one
    pub seed: u64,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            gravity: G,
            max_steps: MAX_STEPS,
            init_theta_range: std::f32::consts::PI,
            init_theta_dot_range: 1.0,
            mass: PatientParams::NOMINAL.mass,
            length: PatientParams::NOMINAL.length,
            seed: 0,
        }
    }
}

impl PendulumConfig {
    /// Create a config matching Gymnasium `Pendulum-v1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set gravitational acceleration.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the time limit.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the initial angle range (±range).
    pub fn with_init_theta_range(mut self, range: f32) -> Self {
        self.init_theta_range = range;
        self
    }

    /// Set the initial angular velocity range (±range).
    pub fn with_init_theta_dot_range(mut self, range: f32) -> Self {
        self.init_theta_dot_range = range;
        self
    }

    /// Set the physical parameters used until they are overwritten.
    pub fn with_params(mut self, params: PatientParams) -> Self {
        self.mass = params.mass;
        self.length = params.length;
        self
    }

    /// Set the seed used before any seeded reset.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(EnvError::invalid_config("gravity", "must be positive"));
        }
        if self.max_steps == 0 {
            return Err(EnvError::invalid_config("max_steps", "must be at least 1"));
        }
        if self.init_theta_range < 0.0 || self.init_theta_dot_range < 0.0 {
            return Err(EnvError::invalid_config("init ranges", "must be non-negative"));
        }
        if !(self.mass > 0.0 && self.length > 0.0) {
            return Err(EnvError::invalid_config("mass/length", "must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Pendulum
// ============================================================================

/// Single-instance inverted pendulum.
pub struct Pendulum {
    theta: f32,
    theta_dot: f32,
    /// Point mass (kg), read by every step
    pub m: f32,
    /// Rod length (m), read by every step
    pub l: f32,
    ticks: u32,
    needs_reset: bool,
    config: PendulumConfig,
    rng: Xoshiro256StarStar,
}

impl Pendulum {
    /// Create a new pendulum from configuration.
    pub fn from_config(config: PendulumConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            theta: 0.0,
            theta_dot: 0.0,
            m: config.mass,
            l: config.length,
            ticks: 0,
            needs_reset: true,
            rng: rng_stream(config.seed, ENV_STREAM),
            config,
        })
    }

    /// Create with Gymnasium `Pendulum-v1` defaults.
    pub fn new() -> Result<Self> {
        Self::from_config(PendulumConfig::default())
    }

    /// Get the configuration.
    pub fn config(&self) -> &PendulumConfig {
        &self.config
    }

    /// Current angle (radians, 0 = upright).
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Current angular velocity (rad/s).
    pub fn theta_dot(&self) -> f32 {
        self.theta_dot
    }

    /// Steps taken in the current episode.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Overwrite the state, e.g. to start from a known configuration in tests.
    pub fn set_state(&mut self, theta: f32, theta_dot: f32) {
        self.theta = theta;
        self.theta_dot = theta_dot;
    }

    fn observation(&self) -> Vec<f32> {
        vec![self.theta.cos(), self.theta.sin(), self.theta_dot]
    }
}

impl Env for Pendulum {
    fn observation_space(&self) -> Space {
        Space::Box {
            low: vec![-1.0, -1.0, -MAX_SPEED],
            high: vec![1.0, 1.0, MAX_SPEED],
        }
    }

    fn action_space(&self) -> Space {
        Space::uniform_box(-MAX_TORQUE, MAX_TORQUE, ACTION_DIM)
    }

    fn reset(&mut self, options: &ResetOptions) -> Result<(Vec<f32>, Info)> {
        if let Some(seed) = options.seed {
            self.rng = rng_stream(seed, ENV_STREAM);
        }

        let theta_range = self.config.init_theta_range;
        let theta_dot_range = self.config.init_theta_dot_range;
        self.theta = random_uniform(&mut self.rng, -theta_range, theta_range);
        self.theta_dot = random_uniform(&mut self.rng, -theta_dot_range, theta_dot_range);
        self.ticks = 0;
        self.needs_reset = false;

        Ok((self.observation(), Info::new()))
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition> {
        if self.needs_reset {
            return Err(EnvError::ResetNeeded);
        }
        if action.len() != ACTION_DIM {
            return Err(EnvError::ActionDimensionMismatch {
                expected: ACTION_DIM,
                actual: action.len(),
            });
        }

        let theta = self.theta;
        let theta_dot = self.theta_dot;
        let (g, m, l) = (self.config.gravity, self.m, self.l);

        let torque = action[0].clamp(-MAX_TORQUE, MAX_TORQUE);

        // Cost uses the pre-step state.
        let angle = angle_normalize(theta);
        let cost = angle * angle + 0.1 * theta_dot * theta_dot + 0.001 * torque * torque;

        let theta_acc = 3.0 * g / (2.0 * l) * theta.sin() + 3.0 / (m * l * l) * torque;
        let new_theta_dot = theta_dot + theta_acc * DT;
        let new_theta_dot = new_theta_dot.clamp(-MAX_SPEED, MAX_SPEED);
        let new_theta = angle_normalize(theta + new_theta_dot * DT);

        self.theta = new_theta;
        self.theta_dot = new_theta_dot;
        self.ticks += 1;

        Ok(Transition {
            observation: self.observation(),
            reward: -cost,
            terminated: false,
            truncated: self.ticks >= self.config.max_steps,
            info: Info::new(),
        })
    }
}

impl PhysicalParams for Pendulum {
    fn patient_params(&self) -> PatientParams {
        PatientParams::new(self.m, self.l)
    }

    fn set_patient_params(&mut self, params: PatientParams) {
        self.m = params.mass;
        self.l = params.length;
    }
}

/// Normalize angle to [-π, π) range.
#[inline(always)]
pub fn angle_normalize(angle: f32) -> f32 {
    let pi = std::f32::consts::PI;
    let two_pi = 2.0 * pi;
    ((angle + pi) % two_pi + two_pi) % two_pi - pi
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn reset_env(seed: u64) -> (Pendulum, Vec<f32>) {
        let mut env = Pendulum::new().unwrap();
        let (obs, _) = env.reset(&ResetOptions::new().with_seed(seed)).unwrap();
        (env, obs)
    }

    #[test]
    fn test_spaces() {
        let env = Pendulum::new().unwrap();
        assert_eq!(env.observation_space().dim(), OBS_SIZE);
        assert_eq!(env.action_space(), Space::uniform_box(-2.0, 2.0, 1));
    }

    #[test]
    fn test_reset_ranges() {
        for seed in 0..50 {
            let (env, obs) = reset_env(seed);
            assert!(env.theta() >= -PI && env.theta() < PI);
            assert!(env.theta_dot() >= -1.0 && env.theta_dot() < 1.0);
            assert_eq!(obs.len(), OBS_SIZE);
            assert!((obs[0] * obs[0] + obs[1] * obs[1] - 1.0).abs() < 1e-5);
            assert_eq!(env.ticks(), 0);
        }
    }

    #[test]
    fn test_seeded_reset_is_deterministic() {
        let (_, a) = reset_env(42);
        let (_, b) = reset_env(42);
        let (_, c) = reset_env(43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut env = Pendulum::new().unwrap();
        assert!(matches!(env.step(&[0.0]), Err(EnvError::ResetNeeded)));
    }

    #[test]
    fn test_wrong_action_dim() {
        let (mut env, _) = reset_env(0);
        let err = env.step(&[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, EnvError::ActionDimensionMismatch { expected: 1, actual: 2 }));
    }

    #[test]
    fn test_upright_at_rest_has_zero_cost() {
        let (mut env, _) = reset_env(0);
        env.set_state(0.0, 0.0);
        let t = env.step(&[0.0]).unwrap();
        assert!(t.reward.abs() < 1e-9);
        assert!((t.observation[0] - 1.0).abs() < 1e-6);
        assert!(t.observation[1].abs() < 1e-6);
        assert!(t.observation[2].abs() < 1e-6);
    }

    #[test]
    fn test_reward_uses_pre_step_state_and_clipped_torque() {
        let (mut env, _) = reset_env(0);
        env.set_state(0.5, 1.0);
        let t = env.step(&[5.0]).unwrap();
        let expected = -(0.25 + 0.1 * 1.0 + 0.001 * 4.0);
        assert!((t.reward - expected).abs() < 1e-6, "reward {}", t.reward);
    }

    #[test]
    fn test_dynamics_match_reference_update() {
        let (mut env, _) = reset_env(0);
        env.set_state(1.0, 0.5);
        env.step(&[1.0]).unwrap();

        let expected_dot = 0.5 + (3.0 * G / 2.0 * 1.0f32.sin() + 3.0 * 1.0) * DT;
        let expected_theta = 1.0 + expected_dot * DT;
        assert!((env.theta_dot() - expected_dot).abs() < 1e-5);
        assert!((env.theta() - expected_theta).abs() < 1e-5);
    }

    #[test]
    fn test_heavier_longer_limb_accelerates_less_under_torque() {
        let (mut nominal, _) = reset_env(0);
        let (mut heavy, _) = reset_env(0);
        heavy.set_patient_params(PatientParams::new(1.2, 1.2));
        nominal.set_state(0.0, 0.0);
        heavy.set_state(0.0, 0.0);

        nominal.step(&[2.0]).unwrap();
        heavy.step(&[2.0]).unwrap();
        assert!(heavy.theta_dot() < nominal.theta_dot());
        assert_eq!(heavy.patient_params(), PatientParams::new(1.2, 1.2));
    }

    #[test]
    fn test_speed_clipped() {
        let (mut env, _) = reset_env(0);
        env.set_state(PI / 2.0, MAX_SPEED);
        let t = env.step(&[2.0]).unwrap();
        assert!(t.observation[2] <= MAX_SPEED);
    }

    #[test]
    fn test_truncates_at_time_limit_never_terminates() {
        let mut env = Pendulum::from_config(PendulumConfig::new().with_max_steps(5)).unwrap();
        env.reset(&ResetOptions::new()).unwrap();
        for i in 1..=5 {
            let t = env.step(&[0.0]).unwrap();
            assert!(!t.terminated);
            assert_eq!(t.truncated, i == 5);
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(PendulumConfig::new().validate().is_ok());
        assert!(PendulumConfig::new().with_max_steps(0).validate().is_err());
        assert!(PendulumConfig::new().with_gravity(-1.0).validate().is_err());
        assert!(PendulumConfig::new()
            .with_params(PatientParams::new(0.0, 1.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_angle_normalize() {
        assert!((angle_normalize(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((angle_normalize(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((angle_normalize(0.3) - 0.3).abs() < 1e-6);
    }
}
