//! Reward-shaping wrapper that penalizes jerky actuator commands and
//! perturbs the patient between episodes.

use log::debug;
use prosthetic_core::{Env, EnvError, Info, ResetOptions, Result, Space, Transition};

use crate::config::WrapperConfig;
use crate::jerk::{compute_jerk, JerkPenalty, JERK_INFO_KEY};
use crate::patient::{PatientParams, PatientRandomizer, PhysicalParams};

/// Decorator around a continuous-action environment.
///
/// On every step the reward is reduced by `jerk_weight * ||a - a_prev||²`
/// and the jerk is reported as `info["jerk"]`. When randomization is
/// enabled, mass and length are redrawn on every reset.
///
/// # Example
/// ```ignore
/// let mut env = BioProstheticWrapper::new(Pendulum::new()?, 0.1, true)?;
/// env.reset(&ResetOptions::new().with_seed(0))?;
/// let t = env.step(&[1.0])?;
/// assert_eq!(t.info.get("jerk"), Some(1.0));
/// ```
pub struct BioProstheticWrapper<E> {
    env: E,
    penalty: JerkPenalty,
    randomize_patient: bool,
    randomizer: PatientRandomizer,
    last_action: Vec<f32>,
}

impl<E: Env + PhysicalParams> BioProstheticWrapper<E> {
    /// Wrap `env` with the given jerk weight.
    pub fn new(env: E, jerk_weight: f32, randomize_patient: bool) -> Result<Self> {
        Self::from_config(
            env,
            WrapperConfig::new(jerk_weight).with_randomization(randomize_patient),
        )
    }

    /// Wrap `env` using a full wrapper configuration.
    pub fn from_config(env: E, config: WrapperConfig) -> Result<Self> {
        config.validate()?;

        let action_space = env.action_space();
        if !action_space.is_vector() {
            return Err(EnvError::UnsupportedActionSpace(format!(
                "jerk penalty needs a non-empty continuous action space, got {:?}",
                action_space
            )));
        }

        let randomizer = match config.seed {
            Some(seed) => PatientRandomizer::new(config.param_low, config.param_high, seed),
            None => PatientRandomizer::from_entropy(config.param_low, config.param_high),
        };

        Ok(Self {
            last_action: vec![0.0; action_space.dim()],
            env,
            penalty: JerkPenalty::new(config.jerk_weight),
            randomize_patient: config.randomize_patient,
            randomizer,
        })
    }
}

impl<E> BioProstheticWrapper<E> {
    /// Weight of the jerk penalty.
    pub fn jerk_weight(&self) -> f32 {
        self.penalty.weight
    }

    /// Whether mass and length are redrawn on reset.
    pub fn randomize_patient(&self) -> bool {
        self.randomize_patient
    }

    /// Action applied on the previous step (zeros right after reset).
    pub fn last_action(&self) -> &[f32] {
        &self.last_action
    }

    /// Wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Mutable access to the wrapped environment.
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Unwrap into the inner environment.
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: Env + PhysicalParams> Env for BioProstheticWrapper<E> {
    fn observation_space(&self) -> Space {
        self.env.observation_space()
    }

    fn action_space(&self) -> Space {
        self.env.action_space()
    }

    fn reset(&mut self, options: &ResetOptions) -> Result<(Vec<f32>, Info)> {
        let (obs, info) = self.env.reset(options)?;
        self.last_action.fill(0.0);

        // Parameters are written after the inner reset, so they take effect
        // from the first step of the new episode.
        if self.randomize_patient {
            let params = self.randomizer.sample();
            self.env.set_patient_params(params);
            let (mass_ratio, length_ratio) = params.relative_to(&PatientParams::NOMINAL);
            debug!(
                "Patient randomized: mass={:.4} ({:+.1}%) length={:.4} ({:+.1}%)",
                params.mass,
                (mass_ratio - 1.0) * 100.0,
                params.length,
                (length_ratio - 1.0) * 100.0
            );
        }

        Ok((obs, info))
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition> {
        if action.len() != self.last_action.len() {
            return Err(EnvError::ActionDimensionMismatch {
                expected: self.last_action.len(),
                actual: action.len(),
            });
        }

        let jerk = compute_jerk(action, &self.last_action);
        self.last_action.copy_from_slice(action);

        let mut transition = self.env.step(action)?;
        transition.reward = self.penalty.shape(transition.reward, jerk);
        transition.info.insert(JERK_INFO_KEY, jerk);

        Ok(transition)
    }
}

impl<E: PhysicalParams> PhysicalParams for BioProstheticWrapper<E> {
    fn patient_params(&self) -> PatientParams {
        self.env.patient_params()
    }

    fn set_patient_params(&mut self, params: PatientParams) {
        self.env.set_patient_params(params)
    }
}
