//! Scripted pendulum controllers standing in for learned policies.
//!
//! All controllers read the pendulum observation `[cos θ, sin θ, θ̇]` and
//! return actions clipped to the action space.

use prosthetic_core::Space;
use prosthetic_envs::gymnasium::pendulum::{DT, G};
use prosthetic_envs::shared::rng::{rng_stream, Xoshiro256StarStar, POLICY_STREAM};
use rand::Rng;

use crate::config::ControllerKind;

/// Maps an observation to an action.
pub trait Policy {
    /// Controller name used in logs and CSV columns.
    fn name(&self) -> &'static str;

    /// Choose an action for `obs`.
    fn act(&mut self, obs: &[f32]) -> Vec<f32>;
}

/// Build the controller for `kind` over `action_space`.
pub fn make_policy(kind: ControllerKind, action_space: Space, seed: u64) -> Box<dyn Policy> {
    match kind {
        ControllerKind::Zero => Box::new(ZeroPolicy { action_space }),
        ControllerKind::Random => Box::new(RandomPolicy::new(action_space, seed)),
        ControllerKind::Pd => Box::new(PdPolicy::new(action_space)),
        ControllerKind::BangBang => Box::new(BangBangPolicy { action_space }),
    }
}

fn angle(obs: &[f32]) -> (f32, f32) {
    (obs[1].atan2(obs[0]), obs[2])
}

fn max_abs(space: &Space) -> f32 {
    space
        .bounds()
        .map(|(_, high)| high.iter().copied().fold(0.0f32, f32::max))
        .unwrap_or(1.0)
}

// ============================================================================
// Zero
// ============================================================================

/// Always applies zero torque.
pub struct ZeroPolicy {
    action_space: Space,
}

impl Policy for ZeroPolicy {
    fn name(&self) -> &'static str {
        ControllerKind::Zero.name()
    }

    fn act(&mut self, _obs: &[f32]) -> Vec<f32> {
        vec![0.0; self.action_space.dim()]
    }
}

// ============================================================================
// Random
// ============================================================================

/// Uniform actions within the box bounds.
pub struct RandomPolicy {
    action_space: Space,
    rng: Xoshiro256StarStar,
}

impl RandomPolicy {
    pub fn new(action_space: Space, seed: u64) -> Self {
        Self {
            action_space,
            rng: rng_stream(seed, POLICY_STREAM),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        ControllerKind::Random.name()
    }

    fn act(&mut self, _obs: &[f32]) -> Vec<f32> {
        match self.action_space.bounds() {
            Some((low, high)) => low
                .iter()
                .zip(high.iter())
                .map(|(&lo, &hi)| lo + self.rng.gen::<f32>() * (hi - lo))
                .collect(),
            None => vec![0.0; self.action_space.dim()],
        }
    }
}

// ============================================================================
// PD with energy swing-up
// ============================================================================

/// Swing-up by energy pumping, then PD balance around upright.
///
/// Uses the nominal pendulum model `θ̈ = 3g/(2l)·sin θ + 3/(ml²)·u` with
/// `m = l = 1`, so the upright energy is `3g/2`.
pub struct PdPolicy {
    action_space: Space,
    /// Proportional gain on the angle
    pub kp: f32,
    /// Derivative gain on the angular velocity
    pub kd: f32,
    /// Gain on the energy error during swing-up
    pub ke: f32,
    /// Switch to balancing when `cos θ` exceeds this
    pub balance_cos: f32,
}

impl PdPolicy {
    pub fn new(action_space: Space) -> Self {
        Self {
            action_space,
            kp: 10.0,
            kd: 2.0,
            ke: 0.5,
            balance_cos: 0.95,
        }
    }

    fn energy(theta: f32, theta_dot: f32) -> f32 {
        0.5 * theta_dot * theta_dot + 1.5 * G * theta.cos()
    }
}

impl Policy for PdPolicy {
    fn name(&self) -> &'static str {
        ControllerKind::Pd.name()
    }

    fn act(&mut self, obs: &[f32]) -> Vec<f32> {
        let (theta, theta_dot) = angle(obs);

        let torque = if theta.cos() > self.balance_cos {
            -(self.kp * theta + self.kd * theta_dot)
        } else {
            let target = Self::energy(0.0, 0.0);
            // One-step lookahead on θ̇.
            let theta_dot_next = theta_dot + 1.5 * G * theta.sin() * DT;
            let energy_error = target - Self::energy(theta, theta_dot);
            self.ke * energy_error * theta_dot_next.signum() * max_abs(&self.action_space)
        };

        self.action_space.clip(&vec![torque; self.action_space.dim()])
    }
}

// ============================================================================
// Bang-bang
// ============================================================================

/// Maximum torque in the direction of the angular velocity.
pub struct BangBangPolicy {
    action_space: Space,
}

impl Policy for BangBangPolicy {
    fn name(&self) -> &'static str {
        ControllerKind::BangBang.name()
    }

    fn act(&mut self, obs: &[f32]) -> Vec<f32> {
        let (_, theta_dot) = angle(obs);
        let torque = theta_dot.signum() * max_abs(&self.action_space);
        self.action_space.clip(&vec![torque; self.action_space.dim()])
    }
}
