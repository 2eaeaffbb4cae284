//! Actuator smoothness penalty ("jerk").
//!
//! `jerk = Σᵢ (actionᵢ - last_actionᵢ)²`
//!
//! `shaped_reward = raw_reward - weight * jerk`

/// Info key under which the wrapper reports the jerk of each step.
pub const JERK_INFO_KEY: &str = "jerk";

/// Sum of squared differences between the current and previous action.
///
/// Both slices must have the same length.
#[inline]
pub fn compute_jerk(action: &[f32], last_action: &[f32]) -> f32 {
    debug_assert_eq!(action.len(), last_action.len());
    action
        .iter()
        .zip(last_action.iter())
        .map(|(&a, &prev)| {
            let diff = a - prev;
            diff * diff
        })
        .sum()
}

/// Weighted jerk penalty applied to the raw reward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JerkPenalty {
    /// Weight for the jerk penalty (0.0 disables shaping)
    pub weight: f32,
}

impl JerkPenalty {
    /// Create a penalty with the given weight.
    pub const fn new(weight: f32) -> Self {
        Self { weight }
    }

    /// Amount subtracted from the raw reward for a given jerk.
    #[inline]
    pub fn penalty(&self, jerk: f32) -> f32 {
        if self.weight == 0.0 {
            return 0.0;
        }
        self.weight * jerk
    }

    /// Shaped reward for a given raw reward and jerk.
    #[inline]
    pub fn shape(&self, raw_reward: f32, jerk: f32) -> f32 {
        raw_reward - self.penalty(jerk)
    }
}
