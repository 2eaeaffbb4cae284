//! Environment trait for single-instance continuous control.
//!
//! This module provides:
//! - [`Env`] trait mirroring the Gymnasium `reset`/`step` contract
//! - [`Space`] for describing action and observation spaces
//! - [`Transition`] for the result of one step
//! - [`Info`] for auxiliary per-step metrics
//! - [`ResetOptions`] for seeding resets

use std::collections::BTreeMap;

use crate::error::Result;

// ============================================================================
// Space
// ============================================================================

/// Description of an action or observation space.
#[derive(Debug, Clone, PartialEq)]
pub enum Space {
    /// Fixed-size numeric vector with per-component bounds.
    Box {
        /// Lower bound per component
        low: Vec<f32>,
        /// Upper bound per component
        high: Vec<f32>,
    },
    /// Finite set of `n` actions `{0, ..., n - 1}`.
    Discrete(usize),
}

impl Space {
    /// Box space with the same bounds on every component.
    pub fn uniform_box(low: f32, high: f32, dim: usize) -> Self {
        Self::Box {
            low: vec![low; dim],
            high: vec![high; dim],
        }
    }

    /// Number of components in a sample from this space.
    ///
    /// Discrete spaces are sampled as a single index.
    pub fn dim(&self) -> usize {
        match self {
            Self::Box { low, .. } => low.len(),
            Self::Discrete(_) => 1,
        }
    }

    /// Returns true for non-empty box spaces.
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Box { low, high } if !low.is_empty() && low.len() == high.len())
    }

    /// Check whether a sample lies inside the space.
    pub fn contains(&self, sample: &[f32]) -> bool {
        match self {
            Self::Box { low, high } => {
                sample.len() == low.len()
                    && sample
                        .iter()
                        .zip(low.iter().zip(high.iter()))
                        .all(|(&x, (&lo, &hi))| x >= lo && x <= hi)
            }
            Self::Discrete(n) => {
                sample.len() == 1
                    && sample[0] >= 0.0
                    && (sample[0] as usize) < *n
                    && sample[0].fract() == 0.0
            }
        }
    }

    /// Clip a sample into the bounds of a box space.
    ///
    /// Discrete samples are returned unchanged.
    pub fn clip(&self, sample: &[f32]) -> Vec<f32> {
        match self {
            Self::Box { low, high } => sample
                .iter()
                .zip(low.iter().zip(high.iter()))
                .map(|(&x, (&lo, &hi))| x.clamp(lo, hi))
                .collect(),
            Self::Discrete(_) => sample.to_vec(),
        }
    }

    /// Bounds of a box space, `None` for discrete spaces.
    pub fn bounds(&self) -> Option<(&[f32], &[f32])> {
        match self {
            Self::Box { low, high } => Some((low, high)),
            Self::Discrete(_) => None,
        }
    }
}

// ============================================================================
// Info
// ============================================================================

/// Auxiliary per-step metrics keyed by name.
///
/// Consumed by the caller immediately after each step; wrappers may add keys
/// on the way out (the reward-shaping wrapper adds `jerk`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info(BTreeMap<String, f32>);

impl Info {
    /// Create an empty info record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value.
    pub fn insert(&mut self, key: impl Into<String>, value: f32) {
        self.0.insert(key.into(), value);
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<f32> {
        self.0.get(key).copied()
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, f32)> for Info {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ============================================================================
// Reset options and step results
// ============================================================================

/// Options forwarded verbatim through every wrapper to the innermost reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetOptions {
    /// Reseed the environment RNG before sampling the initial state.
    pub seed: Option<u64>,
}

impl ResetOptions {
    /// Reset without reseeding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reseed before sampling the initial state.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Observation after the step
    pub observation: Vec<f32>,
    /// Scalar reward for the step
    pub reward: f32,
    /// Episode ended due to goal/failure
    pub terminated: bool,
    /// Episode ended due to time limit
    pub truncated: bool,
    /// Auxiliary metrics
    pub info: Info,
}

impl Transition {
    /// Check if the episode ended (terminal or truncated).
    #[inline]
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

// ============================================================================
// Env trait
// ============================================================================

/// Single-instance environment with the Gymnasium reset/step contract.
///
/// Wrappers implement this trait by holding another `Env` by value and
/// forwarding calls, intercepting only what they change.
///
/// # Example
///
/// ```rust,ignore
/// use prosthetic_core::{Env, ResetOptions};
///
/// let (obs, _info) = env.reset(&ResetOptions::new().with_seed(42))?;
/// let t = env.step(&[0.5])?;
/// if t.done() {
///     env.reset(&ResetOptions::new())?;
/// }
/// ```
pub trait Env {
    /// Space of observations returned by `reset` and `step`.
    fn observation_space(&self) -> Space;

    /// Space of actions accepted by `step`.
    fn action_space(&self) -> Space;

    /// Start a new episode and return the initial observation.
    fn reset(&mut self, options: &ResetOptions) -> Result<(Vec<f32>, Info)>;

    /// Advance the episode by one action.
    fn step(&mut self, action: &[f32]) -> Result<Transition>;
}

impl<E: Env + ?Sized> Env for Box<E> {
    fn observation_space(&self) -> Space {
        (**self).observation_space()
    }

    fn action_space(&self) -> Space {
        (**self).action_space()
    }

    fn reset(&mut self, options: &ResetOptions) -> Result<(Vec<f32>, Info)> {
        (**self).reset(options)
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition> {
        (**self).step(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_space_dim_and_contains() {
        let space = Space::uniform_box(-2.0, 2.0, 1);
        assert_eq!(space.dim(), 1);
        assert!(space.is_vector());
        assert!(space.contains(&[1.5]));
        assert!(space.contains(&[-2.0]));
        assert!(!space.contains(&[2.5]));
        assert!(!space.contains(&[0.0, 0.0]));
    }

    #[test]
    fn test_discrete_space_is_not_vector() {
        let space = Space::Discrete(3);
        assert!(!space.is_vector());
        assert!(space.contains(&[2.0]));
        assert!(!space.contains(&[3.0]));
        assert!(!space.contains(&[0.5]));
        assert!(space.bounds().is_none());
    }

    #[test]
    fn test_empty_box_is_not_vector() {
        let space = Space::Box {
            low: vec![],
            high: vec![],
        };
        assert!(!space.is_vector());
    }

    #[test]
    fn test_clip() {
        let space = Space::Box {
            low: vec![-1.0, 0.0],
            high: vec![1.0, 5.0],
        };
        assert_eq!(space.clip(&[-3.0, 7.0]), vec![-1.0, 5.0]);
        assert_eq!(space.clip(&[0.5, 2.0]), vec![0.5, 2.0]);
    }

    #[test]
    fn test_info_roundtrip() {
        let mut info = Info::new();
        assert!(info.is_empty());
        info.insert("jerk", 0.25);
        info.insert("jerk", 0.5);
        assert_eq!(info.len(), 1);
        assert_eq!(info.get("jerk"), Some(0.5));
        assert!(info.contains_key("jerk"));
        assert_eq!(info.get("missing"), None);

        let collected: Info = [("a", 1.0), ("b", 2.0)].into_iter().collect();
        let keys: Vec<&str> = collected.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_transition_done() {
        let mut t = Transition {
            observation: vec![0.0],
            reward: 0.0,
            terminated: false,
            truncated: false,
            info: Info::new(),
        };
        assert!(!t.done());
        t.truncated = true;
        assert!(t.done());
    }

    #[test]
    fn test_reset_options_builder() {
        assert_eq!(ResetOptions::new().seed, None);
        assert_eq!(ResetOptions::new().with_seed(7).seed, Some(7));
    }
}
