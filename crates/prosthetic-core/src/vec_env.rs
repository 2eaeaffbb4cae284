//! Sequential batches of independent environments.
//!
//! Each member owns its own environment instance; nothing is shared between
//! members. Stepping does NOT auto-reset: callers build a [`ResetMask`] from
//! the step result and reset finished members explicitly.

use crate::env::{Env, Info, ResetOptions, Space};
use crate::error::{EnvError, Result};

// ============================================================================
// VecStepResult
// ============================================================================

/// Result from stepping every member of a [`DummyVecEnv`].
#[derive(Debug, Clone)]
pub struct VecStepResult {
    /// Observations after step [n_envs * obs_size] (flattened)
    pub observations: Vec<f32>,
    /// Rewards received [n_envs]
    pub rewards: Vec<f32>,
    /// Terminal flags [n_envs]
    pub terminals: Vec<bool>,
    /// Truncation flags [n_envs]
    pub truncations: Vec<bool>,
    /// Per-member info records [n_envs]
    pub infos: Vec<Info>,
}

impl VecStepResult {
    /// Get done flags (terminal OR truncated).
    pub fn dones(&self) -> Vec<bool> {
        self.terminals
            .iter()
            .zip(self.truncations.iter())
            .map(|(&t, &tr)| t || tr)
            .collect()
    }

    /// Create a reset mask covering every finished member.
    pub fn to_reset_mask(&self) -> ResetMask {
        ResetMask::from_done_flags(&self.terminals, &self.truncations)
    }
}

// ============================================================================
// ResetMask - bitmask for selective reset
// ============================================================================

/// Bitmask for selective environment reset.
///
/// Each bit represents one member (1 = reset, 0 = keep), packed 64 per chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetMask {
    chunks: Vec<u64>,
    num_envs: usize,
}

impl ResetMask {
    /// Create an empty mask (no members to reset).
    pub fn new(num_envs: usize) -> Self {
        Self {
            chunks: vec![0u64; num_envs.div_ceil(64)],
            num_envs,
        }
    }

    /// Create mask from terminal/truncation flags.
    pub fn from_done_flags(terminals: &[bool], truncations: &[bool]) -> Self {
        debug_assert_eq!(terminals.len(), truncations.len());
        let mut mask = Self::new(terminals.len());
        for (i, (&t, &tr)) in terminals.iter().zip(truncations.iter()).enumerate() {
            if t || tr {
                mask.set(i);
            }
        }
        mask
    }

    /// Check if any member needs reset.
    #[inline]
    pub fn any(&self) -> bool {
        self.chunks.iter().any(|&c| c != 0)
    }

    /// Count how many members need reset.
    pub fn count(&self) -> usize {
        self.chunks.iter().map(|c| c.count_ones() as usize).sum()
    }

    /// Number of members this mask covers.
    #[inline]
    pub fn num_envs(&self) -> usize {
        self.num_envs
    }

    /// Mark a member for reset.
    #[inline]
    pub fn set(&mut self, env_idx: usize) {
        debug_assert!(env_idx < self.num_envs);
        self.chunks[env_idx / 64] |= 1u64 << (env_idx % 64);
    }

    /// Clear a member from reset.
    #[inline]
    pub fn clear(&mut self, env_idx: usize) {
        debug_assert!(env_idx < self.num_envs);
        self.chunks[env_idx / 64] &= !(1u64 << (env_idx % 64));
    }

    /// Check if a member is marked for reset.
    #[inline]
    pub fn is_set(&self, env_idx: usize) -> bool {
        debug_assert!(env_idx < self.num_envs);
        (self.chunks[env_idx / 64] >> (env_idx % 64)) & 1 != 0
    }

    /// Iterate over member indices that need reset, in O(k) for k set bits.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        self.chunks.iter().enumerate().flat_map(|(chunk_idx, &chunk)| {
            let base = chunk_idx * 64;
            BitIter { remaining: chunk }.map(move |bit| base + bit)
        })
    }
}

struct BitIter {
    remaining: u64,
}

impl Iterator for BitIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let bit = self.remaining.trailing_zeros() as usize;
        self.remaining &= self.remaining - 1; // clear lowest set bit
        Some(bit)
    }
}

// ============================================================================
// DummyVecEnv
// ============================================================================

/// Sequential container of independent environments.
///
/// All members must share the same observation and action dimensions.
pub struct DummyVecEnv<E: Env> {
    envs: Vec<E>,
    obs_size: usize,
    action_dim: usize,
    observations: Vec<f32>,
}

impl<E: Env> DummyVecEnv<E> {
    /// Build from already-constructed members.
    pub fn new(envs: Vec<E>) -> Result<Self> {
        let first = envs.first().ok_or_else(|| {
            EnvError::invalid_config("envs", "must contain at least 1 environment")
        })?;
        let obs_size = first.observation_space().dim();
        let action_dim = first.action_space().dim();

        for (i, env) in envs.iter().enumerate() {
            if env.observation_space().dim() != obs_size || env.action_space().dim() != action_dim {
                return Err(EnvError::invalid_config(
                    "envs",
                    format!("member {i} has mismatched observation/action dimensions"),
                ));
            }
        }

        Ok(Self {
            observations: vec![0.0; envs.len() * obs_size],
            envs,
            obs_size,
            action_dim,
        })
    }

    /// Build `n_envs` members from a factory called with each member index.
    pub fn from_fn(n_envs: usize, mut make_env: impl FnMut(usize) -> Result<E>) -> Result<Self> {
        let envs = (0..n_envs).map(&mut make_env).collect::<Result<Vec<_>>>()?;
        Self::new(envs)
    }

    /// Number of members.
    pub fn n_envs(&self) -> usize {
        self.envs.len()
    }

    /// Observation size of a single member.
    pub fn obs_size(&self) -> usize {
        self.obs_size
    }

    /// Action dimension of a single member.
    pub fn action_dim(&self) -> usize {
        self.action_dim
    }

    /// Action space shared by all members.
    pub fn action_space(&self) -> Space {
        self.envs[0].action_space()
    }

    /// Latest observations, flattened [env0_obs, env1_obs, ...].
    pub fn observations(&self) -> &[f32] {
        &self.observations
    }

    /// Latest observation of a single member.
    pub fn observation(&self, env_idx: usize) -> &[f32] {
        let start = env_idx * self.obs_size;
        &self.observations[start..start + self.obs_size]
    }

    /// Borrow a member.
    pub fn env(&self, env_idx: usize) -> &E {
        &self.envs[env_idx]
    }

    /// Mutably borrow a member.
    pub fn env_mut(&mut self, env_idx: usize) -> &mut E {
        &mut self.envs[env_idx]
    }

    /// Consume the container and return its members.
    pub fn into_inner(self) -> Vec<E> {
        self.envs
    }

    /// Reset every member; member `i` is seeded with `seed + i`.
    pub fn reset_all(&mut self, seed: u64) -> Result<()> {
        for idx in 0..self.envs.len() {
            self.reset_single(idx, Some(seed.wrapping_add(idx as u64)))?;
        }
        Ok(())
    }

    /// Reset only the members marked in `mask`.
    ///
    /// With a seed, member `i` is seeded with `seed + i`; without one each
    /// member continues its own RNG stream.
    pub fn reset_envs(&mut self, mask: &ResetMask, seed: Option<u64>) -> Result<()> {
        if mask.num_envs() != self.envs.len() {
            return Err(EnvError::invalid_config(
                "mask",
                format!("covers {} envs, container has {}", mask.num_envs(), self.envs.len()),
            ));
        }
        for idx in mask.iter_set() {
            self.reset_single(idx, seed.map(|s| s.wrapping_add(idx as u64)))?;
        }
        Ok(())
    }

    fn reset_single(&mut self, idx: usize, seed: Option<u64>) -> Result<()> {
        let options = ResetOptions { seed };
        let (obs, _info) = self.envs[idx].reset(&options)?;
        let start = idx * self.obs_size;
        self.observations[start..start + self.obs_size].copy_from_slice(&obs);
        Ok(())
    }

    /// Step every member with its slice of the flat action buffer.
    ///
    /// `actions` is laid out as [env0_action, env1_action, ...].
    pub fn step(&mut self, actions: &[f32]) -> Result<VecStepResult> {
        let expected = self.envs.len() * self.action_dim;
        if actions.len() != expected {
            return Err(EnvError::ActionDimensionMismatch {
                expected,
                actual: actions.len(),
            });
        }

        let n = self.envs.len();
        let mut rewards = Vec::with_capacity(n);
        let mut terminals = Vec::with_capacity(n);
        let mut truncations = Vec::with_capacity(n);
        let mut infos = Vec::with_capacity(n);

        for (idx, env) in self.envs.iter_mut().enumerate() {
            let action = &actions[idx * self.action_dim..(idx + 1) * self.action_dim];
            let t = env.step(action)?;

            let start = idx * self.obs_size;
            self.observations[start..start + self.obs_size].copy_from_slice(&t.observation);
            rewards.push(t.reward);
            terminals.push(t.terminated);
            truncations.push(t.truncated);
            infos.push(t.info);
        }

        Ok(VecStepResult {
            observations: self.observations.clone(),
            rewards,
            terminals,
            truncations,
            infos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Transition;

    /// Counts steps; finishes after `horizon` steps.
    struct CountingEnv {
        horizon: u32,
        ticks: u32,
        last_seed: Option<u64>,
    }

    impl CountingEnv {
        fn new(horizon: u32) -> Self {
            Self {
                horizon,
                ticks: 0,
                last_seed: None,
            }
        }
    }

    impl Env for CountingEnv {
        fn observation_space(&self) -> Space {
            Space::uniform_box(0.0, f32::MAX, 1)
        }

        fn action_space(&self) -> Space {
            Space::uniform_box(-1.0, 1.0, 2)
        }

        fn reset(&mut self, options: &ResetOptions) -> Result<(Vec<f32>, Info)> {
            self.ticks = 0;
            self.last_seed = options.seed;
            Ok((vec![0.0], Info::new()))
        }

        fn step(&mut self, action: &[f32]) -> Result<Transition> {
            self.ticks += 1;
            Ok(Transition {
                observation: vec![self.ticks as f32],
                reward: action.iter().sum(),
                terminated: false,
                truncated: self.ticks >= self.horizon,
                info: Info::new(),
            })
        }
    }

    #[test]
    fn test_reset_mask_bits() {
        let mut mask = ResetMask::new(130);
        assert!(!mask.any());
        mask.set(0);
        mask.set(64);
        mask.set(129);
        assert_eq!(mask.count(), 3);
        assert!(mask.is_set(64));
        mask.clear(64);
        assert!(!mask.is_set(64));
        assert_eq!(mask.iter_set().collect::<Vec<_>>(), vec![0, 129]);
    }

    #[test]
    fn test_reset_mask_from_flags() {
        let mask = ResetMask::from_done_flags(&[true, false, false], &[false, false, true]);
        assert_eq!(mask.iter_set().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_empty_vec_env_rejected() {
        let result = DummyVecEnv::<CountingEnv>::new(Vec::new());
        assert!(matches!(result, Err(EnvError::InvalidConfig { .. })));
    }

    #[test]
    fn test_reset_all_seeds_each_member() {
        let mut vec_env = DummyVecEnv::from_fn(3, |_| Ok(CountingEnv::new(5))).unwrap();
        vec_env.reset_all(10).unwrap();
        let seeds: Vec<_> = (0..3).map(|i| vec_env.env(i).last_seed).collect();
        assert_eq!(seeds, vec![Some(10), Some(11), Some(12)]);
    }

    #[test]
    fn test_step_slices_actions_per_member() {
        let mut vec_env = DummyVecEnv::from_fn(2, |_| Ok(CountingEnv::new(5))).unwrap();
        vec_env.reset_all(0).unwrap();
        let result = vec_env.step(&[1.0, 2.0, -1.0, 0.5]).unwrap();
        assert_eq!(result.rewards, vec![3.0, -0.5]);
        assert_eq!(result.observations, vec![1.0, 1.0]);
        assert_eq!(vec_env.observation(1), &[1.0]);
    }

    #[test]
    fn test_step_wrong_action_length() {
        let mut vec_env = DummyVecEnv::from_fn(2, |_| Ok(CountingEnv::new(5))).unwrap();
        let err = vec_env.step(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            EnvError::ActionDimensionMismatch {
                expected: 4,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_reset_envs_only_touches_masked_members() {
        let mut vec_env = DummyVecEnv::new(vec![CountingEnv::new(1), CountingEnv::new(3)]).unwrap();
        vec_env.reset_all(0).unwrap();

        let result = vec_env.step(&[0.0; 4]).unwrap();
        assert_eq!(result.dones(), vec![true, false]);

        let mask = result.to_reset_mask();
        vec_env.reset_envs(&mask, Some(100)).unwrap();

        assert_eq!(vec_env.env(0).ticks, 0);
        assert_eq!(vec_env.env(0).last_seed, Some(100));
        assert_eq!(vec_env.env(1).ticks, 1);
        assert_eq!(vec_env.env(1).last_seed, Some(1));
        assert_eq!(vec_env.observation(0), &[0.0]);
    }

    #[test]
    fn test_reset_envs_without_seed() {
        let mut vec_env = DummyVecEnv::from_fn(2, |_| Ok(CountingEnv::new(1))).unwrap();
        vec_env.reset_all(0).unwrap();
        vec_env.step(&[0.0; 4]).unwrap();

        let mut mask = ResetMask::new(2);
        mask.set(0);
        vec_env.reset_envs(&mask, None).unwrap();
        assert_eq!(vec_env.env(0).last_seed, None);
        assert_eq!(vec_env.env(1).last_seed, Some(1));
    }

    #[test]
    fn test_reset_envs_rejects_wrong_mask_size() {
        let mut vec_env = DummyVecEnv::from_fn(2, |_| Ok(CountingEnv::new(1))).unwrap();
        assert!(vec_env.reset_envs(&ResetMask::new(3), None).is_err());
    }
}
