//! Seed x controller sweeps over the monitored, wrapped pendulum.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bioprosthetic_env::{make_monitored_env, EnvConfig, MonitoredBioEnv, NormalActionNoise};
use prosthetic_core::DummyVecEnv;
use tracing::info;

use crate::config::{ControllerKind, ExperimentConfig};
use crate::policy::make_policy;

/// Which sweep is being run; decides the jerk weight and log prefix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunKind {
    /// Configured jerk weight, logs `<controller>_seed_<seed>`
    Train,
    /// Zero jerk weight, logs `<controller>_raw_seed_<seed>`
    Ablation,
}

impl RunKind {
    fn jerk_weight(&self, config: &ExperimentConfig) -> f32 {
        match self {
            Self::Train => config.jerk_weight,
            Self::Ablation => 0.0,
        }
    }

    fn prefix(&self, controller: ControllerKind) -> String {
        match self {
            Self::Train => controller.name().to_string(),
            Self::Ablation => format!("{}_raw", controller.name()),
        }
    }
}

/// Aggregate result of one (controller, seed) run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub controller: ControllerKind,
    pub seed: u64,
    pub episodes: usize,
    pub total_steps: u64,
    /// Mean shaped reward per finished episode
    pub mean_reward: f32,
    /// Mean summed jerk per finished episode
    pub mean_jerk: f32,
    pub log_path: PathBuf,
}

/// Run every configured controller for every seed.
pub fn run_sweep(config: &ExperimentConfig, kind: RunKind) -> Result<Vec<RunSummary>> {
    config.validate()?;
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create log dir {}", config.log_dir.display()))?;

    let mut summaries = Vec::new();
    for seed in 0..config.n_seeds {
        info!("--- Run {}/{} ---", seed + 1, config.n_seeds);
        for &controller in &config.controllers {
            let summary = run_single(config, kind, controller, seed)?;
            info!(
                controller = %summary.controller,
                seed = summary.seed,
                episodes = summary.episodes,
                steps = summary.total_steps,
                mean_reward = summary.mean_reward,
                mean_jerk = summary.mean_jerk,
                log = %summary.log_path.display(),
                "run finished"
            );
            summaries.push(summary);
        }
    }
    Ok(summaries)
}

/// Step one controller through `config.timesteps` environment steps.
pub fn run_single(
    config: &ExperimentConfig,
    kind: RunKind,
    controller: ControllerKind,
    seed: u64,
) -> Result<RunSummary> {
    let env_config = EnvConfig::new()
        .with_jerk_weight(kind.jerk_weight(config))
        .with_randomization(config.randomize_patient)
        .with_seed(seed);
    let log_base = config
        .log_dir
        .join(format!("{}_seed_{}", kind.prefix(controller), seed));

    let env = make_monitored_env(&env_config, Some(log_base.as_path()))
        .with_context(|| format!("failed to build env for {} seed {}", controller, seed))?;
    let mut vec_env: DummyVecEnv<MonitoredBioEnv> = DummyVecEnv::new(vec![env])?;

    let action_space = vec_env.action_space();
    let mut policy = make_policy(controller, action_space.clone(), seed);
    let mut noise = NormalActionNoise::isotropic(vec_env.action_dim(), config.noise_sigma, seed)?;

    vec_env.reset_all(seed)?;
    for _ in 0..config.timesteps {
        let mut action = policy.act(vec_env.observation(0));
        for (a, n) in action.iter_mut().zip(noise.sample()) {
            *a += n;
        }
        let action = action_space.clip(&action);

        let result = vec_env.step(&action)?;
        let mask = result.to_reset_mask();
        if mask.any() {
            vec_env.reset_envs(&mask, None)?;
        }
    }

    let monitor = vec_env.env_mut(0);
    monitor.flush();
    let episodes = monitor.episodes();

    Ok(RunSummary {
        controller,
        seed,
        episodes: episodes.len(),
        total_steps: monitor.total_steps(),
        mean_reward: mean(episodes.iter().map(|e| e.reward)),
        mean_jerk: mean(episodes.iter().map(|e| e.jerk)),
        log_path: monitor.path().map(|p| p.to_path_buf()).unwrap_or(log_base),
    })
}

fn mean(values: impl ExactSizeIterator<Item = f32>) -> f32 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f32>() / n as f32
}
