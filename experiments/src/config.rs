//! Experiment configuration, loadable from JSON and overridable from the CLI.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use bioprosthetic_env::DEFAULT_JERK_WEIGHT;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Scripted controller used in place of a learned policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    /// Always zero torque
    Zero,
    /// Uniform torque within the action bounds
    Random,
    /// Energy-pumping swing-up with PD balance near upright
    Pd,
    /// Maximum torque in the direction of motion
    #[value(name = "bang_bang")]
    BangBang,
}

impl ControllerKind {
    /// Name used in log file prefixes and CSV columns.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Random => "random",
            Self::Pd => "pd",
            Self::BangBang => "bang_bang",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings shared by all subcommands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Environment steps per (seed, controller) run
    pub timesteps: u64,
    /// Number of seeds, run as `0..n_seeds`
    pub n_seeds: u64,
    /// Jerk penalty weight for `train`
    pub jerk_weight: f32,
    /// Redraw patient mass and length every episode
    pub randomize_patient: bool,
    /// Standard deviation of Gaussian action noise
    pub noise_sigma: f32,
    /// Controllers evaluated by `train` and `ablation`
    pub controllers: Vec<ControllerKind>,
    /// Output directory for monitor and signal files
    pub log_dir: PathBuf,
    /// Episode length for `signals`
    pub signal_steps: usize,
    /// Reset seed for `signals`
    pub signal_seed: u64,
    /// Controller whose actions advance the environment in `signals`
    pub lead_controller: ControllerKind,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            timesteps: 80_000,
            n_seeds: 5,
            jerk_weight: DEFAULT_JERK_WEIGHT,
            randomize_patient: false,
            noise_sigma: 0.1,
            controllers: vec![ControllerKind::Pd, ControllerKind::BangBang],
            log_dir: PathBuf::from("logs"),
            signal_steps: 100,
            signal_seed: 42,
            lead_controller: ControllerKind::Pd,
        }
    }
}

impl ExperimentConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.timesteps == 0 {
            bail!("timesteps must be > 0");
        }
        if self.n_seeds == 0 {
            bail!("n_seeds must be > 0");
        }
        if !(self.jerk_weight.is_finite() && self.jerk_weight >= 0.0) {
            bail!("jerk_weight must be non-negative, got {}", self.jerk_weight);
        }
        if !(self.noise_sigma.is_finite() && self.noise_sigma >= 0.0) {
            bail!("noise_sigma must be non-negative, got {}", self.noise_sigma);
        }
        if self.controllers.is_empty() {
            bail!("at least one controller is required");
        }
        if self.signal_steps == 0 {
            bail!("signal_steps must be > 0");
        }
        Ok(())
    }
}
