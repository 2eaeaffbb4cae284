//! Bio-prosthetic pendulum experiments.
//!
//! ```bash
//! # Jerk-penalized sweep (seeds x controllers)
//! cargo run --release -p experiments -- train --seeds 5 --timesteps 80000
//!
//! # Same sweep without the penalty, logged as <controller>_raw_seed_<n>
//! cargo run --release -p experiments -- ablation
//!
//! # First 100 actuator commands of each controller on one trajectory
//! cargo run --release -p experiments -- signals
//! ```

mod config;
mod policy;
mod runner;
mod signals;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{ControllerKind, ExperimentConfig};
use runner::{run_sweep, RunKind};

#[derive(Debug, Parser)]
#[command(
    name = "bioprosthetic",
    about = "Jerk-penalized pendulum experiments with scripted controllers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every controller for every seed with the jerk penalty.
    Train,
    /// Run the same sweep with the jerk penalty disabled.
    Ablation,
    /// Record the actuator signals of all controllers on one episode.
    Signals {
        /// Number of steps to record.
        #[arg(long)]
        steps: Option<usize>,
    },
}

/// Flags that override values from the config file.
#[derive(Debug, Args)]
struct Overrides {
    /// JSON experiment config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for monitor and signal logs.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Number of seeds.
    #[arg(long, global = true)]
    seeds: Option<u64>,

    /// Environment steps per run.
    #[arg(long, global = true)]
    timesteps: Option<u64>,

    /// Jerk penalty weight.
    #[arg(long, global = true)]
    jerk_weight: Option<f32>,

    /// Randomize patient mass and length every episode.
    #[arg(long, global = true)]
    randomize: bool,

    /// Controllers to run.
    #[arg(long, global = true, value_enum, value_delimiter = ',')]
    controllers: Option<Vec<ControllerKind>>,
}

impl Overrides {
    fn resolve(self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::load(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(log_dir) = self.log_dir {
            config.log_dir = log_dir;
        }
        if let Some(seeds) = self.seeds {
            config.n_seeds = seeds;
        }
        if let Some(timesteps) = self.timesteps {
            config.timesteps = timesteps;
        }
        if let Some(weight) = self.jerk_weight {
            config.jerk_weight = weight;
        }
        if self.randomize {
            config.randomize_patient = true;
        }
        if let Some(controllers) = self.controllers {
            config.controllers = controllers;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = cli.overrides.resolve()?;
    config.validate()?;

    match cli.command {
        Command::Train => sweep(&config, RunKind::Train)?,
        Command::Ablation => sweep(&config, RunKind::Ablation)?,
        Command::Signals { steps } => {
            if let Some(steps) = steps {
                config.signal_steps = steps;
            }
            let trace = signals::record_signals(&config)?;
            let path = signals::write_signals(&config, &trace)?;
            info!(path = %path.display(), steps = trace.actions.len(), "signals written");
        }
    }

    Ok(())
}

fn sweep(config: &ExperimentConfig, kind: RunKind) -> Result<()> {
    info!(
        ?kind,
        seeds = config.n_seeds,
        timesteps = config.timesteps,
        jerk_weight = config.jerk_weight,
        randomize = config.randomize_patient,
        "starting sweep"
    );
    let summaries = run_sweep(config, kind)?;
    info!(
        runs = summaries.len(),
        log_dir = %config.log_dir.display(),
        "sweep complete"
    );
    Ok(())
}
