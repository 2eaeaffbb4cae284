//! Side-by-side actuator signals of several controllers on one trajectory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bioprosthetic_env::{compute_jerk, make_env, EnvConfig};
use prosthetic_core::{Env, ResetOptions};
use tracing::info;

use crate::config::{ControllerKind, ExperimentConfig};
use crate::policy::make_policy;

/// First action component of each controller at every step.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalTrace {
    pub controllers: Vec<ControllerKind>,
    /// `actions[step][controller]`
    pub actions: Vec<Vec<f32>>,
}

impl SignalTrace {
    /// Summed jerk of one controller's signal, starting from zero.
    pub fn total_jerk(&self, column: usize) -> f32 {
        let mut prev = 0.0;
        let mut total = 0.0;
        for row in &self.actions {
            total += compute_jerk(&[row[column]], &[prev]);
            prev = row[column];
        }
        total
    }
}

/// Feed every controller the observations produced by the lead controller.
///
/// The environment is unshaped (jerk weight 0) and reset with
/// `config.signal_seed`.
pub fn record_signals(config: &ExperimentConfig) -> Result<SignalTrace> {
    config.validate()?;

    let mut controllers = config.controllers.clone();
    if !controllers.contains(&config.lead_controller) {
        controllers.push(config.lead_controller);
    }
    let lead = controllers
        .iter()
        .position(|&c| c == config.lead_controller)
        .unwrap_or_default();

    let mut env = make_env(
        &EnvConfig::new()
            .with_jerk_weight(0.0)
            .with_randomization(config.randomize_patient)
            .with_seed(config.signal_seed),
    )?;
    let action_space = env.action_space();
    let mut policies: Vec<_> = controllers
        .iter()
        .map(|&c| make_policy(c, action_space.clone(), config.signal_seed))
        .collect();

    let (mut obs, _) = env.reset(&ResetOptions::new().with_seed(config.signal_seed))?;
    let mut actions = Vec::with_capacity(config.signal_steps);
    for _ in 0..config.signal_steps {
        let step_actions: Vec<Vec<f32>> = policies.iter_mut().map(|p| p.act(&obs)).collect();
        actions.push(step_actions.iter().map(|a| a[0]).collect());

        let t = env.step(&step_actions[lead])?;
        let done = t.done();
        obs = t.observation;
        if done {
            break;
        }
    }

    Ok(SignalTrace {
        controllers,
        actions,
    })
}

/// Write a trace as `step,<controller>,...` CSV into the log directory.
pub fn write_signals(config: &ExperimentConfig, trace: &SignalTrace) -> Result<PathBuf> {
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create log dir {}", config.log_dir.display()))?;
    let path = config.log_dir.join("signals.csv");
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let names: Vec<&str> = trace.controllers.iter().map(|c| c.name()).collect();
    writeln!(writer, "step,{}", names.join(","))?;
    for (step, row) in trace.actions.iter().enumerate() {
        let values: Vec<String> = row.iter().map(|v| format!("{:.6}", v)).collect();
        writeln!(writer, "{},{}", step, values.join(","))?;
    }
    writer.flush()?;

    for (i, controller) in trace.controllers.iter().enumerate() {
        info!(controller = %controller, total_jerk = trace.total_jerk(i), "signal recorded");
    }
    Ok(path)
}
