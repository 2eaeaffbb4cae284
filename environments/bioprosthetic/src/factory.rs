//! Construction of the standard wrapped pendulum stack.

use std::path::Path;

use prosthetic_core::Result;
use prosthetic_envs::Pendulum;

use crate::config::EnvConfig;
use crate::monitor::Monitor;
use crate::wrapper::BioProstheticWrapper;

/// Pendulum with jerk penalty and optional patient randomization.
pub type BioEnv = BioProstheticWrapper<Pendulum>;

/// [`BioEnv`] with per-episode statistics.
pub type MonitoredBioEnv = Monitor<BioEnv>;

/// Build the wrapped pendulum described by `config`.
pub fn make_env(config: &EnvConfig) -> Result<BioEnv> {
    config.validate()?;
    let pendulum = Pendulum::from_config(config.pendulum.clone())?;
    BioProstheticWrapper::from_config(pendulum, config.wrapper.clone())
}

/// Build the wrapped pendulum inside a [`Monitor`].
///
/// With `log_path` set, finished episodes are appended to
/// `<log_path>.monitor.csv`.
pub fn make_monitored_env(config: &EnvConfig, log_path: Option<&Path>) -> Result<MonitoredBioEnv> {
    let env = make_env(config)?;
    match log_path {
        Some(path) => Monitor::with_file(env, config.env_id.clone(), path),
        None => Ok(Monitor::new(env, config.env_id.clone())),
    }
}
