//! Bio-Prosthetic Pendulum Environment
//!
//! Wraps the classic pendulum so it behaves like a prosthetic joint driven by
//! a motor whose commands should change smoothly.
//!
//! # Features
//!
//! - **Jerk Penalty**: Squared change between consecutive actions, weighted
//!   and subtracted from the raw reward; reported as `info["jerk"]`
//! - **Patient Randomization**: Mass and length redrawn from ±20% of nominal
//!   on every reset
//! - **Episode Monitor**: Per-episode reward/length/time/jerk CSV logs
//! - **Action Noise**: Gaussian exploration noise for scripted controllers
//!
//! # Example
//!
//! ```rust,ignore
//! use bioprosthetic_env::{make_env, EnvConfig};
//! use prosthetic_core::{Env, ResetOptions};
//!
//! let mut env = make_env(&EnvConfig::new().with_jerk_weight(0.1))?;
//! let (obs, _info) = env.reset(&ResetOptions::new().with_seed(42))?;
//! let t = env.step(&[0.5])?;
//! println!("shaped reward {} jerk {:?}", t.reward, t.info.get("jerk"));
//! ```

pub mod config;
pub mod factory;
pub mod jerk;
pub mod monitor;
pub mod noise;
pub mod patient;
pub mod wrapper;

#[cfg(test)]
pub mod tests;

pub use config::{EnvConfig, WrapperConfig, DEFAULT_JERK_WEIGHT, PATIENT_PARAM_RANGE};
pub use factory::{make_env, make_monitored_env, BioEnv, MonitoredBioEnv};
pub use jerk::{compute_jerk, JerkPenalty, JERK_INFO_KEY};
pub use monitor::{EpisodeRecord, Monitor};
pub use noise::NormalActionNoise;
pub use patient::{PatientParams, PatientRandomizer, PhysicalParams};
pub use wrapper::BioProstheticWrapper;
