//! Prosthetic Core - environment contract for smoothness-constrained control.
//!
//! This crate provides the single-instance abstractions shared by every
//! environment and wrapper in the workspace:
//!
//! - [`Env`] - Gymnasium-style `reset`/`step` trait
//! - [`Space`] - Action and observation space descriptions
//! - [`Transition`] - Result of a single step
//! - [`Info`] - Per-step auxiliary metrics (e.g. `jerk`)
//! - [`PhysicalParams`] - Mutable mass/length of the simulated limb
//! - [`DummyVecEnv`] / [`ResetMask`] - Sequential batches of independent envs

pub mod env;
pub mod error;
pub mod params;
pub mod vec_env;

pub use env::{Env, Info, ResetOptions, Space, Transition};
pub use error::{EnvError, Result};
pub use params::{PatientParams, PhysicalParams};
pub use vec_env::{DummyVecEnv, ResetMask, VecStepResult};
