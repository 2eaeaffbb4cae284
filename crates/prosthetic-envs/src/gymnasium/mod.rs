//! Gymnasium-compatible control environments.

pub mod pendulum;

pub use pendulum::{Pendulum, PendulumConfig};
