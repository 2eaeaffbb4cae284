//! Prosthetic Environments - classic control simulators for the bio-prosthetic workspace.
//!
//! This crate provides Gymnasium-compatible, single-instance environments
//! whose physical constants can be rewritten between episodes through
//! [`prosthetic_core::PhysicalParams`].

pub mod gymnasium;
pub mod shared;

pub use gymnasium::{Pendulum, PendulumConfig};
