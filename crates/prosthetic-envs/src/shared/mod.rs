//! Shared utilities for environment implementations.

pub mod rng;
