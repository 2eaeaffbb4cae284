//! Behavioral tests for the bio-prosthetic environment stack.
//!
//! ## Organization
//!
//! - `fixtures`: Scripted environments with known rewards
//! - `wrapper_tests`: Construction, reset and step contract of the wrapper
//! - `jerk_property_tests`: Property tests for the jerk penalty
//! - `randomization_tests`: Patient parameter randomization
//! - `monitor_tests`: Episode statistics and CSV output
//! - `integration_tests`: Full pendulum stack scenarios

pub mod monitor_tests;
