//! Episode monitor tests.
//!
//! These tests define:
//! - Per-episode reward, length and jerk accumulation
//! - Episode summary keys added to the final step's info
//! - CSV file layout (JSON header, column header, one row per episode)

use std::fs;

use super::fixtures::ScriptedEnv;
use crate::monitor::Monitor;
use crate::wrapper::BioProstheticWrapper;
use prosthetic_core::{Env, ResetOptions};

fn monitored(episode_len: u32) -> Monitor<BioProstheticWrapper<ScriptedEnv>> {
    let env = ScriptedEnv::new(1, -1.0).with_episode_len(episode_len);
    Monitor::new(BioProstheticWrapper::new(env, 0.1, false).unwrap(), "scripted")
}

fn run_episode<E: Env>(env: &mut E, actions: &[f32]) {
    env.reset(&ResetOptions::new()).unwrap();
    for &a in actions {
        env.step(&[a]).unwrap();
    }
}

#[test]
fn should_record_episode_statistics() {
    let mut env = monitored(3);
    run_episode(&mut env, &[1.0, 1.0, 0.0]);

    let episodes = env.episodes();
    assert_eq!(episodes.len(), 1);
    let ep = &episodes[0];
    assert_eq!(ep.length, 3);
    // jerk per step: 1, 0, 1
    assert!((ep.jerk - 2.0).abs() < 1e-6);
    assert!((ep.reward - (-3.0 - 0.2)).abs() < 1e-5);
    assert!(ep.time >= 0.0);
}

#[test]
fn should_add_episode_keys_on_final_step_only() {
    let mut env = monitored(2);
    env.reset(&ResetOptions::new()).unwrap();

    let t = env.step(&[0.0]).unwrap();
    assert!(!t.info.contains_key("episode_r"));

    let t = env.step(&[0.0]).unwrap();
    assert!(t.truncated);
    assert_eq!(t.info.get("episode_r"), Some(-2.0));
    assert_eq!(t.info.get("episode_l"), Some(2.0));
    assert!(t.info.contains_key("episode_t"));
    assert!(t.info.contains_key("jerk"));
}

#[test]
fn should_not_count_steps_past_episode_end() {
    let mut env = monitored(1);
    env.reset(&ResetOptions::new()).unwrap();
    env.step(&[0.0]).unwrap();
    env.step(&[0.0]).unwrap();
    env.step(&[0.0]).unwrap();

    assert_eq!(env.episodes().len(), 1);
    assert_eq!(env.total_steps(), 1);

    run_episode(&mut env, &[0.0]);
    assert_eq!(env.episode_lengths(), vec![1, 1]);
}

#[test]
fn should_reset_counters_between_episodes() {
    let mut env = monitored(2);
    run_episode(&mut env, &[2.0, 2.0]);
    run_episode(&mut env, &[0.0, 0.0]);

    let rewards = env.episode_rewards();
    assert_eq!(rewards.len(), 2);
    assert!((rewards[0] - (-2.0 - 0.4)).abs() < 1e-5);
    assert!((rewards[1] - (-2.0)).abs() < 1e-5);
    assert_eq!(env.total_steps(), 4);
}

#[test]
fn should_write_csv_with_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("pd_seed_0");
    let inner = ScriptedEnv::new(1, -1.0).with_episode_len(2);
    let env = BioProstheticWrapper::new(inner, 0.1, false).unwrap();
    let mut env = Monitor::with_file(env, "Pendulum-v1", &base).unwrap();

    let path = env.path().unwrap().to_path_buf();
    assert_eq!(path, dir.path().join("pd_seed_0.monitor.csv"));

    run_episode(&mut env, &[0.0, 0.0]);
    run_episode(&mut env, &[1.0, 1.0]);
    env.flush();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);

    assert!(lines[0].starts_with('#'));
    let header: serde_json::Value = serde_json::from_str(&lines[0][1..]).unwrap();
    assert_eq!(header["env_id"], "Pendulum-v1");
    assert!(header["t_start"].as_f64().unwrap() > 0.0);

    assert_eq!(lines[1], "r,l,t,jerk");

    let row: Vec<f64> = lines[3].split(',').map(|v| v.parse().unwrap()).collect();
    assert_eq!(row.len(), 4);
    assert!((row[0] - (-2.1)).abs() < 1e-5);
    assert_eq!(row[1], 2.0);
    assert!((row[3] - 1.0).abs() < 1e-6);
}

#[test]
fn should_write_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let env = BioProstheticWrapper::new(ScriptedEnv::new(1, 0.0), 0.1, false).unwrap();
    let env = Monitor::with_file(env, "scripted", dir.path()).unwrap();
    assert_eq!(env.path().unwrap(), dir.path().join("monitor.csv"));
}

#[test]
fn should_fail_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let env = BioProstheticWrapper::new(ScriptedEnv::new(1, 0.0), 0.1, false).unwrap();
    let result = Monitor::with_file(env, "scripted", dir.path().join("missing/run"));
    assert!(matches!(result, Err(prosthetic_core::EnvError::Io(_))));
}
