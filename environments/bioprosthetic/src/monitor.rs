//! Episode monitor with an optional CSV sink.
//!
//! File format (one row per finished episode):
//!
//! ```text
//! #{"t_start":1700000000.0,"env_id":"Pendulum-v1"}
//! r,l,t,jerk
//! -1234.567891,200,0.012345,3.141593
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use prosthetic_core::{Env, Info, ResetOptions, Result, Space, Transition};
use serde::Serialize;

use crate::jerk::JERK_INFO_KEY;
use crate::patient::{PatientParams, PhysicalParams};

/// Suffix appended to monitor file paths.
pub const MONITOR_EXT: &str = "monitor.csv";

/// Summary of one finished episode.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpisodeRecord {
    /// Sum of rewards
    pub reward: f32,
    /// Number of steps
    pub length: u32,
    /// Seconds since the monitor was created
    pub time: f64,
    /// Sum of per-step jerk
    pub jerk: f32,
}

#[derive(Serialize)]
struct MonitorHeader<'a> {
    t_start: f64,
    env_id: &'a str,
}

/// Records per-episode statistics of the wrapped environment.
pub struct Monitor<E> {
    env: E,
    env_id: String,
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    start_time: Instant,
    episode_reward: f32,
    episode_length: u32,
    episode_jerk: f32,
    episode_done: bool,
    total_steps: u64,
    episodes: Vec<EpisodeRecord>,
}

impl<E: Env> Monitor<E> {
    /// Monitor that keeps records in memory only.
    pub fn new(env: E, env_id: impl Into<String>) -> Self {
        Self {
            env,
            env_id: env_id.into(),
            writer: None,
            path: None,
            start_time: Instant::now(),
            episode_reward: 0.0,
            episode_length: 0,
            episode_jerk: 0.0,
            episode_done: false,
            total_steps: 0,
            episodes: Vec::new(),
        }
    }

    /// Monitor that also appends every finished episode to a CSV file.
    ///
    /// `path` gets the `.monitor.csv` suffix unless it already ends with it;
    /// a directory path gets a `monitor.csv` file inside it.
    pub fn with_file(env: E, env_id: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let mut monitor = Self::new(env, env_id);
        let path = monitor_path(path.as_ref());

        let mut writer = BufWriter::new(File::create(&path)?);
        let t_start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        let header = MonitorHeader {
            t_start,
            env_id: &monitor.env_id,
        };
        write!(writer, "#")?;
        serde_json::to_writer(&mut writer, &header).map_err(std::io::Error::from)?;
        writeln!(writer)?;
        writeln!(writer, "r,l,t,{}", JERK_INFO_KEY)?;
        writer.flush()?;

        debug!("Monitor writing to {}", path.display());
        monitor.writer = Some(writer);
        monitor.path = Some(path);
        Ok(monitor)
    }
}

impl<E> Monitor<E> {
    /// Environment identifier written to the file header.
    pub fn env_id(&self) -> &str {
        &self.env_id
    }

    /// CSV file path, if a file sink is configured.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All finished episodes so far.
    pub fn episodes(&self) -> &[EpisodeRecord] {
        &self.episodes
    }

    /// Reward sums of finished episodes.
    pub fn episode_rewards(&self) -> Vec<f32> {
        self.episodes.iter().map(|e| e.reward).collect()
    }

    /// Lengths of finished episodes.
    pub fn episode_lengths(&self) -> Vec<u32> {
        self.episodes.iter().map(|e| e.length).collect()
    }

    /// Steps taken across all episodes.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Mutable access to the wrapped environment.
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Unwrap into the inner environment, closing the file sink.
    pub fn into_inner(mut self) -> E {
        self.flush();
        self.env
    }

    /// Flush buffered rows to disk.
    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }

    fn finish_episode(&mut self) -> Result<EpisodeRecord> {
        let record = EpisodeRecord {
            reward: self.episode_reward,
            length: self.episode_length,
            time: self.start_time.elapsed().as_secs_f64(),
            jerk: self.episode_jerk,
        };

        if let Some(writer) = self.writer.as_mut() {
            writeln!(
                writer,
                "{:.6},{},{:.6},{:.6}",
                record.reward, record.length, record.time, record.jerk
            )?;
            writer.flush()?;
        }

        self.episodes.push(record.clone());
        self.episode_done = true;
        Ok(record)
    }
}

impl<E: Env> Env for Monitor<E> {
    fn observation_space(&self) -> Space {
        self.env.observation_space()
    }

    fn action_space(&self) -> Space {
        self.env.action_space()
    }

    fn reset(&mut self, options: &ResetOptions) -> Result<(Vec<f32>, Info)> {
        let reset = self.env.reset(options)?;
        self.episode_reward = 0.0;
        self.episode_length = 0;
        self.episode_jerk = 0.0;
        self.episode_done = false;
        Ok(reset)
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition> {
        let mut transition = self.env.step(action)?;

        if self.episode_done {
            return Ok(transition);
        }

        if !transition.reward.is_finite() {
            warn!(
                "Non-finite reward {} at step {} of {}",
                transition.reward, self.episode_length, self.env_id
            );
        }

        self.episode_reward += transition.reward;
        self.episode_length += 1;
        self.episode_jerk += transition.info.get(JERK_INFO_KEY).unwrap_or(0.0);
        self.total_steps += 1;

        if transition.done() {
            let record = self.finish_episode()?;
            transition.info.insert("episode_r", record.reward);
            transition.info.insert("episode_l", record.length as f32);
            transition.info.insert("episode_t", record.time as f32);
        }

        Ok(transition)
    }
}

impl<E: PhysicalParams> PhysicalParams for Monitor<E> {
    fn patient_params(&self) -> PatientParams {
        self.env.patient_params()
    }

    fn set_patient_params(&mut self, params: PatientParams) {
        self.env.set_patient_params(params)
    }
}

fn monitor_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.join(MONITOR_EXT);
    }
    let name = path.to_string_lossy();
    if name.ends_with(MONITOR_EXT) {
        path.to_path_buf()
    } else {
        PathBuf::from(format!("{}.{}", name, MONITOR_EXT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_path_suffix() {
        assert_eq!(
            monitor_path(Path::new("logs/pd_seed_0")),
            PathBuf::from("logs/pd_seed_0.monitor.csv")
        );
        assert_eq!(
            monitor_path(Path::new("logs/run.monitor.csv")),
            PathBuf::from("logs/run.monitor.csv")
        );
    }

    #[test]
    fn test_monitor_path_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(monitor_path(dir.path()), dir.path().join("monitor.csv"));
    }
}
