use std::{
  fs::{self, File},
  io::{BufRead, BufReader, BufWriter, Write},
  path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use serde::Serialize;

use super::{Episode, EpisodeWriter};
use crate::{
  error::{Error, Result},
  schema::DatasetConfig,
  step::StepData,
};

pub const DATASET_INFO_FILE: &str = "dataset_info.json";

#[derive(Serialize)]
struct DatasetInfo<'a> {
  config: &'a DatasetConfig,
  split: &'a str,
  max_episodes_per_file: usize,
  created_at: chrono::DateTime<chrono::Utc>,
}

pub struct FileBackendWriterBuilder {
  ds_config: DatasetConfig,
  data_directory: Option<PathBuf>,
  split_name: String,
  max_episodes_per_file: usize,
}

impl FileBackendWriterBuilder {
  pub fn new(ds_config: DatasetConfig) -> FileBackendWriterBuilder {
    FileBackendWriterBuilder {
      ds_config,
      data_directory: None,
      split_name: String::from("train"),
      max_episodes_per_file: 1,
    }
  }

  pub fn data_directory(mut self, dir: impl Into<PathBuf>) -> FileBackendWriterBuilder {
    self.data_directory = Some(dir.into());
    self
  }

  pub fn split_name(mut self, split: &str) -> FileBackendWriterBuilder {
    self.split_name = split.to_string();
    self
  }

  pub fn max_episodes_per_file(mut self, max: usize) -> FileBackendWriterBuilder {
    self.max_episodes_per_file = max;
    self
  }

  pub fn build(self) -> Result<FileBackendWriter> {
    let data_directory = match self.data_directory {
      Some(d) => d,
      None => return Error::config("data directory needs to be defined"),
    };
    if self.max_episodes_per_file == 0 {
      return Error::config("max_episodes_per_file must be at least 1");
    }

    fs::create_dir_all(&data_directory)?;
    let info = DatasetInfo {
      config: &self.ds_config,
      split: &self.split_name,
      max_episodes_per_file: self.max_episodes_per_file,
      created_at: chrono::Utc::now(),
    };
    let info_file = File::create(data_directory.join(DATASET_INFO_FILE))?;
    serde_json::to_writer_pretty(info_file, &info)?;
    info!(
      "Writing dataset '{}' split '{}' to {}",
      self.ds_config.name,
      self.split_name,
      data_directory.display()
    );

    Ok(FileBackendWriter {
      ds_config: self.ds_config,
      data_directory,
      split_name: self.split_name,
      max_episodes_per_file: self.max_episodes_per_file,
      current: None,
      shard: None,
      shard_paths: Vec::new(),
      episodes_in_shard: 0,
      episodes_written: 0,
    })
  }
}

/// Writes episodes as JSON lines, one episode per line, starting a new shard
/// file every `max_episodes_per_file` episodes.
///
/// An episode is buffered in memory until the next one begins or the writer
/// is closed.
pub struct FileBackendWriter {
  ds_config: DatasetConfig,
  data_directory: PathBuf,
  split_name: String,
  max_episodes_per_file: usize,
  current: Option<Episode>,
  shard: Option<BufWriter<File>>,
  shard_paths: Vec<PathBuf>,
  episodes_in_shard: usize,
  episodes_written: usize,
}

impl FileBackendWriter {
  pub fn data_directory(&self) -> &Path {
    &self.data_directory
  }

  pub fn ds_config(&self) -> &DatasetConfig {
    &self.ds_config
  }

  /// Shard files created so far, oldest first.
  pub fn shard_paths(&self) -> &[PathBuf] {
    &self.shard_paths
  }

  /// The episode still being recorded, or one whose write failed.
  pub fn current_episode(&self) -> Option<&Episode> {
    self.current.as_ref()
  }

  pub fn episodes_written(&self) -> usize {
    self.episodes_written
  }

  fn shard_path(&self, index: usize) -> PathBuf {
    self.data_directory.join(format!(
      "{}-{}.jsonl-{:05}",
      self.ds_config.name, self.split_name, index
    ))
  }

  fn validate(&self, data: &StepData) -> Result<()> {
    self
      .ds_config
      .observation_info
      .validate(&data.timestep.observation)?;
    self.ds_config.action_info.validate(&data.action)
  }

  fn open_shard(&mut self) -> Result<()> {
    if let Some(mut old) = self.shard.take() {
      old.flush()?;
    }
    let path = self.shard_path(self.shard_paths.len());
    debug!("Opening shard {}", path.display());
    self.shard = Some(BufWriter::new(File::create(&path)?));
    self.shard_paths.push(path);
    self.episodes_in_shard = 0;
    Ok(())
  }

  fn write_episode(&mut self, episode: &Episode) -> Result<()> {
    if episode.is_empty() {
      return Ok(());
    }
    if self.shard.is_none() || self.episodes_in_shard >= self.max_episodes_per_file {
      self.open_shard()?;
    }
    let line = serde_json::to_string(episode)?;
    if let Some(shard) = self.shard.as_mut() {
      shard.write_all(line.as_bytes())?;
      shard.write_all(b"\n")?;
      shard.flush()?;
    }
    self.episodes_in_shard += 1;
    self.episodes_written += 1;
    info!(
      "Episode {} written: {} steps",
      episode.episode_id,
      episode.len()
    );
    Ok(())
  }

  // a failed episode stays buffered, so a later close can retry it
  fn finish_current(&mut self) -> Result<()> {
    let episode = match self.current.take() {
      Some(episode) => episode,
      None => return Ok(()),
    };
    if let Err(e) = self.write_episode(&episode) {
      error!(
        "Episode {} ({} steps) could not be written, keeping it buffered: {}",
        episode.episode_id,
        episode.len(),
        e
      );
      self.current = Some(episode);
      return Err(e);
    }
    Ok(())
  }
}

impl EpisodeWriter for FileBackendWriter {
  fn record_step(&mut self, data: StepData, is_new_episode: bool) -> Result<()> {
    // the previous episode ends here even if this step is rejected
    if is_new_episode {
      self.finish_current()?;
    }
    self.validate(&data)?;
    if !is_new_episode && self.current.is_none() {
      warn!("Step recorded before any episode began, starting one.");
    }
    self.current.get_or_insert_with(Episode::new).steps.push(data);
    Ok(())
  }

  fn end_episode(&mut self) -> Result<()> {
    self.finish_current()
  }

  fn close(&mut self) -> Result<()> {
    self.finish_current()?;
    if let Some(shard) = self.shard.as_mut() {
      shard.flush()?;
    }
    Ok(())
  }
}

impl Drop for FileBackendWriter {
  fn drop(&mut self) {
    if let Err(e) = self.close() {
      error!("Failed to flush dataset on drop: {}", e);
    }
  }
}

/// Reads back all episodes of one shard file.
pub fn read_shard(path: &Path) -> Result<Vec<Episode>> {
  let reader = BufReader::new(File::open(path)?);
  let mut episodes = Vec::new();
  for line in reader.lines() {
    let line = line?;
    if line.trim().is_empty() {
      continue;
    }
    episodes.push(serde_json::from_str(&line)?);
  }
  Ok(episodes)
}
