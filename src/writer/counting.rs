use log::{info, warn};

use super::EpisodeWriter;
use crate::{error::Result, step::StepData};

/// Counts steps and episodes and logs each finished episode, keeping no step
/// data. Used by `--dry-run`.
#[derive(Debug, Default)]
pub struct CountingWriter {
  steps: u64,
  episodes: u64,
  // steps in the open episode, None when no episode is open
  open_episode: Option<u64>,
}

impl CountingWriter {
  pub fn new() -> CountingWriter {
    CountingWriter::default()
  }

  pub fn steps(&self) -> u64 {
    self.steps
  }

  /// Episodes started so far, the open one included.
  pub fn episodes(&self) -> u64 {
    self.episodes
  }

  pub fn open_episode_len(&self) -> Option<u64> {
    self.open_episode
  }
}

impl EpisodeWriter for CountingWriter {
  fn record_step(&mut self, _data: StepData, is_new_episode: bool) -> Result<()> {
    if is_new_episode {
      self.end_episode()?;
    } else if self.open_episode.is_none() {
      warn!("Step recorded before any episode began, starting one.");
    }
    if self.open_episode.is_none() {
      self.episodes += 1;
    }
    *self.open_episode.get_or_insert(0) += 1;
    self.steps += 1;
    Ok(())
  }

  fn end_episode(&mut self) -> Result<()> {
    if let Some(len) = self.open_episode.take() {
      info!(
        "Episode {} ended: {} steps (dry run, {} steps so far)",
        self.episodes, len, self.steps
      );
    }
    Ok(())
  }

  fn close(&mut self) -> Result<()> {
    self.end_episode()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::step::TimeStep;

  fn data() -> StepData {
    StepData {
      timestep: TimeStep::restart(Default::default()),
      action: Default::default(),
      metadata: Default::default(),
      custom_data: None,
    }
  }

  #[test]
  fn counts_steps_and_episodes() {
    let mut writer = CountingWriter::new();
    writer.record_step(data(), true).unwrap();
    writer.record_step(data(), false).unwrap();
    writer.record_step(data(), true).unwrap();
    assert_eq!(writer.steps(), 3);
    assert_eq!(writer.episodes(), 2);
    assert_eq!(writer.open_episode_len(), Some(1));

    writer.close().unwrap();
    assert_eq!(writer.open_episode_len(), None);
    assert_eq!(writer.episodes(), 2);
  }

  #[test]
  fn step_after_ended_episode_opens_another() {
    let mut writer = CountingWriter::new();
    writer.record_step(data(), true).unwrap();
    writer.end_episode().unwrap();
    writer.record_step(data(), false).unwrap();
    assert_eq!(writer.episodes(), 2);
    assert_eq!(writer.open_episode_len(), Some(1));
  }
}
