use log::warn;

use super::{Episode, EpisodeWriter};
use crate::{error::Result, step::StepData};

/// Keeps every episode in memory, for tests. Nothing is ever dropped, so
/// long-running nodes should use [`CountingWriter`](super::CountingWriter).
#[derive(Debug, Default)]
pub struct MemoryWriter {
  finished: Vec<Episode>,
  current: Option<Episode>,
  // is_new_episode of every call
  calls: Vec<bool>,
}

impl MemoryWriter {
  pub fn new() -> MemoryWriter {
    MemoryWriter::default()
  }

  pub fn finished_episodes(&self) -> &[Episode] {
    &self.finished
  }

  pub fn current_episode(&self) -> Option<&Episode> {
    self.current.as_ref()
  }

  /// The `is_new_episode` argument of every `record_step` call, in order.
  pub fn new_episode_flags(&self) -> &[bool] {
    &self.calls
  }

  /// All recorded steps, in the order they were written.
  pub fn steps(&self) -> impl Iterator<Item = &StepData> {
    self
      .finished
      .iter()
      .chain(self.current.iter())
      .flat_map(|e| e.steps.iter())
  }
}

impl EpisodeWriter for MemoryWriter {
  fn record_step(&mut self, data: StepData, is_new_episode: bool) -> Result<()> {
    self.calls.push(is_new_episode);
    if is_new_episode {
      if let Some(done) = self.current.take() {
        self.finished.push(done);
      }
    } else if self.current.is_none() {
      warn!("Step recorded before any episode began, starting one.");
    }
    self.current.get_or_insert_with(Episode::new).steps.push(data);
    Ok(())
  }

  fn end_episode(&mut self) -> Result<()> {
    if let Some(done) = self.current.take() {
      self.finished.push(done);
    }
    Ok(())
  }

  fn close(&mut self) -> Result<()> {
    self.end_episode()
  }
}
