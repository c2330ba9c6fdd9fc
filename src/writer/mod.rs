//! Episode writers: where recorded steps end up.

use crate::{error::Result, step::StepData};

pub mod counting;
pub mod file;
pub mod memory;

pub use counting::CountingWriter;
pub use file::{FileBackendWriter, FileBackendWriterBuilder};
pub use memory::MemoryWriter;

/// Sink for steps, grouped into episodes.
///
/// `is_new_episode` closes whatever episode is open and starts a new one with
/// `data` as its first step. Otherwise `data` is appended to the open episode.
pub trait EpisodeWriter {
  fn record_step(&mut self, data: StepData, is_new_episode: bool) -> Result<()>;

  /// Ends the open episode without starting another. Used when the first
  /// step of an episode was rejected, so the steps after it are not appended
  /// to the previous episode.
  fn end_episode(&mut self) -> Result<()>;

  /// Flushes the open episode. Steps recorded after this start a new one.
  fn close(&mut self) -> Result<()>;
}

impl<W: EpisodeWriter + ?Sized> EpisodeWriter for Box<W> {
  fn record_step(&mut self, data: StepData, is_new_episode: bool) -> Result<()> {
    (**self).record_step(data, is_new_episode)
  }

  fn end_episode(&mut self) -> Result<()> {
    (**self).end_episode()
  }

  fn close(&mut self) -> Result<()> {
    (**self).close()
  }
}

/// An episode as the backends keep it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Episode {
  pub episode_id: uuid::Uuid,
  pub started_at: chrono::DateTime<chrono::Utc>,
  pub steps: Vec<StepData>,
}

impl Episode {
  pub fn new() -> Episode {
    Episode {
      episode_id: uuid::Uuid::new_v4(),
      started_at: chrono::Utc::now(),
      steps: Vec::new(),
    }
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}

impl Default for Episode {
  fn default() -> Self {
    Episode::new()
  }
}
