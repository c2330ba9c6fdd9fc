use log::{debug, info, warn};

use crate::{
  adapter::StepConverter,
  env::LastStepEnv,
  error::Result,
  msg::Step,
  schema::DatasetConfig,
  writer::EpisodeWriter,
};

// how much of a received message goes into the log line
const LOG_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RecorderStats {
  pub steps_received: u64,
  pub steps_written: u64,
  pub episodes_started: u64,
  pub steps_rejected: u64,
}

/// Turns each step message into exactly one writer call, in arrival order.
pub struct StepRecorder<W> {
  converter: StepConverter,
  writer: W,
  env: LastStepEnv,
  stats: RecorderStats,
}

impl<W: EpisodeWriter> StepRecorder<W> {
  pub fn new(ds_config: DatasetConfig, writer: W) -> StepRecorder<W> {
    StepRecorder {
      converter: StepConverter::new(
        ds_config.observation_info.clone(),
        ds_config.action_info.clone(),
      ),
      env: LastStepEnv::new(ds_config),
      writer,
      stats: RecorderStats::default(),
    }
  }

  /// Writes one message as one step. A rejected message still ends the open
  /// episode when it carries `is_first`.
  pub fn handle_step(&mut self, msg: &Step) -> Result<()> {
    self.stats.steps_received += 1;
    debug!("Received step: {}", preview(msg));

    match self.write_step(msg) {
      Ok(()) => {
        if msg.is_first {
          self.stats.episodes_started += 1;
        }
        self.stats.steps_written += 1;
        Ok(())
      }
      Err(e) => {
        self.stats.steps_rejected += 1;
        if msg.is_first {
          warn!("First step of an episode rejected, ending the open episode.");
          self.writer.end_episode()?;
        }
        Err(e)
      }
    }
  }

  fn write_step(&mut self, msg: &Step) -> Result<()> {
    let record = self.converter.convert(msg)?;
    self.env.observe(&record);
    let is_new_episode = record.is_first;
    self.writer.record_step(record.into_step_data(), is_new_episode)
  }

  pub fn env(&self) -> &LastStepEnv {
    &self.env
  }

  pub fn writer(&self) -> &W {
    &self.writer
  }

  pub fn stats(&self) -> RecorderStats {
    self.stats
  }

  /// Closes the writer, flushing the open episode.
  pub fn finish(mut self) -> Result<(W, RecorderStats)> {
    self.writer.close()?;
    info!(
      "Recorder finished: {} steps received, {} written, {} rejected, {} episodes",
      self.stats.steps_received,
      self.stats.steps_written,
      self.stats.steps_rejected,
      self.stats.episodes_started
    );
    Ok((self.writer, self.stats))
  }
}

fn preview(msg: &Step) -> String {
  let mut text = format!("{:?}", msg);
  if let Some((cut, _)) = text.char_indices().nth(LOG_PREVIEW_CHARS) {
    text.truncate(cut);
  }
  text
}
