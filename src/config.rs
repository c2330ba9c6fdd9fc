use std::path::PathBuf;

use clap::Parser;

use crate::{
  error::{Error, Result},
  msg::StepTopic,
};

#[derive(Debug, Clone, Parser)]
#[command(
  name = "rtx_recorder",
  about = "Records RT-X step messages from a ROS2 topic into an episodic dataset"
)]
pub struct RecorderConfig {
  /// DDS domain to join.
  #[arg(long, default_value_t = 0, env = "RTX_RECORDER_DOMAIN_ID")]
  pub domain_id: u16,

  #[arg(long, default_value = "rt_x_recorder", env = "RTX_RECORDER_NODE_NAME")]
  pub node_name: String,

  #[arg(long, default_value = "/", env = "RTX_RECORDER_NAMESPACE")]
  pub namespace: String,

  /// ROS2 topic carrying `fogros2_rt_x_msgs/Step`.
  #[arg(long, default_value = StepTopic::ROS_NAME, env = "RTX_RECORDER_TOPIC")]
  pub topic: String,

  /// Where dataset shards are written.
  #[arg(long, default_value = "rt_x_dataset", env = "RTX_RECORDER_DATA_DIR")]
  pub data_dir: PathBuf,

  #[arg(long, default_value = "train", env = "RTX_RECORDER_SPLIT")]
  pub split: String,

  #[arg(long, default_value = "bridge", env = "RTX_RECORDER_DATASET_NAME")]
  pub dataset_name: String,

  #[arg(long, default_value_t = 1, env = "RTX_RECORDER_MAX_EPISODES_PER_FILE")]
  pub max_episodes_per_file: usize,

  /// log4rs YAML configuration. Logs to the console at info level if absent.
  #[arg(long, env = "RTX_RECORDER_LOG_CONFIG")]
  pub log_config: Option<PathBuf>,

  /// Count and log episodes instead of writing files.
  #[arg(long, env = "RTX_RECORDER_DRY_RUN")]
  pub dry_run: bool,
}

impl Default for RecorderConfig {
  fn default() -> Self {
    RecorderConfig {
      domain_id: 0,
      node_name: String::from("rt_x_recorder"),
      namespace: String::from("/"),
      topic: String::from(StepTopic::ROS_NAME),
      data_dir: PathBuf::from("rt_x_dataset"),
      split: String::from("train"),
      dataset_name: String::from("bridge"),
      max_episodes_per_file: 1,
      log_config: None,
      dry_run: false,
    }
  }
}

impl RecorderConfig {
  pub fn validate(&self) -> Result<()> {
    if self.max_episodes_per_file == 0 {
      return Error::config("max_episodes_per_file must be at least 1");
    }
    if self.topic.trim_matches('/').is_empty() {
      return Error::config("topic name is empty");
    }
    if self.node_name.is_empty() {
      return Error::config("node name is empty");
    }
    if !self.namespace.starts_with('/') {
      return Error::config("namespace must start with '/'");
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parsed_defaults_match_default_impl() {
    let parsed = RecorderConfig::try_parse_from(["rtx_recorder"]).unwrap();
    let default = RecorderConfig::default();
    assert_eq!(parsed.topic, default.topic);
    assert_eq!(parsed.data_dir, default.data_dir);
    assert_eq!(parsed.max_episodes_per_file, 1);
    assert!(!parsed.dry_run);
    assert!(default.validate().is_ok());
  }

  #[test]
  fn command_line_overrides() {
    let parsed = RecorderConfig::try_parse_from([
      "rtx_recorder",
      "--domain-id",
      "7",
      "--topic",
      "/robot/steps",
      "--max-episodes-per-file",
      "10",
      "--dry-run",
    ])
    .unwrap();
    assert_eq!(parsed.domain_id, 7);
    assert_eq!(parsed.topic, "/robot/steps");
    assert_eq!(parsed.max_episodes_per_file, 10);
    assert!(parsed.dry_run);
  }

  #[test]
  fn validate_rejects_bad_values() {
    let mut config = RecorderConfig::default();
    config.max_episodes_per_file = 0;
    assert!(config.validate().is_err());

    let mut config = RecorderConfig::default();
    config.topic = String::from("/");
    assert!(config.validate().is_err());

    let mut config = RecorderConfig::default();
    config.namespace = String::from("lab");
    assert!(config.validate().is_err());
  }
}
