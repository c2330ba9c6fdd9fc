//! A dm_env style view of the recorded stream.
//!
//! Nothing drives a real environment here: [`LastStepEnv`] answers `step`
//! and `reset` from whatever the recorder saw last, which is enough for code
//! that wants an environment interface over a passive recording.

use serde::{Deserialize, Serialize};

use crate::{
  schema::{DType, DatasetConfig, FeaturesDict},
  step::{FeatureMap, Record, TimeStep},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArraySpec {
  pub name: String,
  pub dtype: DType,
  pub shape: Vec<usize>,
}

pub trait Environment {
  fn reset(&mut self) -> TimeStep;
  fn step(&mut self, action: &FeatureMap) -> TimeStep;
  fn observation_spec(&self) -> Vec<ArraySpec>;
  fn action_spec(&self) -> Vec<ArraySpec>;
  fn reward_spec(&self) -> ArraySpec;
  fn discount_spec(&self) -> ArraySpec;
}

fn array_specs(features: &FeaturesDict) -> Vec<ArraySpec> {
  features
    .iter()
    .filter(|(_, spec)| spec.dtype != DType::String)
    .map(|(name, spec)| ArraySpec {
      name: name.to_string(),
      dtype: spec.dtype,
      shape: spec.shape.clone(),
    })
    .collect()
}

#[derive(Debug, Clone)]
pub struct LastStepEnv {
  config: DatasetConfig,
  last_observation: Option<FeatureMap>,
  last_action: Option<FeatureMap>,
  last_reward: f64,
  last_is_terminal: bool,
}

impl LastStepEnv {
  pub fn new(config: DatasetConfig) -> LastStepEnv {
    LastStepEnv {
      config,
      last_observation: None,
      last_action: None,
      last_reward: 0.0,
      last_is_terminal: false,
    }
  }

  pub fn observe(&mut self, record: &Record) {
    self.last_observation = Some(record.observation.clone());
    self.last_action = Some(record.action.clone());
    self.last_reward = record.reward;
    self.last_is_terminal = record.is_terminal;
  }

  pub fn last_action(&self) -> Option<&FeatureMap> {
    self.last_action.as_ref()
  }

  pub fn last_reward(&self) -> f64 {
    self.last_reward
  }

  fn zero_observation(&self) -> FeatureMap {
    self
      .config
      .observation_info
      .iter()
      .filter(|(_, spec)| spec.dtype != DType::String)
      .map(|(name, spec)| (name.to_string(), vec![0.0; spec.num_elements()]))
      .collect()
  }
}

impl Environment for LastStepEnv {
  fn reset(&mut self) -> TimeStep {
    TimeStep::restart(self.zero_observation())
  }

  // the action is ignored: the recording already happened
  fn step(&mut self, _action: &FeatureMap) -> TimeStep {
    let observation = self
      .last_observation
      .clone()
      .unwrap_or_else(|| self.zero_observation());
    if self.last_is_terminal {
      TimeStep::termination(self.last_reward, observation)
    } else {
      TimeStep::transition(self.last_reward, observation, 1.0)
    }
  }

  fn observation_spec(&self) -> Vec<ArraySpec> {
    array_specs(&self.config.observation_info)
  }

  fn action_spec(&self) -> Vec<ArraySpec> {
    array_specs(&self.config.action_info)
  }

  fn reward_spec(&self) -> ArraySpec {
    ArraySpec {
      name: String::from("reward"),
      dtype: self.config.reward_info,
      shape: Vec::new(),
    }
  }

  fn discount_spec(&self) -> ArraySpec {
    ArraySpec {
      name: String::from("discount"),
      dtype: self.config.discount_info,
      shape: Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{schema::TensorSpec, step::StepType};

  fn record(is_terminal: bool) -> Record {
    let mut observation = FeatureMap::new();
    observation.insert("state".to_string(), vec![1.0; 7]);
    Record {
      observation,
      action: FeatureMap::new(),
      reward: 4.0,
      discount: 1.0,
      is_first: false,
      is_last: is_terminal,
      is_terminal,
    }
  }

  #[test]
  fn reset_is_zero_observation() {
    let mut env = LastStepEnv::new(DatasetConfig::rt_x("bridge"));
    let ts = env.reset();
    assert_eq!(ts.step_type, StepType::First);
    assert_eq!(ts.observation["natural_language_embedding"].len(), 512);
    assert!(ts.observation["state"].iter().all(|v| *v == 0.0));
  }

  #[test]
  fn step_replays_last_record() {
    let mut env = LastStepEnv::new(DatasetConfig::rt_x("bridge"));
    env.observe(&record(false));
    let ts = env.step(&FeatureMap::new());
    assert_eq!(ts.step_type, StepType::Mid);
    assert_eq!(ts.reward, 4.0);
    assert_eq!(ts.observation["state"], vec![1.0; 7]);

    env.observe(&record(true));
    let ts = env.step(&FeatureMap::new());
    assert_eq!(ts.step_type, StepType::Last);
    assert_eq!(ts.discount, 0.0);
  }

  #[test]
  fn specs_skip_string_features() {
    let mut config = DatasetConfig::rt_x("bridge");
    config.observation_info.insert(
      "natural_language_instruction",
      TensorSpec::scalar(DType::String),
    );
    let env = LastStepEnv::new(config);
    let names: Vec<_> = env.observation_spec().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["natural_language_embedding", "state"]);
    assert_eq!(env.action_spec().len(), 2);
    assert_eq!(env.reward_spec().dtype, DType::Float64);
    assert_eq!(env.discount_spec().name, "discount");
  }
}
