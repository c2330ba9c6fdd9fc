use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Flat mapping from feature name to its (flattened) numeric values.
pub type FeatureMap = BTreeMap<String, Vec<f32>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
  First,
  Mid,
  Last,
}

impl StepType {
  pub fn is_first(self) -> bool {
    self == StepType::First
  }

  pub fn is_last(self) -> bool {
    self == StepType::Last
  }
}

/// What an environment hands back after a reset or an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStep {
  pub step_type: StepType,
  pub reward: f64,
  pub discount: f64,
  pub observation: FeatureMap,
}

impl TimeStep {
  pub fn restart(observation: FeatureMap) -> TimeStep {
    TimeStep {
      step_type: StepType::First,
      reward: 0.0,
      discount: 1.0,
      observation,
    }
  }

  pub fn transition(reward: f64, observation: FeatureMap, discount: f64) -> TimeStep {
    TimeStep {
      step_type: StepType::Mid,
      reward,
      discount,
      observation,
    }
  }

  // episode ended inside the MDP: no future value
  pub fn termination(reward: f64, observation: FeatureMap) -> TimeStep {
    TimeStep {
      step_type: StepType::Last,
      reward,
      discount: 0.0,
      observation,
    }
  }

  pub fn truncation(reward: f64, observation: FeatureMap, discount: f64) -> TimeStep {
    TimeStep {
      step_type: StepType::Last,
      reward,
      discount,
      observation,
    }
  }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepMetadata {
  pub is_first: bool,
  pub is_last: bool,
  pub is_terminal: bool,
}

/// One step as handed to an [`EpisodeWriter`](crate::writer::EpisodeWriter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepData {
  pub timestep: TimeStep,
  pub action: FeatureMap,
  pub metadata: StepMetadata,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_data: Option<serde_json::Value>,
}

/// A step message translated into dataset terms. Built per message and
/// dropped once the writer has it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
  pub observation: FeatureMap,
  pub action: FeatureMap,
  pub reward: f64,
  pub discount: f64,
  pub is_first: bool,
  pub is_last: bool,
  pub is_terminal: bool,
}

impl Record {
  pub fn metadata(&self) -> StepMetadata {
    StepMetadata {
      is_first: self.is_first,
      is_last: self.is_last,
      is_terminal: self.is_terminal,
    }
  }

  /// `First` when the record opens an episode, `Mid` otherwise. The end of an
  /// episode travels in the metadata flags only.
  pub fn into_step_data(self) -> StepData {
    let metadata = self.metadata();
    let step_type = if self.is_first {
      StepType::First
    } else {
      StepType::Mid
    };
    StepData {
      timestep: TimeStep {
        step_type,
        reward: self.reward,
        discount: self.discount,
        observation: self.observation,
      },
      action: self.action,
      metadata,
      custom_data: None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(is_first: bool) -> Record {
    let mut observation = FeatureMap::new();
    observation.insert("state".to_string(), vec![1.0, 2.0]);
    Record {
      observation,
      action: FeatureMap::new(),
      reward: 0.5,
      discount: 1.0,
      is_first,
      is_last: !is_first,
      is_terminal: false,
    }
  }

  #[test]
  fn step_type_follows_is_first() {
    assert_eq!(
      record(true).into_step_data().timestep.step_type,
      StepType::First
    );
    let data = record(false).into_step_data();
    assert_eq!(data.timestep.step_type, StepType::Mid);
    assert!(data.metadata.is_last);
    assert_eq!(data.timestep.reward, 0.5);
    assert_eq!(data.timestep.observation["state"], vec![1.0, 2.0]);
  }

  #[test]
  fn termination_zeroes_discount() {
    let ts = TimeStep::termination(2.0, FeatureMap::new());
    assert!(ts.step_type.is_last());
    assert_eq!(ts.discount, 0.0);
    assert_eq!(TimeStep::truncation(2.0, FeatureMap::new(), 1.0).discount, 1.0);
    assert!(TimeStep::restart(FeatureMap::new()).step_type.is_first());
  }
}
