//! Dataset feature declarations.
//!
//! A [`DatasetConfig`] fixes, once and for all, which observation and action
//! keys a dataset holds and how large each tensor is. Every recorded step is
//! checked against it before it reaches the disk.

use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  step::FeatureMap,
};

/// Element type of a feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DType {
  Float32,
  Float64,
  Bool,
  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSpec {
  pub dtype: DType,
  pub shape: Vec<usize>,
}

impl TensorSpec {
  pub fn new(dtype: DType, shape: &[usize]) -> TensorSpec {
    TensorSpec {
      dtype,
      shape: shape.to_vec(),
    }
  }

  pub fn scalar(dtype: DType) -> TensorSpec {
    TensorSpec {
      dtype,
      shape: Vec::new(),
    }
  }

  /// Number of elements a flattened value of this spec holds.
  pub fn num_elements(&self) -> usize {
    self.shape.iter().product()
  }
}

/// Ordered mapping from feature name to its tensor spec.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeaturesDict {
  features: Vec<(String, TensorSpec)>,
}

impl FeaturesDict {
  pub fn new() -> FeaturesDict {
    FeaturesDict::default()
  }

  pub fn with(mut self, name: &str, spec: TensorSpec) -> FeaturesDict {
    self.insert(name, spec);
    self
  }

  pub fn insert(&mut self, name: &str, spec: TensorSpec) {
    match self.features.iter_mut().find(|(n, _)| n == name) {
      Some((_, s)) => *s = spec,
      None => self.features.push((name.to_string(), spec)),
    }
  }

  pub fn get(&self, name: &str) -> Option<&TensorSpec> {
    self
      .features
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, s)| s)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.features.iter().map(|(n, _)| n.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &TensorSpec)> {
    self.features.iter().map(|(n, s)| (n.as_str(), s))
  }

  pub fn len(&self) -> usize {
    self.features.len()
  }

  pub fn is_empty(&self) -> bool {
    self.features.is_empty()
  }

  /// Checks that `values` carries exactly the declared features, each with
  /// the declared number of elements.
  pub fn validate(&self, values: &FeatureMap) -> Result<()> {
    for (name, spec) in self.iter() {
      let value = match values.get(name) {
        Some(v) => v,
        None => return Error::schema_mismatch(name, "missing"),
      };
      if value.len() != spec.num_elements() {
        return Error::schema_mismatch(
          name,
          &format!(
            "expected {} elements (shape {:?}), got {}",
            spec.num_elements(),
            spec.shape,
            value.len()
          ),
        );
      }
    }
    if let Some(extra) = values.keys().find(|k| self.get(k).is_none()) {
      return Error::schema_mismatch(extra, "not declared in dataset");
    }
    Ok(())
  }
}

/// Description of an episodic dataset: name plus the features of every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
  pub name: String,
  pub observation_info: FeaturesDict,
  pub action_info: FeaturesDict,
  pub reward_info: DType,
  pub discount_info: DType,
  pub step_metadata_info: FeaturesDict,
}

impl DatasetConfig {
  /// The RT-X dataset the recorder writes by default.
  pub fn rt_x(name: &str) -> DatasetConfig {
    DatasetConfig {
      name: name.to_string(),
      observation_info: FeaturesDict::new()
        .with(
          "natural_language_embedding",
          TensorSpec::new(DType::Float32, &[512]),
        )
        .with("state", TensorSpec::new(DType::Float32, &[7])),
      action_info: FeaturesDict::new()
        .with("rotation_delta", TensorSpec::new(DType::Float32, &[3]))
        .with("world_vector", TensorSpec::new(DType::Float32, &[3])),
      reward_info: DType::Float64,
      discount_info: DType::Float64,
      step_metadata_info: FeaturesDict::new()
        .with("is_first", TensorSpec::scalar(DType::Bool))
        .with("is_last", TensorSpec::scalar(DType::Bool))
        .with("is_terminal", TensorSpec::scalar(DType::Bool)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn small_dict() -> FeaturesDict {
    FeaturesDict::new()
      .with("a", TensorSpec::new(DType::Float32, &[2]))
      .with("b", TensorSpec::new(DType::Float32, &[1, 3]))
  }

  #[test]
  fn keys_keep_insertion_order() {
    let dict = small_dict().with("a", TensorSpec::new(DType::Float32, &[4]));
    assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(dict.get("a").unwrap().num_elements(), 4);
  }

  #[test]
  fn validate_accepts_exact_match() {
    let mut values = FeatureMap::new();
    values.insert("a".to_string(), vec![0.0, 1.0]);
    values.insert("b".to_string(), vec![0.0, 1.0, 2.0]);
    assert!(small_dict().validate(&values).is_ok());
  }

  #[test]
  fn validate_rejects_wrong_length_missing_and_extra() {
    let mut values = FeatureMap::new();
    values.insert("a".to_string(), vec![0.0]);
    values.insert("b".to_string(), vec![0.0, 1.0, 2.0]);
    match small_dict().validate(&values) {
      Err(Error::SchemaMismatch { feature, .. }) => assert_eq!(feature, "a"),
      other => panic!("unexpected {:?}", other),
    }

    values.insert("a".to_string(), vec![0.0, 1.0]);
    values.insert("c".to_string(), vec![]);
    match small_dict().validate(&values) {
      Err(Error::SchemaMismatch { feature, .. }) => assert_eq!(feature, "c"),
      other => panic!("unexpected {:?}", other),
    }

    values.remove("c");
    values.remove("b");
    assert!(small_dict().validate(&values).is_err());
  }

  #[test]
  fn rt_x_has_two_observation_and_two_action_keys() {
    let config = DatasetConfig::rt_x("bridge");
    assert_eq!(
      config.observation_info.keys().collect::<Vec<_>>(),
      vec!["natural_language_embedding", "state"]
    );
    assert_eq!(
      config.action_info.keys().collect::<Vec<_>>(),
      vec!["rotation_delta", "world_vector"]
    );
    assert_eq!(config.reward_info, DType::Float64);
    assert_eq!(config.step_metadata_info.len(), 3);
  }
}
