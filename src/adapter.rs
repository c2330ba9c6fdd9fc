use crate::{
  error::{Error, Result},
  msg::{Action, Observation, Step},
  schema::FeaturesDict,
  step::{FeatureMap, Record},
};

/// Discount stored with every step. Discounting is not carried on the wire.
pub const DEFAULT_DISCOUNT: f64 = 1.0;

/// Translates step messages into dataset records.
///
/// The keys copied out of each message are those of the observation and
/// action specs, fixed at construction.
#[derive(Debug, Clone)]
pub struct StepConverter {
  observation_spec: FeaturesDict,
  action_spec: FeaturesDict,
}

impl StepConverter {
  pub fn new(observation_spec: FeaturesDict, action_spec: FeaturesDict) -> StepConverter {
    StepConverter {
      observation_spec,
      action_spec,
    }
  }

  pub fn observation_spec(&self) -> &FeaturesDict {
    &self.observation_spec
  }

  pub fn action_spec(&self) -> &FeaturesDict {
    &self.action_spec
  }

  pub fn convert(&self, msg: &Step) -> Result<Record> {
    let observation = collect_fields(&self.observation_spec, Observation::MESSAGE_NAME, |k| {
      msg.observation.field(k)
    })?;
    let action = collect_fields(&self.action_spec, Action::MESSAGE_NAME, |k| {
      msg.action.field(k)
    })?;

    Ok(Record {
      observation,
      action,
      reward: f64::from(msg.reward),
      discount: DEFAULT_DISCOUNT,
      is_first: msg.is_first,
      is_last: msg.is_last,
      is_terminal: msg.is_terminal,
    })
  }
}

fn collect_fields<'m, F>(spec: &FeaturesDict, message: &'static str, lookup: F) -> Result<FeatureMap>
where
  F: Fn(&str) -> Option<&'m [f32]>,
{
  let mut values = FeatureMap::new();
  for key in spec.keys() {
    match lookup(key) {
      Some(v) => {
        values.insert(key.to_string(), v.to_vec());
      }
      None => {
        return Err(Error::MissingField {
          message,
          field: key.to_string(),
        })
      }
    }
  }
  Ok(values)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    msg::{Action, Observation},
    schema::{DType, DatasetConfig, TensorSpec},
  };

  fn converter() -> StepConverter {
    let config = DatasetConfig::rt_x("bridge");
    StepConverter::new(config.observation_info, config.action_info)
  }

  fn message() -> Step {
    Step {
      observation: Observation {
        natural_language_embedding: vec![0.5; 512],
        state: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
      },
      action: Action {
        rotation_delta: vec![0.1, 0.2, 0.3],
        world_vector: vec![-1.0, 0.0, 1.0],
      },
      reward: 3.0,
      is_first: true,
      is_last: false,
      is_terminal: false,
    }
  }

  #[test]
  fn copies_exactly_the_declared_keys() {
    let msg = message();
    let record = converter().convert(&msg).unwrap();

    assert_eq!(
      record.observation.keys().collect::<Vec<_>>(),
      vec!["natural_language_embedding", "state"]
    );
    assert_eq!(record.observation["state"], msg.observation.state);
    assert_eq!(
      record.observation["natural_language_embedding"],
      msg.observation.natural_language_embedding
    );
    assert_eq!(
      record.action.keys().collect::<Vec<_>>(),
      vec!["rotation_delta", "world_vector"]
    );
    assert_eq!(record.action["world_vector"], vec![-1.0, 0.0, 1.0]);
  }

  #[test]
  fn reward_is_f64_and_discount_constant() {
    let mut msg = message();
    msg.reward = 0.25;
    let record = converter().convert(&msg).unwrap();
    let reward: f64 = record.reward;
    assert_eq!(reward, 0.25);
    assert_eq!(record.discount, DEFAULT_DISCOUNT);
  }

  #[test]
  fn flags_are_copied() {
    let mut msg = message();
    msg.is_first = false;
    msg.is_last = true;
    msg.is_terminal = true;
    let record = converter().convert(&msg).unwrap();
    assert!(!record.is_first);
    assert!(record.is_last);
    assert!(record.is_terminal);
  }

  #[test]
  fn unknown_spec_key_is_a_lookup_failure() {
    let observation_spec = FeaturesDict::new()
      .with("state", TensorSpec::new(DType::Float32, &[7]))
      .with("image", TensorSpec::new(DType::Float32, &[480, 640, 3]));
    let converter = StepConverter::new(observation_spec, DatasetConfig::rt_x("x").action_info);

    match converter.convert(&message()) {
      Err(Error::MissingField { message, field }) => {
        assert_eq!(message, "Observation");
        assert_eq!(field, "image");
      }
      other => panic!("expected MissingField, got {:?}", other),
    }
  }
}
