//! Wire types of the `fogros2_rt_x_msgs` package.
//!
//! Field order matters: CDR has no field names, so the structs below must
//! list fields in the same order as the `.msg` definitions.

use rustdds::{
  policy::{Durability, History, Reliability},
  Duration, QosPolicies, QosPolicyBuilder,
};
use serde::{Deserialize, Serialize};

pub struct StepTopic {}

impl StepTopic {
  /// Default ROS2 topic name, as a node would pass it to `create_subscription`.
  pub const ROS_NAME: &'static str = "step_topic";

  /// DDS topic name for a ROS2 topic name. ROS2 prefixes user topics with `rt`.
  pub fn topic_name(ros_name: &str) -> String {
    format!("rt/{}", ros_name.trim_start_matches('/'))
  }

  pub fn type_name() -> String {
    String::from("fogros2_rt_x_msgs::msg::dds_::Step_")
  }

  // same as a ROS2 subscription with queue depth 10
  pub fn get_qos() -> QosPolicies {
    QosPolicyBuilder::new()
      .durability(Durability::Volatile)
      .reliability(Reliability::Reliable {
        max_blocking_time: Duration::from_millis(100),
      })
      .history(History::KeepLast { depth: 10 })
      .build()
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Observation {
  pub natural_language_embedding: Vec<f32>,
  pub state: Vec<f32>,
}

impl Observation {
  pub const MESSAGE_NAME: &'static str = "Observation";

  pub fn field(&self, name: &str) -> Option<&[f32]> {
    match name {
      "natural_language_embedding" => Some(&self.natural_language_embedding),
      "state" => Some(&self.state),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
  pub rotation_delta: Vec<f32>,
  pub world_vector: Vec<f32>,
}

impl Action {
  pub const MESSAGE_NAME: &'static str = "Action";

  pub fn field(&self, name: &str) -> Option<&[f32]> {
    match name {
      "rotation_delta" => Some(&self.rotation_delta),
      "world_vector" => Some(&self.world_vector),
      _ => None,
    }
  }
}

/// One timestep of a robot trajectory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step {
  pub observation: Observation,
  pub action: Action,
  pub reward: f32,
  pub is_first: bool,
  pub is_last: bool,
  pub is_terminal: bool,
}
