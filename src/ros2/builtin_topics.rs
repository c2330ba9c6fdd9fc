use rustdds::{
  policy::{Durability, History, Reliability},
  Duration, QosPolicies, QosPolicyBuilder,
};

pub struct ROSDiscoveryTopic {}

impl ROSDiscoveryTopic {
  pub fn topic_name() -> String {
    String::from("ros_discovery_info")
  }

  pub fn type_name() -> String {
    String::from("rmw_dds_common::msg::dds_::ParticipantEntitiesInfo_")
  }

  pub fn get_qos() -> QosPolicies {
    QosPolicyBuilder::new()
      .durability(Durability::TransientLocal)
      .reliability(Reliability::Reliable {
        max_blocking_time: Duration::from_millis(100),
      })
      .history(History::KeepLast { depth: 1 })
      .build()
  }
}
