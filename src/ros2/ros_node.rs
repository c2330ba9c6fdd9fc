use std::collections::HashMap;

use log::{debug, error};
use rustdds::{
  no_key, serialization::CDRSerializerAdapter, DomainParticipant, RTPSEntity, TopicKind,
};

use super::{
  builtin_datatypes::{Gid, NodeEntitiesInfo, ParticipantEntitiesInfo},
  builtin_topics::ROSDiscoveryTopic,
};
use crate::error::{dds_error, Result};

/// Announces the nodes of this process on `ros_discovery_info`, which is how
/// `ros2 node list` and friends find them.
pub struct RosParticipant {
  gid: Gid,
  nodes: HashMap<String, NodeEntitiesInfo>,
  node_writer:
    no_key::DataWriter<ParticipantEntitiesInfo, CDRSerializerAdapter<ParticipantEntitiesInfo>>,
}

impl RosParticipant {
  pub fn new(domain_participant: &DomainParticipant) -> Result<RosParticipant> {
    let qos = ROSDiscoveryTopic::get_qos();
    let topic = domain_participant
      .create_topic(
        ROSDiscoveryTopic::topic_name(),
        ROSDiscoveryTopic::type_name(),
        &qos,
        TopicKind::NoKey,
      )
      .map_err(dds_error)?;
    let publisher = domain_participant
      .create_publisher(&qos)
      .map_err(dds_error)?;
    let node_writer = publisher
      .create_datawriter_no_key_cdr::<ParticipantEntitiesInfo>(&topic, None)
      .map_err(dds_error)?;

    Ok(RosParticipant {
      gid: Gid::from_guid(domain_participant.guid()),
      nodes: HashMap::new(),
      node_writer,
    })
  }

  pub fn get_ros_participant_info(&self) -> ParticipantEntitiesInfo {
    ParticipantEntitiesInfo::new(self.gid, self.nodes.values().cloned().collect())
  }

  pub fn add_node_info(&mut self, mut node_info: NodeEntitiesInfo) {
    node_info.add_writer(Gid::from_guid(self.node_writer.guid()));

    match self.nodes.insert(node_info.get_full_name(), node_info) {
      Some(_) => (),
      None => self.write_info(),
    }
  }

  pub fn remove_node_info(&mut self, node_info: &NodeEntitiesInfo) {
    if self.nodes.remove(&node_info.get_full_name()).is_some() {
      self.write_info()
    }
  }

  pub fn clear(&mut self) {
    if !self.nodes.is_empty() {
      self.nodes.clear();
      self.write_info()
    }
  }

  fn write_info(&self) {
    debug!("Announcing {} node(s) on ros_discovery_info", self.nodes.len());
    match self.node_writer.write(self.get_ros_participant_info(), None) {
      Ok(_) => (),
      Err(e) => error!("Failed to write into node_writer {:?}", e),
    }
  }
}
