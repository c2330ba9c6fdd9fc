use rustdds::GUID;
use serde::{Deserialize, Serialize};

/// ROS2 global id of an entity. `rmw_dds_common/Gid` is 24 bytes; a DDS GUID
/// fills the first 16, the rest stays zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Gid {
  data: [u8; 24],
}

impl Gid {
  pub fn from_guid(guid: GUID) -> Gid {
    let mut data: [u8; 24] = [0; 24];
    data[..16].clone_from_slice(&guid.to_bytes());
    Gid { data }
  }

  pub fn as_bytes(&self) -> &[u8; 24] {
    &self.data
  }
}

/// `rmw_dds_common/NodeEntitiesInfo`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeEntitiesInfo {
  pub node_namespace: String,
  pub node_name: String,
  pub reader_gid_seq: Vec<Gid>,
  pub writer_gid_seq: Vec<Gid>,
}

impl NodeEntitiesInfo {
  pub fn new(namespace: &str, name: &str) -> NodeEntitiesInfo {
    NodeEntitiesInfo {
      node_namespace: namespace.to_string(),
      node_name: name.to_string(),
      reader_gid_seq: Vec::new(),
      writer_gid_seq: Vec::new(),
    }
  }

  pub fn get_full_name(&self) -> String {
    let mut name = self.node_namespace.to_owned();
    if !name.ends_with('/') {
      name.push('/');
    }
    name.push_str(&self.node_name);
    name
  }

  pub fn add_reader(&mut self, gid: Gid) {
    if !self.reader_gid_seq.contains(&gid) {
      self.reader_gid_seq.push(gid);
    }
  }

  pub fn add_writer(&mut self, gid: Gid) {
    if !self.writer_gid_seq.contains(&gid) {
      self.writer_gid_seq.push(gid);
    }
  }
}

/// `rmw_dds_common/ParticipantEntitiesInfo`, what goes out on
/// `ros_discovery_info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantEntitiesInfo {
  gid: Gid,
  node_entities_info_seq: Vec<NodeEntitiesInfo>,
}

impl ParticipantEntitiesInfo {
  pub fn new(gid: Gid, nodes: Vec<NodeEntitiesInfo>) -> ParticipantEntitiesInfo {
    ParticipantEntitiesInfo {
      gid,
      node_entities_info_seq: nodes,
    }
  }

  pub fn gid(&self) -> Gid {
    self.gid
  }

  pub fn nodes(&self) -> &[NodeEntitiesInfo] {
    &self.node_entities_info_seq
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_name_joins_namespace() {
    assert_eq!(
      NodeEntitiesInfo::new("/", "rt_x_recorder").get_full_name(),
      "/rt_x_recorder"
    );
    assert_eq!(
      NodeEntitiesInfo::new("/lab", "rt_x_recorder").get_full_name(),
      "/lab/rt_x_recorder"
    );
  }

  #[test]
  fn gids_are_not_duplicated() {
    let mut info = NodeEntitiesInfo::new("/", "n");
    let gid = Gid::from_guid(GUID::GUID_UNKNOWN);
    info.add_reader(gid);
    info.add_reader(gid);
    info.add_writer(gid);
    assert_eq!(info.reader_gid_seq.len(), 1);
    assert_eq!(info.writer_gid_seq.len(), 1);
    assert_eq!(gid.as_bytes()[16..], [0u8; 8]);
  }
}
