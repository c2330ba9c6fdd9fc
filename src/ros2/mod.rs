//! The bits of ROS2 the recorder needs on top of plain DDS.
//!
//! ROS2 nodes are not DDS entities. A node becomes visible to the ROS2 graph
//! only when its participant publishes a `ParticipantEntitiesInfo` sample on
//! `ros_discovery_info` listing the node together with the gids of its
//! readers and writers.
//!
//! ```no_run
//! use rustdds::DomainParticipant;
//! use rtx_recorder::ros2::{builtin_datatypes::NodeEntitiesInfo, RosParticipant};
//!
//! let domain_participant = DomainParticipant::new(0).unwrap();
//! let mut ros_participant = RosParticipant::new(&domain_participant).unwrap();
//!
//! // announce, then retract on the way out
//! let node_info = NodeEntitiesInfo::new("/", "some_node");
//! ros_participant.add_node_info(node_info.clone());
//! ros_participant.remove_node_info(&node_info);
//! ```

/// Some builtin datatypes needed for ROS2 communication
pub mod builtin_datatypes;
/// Some convenience topic infos for ROS2 communication
pub mod builtin_topics;

pub(crate) mod ros_node;

pub use ros_node::*;
