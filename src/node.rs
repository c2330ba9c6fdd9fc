use std::fmt;

use log::{error, info, warn};
use mio::{Events, Poll, PollOpt, Ready, Token};
use mio_extras::channel as mio_channel;
use rustdds::{
  no_key, serialization::CDRDeserializerAdapter, DomainParticipant, RTPSEntity, TopicKind,
};

use crate::{
  config::RecorderConfig,
  error::{dds_error, Result},
  msg::{Step, StepTopic},
  recorder::StepRecorder,
  ros2::{
    builtin_datatypes::{Gid, NodeEntitiesInfo},
    RosParticipant,
  },
  writer::EpisodeWriter,
};

// reader wakeups are edge triggered, so a read error must not end the drain
// unless it keeps repeating
const MAX_CONSECUTIVE_READ_ERRORS: usize = 8;

/// DDS side of the recorder: one participant, one step reader, and the
/// node announcement.
pub struct RecorderNode {
  node_info: NodeEntitiesInfo,
  ros_participant: RosParticipant,
  step_reader: no_key::DataReader<Step, CDRDeserializerAdapter<Step>>,
  // held for as long as the reader lives
  _domain_participant: DomainParticipant,
}

impl RecorderNode {
  const STOP_TOKEN: Token = Token(0);
  const STEP_READER_TOKEN: Token = Token(1);

  pub fn new(config: &RecorderConfig) -> Result<RecorderNode> {
    let domain_participant = DomainParticipant::new(config.domain_id).map_err(dds_error)?;

    let topic_name = StepTopic::topic_name(&config.topic);
    let step_topic = domain_participant
      .create_topic(
        topic_name.clone(),
        StepTopic::type_name(),
        &StepTopic::get_qos(),
        TopicKind::NoKey,
      )
      .map_err(dds_error)?;
    let subscriber = domain_participant
      .create_subscriber(&StepTopic::get_qos())
      .map_err(dds_error)?;
    let step_reader = subscriber
      .create_datareader_no_key_cdr::<Step>(&step_topic, None)
      .map_err(dds_error)?;

    let mut ros_participant = RosParticipant::new(&domain_participant)?;
    let mut node_info = NodeEntitiesInfo::new(&config.namespace, &config.node_name);
    node_info.add_reader(Gid::from_guid(step_reader.guid()));
    ros_participant.add_node_info(node_info.clone());

    info!(
      "Node {} listening on {} (domain {})",
      node_info.get_full_name(),
      topic_name,
      config.domain_id
    );

    Ok(RecorderNode {
      node_info,
      ros_participant,
      step_reader,
      _domain_participant: domain_participant,
    })
  }

  /// Feeds every received step to `recorder` until something arrives on
  /// `stop_receiver`.
  ///
  /// Steps that cannot be converted or do not fit the dataset are logged and
  /// dropped. Writer I/O failures end the loop with an error.
  pub fn spin<W: EpisodeWriter>(
    &mut self,
    recorder: &mut StepRecorder<W>,
    stop_receiver: &mio_channel::Receiver<()>,
  ) -> Result<()> {
    let poll = Poll::new()?;
    poll.register(
      stop_receiver,
      RecorderNode::STOP_TOKEN,
      Ready::readable(),
      PollOpt::edge(),
    )?;
    poll.register(
      &self.step_reader,
      RecorderNode::STEP_READER_TOKEN,
      Ready::readable(),
      PollOpt::edge(),
    )?;

    let mut events = Events::with_capacity(16);
    loop {
      poll.poll(&mut events, None)?;

      for event in events.iter() {
        if event.token() == RecorderNode::STOP_TOKEN {
          if stop_receiver.try_recv().is_ok() {
            info!("Stop requested.");
            return Ok(());
          }
        } else if event.token() == RecorderNode::STEP_READER_TOKEN {
          self.drain_steps(recorder)?;
        } else {
          warn!("Unexpected event token {:?}", event.token());
        }
      }
    }
  }

  fn drain_steps<W: EpisodeWriter>(&mut self, recorder: &mut StepRecorder<W>) -> Result<()> {
    let reader = &mut self.step_reader;
    drain_samples(
      || reader.take_next_sample().map(|s| s.map(|s| s.into_value())),
      recorder,
    )
  }

  /// Withdraws the node from the ROS2 graph.
  pub fn shutdown(&mut self) {
    self.ros_participant.remove_node_info(&self.node_info);
    self.ros_participant.clear();
  }
}

// Feeds samples to `recorder` until `next_sample` runs dry.
fn drain_samples<W, E, F>(mut next_sample: F, recorder: &mut StepRecorder<W>) -> Result<()>
where
  W: EpisodeWriter,
  E: fmt::Debug,
  F: FnMut() -> std::result::Result<Option<Step>, E>,
{
  let mut read_errors = 0;
  loop {
    let step = match next_sample() {
      Ok(Some(step)) => {
        read_errors = 0;
        step
      }
      Ok(None) => return Ok(()),
      Err(e) => {
        read_errors += 1;
        error!("Failed to read step sample: {:?}", e);
        if read_errors >= MAX_CONSECUTIVE_READ_ERRORS {
          error!("{} read errors in a row, waiting for new data.", read_errors);
          return Ok(());
        }
        continue;
      }
    };
    match recorder.handle_step(&step) {
      Ok(()) => (),
      Err(e) if e.is_per_message() => error!("Dropping step: {}", e),
      Err(e) => return Err(e),
    }
  }
}
