//! A ROS2 node that records RT-X trajectory steps into an episodic dataset.
//!
//! Each `fogros2_rt_x_msgs/Step` message received over DDS is translated into
//! an RLDS style step (observation, action, reward, discount and episode
//! boundary flags) and handed to an [`EpisodeWriter`](writer::EpisodeWriter).
//! A message with `is_first` set starts a new episode.
//!
//! # Example
//!
//! ```
//! use rtx_recorder::{
//!   msg::Step, recorder::StepRecorder, schema::DatasetConfig, writer::MemoryWriter,
//! };
//!
//! let mut step = Step::default();
//! step.observation.natural_language_embedding = vec![0.0; 512];
//! step.observation.state = vec![0.0; 7];
//! step.action.rotation_delta = vec![0.0; 3];
//! step.action.world_vector = vec![0.0; 3];
//! step.is_first = true;
//!
//! let mut recorder = StepRecorder::new(DatasetConfig::rt_x("bridge"), MemoryWriter::new());
//! recorder.handle_step(&step).unwrap();
//! assert_eq!(recorder.writer().new_episode_flags(), &[true]);
//! ```

pub mod adapter;
pub mod config;
pub mod env;
pub mod error;
pub mod msg;
pub mod node;
pub mod recorder;
pub mod ros2;
pub mod schema;
pub mod step;
pub mod writer;

pub use error::{Error, Result};
