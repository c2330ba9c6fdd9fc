use clap::Parser;
use log::{error, info, LevelFilter};
use log4rs::{
  append::console::ConsoleAppender,
  config::{Appender, Root},
  encode::pattern::PatternEncoder,
  Config,
};
use mio_extras::channel as mio_channel;
use rtx_recorder::{
  config::RecorderConfig,
  node::RecorderNode,
  recorder::StepRecorder,
  schema::DatasetConfig,
  writer::{CountingWriter, EpisodeWriter, FileBackendWriterBuilder},
  Error, Result,
};

fn main() {
  let config = RecorderConfig::parse();

  if let Err(e) = configure_logging(&config) {
    eprintln!("{}", e);
    std::process::exit(1);
  }

  if let Err(e) = run(&config) {
    error!("Recorder stopped: {}", e);
    std::process::exit(1);
  }
}

fn configure_logging(config: &RecorderConfig) -> Result<()> {
  match &config.log_config {
    Some(path) => log4rs::init_file(path, Default::default()).map_err(|e| Error::Config {
      reason: format!("log config {}: {}", path.display(), e),
    }),
    None => {
      let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
          "{d(%H:%M:%S%.3f)} {h({l})} {t} - {m}{n}",
        )))
        .build();
      let log_config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .map_err(|e| Error::Config {
          reason: e.to_string(),
        })?;
      log4rs::init_config(log_config).map_err(|e| Error::Config {
        reason: e.to_string(),
      })?;
      Ok(())
    }
  }
}

fn run(config: &RecorderConfig) -> Result<()> {
  config.validate()?;

  let (stop_sender, stop_receiver) = mio_channel::sync_channel::<()>(1);
  ctrlc::set_handler(move || {
    // ignore errors, as we are quitting anyway
    stop_sender.try_send(()).unwrap_or(());
  })
  .map_err(|e| Error::Config {
    reason: format!("cannot install Ctrl-C handler: {}", e),
  })?;

  let ds_config = DatasetConfig::rt_x(&config.dataset_name);
  let writer: Box<dyn EpisodeWriter> = if config.dry_run {
    info!("Dry run, episodes are counted and not written.");
    Box::new(CountingWriter::new())
  } else {
    Box::new(
      FileBackendWriterBuilder::new(ds_config.clone())
        .data_directory(&config.data_dir)
        .split_name(&config.split)
        .max_episodes_per_file(config.max_episodes_per_file)
        .build()?,
    )
  };
  let mut recorder = StepRecorder::new(ds_config, writer);

  let mut node = RecorderNode::new(config)?;
  info!("Press Ctrl-C to quit.");
  let spin_result = node.spin(&mut recorder, &stop_receiver);
  node.shutdown();

  // flush the open episode even if spinning failed
  let finish_result = recorder.finish().map(|_| ());
  spin_result.and(finish_result)
}
