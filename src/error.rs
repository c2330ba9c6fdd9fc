use std::{
  fmt::{self, Display},
  result,
};

/// This is a specialized Result, similar to std::io::Result
pub type Result<T> = result::Result<T, Error>;

/// Everything that can go wrong between a received step message and the
/// dataset on disk.
#[derive(Debug)]
pub enum Error {
  /// The DDS layer refused to create an entity or failed to read / write.
  Dds { reason: String },
  /// The message does not carry a field the dataset schema asks for.
  MissingField { message: &'static str, field: String },
  /// A step does not conform to the declared dataset features.
  SchemaMismatch { feature: String, reason: String },
  /// Writing dataset files failed.
  Io(std::io::Error),
  /// A record could not be encoded for the backend.
  Serialization { reason: String },
  /// Invalid configuration value.
  Config { reason: String },
}

impl Error {
  pub fn schema_mismatch<T>(feature: &str, reason: &str) -> Result<T> {
    Err(Error::SchemaMismatch {
      feature: feature.to_string(),
      reason: reason.to_string(),
    })
  }

  pub fn config<T>(reason: &str) -> Result<T> {
    Err(Error::Config {
      reason: reason.to_string(),
    })
  }

  /// Errors that concern a single message only. The node keeps running after
  /// these; anything else stops it.
  pub fn is_per_message(&self) -> bool {
    matches!(
      self,
      Error::MissingField { .. } | Error::SchemaMismatch { .. } | Error::Serialization { .. }
    )
  }
}

impl Display for Error {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Error::Dds { reason } => write!(formatter, "DDS error: {}", reason),
      Error::MissingField { message, field } => {
        write!(formatter, "{} message has no field '{}'", message, field)
      }
      Error::SchemaMismatch { feature, reason } => {
        write!(formatter, "feature '{}' does not match schema: {}", feature, reason)
      }
      Error::Io(e) => write!(formatter, "io::Error: {}", e),
      Error::Serialization { reason } => write!(formatter, "serialization failed: {}", reason),
      Error::Config { reason } => write!(formatter, "bad configuration: {}", reason),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Error::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<std::io::Error> for Error {
  fn from(ioerr: std::io::Error) -> Error {
    Error::Io(ioerr)
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Error {
    Error::Serialization {
      reason: e.to_string(),
    }
  }
}

/// Maps any `rustdds` error into [`Error::Dds`], keeping its debug text.
pub(crate) fn dds_error<E: fmt::Debug>(e: E) -> Error {
  Error::Dds {
    reason: format!("{:?}", e),
  }
}
