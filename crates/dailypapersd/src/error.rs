//! Error types for the dailypapers command line.

use thiserror::Error;

/// Error type alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, DailyPapersdError>;

/// Errors that end a CLI invocation.
#[derive(Error, Debug)]
pub enum DailyPapersdError {
  /// An error from the pipeline library.
  #[error(transparent)]
  DailyPapers(#[from] dailypapers::error::DailyPapersError),

  /// A file system operation performed by the CLI itself failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// An interactive prompt could not be shown or answered.
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// The rolling log file could not be set up.
  #[error(transparent)]
  Logging(#[from] tracing_appender::rolling::InitError),

  /// Logging was already initialised.
  #[error(transparent)]
  Subscriber(#[from] tracing_subscriber::util::TryInitError),
}
