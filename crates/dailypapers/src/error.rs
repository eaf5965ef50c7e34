//! Error types for the dailypapers library.
//!
//! Failures fall into three groups, and callers are expected to treat them differently:
//! - Run-fatal: the listing cannot be fetched or parsed, configuration is unusable, or the
//!   archive cannot be written
//! - Per-paper: a download or summarization request failed; the pipeline logs it and moves on
//! - Silent: malformed structured output never surfaces as an error at all, it degrades to an
//!   empty [`Summary`](crate::summarizer::Summary)
//!
//! # Examples
//!
//! ```
//! use dailypapers::{error::DailyPapersError, paper::PaperRecord};
//!
//! let result = PaperRecord::new("2401.00001", "   ", vec![]);
//! assert!(matches!(result, Err(DailyPapersError::InvalidRecord(_))));
//! ```

use thiserror::Error;

/// Error type alias used for the [`dailypapers`](crate) crate.
pub type Result<T> = core::result::Result<T, DailyPapersError>;

/// Errors that can occur while harvesting, summarizing or archiving papers.
#[derive(Error, Debug)]
pub enum DailyPapersError {
  /// A paper record could not be constructed because a required field was missing.
  ///
  /// Records need a non-blank identifier and title; the string names the missing field.
  #[error("Invalid paper record: {0}")]
  InvalidRecord(String),

  /// A network request failed.
  ///
  /// This covers connection failures, TLS errors and transport timeouts.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A paper's PDF could not be downloaded.
  ///
  /// Raised when the document host answers with a non-success status. The orchestrator treats
  /// this as a per-paper failure.
  #[error("Failed to download PDF for {identifier}: {status}")]
  DownloadFailed {
    /// Identifier of the paper whose document was requested
    identifier: String,
    /// Status code returned by the document host
    status:     reqwest::StatusCode,
  },

  /// An external API returned an error response.
  ///
  /// The string carries the status and response body for debugging.
  #[error("API error: {0}")]
  ApiError(String),

  /// The listing page did not contain anything that looks like a paper listing.
  #[error("Listing page could not be parsed: {0}")]
  ListingUnparseable(String),

  /// A credential expected in the environment was not set.
  ///
  /// The string is the name of the environment variable that was consulted.
  #[error("Missing credential: environment variable `{0}` is not set")]
  MissingCredential(String),

  /// A template failed to compile or render.
  #[error(transparent)]
  Template(#[from] minijinja::Error),

  /// JSON (de)serialization of an archive snapshot failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A file system operation failed.
  ///
  /// This occurs when reading templates, writing the scratch document, or writing the archive
  /// and digest.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The configuration file is not valid TOML for [`Config`](crate::config::Config).
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A date string did not match `YYYY-MM-DD`.
  #[error(transparent)]
  InvalidDate(#[from] chrono::ParseError),

  /// An archive glob pattern was malformed.
  #[error(transparent)]
  Glob(#[from] glob::PatternError),

  /// The configuration is well-formed TOML but semantically unusable.
  #[error("{0}")]
  Config(String),
}
