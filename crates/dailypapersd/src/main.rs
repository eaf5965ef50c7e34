//! Command line front end for the dailypapers pipeline.
//!
//! The binary is meant to be run once a day by a scheduler, but every stage can also be run by
//! hand:
//!
//! ```bash
//! # Write a configuration file and editable templates to the current directory
//! dailypapers init
//!
//! # Show what is on today's listing without summarizing anything
//! dailypapers list
//!
//! # Fetch, summarize, archive and notify
//! dailypapers run
//!
//! # Regenerate README.md from the archive
//! dailypapers rebuild
//!
//! # Re-send the notification for a given day
//! dailypapers notify --date 2024-01-02
//! ```
//!
//! Logging goes to stderr at a level chosen with `-v` (or `RUST_LOG`), and additionally to a
//! daily rolling file when `--log-dir` is given.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use dailypapers::{
  archive::ArchiveWriter, config::Config, error::DailyPapersError, paper::PaperRecord,
  template::Templates,
};
use tracing::{debug, info, trace, warn};
use tracing_appender::{
  non_blocking::WorkerGuard,
  rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Harvest, summarize and archive the daily research paper listing")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. Defaults to `dailypapers.toml` in the working directory;
  /// built-in defaults are used if the file does not exist.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// Directory for daily rolling log files, in addition to stderr
  #[arg(long, global = true)]
  log_dir: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and proceed (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// Configuration file location.
  pub fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }

  /// Loads the configuration, falling back to defaults if the file is absent.
  pub fn load_config(&self) -> Result<Config> { Ok(Config::load_or_default(self.config_path())?) }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: warn (default)
/// - 1: info
/// - 2: debug
/// - 3+: trace
///
/// `RUST_LOG` takes precedence when set. The returned guard flushes the log file on drop and
/// must live as long as the program.
fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let stderr_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true);

  let (file_layer, guard) = match log_dir {
    Some(dir) => {
      let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("dailypapers")
        .filename_suffix("log")
        .build(dir)?;
      let (writer, guard) = tracing_appender::non_blocking(appender);
      let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
      (Some(layer), Some(guard))
    },
    None => (None, None),
  };

  tracing_subscriber::registry().with(filter).with(stderr_layer).with(file_layer).try_init()?;
  Ok(guard)
}

/// Entry point for the dailypapers CLI application
///
/// # Errors
///
/// Returns [`DailyPapersdError`] when a run-fatal failure occurs: the listing cannot be fetched,
/// configuration or credentials are unusable, or the archive cannot be written.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let _guard = setup_logging(cli.verbose, cli.log_dir.as_deref())?;
  trace!("Parsed command line");

  let result = match cli.command.clone() {
    Commands::Init(options) => init(&cli, options).await,
    Commands::List => list(&cli).await,
    Commands::Run(options) => run(&cli, options).await,
    Commands::Rebuild(options) => rebuild(&cli, options).await,
    Commands::Notify(options) => notify(&cli, options).await,
  };

  if let Err(e) = &result {
    report_error(e);
  }
  result
}
