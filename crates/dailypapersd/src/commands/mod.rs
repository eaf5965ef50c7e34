use super::*;

pub mod init;
pub mod list;
pub mod notify;
pub mod rebuild;
pub mod run;

pub use init::init;
pub use list::list;
pub use notify::notify;
pub use rebuild::rebuild;
pub use run::run;

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file and the default templates next to it
  Init(init::InitOptions),

  /// Fetch today's listing and print the papers on it
  List,

  /// Fetch, summarize, archive and notify for one day
  Run(run::RunOptions),

  /// Regenerate the digest from the archive
  Rebuild(DateOptions),

  /// Send the first paper of an archived day to the configured channel
  Notify(DateOptions),
}

/// Selects the day a command works on.
#[derive(Args, Clone)]
pub struct DateOptions {
  /// Day to work on, as YYYY-MM-DD. Defaults to today in local time.
  #[arg(long)]
  pub date: Option<NaiveDate>,
}

impl DateOptions {
  /// The selected day.
  pub fn date(&self) -> NaiveDate { self.date.unwrap_or_else(|| Local::now().date_naive()) }
}
