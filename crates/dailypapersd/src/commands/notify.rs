//! Module for sending a day's notification.

use dailypapers::notify::{notify_first, TelegramNotifier};

use super::*;

/// Function for the [`Commands::Notify`] in the CLI.
pub async fn notify(cli: &Cli, options: DateOptions) -> Result<()> {
  let config = cli.load_config()?;
  let templates = Templates::from_config(&config.templates)?;
  let date = options.date();

  let papers = ArchiveWriter::new(&config.archive, &templates).load_snapshot(date)?;
  let notifier = TelegramNotifier::from_config(config.http_client()?, &config.notify)?;

  if notify_first(&notifier, &papers).await? {
    cli.reply(ResponseContent::Success(&format!("Sent \"{}\"", papers[0].title)))
  } else {
    cli.reply(ResponseContent::Info(&format!("No papers archived for {date}, nothing sent")))
  }
}
