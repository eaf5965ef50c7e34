//! Module for previewing the listing.

use dailypapers::listing::ListingFetcher;

use super::*;

/// Function for the [`Commands::List`] in the CLI.
pub async fn list(cli: &Cli) -> Result<()> {
  let config = cli.load_config()?;
  let client = config.http_client()?;

  cli.reply(ResponseContent::Working(&format!("Fetching {}", config.listing.url)))?;
  let papers = ListingFetcher::new(client, &config.listing).fetch().await?;

  if papers.is_empty() {
    cli.reply(ResponseContent::Info("The listing has no papers today"))
  } else {
    cli.reply(ResponseContent::Papers(&papers))
  }
}
