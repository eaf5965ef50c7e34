//! Module for the full daily run.

use dailypapers::{
  listing::ListingFetcher,
  llm::GeminiClient,
  notify::{notify_first, TelegramNotifier},
  pdf::ArxivPdfRetriever,
  pipeline::Orchestrator,
  summarizer::StructuredSummarizer,
};

use super::*;

/// Options for [`Commands::Run`].
#[derive(Args, Clone)]
pub struct RunOptions {
  /// Shared day selection
  #[command(flatten)]
  pub day: DateOptions,

  /// Skip the channel notification even if it is enabled in the configuration
  #[arg(long)]
  pub no_notify: bool,
}

/// Function for the [`Commands::Run`] in the CLI.
pub async fn run(cli: &Cli, options: RunOptions) -> Result<()> {
  let config = cli.load_config()?;
  let date = options.day.date();
  let templates = Templates::from_config(&config.templates)?;
  let writer = ArchiveWriter::new(&config.archive, &templates);

  if writer.exists(date)
    && !cli.confirm(&format!("An archive entry for {date} already exists, replace it?"), false)?
  {
    cli.reply(ResponseContent::Info(&format!("Keeping the existing entry for {date}")))?;
    return Ok(());
  }

  // Credentials are checked before any network traffic.
  let client = config.http_client()?;
  let summarizer = StructuredSummarizer::new(GeminiClient::from_config(client.clone(), &config.summarizer)?);
  let retriever = ArxivPdfRetriever::new(client.clone());

  cli.reply(ResponseContent::Working(&format!("Fetching {}", config.listing.url)))?;
  let mut papers = ListingFetcher::new(client, &config.listing).fetch().await?;
  if papers.is_empty() {
    cli.reply(ResponseContent::Warning("The listing has no papers, archiving an empty day"))?;
  }

  cli.reply(ResponseContent::Working(&format!(
    "Summarizing {} papers, one every {} seconds",
    papers.len(),
    config.summarizer.pacing_secs
  )))?;
  let report = Orchestrator::new(&retriever, &summarizer, &templates)
    .with_scratch_path(&config.scratch_path)
    .with_pacing(config.summarizer.pacing())
    .enrich(&mut papers)
    .await;
  if report.skipped() > 0 {
    cli.reply(ResponseContent::Warning(&format!(
      "{} of {} papers could not be summarized",
      report.skipped(),
      papers.len()
    )))?;
  }

  let paths = writer.write(date, &papers)?;
  info!("Archived {date} to {}", paths.snapshot.display());
  cli.reply(ResponseContent::Success(&format!(
    "Archived {} papers for {date} and updated {}",
    papers.len(),
    paths.digest.display()
  )))?;

  if options.no_notify || !config.notify.enabled {
    debug!("Notification disabled");
    return Ok(());
  }

  // The archive is already written; a failed notification does not fail the run.
  if let Err(e) = send_notification(&config, &writer, date).await {
    warn!("Notification failed: {e}");
    cli.reply(ResponseContent::Warning(&format!("Notification failed: {e}")))?;
  }
  Ok(())
}

/// Sends the first archived paper of `date`.
async fn send_notification(
  config: &Config,
  writer: &ArchiveWriter<'_>,
  date: NaiveDate,
) -> std::result::Result<bool, DailyPapersError> {
  let papers = writer.load_snapshot(date)?;
  let notifier = TelegramNotifier::from_config(config.http_client()?, &config.notify)?;
  notify_first(&notifier, &papers).await
}
