use super::*;

const PACING: Duration = Duration::from_secs(30);

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_missing_pdf_does_not_stop_the_batch() -> TestResult<()> {
  let dir = tempdir()?;
  let templates = Templates::new()?;
  let retriever = FakeRetriever::missing(&["2401.00002"]);
  let summarizer = StructuredSummarizer::new(ScriptedModel::new());

  let mut papers = parse_listing(&listing_fixture(), &ListingConfig::default())?;
  let start = tokio::time::Instant::now();
  let report = Orchestrator::new(&retriever, &summarizer, &templates)
    .with_scratch_path(scratch_path(&dir))
    .with_pacing(PACING)
    .enrich(&mut papers)
    .await;

  assert_eq!(retriever.requested(), ["2401.00001", "2401.00002", "2401.00003"]);
  assert!(start.elapsed() >= PACING * 3);

  assert_eq!(papers[1].category, "");
  assert_eq!(papers[1].summary, "");
  assert_eq!(papers[2].summary, "Summary of 2401.00003.");
  assert!(matches!(report.outcome("2401.00002"), Some(PaperOutcome::Skipped { reason }) if reason.contains("404")));
  assert!(logs_contain("Failed to summarize \"Vision Transformers Need Registers | Revisited\" (2401.00002)"));
  Ok(())
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_non_json_output_degrades_to_empty_summary() -> TestResult<()> {
  let dir = tempdir()?;
  let templates = Templates::new()?;
  let retriever = FakeRetriever::default();
  let summarizer = StructuredSummarizer::new(
    ScriptedModel::new().with_output("2401.00001", "I'm sorry, I can't read this PDF."),
  );

  let mut papers = vec![PaperRecord::new("2401.00001", "Unreadable", vec![])?];
  let report = Orchestrator::new(&retriever, &summarizer, &templates)
    .with_scratch_path(scratch_path(&dir))
    .with_pacing(PACING)
    .enrich(&mut papers)
    .await;

  assert_eq!(report.outcome("2401.00001"), Some(&PaperOutcome::Summarized));
  assert_eq!((papers[0].category.as_str(), papers[0].summary.as_str()), ("", ""));
  assert!(logs_contain("Unable to load in json"));
  Ok(())
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_service_failure_is_isolated() -> TestResult<()> {
  let dir = tempdir()?;
  let templates = Templates::new()?;
  let retriever = FakeRetriever::default();
  let summarizer = StructuredSummarizer::new(
    ScriptedModel::new().with_failure("2401.00001", "generateContent returned 429 Too Many Requests"),
  );

  let mut papers = parse_listing(&listing_fixture(), &ListingConfig::default())?;
  let report = Orchestrator::new(&retriever, &summarizer, &templates)
    .with_scratch_path(scratch_path(&dir))
    .with_pacing(PACING)
    .enrich(&mut papers)
    .await;

  assert_eq!(report.skipped(), 1);
  assert_eq!(report.summarized(), 2);
  assert!(!papers[0].is_summarized());
  assert!(papers[1].is_summarized());
  assert!(!scratch_path(&dir).exists());
  Ok(())
}

#[traced_test]
#[tokio::test(start_paused = true)]
async fn test_full_day_is_archived_and_announced() -> TestResult<()> {
  let dir = tempdir()?;
  let (archive_config, _archive_dir) = temp_archive();
  let templates = Templates::new()?;
  let retriever = FakeRetriever::missing(&["2401.00003"]);
  let summarizer = StructuredSummarizer::new(ScriptedModel::new());

  let mut papers = parse_listing(&listing_fixture(), &ListingConfig::default())?;
  Orchestrator::new(&retriever, &summarizer, &templates)
    .with_scratch_path(scratch_path(&dir))
    .with_pacing(PACING)
    .enrich(&mut papers)
    .await;

  let writer = ArchiveWriter::new(&archive_config, &templates);
  let paths = writer.write(date(2), &papers)?;

  let digest = fs::read_to_string(&paths.digest)?;
  assert!(digest.starts_with("# Daily Papers"));
  assert!(digest.contains("2024--01--02"));
  assert!(digest.contains("Vision Transformers Need Registers \\| Revisited"));
  // The paper without a PDF is still listed, with empty generated columns.
  assert!(digest.contains(
    "| Direct Preference Optimization at Scale (Read more on [arXiv](https://arxiv.org/abs/2401.00003)) |  |  |  |"
  ));

  let snapshot = writer.load_snapshot(date(2))?;
  assert_eq!(snapshot, papers);
  assert_eq!(snapshot[2].category, "");

  let notifier = RecordingNotifier::default();
  assert!(dailypapers::notify::notify_first(&notifier, &snapshot).await?);
  let sent = notifier.sent.lock().unwrap();
  assert_eq!(
    sent[0],
    "*Scaling Laws for Sparse Mixtures*\n[arXiv](https://arxiv.org/abs/2401.00001)\n\nSummary of \
     2401\\.00001\\."
  );
  Ok(())
}
