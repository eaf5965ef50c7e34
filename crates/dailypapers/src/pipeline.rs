//! Sequential, paced enrichment of listing records.
//!
//! The [`Orchestrator`] walks the records one at a time: render the prompt, fetch the PDF to the
//! scratch path, summarize, merge. A failure in any of those steps only costs that one paper its
//! summary. The error is logged with the paper's title and identifier, the record keeps its empty
//! `category` and `summary`, and the loop moves on. Nothing is retried.
//!
//! After every paper, whatever its outcome, the orchestrator sleeps for the configured pacing
//! delay to stay under the summarization service's rate limit.

use super::*;
use crate::{
  pdf::{self, DocumentRetriever},
  summarizer::{Summarizer, Summary},
};

/// Default delay between papers.
pub const DEFAULT_PACING: Duration = Duration::from_secs(30);

/// What happened to a single paper during enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperOutcome {
  /// The summarizer returned a result, possibly the empty fallback
  Summarized,
  /// A step failed and the record was left unsummarized
  Skipped {
    /// Rendered error that caused the skip
    reason: String,
  },
}

/// Per-paper outcomes of one enrichment batch, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
  /// `(identifier, outcome)` pairs
  pub outcomes: Vec<(String, PaperOutcome)>,
}

impl EnrichmentReport {
  /// Number of papers the summarizer handled.
  pub fn summarized(&self) -> usize {
    self.outcomes.iter().filter(|(_, outcome)| *outcome == PaperOutcome::Summarized).count()
  }

  /// Number of papers left without a summary because a step failed.
  pub fn skipped(&self) -> usize { self.outcomes.len() - self.summarized() }

  /// Outcome recorded for an identifier.
  pub fn outcome(&self, identifier: &str) -> Option<&PaperOutcome> {
    self.outcomes.iter().find(|(id, _)| id == identifier).map(|(_, outcome)| outcome)
  }
}

/// Drives document retrieval and summarization over a batch of records.
///
/// # Examples
///
/// ```no_run
/// use dailypapers::{
///   config::Config, llm::GeminiClient, pdf::ArxivPdfRetriever, pipeline::Orchestrator,
///   summarizer::StructuredSummarizer, template::Templates,
/// };
///
/// # async fn example(
/// #   mut papers: Vec<dailypapers::paper::PaperRecord>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let client = config.http_client()?;
/// let templates = Templates::new()?;
/// let retriever = ArxivPdfRetriever::new(client.clone());
/// let summarizer = StructuredSummarizer::new(GeminiClient::from_config(client, &config.summarizer)?);
///
/// let report = Orchestrator::new(&retriever, &summarizer, &templates)
///   .with_scratch_path(&config.scratch_path)
///   .enrich(&mut papers)
///   .await;
/// println!("{} summarized, {} skipped", report.summarized(), report.skipped());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator<'a, R, S> {
  /// Document source
  retriever:  &'a R,
  /// Summary source
  summarizer: &'a S,
  /// Prompt template
  templates:  &'a Templates,
  /// Where each paper's document is written before summarization
  scratch:    PathBuf,
  /// Delay after every paper
  pacing:     Duration,
}

impl<'a, R: DocumentRetriever, S: Summarizer> Orchestrator<'a, R, S> {
  /// Creates an orchestrator with the default pacing and a scratch file in the temp directory.
  pub fn new(retriever: &'a R, summarizer: &'a S, templates: &'a Templates) -> Self {
    Self {
      retriever,
      summarizer,
      templates,
      scratch: std::env::temp_dir().join("dailypapers-scratch.pdf"),
      pacing: DEFAULT_PACING,
    }
  }

  /// Sets the scratch document location.
  pub fn with_scratch_path(mut self, path: impl AsRef<Path>) -> Self {
    self.scratch = path.as_ref().to_path_buf();
    self
  }

  /// Sets the delay inserted after every paper.
  pub fn with_pacing(mut self, pacing: Duration) -> Self {
    self.pacing = pacing;
    self
  }

  /// Enriches every record in place, strictly in order.
  ///
  /// Never fails: per-paper errors are logged and reported in the returned
  /// [`EnrichmentReport`].
  pub async fn enrich(&self, papers: &mut [PaperRecord]) -> EnrichmentReport {
    info!("Summarizing {} papers with {:?} pacing", papers.len(), self.pacing);
    let total = papers.len();
    let mut report = EnrichmentReport::default();

    for (index, paper) in papers.iter_mut().enumerate() {
      debug!("Paper {}/{total}: {paper}", index + 1);
      let outcome = match self.enrich_one(paper).await {
        Ok(summary) => {
          paper.apply_summary(summary);
          PaperOutcome::Summarized
        },
        Err(e) => {
          warn!("Failed to summarize \"{}\" ({}): {e}", paper.title, paper.id);
          PaperOutcome::Skipped { reason: e.to_string() }
        },
      };
      report.outcomes.push((paper.id.clone(), outcome));

      trace!("Sleeping {:?} before the next paper", self.pacing);
      tokio::time::sleep(self.pacing).await;
    }

    if let Err(e) = pdf::remove_stale(&self.scratch).await {
      warn!("Could not remove scratch document {}: {e}", self.scratch.display());
    }

    info!("Summarized {} papers, skipped {}", report.summarized(), report.skipped());
    report
  }

  /// Runs every step for one paper.
  #[instrument(skip(self, paper), fields(id = %paper.id), level = "debug")]
  async fn enrich_one(&self, paper: &PaperRecord) -> Result<Summary> {
    let prompt = self.templates.render_prompt(&paper.title)?;
    self.retriever.retrieve(&paper.id, &self.scratch).await?;
    self.summarizer.summarize(&prompt, &self.scratch).await
  }
}
