//! Structured summaries on top of a [`GenerativeModel`].
//!
//! The model is asked for JSON with exactly a `category` and a `summary`, but its output is
//! treated as untrusted text. Anything that does not parse into that shape degrades to
//! [`Summary::default`] (both fields empty) with a warning logged; it never becomes an `Err`.
//! Transport and service failures, on the other hand, do propagate so the orchestrator can
//! account for them.

use super::*;
use crate::llm::GenerativeModel;

/// The two-field structured result of summarizing one paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
  /// Short classification, e.g. "Natural Language Processing"
  pub category: String,
  /// Free-text summary
  pub summary:  String,
}

/// Produces a [`Summary`] for a paper from a prompt and its document.
#[async_trait]
pub trait Summarizer: Send + Sync {
  /// Summarizes the document at `document` as instructed by `prompt`.
  ///
  /// No retry happens here; a failed call is reported once and the caller decides what to do.
  async fn summarize(&self, prompt: &str, document: &Path) -> Result<Summary>;
}

/// [`Summarizer`] that parses a model's schema-constrained output.
///
/// # Examples
///
/// ```no_run
/// use dailypapers::{
///   config::SummarizerConfig, llm::GeminiClient, prelude::*, summarizer::StructuredSummarizer,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let model = GeminiClient::from_config(reqwest::Client::new(), &SummarizerConfig::default())?;
/// let summarizer = StructuredSummarizer::new(model);
/// let summary = summarizer.summarize("Summarise \"Attention\".", "scratch.pdf".as_ref()).await?;
/// println!("{}: {}", summary.category, summary.summary);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StructuredSummarizer<M> {
  /// Underlying model
  model: M,
}

impl<M: GenerativeModel> StructuredSummarizer<M> {
  /// Wraps a model.
  pub fn new(model: M) -> Self { Self { model } }

  /// The wrapped model.
  pub fn model(&self) -> &M { &self.model }
}

#[async_trait]
impl<M: GenerativeModel> Summarizer for StructuredSummarizer<M> {
  async fn summarize(&self, prompt: &str, document: &Path) -> Result<Summary> {
    let text = self.model.generate(prompt, document).await?;
    Ok(parse_summary(&text))
  }
}

/// Parses model output into a [`Summary`], falling back to an empty one.
///
/// ```
/// use dailypapers::summarizer::{parse_summary, Summary};
///
/// let summary = parse_summary(r#"{"category": "Robotics", "summary": "A robot."}"#);
/// assert_eq!(summary.category, "Robotics");
///
/// assert_eq!(parse_summary("Sure! Here is a summary..."), Summary::default());
/// ```
pub fn parse_summary(text: &str) -> Summary {
  match serde_json::from_str::<Summary>(strip_code_fence(text)) {
    Ok(summary) => summary,
    Err(e) => {
      warn!("Unable to load in json: {e}");
      trace!("Unparseable model output: {text:?}");
      Summary::default()
    },
  }
}

/// Removes a surrounding Markdown code fence, which some models add even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
  let trimmed = text.trim();
  let Some(inner) = trimmed.strip_prefix("```") else {
    return trimmed;
  };
  let inner = inner.strip_prefix("json").unwrap_or(inner);
  inner.strip_suffix("```").unwrap_or(inner).trim()
}
