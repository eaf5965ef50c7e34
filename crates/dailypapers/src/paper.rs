//! Core paper record type.
//!
//! A [`PaperRecord`] is born in the listing extractor with only its identity fields, is enriched
//! in place by the [`pipeline`](crate::pipeline) with a category and summary, and is frozen once
//! it has been archived. A record whose summarization failed keeps empty `category` and
//! `summary` strings and is still archived and rendered.
//!
//! # Examples
//!
//! ```
//! use dailypapers::paper::PaperRecord;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let paper = PaperRecord::new(
//!   "2401.00001",
//!   "Scaling\n   Laws",
//!   vec!["Alice Researcher".to_string(), "Bob Scholar".to_string()],
//! )?;
//! assert_eq!(paper.title, "Scaling Laws");
//! assert_eq!(paper.source_link, "https://arxiv.org/abs/2401.00001");
//! assert_eq!(paper.authors_display(), "Alice Researcher, Bob Scholar");
//! assert!(!paper.is_summarized());
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::summarizer::Summary;

/// Template for a paper's canonical abstract page.
pub const ARXIV_ABS_TEMPLATE: &str = "https://arxiv.org/abs/{identifier}";

/// Template for a paper's PDF document.
pub const ARXIV_PDF_TEMPLATE: &str = "https://arxiv.org/pdf/{identifier}.pdf";

/// One paper from the daily listing together with its generated summary.
///
/// The serialized field names (`arxiv_id`, `link`) are the ones downstream consumers of the
/// archive snapshot read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
  /// Numeric-dot-numeric catalog identifier, unique within a run
  #[serde(rename = "arxiv_id")]
  pub id:          String,
  /// Title with all whitespace runs collapsed to single spaces
  pub title:       String,
  /// Author names in listing order
  #[serde(default)]
  pub authors:     Vec<String>,
  /// Canonical abstract page derived from `id`
  #[serde(rename = "link")]
  pub source_link: String,
  /// Short classification produced by the summarizer, empty until then
  #[serde(default)]
  pub category:    String,
  /// Generated summary, empty until then
  #[serde(default)]
  pub summary:     String,
}

impl PaperRecord {
  /// Creates an unsummarized record.
  ///
  /// The title is whitespace-normalized and the source link is built from
  /// [`ARXIV_ABS_TEMPLATE`].
  ///
  /// # Errors
  ///
  /// Returns [`DailyPapersError::InvalidRecord`] if the identifier or the normalized title is
  /// empty.
  pub fn new(id: impl Into<String>, title: &str, authors: Vec<String>) -> Result<Self> {
    let id = id.into().trim().to_string();
    if id.is_empty() {
      return Err(DailyPapersError::InvalidRecord("missing identifier".into()));
    }

    let title = format::normalize_whitespace(title);
    if title.is_empty() {
      return Err(DailyPapersError::InvalidRecord(format!("missing title for {id}")));
    }

    let source_link = abs_url(&id);
    Ok(Self { id, title, authors, source_link, category: String::new(), summary: String::new() })
  }

  /// Author names joined for display.
  pub fn authors_display(&self) -> String { self.authors.join(", ") }

  /// Location of this paper's PDF.
  pub fn pdf_url(&self) -> String { pdf_url(&self.id) }

  /// Whether a summary has been merged into this record.
  pub fn is_summarized(&self) -> bool { !self.category.is_empty() || !self.summary.is_empty() }

  /// Merges a summarizer result into the record, replacing both generated fields.
  pub fn apply_summary(&mut self, summary: Summary) {
    self.category = summary.category;
    self.summary = summary.summary;
  }
}

impl Display for PaperRecord {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({})", self.title, self.id)
  }
}

/// Abstract page URL for an identifier.
pub fn abs_url(identifier: &str) -> String { ARXIV_ABS_TEMPLATE.replace("{identifier}", identifier) }

/// PDF URL for an identifier.
pub fn pdf_url(identifier: &str) -> String { ARXIV_PDF_TEMPLATE.replace("{identifier}", identifier) }
