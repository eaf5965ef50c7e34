//! Paper document retrieval.
//!
//! Documents are written to a caller-chosen path that the pipeline reuses for every paper, so a
//! retriever must either leave a complete document at that path or report an error and leave
//! nothing behind.

use super::*;
use crate::paper::ARXIV_PDF_TEMPLATE;

/// Source of paper documents, keyed by identifier.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
  /// Downloads the document for `identifier` to `dest`, replacing whatever was there.
  async fn retrieve(&self, identifier: &str, dest: &Path) -> Result<()>;
}

/// Downloads PDFs from arXiv.
///
/// # Examples
///
/// ```no_run
/// use dailypapers::{pdf::ArxivPdfRetriever, prelude::*};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let retriever = ArxivPdfRetriever::new(reqwest::Client::new());
/// retriever.retrieve("2301.07041", std::path::Path::new("scratch.pdf")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArxivPdfRetriever {
  /// Shared HTTP client
  client:       reqwest::Client,
  /// Document URL with an `{identifier}` placeholder
  url_template: String,
}

impl ArxivPdfRetriever {
  /// Creates a retriever for `https://arxiv.org/pdf/{identifier}.pdf`.
  pub fn new(client: reqwest::Client) -> Self {
    Self { client, url_template: ARXIV_PDF_TEMPLATE.to_string() }
  }

  /// Points the retriever at a different document host, e.g. a mirror.
  pub fn with_url_template(mut self, template: &str) -> Self {
    self.url_template = template.to_string();
    self
  }

  /// Document URL for an identifier.
  pub fn url_for(&self, identifier: &str) -> String {
    self.url_template.replace("{identifier}", identifier)
  }
}

#[async_trait]
impl DocumentRetriever for ArxivPdfRetriever {
  async fn retrieve(&self, identifier: &str, dest: &Path) -> Result<()> {
    let url = self.url_for(identifier);
    debug!("Downloading {url}");

    let response = self.client.get(&url).send().await?;
    let status = response.status();

    if !status.is_success() {
      trace!("{identifier} pdf response: {response:?}");
      remove_stale(dest).await?;
      return Err(DailyPapersError::DownloadFailed { identifier: identifier.to_string(), status });
    }

    let bytes = response.bytes().await?;
    if let Some(parent) = dest.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    debug!("Writing {} bytes of PDF to path: {dest:?}", bytes.len());
    tokio::fs::write(dest, &bytes).await?;
    Ok(())
  }
}

/// Deletes a previous paper's document so it cannot be mistaken for the current one.
pub(crate) async fn remove_stale(path: &Path) -> Result<()> {
  match tokio::fs::remove_file(path).await {
    Ok(()) => {
      trace!("Removed stale document at {path:?}");
      Ok(())
    },
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e.into()),
  }
}
