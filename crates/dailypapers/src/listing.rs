//! Listing page retrieval and extraction.
//!
//! The listing page is split into paper-sized blocks, and each block is turned into at most one
//! [`PaperRecord`]. Anomalies are strictly per block: a block without a title, without a
//! recognisable identifier, or repeating an identifier already seen in this page is logged and
//! left out, and extraction carries on with the next block. Only a page with no blocks at all
//! is treated as unparseable.
//!
//! # Examples
//!
//! ```
//! use dailypapers::{config::ListingConfig, listing::parse_listing};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let html = r#"
//!   <div class="w-full">
//!     <a class="line-clamp-3" href="/papers/2401.00001">Scaling
//!       Laws</a>
//!     <ul><li title="Ada Lovelace"></li><li title="Alan Turing"></li></ul>
//!   </div>"#;
//!
//! let papers = parse_listing(html, &ListingConfig::default())?;
//! assert_eq!(papers.len(), 1);
//! assert_eq!(papers[0].title, "Scaling Laws");
//! assert_eq!(papers[0].authors, vec!["Ada Lovelace", "Alan Turing"]);
//! # Ok(())
//! # }
//! ```

use scraper::{ElementRef, Html, Selector};

use super::*;
use crate::config::ListingConfig;

/// Fetches the listing page and extracts paper records from it.
#[derive(Debug, Clone)]
pub struct ListingFetcher<'a> {
  /// Shared HTTP client
  client: reqwest::Client,
  /// Listing location and extraction rules
  config: &'a ListingConfig,
}

/// Compiled selectors for one extraction pass.
struct ListingSelectors {
  /// Paper-sized block
  block:  Selector,
  /// Title link inside a block
  title:  Selector,
  /// Author-bearing elements inside a block
  author: Selector,
}

impl<'a> ListingFetcher<'a> {
  /// Creates a fetcher using the given client and listing configuration.
  pub fn new(client: reqwest::Client, config: &'a ListingConfig) -> Self { Self { client, config } }

  /// Downloads the listing page and extracts its records.
  ///
  /// # Errors
  ///
  /// Network failures and non-success statuses are returned as-is: without the page there is
  /// nothing meaningful to process. Extraction errors are those of [`parse_listing`].
  pub async fn fetch(&self) -> Result<Vec<PaperRecord>> {
    info!("Fetching listing from {}", self.config.url);
    let response = self.client.get(&self.config.url).send().await?;

    let status = response.status();
    if !status.is_success() {
      trace!("listing response: {response:?}");
      return Err(DailyPapersError::ApiError(format!(
        "Listing request to {} returned {status}",
        self.config.url
      )));
    }

    let html = response.text().await?;
    debug!("Listing page is {} bytes", html.len());
    parse_listing(&html, self.config)
  }
}

/// Extracts deduplicated paper records from listing HTML, in document order.
///
/// # Errors
///
/// Returns [`DailyPapersError::Config`] if a configured selector is invalid and
/// [`DailyPapersError::ListingUnparseable`] if no block matches the block selector.
pub fn parse_listing(html: &str, config: &ListingConfig) -> Result<Vec<PaperRecord>> {
  let selectors = ListingSelectors::compile(config)?;
  let document = Html::parse_document(html);

  let mut papers = Vec::new();
  let mut seen_ids = HashSet::new();
  let mut blocks = 0usize;

  for block in document.select(&selectors.block) {
    blocks += 1;
    let Some(paper) = extract_paper(block, &selectors, &config.id_pattern) else {
      continue;
    };

    if !seen_ids.insert(paper.id.clone()) {
      warn!("Duplicate paper detected with ID {}, skipping", paper.id);
      continue;
    }

    trace!("Extracted {paper}");
    papers.push(paper);
  }

  if blocks == 0 {
    return Err(DailyPapersError::ListingUnparseable(format!(
      "no element matched `{}`",
      config.block_selector
    )));
  }

  info!("Extracted {} papers from {blocks} listing blocks", papers.len());
  Ok(papers)
}

/// Builds a record from a single block, or explains why the block is skipped.
fn extract_paper(
  block: ElementRef<'_>,
  selectors: &ListingSelectors,
  id_pattern: &Regex,
) -> Option<PaperRecord> {
  let Some(title_tag) = block.select(&selectors.title).next() else {
    warn!("Title not found, skipping block");
    return None;
  };

  let raw_title = title_tag.text().collect::<String>();
  let link = title_tag.value().attr("href").unwrap_or_default();

  let Some(id) = id_pattern.captures(link).and_then(|cap| cap.get(1)).map(|m| m.as_str()) else {
    warn!("Could not extract paper ID from link: {link:?}");
    return None;
  };

  let authors = block
    .select(&selectors.author)
    .filter_map(|element| element.value().attr("title"))
    .map(str::trim)
    .filter(|name| !name.is_empty())
    .map(str::to_string)
    .collect();

  match PaperRecord::new(id, &raw_title, authors) {
    Ok(paper) => Some(paper),
    Err(e) => {
      warn!("Skipping listing block: {e}");
      None
    },
  }
}

impl ListingSelectors {
  /// Compiles the configured selectors.
  fn compile(config: &ListingConfig) -> Result<Self> {
    Ok(Self {
      block:  parse_selector(&config.block_selector)?,
      title:  parse_selector(&config.title_selector)?,
      author: parse_selector(&config.author_selector)?,
    })
  }
}

/// Parses a CSS selector, mapping failures into a configuration error.
fn parse_selector(selector: &str) -> Result<Selector> {
  Selector::parse(selector)
    .map_err(|e| DailyPapersError::Config(format!("Invalid CSS selector `{selector}`: {e}")))
}
