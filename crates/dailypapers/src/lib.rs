//! Daily research paper harvesting, summarization and archival.
//!
//! `dailypapers` turns the Hugging Face daily papers listing into a dated, summarized archive:
//!
//! - Listing extraction with per-block validation and identifier deduplication
//! - PDF retrieval from arXiv
//! - Structured-output summarization through a generative model
//! - Rate-limited, failure-isolated sequential enrichment
//! - A year/month partitioned archive plus an always-current digest document
//! - Optional delivery of the day's headline paper to a Telegram channel
//!
//! # Getting Started
//!
//! ```no_run
//! use dailypapers::{
//!   archive::ArchiveWriter,
//!   config::Config,
//!   listing::ListingFetcher,
//!   llm::GeminiClient,
//!   pdf::ArxivPdfRetriever,
//!   pipeline::Orchestrator,
//!   summarizer::StructuredSummarizer,
//!   template::Templates,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::default();
//!   let client = config.http_client()?;
//!   let templates = Templates::from_config(&config.templates)?;
//!
//!   let mut papers = ListingFetcher::new(client.clone(), &config.listing).fetch().await?;
//!
//!   let retriever = ArxivPdfRetriever::new(client.clone());
//!   let summarizer = StructuredSummarizer::new(GeminiClient::from_config(client, &config.summarizer)?);
//!   Orchestrator::new(&retriever, &summarizer, &templates)
//!     .with_scratch_path(&config.scratch_path)
//!     .with_pacing(config.summarizer.pacing())
//!     .enrich(&mut papers)
//!     .await;
//!
//!   let today = chrono::Local::now().date_naive();
//!   ArchiveWriter::new(&config.archive, &templates).write(today, &papers)?;
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`paper`]: The [`paper::PaperRecord`] data model
//! - [`listing`]: Listing page fetch and extraction
//! - [`pdf`]: Document retrieval
//! - [`llm`]: Generative model HTTP client
//! - [`summarizer`]: Structured summary parsing on top of a model
//! - [`pipeline`]: The sequential enrichment loop
//! - [`digest`]: Parsed digest document model
//! - [`archive`]: Archive and digest persistence
//! - [`notify`]: Channel notification
//! - [`template`]: Prompt and document templates
//! - [`config`]: Run configuration

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::HashSet,
  fmt::Display,
  path::{Path, PathBuf},
  time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod archive;
pub mod config;
pub mod digest;
pub mod error;
pub mod format;
pub mod listing;
pub mod llm;
pub mod notify;
pub mod paper;
pub mod pdf;
pub mod pipeline;
pub mod summarizer;
pub mod template;

use crate::{error::*, paper::PaperRecord, template::Templates};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use dailypapers::prelude::*;
///
/// async fn example(retriever: &impl DocumentRetriever) -> Result<(), DailyPapersError> {
///   retriever.retrieve("2401.00001", std::path::Path::new("scratch.pdf")).await
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::DailyPapersError, llm::GenerativeModel, notify::Notifier, pdf::DocumentRetriever,
    summarizer::Summarizer,
  };
}
