use std::{
  collections::HashMap,
  error::Error,
  fs,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use dailypapers::{
  archive::{ArchiveWriter, DigestMode},
  config::{ArchiveConfig, ListingConfig},
  digest::Digest,
  listing::parse_listing,
  paper::PaperRecord,
  pipeline::{Orchestrator, PaperOutcome},
  prelude::*,
  summarizer::StructuredSummarizer,
  template::Templates,
};
use tempfile::{tempdir, TempDir};
use tracing_test::traced_test;

mod archive;
mod workflows;

pub type TestResult<T> = Result<T, Box<dyn Error>>;

pub type DailyResult<T> = dailypapers::error::Result<T>;

/// Listing page captured in the shape the live site uses.
pub fn listing_fixture() -> String { fs::read_to_string("tests/data/listing.html").unwrap() }

pub fn date(day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, day).unwrap() }

/// Archive rooted in a fresh temporary directory.
pub fn temp_archive() -> (ArchiveConfig, TempDir) {
  let dir = tempdir().unwrap();
  let config = ArchiveConfig {
    root:   dir.path().join("archive"),
    digest: dir.path().join("README.md"),
    mode:   DigestMode::Merge,
  };
  (config, dir)
}

/// Serves a small fake PDF for every identifier except the missing ones.
#[derive(Default)]
pub struct FakeRetriever {
  missing:   Vec<String>,
  requested: Mutex<Vec<String>>,
}

impl FakeRetriever {
  pub fn missing(identifiers: &[&str]) -> Self {
    Self { missing: identifiers.iter().map(|id| id.to_string()).collect(), ..Self::default() }
  }

  pub fn requested(&self) -> Vec<String> { self.requested.lock().unwrap().clone() }
}

#[async_trait]
impl DocumentRetriever for FakeRetriever {
  async fn retrieve(&self, identifier: &str, dest: &Path) -> DailyResult<()> {
    self.requested.lock().unwrap().push(identifier.to_string());
    if self.missing.iter().any(|id| id == identifier) {
      let _ = fs::remove_file(dest);
      return Err(DailyPapersError::DownloadFailed {
        identifier: identifier.to_string(),
        status:     reqwest::StatusCode::NOT_FOUND,
      });
    }
    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(dest, identifier)?;
    Ok(())
  }
}

/// Model whose raw output is scripted per identifier.
///
/// The fake document written by [`FakeRetriever`] contains only the identifier, which is how the
/// model knows which paper it is looking at.
#[derive(Default)]
pub struct ScriptedModel {
  outputs: HashMap<String, Result<String, String>>,
}

impl ScriptedModel {
  pub fn new() -> Self { Self::default() }

  pub fn with_output(mut self, identifier: &str, text: &str) -> Self {
    self.outputs.insert(identifier.to_string(), Ok(text.to_string()));
    self
  }

  pub fn with_failure(mut self, identifier: &str, message: &str) -> Self {
    self.outputs.insert(identifier.to_string(), Err(message.to_string()));
    self
  }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
  async fn generate(&self, _prompt: &str, document: &Path) -> DailyResult<String> {
    let identifier = fs::read_to_string(document)?;
    match self.outputs.get(&identifier) {
      Some(Ok(text)) => Ok(text.clone()),
      Some(Err(message)) => Err(DailyPapersError::ApiError(message.clone())),
      None => Ok(format!(
        r#"{{"category": "Machine Learning", "summary": "Summary of {identifier}."}}"#
      )),
    }
  }
}

/// Records every message instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
  pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
  async fn send(&self, message: &str) -> DailyResult<()> {
    self.sent.lock().unwrap().push(message.to_string());
    Ok(())
  }
}

/// Paper with a fixed summary, for archive tests that skip the pipeline.
pub fn summarized_paper(id: &str, title: &str) -> PaperRecord {
  let mut paper = PaperRecord::new(id, title, vec!["Ada Lovelace".into()]).unwrap();
  paper.category = "Machine Learning".into();
  paper.summary = format!("Summary of {title}.");
  paper
}

pub fn scratch_path(dir: &TempDir) -> PathBuf { dir.path().join("scratch").join("paper.pdf") }
