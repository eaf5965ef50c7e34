//! Archive and digest persistence.
//!
//! Every run for a date produces three artifacts:
//!
//! - `{root}/{YYYY}/{MM}/{YYYY-MM-DD}.json`: the enriched records, pretty-printed
//! - `{root}/{YYYY}/{MM}/{YYYY-MM-DD}.md`: the rendered entry for that day
//! - the digest document, rewritten from the intro template plus the dated entries
//!
//! Archive files for a date are only ever written by a run for that date, so later days never
//! disturb earlier ones. The digest is derived state: [`ArchiveWriter::rebuild_digest`]
//! regenerates it from the archive alone.
//!
//! Writing is deterministic. The same date and records always produce byte-identical files.

use std::fs;

use serde_json::ser::PrettyFormatter;

use super::*;
use crate::{config::ArchiveConfig, digest::Digest};

/// How today's entry is combined with the digest already on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestMode {
  /// Keep earlier entries and insert today's in date order
  #[default]
  Merge,
  /// Keep only today's entry
  Replace,
}

/// Files written by [`ArchiveWriter::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePaths {
  /// JSON snapshot of the day's records
  pub snapshot: PathBuf,
  /// Rendered entry for the day
  pub entry:    PathBuf,
  /// Updated digest document
  pub digest:   PathBuf,
}

/// Writes dated archive entries and keeps the digest in step with them.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use dailypapers::{archive::ArchiveWriter, config::ArchiveConfig, template::Templates};
///
/// # fn example(papers: Vec<dailypapers::paper::PaperRecord>) -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiveConfig::default();
/// let templates = Templates::new()?;
/// let writer = ArchiveWriter::new(&config, &templates);
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let paths = writer.write(date, &papers)?;
/// assert!(paths.snapshot.ends_with("2024/01/2024-01-02.json"));
/// assert_eq!(writer.load_snapshot(date)?, papers);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArchiveWriter<'a> {
  /// Locations and digest mode
  config:    &'a ArchiveConfig,
  /// Entry and intro templates
  templates: &'a Templates,
}

impl<'a> ArchiveWriter<'a> {
  /// Creates a writer for the configured archive.
  pub fn new(config: &'a ArchiveConfig, templates: &'a Templates) -> Self { Self { config, templates } }

  /// Directory holding a date's files.
  pub fn entry_dir(&self, date: NaiveDate) -> PathBuf {
    self.config.root.join(date.format("%Y").to_string()).join(date.format("%m").to_string())
  }

  /// Location of a date's JSON snapshot.
  pub fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
    self.entry_dir(date).join(format!("{}.json", date.format("%Y-%m-%d")))
  }

  /// Location of a date's rendered entry.
  pub fn entry_path(&self, date: NaiveDate) -> PathBuf {
    self.entry_dir(date).join(format!("{}.md", date.format("%Y-%m-%d")))
  }

  /// Whether a snapshot has already been written for `date`.
  pub fn exists(&self, date: NaiveDate) -> bool { self.snapshot_path(date).exists() }

  /// Persists a day's records and updates the digest.
  ///
  /// # Errors
  ///
  /// Any failure to render or write is returned; there is no partial-success mode.
  pub fn write(&self, date: NaiveDate, papers: &[PaperRecord]) -> Result<ArchivePaths> {
    info!("Archiving {} papers for {date}", papers.len());
    let entry = self.templates.render_entry(date, papers)?;

    fs::create_dir_all(self.entry_dir(date))?;

    let snapshot = self.snapshot_path(date);
    fs::write(&snapshot, snapshot_json(papers)?)?;
    debug!("Wrote snapshot to {}", snapshot.display());

    let entry_path = self.entry_path(date);
    fs::write(&entry_path, format!("{entry}\n"))?;
    debug!("Wrote entry to {}", entry_path.display());

    let digest = match self.config.mode {
      DigestMode::Merge => {
        let mut digest = self.read_digest()?;
        digest.upsert(date, entry);
        digest
      },
      DigestMode::Replace => {
        let mut digest = Digest::default();
        digest.upsert(date, entry);
        digest
      },
    };
    self.write_digest(date, digest)?;

    Ok(ArchivePaths { snapshot, entry: entry_path, digest: self.config.digest.clone() })
  }

  /// Reads a day's snapshot back.
  pub fn load_snapshot(&self, date: NaiveDate) -> Result<Vec<PaperRecord>> {
    let path = self.snapshot_path(date);
    trace!("Loading snapshot from {}", path.display());
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
  }

  /// Dates with a rendered entry in the archive, newest first.
  pub fn archived_dates(&self) -> Result<Vec<NaiveDate>> {
    let root = glob::Pattern::escape(&self.config.root.to_string_lossy());
    let pattern = format!("{root}/*/*/*.md");

    let mut dates = Vec::new();
    for path in glob::glob(&pattern)? {
      let path = path.map_err(|e| DailyPapersError::Path(e.into_error()))?;
      let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
      match NaiveDate::parse_from_str(&stem, "%Y-%m-%d") {
        Ok(date) => dates.push(date),
        Err(_) => debug!("Ignoring non-entry file {}", path.display()),
      }
    }

    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();
    Ok(dates)
  }

  /// Regenerates the digest from the archive's rendered entries, stamped with `date`.
  ///
  /// Returns the number of entries in the rebuilt digest.
  pub fn rebuild_digest(&self, date: NaiveDate) -> Result<usize> {
    let mut digest = Digest::default();
    for entry_date in self.archived_dates()? {
      let body = fs::read_to_string(self.entry_path(entry_date))?;
      digest.upsert(entry_date, body);
    }

    let count = digest.entries.len();
    info!("Rebuilding digest from {count} archived entries");
    self.write_digest(date, digest)?;
    Ok(count)
  }

  /// Parses the digest on disk, treating a missing file as empty.
  fn read_digest(&self) -> Result<Digest> {
    match fs::read_to_string(&self.config.digest) {
      Ok(text) => {
        let digest = Digest::parse(&text);
        if digest.entries.is_empty() && !text.trim().is_empty() {
          warn!(
            "No dated entries found in {}, its content will be replaced",
            self.config.digest.display()
          );
        }
        Ok(digest)
      },
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!("No digest at {}, starting a new one", self.config.digest.display());
        Ok(Digest::default())
      },
      Err(e) => Err(e.into()),
    }
  }

  /// Refreshes the intro and writes the digest.
  fn write_digest(&self, date: NaiveDate, digest: Digest) -> Result<()> {
    let digest = digest.with_intro(self.templates.render_intro(date)?);
    if let Some(parent) = self.config.digest.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    fs::write(&self.config.digest, digest.to_string())?;
    debug!("Wrote digest with {} entries to {}", digest.entries.len(), self.config.digest.display());
    Ok(())
  }
}

/// Serializes records as JSON with four-space indentation and a trailing newline.
fn snapshot_json(papers: &[PaperRecord]) -> Result<Vec<u8>> {
  let mut buffer = Vec::new();
  let mut serializer =
    serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
  papers.serialize(&mut serializer)?;
  buffer.push(b'\n');
  Ok(buffer)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::summarizer::Summary;

  fn config(root: &Path) -> ArchiveConfig {
    ArchiveConfig { root: root.join("archive"), digest: root.join("README.md"), mode: DigestMode::Merge }
  }

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, d).unwrap() }

  fn paper(id: &str, title: &str) -> PaperRecord {
    let mut paper = PaperRecord::new(id, title, vec!["Ada".into()]).unwrap();
    paper.apply_summary(Summary { category: "NLP".into(), summary: format!("About {title}.") });
    paper
  }

  #[test]
  fn test_layout_and_snapshot_format() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());
    let templates = Templates::new().unwrap();
    let writer = ArchiveWriter::new(&config, &templates);

    let paths = writer.write(day(2), &[paper("2401.00001", "One")]).unwrap();
    assert_eq!(paths.snapshot, dir.path().join("archive/2024/01/2024-01-02.json"));
    assert_eq!(paths.entry, dir.path().join("archive/2024/01/2024-01-02.md"));

    let json = fs::read_to_string(&paths.snapshot).unwrap();
    assert!(json.starts_with("[\n    {\n        \"arxiv_id\": \"2401.00001\",\n"));
    assert!(json.ends_with("]\n"));

    let entry = fs::read_to_string(&paths.entry).unwrap();
    assert!(entry.starts_with("## Papers for 2024-01-02\n"));
    assert!(writer.exists(day(2)));
    assert!(!writer.exists(day(3)));
  }

  #[test]
  fn test_write_is_idempotent() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());
    let templates = Templates::new().unwrap();
    let writer = ArchiveWriter::new(&config, &templates);
    let papers = [paper("2401.00001", "One"), paper("2401.00002", "Two")];

    let paths = writer.write(day(2), &papers).unwrap();
    let first: Vec<_> =
      [&paths.snapshot, &paths.entry, &paths.digest].map(|p| fs::read(p).unwrap()).into();
    writer.write(day(2), &papers).unwrap();
    let second: Vec<_> =
      [&paths.snapshot, &paths.entry, &paths.digest].map(|p| fs::read(p).unwrap()).into();

    assert_eq!(first, second);
  }

  #[test]
  fn test_replace_mode_keeps_only_today() {
    let dir = tempdir().unwrap();
    let mut config = config(dir.path());
    let templates = Templates::new().unwrap();

    ArchiveWriter::new(&config, &templates).write(day(1), &[paper("2401.00001", "One")]).unwrap();
    config.mode = DigestMode::Replace;
    ArchiveWriter::new(&config, &templates).write(day(2), &[paper("2401.00002", "Two")]).unwrap();

    let digest = Digest::parse(&fs::read_to_string(&config.digest).unwrap());
    assert_eq!(digest.dates(), vec![day(2)]);
    assert!(dir.path().join("archive/2024/01/2024-01-01.md").exists());
  }

  #[test]
  fn test_rebuild_from_archive() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());
    let templates = Templates::new().unwrap();
    let writer = ArchiveWriter::new(&config, &templates);

    writer.write(day(3), &[paper("2401.00003", "Three")]).unwrap();
    writer.write(day(1), &[paper("2401.00001", "One")]).unwrap();
    fs::write(dir.path().join("archive/2024/01/notes.md"), "not an entry").unwrap();
    fs::remove_file(&config.digest).unwrap();

    assert_eq!(writer.rebuild_digest(day(5)).unwrap(), 2);
    let text = fs::read_to_string(&config.digest).unwrap();
    let digest = Digest::parse(&text);
    assert_eq!(digest.dates(), vec![day(3), day(1)]);
    assert!(digest.intro.contains("2024--01--05"));
  }

  #[test]
  fn test_load_missing_snapshot() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());
    let templates = Templates::new().unwrap();
    let err = ArchiveWriter::new(&config, &templates).load_snapshot(day(9)).unwrap_err();
    assert!(matches!(err, DailyPapersError::Path(e) if e.kind() == std::io::ErrorKind::NotFound));
  }
}
