//! Parsed model of the digest document.
//!
//! The digest is an introduction followed by dated entries, newest first. Each entry is
//! introduced by a marker line that carries its date:
//!
//! ```text
//! # Daily Papers
//! ...intro...
//!
//! <!-- dailypapers:entry 2024-01-03 -->
//! ## Papers for 2024-01-03
//! ...
//!
//! <!-- dailypapers:entry 2024-01-02 -->
//! ## Papers for 2024-01-02
//! ...
//! ```
//!
//! Entries are kept as opaque text, so whatever was rendered on an earlier day comes back out
//! byte for byte (modulo trailing whitespace) when the document is serialized again. Digests
//! written before markers were introduced are recognised by their `## Papers for YYYY-MM-DD`
//! headings instead.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use dailypapers::digest::Digest;
//!
//! let mut digest = Digest::new("# Daily Papers");
//! digest.upsert(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), "## Papers for 2024-01-02");
//! digest.upsert(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), "## Papers for 2024-01-03");
//!
//! let text = digest.to_string();
//! assert!(text.find("2024-01-03").unwrap() < text.find("2024-01-02").unwrap());
//! assert_eq!(Digest::parse(&text), digest);
//! ```

use super::*;

/// Leading part of an entry marker line, followed by the date and [`MARKER_SUFFIX`].
pub const MARKER_PREFIX: &str = "<!-- dailypapers:entry ";

/// Closing part of an entry marker line.
pub const MARKER_SUFFIX: &str = " -->";

lazy_static! {
  /// Entry marker line.
  static ref MARKER: Regex =
    Regex::new(r"(?m)^<!-- dailypapers:entry (\d{4}-\d{2}-\d{2}) -->\r?$").unwrap();
  /// Entry heading used by digests that predate markers.
  static ref LEGACY_HEADING: Regex =
    Regex::new(r"(?m)^## Papers for (\d{4}-\d{2}-\d{2})[ \t]*\r?$").unwrap();
}

/// One dated section of the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
  /// Day the entry covers
  pub date: NaiveDate,
  /// Rendered entry text without trailing whitespace
  pub body: String,
}

/// An introduction followed by dated entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digest {
  /// Text before the first entry, without trailing whitespace
  pub intro:   String,
  /// Entries in document order
  pub entries: Vec<DigestEntry>,
}

/// Byte range and date of a recognised entry boundary.
struct Boundary {
  /// Start of the boundary line
  start: usize,
  /// Where the entry body begins
  body:  usize,
  /// Date named on the line
  date:  NaiveDate,
}

impl Digest {
  /// Creates a digest with the given introduction and no entries.
  pub fn new(intro: impl Into<String>) -> Self {
    Self { intro: intro.into().trim_end().to_string(), entries: Vec::new() }
  }

  /// Parses digest text. Never fails: text without recognisable entries becomes the intro.
  pub fn parse(text: &str) -> Self {
    let mut found = boundaries(text, &MARKER, true);
    if found.is_empty() {
      found = legacy_boundaries(text);
    }

    let Some(first) = found.first() else {
      return Self::new(text);
    };

    let intro = text[..first.start].trim_end().to_string();
    let entries = found
      .iter()
      .enumerate()
      .map(|(i, boundary)| {
        let end = found.get(i + 1).map_or(text.len(), |next| next.start);
        DigestEntry { date: boundary.date, body: text[boundary.body..end].trim_end().to_string() }
      })
      .collect();

    Self { intro, entries }
  }

  /// Replaces the introduction.
  pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
    self.intro = intro.into().trim_end().to_string();
    self
  }

  /// Inserts the entry for `date`, replacing any entry already present for that date.
  ///
  /// The entry goes before the first entry with an earlier date, so a digest kept in
  /// descending order stays that way. Every other entry is left untouched.
  pub fn upsert(&mut self, date: NaiveDate, body: impl Into<String>) {
    let before = self.entries.len();
    self.entries.retain(|entry| entry.date != date);
    if self.entries.len() != before {
      debug!("Replacing existing digest entry for {date}");
    }

    let position = self.entries.iter().position(|entry| entry.date < date).unwrap_or(self.entries.len());
    self.entries.insert(position, DigestEntry { date, body: body.into().trim_end().to_string() });
  }

  /// Entry for a date, if present.
  pub fn entry(&self, date: NaiveDate) -> Option<&DigestEntry> {
    self.entries.iter().find(|entry| entry.date == date)
  }

  /// Dates of every entry in document order.
  pub fn dates(&self) -> Vec<NaiveDate> { self.entries.iter().map(|entry| entry.date).collect() }
}

impl Display for Digest {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    writeln!(f, "{}", self.intro)?;
    for entry in &self.entries {
      write!(f, "\n{MARKER_PREFIX}{}{MARKER_SUFFIX}\n{}\n", entry.date.format("%Y-%m-%d"), entry.body)?;
    }
    Ok(())
  }
}

/// Finds legacy headings, which stay part of the entry body they introduce.
fn legacy_boundaries(text: &str) -> Vec<Boundary> {
  let legacy = boundaries(text, &LEGACY_HEADING, false);
  if !legacy.is_empty() {
    info!("Migrating {} digest entries without markers", legacy.len());
  }
  legacy
}

/// Collects every line matching `pattern` whose captured date is valid.
///
/// With `skip_line` the matched line itself is excluded from the body that follows it.
fn boundaries(text: &str, pattern: &Regex, skip_line: bool) -> Vec<Boundary> {
  pattern
    .captures_iter(text)
    .filter_map(|cap| {
      let line = cap.get(0)?;
      let date = match NaiveDate::parse_from_str(&cap[1], "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
          warn!("Ignoring digest boundary {:?}: {e}", line.as_str());
          return None;
        },
      };
      let body = if !skip_line {
        line.start()
      } else if text[line.end()..].starts_with('\n') {
        line.end() + 1
      } else {
        line.end()
      };
      Some(Boundary { start: line.start(), body, date })
    })
    .collect()
}
