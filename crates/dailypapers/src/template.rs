//! Prompt and document templates.
//!
//! Three [minijinja] templates drive everything the pipeline writes or sends:
//!
//! | name             | variables         | renders                                   |
//! | ---------------- | ----------------- | ----------------------------------------- |
//! | `summary_prompt` | `title`           | instruction sent with each PDF            |
//! | `entry`          | `date`, `papers`  | one day's section of the digest/archive   |
//! | `intro`          | `date`            | digest introduction with last-updated tag |
//!
//! Built-in versions ship with the crate; any of them can be replaced by a file. Undefined
//! variables are errors rather than empty strings, so a broken template fails loudly. Rendering
//! is a pure function of its inputs.
//!
//! Besides the builtins, templates get a `cell` filter that makes a value safe for a Markdown
//! table cell.

use std::fs;

use minijinja::{context, Environment, UndefinedBehavior};

use super::*;
use crate::config::TemplateConfig;

/// Name of the per-paper prompt template.
pub const SUMMARY_PROMPT: &str = "summary_prompt";
/// Name of the dated entry template.
pub const ENTRY: &str = "entry";
/// Name of the digest introduction template.
pub const INTRO: &str = "intro";

/// Built-in template sources, keyed by template name.
pub const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
  (SUMMARY_PROMPT, include_str!("../templates/summary_prompt.md")),
  (ENTRY, include_str!("../templates/entry.md")),
  (INTRO, include_str!("../templates/intro.md")),
];

/// Compiled template set.
///
/// # Examples
///
/// ```
/// use dailypapers::template::Templates;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let templates = Templates::new()?;
/// let prompt = templates.render_prompt("Attention Is All You Need")?;
/// assert!(prompt.contains("\"Attention Is All You Need\""));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Templates {
  /// Environment holding every compiled template
  env: Environment<'static>,
}

impl Templates {
  /// Compiles the built-in templates.
  pub fn new() -> Result<Self> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_filter("cell", |value: String| format::table_cell(&value));
    for (name, source) in BUILTIN_TEMPLATES {
      env.add_template(name, source)?;
    }
    Ok(Self { env })
  }

  /// Compiles the built-in templates, replacing each one that has a file configured.
  pub fn from_config(config: &TemplateConfig) -> Result<Self> {
    let mut templates = Self::new()?;
    for (name, path) in [
      (SUMMARY_PROMPT, &config.summary_prompt),
      (ENTRY, &config.entry),
      (INTRO, &config.intro),
    ] {
      if let Some(path) = path {
        debug!("Loading {name} template from {}", path.display());
        templates = templates.with_source(name, fs::read_to_string(path)?)?;
      }
    }
    Ok(templates)
  }

  /// Replaces (or adds) a single template.
  pub fn with_source(mut self, name: &'static str, source: String) -> Result<Self> {
    self.env.add_template_owned(name, source)?;
    Ok(self)
  }

  /// Renders the instruction sent along with a paper's PDF.
  pub fn render_prompt(&self, title: &str) -> Result<String> {
    Ok(self.env.get_template(SUMMARY_PROMPT)?.render(context! { title => title })?)
  }

  /// Renders one day's entry. Trailing whitespace is trimmed so entries compose predictably.
  pub fn render_entry(&self, date: NaiveDate, papers: &[PaperRecord]) -> Result<String> {
    let rendered = self
      .env
      .get_template(ENTRY)?
      .render(context! { date => date.format("%Y-%m-%d").to_string(), papers => papers })?;
    Ok(rendered.trim_end().to_string())
  }

  /// Renders the digest introduction, stamped with the run date.
  pub fn render_intro(&self, date: NaiveDate) -> Result<String> {
    let rendered =
      self.env.get_template(INTRO)?.render(context! { date => date.format("%Y-%m-%d").to_string() })?;
    Ok(rendered.trim_end().to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::summarizer::Summary;

  fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() }

  fn papers() -> Vec<PaperRecord> {
    let mut first =
      PaperRecord::new("2401.00001", "Pipes | and\nnewlines", vec!["Ada".into(), "Alan".into()])
        .unwrap();
    first.apply_summary(Summary { category: "NLP".into(), summary: "Line one.\nLine two.".into() });
    let second = PaperRecord::new("2401.00002", "Unsummarized", vec![]).unwrap();
    vec![first, second]
  }

  #[test]
  fn test_entry_rendering() {
    let entry = Templates::new().unwrap().render_entry(date(), &papers()).unwrap();
    let lines: Vec<_> = entry.lines().collect();

    assert_eq!(lines[0], "## Papers for 2024-01-02");
    assert_eq!(lines[2], "| Title | Authors | Category | Summary |");
    assert_eq!(
      lines[4],
      "| Pipes \\| and newlines (Read more on [arXiv](https://arxiv.org/abs/2401.00001)) | Ada, \
       Alan | NLP | Line one. Line two. |"
    );
    assert_eq!(
      lines[5],
      "| Unsummarized (Read more on [arXiv](https://arxiv.org/abs/2401.00002)) |  |  |  |"
    );
    assert_eq!(lines.len(), 6);
  }

  #[test]
  fn test_entry_rendering_is_deterministic() {
    let templates = Templates::new().unwrap();
    let papers = papers();
    assert_eq!(
      templates.render_entry(date(), &papers).unwrap(),
      templates.render_entry(date(), &papers).unwrap()
    );
  }

  #[test]
  fn test_intro_last_updated_marker() {
    let intro = Templates::new().unwrap().render_intro(date()).unwrap();
    assert!(intro.contains("last%20updated-2024--01--02-blue"));
  }

  #[test]
  fn test_undefined_variables_are_errors() {
    let templates =
      Templates::new().unwrap().with_source(SUMMARY_PROMPT, "{{ title }} {{ abstract }}".into()).unwrap();
    assert!(matches!(templates.render_prompt("T"), Err(DailyPapersError::Template(_))));
  }

  #[test]
  fn test_from_config_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prompt.md");
    std::fs::write(&path, "Summarise {{ title }}.").unwrap();

    let config = TemplateConfig { summary_prompt: Some(path), ..TemplateConfig::default() };
    let templates = Templates::from_config(&config).unwrap();
    assert_eq!(templates.render_prompt("Mamba").unwrap(), "Summarise Mamba.");
    assert!(templates.render_intro(date()).unwrap().starts_with("# Daily Papers"));
  }

  #[test]
  fn test_from_config_missing_file() {
    let config =
      TemplateConfig { entry: Some(PathBuf::from("/nonexistent/entry.md")), ..TemplateConfig::default() };
    assert!(matches!(Templates::from_config(&config), Err(DailyPapersError::Path(_))));
  }
}
