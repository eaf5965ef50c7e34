//! Run configuration.
//!
//! A [`Config`] is deserialized once from TOML and then handed to each component, which only
//! borrows the section it needs. Every section carries defaults, so an empty file (or no file at
//! all) yields a working configuration pointed at the public listing page and the Gemini API.
//!
//! ```
//! use dailypapers::config::Config;
//!
//! let config: Config = toml::from_str(
//!   r#"
//!   [summarizer]
//!   pacing_secs = 5
//!
//!   [archive]
//!   mode = "replace"
//!   "#,
//! )
//! .unwrap();
//! assert_eq!(config.summarizer.pacing_secs, 5);
//! assert_eq!(config.listing.url, "https://huggingface.co/papers");
//! ```

use std::fs;

use serde::Deserializer;

use super::*;
use crate::archive::DigestMode;

/// Bundled configuration file with every option at its default.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// User agent sent with every request.
const USER_AGENT: &str = concat!("dailypapers/", env!("CARGO_PKG_VERSION"));

lazy_static! {
  /// Identifier pattern for links on the Hugging Face listing page.
  static ref DEFAULT_ID_PATTERN: Regex = Regex::new(r"/papers/(\d+\.\d+)").unwrap();
}

/// Top-level configuration for a run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Scratch location for the PDF currently being summarized
  pub scratch_path:         PathBuf,
  /// Transport timeout applied to every HTTP request
  pub request_timeout_secs: u64,
  /// Listing page location and extraction rules
  pub listing:              ListingConfig,
  /// Generative model settings
  pub summarizer:           SummarizerConfig,
  /// Archive and digest locations
  pub archive:              ArchiveConfig,
  /// Template overrides
  pub templates:            TemplateConfig,
  /// Channel notification settings
  pub notify:               NotifyConfig,
}

/// Where the listing lives and how paper blocks are recognised in it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
  /// Listing page URL
  pub url:             String,
  /// CSS selector for one paper-sized block
  pub block_selector:  String,
  /// CSS selector, relative to a block, for the title link
  pub title_selector:  String,
  /// CSS selector, relative to a block, for elements carrying an author `title` attribute
  pub author_selector: String,
  /// Pattern whose first capture group is the identifier inside the title link's `href`
  #[serde(deserialize_with = "deserialize_regex")]
  pub id_pattern:      Regex,
}

/// Generative model endpoint, credentials and pacing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
  /// API host
  pub host:        String,
  /// Model identifier
  pub model:       String,
  /// Environment variable holding the API key
  pub api_key_env: String,
  /// Delay after each paper, in seconds
  pub pacing_secs: u64,
}

/// Archive root and digest document settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
  /// Root of the `{year}/{month}/{date}.*` tree
  pub root:   PathBuf,
  /// Always-current digest document
  pub digest: PathBuf,
  /// How today's entry is combined with the existing digest
  pub mode:   DigestMode,
}

/// Optional template files overriding the built-in ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
  /// Prompt sent with each PDF (`title`)
  pub summary_prompt: Option<PathBuf>,
  /// One day's digest entry (`date`, `papers`)
  pub entry:          Option<PathBuf>,
  /// Digest introduction (`date`)
  pub intro:          Option<PathBuf>,
}

/// Telegram channel settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
  /// Whether `run` sends a notification after archiving
  pub enabled:     bool,
  /// Bot API base URL
  pub api_base:    String,
  /// Environment variable holding the bot token
  pub token_env:   String,
  /// Environment variable holding the channel id
  pub chat_id_env: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      scratch_path:         dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dailypapers")
        .join("scratch.pdf"),
      request_timeout_secs: 300,
      listing:              ListingConfig::default(),
      summarizer:           SummarizerConfig::default(),
      archive:              ArchiveConfig::default(),
      templates:            TemplateConfig::default(),
      notify:               NotifyConfig::default(),
    }
  }
}

impl Default for ListingConfig {
  fn default() -> Self {
    Self {
      url:             "https://huggingface.co/papers".into(),
      block_selector:  "div.w-full".into(),
      title_selector:  "a.line-clamp-3".into(),
      author_selector: "li".into(),
      id_pattern:      DEFAULT_ID_PATTERN.clone(),
    }
  }
}

impl Default for SummarizerConfig {
  fn default() -> Self {
    Self {
      host:        "https://generativelanguage.googleapis.com".into(),
      model:       "gemini-2.5-flash".into(),
      api_key_env: "GEMINI_API_KEY".into(),
      pacing_secs: 30,
    }
  }
}

impl Default for ArchiveConfig {
  fn default() -> Self {
    Self { root: PathBuf::from("archive"), digest: PathBuf::from("README.md"), mode: DigestMode::Merge }
  }
}

impl Default for NotifyConfig {
  fn default() -> Self {
    Self {
      enabled:     true,
      api_base:    "https://api.telegram.org".into(),
      token_env:   "TELEGRAM_BOT_TOKEN".into(),
      chat_id_env: "TELEGRAM_CHANNEL_ID".into(),
    }
  }
}

impl Config {
  /// Default location of the configuration file, relative to the working directory.
  pub fn default_path() -> PathBuf { PathBuf::from("dailypapers.toml") }

  /// Loads a configuration file, resolving relative paths against the file's directory.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      config.resolve_relative_to(base);
    }
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
  }

  /// Loads `path` if it exists, otherwise falls back to [`Config::default`].
  pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if path.exists() {
      Self::load(path)
    } else {
      info!("No configuration at {}, using defaults", path.display());
      Ok(Self::default())
    }
  }

  /// Builds the HTTP client shared by every component of a run.
  pub fn http_client(&self) -> Result<reqwest::Client> {
    Ok(
      reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(self.request_timeout_secs))
        .build()?,
    )
  }

  /// Overrides the archive root.
  pub fn with_archive_root(mut self, root: impl AsRef<Path>) -> Self {
    self.archive.root = root.as_ref().to_path_buf();
    self
  }

  /// Overrides the digest location.
  pub fn with_digest_path(mut self, digest: impl AsRef<Path>) -> Self {
    self.archive.digest = digest.as_ref().to_path_buf();
    self
  }

  /// Overrides the scratch document location.
  pub fn with_scratch_path(mut self, scratch: impl AsRef<Path>) -> Self {
    self.scratch_path = scratch.as_ref().to_path_buf();
    self
  }

  /// Rewrites every relative path in the configuration to live under `base`.
  fn resolve_relative_to(&mut self, base: &Path) {
    let resolve = |path: &mut PathBuf| {
      if path.is_relative() {
        *path = base.join(&*path);
      }
    };
    resolve(&mut self.scratch_path);
    resolve(&mut self.archive.root);
    resolve(&mut self.archive.digest);
    for template in
      [&mut self.templates.summary_prompt, &mut self.templates.entry, &mut self.templates.intro]
        .into_iter()
        .flatten()
    {
      resolve(template);
    }
  }
}

impl SummarizerConfig {
  /// Delay inserted after every paper.
  pub fn pacing(&self) -> Duration { Duration::from_secs(self.pacing_secs) }

  /// Reads the API key from the configured environment variable.
  pub fn api_key(&self) -> Result<String> { read_env(&self.api_key_env) }
}

impl NotifyConfig {
  /// Reads the bot token from the configured environment variable.
  pub fn token(&self) -> Result<String> { read_env(&self.token_env) }

  /// Reads the channel id from the configured environment variable.
  pub fn chat_id(&self) -> Result<String> { read_env(&self.chat_id_env) }
}

/// Reads a non-empty credential from the environment.
fn read_env(name: &str) -> Result<String> {
  std::env::var(name)
    .ok()
    .filter(|value| !value.trim().is_empty())
    .ok_or_else(|| DailyPapersError::MissingCredential(name.to_string()))
}

/// Deserializes a string into a compiled [`Regex`].
pub fn deserialize_regex<'de, D>(deserializer: D) -> std::result::Result<Regex, D::Error>
where D: Deserializer<'de> {
  let s: String = String::deserialize(deserializer)?;
  Regex::new(&s).map_err(serde::de::Error::custom)
}
