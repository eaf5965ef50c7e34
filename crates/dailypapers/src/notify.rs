//! Channel notification.
//!
//! After a day has been archived, the first paper of the day can be posted to a Telegram
//! channel. Notification is strictly downstream of the archive: it reads records that have
//! already been persisted, and its failures are reported to the caller without touching any
//! archive state.

use super::*;
use crate::config::NotifyConfig;

/// A sink for short formatted messages.
#[async_trait]
pub trait Notifier: Send + Sync {
  /// Delivers one message.
  async fn send(&self, message: &str) -> Result<()>;
}

/// Sends messages through the Telegram Bot API using MarkdownV2 formatting.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
  /// Shared HTTP client
  client:   reqwest::Client,
  /// Bot API base URL
  api_base: String,
  /// Bot token
  token:    String,
  /// Destination chat or channel
  chat_id:  String,
}

/// Subset of the Bot API response envelope.
#[derive(Debug, Deserialize)]
struct TelegramResponse {
  /// Whether the call succeeded
  ok:          bool,
  /// Error explanation when `ok` is false
  #[serde(default)]
  description: Option<String>,
}

impl TelegramNotifier {
  /// Creates a notifier from explicit settings.
  pub fn new(client: reqwest::Client, api_base: &str, token: String, chat_id: String) -> Self {
    Self { client, api_base: api_base.trim_end_matches('/').to_string(), token, chat_id }
  }

  /// Creates a notifier from configuration, reading credentials from the environment.
  pub fn from_config(client: reqwest::Client, config: &NotifyConfig) -> Result<Self> {
    Ok(Self::new(client, &config.api_base, config.token()?, config.chat_id()?))
  }
}

#[async_trait]
impl Notifier for TelegramNotifier {
  async fn send(&self, message: &str) -> Result<()> {
    debug!("Sending notification to chat {}", self.chat_id);
    let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
    let body = serde_json::json!({
      "chat_id": self.chat_id,
      "text": message,
      "parse_mode": "MarkdownV2",
    });

    let response = self.client.post(&url).json(&body).send().await?;
    let status = response.status();
    let text = response.text().await?;
    let parsed = serde_json::from_str::<TelegramResponse>(&text).ok();

    match parsed {
      Some(TelegramResponse { ok: true, .. }) if status.is_success() => {
        info!("Notification delivered");
        Ok(())
      },
      Some(TelegramResponse { description: Some(description), .. }) =>
        Err(DailyPapersError::ApiError(format!("sendMessage returned {status}: {description}"))),
      _ => Err(DailyPapersError::ApiError(format!("sendMessage returned {status}: {text}"))),
    }
  }
}

/// Formats a paper as a MarkdownV2 message: bold title, link, blank line, summary.
///
/// An empty summary is shown as `None`.
///
/// ```
/// use dailypapers::{notify::format_message, paper::PaperRecord};
///
/// let paper = PaperRecord::new("2401.00001", "GPT-5.0", vec![]).unwrap();
/// assert_eq!(
///   format_message(&paper),
///   "*GPT\\-5\\.0*\n[arXiv](https://arxiv.org/abs/2401.00001)\n\nNone"
/// );
/// ```
pub fn format_message(paper: &PaperRecord) -> String {
  let summary = if paper.summary.is_empty() { "None" } else { paper.summary.as_str() };
  format!(
    "*{}*\n[arXiv]({})\n\n{}",
    format::escape_markdown_v2(&paper.title),
    format::escape_markdown_v2_link(&paper.source_link),
    format::escape_markdown_v2(summary)
  )
}

/// Sends the first paper of a day, if there is one.
///
/// Returns whether a message was sent.
pub async fn notify_first(notifier: &impl Notifier, papers: &[PaperRecord]) -> Result<bool> {
  let Some(paper) = papers.first() else {
    warn!("No papers to notify about");
    return Ok(false);
  };

  info!("Notifying about {paper}");
  notifier.send(&format_message(paper)).await?;
  Ok(true)
}
