//! Client for the Gemini `generateContent` API.
//!
//! The client is purpose-built for paper summarization: every request carries the prompt and the
//! paper's PDF inline, turns the model's "thinking" budget off, and constrains the response to
//! JSON matching the two-field `{category, summary}` schema. What comes back is still just text;
//! interpreting it is the job of [`summarizer`](crate::summarizer).
//!
//! # Examples
//!
//! ```no_run
//! use dailypapers::llm::{GeminiRequest, Model};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pdf = std::fs::read("scratch.pdf")?;
//! let request = GeminiRequest::new()
//!   .with_model(Model::Gemini25Flash)
//!   .with_prompt("Summarise the attached paper.")
//!   .with_document(&pdf);
//!
//! let response = request.send(&reqwest::Client::new(), "my-api-key").await?;
//! println!("Response: {}", response.text());
//! # Ok(())
//! # }
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use serde_json::{json, Value};

use super::*;
use crate::config::SummarizerConfig;

/// Default API host.
const DEFAULT_HOST: &str = "https://generativelanguage.googleapis.com";

/// A model that turns a prompt plus a document into text.
///
/// Implementations are expected to request schema-constrained output, but callers must not rely
/// on the text actually conforming.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
  /// Generates a response for `prompt` with the document at `document` attached.
  async fn generate(&self, prompt: &str, document: &Path) -> Result<String>;
}

/// Gemini models the client knows how to address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Model {
  /// `gemini-2.5-flash`
  Gemini25Flash,
  /// `gemini-2.5-pro`
  Gemini25Pro,
  /// Any other model name, passed through verbatim
  Custom(String),
}

impl Display for Model {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Model::Gemini25Flash => write!(f, "gemini-2.5-flash"),
      Model::Gemini25Pro => write!(f, "gemini-2.5-pro"),
      Model::Custom(name) => write!(f, "{name}"),
    }
  }
}

impl From<&str> for Model {
  fn from(name: &str) -> Self {
    match name {
      "gemini-2.5-flash" => Model::Gemini25Flash,
      "gemini-2.5-pro" => Model::Gemini25Pro,
      other => Model::Custom(other.to_string()),
    }
  }
}

/// Request builder for a single `generateContent` call.
#[derive(Debug, Default)]
pub struct GeminiRequest {
  /// The model to address. Sending without one is an error.
  pub model:    Option<Model>,
  /// Prompt text, sent as the first part.
  pub prompt:   Option<String>,
  /// Base64 encoded PDF, sent as an inline data part.
  pub document: Option<String>,
  /// API host. Falls back to the public endpoint with a warning.
  pub host:     Option<Url>,
}

/// Top-level response body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
  /// Generated candidates, normally exactly one
  #[serde(default)]
  pub candidates:     Vec<Candidate>,
  /// Token accounting
  #[serde(default)]
  pub usage_metadata: Option<UsageMetadata>,
}

/// One generated candidate.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  /// Generated content; absent when the candidate was blocked
  #[serde(default)]
  pub content:       Option<Content>,
  /// Why generation stopped
  #[serde(default)]
  pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Default, Deserialize)]
pub struct Content {
  /// Content parts; text parts are concatenated into the response text
  #[serde(default)]
  pub parts: Vec<Part>,
}

/// A single content part.
#[derive(Debug, Default, Deserialize)]
pub struct Part {
  /// Text of the part, if it is a text part
  #[serde(default)]
  pub text: Option<String>,
}

/// Token usage reported by the service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
  /// Tokens in the prompt, including the document
  #[serde(default)]
  pub prompt_token_count:     u64,
  /// Tokens in the generated candidates
  #[serde(default)]
  pub candidates_token_count: u64,
  /// Total tokens billed
  #[serde(default)]
  pub total_token_count:      u64,
}

impl GeminiResponse {
  /// Concatenated text of the first candidate, empty if there is none.
  pub fn text(&self) -> String {
    self
      .candidates
      .first()
      .and_then(|candidate| candidate.content.as_ref())
      .map(|content| content.parts.iter().filter_map(|part| part.text.as_deref()).collect())
      .unwrap_or_default()
  }
}

/// JSON schema the model is constrained to.
pub fn summary_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "category": { "type": "STRING" },
      "summary": { "type": "STRING" }
    },
    "required": ["category", "summary"],
    "propertyOrdering": ["category", "summary"]
  })
}

impl GeminiRequest {
  /// Creates an empty request.
  pub fn new() -> Self { Self::default() }

  /// Sets the API host.
  pub fn with_host(mut self, host: &str) -> Self {
    self.host = Url::parse(host).ok();
    if self.host.is_none() {
      warn!("Ignoring unparseable host {host:?}");
    }
    self
  }

  /// Sets the model.
  pub fn with_model(mut self, model: Model) -> Self {
    self.model.replace(model);
    self
  }

  /// Sets the prompt text.
  pub fn with_prompt(mut self, prompt: &str) -> Self {
    self.prompt.replace(prompt.to_string());
    self
  }

  /// Attaches PDF bytes.
  pub fn with_document(mut self, pdf: &[u8]) -> Self {
    self.document.replace(BASE64_STANDARD.encode(pdf));
    self
  }

  /// Endpoint URL for the configured host and model.
  pub fn endpoint(&self) -> Result<Url> {
    let model = self.model.as_ref().ok_or(DailyPapersError::Config("No model was chosen".into()))?;
    let host = self.host.clone().unwrap_or_else(|| {
      warn!("No host set, using {DEFAULT_HOST}");
      Url::parse(DEFAULT_HOST).expect("default host is a valid URL")
    });
    host
      .join(&format!("v1beta/models/{model}:generateContent"))
      .map_err(|e| DailyPapersError::Config(format!("Invalid model endpoint: {e}")))
  }

  /// Request body in the service's wire format.
  pub fn body(&self) -> Result<Value> {
    let prompt = self
      .prompt
      .as_deref()
      .ok_or(DailyPapersError::Config("No prompt was supplied to send to the model".into()))?;

    let mut parts = vec![json!({ "text": prompt })];
    if let Some(data) = &self.document {
      parts.push(json!({ "inline_data": { "mime_type": "application/pdf", "data": data } }));
    }

    Ok(json!({
      "contents": [{ "role": "user", "parts": parts }],
      "generationConfig": {
        "thinkingConfig": { "thinkingBudget": 0 },
        "responseMimeType": "application/json",
        "responseSchema": summary_schema()
      }
    }))
  }

  /// Sends the request.
  ///
  /// # Errors
  ///
  /// Fails if the request is incomplete, the transport fails, or the service answers with a
  /// non-success status.
  pub async fn send(&self, client: &reqwest::Client, api_key: &str) -> Result<GeminiResponse> {
    let url = self.endpoint()?;
    let body = self.body()?;

    let response = client.post(url).header("x-goog-api-key", api_key).json(&body).send().await?;
    let status = response.status();
    if !status.is_success() {
      let detail = response.text().await.unwrap_or_default();
      return Err(DailyPapersError::ApiError(format!("generateContent returned {status}: {detail}")));
    }

    let response: GeminiResponse = response.json().await?;
    if let Some(usage) = &response.usage_metadata {
      debug!(
        prompt_tokens = usage.prompt_token_count,
        candidate_tokens = usage.candidates_token_count,
        total_tokens = usage.total_token_count,
        "Model usage"
      );
    }
    Ok(response)
  }
}

/// [`GenerativeModel`] backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
  /// Shared HTTP client
  client:  reqwest::Client,
  /// API host
  host:    String,
  /// Model to address
  model:   Model,
  /// API key sent with each request
  api_key: String,
}

impl GeminiClient {
  /// Creates a client from explicit settings.
  pub fn new(client: reqwest::Client, host: &str, model: Model, api_key: String) -> Self {
    Self { client, host: host.to_string(), model, api_key }
  }

  /// Creates a client from configuration, reading the API key from the environment.
  ///
  /// # Errors
  ///
  /// Returns [`DailyPapersError::MissingCredential`] if the key is not set.
  pub fn from_config(client: reqwest::Client, config: &SummarizerConfig) -> Result<Self> {
    Ok(Self::new(client, &config.host, Model::from(config.model.as_str()), config.api_key()?))
  }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
  async fn generate(&self, prompt: &str, document: &Path) -> Result<String> {
    let pdf = tokio::fs::read(document).await?;
    let response = GeminiRequest::new()
      .with_host(&self.host)
      .with_model(self.model.clone())
      .with_prompt(prompt)
      .with_document(&pdf)
      .send(&self.client, &self.api_key)
      .await?;

    if let Some(reason) = response.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
      trace!("Model finished with {reason}");
    }
    Ok(response.text())
  }
}
