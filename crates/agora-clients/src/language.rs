//! Client for the hosted language service: intent classification via
//! `/chat/completions` and vectors via `/embeddings` (OpenAI-compatible).

use std::time::Duration;

use agora_core::service::{EmbeddingService, IntentService};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The fixed classification instruction sent as the system message.
const CLASSIFY_INSTRUCTION: &str = "Classify the user query into either \
  'case', 'method', or 'general'. Respond with only one word: 'case', \
  'method', or 'general'.";

/// Connection settings for the language service.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
  pub base_url:        String,
  pub api_key:         String,
  pub chat_model:      String,
  pub embedding_model: String,
}

/// Async client for the classification and embedding endpoints.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct LanguageClient {
  client: reqwest::Client,
  config: LanguageConfig,
}

impl LanguageClient {
  pub fn new(config: LanguageConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'a str,
  content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:    &'a str,
  messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
  content: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
  embedding: Vec<f32>,
}

// ─── Trait impls ─────────────────────────────────────────────────────────────

impl IntentService for LanguageClient {
  type Error = Error;

  /// `POST /chat/completions` — one request, raw label returned verbatim.
  async fn classify(&self, query: &str) -> Result<String> {
    let request = ChatRequest {
      model:    &self.config.chat_model,
      messages: [
        ChatMessage { role: "system", content: CLASSIFY_INSTRUCTION },
        ChatMessage { role: "user", content: query },
      ],
    };

    let resp = self
      .client
      .post(self.url("/chat/completions"))
      .bearer_auth(&self.config.api_key)
      .json(&request)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status {
        endpoint: "chat/completions",
        status:   resp.status(),
      });
    }

    let reply: ChatResponse = resp.json().await?;
    reply
      .choices
      .into_iter()
      .next()
      .map(|choice| choice.message.content)
      .ok_or(Error::MissingField {
        endpoint: "chat/completions",
        field:    "choices",
      })
  }
}

impl EmbeddingService for LanguageClient {
  type Error = Error;

  /// `POST /embeddings` — one vector per call.
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let request = EmbeddingRequest {
      model: &self.config.embedding_model,
      input: text,
    };

    let resp = self
      .client
      .post(self.url("/embeddings"))
      .bearer_auth(&self.config.api_key)
      .json(&request)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status {
        endpoint: "embeddings",
        status:   resp.status(),
      });
    }

    let reply: EmbeddingResponse = resp.json().await?;
    reply
      .data
      .into_iter()
      .next()
      .map(|datum| datum.embedding)
      .ok_or(Error::MissingField {
        endpoint: "embeddings",
        field:    "data",
      })
  }
}
