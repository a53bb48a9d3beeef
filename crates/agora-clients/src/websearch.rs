//! Client for the external web search service (SerpAPI-style interface).

use std::time::Duration;

use agora_core::service::{SearchService, WebHit};
use serde::Deserialize;

use crate::{Error, Result};

/// Connection settings for the web search service.
#[derive(Debug, Clone)]
pub struct WebSearchConfig {
  pub base_url: String,
  pub api_key:  String,
}

/// Async client for the search endpoint.
#[derive(Clone)]
pub struct WebSearchClient {
  client: reqwest::Client,
  config: WebSearchConfig,
}

impl WebSearchClient {
  pub fn new(config: WebSearchConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchResponse {
  #[serde(default)]
  organic_results: Vec<OrganicResult>,
}

/// Individual fields default to empty; a sparse result is still a result.
#[derive(Deserialize)]
struct OrganicResult {
  #[serde(default)]
  title:   String,
  #[serde(default)]
  snippet: String,
  #[serde(default)]
  link:    String,
}

// ─── Trait impl ──────────────────────────────────────────────────────────────

impl SearchService for WebSearchClient {
  type Error = Error;

  /// `GET <base_url>?engine=google&q=...&api_key=...`, first organic result.
  async fn top_result(&self, query: &str) -> Result<Option<WebHit>> {
    let resp = self
      .client
      .get(&self.config.base_url)
      .query(&[
        ("engine", "google"),
        ("q", query),
        ("api_key", self.config.api_key.as_str()),
      ])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status {
        endpoint: "search",
        status:   resp.status(),
      });
    }

    let body: SearchResponse = resp.json().await?;
    Ok(body.organic_results.into_iter().next().map(|top| WebHit {
      title:   top.title,
      snippet: top.snippet,
      link:    top.link,
    }))
  }
}
